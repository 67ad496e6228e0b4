//! ED-prefixed opcodes.
//!
//! Covers 16-bit ADC/SBC, LD (nn),rr, the I/R transfers, NEG, RETN/RETI, IM,
//! RLD/RRD, IN r,(C)/OUT (C),r and the block transfer, compare and I/O
//! instructions. The repeating block forms run every iteration inside one
//! call: 21 T-states for each iteration that loops back and 16 for the last.

use super::alu;
use super::CpuZ80;
use crate::PortBus;

/// Interrupt mode selected by `IM` for each `y` field value.
const IM_MODES: [u8; 8] = [0, 0, 1, 2, 0, 0, 1, 2];

/// Direction of a block instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Increment,
    Decrement,
}

impl Step {
    fn apply(self, value: u16) -> u16 {
        match self {
            Step::Increment => value.wrapping_add(1),
            Step::Decrement => value.wrapping_sub(1),
        }
    }
}

impl<B: PortBus> CpuZ80<B> {
    /// Executes an ED-prefixed instruction. The prefix has been fetched.
    pub(crate) fn execute_ed(&mut self) -> u32 {
        let opcode = self.fetch_opcode();
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let p = y >> 1;
        let q = y & 1;

        match (opcode >> 6, z) {
            // IN r,(C); y == 6 only sets flags
            (1, 0) => {
                let port = self.bc();
                let value = self.bus.in_port_wide(port);
                self.f.set_sz_xy(value);
                self.f.h = false;
                self.f.n = false;
                self.f.pv = alu::parity(value);
                if y != 6 {
                    self.set_reg8(y, value);
                }
                12
            }

            // OUT (C),r; y == 6 outputs 0
            (1, 1) => {
                let value = if y == 6 { 0 } else { self.reg8(y) };
                let port = self.bc();
                self.bus.out_port_wide(port, value);
                12
            }

            // SBC HL,rr / ADC HL,rr
            (1, 2) => {
                let (hl, value, carry) = (self.hl(), self.reg16(p), self.f.c);
                let result = if q == 0 {
                    alu::sbc16(&mut self.f, hl, value, carry)
                } else {
                    alu::adc16(&mut self.f, hl, value, carry)
                };
                self.set_hl(result);
                15
            }

            // LD (nn),rr / LD rr,(nn)
            (1, 3) => {
                let addr = self.fetch_word();
                if q == 0 {
                    self.write_word(addr, self.reg16(p));
                } else {
                    let value = self.read_word(addr);
                    self.set_reg16(p, value);
                }
                20
            }

            (1, 4) => {
                self.a = alu::neg(&mut self.f, self.a);
                8
            }

            // RETN / RETI
            (1, 5) => {
                self.pc = self.pop();
                self.iff1 = self.iff2;
                14
            }

            (1, 6) => {
                self.im = IM_MODES[y as usize];
                8
            }

            (1, 7) => self.execute_ed_misc(y),

            // LDI/CPI/INI/OUTI and friends
            (2, 0..=3) if y >= 4 => self.execute_block(y, z),

            _ => {
                log::trace!(
                    "z80: unassigned opcode ED {:02X} at 0x{:04X} treated as no-op",
                    opcode,
                    self.pc.wrapping_sub(2)
                );
                8
            }
        }
    }

    /// LD I,A / LD R,A / LD A,I / LD A,R / RRD / RLD.
    fn execute_ed_misc(&mut self, y: u8) -> u32 {
        match y {
            0 => {
                self.i = self.a;
                9
            }
            1 => {
                self.r = self.a;
                9
            }
            2 | 3 => {
                self.a = if y == 2 { self.i } else { self.r };
                self.f.set_sz_xy(self.a);
                self.f.h = false;
                self.f.n = false;
                self.f.pv = self.iff2;
                9
            }
            4 | 5 => {
                let addr = self.hl();
                let memory = self.bus.read(addr);
                let (stored, a) = if y == 4 {
                    // RRD
                    ((self.a << 4) | (memory >> 4), (self.a & 0xF0) | (memory & 0x0F))
                } else {
                    // RLD
                    ((memory << 4) | (self.a & 0x0F), (self.a & 0xF0) | (memory >> 4))
                };
                self.bus.write(addr, stored);
                self.a = a;
                self.f.set_sz_xy(a);
                self.f.h = false;
                self.f.n = false;
                self.f.pv = alu::parity(a);
                18
            }
            _ => 8,
        }
    }

    /// Runs a block instruction, looping for the repeating forms.
    ///
    /// `y` selects direction and repetition (4 = I, 5 = D, 6 = IR, 7 = DR);
    /// `z` selects the operation (0 = LD, 1 = CP, 2 = IN, 3 = OUT).
    fn execute_block(&mut self, y: u8, z: u8) -> u32 {
        let step = if y & 1 == 0 {
            Step::Increment
        } else {
            Step::Decrement
        };
        let repeat = y >= 6;

        let mut t_states = 0;
        loop {
            let again = match z {
                0 => self.block_load(step),
                1 => self.block_compare(step),
                2 => self.block_in(step),
                _ => self.block_out(step),
            };

            if repeat && again {
                t_states += 21;
                // Each repeat re-fetches both opcode bytes
                self.bump_r(2);
            } else {
                return t_states + 16;
            }
        }
    }

    /// LDI/LDD: (DE) <- (HL). Returns true while BC is non-zero.
    fn block_load(&mut self, step: Step) -> bool {
        let value = self.bus.read(self.hl());
        let dest = self.de();
        self.bus.write(dest, value);

        self.set_hl(step.apply(self.hl()));
        self.set_de(step.apply(self.de()));
        let bc = self.bc().wrapping_sub(1);
        self.set_bc(bc);

        let n = value.wrapping_add(self.a);
        self.f.h = false;
        self.f.n = false;
        self.f.pv = bc != 0;
        self.f.y = n & 0x02 != 0;
        self.f.x = n & 0x08 != 0;
        bc != 0
    }

    /// CPI/CPD: compares A with (HL). Returns true while BC is non-zero and
    /// no match was found.
    fn block_compare(&mut self, step: Step) -> bool {
        let value = self.bus.read(self.hl());
        let result = self.a.wrapping_sub(value);
        let half = (self.a & 0x0F) < (value & 0x0F);

        self.set_hl(step.apply(self.hl()));
        let bc = self.bc().wrapping_sub(1);
        self.set_bc(bc);

        let n = result.wrapping_sub(half as u8);
        self.f.s = result & 0x80 != 0;
        self.f.z = result == 0;
        self.f.h = half;
        self.f.pv = bc != 0;
        self.f.n = true;
        self.f.y = n & 0x02 != 0;
        self.f.x = n & 0x08 != 0;
        bc != 0 && result != 0
    }

    /// INI/IND: (HL) <- port BC, then B is decremented. Returns true while B is
    /// non-zero.
    fn block_in(&mut self, step: Step) -> bool {
        let port = self.bc();
        let value = self.bus.in_port_wide(port);
        let dest = self.hl();
        self.bus.write(dest, value);

        self.set_hl(step.apply(self.hl()));
        self.b = self.b.wrapping_sub(1);

        self.f.set_sz_xy(self.b);
        self.f.n = true;
        self.b != 0
    }

    /// OUTI/OUTD: B is decremented, then port BC <- (HL). Returns true while B
    /// is non-zero.
    fn block_out(&mut self, step: Step) -> bool {
        let value = self.bus.read(self.hl());
        self.b = self.b.wrapping_sub(1);
        let port = self.bc();
        self.bus.out_port_wide(port, value);

        self.set_hl(step.apply(self.hl()));

        self.f.set_sz_xy(self.b);
        self.f.n = true;
        self.b != 0
    }
}
