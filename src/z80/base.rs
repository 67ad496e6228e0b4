//! Unprefixed Z80 opcode table.
//!
//! Opcodes are decoded by their octal fields: `x = op >> 6`, `y = (op >> 3) & 7`,
//! `z = op & 7`, `p = y >> 1`, `q = y & 1`. The 0x40-0x7F register-move block
//! and the 0x80-0xBF ALU block fall out of this decoding directly.

use super::alu;
use super::{CpuZ80, IndexReg};
use crate::PortBus;

impl<B: PortBus> CpuZ80<B> {
    /// Executes an unprefixed opcode (already fetched) and returns its T-states.
    ///
    /// The CB, ED, DD and FD prefixes hand off to their own tables and return
    /// the full cost of the prefixed instruction.
    pub(crate) fn execute_base(&mut self, opcode: u8) -> u32 {
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let p = y >> 1;

        match opcode {
            0x00 => 4, // NOP

            // LD rr,nn
            0x01 | 0x11 | 0x21 | 0x31 => {
                let value = self.fetch_word();
                self.set_reg16(p, value);
                10
            }

            // LD (BC),A / LD (DE),A
            0x02 | 0x12 => {
                let addr = self.reg16(p);
                self.bus.write(addr, self.a);
                7
            }

            // LD A,(BC) / LD A,(DE)
            0x0A | 0x1A => {
                self.a = self.bus.read(self.reg16(p));
                7
            }

            // INC rr / DEC rr
            0x03 | 0x13 | 0x23 | 0x33 => {
                let value = self.reg16(p).wrapping_add(1);
                self.set_reg16(p, value);
                6
            }
            0x0B | 0x1B | 0x2B | 0x3B => {
                let value = self.reg16(p).wrapping_sub(1);
                self.set_reg16(p, value);
                6
            }

            // INC r / DEC r
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                let value = self.reg8(y);
                let result = alu::inc8(&mut self.f, value);
                self.set_reg8(y, result);
                if y == 6 {
                    11
                } else {
                    4
                }
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                let value = self.reg8(y);
                let result = alu::dec8(&mut self.f, value);
                self.set_reg8(y, result);
                if y == 6 {
                    11
                } else {
                    4
                }
            }

            // LD r,n
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                let value = self.fetch_byte();
                self.set_reg8(y, value);
                if y == 6 {
                    10
                } else {
                    7
                }
            }

            // RLCA / RRCA / RLA / RRA
            0x07 | 0x0F | 0x17 | 0x1F => {
                self.a = alu::rotate_accumulator(&mut self.f, y, self.a);
                4
            }

            // EX AF,AF'
            0x08 => {
                std::mem::swap(&mut self.a, &mut self.a_alt);
                std::mem::swap(&mut self.f, &mut self.f_alt);
                4
            }

            // ADD HL,rr
            0x09 | 0x19 | 0x29 | 0x39 => {
                let (hl, value) = (self.hl(), self.reg16(p));
                let result = alu::add16(&mut self.f, hl, value);
                self.set_hl(result);
                11
            }

            // DJNZ e
            0x10 => {
                let target = self.fetch_displaced_target();
                self.b = self.b.wrapping_sub(1);
                if self.b != 0 {
                    self.pc = target;
                    13
                } else {
                    8
                }
            }

            // JR e
            0x18 => {
                self.pc = self.fetch_displaced_target();
                12
            }

            // JR cc,e (NZ, Z, NC, C)
            0x20 | 0x28 | 0x30 | 0x38 => {
                let target = self.fetch_displaced_target();
                if self.condition(y - 4) {
                    self.pc = target;
                    12
                } else {
                    7
                }
            }

            // LD (nn),HL / LD HL,(nn)
            0x22 => {
                let addr = self.fetch_word();
                self.write_word(addr, self.hl());
                16
            }
            0x2A => {
                let addr = self.fetch_word();
                let value = self.read_word(addr);
                self.set_hl(value);
                16
            }

            // LD (nn),A / LD A,(nn)
            0x32 => {
                let addr = self.fetch_word();
                self.bus.write(addr, self.a);
                13
            }
            0x3A => {
                let addr = self.fetch_word();
                self.a = self.bus.read(addr);
                13
            }

            0x27 => {
                self.a = alu::daa(&mut self.f, self.a);
                4
            }

            // CPL
            0x2F => {
                self.a = !self.a;
                self.f.h = true;
                self.f.n = true;
                self.f.set_xy(self.a);
                4
            }

            // SCF
            0x37 => {
                self.f.c = true;
                self.f.h = false;
                self.f.n = false;
                self.f.set_xy(self.a);
                4
            }

            // CCF
            0x3F => {
                self.f.h = self.f.c;
                self.f.c = !self.f.c;
                self.f.n = false;
                self.f.set_xy(self.a);
                4
            }

            // HALT: no interrupt will ever wake it, so it just falls through
            0x76 => 4,

            // LD r,r'
            0x40..=0x7F => {
                let value = self.reg8(z);
                self.set_reg8(y, value);
                if y == 6 || z == 6 {
                    7
                } else {
                    4
                }
            }

            // ALU A,r
            0x80..=0xBF => {
                let value = self.reg8(z);
                self.a = alu::alu_op(&mut self.f, y, self.a, value);
                if z == 6 {
                    7
                } else {
                    4
                }
            }

            // RET cc
            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
                if self.condition(y) {
                    self.pc = self.pop();
                    11
                } else {
                    5
                }
            }

            // POP rr (BC, DE, HL, AF)
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let value = self.pop();
                self.set_stack_pair(p, value);
                10
            }

            // PUSH rr (BC, DE, HL, AF)
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                let value = self.stack_pair(p);
                self.push(value);
                11
            }

            // JP cc,nn
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
                let target = self.fetch_word();
                if self.condition(y) {
                    self.pc = target;
                }
                10
            }

            // JP nn
            0xC3 => {
                self.pc = self.fetch_word();
                10
            }

            // CALL cc,nn
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                let target = self.fetch_word();
                if self.condition(y) {
                    self.push(self.pc);
                    self.pc = target;
                    17
                } else {
                    10
                }
            }

            // CALL nn
            0xCD => {
                let target = self.fetch_word();
                self.push(self.pc);
                self.pc = target;
                17
            }

            // ALU A,n
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let value = self.fetch_byte();
                self.a = alu::alu_op(&mut self.f, y, self.a, value);
                7
            }

            // RST p
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                self.push(self.pc);
                self.pc = (y as u16) * 8;
                11
            }

            // RET
            0xC9 => {
                self.pc = self.pop();
                10
            }

            // OUT (n),A: A goes out on the high address lines
            0xD3 => {
                let port = self.fetch_byte();
                let addr = ((self.a as u16) << 8) | port as u16;
                self.bus.out_port_wide(addr, self.a);
                11
            }

            // IN A,(n)
            0xDB => {
                let port = self.fetch_byte();
                let addr = ((self.a as u16) << 8) | port as u16;
                self.a = self.bus.in_port_wide(addr);
                11
            }

            // EXX
            0xD9 => {
                std::mem::swap(&mut self.b, &mut self.b_alt);
                std::mem::swap(&mut self.c, &mut self.c_alt);
                std::mem::swap(&mut self.d, &mut self.d_alt);
                std::mem::swap(&mut self.e, &mut self.e_alt);
                std::mem::swap(&mut self.h, &mut self.h_alt);
                std::mem::swap(&mut self.l, &mut self.l_alt);
                4
            }

            // EX (SP),HL
            0xE3 => {
                let value = self.read_word(self.sp);
                self.write_word(self.sp, self.hl());
                self.set_hl(value);
                19
            }

            // JP (HL)
            0xE9 => {
                self.pc = self.hl();
                4
            }

            // EX DE,HL
            0xEB => {
                let de = self.de();
                let hl = self.hl();
                self.set_de(hl);
                self.set_hl(de);
                4
            }

            // DI / EI
            0xF3 => {
                self.iff1 = false;
                self.iff2 = false;
                4
            }
            0xFB => {
                self.iff1 = true;
                self.iff2 = true;
                4
            }

            // LD SP,HL
            0xF9 => {
                self.sp = self.hl();
                6
            }

            0xCB => self.execute_cb(),
            0xED => self.execute_ed(),
            0xDD => self.execute_index(IndexReg::IX),
            0xFD => self.execute_index(IndexReg::IY),
        }
    }

    /// Fetches a relative jump displacement and returns the target address.
    fn fetch_displaced_target(&mut self) -> u16 {
        let d = self.fetch_byte() as i8;
        self.pc.wrapping_add_signed(d as i16)
    }

    /// Register pair `index` in BC,DE,HL,AF order, as used by PUSH and POP.
    fn stack_pair(&self, index: u8) -> u16 {
        match index & 3 {
            3 => self.af(),
            other => self.reg16(other),
        }
    }

    fn set_stack_pair(&mut self, index: u8, value: u16) {
        match index & 3 {
            3 => self.set_af(value),
            other => self.set_reg16(other, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{CpuZ80, FlatMemory, MemoryBus};

    fn setup_cpu(program: &[u8]) -> CpuZ80<FlatMemory> {
        let memory = FlatMemory::from_image(0x0000, program).unwrap();
        CpuZ80::new(memory)
    }

    #[test]
    fn test_ld_block_decodes_registers() {
        // LD B,0x11; LD C,B; LD H,0x40; LD L,0x00; LD (HL),C; LD A,(HL)
        let mut cpu = setup_cpu(&[0x06, 0x11, 0x48, 0x26, 0x40, 0x2E, 0x00, 0x71, 0x7E]);
        cpu.run_steps(4);
        assert_eq!(cpu.c(), 0x11);
        assert_eq!(cpu.step(), 7);
        assert_eq!(cpu.memory().read(0x4000), 0x11);
        assert_eq!(cpu.step(), 7);
        assert_eq!(cpu.a(), 0x11);
    }

    #[test]
    fn test_halt_is_a_no_op() {
        let mut cpu = setup_cpu(&[0x76, 0x3E, 0x01]);
        assert_eq!(cpu.step(), 4);
        assert_eq!(cpu.pc(), 0x0001);
        cpu.step();
        assert_eq!(cpu.a(), 0x01);
    }

    #[test]
    fn test_alu_block() {
        // LD A,0x10; LD B,0x05; SUB B; CP 0x0B; AND 0x0F
        let mut cpu = setup_cpu(&[0x3E, 0x10, 0x06, 0x05, 0x90, 0xFE, 0x0B, 0xE6, 0x0F]);
        cpu.run_steps(2);
        assert_eq!(cpu.step(), 4);
        assert_eq!(cpu.a(), 0x0B);
        assert!(cpu.flags().n);
        assert_eq!(cpu.step(), 7);
        assert!(cpu.flags().z);
        cpu.step();
        assert_eq!(cpu.a(), 0x0B);
        assert!(cpu.flags().h);
    }

    #[test]
    fn test_djnz_loop() {
        // LD B,3; loop: INC A; DJNZ loop
        let mut cpu = setup_cpu(&[0x06, 0x03, 0x3C, 0x10, 0xFD, 0x00]);
        cpu.step();
        cpu.run_steps(6);
        assert_eq!(cpu.a(), 3);
        assert_eq!(cpu.b(), 0);
        assert_eq!(cpu.pc(), 0x0005);
    }

    #[test]
    fn test_jr_conditions() {
        // XOR A; JR Z,+2; LD A,1; INC A
        let mut cpu = setup_cpu(&[0xAF, 0x28, 0x02, 0x3E, 0x01, 0x3C]);
        cpu.step();
        assert_eq!(cpu.step(), 12);
        assert_eq!(cpu.pc(), 0x0005);
        cpu.step();
        assert_eq!(cpu.a(), 0x01);
    }

    #[test]
    fn test_jr_not_taken() {
        // LD A,1; OR A; JR Z,+2
        let mut cpu = setup_cpu(&[0x3E, 0x01, 0xB7, 0x28, 0x02]);
        cpu.run_steps(2);
        assert_eq!(cpu.step(), 7);
        assert_eq!(cpu.pc(), 0x0005);
    }

    #[test]
    fn test_call_and_ret() {
        let mut program = vec![0x00; 0x20];
        program[0..3].copy_from_slice(&[0xCD, 0x10, 0x00]); // CALL 0x0010
        program[0x10] = 0xC9; // RET
        let mut cpu = setup_cpu(&program);

        assert_eq!(cpu.step(), 17);
        assert_eq!(cpu.pc(), 0x0010);
        assert_eq!(cpu.sp(), 0xFFFD);
        assert_eq!(cpu.memory().read(0xFFFD), 0x03);
        assert_eq!(cpu.memory().read(0xFFFE), 0x00);

        assert_eq!(cpu.step(), 10);
        assert_eq!(cpu.pc(), 0x0003);
        assert_eq!(cpu.sp(), 0xFFFF);
    }

    #[test]
    fn test_ret_cc_timing() {
        // OR A (clears C); RET C; RET NC
        let mut cpu = setup_cpu(&[0xB7, 0xD8, 0xD0]);
        cpu.set_sp(0x8000);
        cpu.memory_mut().write(0x8000, 0x34);
        cpu.memory_mut().write(0x8001, 0x12);
        cpu.step();
        assert_eq!(cpu.step(), 5);
        assert_eq!(cpu.step(), 11);
        assert_eq!(cpu.pc(), 0x1234);
    }

    #[test]
    fn test_push_pop_af() {
        // PUSH AF; XOR A; LD B,0xFF; POP AF
        let mut cpu = setup_cpu(&[0xF5, 0xAF, 0x06, 0xFF, 0xF1]);
        cpu.set_af(0x12D7);
        cpu.run_steps(3);
        assert_eq!(cpu.a(), 0x00);
        assert_eq!(cpu.step(), 10);
        assert_eq!(cpu.af(), 0x12D7);
    }

    #[test]
    fn test_in_out_immediate_ports() {
        // LD A,0x07; OUT (0xFE),A; IN A,(0xFE)
        let mut cpu = setup_cpu(&[0x3E, 0x07, 0xD3, 0xFE, 0xDB, 0xFE]);
        cpu.step();
        assert_eq!(cpu.step(), 11);
        assert_eq!(cpu.step(), 11);
        // FlatMemory floats the data bus
        assert_eq!(cpu.a(), 0xFF);
    }

    #[test]
    fn test_exchanges() {
        // EX AF,AF'; EXX; EX DE,HL
        let mut cpu = setup_cpu(&[0x08, 0xD9, 0xEB]);
        cpu.set_af(0x1122);
        cpu.set_bc(0x3344);
        cpu.set_de(0x5566);
        cpu.set_hl(0x7788);

        cpu.step();
        assert_eq!(cpu.af(), 0x0000);
        assert_eq!(cpu.af_alt(), 0x1122);

        cpu.step();
        assert_eq!(cpu.bc(), 0x0000);
        assert_eq!(cpu.bc_alt(), 0x3344);
        assert_eq!(cpu.hl_alt(), 0x7788);

        cpu.set_de(0xAAAA);
        cpu.step();
        assert_eq!(cpu.hl(), 0xAAAA);
        assert_eq!(cpu.de(), 0x0000);
    }

    #[test]
    fn test_ex_sp_hl() {
        let mut cpu = setup_cpu(&[0xE3]);
        cpu.set_sp(0x8000);
        cpu.set_hl(0xBEEF);
        cpu.memory_mut().write(0x8000, 0x34);
        cpu.memory_mut().write(0x8001, 0x12);

        assert_eq!(cpu.step(), 19);
        assert_eq!(cpu.hl(), 0x1234);
        assert_eq!(cpu.memory().read(0x8000), 0xEF);
        assert_eq!(cpu.memory().read(0x8001), 0xBE);
    }

    #[test]
    fn test_add_hl_and_inc_rr() {
        // LD HL,0x0FFF; LD BC,0x0001; ADD HL,BC; INC BC; DEC HL
        let mut cpu = setup_cpu(&[0x21, 0xFF, 0x0F, 0x01, 0x01, 0x00, 0x09, 0x03, 0x2B]);
        cpu.run_steps(2);
        assert_eq!(cpu.step(), 11);
        assert_eq!(cpu.hl(), 0x1000);
        assert!(cpu.flags().h);
        assert_eq!(cpu.step(), 6);
        assert_eq!(cpu.bc(), 0x0002);
        cpu.step();
        assert_eq!(cpu.hl(), 0x0FFF);
    }

    #[test]
    fn test_rst_and_jp() {
        let mut program = vec![0x00; 0x40];
        program[0] = 0xEF; // RST 0x28
        program[0x28..0x2B].copy_from_slice(&[0xC3, 0x00, 0x30]); // JP 0x3000
        let mut cpu = setup_cpu(&program);

        assert_eq!(cpu.step(), 11);
        assert_eq!(cpu.pc(), 0x0028);
        assert_eq!(cpu.memory().read(0xFFFD), 0x01);
        cpu.step();
        assert_eq!(cpu.pc(), 0x3000);
    }

    #[test]
    fn test_scf_ccf_cpl() {
        // SCF; CCF; CPL
        let mut cpu = setup_cpu(&[0x37, 0x3F, 0x2F]);
        cpu.set_a(0x0F);
        cpu.step();
        assert!(cpu.flags().c);
        cpu.step();
        assert!(!cpu.flags().c);
        assert!(cpu.flags().h);
        cpu.step();
        assert_eq!(cpu.a(), 0xF0);
        assert!(cpu.flags().n);
    }

    #[test]
    fn test_inc_hl_indirect() {
        // LD HL,0x5000; INC (HL)
        let mut cpu = setup_cpu(&[0x21, 0x00, 0x50, 0x34]);
        cpu.memory_mut().write(0x5000, 0x7F);
        cpu.step();
        assert_eq!(cpu.step(), 11);
        assert_eq!(cpu.memory().read(0x5000), 0x80);
        assert!(cpu.flags().pv);
    }
}
