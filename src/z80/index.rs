//! DD/FD-prefixed opcodes: IX and IY.
//!
//! The prefix swaps HL for the index register, (HL) for (IX+d)/(IY+d) and, in
//! instructions without a memory operand, H and L for the undocumented byte
//! halves. Opcodes with no indexed form run as if unprefixed, paying 4 extra
//! T-states for the prefix. A prefix followed by DD, ED or FD does nothing.

use super::alu;
use super::{CpuZ80, IndexReg};
use crate::PortBus;

impl<B: PortBus> CpuZ80<B> {
    /// Executes a DD- or FD-prefixed instruction. The prefix has been fetched.
    pub(crate) fn execute_index(&mut self, reg: IndexReg) -> u32 {
        // A prefix followed by another prefix is a 4 T-state no-op; the next
        // prefix starts a new instruction on the following step.
        if matches!(self.bus.read(self.pc), 0xDD | 0xED | 0xFD) {
            log::trace!(
                "z80: {:?} prefix overridden at 0x{:04X}",
                reg,
                self.pc.wrapping_sub(1)
            );
            return 4;
        }

        let opcode = self.fetch_opcode();
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let p = y >> 1;

        match opcode {
            // ADD IX,rr (rr = BC, DE, IX, SP)
            0x09 | 0x19 | 0x29 | 0x39 => {
                let index = self.index(reg);
                let value = if p == 2 { index } else { self.reg16(p) };
                let result = alu::add16(&mut self.f, index, value);
                self.set_index(reg, result);
                15
            }

            // LD IX,nn
            0x21 => {
                let value = self.fetch_word();
                self.set_index(reg, value);
                14
            }

            // LD (nn),IX / LD IX,(nn)
            0x22 => {
                let addr = self.fetch_word();
                self.write_word(addr, self.index(reg));
                20
            }
            0x2A => {
                let addr = self.fetch_word();
                let value = self.read_word(addr);
                self.set_index(reg, value);
                20
            }

            // INC IX / DEC IX
            0x23 => {
                let value = self.index(reg).wrapping_add(1);
                self.set_index(reg, value);
                10
            }
            0x2B => {
                let value = self.index(reg).wrapping_sub(1);
                self.set_index(reg, value);
                10
            }

            // INC/DEC IXH, IXL
            0x24 | 0x2C => {
                let value = self.index_half(reg, y);
                let result = alu::inc8(&mut self.f, value);
                self.set_index_half(reg, y, result);
                8
            }
            0x25 | 0x2D => {
                let value = self.index_half(reg, y);
                let result = alu::dec8(&mut self.f, value);
                self.set_index_half(reg, y, result);
                8
            }

            // LD IXH,n / LD IXL,n
            0x26 | 0x2E => {
                let value = self.fetch_byte();
                self.set_index_half(reg, y, value);
                11
            }

            // INC (IX+d) / DEC (IX+d)
            0x34 | 0x35 => {
                let addr = self.fetch_displaced(self.index(reg));
                let value = self.bus.read(addr);
                let result = if opcode == 0x34 {
                    alu::inc8(&mut self.f, value)
                } else {
                    alu::dec8(&mut self.f, value)
                };
                self.bus.write(addr, result);
                23
            }

            // LD (IX+d),n
            0x36 => {
                let addr = self.fetch_displaced(self.index(reg));
                let value = self.fetch_byte();
                self.bus.write(addr, value);
                19
            }

            // LD r,(IX+d): the other operand is the plain register
            0x46 | 0x4E | 0x56 | 0x5E | 0x66 | 0x6E | 0x7E => {
                let addr = self.fetch_displaced(self.index(reg));
                let value = self.bus.read(addr);
                self.set_reg8(y, value);
                19
            }

            // LD (IX+d),r
            0x70..=0x75 | 0x77 => {
                let addr = self.fetch_displaced(self.index(reg));
                let value = self.reg8(z);
                self.bus.write(addr, value);
                19
            }

            // LD with IXH/IXL on either side
            0x40..=0x7F if opcode != 0x76 && (y == 4 || y == 5 || z == 4 || z == 5) => {
                let value = self.index_operand(reg, z);
                self.set_index_operand(reg, y, value);
                8
            }

            // ALU A,(IX+d)
            0x86 | 0x8E | 0x96 | 0x9E | 0xA6 | 0xAE | 0xB6 | 0xBE => {
                let addr = self.fetch_displaced(self.index(reg));
                let value = self.bus.read(addr);
                self.a = alu::alu_op(&mut self.f, y, self.a, value);
                19
            }

            // ALU A,IXH / A,IXL
            0x80..=0xBF if z == 4 || z == 5 => {
                let value = self.index_half(reg, z);
                self.a = alu::alu_op(&mut self.f, y, self.a, value);
                8
            }

            0xCB => self.execute_index_cb(reg),

            // POP IX / PUSH IX
            0xE1 => {
                let value = self.pop();
                self.set_index(reg, value);
                14
            }
            0xE5 => {
                self.push(self.index(reg));
                15
            }

            // EX (SP),IX
            0xE3 => {
                let value = self.read_word(self.sp);
                self.write_word(self.sp, self.index(reg));
                self.set_index(reg, value);
                23
            }

            // JP (IX)
            0xE9 => {
                self.pc = self.index(reg);
                8
            }

            // LD SP,IX
            0xF9 => {
                self.sp = self.index(reg);
                10
            }

            _ => {
                log::trace!(
                    "z80: {:?} prefix has no effect on opcode {:02X} at 0x{:04X}",
                    reg,
                    opcode,
                    self.pc.wrapping_sub(2)
                );
                4 + self.execute_base(opcode)
            }
        }
    }

    /// DDCB d op / FDCB d op: the displacement comes before the operation byte.
    ///
    /// Rotates, RES and SET also copy the result into register `z` unless
    /// `z` is 6. T-states: 23, or 20 for BIT.
    fn execute_index_cb(&mut self, reg: IndexReg) -> u32 {
        let addr = self.fetch_displaced(self.index(reg));
        let opcode = self.fetch_byte();
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let value = self.bus.read(addr);

        let result = match opcode >> 6 {
            0 => alu::rotate_shift(&mut self.f, y, value),
            1 => {
                alu::bit(&mut self.f, y, value);
                self.f.set_xy((addr >> 8) as u8);
                return 20;
            }
            2 => value & !(1 << y),
            _ => value | (1 << y),
        };

        self.bus.write(addr, result);
        if z != 6 {
            self.set_reg8(z, result);
        }
        23
    }

    /// High (`half` 4) or low (`half` 5) byte of the index register.
    fn index_half(&self, reg: IndexReg, half: u8) -> u8 {
        let value = self.index(reg);
        if half == 4 {
            (value >> 8) as u8
        } else {
            value as u8
        }
    }

    fn set_index_half(&mut self, reg: IndexReg, half: u8, byte: u8) {
        let value = self.index(reg);
        let value = if half == 4 {
            (value & 0x00FF) | ((byte as u16) << 8)
        } else {
            (value & 0xFF00) | byte as u16
        };
        self.set_index(reg, value);
    }

    /// Register `index` with H and L mapped to the index register halves.
    fn index_operand(&self, reg: IndexReg, index: u8) -> u8 {
        match index {
            4 | 5 => self.index_half(reg, index),
            other => self.reg8(other),
        }
    }

    fn set_index_operand(&mut self, reg: IndexReg, index: u8, value: u8) {
        match index {
            4 | 5 => self.set_index_half(reg, index, value),
            other => self.set_reg8(other, value),
        }
    }
}
