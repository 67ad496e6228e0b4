//! CB-prefixed opcodes: rotates and shifts, BIT, RES and SET.

use super::alu;
use super::CpuZ80;
use crate::PortBus;

impl<B: PortBus> CpuZ80<B> {
    /// Executes a CB-prefixed instruction. The prefix has been fetched.
    ///
    /// T-states: 8 on a register, 15 on (HL), 12 for BIT on (HL).
    pub(crate) fn execute_cb(&mut self) -> u32 {
        let opcode = self.fetch_opcode();
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let value = self.reg8(z);

        match opcode >> 6 {
            0 => {
                let result = alu::rotate_shift(&mut self.f, y, value);
                self.set_reg8(z, result);
            }
            1 => {
                alu::bit(&mut self.f, y, value);
                return if z == 6 { 12 } else { 8 };
            }
            2 => self.set_reg8(z, value & !(1 << y)),
            _ => self.set_reg8(z, value | (1 << y)),
        }

        if z == 6 {
            15
        } else {
            8
        }
    }
}
