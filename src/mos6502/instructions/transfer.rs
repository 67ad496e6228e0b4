//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA and TSX update Z/N from the copied value. TXS does not
//! affect flags.

use crate::mos6502::{Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

/// Executes the TAX (Transfer A to X) instruction.
pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.x = cpu.a;
    cpu.set_zn(cpu.x);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the TAY (Transfer A to Y) instruction.
pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.y = cpu.a;
    cpu.set_zn(cpu.y);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the TXA (Transfer X to A) instruction.
pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.a = cpu.x;
    cpu.set_zn(cpu.a);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the TYA (Transfer Y to A) instruction.
pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.a = cpu.y;
    cpu.set_zn(cpu.a);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the TSX (Transfer Stack Pointer to X) instruction.
pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.x = cpu.sp;
    cpu.set_zn(cpu.x);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the TXS (Transfer X to Stack Pointer) instruction.
pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.sp = cpu.x;
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}
