//! # Increment and Decrement Instructions
//!
//! INC/DEC operate on memory (read-modify-write, no page-cross penalty);
//! INX/INY/DEX/DEY operate on the index registers. All wrap and update Z/N.

use crate::mos6502::{Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

fn modify_memory<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8, delta: fn(u8) -> u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let addr = cpu.operand_address(metadata.addressing_mode);

    let result = delta(cpu.memory.read(addr));
    cpu.memory.write(addr, result);
    cpu.set_zn(result);

    cpu.finish(metadata, 0);
}

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    modify_memory(cpu, opcode, |value| value.wrapping_add(1));
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    modify_memory(cpu, opcode, |value| value.wrapping_sub(1));
}

/// Executes the INX (Increment X) instruction.
pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_zn(cpu.x);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the INY (Increment Y) instruction.
pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_zn(cpu.y);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the DEX (Decrement X) instruction.
pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_zn(cpu.x);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the DEY (Decrement Y) instruction.
pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_zn(cpu.y);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}
