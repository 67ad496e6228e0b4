//! # Load and Store Instructions
//!
//! LDA, LDX and LDY read their operand (one extra cycle on a page cross) and
//! set Z/N. STA, STX and STY write without touching flags; indexed stores have
//! fixed timing.

use crate::mos6502::{Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

/// Executes the LDA (Load Accumulator) instruction.
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    cpu.a = value;
    cpu.set_zn(value);

    cpu.finish(metadata, page_crossed as u64);
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    cpu.x = value;
    cpu.set_zn(value);

    cpu.finish(metadata, page_crossed as u64);
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    cpu.y = value;
    cpu.set_zn(value);

    cpu.finish(metadata, page_crossed as u64);
}

fn store<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8, value: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let addr = cpu.operand_address(metadata.addressing_mode);

    cpu.memory.write(addr, value);

    cpu.finish(metadata, 0);
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let a = cpu.a;
    store(cpu, opcode, a);
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let x = cpu.x;
    store(cpu, opcode, x);
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let y = cpu.y;
    store(cpu, opcode, y);
}
