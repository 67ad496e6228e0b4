//! # Status Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLV, CLD and SED. Each is a single-byte, 2-cycle
//! instruction that sets or clears exactly one flag.

use crate::mos6502::{Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

/// Applies `update` to the CPU and finishes the instruction.
pub(crate) fn execute_flag_op<M: MemoryBus>(
    cpu: &mut Cpu6502<M>,
    opcode: u8,
    update: impl FnOnce(&mut Cpu6502<M>),
) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    update(&mut *cpu);
    cpu.finish(metadata, 0);
}
