//! # Branch Instructions
//!
//! BCC, BCS, BEQ, BNE, BMI, BPL, BVC and BVS share one implementation; the
//! dispatcher passes in the flag test for each opcode.
//!
//! All branch instructions use relative addressing with a signed 8-bit offset.
//! Cycle timing varies based on whether the branch is taken and whether a page
//! boundary is crossed.

use crate::mos6502::{Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

/// Executes a conditional branch.
///
/// Cycle timing:
/// - 2 cycles if branch not taken
/// - 3 cycles if branch taken to same page
/// - 4 cycles if branch taken to different page
///
/// No flags are affected.
pub(crate) fn execute_branch<M: MemoryBus>(
    cpu: &mut Cpu6502<M>,
    opcode: u8,
    condition: impl FnOnce(&Cpu6502<M>) -> bool,
) {
    let taken = condition(&*cpu);
    let metadata = &OPCODE_TABLE[opcode as usize];
    let offset = cpu.operand_byte() as i8;

    let mut cycles = metadata.base_cycles as u64;
    let pc_after_instruction = cpu.pc.wrapping_add(metadata.size_bytes as u16);

    if taken {
        let target_pc = pc_after_instruction.wrapping_add_signed(offset as i16);

        cycles += 1;
        if (pc_after_instruction & 0xFF00) != (target_pc & 0xFF00) {
            cycles += 1;
        }

        cpu.pc = target_pc;
    } else {
        cpu.pc = pc_after_instruction;
    }

    cpu.cycles += cycles;
}
