//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! Arithmetic, logic, compare and bit-test operations:
//! - ADC/SBC: Add/subtract with carry, binary or BCD depending on D
//! - AND/ORA/EOR: Bitwise logic into the accumulator
//! - CMP/CPX/CPY: Register compares
//! - BIT: Memory bit test
//!
//! All read instructions take one extra cycle when indexing crosses a page.

use crate::mos6502::{Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

/// Executes the ADC (Add with Carry) instruction.
///
/// With D clear this is plain binary addition. With D set the operands are
/// treated as packed BCD; C reflects the decimal carry, while Z follows the
/// binary sum and N/V follow the intermediate high digit, as on the NMOS part.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    let a = cpu.a;
    let carry_in = cpu.flag_c as u16;
    let binary = a as u16 + value as u16 + carry_in;

    if cpu.flag_d {
        let mut lo = (a & 0x0F) as u16 + (value & 0x0F) as u16 + carry_in;
        let mut hi = (a >> 4) as u16 + (value >> 4) as u16;
        if lo > 0x09 {
            lo += 0x06;
        }
        if lo > 0x0F {
            hi += 1;
        }

        cpu.flag_z = (binary & 0xFF) == 0;
        cpu.flag_n = (hi & 0x08) != 0;
        cpu.flag_v = (((hi << 4) as u8 ^ a) & 0x80) != 0 && ((a ^ value) & 0x80) == 0;

        if hi > 0x09 {
            hi += 0x06;
        }
        cpu.flag_c = hi > 0x0F;
        cpu.a = ((hi << 4) | (lo & 0x0F)) as u8;
    } else {
        let result = binary as u8;

        // Overflow: both operands share a sign the result does not
        cpu.flag_v = ((a ^ result) & (value ^ result) & 0x80) != 0;
        cpu.flag_c = binary > 0xFF;
        cpu.set_zn(result);
        cpu.a = result;
    }

    cpu.finish(metadata, page_crossed as u64);
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// Computes A - M - (1 - C). Flags always come from the binary difference; in
/// decimal mode only the value stored in A is BCD-adjusted.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    let a = cpu.a;
    let borrow = 1 - cpu.flag_c as i16;
    let binary = a as i16 - value as i16 - borrow;
    let result = binary as u8;

    cpu.flag_c = binary >= 0;
    cpu.flag_v = ((a ^ value) & (a ^ result) & 0x80) != 0;
    cpu.set_zn(result);

    if cpu.flag_d {
        let mut lo = (a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow;
        let mut hi = (a >> 4) as i16 - (value >> 4) as i16;
        if lo < 0 {
            lo -= 0x06;
            hi -= 1;
        }
        if hi < 0 {
            hi -= 0x06;
        }
        cpu.a = (((hi << 4) | (lo & 0x0F)) & 0xFF) as u8;
    } else {
        cpu.a = result;
    }

    cpu.finish(metadata, page_crossed as u64);
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    cpu.a &= value;
    cpu.set_zn(cpu.a);

    cpu.finish(metadata, page_crossed as u64);
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    cpu.a |= value;
    cpu.set_zn(cpu.a);

    cpu.finish(metadata, page_crossed as u64);
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    cpu.a ^= value;
    cpu.set_zn(cpu.a);

    cpu.finish(metadata, page_crossed as u64);
}

/// Shared compare: C = reg >= M, Z = reg == M, N = bit 7 of reg - M.
fn compare<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8, register: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.read_operand(metadata.addressing_mode);

    cpu.flag_c = register >= value;
    cpu.set_zn(register.wrapping_sub(value));

    cpu.finish(metadata, page_crossed as u64);
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let a = cpu.a;
    compare(cpu, opcode, a);
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let x = cpu.x;
    compare(cpu, opcode, x);
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let y = cpu.y;
    compare(cpu, opcode, y);
}

/// Executes the BIT (Bit Test) instruction.
///
/// Z is set from A AND M; N and V are copied from bits 7 and 6 of M. A is not
/// modified.
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, _) = cpu.read_operand(metadata.addressing_mode);

    cpu.flag_z = (cpu.a & value) == 0;
    cpu.flag_n = (value & 0x80) != 0;
    cpu.flag_v = (value & 0x40) != 0;

    cpu.finish(metadata, 0);
}
