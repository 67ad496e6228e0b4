//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL and ROR, each on the accumulator or on memory. The memory
//! forms are read-modify-write and never pay a page-cross penalty.

use crate::mos6502::{AddressingMode, Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

/// Applies `shift` to A or to the addressed byte.
///
/// `shift` receives the input and the old carry and returns the result and
/// the new carry. Z and N follow the result.
fn shift_operand<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8, shift: fn(u8, bool) -> (u8, bool)) {
    let metadata = &OPCODE_TABLE[opcode as usize];

    let result = if metadata.addressing_mode == AddressingMode::Accumulator {
        let (result, carry) = shift(cpu.a, cpu.flag_c);
        cpu.a = result;
        cpu.flag_c = carry;
        result
    } else {
        let addr = cpu.operand_address(metadata.addressing_mode);
        let (result, carry) = shift(cpu.memory.read(addr), cpu.flag_c);
        cpu.memory.write(addr, result);
        cpu.flag_c = carry;
        result
    };

    cpu.set_zn(result);
    cpu.finish(metadata, 0);
}

/// Executes the ASL (Arithmetic Shift Left) instruction.
///
/// Bit 0 becomes 0 and bit 7 moves into carry.
pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    shift_operand(cpu, opcode, |value, _| (value << 1, value & 0x80 != 0));
}

/// Executes the LSR (Logical Shift Right) instruction.
///
/// Bit 7 becomes 0 and bit 0 moves into carry.
pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    shift_operand(cpu, opcode, |value, _| (value >> 1, value & 0x01 != 0));
}

/// Executes the ROL (Rotate Left) instruction through carry.
pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    shift_operand(cpu, opcode, |value, carry| {
        ((value << 1) | carry as u8, value & 0x80 != 0)
    });
}

/// Executes the ROR (Rotate Right) instruction through carry.
pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    shift_operand(cpu, opcode, |value, carry| {
        ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    });
}

#[cfg(test)]
mod tests {
    use crate::{Cpu6502, FlatMemory, MemoryBus};

    fn setup_cpu(program: &[u8]) -> Cpu6502<FlatMemory> {
        let memory = FlatMemory::from_image(0x8000, program).unwrap();
        let mut cpu = Cpu6502::new(memory);
        cpu.reset(0x8000);
        cpu
    }

    #[test]
    fn test_asl_accumulator_carry_out() {
        let mut cpu = setup_cpu(&[0x0A]);
        cpu.set_a(0x81);
        assert_eq!(cpu.step(), 2);
        assert_eq!(cpu.a(), 0x02);
        assert!(cpu.flag_c());
        assert!(!cpu.flag_n());
    }

    #[test]
    fn test_lsr_memory_to_zero() {
        let mut cpu = setup_cpu(&[0x46, 0x10]); // LSR $10
        cpu.memory_mut().write(0x0010, 0x01);
        assert_eq!(cpu.step(), 5);
        assert_eq!(cpu.memory().read(0x0010), 0x00);
        assert!(cpu.flag_c());
        assert!(cpu.flag_z());
    }

    #[test]
    fn test_rol_pulls_carry_into_bit0() {
        let mut cpu = setup_cpu(&[0x2A]);
        cpu.set_flag_c(true);
        cpu.set_a(0x40);
        cpu.step();
        assert_eq!(cpu.a(), 0x81);
        assert!(!cpu.flag_c());
        assert!(cpu.flag_n());
    }

    #[test]
    fn test_ror_absolute_x() {
        let mut cpu = setup_cpu(&[0x7E, 0x00, 0x30]); // ROR $3000,X
        cpu.set_x(0x05);
        cpu.set_flag_c(true);
        cpu.memory_mut().write(0x3005, 0x02);
        assert_eq!(cpu.step(), 7);
        assert_eq!(cpu.memory().read(0x3005), 0x81);
        assert!(!cpu.flag_c());
    }
}
