//! # Control Flow Instructions
//!
//! JMP, JSR, RTS, RTI, BRK and NOP.
//!
//! JSR pushes the address of its own last byte (return address minus one);
//! RTS pulls it and adds one. `call_subroutine` relies on that pairing when it
//! pushes its sentinel.

use crate::mos6502::{AddressingMode, Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

/// IRQ/BRK vector.
const IRQ_VECTOR: u16 = 0xFFFE;

/// Executes the BRK (Force Interrupt) instruction.
///
/// Pushes PC+2 (high byte first), then the status byte with B and bit 5 set,
/// sets I and loads PC from the IRQ vector at $FFFE/F. The B flag itself is
/// only ever set in the pushed copy.
///
/// Cycle timing: 7 cycles (fixed)
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];

    let return_address = cpu.pc.wrapping_add(2);
    cpu.push_word(return_address);

    let status = cpu.status() | 0b0011_0000;
    cpu.push(status);

    cpu.flag_i = true;

    let pc_low = cpu.memory.read(IRQ_VECTOR) as u16;
    let pc_high = cpu.memory.read(IRQ_VECTOR.wrapping_add(1)) as u16;
    cpu.pc = (pc_high << 8) | pc_low;

    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the JMP (Jump) instruction.
///
/// The indirect form reproduces the NMOS page bug: JMP ($10FF) reads its high
/// byte from $1000, not $1100.
///
/// Cycle timing:
/// - Absolute: 3 cycles
/// - Indirect: 5 cycles
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let operand = cpu.operand_word();

    let target_address = match metadata.addressing_mode {
        AddressingMode::Indirect => {
            let target_lo = cpu.memory.read(operand) as u16;
            let target_hi_addr = if (operand & 0xFF) == 0xFF {
                operand & 0xFF00
            } else {
                operand.wrapping_add(1)
            };
            let target_hi = cpu.memory.read(target_hi_addr) as u16;

            (target_hi << 8) | target_lo
        }
        _ => operand,
    };

    cpu.pc = target_address;
    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Cycle timing: 6 cycles
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let target = cpu.operand_word();

    let last_byte = cpu.pc.wrapping_add(2);
    cpu.push_word(last_byte);

    cpu.pc = target;
    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the RTS (Return from Subroutine) instruction.
///
/// Cycle timing: 6 cycles
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];

    cpu.pc = cpu.pull_word().wrapping_add(1);
    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pulls the status byte, then PC. Unlike RTS there is no +1 adjustment.
///
/// Cycle timing: 6 cycles
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];

    let status = cpu.pull();
    let flag_b = cpu.flag_b;
    cpu.set_status(status);
    cpu.flag_b = flag_b;

    cpu.pc = cpu.pull_word();
    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the NOP (No Operation) instruction.
pub(crate) fn execute_nop<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.finish(metadata, 0);
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
    fn test_jsr_pushes_last_byte_address() {
        let mut cpu = setup_cpu(&[0x20, 0x34, 0x12]); // JSR $1234
        assert_eq!(cpu.step(), 6);
        assert_eq!(cpu.pc(), 0x1234);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.memory().read(0x01FF), 0x80);
        assert_eq!(cpu.memory().read(0x01FE), 0x02);
    }

    #[test]
    fn test_jsr_rts_round_trip() {
        let mut cpu = setup_cpu(&[0x20, 0x10, 0x80]); // JSR $8010
        cpu.memory_mut().write(0x8010, 0x60); // RTS
        cpu.step();
        assert_eq!(cpu.step(), 6);
        assert_eq!(cpu.pc(), 0x8003);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_jmp_indirect_page_bug() {
        let mut cpu = setup_cpu(&[0x6C, 0xFF, 0x10]); // JMP ($10FF)
        cpu.memory_mut().write(0x10FF, 0x34);
        cpu.memory_mut().write(0x1000, 0x12);
        cpu.memory_mut().write(0x1100, 0x56);

        assert_eq!(cpu.step(), 5);
        assert_eq!(cpu.pc(), 0x1234);
    }

    #[test]
    fn test_brk_and_rti() {
        let mut cpu = setup_cpu(&[0x00]); // BRK
        cpu.memory_mut().write(0xFFFE, 0x00);
        cpu.memory_mut().write(0xFFFF, 0x90);
        cpu.memory_mut().write(0x9000, 0x40); // RTI
        cpu.set_flag_c(true);

        assert_eq!(cpu.step(), 7);
        assert_eq!(cpu.pc(), 0x9000);
        assert!(cpu.flag_i());
        assert!(!cpu.flag_b());
        // Pushed status has B and bit 5 set
        assert_eq!(cpu.memory().read(0x01FD), 0b0011_0001);

        cpu.step();
        assert_eq!(cpu.pc(), 0x8002);
        assert!(cpu.flag_c());
        assert!(!cpu.flag_i());
        assert!(!cpu.flag_b());
        assert_eq!(cpu.sp(), 0xFF);
    }
}
