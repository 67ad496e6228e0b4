//! # Stack Operations
//!
//! PHA, PHP, PLA and PLP.
//!
//! The 6502 stack is located at memory addresses 0x0100-0x01FF and grows downward.
//! The stack pointer (SP) is an 8-bit register that serves as an offset into this
//! page. The full stack address is calculated as 0x0100 | SP.

use crate::mos6502::{Cpu6502, OPCODE_TABLE};
use crate::MemoryBus;

/// Executes the PHA (Push Accumulator) instruction.
///
/// Cycles: 3
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let a = cpu.a;
    cpu.push(a);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed copy always has B and bit 5 set.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let status = cpu.status() | 0b0011_0000;
    cpu.push(status);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the PLA (Pull Accumulator) instruction.
///
/// Cycles: 4
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let value = cpu.pull();
    cpu.a = value;
    cpu.set_zn(value);
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// B is not a physical flag, so the pulled B bit is ignored.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut Cpu6502<M>, opcode: u8) {
    let status = cpu.pull();
    let flag_b = cpu.flag_b;
    cpu.set_status(status);
    cpu.flag_b = flag_b;
    cpu.finish(&OPCODE_TABLE[opcode as usize], 0);
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
    fn test_pha_pla() {
        // PHA; LDA #$00; PLA
        let mut cpu = setup_cpu(&[0x48, 0xA9, 0x00, 0x68]);
        cpu.set_a(0x9C);

        assert_eq!(cpu.step(), 3);
        assert_eq!(cpu.memory().read(0x01FF), 0x9C);
        assert_eq!(cpu.sp(), 0xFE);

        cpu.step();
        assert_eq!(cpu.step(), 4);
        assert_eq!(cpu.a(), 0x9C);
        assert!(cpu.flag_n());
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_php_plp() {
        // PHP; CLC; PLP
        let mut cpu = setup_cpu(&[0x08, 0x18, 0x28]);
        cpu.set_flag_c(true);

        cpu.step();
        assert_eq!(cpu.memory().read(0x01FF), 0b0011_0001);

        cpu.step();
        assert!(!cpu.flag_c());

        cpu.step();
        assert!(cpu.flag_c());
        assert!(!cpu.flag_b());
    }

    #[test]
    fn test_push_wraps_stack_pointer() {
        let mut cpu = setup_cpu(&[0x48]);
        cpu.set_sp(0x00);
        cpu.set_a(0x11);
        cpu.step();
        assert_eq!(cpu.memory().read(0x0100), 0x11);
        assert_eq!(cpu.sp(), 0xFF);
    }
}
