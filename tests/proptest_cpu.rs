//! Property-based tests for CPU invariants.
//!
//! These tests use proptest to check that both cores hold their contracts
//! across arbitrary operands, addresses and (for the robustness properties)
//! arbitrary guest code.

use proptest::prelude::*;
use replay_cpu::{Cpu6502, CpuZ80, FlatMemory, MemoryBus};

const CODE_6502: u16 = 0x1000;
const CODE_Z80: u16 = 0x8000;

/// Any address outside the 16 bytes the test routines occupy
fn data_addr(code: u16) -> impl Strategy<Value = u16> {
    any::<u16>().prop_filter("outside code", move |addr| {
        !(code..code.wrapping_add(16)).contains(addr)
    })
}

proptest! {
    /// "Write V to M; return" leaves memory[M] == V on the 6502.
    #[test]
    fn prop_6502_call_writes_value(value in any::<u8>(), addr in data_addr(CODE_6502)) {
        let [lo, hi] = addr.to_le_bytes();
        // LDA #value; STA addr; RTS
        let program = [0xA9, value, 0x8D, lo, hi, 0x60];
        let mut cpu = Cpu6502::new(FlatMemory::from_image(CODE_6502, &program).unwrap());
        cpu.reset(CODE_6502);

        let outcome = cpu.call_subroutine(CODE_6502, 100);

        prop_assert!(outcome.returned());
        prop_assert_eq!(cpu.memory().read(addr), value);
    }

    /// "Write V to M; return" leaves memory[M] == V on the Z80.
    #[test]
    fn prop_z80_call_writes_value(value in any::<u8>(), addr in data_addr(CODE_Z80)) {
        let [lo, hi] = addr.to_le_bytes();
        // LD A,value; LD (addr),A; RET
        let program = [0x3E, value, 0x32, lo, hi, 0xC9];
        let mut cpu = CpuZ80::new(FlatMemory::from_image(CODE_Z80, &program).unwrap());
        cpu.reset(CODE_Z80);

        let outcome = cpu.call_subroutine(CODE_Z80, 1_000);

        prop_assert!(outcome.returned());
        prop_assert_eq!(cpu.memory().read(addr), value);
    }

    #[test]
    fn prop_6502_lda_immediate_only_loads_a(value in any::<u8>(), x in any::<u8>(), y in any::<u8>()) {
        let mut cpu = Cpu6502::new(FlatMemory::from_image(CODE_6502, &[0xA9, value]).unwrap());
        cpu.reset(CODE_6502);
        cpu.set_x(x);
        cpu.set_y(y);

        cpu.step();

        prop_assert_eq!(cpu.a(), value);
        prop_assert_eq!(cpu.x(), x);
        prop_assert_eq!(cpu.y(), y);
        prop_assert_eq!(cpu.flag_z(), value == 0);
        prop_assert_eq!(cpu.flag_n(), value & 0x80 != 0);
    }

    #[test]
    fn prop_z80_ld_a_immediate_only_loads_a(value in any::<u8>(), bc in any::<u16>(), f in any::<u8>()) {
        let mut cpu = CpuZ80::new(FlatMemory::from_image(0, &[0x3E, value]).unwrap());
        cpu.set_bc(bc);
        cpu.set_f(f);

        cpu.step();

        prop_assert_eq!(cpu.a(), value);
        prop_assert_eq!(cpu.bc(), bc);
        prop_assert_eq!(cpu.f(), f);
    }

    /// Binary ADC agrees with 9-bit arithmetic.
    #[test]
    fn prop_6502_adc_matches_arithmetic(a in any::<u8>(), b in any::<u8>(), carry in any::<bool>()) {
        let mut cpu = Cpu6502::new(FlatMemory::from_image(CODE_6502, &[0x69, b]).unwrap());
        cpu.reset(CODE_6502);
        cpu.set_a(a);
        cpu.set_flag_c(carry);

        cpu.step();

        let sum = a as u16 + b as u16 + carry as u16;
        let overflow = (!(a ^ b) & (a ^ sum as u8)) & 0x80 != 0;
        prop_assert_eq!(cpu.a(), sum as u8);
        prop_assert_eq!(cpu.flag_c(), sum > 0xFF);
        prop_assert_eq!(cpu.flag_v(), overflow);
    }

    /// SUB followed by ADD of the same operand restores A.
    #[test]
    fn prop_z80_sub_add_inverse(a in any::<u8>(), n in any::<u8>()) {
        // SUB n; ADD A,n
        let mut cpu = CpuZ80::new(FlatMemory::from_image(0, &[0xD6, n, 0xC6, n]).unwrap());
        cpu.set_a(a);

        cpu.step();
        prop_assert_eq!(cpu.a(), a.wrapping_sub(n));
        prop_assert_eq!(cpu.flags().c, n > a);

        cpu.step();
        prop_assert_eq!(cpu.a(), a);
    }

    #[test]
    fn prop_z80_flags_round_trip(f in any::<u8>()) {
        let mut cpu = CpuZ80::new(FlatMemory::new());
        cpu.set_f(f);
        prop_assert_eq!(cpu.f(), f);
        prop_assert_eq!(cpu.flags().c, f & 0x01 != 0);
        prop_assert_eq!(cpu.flags().s, f & 0x80 != 0);
    }

    #[test]
    fn prop_z80_push_pop_af(af in any::<u16>(), sp in 0x0100u16..0xFFFF) {
        // PUSH AF; LD A,0; POP AF
        let mut cpu = CpuZ80::new(FlatMemory::from_image(0, &[0xF5, 0x3E, 0x00, 0xF1]).unwrap());
        cpu.set_sp(sp);
        cpu.set_af(af);

        cpu.run_steps(3);

        prop_assert_eq!(cpu.af(), af);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// Arbitrary guest code never panics and always stops within budget.
    #[test]
    fn prop_6502_random_code_is_bounded(code in prop::collection::vec(any::<u8>(), 1..64)) {
        let mut cpu = Cpu6502::new(FlatMemory::from_image(CODE_6502, &code).unwrap());
        cpu.reset(CODE_6502);
        let outcome = cpu.call_subroutine(CODE_6502, 500);
        prop_assert!(outcome.steps() <= 500);
    }

    #[test]
    fn prop_z80_random_code_is_bounded(code in prop::collection::vec(any::<u8>(), 1..64)) {
        let mut cpu = CpuZ80::new(FlatMemory::from_image(CODE_Z80, &code).unwrap());
        cpu.reset(CODE_Z80);
        let outcome = cpu.call_subroutine(CODE_Z80, 5_000);
        prop_assert!(outcome.returned() || outcome.cycles() >= 5_000);
    }
}
