//! Fuzz target for budgeted subroutine calls on both cores.
//!
//! Arbitrary code must always come back within its budget.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use replay_cpu::{Cpu6502, CpuZ80, FlatMemory};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    z80: bool,
    code: Vec<u8>,
}

const BUDGET_STEPS: u64 = 2_000;
const BUDGET_T_STATES: u64 = 20_000;

fuzz_target!(|input: FuzzInput| {
    let code = &input.code[..input.code.len().min(0x4000)];
    let Ok(memory) = FlatMemory::from_image(0x8000, code) else {
        return;
    };

    if input.z80 {
        let mut cpu = CpuZ80::new(memory);
        cpu.reset(0x8000);
        let outcome = cpu.call_subroutine(0x8000, BUDGET_T_STATES);
        assert!(outcome.returned() || outcome.cycles() >= BUDGET_T_STATES);
    } else {
        let mut cpu = Cpu6502::new(memory);
        cpu.reset(0x8000);
        let outcome = cpu.call_subroutine(0x8000, BUDGET_STEPS);
        assert!(outcome.steps() <= BUDGET_STEPS);
    }
});
