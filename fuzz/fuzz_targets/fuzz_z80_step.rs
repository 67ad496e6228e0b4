//! Fuzz target for Z80 step execution.
//!
//! Prefix chains (DD/FD/ED/CB) and block instructions are where decoding bugs
//! hide, so the instruction window is wider than the longest encoding.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use replay_cpu::{CpuZ80, FlatMemory, MemoryBus};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    af: u16,
    bc: u16,
    de: u16,
    hl: u16,
    ix: u16,
    iy: u16,
    sp: u16,
    instruction_bytes: [u8; 8],
    /// Placed at 0x4000 for indexed and (HL) operands
    data: [u8; 256],
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    let _ = memory.load(0x8000, &input.instruction_bytes);
    let _ = memory.load(0x4000, &input.data);

    let mut cpu = CpuZ80::new(memory);
    cpu.reset_with_stack(0x8000, input.sp);
    cpu.set_af(input.af);
    cpu.set_bc(input.bc);
    cpu.set_de(input.de);
    cpu.set_hl(input.hl);
    cpu.set_ix(input.ix);
    cpu.set_iy(input.iy);

    let t_states = cpu.step();

    assert!(t_states >= 4);
    assert_eq!(cpu.cycles(), t_states as u64);
    // F round-trips through the flag struct
    assert_eq!(cpu.af() & 0xFF, cpu.f() as u16);
    let _ = cpu.memory().read(cpu.pc());
});
