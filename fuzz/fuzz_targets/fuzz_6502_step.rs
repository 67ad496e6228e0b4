//! Fuzz target for 6502 step execution.
//!
//! Builds an arbitrary register state and the memory an instruction can reach
//! from it, then executes one instruction looking for panics.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use replay_cpu::{Cpu6502, FlatMemory, MemoryBus};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
    /// Instruction + operands at 0x8000
    instruction_bytes: [u8; 3],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    /// Target of absolute operands around 0x4000
    main_memory: [u8; 256],
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);
    let _ = memory.load(0x8000, &input.instruction_bytes);
    let _ = memory.load(0x0000, &input.zero_page);
    let _ = memory.load(0x0100, &input.stack_page);
    let _ = memory.load(0x4000, &input.main_memory);

    let mut cpu = Cpu6502::new(memory);
    cpu.reset(0x8000);
    cpu.set_a(input.a);
    cpu.set_x(input.x);
    cpu.set_y(input.y);
    cpu.set_sp(input.sp);
    cpu.set_status(input.status);

    let cycles = cpu.step();

    assert!((2..=8).contains(&cycles));
    assert_eq!(cpu.cycles(), cycles as u64);
});
