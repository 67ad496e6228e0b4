//! # Player Routine Interpreters
//!
//! Instruction-accurate MOS 6502 and Zilog Z80 interpreters for running the
//! machine-code player routines embedded in legacy music files.
//!
//! Many old module formats store playback logic as code rather than data. The
//! only dependable way to recover their pattern rows is to run the original
//! player: call its init routine once, call its play routine once per row, and
//! watch what it writes to memory or to the sound chip's I/O ports.
//!
//! ## Quick Start
//!
//! ```rust
//! use replay_cpu::{Cpu6502, FlatMemory, MemoryBus};
//!
//! // LDA #$2A; STA $0200; RTS
//! let memory = FlatMemory::from_image(0x1000, &[0xA9, 0x2A, 0x8D, 0x00, 0x02, 0x60]).unwrap();
//!
//! let mut cpu = Cpu6502::new(memory);
//! cpu.reset(0x1000);
//!
//! let outcome = cpu.call_subroutine(0x1000, 1_000);
//! assert!(outcome.returned());
//! assert_eq!(cpu.memory().read(0x0200), 0x2A);
//! ```
//!
//! ## Architecture
//!
//! - **Memory is external**: CPUs are generic over the `MemoryBus` trait (and
//!   `PortBus` for the Z80's I/O space); the host owns the address map.
//! - **Never fails on guest code**: unknown opcodes degrade to timed no-ops and
//!   runaway routines are stopped by an explicit call budget.
//! - **Uniform driver contract**: both cores implement `GuestCpu`, so the
//!   `Player` harness drives either one.
//!
//! ## Modules
//!
//! - `memory` - MemoryBus/PortBus traits and the flat 64KB implementation
//! - `devices` - Address-mapped devices (RAM, sound chip register files)
//! - `call` - Subroutine call outcome and the `GuestCpu` driver trait
//! - `mos6502` - The 6502 core, its opcode table and addressing modes
//! - `z80` - The Z80 core with its CB/ED/DD/FD decoders
//! - `capture` - Bus wrapper that logs sound-chip writes, plus an AY decoder
//! - `player` - Init/play harness configured by `PlayerConfig`

pub mod call;
pub mod capture;
pub mod devices;
pub mod memory;
pub mod mos6502;
pub mod player;
pub mod z80;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use call::{CallOutcome, GuestCpu};
pub use capture::{AyPorts, AyRegisterFile, CaptureBus, MemoryWrite, PortWrite};
pub use devices::{ChipRegisters, Device, DeviceError, MappedMemory, RamDevice};
pub use memory::{FlatMemory, ImageError, MemoryBus, PortBus};
pub use mos6502::{AddressingMode, Cpu6502, OpcodeMetadata, DEFAULT_6502_CALL_BUDGET, OPCODE_TABLE};
pub use player::{OutputWindow, Player, PlayerConfig, PlayerError, Row};
pub use z80::{CpuZ80, Flags, DEFAULT_STACK_TOP, DEFAULT_Z80_CALL_BUDGET};
