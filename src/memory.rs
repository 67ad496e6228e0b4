//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPUs from the
//! host's address map, and the `PortBus` extension the Z80 uses for its separate
//! I/O space.
//!
//! ## Design Principles
//!
//! - No bus errors: reads and writes always succeed
//! - Addresses are `u16`, so every access is already wrapped to 64KB
//! - Port hooks are optional: `in_port` reads 0xFF and `out_port` does nothing
//!   unless the host overrides them

use thiserror::Error;

/// Memory bus trait for CPU to read/write bytes.
///
/// The CPU accesses all memory (player code, data tables, memory-mapped sound
/// chip registers) through this abstraction.
///
/// # Examples
///
/// ```
/// use replay_cpu::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
/// mem.write(0x1234, 0x42);
/// assert_eq!(mem.read(0x1234), 0x42);
/// ```
///
/// ## Implementing Custom Memory
///
/// A backing store smaller than 64KB decides for itself what the high addresses
/// read as:
///
/// ```
/// use replay_cpu::MemoryBus;
///
/// struct SmallImage {
///     data: Vec<u8>,
/// }
///
/// impl MemoryBus for SmallImage {
///     fn read(&self, addr: u16) -> u8 {
///         self.data.get(addr as usize).copied().unwrap_or(0)
///     }
///
///     fn write(&mut self, addr: u16, value: u8) {
///         if let Some(slot) = self.data.get_mut(addr as usize) {
///             *slot = value;
///         }
///     }
/// }
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// This method must never panic.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// This method must never panic. Read-only or unmapped addresses may ignore
    /// the write.
    fn write(&mut self, addr: u16, value: u8);
}

/// I/O port hooks for the Z80.
///
/// Player code signals "write register R of the sound chip" through `OUT`
/// instructions, so this is usually where a host captures its output.
///
/// Both hooks are optional. The CPU always calls the `_wide` variants with the
/// full 16-bit bus address (A:n for `IN A,(n)`/`OUT (n),A`, BC for the `(C)`
/// forms); by default those forward the low byte to `in_port`/`out_port`.
/// Machines that decode the high byte, like the ZX Spectrum's AY at
/// 0xFFFD/0xBFFD, override the wide variants instead.
///
/// # Examples
///
/// ```
/// use replay_cpu::{MemoryBus, PortBus};
///
/// struct Beeper {
///     ram: Vec<u8>,
///     last_out: Option<(u8, u8)>,
/// }
///
/// impl MemoryBus for Beeper {
///     fn read(&self, addr: u16) -> u8 { self.ram[addr as usize] }
///     fn write(&mut self, addr: u16, value: u8) { self.ram[addr as usize] = value; }
/// }
///
/// impl PortBus for Beeper {
///     fn out_port(&mut self, port: u8, value: u8) {
///         self.last_out = Some((port, value));
///     }
/// }
///
/// let mut bus = Beeper { ram: vec![0; 0x10000], last_out: None };
/// bus.out_port_wide(0x12FE, 0x07);
/// assert_eq!(bus.last_out, Some((0xFE, 0x07)));
/// assert_eq!(bus.in_port(0xFE), 0xFF);
/// ```
pub trait PortBus: MemoryBus {
    /// Reads a byte from an 8-bit I/O port. Defaults to 0xFF (floating bus).
    fn in_port(&mut self, _port: u8) -> u8 {
        0xFF
    }

    /// Writes a byte to an 8-bit I/O port. Defaults to a no-op.
    fn out_port(&mut self, _port: u8, _value: u8) {}

    /// Reads with the full 16-bit address the Z80 places on the bus.
    fn in_port_wide(&mut self, addr: u16) -> u8 {
        self.in_port(addr as u8)
    }

    /// Writes with the full 16-bit address the Z80 places on the bus.
    fn out_port_wide(&mut self, addr: u16, value: u8) {
        self.out_port(addr as u8, value)
    }
}

impl<T: MemoryBus + ?Sized> MemoryBus for &mut T {
    fn read(&self, addr: u16) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        (**self).write(addr, value)
    }
}

impl<T: PortBus + ?Sized> PortBus for &mut T {
    fn in_port(&mut self, port: u8) -> u8 {
        (**self).in_port(port)
    }

    fn out_port(&mut self, port: u8, value: u8) {
        (**self).out_port(port, value)
    }

    fn in_port_wide(&mut self, addr: u16) -> u8 {
        (**self).in_port_wide(addr)
    }

    fn out_port_wide(&mut self, addr: u16, value: u8) {
        (**self).out_port_wide(addr, value)
    }
}

impl<T: MemoryBus + ?Sized> MemoryBus for Box<T> {
    fn read(&self, addr: u16) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        (**self).write(addr, value)
    }
}

impl<T: PortBus + ?Sized> PortBus for Box<T> {
    fn in_port(&mut self, port: u8) -> u8 {
        (**self).in_port(port)
    }

    fn out_port(&mut self, port: u8, value: u8) {
        (**self).out_port(port, value)
    }

    fn in_port_wide(&mut self, addr: u16) -> u8 {
        (**self).in_port_wide(addr)
    }

    fn out_port_wide(&mut self, addr: u16, value: u8) {
        (**self).out_port_wide(addr, value)
    }
}

/// Error returned when a code/data image cannot be placed in memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The image would run past the top of the 64KB address space.
    #[error("image of {len} bytes at 0x{load_addr:04X} runs past 0xFFFF")]
    DoesNotFit {
        /// Requested load address
        load_addr: u16,
        /// Image length in bytes
        len: usize,
    },
}

/// Simple 64KB flat memory implementation.
///
/// All 65536 addresses are writable RAM initialized to 0x00. This is the usual
/// backing store for an extracted player: poke the file's code and data at their
/// original load addresses and hand the memory to a CPU.
///
/// # Examples
///
/// ```
/// use replay_cpu::{FlatMemory, MemoryBus};
///
/// let mem = FlatMemory::from_image(0xC000, &[0xEA, 0x60]).unwrap();
/// assert_eq!(mem.read(0xC000), 0xEA);
/// assert_eq!(mem.read(0xC001), 0x60);
/// ```
pub struct FlatMemory {
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Creates memory with `bytes` loaded at `load_addr`.
    pub fn from_image(load_addr: u16, bytes: &[u8]) -> Result<Self, ImageError> {
        let mut memory = Self::new();
        memory.load(load_addr, bytes)?;
        Ok(memory)
    }

    /// Copies `bytes` into memory starting at `load_addr`.
    ///
    /// Fails without writing anything if the image would run past 0xFFFF.
    pub fn load(&mut self, load_addr: u16, bytes: &[u8]) -> Result<(), ImageError> {
        let start = load_addr as usize;
        let end = start + bytes.len();
        if end > self.data.len() {
            return Err(ImageError::DoesNotFit {
                load_addr,
                len: bytes.len(),
            });
        }
        self.data[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Returns the whole address space as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}

impl PortBus for FlatMemory {}
