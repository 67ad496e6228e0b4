//! Address-mapped devices for building a player's host machine.
//!
//! Most extracted players run fine on a `FlatMemory`. `MappedMemory` is for the
//! cases where the host wants the guest's view of the machine to be partial:
//! RAM only where the file loads, a sound chip's register block at its real
//! address, and everything else floating.
//!
//! # Example
//!
//! ```rust
//! use replay_cpu::{ChipRegisters, Cpu6502, MappedMemory, MemoryBus, RamDevice};
//!
//! let mut memory = MappedMemory::new();
//! memory.add_device(0x0000, Box::new(RamDevice::new(0x8000))).unwrap();
//! memory.add_device(0xD400, Box::new(ChipRegisters::new(0x20))).unwrap();
//!
//! // LDA #$0F; STA $D418; RTS
//! for (i, byte) in [0xA9, 0x0F, 0x8D, 0x18, 0xD4, 0x60].into_iter().enumerate() {
//!     memory.write(0x1000 + i as u16, byte);
//! }
//!
//! let mut cpu = Cpu6502::new(memory);
//! cpu.reset(0x1000);
//! cpu.call_subroutine(0x1000, 100);
//!
//! let sid = cpu.memory_mut().device_mut::<ChipRegisters>(0xD400).unwrap();
//! assert_eq!(sid.take_writes(), vec![(0x18, 0x0F)]);
//! ```

use std::any::Any;

use thiserror::Error;

use crate::{MemoryBus, PortBus};

pub mod chip;
pub mod ram;

pub use chip::ChipRegisters;
pub use ram::RamDevice;

/// A block of registers or storage mapped into the address or port space.
///
/// Devices see offsets (0 to size-1), never absolute addresses, so the same
/// device can sit at any base.
///
/// # Examples
///
/// ```rust
/// use std::any::Any;
/// use replay_cpu::Device;
///
/// struct Latch(u8);
///
/// impl Device for Latch {
///     fn read(&self, _offset: u16) -> u8 {
///         self.0
///     }
///
///     fn write(&mut self, _offset: u16, value: u8) {
///         self.0 = value;
///     }
///
///     fn size(&self) -> u32 {
///         1
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn as_any_mut(&mut self) -> &mut dyn Any {
///         self
///     }
/// }
/// ```
pub trait Device {
    /// Reads the byte at `offset`. Must not panic for any offset below `size()`.
    fn read(&self, offset: u16) -> u8;

    /// Writes the byte at `offset`.
    fn write(&mut self, offset: u16, value: u8);

    /// Number of addresses the device occupies (up to 0x10000).
    fn size(&self) -> u32;

    /// For downcasting a mapped device back to its concrete type.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Error returned when a device cannot be mapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The new device's range overlaps one that is already mapped.
    #[error(
        "device at 0x{new_base:04X} ({new_size} bytes) overlaps device at 0x{existing_base:04X} ({existing_size} bytes)"
    )]
    Overlap {
        new_base: u16,
        new_size: u32,
        existing_base: u16,
        existing_size: u32,
    },

    /// The device would extend past the top of its address space.
    #[error("device at 0x{base:04X} ({size} bytes) does not fit below 0x{limit:X}")]
    OutOfRange { base: u16, size: u32, limit: u32 },
}

struct DeviceMapping {
    base: u16,
    device: Box<dyn Device>,
}

impl DeviceMapping {
    fn end(&self) -> u32 {
        self.base as u32 + self.device.size()
    }

    fn offset_of(&self, addr: u16) -> Option<u16> {
        let addr32 = addr as u32;
        (addr32 >= self.base as u32 && addr32 < self.end()).then(|| addr - self.base)
    }
}

/// An ordered set of non-overlapping device mappings.
#[derive(Default)]
struct DeviceMap {
    mappings: Vec<DeviceMapping>,
}

impl DeviceMap {
    fn insert(&mut self, base: u16, device: Box<dyn Device>, limit: u32) -> Result<(), DeviceError> {
        let size = device.size();
        let end = base as u32 + size;
        if size == 0 || end > limit {
            return Err(DeviceError::OutOfRange { base, size, limit });
        }

        if let Some(existing) = self
            .mappings
            .iter()
            .find(|m| (base as u32) < m.end() && end > m.base as u32)
        {
            return Err(DeviceError::Overlap {
                new_base: base,
                new_size: size,
                existing_base: existing.base,
                existing_size: existing.device.size(),
            });
        }

        self.mappings.push(DeviceMapping { base, device });
        Ok(())
    }

    fn find(&self, addr: u16) -> Option<(&dyn Device, u16)> {
        self.mappings
            .iter()
            .find_map(|m| m.offset_of(addr).map(|offset| (m.device.as_ref(), offset)))
    }

    fn find_mut(&mut self, addr: u16) -> Option<(&mut (dyn Device + 'static), u16)> {
        self.mappings.iter_mut().find_map(|m| {
            let offset = m.offset_of(addr)?;
            Some((m.device.as_mut(), offset))
        })
    }

    fn at_base(&self, base: u16) -> Option<&dyn Device> {
        self.mappings
            .iter()
            .find(|m| m.base == base)
            .map(|m| m.device.as_ref())
    }

    fn at_base_mut(&mut self, base: u16) -> Option<&mut (dyn Device + 'static)> {
        self.mappings
            .iter_mut()
            .find(|m| m.base == base)
            .map(|m| m.device.as_mut())
    }
}

/// Memory mapper that routes accesses to registered devices.
///
/// Memory and the Z80's 8-bit port space are mapped separately. Unmapped reads
/// return the unmapped value (0xFF by default, a floating bus) and unmapped
/// writes are dropped.
///
/// # Examples
///
/// ```rust
/// use replay_cpu::{MappedMemory, MemoryBus, PortBus, RamDevice};
///
/// let mut memory = MappedMemory::new();
/// memory.add_device(0x0000, Box::new(RamDevice::new(0x4000))).unwrap();
/// memory.add_port_device(0xA0, Box::new(RamDevice::new(2))).unwrap();
///
/// memory.write(0x1234, 0x42);
/// assert_eq!(memory.read(0x1234), 0x42);
/// assert_eq!(memory.read(0x8000), 0xFF);
///
/// memory.out_port(0xA1, 0x38);
/// assert_eq!(memory.in_port(0xA1), 0x38);
/// assert_eq!(memory.in_port(0x10), 0xFF);
/// ```
pub struct MappedMemory {
    memory: DeviceMap,
    ports: DeviceMap,
    unmapped_value: u8,
}

impl MappedMemory {
    pub fn new() -> Self {
        Self::with_unmapped_value(0xFF)
    }

    /// Mapper whose unmapped addresses and ports read as `value`.
    pub fn with_unmapped_value(value: u8) -> Self {
        Self {
            memory: DeviceMap::default(),
            ports: DeviceMap::default(),
            unmapped_value: value,
        }
    }

    pub fn unmapped_value(&self) -> u8 {
        self.unmapped_value
    }

    /// Maps `device` at `base` in the memory space.
    ///
    /// ```rust
    /// use replay_cpu::{MappedMemory, RamDevice};
    ///
    /// let mut memory = MappedMemory::new();
    /// memory.add_device(0x0000, Box::new(RamDevice::new(0x4000))).unwrap();
    /// assert!(memory.add_device(0x1000, Box::new(RamDevice::new(0x400))).is_err());
    /// ```
    pub fn add_device(&mut self, base: u16, device: Box<dyn Device>) -> Result<(), DeviceError> {
        self.memory.insert(base, device, 0x1_0000)
    }

    /// Maps `device` at `base` in the 8-bit port space.
    ///
    /// Port accesses are routed on the low byte of the bus address.
    pub fn add_port_device(&mut self, base: u8, device: Box<dyn Device>) -> Result<(), DeviceError> {
        self.ports.insert(base as u16, device, 0x100)
    }

    /// The memory device mapped at exactly `base`, as its concrete type.
    pub fn device<T: Any>(&self, base: u16) -> Option<&T> {
        self.memory.at_base(base)?.as_any().downcast_ref()
    }

    pub fn device_mut<T: Any>(&mut self, base: u16) -> Option<&mut T> {
        self.memory.at_base_mut(base)?.as_any_mut().downcast_mut()
    }

    /// The port device mapped at exactly `base`, as its concrete type.
    pub fn port_device<T: Any>(&self, base: u8) -> Option<&T> {
        self.ports.at_base(base as u16)?.as_any().downcast_ref()
    }

    pub fn port_device_mut<T: Any>(&mut self, base: u8) -> Option<&mut T> {
        self.ports
            .at_base_mut(base as u16)?
            .as_any_mut()
            .downcast_mut()
    }
}

impl Default for MappedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for MappedMemory {
    fn read(&self, addr: u16) -> u8 {
        match self.memory.find(addr) {
            Some((device, offset)) => device.read(offset),
            None => self.unmapped_value,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some((device, offset)) = self.memory.find_mut(addr) {
            device.write(offset, value);
        }
    }
}

impl PortBus for MappedMemory {
    fn in_port(&mut self, port: u8) -> u8 {
        match self.ports.find(port as u16) {
            Some((device, offset)) => device.read(offset),
            None => self.unmapped_value,
        }
    }

    fn out_port(&mut self, port: u8, value: u8) {
        if let Some((device, offset)) = self.ports.find_mut(port as u16) {
            device.write(offset, value);
        }
    }
}
