//! Sound chip register block.

use std::any::Any;

use super::Device;

/// Memory-mapped sound chip registers that log every write.
///
/// Player routines treat chip registers as write-mostly, so reads return the
/// last value written. The log keeps `(offset, value)` in write order; offsets
/// are relative to the chip's base (register numbers on a SID at 0xD400).
///
/// # Examples
///
/// ```rust
/// use replay_cpu::{ChipRegisters, Device};
///
/// let mut sid = ChipRegisters::new(0x20);
/// sid.write(0x18, 0x0F);
/// sid.write(0x18, 0x0E);
/// assert_eq!(sid.register(0x18), 0x0E);
/// assert_eq!(sid.writes(), &[(0x18, 0x0F), (0x18, 0x0E)]);
/// ```
#[derive(Debug, Clone)]
pub struct ChipRegisters {
    registers: Vec<u8>,
    writes: Vec<(u16, u8)>,
}

impl ChipRegisters {
    pub fn new(count: u16) -> Self {
        Self {
            registers: vec![0; count as usize],
            writes: Vec::new(),
        }
    }

    pub fn register(&self, offset: u16) -> u8 {
        self.registers.get(offset as usize).copied().unwrap_or(0)
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn writes(&self) -> &[(u16, u8)] {
        &self.writes
    }

    /// Drains the write log, keeping register values.
    pub fn take_writes(&mut self) -> Vec<(u16, u8)> {
        std::mem::take(&mut self.writes)
    }
}

impl Device for ChipRegisters {
    fn read(&self, offset: u16) -> u8 {
        self.register(offset)
    }

    fn write(&mut self, offset: u16, value: u8) {
        if let Some(slot) = self.registers.get_mut(offset as usize) {
            *slot = value;
            self.writes.push((offset, value));
        }
    }

    fn size(&self) -> u32 {
        self.registers.len() as u32
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_return_last_write() {
        let mut chip = ChipRegisters::new(16);
        chip.write(7, 0x38);
        assert_eq!(chip.read(7), 0x38);
        assert_eq!(chip.read(8), 0x00);
    }

    #[test]
    fn test_take_writes_keeps_registers() {
        let mut chip = ChipRegisters::new(16);
        chip.write(0, 0xFE);
        chip.write(1, 0x01);
        assert_eq!(chip.take_writes(), vec![(0, 0xFE), (1, 0x01)]);
        assert!(chip.writes().is_empty());
        assert_eq!(&chip.registers()[..2], &[0xFE, 0x01]);
    }

    #[test]
    fn test_out_of_range_write_is_not_logged() {
        let mut chip = ChipRegisters::new(4);
        chip.write(4, 0x11);
        assert!(chip.writes().is_empty());
        assert_eq!(chip.read(4), 0x00);
    }
}
