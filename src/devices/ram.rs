//! Plain read/write storage.

use std::any::Any;

use super::Device;

/// RAM of any size up to the full 64KB.
///
/// # Examples
///
/// ```rust
/// use replay_cpu::{Device, RamDevice};
///
/// let mut ram = RamDevice::from_bytes(vec![0xA9, 0x2A, 0x60]);
/// assert_eq!(ram.size(), 3);
/// ram.write(1, 0x10);
/// assert_eq!(ram.read(1), 0x10);
/// ```
pub struct RamDevice {
    data: Vec<u8>,
}

impl RamDevice {
    /// Zero-filled RAM of `size` bytes (clamped to 0x10000).
    pub fn new(size: u32) -> Self {
        Self {
            data: vec![0; size.min(0x1_0000) as usize],
        }
    }

    /// RAM preloaded with `bytes`, sized to fit them (truncated at 0x10000).
    pub fn from_bytes(mut bytes: Vec<u8>) -> Self {
        bytes.truncate(0x1_0000);
        Self { data: bytes }
    }

    /// Copies `bytes` in at `offset`. Bytes past the end are dropped.
    pub fn load_bytes(&mut self, offset: u16, bytes: &[u8]) {
        let start = (offset as usize).min(self.data.len());
        let end = (start + bytes.len()).min(self.data.len());
        self.data[start..end].copy_from_slice(&bytes[..end - start]);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Device for RamDevice {
    fn read(&self, offset: u16) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0)
    }

    fn write(&mut self, offset: u16, value: u8) {
        if let Some(slot) = self.data.get_mut(offset as usize) {
            *slot = value;
        }
    }

    fn size(&self) -> u32 {
        self.data.len() as u32
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
