//! # Sound-Chip Write Capture
//!
//! `CaptureBus` wraps any bus and logs the writes a player routine makes to its
//! sound chip: memory writes inside watched ranges (a SID at 0xD400, say) and
//! every `OUT` to an I/O port. `AyRegisterFile` turns a port-write log back into
//! AY-3-8910 register state.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{MemoryBus, PortBus};

/// One captured `OUT`, with the full 16-bit port address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortWrite {
    pub port: u16,
    pub value: u8,
}

/// One captured write to a watched memory range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryWrite {
    pub addr: u16,
    pub value: u8,
}

/// Bus wrapper that records sound-chip writes in program order.
///
/// Reads and writes pass through to the wrapped bus unchanged.
///
/// # Examples
///
/// ```
/// use replay_cpu::{CaptureBus, Cpu6502, FlatMemory, MemoryWrite};
///
/// // LDA #$0F; STA $D418; STA $0400; RTS
/// let image = [0xA9, 0x0F, 0x8D, 0x18, 0xD4, 0x8D, 0x00, 0x04, 0x60];
/// let mut bus = CaptureBus::new(FlatMemory::from_image(0x1000, &image).unwrap());
/// bus.watch(0xD400..=0xD41C);
///
/// let mut cpu = Cpu6502::new(bus);
/// cpu.reset(0x1000);
/// cpu.call_subroutine(0x1000, 100);
///
/// let writes = cpu.memory_mut().take_memory_writes();
/// assert_eq!(writes, vec![MemoryWrite { addr: 0xD418, value: 0x0F }]);
/// ```
#[derive(Debug, Default)]
pub struct CaptureBus<B> {
    inner: B,
    watched: Vec<RangeInclusive<u16>>,
    memory_writes: Vec<MemoryWrite>,
    port_writes: Vec<PortWrite>,
}

impl<B> CaptureBus<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            watched: Vec::new(),
            memory_writes: Vec::new(),
            port_writes: Vec::new(),
        }
    }

    /// Records memory writes that land in `range` from now on.
    pub fn watch(&mut self, range: RangeInclusive<u16>) {
        self.watched.push(range);
    }

    /// Builder form of `watch`.
    pub fn with_watch(mut self, range: RangeInclusive<u16>) -> Self {
        self.watch(range);
        self
    }

    fn is_watched(&self, addr: u16) -> bool {
        self.watched.iter().any(|range| range.contains(&addr))
    }

    pub fn memory_writes(&self) -> &[MemoryWrite] {
        &self.memory_writes
    }

    pub fn port_writes(&self) -> &[PortWrite] {
        &self.port_writes
    }

    /// Drains the memory-write log.
    pub fn take_memory_writes(&mut self) -> Vec<MemoryWrite> {
        std::mem::take(&mut self.memory_writes)
    }

    /// Drains the port-write log.
    pub fn take_port_writes(&mut self) -> Vec<PortWrite> {
        std::mem::take(&mut self.port_writes)
    }

    /// Empties both logs. Watched ranges are kept.
    pub fn clear(&mut self) {
        self.memory_writes.clear();
        self.port_writes.clear();
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: MemoryBus> MemoryBus for CaptureBus<B> {
    fn read(&self, addr: u16) -> u8 {
        self.inner.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        if self.is_watched(addr) {
            self.memory_writes.push(MemoryWrite { addr, value });
        }
        self.inner.write(addr, value);
    }
}

impl<B: PortBus> PortBus for CaptureBus<B> {
    fn in_port(&mut self, port: u8) -> u8 {
        self.inner.in_port(port)
    }

    fn out_port(&mut self, port: u8, value: u8) {
        self.port_writes.push(PortWrite {
            port: port as u16,
            value,
        });
        self.inner.out_port(port, value);
    }

    fn in_port_wide(&mut self, addr: u16) -> u8 {
        self.inner.in_port_wide(addr)
    }

    fn out_port_wide(&mut self, addr: u16, value: u8) {
        self.port_writes.push(PortWrite { port: addr, value });
        self.inner.out_port_wide(addr, value);
    }
}

/// Register-select and data port addresses of an AY-3-8910.
///
/// A port write matches when `port & mask == select & mask` (or `data`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AyPorts {
    pub select: u16,
    pub data: u16,
    pub mask: u16,
}

impl AyPorts {
    /// ZX Spectrum 128: select at 0xFFFD, data at 0xBFFD, decoded on A15, A14
    /// and A1.
    pub const SPECTRUM: AyPorts = AyPorts {
        select: 0xFFFD,
        data: 0xBFFD,
        mask: 0xC002,
    };

    /// MSX PSG: select at 0xA0, data at 0xA1, decoded on the low byte.
    pub const fn msx() -> AyPorts {
        AyPorts {
            select: 0x00A0,
            data: 0x00A1,
            mask: 0x00FF,
        }
    }

    fn is_select(&self, port: u16) -> bool {
        port & self.mask == self.select & self.mask
    }

    fn is_data(&self, port: u16) -> bool {
        port & self.mask == self.data & self.mask
    }
}

/// Number of AY-3-8910 registers.
pub const AY_REGISTER_COUNT: usize = 16;

/// AY-3-8910 register state rebuilt from captured port writes.
///
/// # Examples
///
/// ```
/// use replay_cpu::{AyPorts, AyRegisterFile, PortWrite};
///
/// let mut ay = AyRegisterFile::new(AyPorts::SPECTRUM);
/// ay.feed_all(&[
///     PortWrite { port: 0xFFFD, value: 7 },
///     PortWrite { port: 0xBFFD, value: 0x38 },
/// ]);
/// assert_eq!(ay.register(7), 0x38);
/// assert_eq!(ay.writes(), &[(7, 0x38)]);
/// ```
#[derive(Debug, Clone)]
pub struct AyRegisterFile {
    ports: AyPorts,
    selected: Option<u8>,
    registers: [u8; AY_REGISTER_COUNT],
    writes: Vec<(u8, u8)>,
}

impl AyRegisterFile {
    pub fn new(ports: AyPorts) -> Self {
        Self {
            ports,
            selected: None,
            registers: [0; AY_REGISTER_COUNT],
            writes: Vec::new(),
        }
    }

    /// Applies one port write. Writes to other ports are ignored.
    ///
    /// Selecting a register number above 15 deselects, so the following data
    /// writes are dropped, as on the chip.
    pub fn feed(&mut self, write: &PortWrite) {
        if self.ports.is_select(write.port) {
            self.selected = (write.value < AY_REGISTER_COUNT as u8).then_some(write.value);
        } else if self.ports.is_data(write.port) {
            if let Some(register) = self.selected {
                self.registers[register as usize] = write.value;
                self.writes.push((register, write.value));
            }
        }
    }

    pub fn feed_all<'a>(&mut self, writes: impl IntoIterator<Item = &'a PortWrite>) {
        for write in writes {
            self.feed(write);
        }
    }

    /// Currently selected register, if any.
    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    pub fn register(&self, index: u8) -> u8 {
        self.registers[index as usize % AY_REGISTER_COUNT]
    }

    pub fn registers(&self) -> &[u8; AY_REGISTER_COUNT] {
        &self.registers
    }

    /// `(register, value)` pairs in the order they were written.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    /// Drains the write list, keeping register state.
    pub fn take_writes(&mut self) -> Vec<(u8, u8)> {
        std::mem::take(&mut self.writes)
    }
}
