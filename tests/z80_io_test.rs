//! Tests for Z80 port I/O through the `PortBus` hooks.
//!
//! Tests cover:
//! - IN A,(n) / OUT (n),A with the A:n bus address
//! - IN r,(C) / OUT (C),r with the BC bus address
//! - The 8-bit hook defaults reached through the wide forwarding
//! - OTIR streaming a register table to a port

use replay_cpu::{CpuZ80, FlatMemory, MemoryBus, PortBus};

/// Memory plus a log of every port access
struct RecordingBus {
    memory: FlatMemory,
    outs: Vec<(u16, u8)>,
    ins: Vec<u16>,
    input: u8,
}

impl RecordingBus {
    fn new(program: &[u8]) -> Self {
        Self {
            memory: FlatMemory::from_image(0x0000, program).unwrap(),
            outs: Vec::new(),
            ins: Vec::new(),
            input: 0x5C,
        }
    }
}

impl MemoryBus for RecordingBus {
    fn read(&self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.memory.write(addr, value);
    }
}

impl PortBus for RecordingBus {
    fn in_port_wide(&mut self, addr: u16) -> u8 {
        self.ins.push(addr);
        self.input
    }

    fn out_port_wide(&mut self, addr: u16, value: u8) {
        self.outs.push((addr, value));
    }
}

/// Only overrides the 8-bit hooks
struct LowByteBus {
    memory: FlatMemory,
    last_out: Option<(u8, u8)>,
}

impl MemoryBus for LowByteBus {
    fn read(&self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.memory.write(addr, value);
    }
}

impl PortBus for LowByteBus {
    fn in_port(&mut self, port: u8) -> u8 {
        port.wrapping_add(1)
    }

    fn out_port(&mut self, port: u8, value: u8) {
        self.last_out = Some((port, value));
    }
}

#[test]
fn test_out_n_a() {
    // LD A,$07; OUT ($A0),A
    let mut cpu = CpuZ80::new(RecordingBus::new(&[0x3E, 0x07, 0xD3, 0xA0]));
    cpu.step();
    assert_eq!(cpu.step(), 11);
    assert_eq!(cpu.memory().outs, vec![(0x07A0, 0x07)]);
}

#[test]
fn test_in_a_n() {
    // LD A,$12; IN A,($FE)
    let mut cpu = CpuZ80::new(RecordingBus::new(&[0x3E, 0x12, 0xDB, 0xFE]));
    cpu.set_f(0x00);
    cpu.step();
    assert_eq!(cpu.step(), 11);
    assert_eq!(cpu.memory().ins, vec![0x12FE]);
    assert_eq!(cpu.a(), 0x5C);
    // IN A,(n) leaves flags alone
    assert_eq!(cpu.f(), 0x00);
}

#[test]
fn test_in_out_through_c() {
    // LD BC,$FFFD; OUT (C),E; IN D,(C)
    let mut cpu = CpuZ80::new(RecordingBus::new(&[
        0x01, 0xFD, 0xFF, 0xED, 0x59, 0xED, 0x50,
    ]));
    cpu.set_e(0x0E);
    cpu.memory_mut().input = 0x80;

    cpu.step();
    assert_eq!(cpu.step(), 12);
    assert_eq!(cpu.memory().outs, vec![(0xFFFD, 0x0E)]);

    assert_eq!(cpu.step(), 12);
    assert_eq!(cpu.memory().ins, vec![0xFFFD]);
    assert_eq!(cpu.d(), 0x80);
    assert!(cpu.flags().s);
    assert!(!cpu.flags().z);
}

#[test]
fn test_low_byte_hooks_receive_forwarded_port() {
    // LD A,$12; OUT ($FE),A; IN A,($10)
    let memory = FlatMemory::from_image(0x0000, &[0x3E, 0x12, 0xD3, 0xFE, 0xDB, 0x10]).unwrap();
    let mut cpu = CpuZ80::new(LowByteBus {
        memory,
        last_out: None,
    });

    cpu.run_steps(3);
    assert_eq!(cpu.memory().last_out, Some((0xFE, 0x12)));
    assert_eq!(cpu.a(), 0x11);
}

#[test]
fn test_default_hooks_read_floating_bus() {
    let memory = FlatMemory::from_image(0x0000, &[0xDB, 0x10]).unwrap();
    let mut cpu = CpuZ80::new(memory);
    cpu.step();
    assert_eq!(cpu.a(), 0xFF);
}

#[test]
fn test_otir_streams_table() {
    // LD HL,$4000; LD BC,$03A1; OTIR
    let mut cpu = CpuZ80::new(RecordingBus::new(&[
        0x21, 0x00, 0x40, 0x01, 0xA1, 0x03, 0xED, 0xB3,
    ]));
    cpu.memory_mut()
        .memory
        .load(0x4000, &[0x11, 0x22, 0x33])
        .unwrap();

    cpu.run_steps(3);

    // B is decremented before the port address goes out
    assert_eq!(
        cpu.memory().outs,
        vec![(0x02A1, 0x11), (0x01A1, 0x22), (0x00A1, 0x33)]
    );
    assert_eq!(cpu.b(), 0);
    assert_eq!(cpu.hl(), 0x4003);
    assert!(cpu.flags().z);
}
