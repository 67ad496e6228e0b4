//! End-to-end tests for the player harness with sound-chip capture.
//!
//! Each test builds a small player routine in the shape real music files use
//! (init takes a song number in A, play advances one row) and checks what the
//! host can recover from memory, chip registers and port writes.

use replay_cpu::{
    AyPorts, AyRegisterFile, CaptureBus, ChipRegisters, Cpu6502, CpuZ80, FlatMemory,
    MappedMemory, MemoryBus, MemoryWrite, OutputWindow, Player, PlayerConfig, PlayerError,
    RamDevice,
};

/// 6502 player: init stores the song number in $F0, play walks a note table
/// and writes each note to SID voice 1 frequency-high ($D401).
///
/// ```text
/// $1000 init: STA $F0; LDA #$00; STA $F1; RTS
/// $1007 play: LDX $F1; LDA $1020,X; STA $D401; STA $0400; INC $F1; RTS
/// $1020 notes
/// ```
fn sid_player_image() -> Vec<u8> {
    let mut image = vec![
        0x85, 0xF0, 0xA9, 0x00, 0x85, 0xF1, 0x60, // init
        0xA6, 0xF1, 0xBD, 0x20, 0x10, 0x8D, 0x01, 0xD4, 0x8D, 0x00, 0x04, 0xE6, 0xF1,
        0x60, // play
    ];
    image.resize(0x20, 0xEA);
    image.extend_from_slice(&[0x11, 0x22, 0x33, 0x44]);
    image
}

fn sid_config() -> PlayerConfig {
    PlayerConfig {
        init_addr: 0x1000,
        play_addr: 0x1007,
        init_argument: Some(2),
        output: vec![OutputWindow {
            addr: 0x0400,
            len: 1,
        }],
        require_return: true,
        ..PlayerConfig::default()
    }
}

#[test]
fn test_sid_player_on_flat_memory_with_capture() {
    let memory = FlatMemory::from_image(0x1000, &sid_player_image()).unwrap();
    let bus = CaptureBus::new(memory).with_watch(0xD400..=0xD41C);
    let mut player = Player::new(Cpu6502::new(bus), sid_config()).unwrap();

    assert!(player.init().unwrap().returned());
    assert_eq!(player.cpu().memory().read(0x00F0), 2);

    let rows = player.play_rows(4).unwrap();
    let notes: Vec<u8> = rows.iter().map(|row| row.output[0]).collect();
    assert_eq!(notes, vec![0x11, 0x22, 0x33, 0x44]);

    let writes = player.cpu_mut().memory_mut().take_memory_writes();
    assert_eq!(
        writes,
        vec![
            MemoryWrite { addr: 0xD401, value: 0x11 },
            MemoryWrite { addr: 0xD401, value: 0x22 },
            MemoryWrite { addr: 0xD401, value: 0x33 },
            MemoryWrite { addr: 0xD401, value: 0x44 },
        ]
    );
}

#[test]
fn test_sid_player_on_mapped_memory() {
    let mut ram = RamDevice::new(0x8000);
    ram.load_bytes(0x1000, &sid_player_image());

    let mut memory = MappedMemory::new();
    memory.add_device(0x0000, Box::new(ram)).unwrap();
    memory
        .add_device(0xD400, Box::new(ChipRegisters::new(0x20)))
        .unwrap();

    let mut player = Player::new(Cpu6502::new(memory), sid_config()).unwrap();
    player.init().unwrap();
    player.play_rows(2).unwrap();

    let sid = player
        .cpu_mut()
        .memory_mut()
        .device_mut::<ChipRegisters>(0xD400)
        .unwrap();
    assert_eq!(sid.register(0x01), 0x22);
    assert_eq!(sid.take_writes(), vec![(0x01, 0x11), (0x01, 0x22)]);
}

/// Z80 player writing AY registers through the MSX PSG ports.
///
/// ```text
/// $4000 init: LD HL,$4030; LD ($4040),HL; RET
/// $4007 play: LD HL,($4040); LD A,0; OUT ($A0),A; LD A,(HL); OUT ($A1),A;
///             INC HL; LD ($4040),HL; RET
/// $4030 notes
/// ```
fn msx_player_image() -> Vec<u8> {
    let mut image = vec![
        0x21, 0x30, 0x40, 0x22, 0x40, 0x40, 0xC9, // init
        0x2A, 0x40, 0x40, 0x3E, 0x00, 0xD3, 0xA0, 0x7E, 0xD3, 0xA1, 0x23, 0x22, 0x40, 0x40,
        0xC9, // play
    ];
    image.resize(0x30, 0x00);
    image.extend_from_slice(&[0xFE, 0xD6, 0xAA]);
    image
}

#[test]
fn test_msx_player_ay_capture() {
    let memory = FlatMemory::from_image(0x4000, &msx_player_image()).unwrap();
    let config = PlayerConfig {
        init_addr: 0x4000,
        play_addr: 0x4007,
        require_return: true,
        ..PlayerConfig::default()
    };
    let mut player = Player::new(CpuZ80::new(CaptureBus::new(memory)), config).unwrap();
    player.init().unwrap();

    let mut ay = AyRegisterFile::new(AyPorts::msx());
    let mut tone_a = Vec::new();
    for _ in 0..3 {
        let row = player.play_row().unwrap();
        assert!(row.outcome.returned());
        let writes = player.cpu_mut().memory_mut().take_port_writes();
        ay.feed_all(&writes);
        tone_a.push(ay.register(0));
    }

    assert_eq!(tone_a, vec![0xFE, 0xD6, 0xAA]);
    assert_eq!(ay.writes(), &[(0, 0xFE), (0, 0xD6), (0, 0xAA)]);
}

#[test]
fn test_runaway_z80_play_reports_row() {
    // init: RET; play: JR $
    let memory = FlatMemory::from_image(0x4000, &[0xC9, 0x18, 0xFE]).unwrap();
    let config = PlayerConfig {
        init_addr: 0x4000,
        play_addr: 0x4001,
        play_budget: Some(1_000),
        require_return: true,
        ..PlayerConfig::default()
    };
    let mut player = Player::new(CpuZ80::new(memory), config).unwrap();
    player.init().unwrap();
    assert_eq!(
        player.play_row(),
        Err(PlayerError::PlayDidNotReturn { row: 0 })
    );
}

#[test]
fn test_config_loaded_from_json() {
    let json = r#"{
        "init_addr": 4096,
        "play_addr": 4103,
        "init_argument": 2,
        "output": [{ "addr": 1024, "len": 1 }],
        "require_return": true
    }"#;
    let config: PlayerConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config, sid_config());

    let bad = r#"{ "output": [{ "addr": 65535, "len": 4 }] }"#;
    let config: PlayerConfig = serde_json::from_str(bad).unwrap();
    let memory = FlatMemory::new();
    assert!(matches!(
        Player::new(Cpu6502::new(memory), config),
        Err(PlayerError::InvalidConfig(_))
    ));
}
