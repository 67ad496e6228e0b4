//! Opcode table validation tests
//!
//! Verifies that the 6502 opcode metadata table is complete and consistent
//! with the dispatcher.

use replay_cpu::{AddressingMode, Cpu6502, FlatMemory, MemoryBus, OPCODE_TABLE};

#[test]
fn test_opcode_table_completeness() {
    assert_eq!(OPCODE_TABLE.len(), 256);

    for (opcode, metadata) in OPCODE_TABLE.iter().enumerate() {
        assert!(
            !metadata.mnemonic.is_empty(),
            "Opcode 0x{:02X} has empty mnemonic",
            opcode
        );
        assert!(
            metadata.base_cycles > 0,
            "Opcode 0x{:02X} ({}) has zero cycles",
            opcode,
            metadata.mnemonic
        );
    }
}

#[test]
fn test_documented_opcode_count() {
    let documented = OPCODE_TABLE.iter().filter(|m| m.documented).count();
    assert_eq!(documented, 151);

    for metadata in OPCODE_TABLE.iter().filter(|m| !m.documented) {
        assert_eq!(metadata.mnemonic, "???");
        assert_eq!(metadata.base_cycles, 4);
    }
}

#[test]
fn test_size_matches_addressing_mode() {
    for (opcode, metadata) in OPCODE_TABLE.iter().enumerate() {
        let expected_size = match metadata.addressing_mode {
            AddressingMode::Implicit | AddressingMode::Accumulator => 1,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 2,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
        };

        assert_eq!(
            metadata.size_bytes, expected_size,
            "Opcode 0x{:02X} ({}) size mismatch: mode {:?} expects {} bytes, got {}",
            opcode, metadata.mnemonic, metadata.addressing_mode, expected_size, metadata.size_bytes
        );
    }
}

#[test]
fn test_known_opcodes() {
    let brk = &OPCODE_TABLE[0x00];
    assert_eq!(brk.mnemonic, "BRK");
    assert_eq!(brk.base_cycles, 7);
    assert_eq!(brk.size_bytes, 1);

    let lda_imm = &OPCODE_TABLE[0xA9];
    assert_eq!(lda_imm.mnemonic, "LDA");
    assert_eq!(lda_imm.base_cycles, 2);
    assert_eq!(lda_imm.size_bytes, 2);

    let jsr = &OPCODE_TABLE[0x20];
    assert_eq!(jsr.mnemonic, "JSR");
    assert_eq!(jsr.base_cycles, 6);

    let jmp_ind = &OPCODE_TABLE[0x6C];
    assert_eq!(jmp_ind.mnemonic, "JMP");
    assert_eq!(jmp_ind.addressing_mode, AddressingMode::Indirect);
    assert_eq!(jmp_ind.base_cycles, 5);

    let sta_ind_y = &OPCODE_TABLE[0x91];
    assert_eq!(sta_ind_y.mnemonic, "STA");
    assert_eq!(sta_ind_y.base_cycles, 6);
}

/// Every non-control documented opcode advances PC by its table size, so the
/// dispatcher and the table agree.
#[test]
fn test_dispatcher_advances_pc_by_table_size() {
    for (opcode, metadata) in OPCODE_TABLE.iter().enumerate() {
        if matches!(
            metadata.mnemonic,
            "BCC" | "BCS" | "BEQ" | "BMI" | "BNE" | "BPL" | "BVC" | "BVS" | "JMP" | "JSR"
                | "RTS" | "RTI" | "BRK"
        ) {
            continue;
        }

        let mut memory = FlatMemory::new();
        memory.write(0x8000, opcode as u8);
        let mut cpu = Cpu6502::new(memory);
        cpu.reset(0x8000);
        cpu.step();

        assert_eq!(
            cpu.pc(),
            0x8000 + metadata.size_bytes as u16,
            "Opcode 0x{:02X} ({}) left PC at 0x{:04X}",
            opcode,
            metadata.mnemonic,
            cpu.pc()
        );
    }
}
