//! # Opcode Metadata Table
//!
//! The complete 256-entry table that is the single source of truth for 6502
//! instruction metadata: mnemonic, addressing mode, base cycle cost and size.
//!
//! - **151 documented instructions** carry their NMOS timings.
//! - **105 undocumented opcodes** are marked "???". They execute as no-ops that
//!   cost `UNDOCUMENTED_CYCLES`, but keep the operand length their column implies
//!   so the operand bytes are skipped rather than run as code.

use super::addressing::AddressingMode;
use super::addressing::AddressingMode::*;

/// Cycle cost charged for an undocumented opcode.
pub const UNDOCUMENTED_CYCLES: u8 = 4;

/// Metadata for a single 6502 opcode.
///
/// # Examples
///
/// ```
/// use replay_cpu::{AddressingMode, OPCODE_TABLE};
///
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, "LDA");
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// assert_eq!(lda_imm.size_bytes, 2);
/// assert!(lda_imm.documented);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic (e.g., "LDA", "STA", "???" for undocumented opcodes).
    pub mnemonic: &'static str,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Base cycle cost (before page crossing and branch penalties).
    pub base_cycles: u8,

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,

    /// Whether this is an official NMOS 6502 instruction.
    pub documented: bool,
}

const fn op(mnemonic: &'static str, addressing_mode: AddressingMode, base_cycles: u8) -> OpcodeMetadata {
    OpcodeMetadata {
        mnemonic,
        addressing_mode,
        base_cycles,
        size_bytes: 1 + addressing_mode.operand_bytes(),
        documented: true,
    }
}

const fn undocumented(addressing_mode: AddressingMode) -> OpcodeMetadata {
    OpcodeMetadata {
        mnemonic: "???",
        addressing_mode,
        base_cycles: UNDOCUMENTED_CYCLES,
        size_bytes: 1 + addressing_mode.operand_bytes(),
        documented: false,
    }
}

/// Complete 256-entry opcode metadata table indexed by opcode byte value.
///
/// # Examples
///
/// ```
/// use replay_cpu::OPCODE_TABLE;
///
/// let brk = &OPCODE_TABLE[0x00];
/// assert_eq!((brk.mnemonic, brk.base_cycles, brk.size_bytes), ("BRK", 7, 1));
///
/// // Undocumented NOP $nnnn,X still spans three bytes
/// let skip = &OPCODE_TABLE[0x1C];
/// assert_eq!(skip.mnemonic, "???");
/// assert_eq!(skip.size_bytes, 3);
/// ```
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = [
    /* 0x00 */ op("BRK", Implicit, 7),
    /* 0x01 */ op("ORA", IndirectX, 6),
    /* 0x02 */ undocumented(Implicit),
    /* 0x03 */ undocumented(IndirectX),
    /* 0x04 */ undocumented(ZeroPage),
    /* 0x05 */ op("ORA", ZeroPage, 3),
    /* 0x06 */ op("ASL", ZeroPage, 5),
    /* 0x07 */ undocumented(ZeroPage),
    /* 0x08 */ op("PHP", Implicit, 3),
    /* 0x09 */ op("ORA", Immediate, 2),
    /* 0x0A */ op("ASL", Accumulator, 2),
    /* 0x0B */ undocumented(Immediate),
    /* 0x0C */ undocumented(Absolute),
    /* 0x0D */ op("ORA", Absolute, 4),
    /* 0x0E */ op("ASL", Absolute, 6),
    /* 0x0F */ undocumented(Absolute),
    /* 0x10 */ op("BPL", Relative, 2),
    /* 0x11 */ op("ORA", IndirectY, 5),
    /* 0x12 */ undocumented(Implicit),
    /* 0x13 */ undocumented(IndirectY),
    /* 0x14 */ undocumented(ZeroPageX),
    /* 0x15 */ op("ORA", ZeroPageX, 4),
    /* 0x16 */ op("ASL", ZeroPageX, 6),
    /* 0x17 */ undocumented(ZeroPageX),
    /* 0x18 */ op("CLC", Implicit, 2),
    /* 0x19 */ op("ORA", AbsoluteY, 4),
    /* 0x1A */ undocumented(Implicit),
    /* 0x1B */ undocumented(AbsoluteY),
    /* 0x1C */ undocumented(AbsoluteX),
    /* 0x1D */ op("ORA", AbsoluteX, 4),
    /* 0x1E */ op("ASL", AbsoluteX, 7),
    /* 0x1F */ undocumented(AbsoluteX),
    /* 0x20 */ op("JSR", Absolute, 6),
    /* 0x21 */ op("AND", IndirectX, 6),
    /* 0x22 */ undocumented(Implicit),
    /* 0x23 */ undocumented(IndirectX),
    /* 0x24 */ op("BIT", ZeroPage, 3),
    /* 0x25 */ op("AND", ZeroPage, 3),
    /* 0x26 */ op("ROL", ZeroPage, 5),
    /* 0x27 */ undocumented(ZeroPage),
    /* 0x28 */ op("PLP", Implicit, 4),
    /* 0x29 */ op("AND", Immediate, 2),
    /* 0x2A */ op("ROL", Accumulator, 2),
    /* 0x2B */ undocumented(Immediate),
    /* 0x2C */ op("BIT", Absolute, 4),
    /* 0x2D */ op("AND", Absolute, 4),
    /* 0x2E */ op("ROL", Absolute, 6),
    /* 0x2F */ undocumented(Absolute),
    /* 0x30 */ op("BMI", Relative, 2),
    /* 0x31 */ op("AND", IndirectY, 5),
    /* 0x32 */ undocumented(Implicit),
    /* 0x33 */ undocumented(IndirectY),
    /* 0x34 */ undocumented(ZeroPageX),
    /* 0x35 */ op("AND", ZeroPageX, 4),
    /* 0x36 */ op("ROL", ZeroPageX, 6),
    /* 0x37 */ undocumented(ZeroPageX),
    /* 0x38 */ op("SEC", Implicit, 2),
    /* 0x39 */ op("AND", AbsoluteY, 4),
    /* 0x3A */ undocumented(Implicit),
    /* 0x3B */ undocumented(AbsoluteY),
    /* 0x3C */ undocumented(AbsoluteX),
    /* 0x3D */ op("AND", AbsoluteX, 4),
    /* 0x3E */ op("ROL", AbsoluteX, 7),
    /* 0x3F */ undocumented(AbsoluteX),
    /* 0x40 */ op("RTI", Implicit, 6),
    /* 0x41 */ op("EOR", IndirectX, 6),
    /* 0x42 */ undocumented(Implicit),
    /* 0x43 */ undocumented(IndirectX),
    /* 0x44 */ undocumented(ZeroPage),
    /* 0x45 */ op("EOR", ZeroPage, 3),
    /* 0x46 */ op("LSR", ZeroPage, 5),
    /* 0x47 */ undocumented(ZeroPage),
    /* 0x48 */ op("PHA", Implicit, 3),
    /* 0x49 */ op("EOR", Immediate, 2),
    /* 0x4A */ op("LSR", Accumulator, 2),
    /* 0x4B */ undocumented(Immediate),
    /* 0x4C */ op("JMP", Absolute, 3),
    /* 0x4D */ op("EOR", Absolute, 4),
    /* 0x4E */ op("LSR", Absolute, 6),
    /* 0x4F */ undocumented(Absolute),
    /* 0x50 */ op("BVC", Relative, 2),
    /* 0x51 */ op("EOR", IndirectY, 5),
    /* 0x52 */ undocumented(Implicit),
    /* 0x53 */ undocumented(IndirectY),
    /* 0x54 */ undocumented(ZeroPageX),
    /* 0x55 */ op("EOR", ZeroPageX, 4),
    /* 0x56 */ op("LSR", ZeroPageX, 6),
    /* 0x57 */ undocumented(ZeroPageX),
    /* 0x58 */ op("CLI", Implicit, 2),
    /* 0x59 */ op("EOR", AbsoluteY, 4),
    /* 0x5A */ undocumented(Implicit),
    /* 0x5B */ undocumented(AbsoluteY),
    /* 0x5C */ undocumented(AbsoluteX),
    /* 0x5D */ op("EOR", AbsoluteX, 4),
    /* 0x5E */ op("LSR", AbsoluteX, 7),
    /* 0x5F */ undocumented(AbsoluteX),
    /* 0x60 */ op("RTS", Implicit, 6),
    /* 0x61 */ op("ADC", IndirectX, 6),
    /* 0x62 */ undocumented(Implicit),
    /* 0x63 */ undocumented(IndirectX),
    /* 0x64 */ undocumented(ZeroPage),
    /* 0x65 */ op("ADC", ZeroPage, 3),
    /* 0x66 */ op("ROR", ZeroPage, 5),
    /* 0x67 */ undocumented(ZeroPage),
    /* 0x68 */ op("PLA", Implicit, 4),
    /* 0x69 */ op("ADC", Immediate, 2),
    /* 0x6A */ op("ROR", Accumulator, 2),
    /* 0x6B */ undocumented(Immediate),
    /* 0x6C */ op("JMP", Indirect, 5),
    /* 0x6D */ op("ADC", Absolute, 4),
    /* 0x6E */ op("ROR", Absolute, 6),
    /* 0x6F */ undocumented(Absolute),
    /* 0x70 */ op("BVS", Relative, 2),
    /* 0x71 */ op("ADC", IndirectY, 5),
    /* 0x72 */ undocumented(Implicit),
    /* 0x73 */ undocumented(IndirectY),
    /* 0x74 */ undocumented(ZeroPageX),
    /* 0x75 */ op("ADC", ZeroPageX, 4),
    /* 0x76 */ op("ROR", ZeroPageX, 6),
    /* 0x77 */ undocumented(ZeroPageX),
    /* 0x78 */ op("SEI", Implicit, 2),
    /* 0x79 */ op("ADC", AbsoluteY, 4),
    /* 0x7A */ undocumented(Implicit),
    /* 0x7B */ undocumented(AbsoluteY),
    /* 0x7C */ undocumented(AbsoluteX),
    /* 0x7D */ op("ADC", AbsoluteX, 4),
    /* 0x7E */ op("ROR", AbsoluteX, 7),
    /* 0x7F */ undocumented(AbsoluteX),
    /* 0x80 */ undocumented(Immediate),
    /* 0x81 */ op("STA", IndirectX, 6),
    /* 0x82 */ undocumented(Immediate),
    /* 0x83 */ undocumented(IndirectX),
    /* 0x84 */ op("STY", ZeroPage, 3),
    /* 0x85 */ op("STA", ZeroPage, 3),
    /* 0x86 */ op("STX", ZeroPage, 3),
    /* 0x87 */ undocumented(ZeroPage),
    /* 0x88 */ op("DEY", Implicit, 2),
    /* 0x89 */ undocumented(Immediate),
    /* 0x8A */ op("TXA", Implicit, 2),
    /* 0x8B */ undocumented(Immediate),
    /* 0x8C */ op("STY", Absolute, 4),
    /* 0x8D */ op("STA", Absolute, 4),
    /* 0x8E */ op("STX", Absolute, 4),
    /* 0x8F */ undocumented(Absolute),
    /* 0x90 */ op("BCC", Relative, 2),
    /* 0x91 */ op("STA", IndirectY, 6),
    /* 0x92 */ undocumented(Implicit),
    /* 0x93 */ undocumented(IndirectY),
    /* 0x94 */ op("STY", ZeroPageX, 4),
    /* 0x95 */ op("STA", ZeroPageX, 4),
    /* 0x96 */ op("STX", ZeroPageY, 4),
    /* 0x97 */ undocumented(ZeroPageX),
    /* 0x98 */ op("TYA", Implicit, 2),
    /* 0x99 */ op("STA", AbsoluteY, 5),
    /* 0x9A */ op("TXS", Implicit, 2),
    /* 0x9B */ undocumented(AbsoluteY),
    /* 0x9C */ undocumented(AbsoluteX),
    /* 0x9D */ op("STA", AbsoluteX, 5),
    /* 0x9E */ undocumented(AbsoluteX),
    /* 0x9F */ undocumented(AbsoluteX),
    /* 0xA0 */ op("LDY", Immediate, 2),
    /* 0xA1 */ op("LDA", IndirectX, 6),
    /* 0xA2 */ op("LDX", Immediate, 2),
    /* 0xA3 */ undocumented(IndirectX),
    /* 0xA4 */ op("LDY", ZeroPage, 3),
    /* 0xA5 */ op("LDA", ZeroPage, 3),
    /* 0xA6 */ op("LDX", ZeroPage, 3),
    /* 0xA7 */ undocumented(ZeroPage),
    /* 0xA8 */ op("TAY", Implicit, 2),
    /* 0xA9 */ op("LDA", Immediate, 2),
    /* 0xAA */ op("TAX", Implicit, 2),
    /* 0xAB */ undocumented(Immediate),
    /* 0xAC */ op("LDY", Absolute, 4),
    /* 0xAD */ op("LDA", Absolute, 4),
    /* 0xAE */ op("LDX", Absolute, 4),
    /* 0xAF */ undocumented(Absolute),
    /* 0xB0 */ op("BCS", Relative, 2),
    /* 0xB1 */ op("LDA", IndirectY, 5),
    /* 0xB2 */ undocumented(Implicit),
    /* 0xB3 */ undocumented(IndirectY),
    /* 0xB4 */ op("LDY", ZeroPageX, 4),
    /* 0xB5 */ op("LDA", ZeroPageX, 4),
    /* 0xB6 */ op("LDX", ZeroPageY, 4),
    /* 0xB7 */ undocumented(ZeroPageX),
    /* 0xB8 */ op("CLV", Implicit, 2),
    /* 0xB9 */ op("LDA", AbsoluteY, 4),
    /* 0xBA */ op("TSX", Implicit, 2),
    /* 0xBB */ undocumented(AbsoluteY),
    /* 0xBC */ op("LDY", AbsoluteX, 4),
    /* 0xBD */ op("LDA", AbsoluteX, 4),
    /* 0xBE */ op("LDX", AbsoluteY, 4),
    /* 0xBF */ undocumented(AbsoluteX),
    /* 0xC0 */ op("CPY", Immediate, 2),
    /* 0xC1 */ op("CMP", IndirectX, 6),
    /* 0xC2 */ undocumented(Immediate),
    /* 0xC3 */ undocumented(IndirectX),
    /* 0xC4 */ op("CPY", ZeroPage, 3),
    /* 0xC5 */ op("CMP", ZeroPage, 3),
    /* 0xC6 */ op("DEC", ZeroPage, 5),
    /* 0xC7 */ undocumented(ZeroPage),
    /* 0xC8 */ op("INY", Implicit, 2),
    /* 0xC9 */ op("CMP", Immediate, 2),
    /* 0xCA */ op("DEX", Implicit, 2),
    /* 0xCB */ undocumented(Immediate),
    /* 0xCC */ op("CPY", Absolute, 4),
    /* 0xCD */ op("CMP", Absolute, 4),
    /* 0xCE */ op("DEC", Absolute, 6),
    /* 0xCF */ undocumented(Absolute),
    /* 0xD0 */ op("BNE", Relative, 2),
    /* 0xD1 */ op("CMP", IndirectY, 5),
    /* 0xD2 */ undocumented(Implicit),
    /* 0xD3 */ undocumented(IndirectY),
    /* 0xD4 */ undocumented(ZeroPageX),
    /* 0xD5 */ op("CMP", ZeroPageX, 4),
    /* 0xD6 */ op("DEC", ZeroPageX, 6),
    /* 0xD7 */ undocumented(ZeroPageX),
    /* 0xD8 */ op("CLD", Implicit, 2),
    /* 0xD9 */ op("CMP", AbsoluteY, 4),
    /* 0xDA */ undocumented(Implicit),
    /* 0xDB */ undocumented(AbsoluteY),
    /* 0xDC */ undocumented(AbsoluteX),
    /* 0xDD */ op("CMP", AbsoluteX, 4),
    /* 0xDE */ op("DEC", AbsoluteX, 7),
    /* 0xDF */ undocumented(AbsoluteX),
    /* 0xE0 */ op("CPX", Immediate, 2),
    /* 0xE1 */ op("SBC", IndirectX, 6),
    /* 0xE2 */ undocumented(Immediate),
    /* 0xE3 */ undocumented(IndirectX),
    /* 0xE4 */ op("CPX", ZeroPage, 3),
    /* 0xE5 */ op("SBC", ZeroPage, 3),
    /* 0xE6 */ op("INC", ZeroPage, 5),
    /* 0xE7 */ undocumented(ZeroPage),
    /* 0xE8 */ op("INX", Implicit, 2),
    /* 0xE9 */ op("SBC", Immediate, 2),
    /* 0xEA */ op("NOP", Implicit, 2),
    /* 0xEB */ undocumented(Immediate),
    /* 0xEC */ op("CPX", Absolute, 4),
    /* 0xED */ op("SBC", Absolute, 4),
    /* 0xEE */ op("INC", Absolute, 6),
    /* 0xEF */ undocumented(Absolute),
    /* 0xF0 */ op("BEQ", Relative, 2),
    /* 0xF1 */ op("SBC", IndirectY, 5),
    /* 0xF2 */ undocumented(Implicit),
    /* 0xF3 */ undocumented(IndirectY),
    /* 0xF4 */ undocumented(ZeroPageX),
    /* 0xF5 */ op("SBC", ZeroPageX, 4),
    /* 0xF6 */ op("INC", ZeroPageX, 6),
    /* 0xF7 */ undocumented(ZeroPageX),
    /* 0xF8 */ op("SED", Implicit, 2),
    /* 0xF9 */ op("SBC", AbsoluteY, 4),
    /* 0xFA */ undocumented(Implicit),
    /* 0xFB */ undocumented(AbsoluteY),
    /* 0xFC */ undocumented(AbsoluteX),
    /* 0xFD */ op("SBC", AbsoluteX, 4),
    /* 0xFE */ op("INC", AbsoluteX, 7),
    /* 0xFF */ undocumented(AbsoluteX),
];
