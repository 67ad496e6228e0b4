//! # Addressing Modes
//!
//! The 13 addressing modes of the 6502, and the effective-address calculation
//! every instruction goes through before its operation proper.
//!
//! Operands are read relative to the opcode's address (PC+1, PC+2); instructions
//! advance PC by the table size once they are done.

use super::Cpu6502;
use crate::MemoryBus;

/// 6502 addressing mode enumeration.
///
/// The addressing mode determines how the CPU interprets the operand bytes
/// that follow an opcode and how it calculates the effective memory address
/// for the operation.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR A, ROL A, ASL A
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10 (load immediate value 0x10 into accumulator)
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80 (load from address 0x0080)
    ZeroPage,

    /// Zero page address indexed by X register.
    ///
    /// Example: LDA $80,X (load from address 0x0080 + X, wraps within zero page)
    ZeroPageX,

    /// Zero page address indexed by Y register.
    ///
    /// Example: LDX $80,Y (load from address 0x0080 + Y, wraps within zero page)
    ZeroPageY,

    /// Signed 8-bit offset for branch instructions.
    ///
    /// Example: BEQ label (branch if zero flag set, offset is relative to PC)
    Relative,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234 (jump to address 0x1234)
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X (load from address 0x1234 + X)
    /// May incur +1 cycle penalty if page boundary is crossed.
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y (load from address 0x1234 + Y)
    /// May incur +1 cycle penalty if page boundary is crossed.
    AbsoluteY,

    /// Indirect jump through 16-bit pointer.
    ///
    /// Example: JMP ($FFFC) (jump to address stored at 0xFFFC/0xFFFD)
    /// Only used by JMP instruction.
    Indirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X) (add X to 0x40, read 16-bit address from that ZP location, load from result)
    /// Operand is added to X within zero page, then dereferenced.
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y (read 16-bit address from ZP 0x40, add Y, load from result)
    /// Operand is dereferenced to get base address, then Y is added.
    /// May incur +1 cycle penalty if page boundary is crossed.
    IndirectY,
}

impl AddressingMode {
    /// Number of operand bytes that follow the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
            _ => 1,
        }
    }
}

/// Resolved source of an instruction's operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// The accumulator itself (shifts and rotates).
    Accumulator,
    /// A constant from the instruction stream.
    Immediate(u8),
    /// A memory location.
    Memory {
        /// Effective address
        addr: u16,
        /// Whether indexing crossed a page (adds a cycle to reads)
        page_crossed: bool,
    },
    /// No operand (implicit instructions).
    None,
}

fn crosses_page(base: u16, effective: u16) -> bool {
    (base & 0xFF00) != (effective & 0xFF00)
}

impl<M: MemoryBus> Cpu6502<M> {
    /// Reads the byte operand at PC+1.
    pub(crate) fn operand_byte(&self) -> u8 {
        self.memory.read(self.pc.wrapping_add(1))
    }

    /// Reads the little-endian word operand at PC+1/PC+2.
    pub(crate) fn operand_word(&self) -> u16 {
        let lo = self.memory.read(self.pc.wrapping_add(1)) as u16;
        let hi = self.memory.read(self.pc.wrapping_add(2)) as u16;
        (hi << 8) | lo
    }

    /// Reads a pointer from page zero; the high byte wraps within the page.
    fn zero_page_pointer(&self, zp: u8) -> u16 {
        let lo = self.memory.read(zp as u16) as u16;
        let hi = self.memory.read(zp.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }

    /// Resolves the operand for `mode` without side effects.
    pub(crate) fn resolve_operand(&self, mode: AddressingMode) -> Operand {
        match mode {
            AddressingMode::Implicit | AddressingMode::Relative | AddressingMode::Indirect => {
                Operand::None
            }
            AddressingMode::Accumulator => Operand::Accumulator,
            AddressingMode::Immediate => Operand::Immediate(self.operand_byte()),
            AddressingMode::ZeroPage => Operand::Memory {
                addr: self.operand_byte() as u16,
                page_crossed: false,
            },
            AddressingMode::ZeroPageX => Operand::Memory {
                addr: self.operand_byte().wrapping_add(self.x) as u16,
                page_crossed: false,
            },
            AddressingMode::ZeroPageY => Operand::Memory {
                addr: self.operand_byte().wrapping_add(self.y) as u16,
                page_crossed: false,
            },
            AddressingMode::Absolute => Operand::Memory {
                addr: self.operand_word(),
                page_crossed: false,
            },
            AddressingMode::AbsoluteX => {
                let base = self.operand_word();
                let addr = base.wrapping_add(self.x as u16);
                Operand::Memory {
                    addr,
                    page_crossed: crosses_page(base, addr),
                }
            }
            AddressingMode::AbsoluteY => {
                let base = self.operand_word();
                let addr = base.wrapping_add(self.y as u16);
                Operand::Memory {
                    addr,
                    page_crossed: crosses_page(base, addr),
                }
            }
            AddressingMode::IndirectX => {
                let zp = self.operand_byte().wrapping_add(self.x);
                Operand::Memory {
                    addr: self.zero_page_pointer(zp),
                    page_crossed: false,
                }
            }
            AddressingMode::IndirectY => {
                let base = self.zero_page_pointer(self.operand_byte());
                let addr = base.wrapping_add(self.y as u16);
                Operand::Memory {
                    addr,
                    page_crossed: crosses_page(base, addr),
                }
            }
        }
    }

    /// Reads the operand value and reports whether a page was crossed.
    pub(crate) fn read_operand(&self, mode: AddressingMode) -> (u8, bool) {
        match self.resolve_operand(mode) {
            Operand::Accumulator => (self.a, false),
            Operand::Immediate(value) => (value, false),
            Operand::Memory { addr, page_crossed } => (self.memory.read(addr), page_crossed),
            Operand::None => (0, false),
        }
    }

    /// Effective address for store and read-modify-write instructions.
    pub(crate) fn operand_address(&self, mode: AddressingMode) -> u16 {
        match self.resolve_operand(mode) {
            Operand::Memory { addr, .. } => addr,
            _ => 0,
        }
    }
}
