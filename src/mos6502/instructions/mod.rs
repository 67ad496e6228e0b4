//! # 6502 Instruction Implementations
//!
//! Each instruction is a standalone function taking the CPU and the opcode byte.
//! The opcode's `OPCODE_TABLE` row supplies the addressing mode, base cycle cost
//! and instruction length; the function applies the effect, charges cycles
//! (plus any page-cross or branch penalty) and advances PC.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub mod alu;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;
