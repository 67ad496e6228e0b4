//! # 6502 CPU State and Execution
//!
//! The `Cpu6502` struct holds the processor state and runs the
//! fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): 8-bit offset into stack page (0x0100-0x01FF)
//! - **Status flags**: N, V, B, D, I, Z, C (individual bool fields)
//! - **Cycle counter**: u64 monotonically increasing cycle count
//!
//! ## Execution Model
//!
//! - `step()`: Execute one instruction, returning its cycle cost
//! - `run_steps()`: Execute an exact number of instructions
//! - `call_subroutine()`: Run a routine until it returns or its budget runs out
//!
//! Undocumented opcodes never stop execution; they are timed no-ops.

pub mod addressing;
pub mod opcodes;

mod instructions;

pub use addressing::AddressingMode;
pub use opcodes::{OpcodeMetadata, OPCODE_TABLE};

use crate::call::{stack_depth8, CallOutcome, GuestCpu};
use crate::MemoryBus;
use instructions::{alu, branches, control, flags, inc_dec, load_store, shifts, stack, transfer};

/// Default `call_subroutine` budget, counted in instructions.
pub const DEFAULT_6502_CALL_BUDGET: u64 = 200_000;

/// Address an RTS lands on when it pops the sentinel pushed by `call_subroutine`.
pub const RETURN_SENTINEL: u16 = 0xFFFF;

/// Stack pointer after `reset()`.
pub const RESET_STACK_POINTER: u8 = 0xFF;

/// 6502 CPU state and execution context.
///
/// Generic over the memory implementation via the `MemoryBus` trait. The CPU
/// owns its bus value; pass `&mut memory` to keep ownership on the host side.
///
/// # Examples
///
/// ```
/// use replay_cpu::{Cpu6502, FlatMemory, MemoryBus};
///
/// // LDA #$42
/// let memory = FlatMemory::from_image(0x8000, &[0xA9, 0x42]).unwrap();
/// let mut cpu = Cpu6502::new(memory);
/// cpu.reset(0x8000);
///
/// assert_eq!(cpu.step(), 2);
/// assert_eq!(cpu.a(), 0x42);
/// assert_eq!(cpu.pc(), 0x8002);
/// ```
pub struct Cpu6502<M: MemoryBus> {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub(crate) sp: u8,

    /// Negative flag (set if bit 7 of result is 1)
    pub(crate) flag_n: bool,

    /// Overflow flag (set on signed overflow)
    pub(crate) flag_v: bool,

    /// Break flag
    pub(crate) flag_b: bool,

    /// Decimal mode flag (enables BCD arithmetic)
    pub(crate) flag_d: bool,

    /// Interrupt disable flag
    pub(crate) flag_i: bool,

    /// Zero flag (set if result is zero)
    pub(crate) flag_z: bool,

    /// Carry flag (set on unsigned overflow/underflow)
    pub(crate) flag_c: bool,

    /// Total CPU cycles executed since reset
    pub(crate) cycles: u64,

    /// Memory bus implementation
    pub(crate) memory: M,
}

impl<M: MemoryBus> Cpu6502<M> {
    /// Creates a new CPU with the given memory bus.
    ///
    /// The CPU starts in the `reset()` state with PC loaded from the reset vector
    /// at 0xFFFC/0xFFFD (little-endian). Hosts running extracted player code
    /// normally follow up with an explicit `reset(entry_point)`.
    pub fn new(memory: M) -> Self {
        let pc_low = memory.read(0xFFFC) as u16;
        let pc_high = memory.read(0xFFFD) as u16;

        let mut cpu = Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: RESET_STACK_POINTER,
            flag_n: false,
            flag_v: false,
            flag_b: false,
            flag_d: false,
            flag_i: false,
            flag_z: false,
            flag_c: false,
            cycles: 0,
            memory,
        };
        cpu.reset((pc_high << 8) | pc_low);
        cpu
    }

    /// Resets registers and points PC at `pc`.
    ///
    /// A, X and Y are cleared, every flag is cleared (bit 5 of `status()` still
    /// reads as 1), SP is set to 0xFF and the cycle counter restarts at zero.
    /// Memory is not touched.
    pub fn reset(&mut self, pc: u16) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.pc = pc;
        self.sp = RESET_STACK_POINTER;
        self.set_status(0);
        self.cycles = 0;
    }

    /// Executes one instruction and returns the cycles it consumed.
    ///
    /// Undocumented opcodes are skipped over (operand bytes included) and cost
    /// 4 cycles; registers, flags and memory are left untouched.
    pub fn step(&mut self) -> u32 {
        let start = self.cycles;
        let opcode = self.memory.read(self.pc);

        match opcode {
            // Arithmetic and logic
            0x69 | 0x65 | 0x75 | 0x6D | 0x7D | 0x79 | 0x61 | 0x71 => alu::execute_adc(self, opcode),
            0xE9 | 0xE5 | 0xF5 | 0xED | 0xFD | 0xF9 | 0xE1 | 0xF1 => alu::execute_sbc(self, opcode),
            0x29 | 0x25 | 0x35 | 0x2D | 0x3D | 0x39 | 0x21 | 0x31 => alu::execute_and(self, opcode),
            0x09 | 0x05 | 0x15 | 0x0D | 0x1D | 0x19 | 0x01 | 0x11 => alu::execute_ora(self, opcode),
            0x49 | 0x45 | 0x55 | 0x4D | 0x5D | 0x59 | 0x41 | 0x51 => alu::execute_eor(self, opcode),
            0xC9 | 0xC5 | 0xD5 | 0xCD | 0xDD | 0xD9 | 0xC1 | 0xD1 => alu::execute_cmp(self, opcode),
            0xE0 | 0xE4 | 0xEC => alu::execute_cpx(self, opcode),
            0xC0 | 0xC4 | 0xCC => alu::execute_cpy(self, opcode),
            0x24 | 0x2C => alu::execute_bit(self, opcode),

            // Branches
            0x10 => branches::execute_branch(self, opcode, |cpu| !cpu.flag_n), // BPL
            0x30 => branches::execute_branch(self, opcode, |cpu| cpu.flag_n),  // BMI
            0x50 => branches::execute_branch(self, opcode, |cpu| !cpu.flag_v), // BVC
            0x70 => branches::execute_branch(self, opcode, |cpu| cpu.flag_v),  // BVS
            0x90 => branches::execute_branch(self, opcode, |cpu| !cpu.flag_c), // BCC
            0xB0 => branches::execute_branch(self, opcode, |cpu| cpu.flag_c),  // BCS
            0xD0 => branches::execute_branch(self, opcode, |cpu| !cpu.flag_z), // BNE
            0xF0 => branches::execute_branch(self, opcode, |cpu| cpu.flag_z),  // BEQ

            // Control flow
            0x00 => control::execute_brk(self, opcode),
            0x4C | 0x6C => control::execute_jmp(self, opcode),
            0x20 => control::execute_jsr(self, opcode),
            0x60 => control::execute_rts(self, opcode),
            0x40 => control::execute_rti(self, opcode),
            0xEA => control::execute_nop(self, opcode),

            // Flags
            0x18 => flags::execute_flag_op(self, opcode, |cpu| cpu.flag_c = false), // CLC
            0x38 => flags::execute_flag_op(self, opcode, |cpu| cpu.flag_c = true),  // SEC
            0x58 => flags::execute_flag_op(self, opcode, |cpu| cpu.flag_i = false), // CLI
            0x78 => flags::execute_flag_op(self, opcode, |cpu| cpu.flag_i = true),  // SEI
            0xB8 => flags::execute_flag_op(self, opcode, |cpu| cpu.flag_v = false), // CLV
            0xD8 => flags::execute_flag_op(self, opcode, |cpu| cpu.flag_d = false), // CLD
            0xF8 => flags::execute_flag_op(self, opcode, |cpu| cpu.flag_d = true),  // SED

            // Increments and decrements
            0xE6 | 0xF6 | 0xEE | 0xFE => inc_dec::execute_inc(self, opcode),
            0xC6 | 0xD6 | 0xCE | 0xDE => inc_dec::execute_dec(self, opcode),
            0xE8 => inc_dec::execute_inx(self, opcode),
            0xC8 => inc_dec::execute_iny(self, opcode),
            0xCA => inc_dec::execute_dex(self, opcode),
            0x88 => inc_dec::execute_dey(self, opcode),

            // Loads and stores
            0xA9 | 0xA5 | 0xB5 | 0xAD | 0xBD | 0xB9 | 0xA1 | 0xB1 => load_store::execute_lda(self, opcode),
            0xA2 | 0xA6 | 0xB6 | 0xAE | 0xBE => load_store::execute_ldx(self, opcode),
            0xA0 | 0xA4 | 0xB4 | 0xAC | 0xBC => load_store::execute_ldy(self, opcode),
            0x85 | 0x95 | 0x8D | 0x9D | 0x99 | 0x81 | 0x91 => load_store::execute_sta(self, opcode),
            0x86 | 0x96 | 0x8E => load_store::execute_stx(self, opcode),
            0x84 | 0x94 | 0x8C => load_store::execute_sty(self, opcode),

            // Shifts and rotates
            0x0A | 0x06 | 0x16 | 0x0E | 0x1E => shifts::execute_asl(self, opcode),
            0x4A | 0x46 | 0x56 | 0x4E | 0x5E => shifts::execute_lsr(self, opcode),
            0x2A | 0x26 | 0x36 | 0x2E | 0x3E => shifts::execute_rol(self, opcode),
            0x6A | 0x66 | 0x76 | 0x6E | 0x7E => shifts::execute_ror(self, opcode),

            // Stack
            0x48 => stack::execute_pha(self, opcode),
            0x08 => stack::execute_php(self, opcode),
            0x68 => stack::execute_pla(self, opcode),
            0x28 => stack::execute_plp(self, opcode),

            // Transfers
            0xAA => transfer::execute_tax(self, opcode),
            0xA8 => transfer::execute_tay(self, opcode),
            0x8A => transfer::execute_txa(self, opcode),
            0x98 => transfer::execute_tya(self, opcode),
            0xBA => transfer::execute_tsx(self, opcode),
            0x9A => transfer::execute_txs(self, opcode),

            _ => self.execute_undocumented(opcode),
        }

        (self.cycles - start) as u32
    }

    /// Skips an undocumented opcode as a timed no-op.
    fn execute_undocumented(&mut self, opcode: u8) {
        let metadata = &OPCODE_TABLE[opcode as usize];
        log::trace!(
            "6502: undocumented opcode 0x{:02X} at 0x{:04X} treated as no-op",
            opcode,
            self.pc
        );
        self.finish(metadata, 0);
    }

    /// Executes exactly `count` instructions.
    pub fn run_steps(&mut self, count: u32) {
        for _ in 0..count {
            self.step();
        }
    }

    /// Runs the CPU for at least `cycle_budget` cycles.
    ///
    /// Returns the cycles actually consumed, which may overshoot the budget by
    /// part of one instruction.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> u64 {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles + cycle_budget;

        while self.cycles < target_cycles {
            self.step();
        }

        self.cycles - start_cycles
    }

    /// Calls the subroutine at `addr` and runs until it returns.
    ///
    /// A sentinel return address is pushed using the JSR convention (the
    /// address minus one), so a matching RTS lands PC on `RETURN_SENTINEL`. The
    /// call is over once SP climbs back to the level it had before the push, or
    /// after `max_steps` instructions, whichever comes first. Routines that drop
    /// their own return address (PLA/PLA then RTS) count as returned as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use replay_cpu::{Cpu6502, FlatMemory, MemoryBus};
    ///
    /// // STA $0400; RTS
    /// let memory = FlatMemory::from_image(0x1000, &[0x8D, 0x00, 0x04, 0x60]).unwrap();
    /// let mut cpu = Cpu6502::new(memory);
    /// cpu.reset(0x1000);
    /// cpu.set_a(0x33);
    ///
    /// let outcome = cpu.call_subroutine(0x1000, 100);
    /// assert!(outcome.returned());
    /// assert_eq!(outcome.steps(), 2);
    /// assert_eq!(cpu.memory().read(0x0400), 0x33);
    /// ```
    pub fn call_subroutine(&mut self, addr: u16, max_steps: u64) -> CallOutcome {
        let base_sp = self.sp;
        let start_cycles = self.cycles;

        self.push_word(RETURN_SENTINEL.wrapping_sub(1));
        self.pc = addr;

        // Accumulated per step so stacks deeper than 127 bytes don't wrap
        let mut depth = stack_depth8(base_sp, self.sp) as i32;
        let mut steps = 0;
        while steps < max_steps {
            let sp_before = self.sp;
            self.step();
            steps += 1;
            depth += stack_depth8(sp_before, self.sp) as i32;

            if depth <= 0 {
                let cycles = self.cycles - start_cycles;
                log::debug!(
                    "6502: routine at 0x{:04X} returned after {} steps ({} cycles)",
                    addr,
                    steps,
                    cycles
                );
                return CallOutcome::Returned { steps, cycles };
            }
        }

        let cycles = self.cycles - start_cycles;
        log::debug!(
            "6502: routine at 0x{:04X} still running after {} steps, stopped at 0x{:04X}",
            addr,
            steps,
            self.pc
        );
        CallOutcome::BudgetExhausted { steps, cycles }
    }

    // ========== Execution Helpers ==========

    /// Charges cycles and advances PC past the current instruction.
    pub(crate) fn finish(&mut self, metadata: &OpcodeMetadata, extra_cycles: u64) {
        self.cycles += metadata.base_cycles as u64 + extra_cycles;
        self.pc = self.pc.wrapping_add(metadata.size_bytes as u16);
    }

    /// Updates Z and N from a result byte.
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = (value & 0x80) != 0;
    }

    /// Pushes a byte to 0x0100 | SP and decrements SP (wrapping).
    pub(crate) fn push(&mut self, value: u8) {
        self.memory.write(0x0100 | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Increments SP (wrapping) and pulls the byte at 0x0100 | SP.
    pub(crate) fn pull(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(0x0100 | self.sp as u16)
    }

    /// Pushes a word high byte first, as JSR and BRK do.
    pub(crate) fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push(value as u8);
    }

    /// Pulls a word low byte first, as RTS and RTI do.
    pub(crate) fn pull_word(&mut self) -> u16 {
        let lo = self.pull() as u16;
        let hi = self.pull() as u16;
        (hi << 8) | lo
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    ///
    /// The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV-BDIZC):
    /// - Bit 7: N (Negative)
    /// - Bit 6: V (Overflow)
    /// - Bit 5: (unused, always 1)
    /// - Bit 4: B (Break)
    /// - Bit 3: D (Decimal)
    /// - Bit 2: I (Interrupt Disable)
    /// - Bit 1: Z (Zero)
    /// - Bit 0: C (Carry)
    ///
    /// # Examples
    ///
    /// ```
    /// use replay_cpu::{Cpu6502, FlatMemory};
    ///
    /// let mut cpu = Cpu6502::new(FlatMemory::new());
    /// cpu.reset(0x0000);
    /// assert_eq!(cpu.status(), 0b0010_0000);
    /// ```
    pub fn status(&self) -> u8 {
        let mut status: u8 = 0b00100000; // Bit 5 always 1

        if self.flag_n {
            status |= 0b10000000;
        }
        if self.flag_v {
            status |= 0b01000000;
        }
        if self.flag_b {
            status |= 0b00010000;
        }
        if self.flag_d {
            status |= 0b00001000;
        }
        if self.flag_i {
            status |= 0b00000100;
        }
        if self.flag_z {
            status |= 0b00000010;
        }
        if self.flag_c {
            status |= 0b00000001;
        }

        status
    }

    /// Returns the total number of CPU cycles executed since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns a shared reference to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns a mutable reference to the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Consumes the CPU and hands the memory bus back.
    pub fn into_memory(self) -> M {
        self.memory
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    /// Returns true if the Break flag is set.
    pub fn flag_b(&self) -> bool {
        self.flag_b
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    // ========== Register Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Unpacks a status byte into the individual flags. Bit 5 is ignored.
    pub fn set_status(&mut self, status: u8) {
        self.flag_n = status & 0b10000000 != 0;
        self.flag_v = status & 0b01000000 != 0;
        self.flag_b = status & 0b00010000 != 0;
        self.flag_d = status & 0b00001000 != 0;
        self.flag_i = status & 0b00000100 != 0;
        self.flag_z = status & 0b00000010 != 0;
        self.flag_c = status & 0b00000001 != 0;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }
}

impl<M: MemoryBus> GuestCpu for Cpu6502<M> {
    type Bus = M;

    fn reset_to(&mut self, pc: u16) {
        self.reset(pc);
    }

    fn call(&mut self, addr: u16, budget: u64) -> CallOutcome {
        self.call_subroutine(addr, budget)
    }

    fn step_instruction(&mut self) -> u32 {
        self.step()
    }

    fn pc(&self) -> u16 {
        self.pc
    }

    fn set_argument(&mut self, value: u8) {
        self.a = value;
    }

    fn stack_pointer(&self) -> u16 {
        self.sp as u16
    }

    fn set_stack_pointer(&mut self, sp: u16) {
        self.sp = sp as u8;
    }

    fn default_budget(&self) -> u64 {
        DEFAULT_6502_CALL_BUDGET
    }

    fn bus(&self) -> &M {
        &self.memory
    }

    fn bus_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn setup_cpu(program: &[u8]) -> Cpu6502<FlatMemory> {
        let memory = FlatMemory::from_image(0x8000, program).unwrap();
        let mut cpu = Cpu6502::new(memory);
        cpu.reset(0x8000);
        cpu
    }

    #[test]
    fn test_new_loads_reset_vector() {
        let mut mem = FlatMemory::new();
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);

        let cpu = Cpu6502::new(mem);
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), RESET_STACK_POINTER);
        assert_eq!(cpu.cycles(), 0);
    }

    #[test]
    fn test_reset_state() {
        let mut cpu = setup_cpu(&[0xA9, 0x80]);
        cpu.step();
        cpu.set_x(0x11);
        cpu.set_y(0x22);
        cpu.set_sp(0x40);

        cpu.reset(0x1234);

        assert_eq!(cpu.pc(), 0x1234);
        assert_eq!(cpu.a(), 0);
        assert_eq!(cpu.x(), 0);
        assert_eq!(cpu.y(), 0);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(cpu.status(), 0b0010_0000);
        assert_eq!(cpu.cycles(), 0);
        // Memory untouched
        assert_eq!(cpu.memory().read(0x8000), 0xA9);
    }

    #[test]
    fn test_status_register_packing() {
        let mut cpu = setup_cpu(&[]);
        cpu.set_status(0b1100_1011);
        assert!(cpu.flag_n());
        assert!(cpu.flag_v());
        assert!(!cpu.flag_b());
        assert!(cpu.flag_d());
        assert!(!cpu.flag_i());
        assert!(cpu.flag_z());
        assert!(cpu.flag_c());
        assert_eq!(cpu.status(), 0b1110_1011);
    }

    #[test]
    fn test_step_returns_cycles() {
        // LDA #$01; NOP
        let mut cpu = setup_cpu(&[0xA9, 0x01, 0xEA]);
        assert_eq!(cpu.step(), 2);
        assert_eq!(cpu.step(), 2);
        assert_eq!(cpu.cycles(), 4);
    }

    #[test]
    fn test_undocumented_opcode_is_no_op() {
        // 0x1C: undocumented 3-byte NOP abs,X; then LDA #$07
        let mut cpu = setup_cpu(&[0x1C, 0x34, 0x12, 0xA9, 0x07]);
        cpu.set_a(0x55);
        cpu.set_x(0x66);
        let status = cpu.status();

        assert_eq!(cpu.step(), 4);
        assert_eq!(cpu.pc(), 0x8003);
        assert_eq!(cpu.a(), 0x55);
        assert_eq!(cpu.x(), 0x66);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(cpu.status(), status);

        cpu.step();
        assert_eq!(cpu.a(), 0x07);
    }

    #[test]
    fn test_run_steps_executes_exact_count() {
        let mut cpu = setup_cpu(&[0xE8, 0xE8, 0xE8, 0xE8]); // INX x4
        cpu.run_steps(3);
        assert_eq!(cpu.x(), 3);
        assert_eq!(cpu.pc(), 0x8003);
    }

    #[test]
    fn test_run_for_cycles() {
        let mut cpu = setup_cpu(&[0xEA; 16]);
        let consumed = cpu.run_for_cycles(10);
        assert_eq!(consumed, 10);
        assert_eq!(cpu.pc(), 0x8005);
    }

    #[test]
    fn test_call_subroutine_sentinel_lands_on_ffff() {
        let mut cpu = setup_cpu(&[0x60]); // RTS
        let outcome = cpu.call_subroutine(0x8000, 10);
        assert_eq!(
            outcome,
            CallOutcome::Returned {
                steps: 1,
                cycles: 6
            }
        );
        assert_eq!(cpu.pc(), RETURN_SENTINEL);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_call_subroutine_budget_exhausted() {
        let mut cpu = setup_cpu(&[0x4C, 0x00, 0x80]); // JMP $8000
        let outcome = cpu.call_subroutine(0x8000, 50);
        assert_eq!(
            outcome,
            CallOutcome::BudgetExhausted {
                steps: 50,
                cycles: 150
            }
        );
    }

    #[test]
    fn test_call_subroutine_with_wrapped_stack() {
        // SP near the bottom of the page: the push wraps through 0x00
        let mut cpu = setup_cpu(&[0x48, 0x68, 0x60]); // PHA; PLA; RTS
        cpu.set_sp(0x01);
        let outcome = cpu.call_subroutine(0x8000, 10);
        assert!(outcome.returned());
        assert_eq!(outcome.steps(), 3);
        assert_eq!(cpu.sp(), 0x01);
    }

    #[test]
    fn test_call_subroutine_nested_jsr() {
        // $8000: JSR $8010; RTS   $8010: INX; RTS
        let mut program = vec![0xEA; 0x20];
        program[0x00..0x04].copy_from_slice(&[0x20, 0x10, 0x80, 0x60]);
        program[0x10..0x12].copy_from_slice(&[0xE8, 0x60]);
        let mut cpu = setup_cpu(&program);

        let outcome = cpu.call_subroutine(0x8000, 100);
        assert!(outcome.returned());
        assert_eq!(outcome.steps(), 4);
        assert_eq!(cpu.x(), 1);
    }
}
