//! # Z80 CPU State and Execution
//!
//! The `CpuZ80` struct holds the full Zilog Z80 register file and runs one
//! instruction per `step()`, prefixes included.
//!
//! ## Decoders
//!
//! - `base`: the unprefixed table (register moves, ALU block, jumps, calls)
//! - `cb`: rotates, shifts, BIT/RES/SET
//! - `ed`: 16-bit arithmetic, I/R transfers, interrupt modes, block operations
//! - `index`: DD/FD (IX/IY) forms, including DDCB/FDCB
//!
//! All timings are in T-states. Interrupts are never raised; `EI`, `DI` and the
//! `IM` instructions only update the state that reflects them.

mod alu;
mod base;
mod cb;
mod ed;
mod flags;
mod index;

pub use flags::Flags;

use crate::call::{stack_depth16, CallOutcome, GuestCpu};
use crate::PortBus;

/// Stack pointer used by `reset()`.
pub const DEFAULT_STACK_TOP: u16 = 0xFFFF;

/// Default `call_subroutine` budget, counted in T-states.
pub const DEFAULT_Z80_CALL_BUDGET: u64 = 200_000;

/// Return address pushed by `call_subroutine`.
pub const RETURN_SENTINEL: u16 = 0xFFFF;

/// Index register selected by a DD or FD prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexReg {
    IX,
    IY,
}

/// Z80 CPU state and execution context.
///
/// Generic over the bus via `PortBus`, which adds the Z80's separate I/O space
/// to `MemoryBus`.
///
/// # Examples
///
/// ```
/// use replay_cpu::{CpuZ80, FlatMemory};
///
/// // LD A,0x42; LD B,A
/// let memory = FlatMemory::from_image(0x0000, &[0x3E, 0x42, 0x47]).unwrap();
/// let mut cpu = CpuZ80::new(memory);
///
/// assert_eq!(cpu.step(), 7);
/// assert_eq!(cpu.step(), 4);
/// assert_eq!(cpu.b(), 0x42);
/// assert_eq!(cpu.pc(), 0x0003);
/// ```
pub struct CpuZ80<B: PortBus> {
    pub(crate) a: u8,
    pub(crate) f: Flags,
    pub(crate) b: u8,
    pub(crate) c: u8,
    pub(crate) d: u8,
    pub(crate) e: u8,
    pub(crate) h: u8,
    pub(crate) l: u8,

    // Alternate set, swapped in by EX AF,AF' and EXX
    pub(crate) a_alt: u8,
    pub(crate) f_alt: Flags,
    pub(crate) b_alt: u8,
    pub(crate) c_alt: u8,
    pub(crate) d_alt: u8,
    pub(crate) e_alt: u8,
    pub(crate) h_alt: u8,
    pub(crate) l_alt: u8,

    pub(crate) ix: u16,
    pub(crate) iy: u16,
    pub(crate) sp: u16,
    pub(crate) pc: u16,

    /// Interrupt vector base
    pub(crate) i: u8,
    /// Memory refresh counter
    pub(crate) r: u8,

    pub(crate) iff1: bool,
    pub(crate) iff2: bool,
    pub(crate) im: u8,

    /// Total T-states executed since reset
    pub(crate) cycles: u64,

    pub(crate) bus: B,
}

impl<B: PortBus> CpuZ80<B> {
    /// Creates a CPU in the `reset(0x0000)` state.
    pub fn new(bus: B) -> Self {
        let mut cpu = Self {
            a: 0,
            f: Flags::default(),
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            a_alt: 0,
            f_alt: Flags::default(),
            b_alt: 0,
            c_alt: 0,
            d_alt: 0,
            e_alt: 0,
            h_alt: 0,
            l_alt: 0,
            ix: 0,
            iy: 0,
            sp: DEFAULT_STACK_TOP,
            pc: 0,
            i: 0,
            r: 0,
            iff1: false,
            iff2: false,
            im: 0,
            cycles: 0,
            bus,
        };
        cpu.reset(0x0000);
        cpu
    }

    /// Resets registers, points PC at `pc` and SP at `DEFAULT_STACK_TOP`.
    pub fn reset(&mut self, pc: u16) {
        self.reset_with_stack(pc, DEFAULT_STACK_TOP);
    }

    /// Resets registers with an explicit stack pointer.
    ///
    /// All 8-bit registers (alternate set included), I, R, IX and IY are
    /// zeroed, interrupts are disabled in IM 0 and the T-state counter restarts.
    /// The bus is left untouched.
    pub fn reset_with_stack(&mut self, pc: u16, sp: u16) {
        self.a = 0;
        self.f = Flags::default();
        self.b = 0;
        self.c = 0;
        self.d = 0;
        self.e = 0;
        self.h = 0;
        self.l = 0;
        self.a_alt = 0;
        self.f_alt = Flags::default();
        self.b_alt = 0;
        self.c_alt = 0;
        self.d_alt = 0;
        self.e_alt = 0;
        self.h_alt = 0;
        self.l_alt = 0;
        self.ix = 0;
        self.iy = 0;
        self.sp = sp;
        self.pc = pc;
        self.i = 0;
        self.r = 0;
        self.iff1 = false;
        self.iff2 = false;
        self.im = 0;
        self.cycles = 0;
    }

    /// Executes one instruction and returns the T-states it consumed.
    ///
    /// Prefix bytes are part of the instruction, and the repeating block
    /// instructions (LDIR, CPIR, ...) run to completion inside one step.
    pub fn step(&mut self) -> u32 {
        let opcode = self.fetch_opcode();
        let t_states = self.execute_base(opcode);
        self.cycles += t_states as u64;
        t_states
    }

    /// Executes exactly `count` instructions.
    pub fn run_steps(&mut self, count: u32) {
        for _ in 0..count {
            self.step();
        }
    }

    /// Calls the subroutine at `addr` and runs until it returns.
    ///
    /// Pushes `RETURN_SENTINEL` as the return address and steps until SP
    /// climbs back to its pre-call level, or until `max_cycles` T-states have
    /// been spent.
    ///
    /// # Examples
    ///
    /// ```
    /// use replay_cpu::{CpuZ80, FlatMemory, MemoryBus};
    ///
    /// // LD (0x9000),A; RET
    /// let memory = FlatMemory::from_image(0x8000, &[0x32, 0x00, 0x90, 0xC9]).unwrap();
    /// let mut cpu = CpuZ80::new(memory);
    /// cpu.set_a(0x5A);
    ///
    /// let outcome = cpu.call_subroutine(0x8000, 1_000);
    /// assert!(outcome.returned());
    /// assert_eq!(outcome.cycles(), 23);
    /// assert_eq!(cpu.memory().read(0x9000), 0x5A);
    /// ```
    pub fn call_subroutine(&mut self, addr: u16, max_cycles: u64) -> CallOutcome {
        let base_sp = self.sp;
        let start_cycles = self.cycles;

        self.push(RETURN_SENTINEL);
        self.pc = addr;

        let mut steps = 0;
        while self.cycles - start_cycles < max_cycles {
            self.step();
            steps += 1;

            if stack_depth16(base_sp, self.sp) <= 0 {
                let cycles = self.cycles - start_cycles;
                log::debug!(
                    "z80: routine at 0x{:04X} returned after {} steps ({} T-states)",
                    addr,
                    steps,
                    cycles
                );
                return CallOutcome::Returned { steps, cycles };
            }
        }

        let cycles = self.cycles - start_cycles;
        log::debug!(
            "z80: routine at 0x{:04X} still running after {} T-states, stopped at 0x{:04X}",
            addr,
            cycles,
            self.pc
        );
        CallOutcome::BudgetExhausted { steps, cycles }
    }

    // ========== Fetch and Bus Helpers ==========

    /// Fetches an opcode byte (M1 cycle) and bumps the low 7 bits of R.
    pub(crate) fn fetch_opcode(&mut self) -> u8 {
        let opcode = self.bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.bump_r(1);
        opcode
    }

    pub(crate) fn bump_r(&mut self, fetches: u8) {
        self.r = (self.r & 0x80) | (self.r.wrapping_add(fetches) & 0x7F);
    }

    /// Fetches an operand byte; R is not touched.
    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let value = self.bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    /// Fetches a signed displacement and applies it to `base`.
    pub(crate) fn fetch_displaced(&mut self, base: u16) -> u16 {
        let d = self.fetch_byte() as i8;
        base.wrapping_add_signed(d as i16)
    }

    pub(crate) fn read_word(&self, addr: u16) -> u16 {
        let lo = self.bus.read(addr) as u16;
        let hi = self.bus.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub(crate) fn write_word(&mut self, addr: u16, value: u16) {
        self.bus.write(addr, value as u8);
        self.bus.write(addr.wrapping_add(1), (value >> 8) as u8);
    }

    pub(crate) fn push(&mut self, value: u16) {
        self.sp = self.sp.wrapping_sub(1);
        self.bus.write(self.sp, (value >> 8) as u8);
        self.sp = self.sp.wrapping_sub(1);
        self.bus.write(self.sp, value as u8);
    }

    pub(crate) fn pop(&mut self) -> u16 {
        let value = self.read_word(self.sp);
        self.sp = self.sp.wrapping_add(2);
        value
    }

    // ========== Register Index Helpers ==========

    /// Reads register `index` in B,C,D,E,H,L,(HL),A order.
    pub(crate) fn reg8(&self, index: u8) -> u8 {
        match index & 7 {
            0 => self.b,
            1 => self.c,
            2 => self.d,
            3 => self.e,
            4 => self.h,
            5 => self.l,
            6 => self.bus.read(self.hl()),
            _ => self.a,
        }
    }

    /// Writes register `index` in B,C,D,E,H,L,(HL),A order.
    pub(crate) fn set_reg8(&mut self, index: u8, value: u8) {
        match index & 7 {
            0 => self.b = value,
            1 => self.c = value,
            2 => self.d = value,
            3 => self.e = value,
            4 => self.h = value,
            5 => self.l = value,
            6 => {
                let addr = self.hl();
                self.bus.write(addr, value)
            }
            _ => self.a = value,
        }
    }

    /// Register pair `index` in BC,DE,HL,SP order.
    pub(crate) fn reg16(&self, index: u8) -> u16 {
        match index & 3 {
            0 => self.bc(),
            1 => self.de(),
            2 => self.hl(),
            _ => self.sp,
        }
    }

    pub(crate) fn set_reg16(&mut self, index: u8, value: u16) {
        match index & 3 {
            0 => self.set_bc(value),
            1 => self.set_de(value),
            2 => self.set_hl(value),
            _ => self.sp = value,
        }
    }

    /// Condition `cc` in NZ,Z,NC,C,PO,PE,P,M order.
    pub(crate) fn condition(&self, cc: u8) -> bool {
        match cc & 7 {
            0 => !self.f.z,
            1 => self.f.z,
            2 => !self.f.c,
            3 => self.f.c,
            4 => !self.f.pv,
            5 => self.f.pv,
            6 => !self.f.s,
            _ => self.f.s,
        }
    }

    pub(crate) fn index(&self, reg: IndexReg) -> u16 {
        match reg {
            IndexReg::IX => self.ix,
            IndexReg::IY => self.iy,
        }
    }

    pub(crate) fn set_index(&mut self, reg: IndexReg, value: u16) {
        match reg {
            IndexReg::IX => self.ix = value,
            IndexReg::IY => self.iy = value,
        }
    }

    // ========== Register Getters ==========

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn f(&self) -> u8 {
        self.f.to_byte()
    }

    pub fn b(&self) -> u8 {
        self.b
    }

    pub fn c(&self) -> u8 {
        self.c
    }

    pub fn d(&self) -> u8 {
        self.d
    }

    pub fn e(&self) -> u8 {
        self.e
    }

    pub fn h(&self) -> u8 {
        self.h
    }

    pub fn l(&self) -> u8 {
        self.l
    }

    pub fn i(&self) -> u8 {
        self.i
    }

    pub fn r(&self) -> u8 {
        self.r
    }

    pub fn af(&self) -> u16 {
        ((self.a as u16) << 8) | self.f.to_byte() as u16
    }

    pub fn bc(&self) -> u16 {
        ((self.b as u16) << 8) | self.c as u16
    }

    pub fn de(&self) -> u16 {
        ((self.d as u16) << 8) | self.e as u16
    }

    pub fn hl(&self) -> u16 {
        ((self.h as u16) << 8) | self.l as u16
    }

    pub fn ix(&self) -> u16 {
        self.ix
    }

    pub fn iy(&self) -> u16 {
        self.iy
    }

    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn af_alt(&self) -> u16 {
        ((self.a_alt as u16) << 8) | self.f_alt.to_byte() as u16
    }

    pub fn bc_alt(&self) -> u16 {
        ((self.b_alt as u16) << 8) | self.c_alt as u16
    }

    pub fn de_alt(&self) -> u16 {
        ((self.d_alt as u16) << 8) | self.e_alt as u16
    }

    pub fn hl_alt(&self) -> u16 {
        ((self.h_alt as u16) << 8) | self.l_alt as u16
    }

    pub fn iff1(&self) -> bool {
        self.iff1
    }

    pub fn iff2(&self) -> bool {
        self.iff2
    }

    /// Interrupt mode set by the last `IM` instruction (0, 1 or 2).
    pub fn interrupt_mode(&self) -> u8 {
        self.im
    }

    /// Total T-states executed since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns the flag register as individual fields.
    pub fn flags(&self) -> Flags {
        self.f
    }

    pub fn memory(&self) -> &B {
        &self.bus
    }

    pub fn memory_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consumes the CPU and hands the bus back.
    pub fn into_bus(self) -> B {
        self.bus
    }

    // ========== Register Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_f(&mut self, value: u8) {
        self.f = Flags::from_byte(value);
    }

    pub fn set_b(&mut self, value: u8) {
        self.b = value;
    }

    pub fn set_c(&mut self, value: u8) {
        self.c = value;
    }

    pub fn set_d(&mut self, value: u8) {
        self.d = value;
    }

    pub fn set_e(&mut self, value: u8) {
        self.e = value;
    }

    pub fn set_h(&mut self, value: u8) {
        self.h = value;
    }

    pub fn set_l(&mut self, value: u8) {
        self.l = value;
    }

    pub fn set_af(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.f = Flags::from_byte(value as u8);
    }

    pub fn set_bc(&mut self, value: u16) {
        self.b = (value >> 8) as u8;
        self.c = value as u8;
    }

    pub fn set_de(&mut self, value: u16) {
        self.d = (value >> 8) as u8;
        self.e = value as u8;
    }

    pub fn set_hl(&mut self, value: u16) {
        self.h = (value >> 8) as u8;
        self.l = value as u8;
    }

    pub fn set_ix(&mut self, value: u16) {
        self.ix = value;
    }

    pub fn set_iy(&mut self, value: u16) {
        self.iy = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }
}

impl<B: PortBus> GuestCpu for CpuZ80<B> {
    type Bus = B;

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
        self.sp
    }

    fn set_stack_pointer(&mut self, sp: u16) {
        self.sp = sp;
    }

    fn default_budget(&self) -> u64 {
        DEFAULT_Z80_CALL_BUDGET
    }

    fn bus(&self) -> &B {
        &self.bus
    }

    fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}
