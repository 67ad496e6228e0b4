//! # Subroutine Calls
//!
//! Both cores run a guest routine as an opaque function call: push a sentinel
//! return address, jump to the routine, and step until the stack pointer climbs
//! back to where it was before the push. The stack pointer is the only
//! bookkeeping; there is no separate call-depth counter.
//!
//! Guest code is often located heuristically, so a call can never be trusted to
//! terminate. Every call carries a budget (instructions on the 6502, T-states on
//! the Z80) and reports which way it ended.

/// How a `call_subroutine` invocation ended.
///
/// Neither variant is an error: a routine that runs out of budget simply stops,
/// and the host judges the memory/port state it left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The stack pointer recovered to its pre-call level.
    Returned {
        /// Instructions executed
        steps: u64,
        /// Cycles (6502) or T-states (Z80) consumed
        cycles: u64,
    },
    /// The budget ran out before the routine returned.
    BudgetExhausted {
        /// Instructions executed
        steps: u64,
        /// Cycles (6502) or T-states (Z80) consumed
        cycles: u64,
    },
}

impl CallOutcome {
    /// Returns true if the routine returned within its budget.
    pub fn returned(&self) -> bool {
        matches!(self, CallOutcome::Returned { .. })
    }

    /// Number of instructions executed during the call.
    pub fn steps(&self) -> u64 {
        match *self {
            CallOutcome::Returned { steps, .. } | CallOutcome::BudgetExhausted { steps, .. } => {
                steps
            }
        }
    }

    /// Cycles or T-states consumed during the call.
    pub fn cycles(&self) -> u64 {
        match *self {
            CallOutcome::Returned { cycles, .. }
            | CallOutcome::BudgetExhausted { cycles, .. } => cycles,
        }
    }
}

/// Uniform driver contract shared by the 6502 and Z80 cores.
///
/// A host that only needs "reset, call, inspect memory" can be written once
/// against this trait and pointed at either architecture.
///
/// # Examples
///
/// ```
/// use replay_cpu::{Cpu6502, CpuZ80, FlatMemory, GuestCpu, MemoryBus};
///
/// fn run_once<C: GuestCpu>(cpu: &mut C, entry: u16) -> bool {
///     cpu.reset_to(entry);
///     let budget = cpu.default_budget();
///     cpu.call(entry, budget).returned()
/// }
///
/// // RTS / RET at 0x4000
/// let mut m6502 = Cpu6502::new(FlatMemory::from_image(0x4000, &[0x60]).unwrap());
/// let mut z80 = CpuZ80::new(FlatMemory::from_image(0x4000, &[0xC9]).unwrap());
///
/// assert!(run_once(&mut m6502, 0x4000));
/// assert!(run_once(&mut z80, 0x4000));
/// ```
pub trait GuestCpu {
    /// The memory/port bus the CPU executes against.
    type Bus;

    /// Resets registers and points PC at `pc`.
    fn reset_to(&mut self, pc: u16);

    /// Runs the subroutine at `addr` until it returns or `budget` runs out.
    fn call(&mut self, addr: u16, budget: u64) -> CallOutcome;

    /// Executes one instruction and returns its cycle cost.
    fn step_instruction(&mut self) -> u32;

    /// Current program counter.
    fn pc(&self) -> u16;

    /// Loads the accumulator, for routines that take an argument in A.
    fn set_argument(&mut self, value: u8);

    /// Stack pointer, widened to 16 bits on the 6502.
    fn stack_pointer(&self) -> u16;

    /// Sets the stack pointer. The 6502 keeps the low byte.
    fn set_stack_pointer(&mut self, sp: u16);

    /// Budget used when the host does not specify one.
    fn default_budget(&self) -> u64;

    /// Shared access to the bus.
    fn bus(&self) -> &Self::Bus;

    /// Mutable access to the bus.
    fn bus_mut(&mut self) -> &mut Self::Bus;
}

/// Signed stack depth of an 8-bit (6502) stack relative to `base`.
///
/// Positive while the callee still has bytes on the stack; zero or negative once
/// it has popped back to (or past) the caller's level. Wrapping keeps the answer
/// right when the stack pointer crosses 0x00/0xFF, but only within 127 bytes,
/// so callers tracking deeper stacks sum it one instruction at a time.
pub(crate) fn stack_depth8(base: u8, sp: u8) -> i8 {
    base.wrapping_sub(sp) as i8
}

/// Signed stack depth of a 16-bit (Z80) stack relative to `base`.
pub(crate) fn stack_depth16(base: u16, sp: u16) -> i16 {
    base.wrapping_sub(sp) as i16
}
