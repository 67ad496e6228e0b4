//! WASM API for the player interpreters.
//!
//! Both emulators run over a `CaptureBus<FlatMemory>`: JavaScript loads the
//! player image, calls init/play through `call_subroutine`, and drains the
//! captured writes after each call. Write logs cross the boundary as flat
//! arrays of `[address, value, address, value, ...]`.

use wasm_bindgen::prelude::*;

use crate::{CaptureBus, Cpu6502, CpuZ80, FlatMemory, MemoryBus};

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

fn load_image(bus: &mut CaptureBus<FlatMemory>, addr: u16, bytes: &[u8]) -> Result<(), JsError> {
    bus.inner_mut()
        .load(addr, bytes)
        .map_err(|e| JsError::new(&e.to_string()))
}

fn read_range(bus: &CaptureBus<FlatMemory>, addr: u16, len: u16) -> js_sys::Uint8Array {
    let bytes: Vec<u8> = (0..len).map(|i| bus.read(addr.wrapping_add(i))).collect();
    js_sys::Uint8Array::from(bytes.as_slice())
}

/// 6502 emulator for JavaScript
#[wasm_bindgen]
pub struct Emulator6502 {
    cpu: Cpu6502<CaptureBus<FlatMemory>>,
}

#[wasm_bindgen]
impl Emulator6502 {
    /// Creates an emulator with 64KB of zeroed RAM.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Emulator6502 {
            cpu: Cpu6502::new(CaptureBus::new(FlatMemory::new())),
        }
    }

    /// Copies a code/data image into memory at its load address.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) -> Result<(), JsError> {
        load_image(self.cpu.memory_mut(), addr, bytes)
    }

    /// Records writes to `start..=end` (a SID at 0xD400..=0xD41C, say).
    pub fn watch(&mut self, start: u16, end: u16) {
        self.cpu.memory_mut().watch(start..=end);
    }

    pub fn reset(&mut self, pc: u16) {
        self.cpu.reset(pc);
    }

    /// Executes one instruction and returns its cycle cost.
    pub fn step(&mut self) -> u32 {
        self.cpu.step()
    }

    pub fn run_steps(&mut self, count: u32) {
        self.cpu.run_steps(count);
    }

    /// Calls the routine at `addr`. Returns false if it ran out of budget.
    pub fn call_subroutine(&mut self, addr: u16, budget: u32) -> bool {
        self.cpu.call_subroutine(addr, budget as u64).returned()
    }

    /// Drains captured memory writes as flat address/value pairs.
    pub fn take_memory_writes(&mut self) -> Vec<u16> {
        self.cpu
            .memory_mut()
            .take_memory_writes()
            .into_iter()
            .flat_map(|w| [w.addr, w.value as u16])
            .collect()
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.cpu.a()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u8 {
        self.cpu.x()
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u8 {
        self.cpu.y()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u8 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> u8 {
        self.cpu.status()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        self.cpu.cycles() as f64 // u64 doesn't fit a JS number
    }

    pub fn set_a(&mut self, value: u8) {
        self.cpu.set_a(value);
    }

    pub fn read_memory(&self, addr: u16) -> u8 {
        self.cpu.memory().read(addr)
    }

    pub fn write_memory(&mut self, addr: u16, value: u8) {
        self.cpu.memory_mut().write(addr, value);
    }

    /// Reads `len` bytes starting at `addr` (wrapping at 0xFFFF).
    pub fn read_memory_range(&self, addr: u16, len: u16) -> js_sys::Uint8Array {
        read_range(self.cpu.memory(), addr, len)
    }
}

impl Default for Emulator6502 {
    fn default() -> Self {
        Self::new()
    }
}

/// Z80 emulator for JavaScript
#[wasm_bindgen]
pub struct EmulatorZ80 {
    cpu: CpuZ80<CaptureBus<FlatMemory>>,
}

#[wasm_bindgen]
impl EmulatorZ80 {
    /// Creates an emulator with 64KB of zeroed RAM.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        EmulatorZ80 {
            cpu: CpuZ80::new(CaptureBus::new(FlatMemory::new())),
        }
    }

    pub fn load(&mut self, addr: u16, bytes: &[u8]) -> Result<(), JsError> {
        load_image(self.cpu.memory_mut(), addr, bytes)
    }

    pub fn reset(&mut self, pc: u16) {
        self.cpu.reset(pc);
    }

    /// Resets with an explicit stack pointer.
    pub fn reset_with_stack(&mut self, pc: u16, sp: u16) {
        self.cpu.reset_with_stack(pc, sp);
    }

    /// Executes one instruction and returns its T-states.
    pub fn step(&mut self) -> u32 {
        self.cpu.step()
    }

    pub fn run_steps(&mut self, count: u32) {
        self.cpu.run_steps(count);
    }

    /// Calls the routine at `addr` with a T-state budget. Returns false if it
    /// ran out of budget.
    pub fn call_subroutine(&mut self, addr: u16, budget: u32) -> bool {
        self.cpu.call_subroutine(addr, budget as u64).returned()
    }

    /// Drains captured `OUT`s as flat port/value pairs.
    pub fn take_port_writes(&mut self) -> Vec<u16> {
        self.cpu
            .memory_mut()
            .take_port_writes()
            .into_iter()
            .flat_map(|w| [w.port, w.value as u16])
            .collect()
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.cpu.a()
    }

    #[wasm_bindgen(getter)]
    pub fn f(&self) -> u8 {
        self.cpu.f()
    }

    #[wasm_bindgen(getter)]
    pub fn bc(&self) -> u16 {
        self.cpu.bc()
    }

    #[wasm_bindgen(getter)]
    pub fn de(&self) -> u16 {
        self.cpu.de()
    }

    #[wasm_bindgen(getter)]
    pub fn hl(&self) -> u16 {
        self.cpu.hl()
    }

    #[wasm_bindgen(getter)]
    pub fn ix(&self) -> u16 {
        self.cpu.ix()
    }

    #[wasm_bindgen(getter)]
    pub fn iy(&self) -> u16 {
        self.cpu.iy()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u16 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        self.cpu.cycles() as f64
    }

    pub fn set_a(&mut self, value: u8) {
        self.cpu.set_a(value);
    }

    pub fn read_memory(&self, addr: u16) -> u8 {
        self.cpu.memory().read(addr)
    }

    pub fn write_memory(&mut self, addr: u16, value: u8) {
        self.cpu.memory_mut().write(addr, value);
    }

    pub fn read_memory_range(&self, addr: u16, len: u16) -> js_sys::Uint8Array {
        read_range(self.cpu.memory(), addr, len)
    }
}

impl Default for EmulatorZ80 {
    fn default() -> Self {
        Self::new()
    }
}
