//! WebAssembly bindings.
//!
//! JavaScript-callable wrappers around both cores so a browser tracker can run
//! extracted player routines and collect their sound-chip writes.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::{Emulator6502, EmulatorZ80, JsError};
