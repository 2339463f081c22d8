// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Rustux ITM Trace Output
//!
//! Debug character output through the ARMv7-M / ARMv8-M Instrumentation
//! Trace Macrocell.
//!
//! # Modules
//!
//! - [`itm`]: the driver, generic over a [`RegisterIo`] bus
//! - [`console`]: the core's own ITM as a global debug console
//! - [`config`]: TCR/TER settings and `itm.*` boot arguments
//! - `logger`: `log` backend (feature `log`)
//! - `ffi`: C ABI entry points (feature `ffi`)
//!
//! # Usage
//!
//! ```rust,ignore
//! rustux_itm::init();
//! for b in b"hello\r\n" {
//!     rustux_itm::send_char(*b);
//! }
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod trace;

pub mod config;
pub mod console;
pub mod err;
pub mod itm;
pub mod reg;
pub mod regs;

#[cfg(feature = "log")]
pub mod logger;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use config::ItmConfig;
pub use err::{ItmError, Result};
pub use itm::{Itm, PortWriter};
pub use reg::{Mmio, RegisterIo};
pub use regs::{TraceControl, ITM_BASE};

/// Send one character on the core's ITM stimulus port 0.
///
/// Spins until the port's FIFO is ready, without a timeout.
pub fn send_char(ch: u8) {
    console::send_char(ch);
}

/// Enable the core's ITM: TCR = 0x0001000D, then TER = 0x1.
pub fn init() {
    console::init();
}
