// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! ITM Console
//!
//! The processor's own ITM at [`ITM_BASE`], used as a debug console on
//! stimulus port 0.
//!
//! # Usage
//!
//! ```rust,ignore
//! rustux_itm::console::init();
//! rustux_itm::itm_println!("booted in {} ms", elapsed);
//! ```
//!
//! Single characters go straight to the hardware. Strings and formatted
//! output hold the TX lock so lines from different contexts stay whole.
//! Do not print from an exception handler that can pre-empt a lock holder.

use core::fmt;
use spin::Mutex;

use crate::config::ItmConfig;
use crate::err::Result;
use crate::itm::Itm;
use crate::reg::Mmio;
use crate::regs::ITM_BASE;

/// Stimulus port used for console text
pub const CONSOLE_PORT: u8 = 0;

// SAFETY: the ITM block is part of the System Control Space and is always
// mapped on ARMv7-M and ARMv8-M.
static ITM: Itm<Mmio> = Itm::with_options(unsafe { Mmio::new(ITM_BASE) }, true);

/// Serialises multi-byte writes
static TX_LOCK: Mutex<()> = Mutex::new(());

/// The console's driver instance
pub fn itm() -> &'static Itm<Mmio> {
    &ITM
}

/// Enable the ITM with the boot configuration
pub fn init() {
    ITM.init();
}

/// Enable the ITM with `config`
pub fn init_with(config: &ItmConfig) -> Result<()> {
    ITM.init_with(config)
}

/// Send one character on port 0, waiting for the FIFO
pub fn send_char(ch: u8) {
    ITM.send_char(ch);
}

/// Write a string to the console
pub fn puts(s: &str) {
    let _lock = TX_LOCK.lock();
    ITM.write_str(CONSOLE_PORT, s);
}

/// The ITM is enabled and the console port is on
pub fn is_ready() -> bool {
    ITM.port_enabled(CONSOLE_PORT)
}

/// Run `f` on the console driver with the TX lock held
pub fn with_lock<R>(f: impl FnOnce(&Itm<Mmio>) -> R) -> R {
    let _lock = TX_LOCK.lock();
    f(&ITM)
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    let _lock = TX_LOCK.lock();
    // PortWriter never fails.
    let _ = fmt::Write::write_fmt(&mut ITM.writer(CONSOLE_PORT), args);
}

/// Print to the ITM console
#[macro_export]
macro_rules! itm_print {
    ($($arg:tt)*) => {
        $crate::console::_print(core::format_args!($($arg)*))
    };
}

/// Print to the ITM console, with a newline
#[macro_export]
macro_rules! itm_println {
    () => {
        $crate::console::puts("\n")
    };
    ($($arg:tt)*) => {
        $crate::console::_print(core::format_args!("{}\n", core::format_args!($($arg)*)))
    };
}
