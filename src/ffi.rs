// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! C ABI Entry Points
//!
//! For startup code written in assembly or C, which calls these before any
//! Rust runtime state exists.

use crate::console;
use crate::err::{self, rx_status_t};
use crate::itm::BOOT_TCR;

/// Send one character on stimulus port 0, waiting for the FIFO
#[no_mangle]
pub extern "C" fn itm_send_char(ch: u8) {
    console::send_char(ch);
}

/// Enable the ITM with the boot configuration
#[no_mangle]
pub extern "C" fn itm_init() {
    console::init();
}

/// Send one character if port 0 is enabled, polling at most `spins` times
#[no_mangle]
pub extern "C" fn itm_try_send_char(ch: u8, spins: usize) -> rx_status_t {
    err::to_status(console::itm().try_send(console::CONSOLE_PORT, ch, spins))
}

/// Boot TCR value, for startup code that programs the ITM itself
#[no_mangle]
pub static ITM_BOOT_TCR: u32 = BOOT_TCR;
