// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! ITM Driver
//!
//! Polled output through the Instrumentation Trace Macrocell. Each write to
//! a stimulus port becomes a software trace packet on the SWO pin; the size
//! of the store (8, 16 or 32 bits) sets the packet payload size.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rustux_itm::{Itm, Mmio, ITM_BASE};
//!
//! let itm = Itm::new(unsafe { Mmio::new(ITM_BASE) });
//! itm.init();
//! itm.send_char(b'A');
//! ```
//!
//! `init` and `send_char` never fail: the send spins until the FIFO accepts
//! the write, however long that takes. The `try_*` and `flush` variants
//! check the enable bits first and give up after a spin budget.

use core::fmt;

use crate::config::ItmConfig;
use crate::err::{ItmError, Result};
use crate::reg::RegisterIo;
use crate::regs::{
    self, TraceControl, ITM_LAR, ITM_LSR, ITM_TCR, ITM_TER, LAR_UNLOCK_KEY, LSR_LOCKED,
    LSR_PRESENT, STIM_COUNT, STIM_FIFOREADY,
};

/// TCR value written by [`Itm::init`]
pub const BOOT_TCR: u32 = 0x0001_000D;

/// TER value written by [`Itm::init`]
pub const BOOT_TER: u32 = 0x0000_0001;

/// Instrumentation Trace Macrocell driver
pub struct Itm<B> {
    bus: B,
    map_nl: bool,
}

impl<B: RegisterIo> Itm<B> {
    /// Driver that sends bytes as given
    pub const fn new(bus: B) -> Self {
        Self::with_options(bus, false)
    }

    /// Driver that optionally expands `\n` to `\r\n` in [`Itm::write_str`]
    pub const fn with_options(bus: B, map_nl: bool) -> Self {
        Self { bus, map_nl }
    }

    // ========================================================================
    // Initialization
    // ========================================================================

    /// Enable the ITM with the boot configuration.
    ///
    /// Writes TCR = 0x0001000D (ITMENA, SYNCENA, TXENA, TraceBusID 1) and
    /// then TER = 0x1 (stimulus port 0).
    pub fn init(&self) {
        self.bus.write32(ITM_TCR, BOOT_TCR);
        self.bus.write32(ITM_TER, BOOT_TER);
        ltrace!("ITM: init tcr={:#010x} ter={:#010x}", BOOT_TCR, BOOT_TER);
    }

    /// Enable the ITM with `config`.
    ///
    /// Nothing is written if the configuration does not validate.
    pub fn init_with(&self, config: &ItmConfig) -> Result<()> {
        config.validate()?;

        if config.needs_unlock() {
            self.bus.write32(ITM_LAR, LAR_UNLOCK_KEY);
            if self.is_locked() {
                lwarn!("ITM: still locked after writing LAR");
            }
        }

        self.bus.write32(ITM_TCR, config.tcr_value());
        self.bus.write32(ITM_TER, config.ter_value());

        ltrace!(
            "ITM: init tcr={:#010x} ter={:#010x}",
            config.tcr_value(),
            config.ter_value()
        );
        Ok(())
    }

    /// Disable all stimulus ports and clear ITMENA
    pub fn disable(&self) {
        self.bus.write32(ITM_TER, 0);
        let tcr = self.bus.read32(ITM_TCR);
        self.bus
            .write32(ITM_TCR, tcr & !TraceControl::ITMENA.bits());
        ltrace!("ITM: disabled");
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// TCR.ITMENA is set
    pub fn is_enabled(&self) -> bool {
        TraceControl::from_bits_truncate(self.bus.read32(ITM_TCR)).contains(TraceControl::ITMENA)
    }

    /// The ITM is enabled and `port` has its TER bit set
    pub fn port_enabled(&self, port: u8) -> bool {
        (port as usize) < STIM_COUNT
            && self.is_enabled()
            && self.bus.read32(ITM_TER) & (1 << port) != 0
    }

    /// The lock mechanism is implemented and currently blocks writes
    pub fn is_locked(&self) -> bool {
        let lsr = self.bus.read32(ITM_LSR);
        lsr & LSR_PRESENT != 0 && lsr & LSR_LOCKED != 0
    }

    /// TCR.BUSY is set
    pub fn is_busy(&self) -> bool {
        TraceControl::from_bits_truncate(self.bus.read32(ITM_TCR)).contains(TraceControl::BUSY)
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Send one character on stimulus port 0.
    ///
    /// Waits for the FIFO-ready bit and then performs a 32-bit store of the
    /// zero-extended character. There is no timeout.
    pub fn send_char(&self, ch: u8) {
        self.write_u32(0, ch as u32);
    }

    /// 8-bit store to `port` once its FIFO is ready.
    ///
    /// Writes to ports past the last stimulus port are dropped.
    pub fn write_u8(&self, port: u8, value: u8) {
        if let Some(offset) = self.wait_ready(port) {
            self.bus.write8(offset, value);
        }
    }

    /// 16-bit store to `port` once its FIFO is ready.
    ///
    /// Writes to ports past the last stimulus port are dropped.
    pub fn write_u16(&self, port: u8, value: u16) {
        if let Some(offset) = self.wait_ready(port) {
            self.bus.write16(offset, value);
        }
    }

    /// 32-bit store to `port` once its FIFO is ready.
    ///
    /// Writes to ports past the last stimulus port are dropped.
    pub fn write_u32(&self, port: u8, value: u32) {
        if let Some(offset) = self.wait_ready(port) {
            self.bus.write32(offset, value);
        }
    }

    /// Send bytes on `port` as single-byte packets
    pub fn write_bytes(&self, port: u8, bytes: &[u8]) {
        if port as usize >= STIM_COUNT {
            return;
        }
        for &b in bytes {
            self.write_u8(port, b);
        }
    }

    /// Send a string on `port`, mapping newlines if configured
    pub fn write_str(&self, port: u8, s: &str) {
        if port as usize >= STIM_COUNT {
            return;
        }
        for b in s.bytes() {
            if self.map_nl && b == b'\n' {
                self.write_u8(port, b'\r');
            }
            self.write_u8(port, b);
        }
    }

    /// Send one byte on `port`, checking the enable bits and polling the
    /// FIFO at most `spins` times.
    pub fn try_send(&self, port: u8, byte: u8, spins: usize) -> Result<()> {
        if port as usize >= STIM_COUNT {
            return Err(ItmError::InvalidPort(port));
        }
        if !self.is_enabled() {
            return Err(ItmError::Disabled);
        }
        if !self.port_enabled(port) {
            return Err(ItmError::PortDisabled(port));
        }

        let offset = regs::stim(port);
        for _ in 0..spins {
            if self.bus.read32(offset) & STIM_FIFOREADY != 0 {
                self.bus.write8(offset, byte);
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(ItmError::TimedOut)
    }

    /// Wait for TCR.BUSY to clear, polling at most `spins` times
    pub fn flush(&self, spins: usize) -> Result<()> {
        for _ in 0..spins {
            if !self.is_busy() {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(ItmError::TimedOut)
    }

    /// `core::fmt::Write` adapter for `port`
    pub fn writer(&self, port: u8) -> PortWriter<'_, B> {
        PortWriter { itm: self, port }
    }

    /// Spin until `port` can take a write, returning its offset. `None` for
    /// ports that do not exist; nothing is read in that case.
    fn wait_ready(&self, port: u8) -> Option<usize> {
        if port as usize >= STIM_COUNT {
            return None;
        }
        let offset = regs::stim(port);
        while self.bus.read32(offset) & STIM_FIFOREADY == 0 {
            core::hint::spin_loop();
        }
        Some(offset)
    }
}

/// Formatted output to one stimulus port
pub struct PortWriter<'a, B> {
    itm: &'a Itm<B>,
    port: u8,
}

impl<B: RegisterIo> fmt::Write for PortWriter<'_, B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.itm.write_str(self.port, s);
        Ok(())
    }
}
