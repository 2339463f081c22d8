// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! `log` Backend
//!
//! Routes `log` records to the ITM console:
//!
//! ```text
//! [INFO] app::boot: clocks configured
//! ```
//!
//! Records are dropped while the ITM or port 0 is disabled, so logging
//! before [`console::init`](crate::console::init) never hangs on the FIFO.

use core::fmt;
use log::{LevelFilter, Log, Metadata, Record};

use crate::console;
use crate::err::{ItmError, Result};
use crate::itm::Itm;
use crate::reg::RegisterIo;

struct ItmLogger;

static LOGGER: ItmLogger = ItmLogger;

impl Log for ItmLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        console::with_lock(|itm| emit(itm, record));
    }

    fn flush(&self) {
        // Bounded so a stalled trace port cannot hang the caller.
        let _ = console::itm().flush(FLUSH_SPINS);
    }
}

const FLUSH_SPINS: usize = 100_000;

/// Install the ITM logger with `level` as the maximum level
pub fn init(level: LevelFilter) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|_| ItmError::AlreadyInitialized)?;
    log::set_max_level(level);
    Ok(())
}

/// Write `record` to the console port of `itm`.
///
/// Returns false, with nothing written, while the ITM or the port is
/// disabled.
pub fn emit<B: RegisterIo>(itm: &Itm<B>, record: &Record<'_>) -> bool {
    if !itm.port_enabled(console::CONSOLE_PORT) {
        return false;
    }
    // PortWriter never fails.
    let _ = write_record(&mut itm.writer(console::CONSOLE_PORT), record);
    true
}

/// Format `record` the way the logger emits it
pub fn write_record<W: fmt::Write + ?Sized>(w: &mut W, record: &Record<'_>) -> fmt::Result {
    writeln!(w, "[{}] {}: {}", record.level(), record.target(), record.args())
}
