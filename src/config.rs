// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! ITM Configuration
//!
//! [`ItmConfig`] holds the values written to TCR and TER at init. The default
//! is the boot configuration: ITM, sync packets and DWT forwarding on,
//! TraceBusID 1, stimulus port 0 only.
//!
//! Settings can also come from boot arguments:
//!
//! ```rust
//! use rustux_itm::ItmConfig;
//!
//! let config = ItmConfig::from_cmdline("itm.ports=0x3 itm.timestamps itm.prescale=2");
//! assert_eq!(config.ter_value(), 0x3);
//! ```

use crate::err::{ItmError, Result};
use crate::regs::{self, TraceControl, STIM_COUNT, TRACE_BUS_ID_MAX, TS_PRESCALE_MAX};

/// Prefix of ITM boot arguments
const CMDLINE_PREFIX: &str = "itm.";

/// Trace configuration applied by `Itm::init_with`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItmConfig {
    flags: TraceControl,
    prescale: u8,
    bus_id: u8,
    ports: u32,
    unlock: bool,
}

impl ItmConfig {
    /// Boot configuration (TCR = 0x0001000D, TER = 0x1)
    pub const fn new() -> Self {
        Self {
            flags: TraceControl::ITMENA
                .union(TraceControl::SYNCENA)
                .union(TraceControl::TXENA),
            prescale: 0,
            bus_id: 1,
            ports: 1,
            unlock: false,
        }
    }

    /// Set the full TER mask
    pub const fn ports(mut self, mask: u32) -> Self {
        self.ports = mask;
        self
    }

    /// Enable one more stimulus port. Ports past the last one are ignored.
    pub const fn enable_port(mut self, port: u8) -> Self {
        if (port as usize) < STIM_COUNT {
            self.ports |= 1 << port;
        }
        self
    }

    pub const fn timestamps(self, on: bool) -> Self {
        self.flag(TraceControl::TSENA, on)
    }

    pub const fn sync(self, on: bool) -> Self {
        self.flag(TraceControl::SYNCENA, on)
    }

    /// Forward DWT hardware event packets
    pub const fn dwt_forwarding(self, on: bool) -> Self {
        self.flag(TraceControl::TXENA, on)
    }

    /// Clock timestamps from the SWO clock
    pub const fn swo_clock(self, on: bool) -> Self {
        self.flag(TraceControl::SWOENA, on)
    }

    /// Timestamp prescaler selector (0 = /1, 1 = /4, 2 = /16, 3 = /64)
    pub const fn prescale(mut self, prescale: u8) -> Self {
        self.prescale = prescale;
        self
    }

    pub const fn bus_id(mut self, id: u8) -> Self {
        self.bus_id = id;
        self
    }

    /// Write the LAR unlock key before programming TCR
    pub const fn unlock(mut self, on: bool) -> Self {
        self.unlock = on;
        self
    }

    const fn flag(mut self, flag: TraceControl, on: bool) -> Self {
        self.flags = if on {
            self.flags.union(flag)
        } else {
            self.flags.difference(flag)
        };
        self
    }

    pub const fn flags(&self) -> TraceControl {
        self.flags
    }

    pub const fn needs_unlock(&self) -> bool {
        self.unlock
    }

    /// Value written to TCR
    pub const fn tcr_value(&self) -> u32 {
        regs::tcr_pack(self.flags, self.prescale, self.bus_id)
    }

    /// Value written to TER
    pub const fn ter_value(&self) -> u32 {
        self.ports
    }

    /// Check every field fits its register field
    pub fn validate(&self) -> Result<()> {
        if self.bus_id == 0 || self.bus_id > TRACE_BUS_ID_MAX {
            return Err(ItmError::InvalidConfig);
        }
        if self.prescale > TS_PRESCALE_MAX {
            return Err(ItmError::InvalidConfig);
        }
        if self.flags.contains(TraceControl::BUSY) {
            return Err(ItmError::InvalidConfig);
        }
        Ok(())
    }

    /// Build a configuration from `itm.*` boot arguments.
    ///
    /// Arguments are whitespace separated `key=value` pairs. A key with no
    /// value is a boolean set to true. Keys outside the `itm.` namespace,
    /// unknown keys and unparsable numbers leave the default in place.
    pub fn from_cmdline(cmdline: &str) -> Self {
        Self::new().apply_cmdline(cmdline)
    }

    /// Apply `itm.*` boot arguments on top of this configuration
    pub fn apply_cmdline(mut self, cmdline: &str) -> Self {
        for arg in cmdline.split_whitespace() {
            let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
            let Some(key) = key.strip_prefix(CMDLINE_PREFIX) else {
                continue;
            };

            self = match key {
                "ports" => match parse_u32(value) {
                    Some(mask) => self.ports(mask),
                    None => self,
                },
                "bus_id" => match parse_u8_in(value, 1, TRACE_BUS_ID_MAX) {
                    Some(id) => self.bus_id(id),
                    None => self,
                },
                "prescale" => match parse_u8_in(value, 0, TS_PRESCALE_MAX) {
                    Some(p) => self.prescale(p),
                    None => self,
                },
                "timestamps" => self.timestamps(parse_bool(value)),
                "sync" => self.sync(parse_bool(value)),
                "dwt" => self.dwt_forwarding(parse_bool(value)),
                "swo" => self.swo_clock(parse_bool(value)),
                "unlock" => self.unlock(parse_bool(value)),
                _ => self,
            };
        }
        self
    }
}

impl Default for ItmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// "0", "false" and "off" are false; anything else, including an empty
/// value, is true.
fn parse_bool(value: &str) -> bool {
    !matches!(value, "0" | "false" | "off")
}

/// Parse a decimal or `0x`-prefixed hex value
fn parse_u32(value: &str) -> Option<u32> {
    if value.is_empty() {
        return None;
    }
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Parse a value that must land in `min..=max`
fn parse_u8_in(value: &str, min: u8, max: u8) -> Option<u8> {
    parse_u32(value)
        .and_then(|v| u8::try_from(v).ok())
        .filter(|v| (min..=max).contains(v))
}
