// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Trace Error Codes
//!
//! Errors returned by the checked ITM operations, and the status codes they
//! map to when crossing into C or assembly callers.

use core::fmt;

/// Kernel status code
#[allow(non_camel_case_types)]
pub type rx_status_t = i32;

/// Success status code
pub const RX_OK: rx_status_t = 0;

/// Invalid arguments error
pub const RX_ERR_INVALID_ARGS: rx_status_t = -10;

/// Bad state error
pub const RX_ERR_BAD_STATE: rx_status_t = -20;

/// Already exists error
pub const RX_ERR_ALREADY_EXISTS: rx_status_t = -26;

/// Out of range error
pub const RX_ERR_OUT_OF_RANGE: rx_status_t = -33;

/// Timeout error
pub const RX_ERR_TIMED_OUT: rx_status_t = -5;

/// Failure of a checked ITM operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItmError {
    /// TCR.ITMENA is clear
    Disabled,
    /// The port's TER bit is clear
    PortDisabled(u8),
    /// Port number beyond the last stimulus port
    InvalidPort(u8),
    /// The FIFO or the trace bus stayed busy for the whole spin budget
    TimedOut,
    /// A configuration field is out of range
    InvalidConfig,
    /// The logger was already installed
    AlreadyInitialized,
}

impl ItmError {
    /// Status code for this error
    pub const fn status(self) -> rx_status_t {
        match self {
            ItmError::Disabled | ItmError::PortDisabled(_) => RX_ERR_BAD_STATE,
            ItmError::InvalidPort(_) => RX_ERR_OUT_OF_RANGE,
            ItmError::TimedOut => RX_ERR_TIMED_OUT,
            ItmError::InvalidConfig => RX_ERR_INVALID_ARGS,
            ItmError::AlreadyInitialized => RX_ERR_ALREADY_EXISTS,
        }
    }
}

impl fmt::Display for ItmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItmError::Disabled => f.write_str("ITM is disabled"),
            ItmError::PortDisabled(port) => write!(f, "stimulus port {} is disabled", port),
            ItmError::InvalidPort(port) => write!(f, "no stimulus port {}", port),
            ItmError::TimedOut => f.write_str("timed out waiting for the ITM"),
            ItmError::InvalidConfig => f.write_str("invalid ITM configuration"),
            ItmError::AlreadyInitialized => f.write_str("ITM logger already installed"),
        }
    }
}

/// Result alias for ITM operations
pub type Result<T> = core::result::Result<T, ItmError>;

/// Collapse a result into a status code
pub fn to_status(result: Result<()>) -> rx_status_t {
    match result {
        Ok(()) => RX_OK,
        Err(e) => e.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn status_codes() {
        assert_eq!(to_status(Ok(())), RX_OK);
        assert_eq!(to_status(Err(ItmError::TimedOut)), RX_ERR_TIMED_OUT);
        assert_eq!(ItmError::PortDisabled(3).status(), RX_ERR_BAD_STATE);
        assert_eq!(ItmError::InvalidPort(40).status(), RX_ERR_OUT_OF_RANGE);
        assert_eq!(ItmError::InvalidConfig.status(), RX_ERR_INVALID_ARGS);
    }

    #[test]
    fn display_names_the_port() {
        assert_eq!(ItmError::PortDisabled(7).to_string(), "stimulus port 7 is disabled");
        assert_eq!(ItmError::InvalidPort(32).to_string(), "no stimulus port 32");
    }
}
