// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Driver Trace Macros
//!
//! Internal diagnostics go through the `log` facade when the `log` feature
//! is enabled and compile away otherwise.

/// Debug-level driver trace
macro_rules! ltrace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            log::debug!(target: "itm", $($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Warning-level driver trace
macro_rules! lwarn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            log::warn!(target: "itm", $($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}
