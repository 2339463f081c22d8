// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! ITM Register Definitions
//!
//! Instrumentation Trace Macrocell register map, as found on ARMv7-M and
//! ARMv8-M cores in the System Control Space.
//!
//! # Register Map
//!
//! | Offset | Name      | Description                      |
//! |--------|-----------|----------------------------------|
//! | 0x000  | STIM[n]   | Stimulus Port n (n = 0..31)      |
//! | 0xE00  | TER       | Trace Enable Register            |
//! | 0xE40  | TPR       | Trace Privilege Register         |
//! | 0xE80  | TCR       | Trace Control Register           |
//! | 0xFB0  | LAR       | Lock Access Register             |
//! | 0xFB4  | LSR       | Lock Status Register             |

// ============================================================================
// Addresses
// ============================================================================

/// Base of the ITM block (stimulus port 0)
pub const ITM_BASE: usize = 0xE000_0000;

/// Number of stimulus ports on ARMv7-M
pub const STIM_COUNT: usize = 32;

const ITM_STIM: usize = 0x000; // Stimulus Port 0
pub const ITM_TER: usize = 0xE00; // Trace Enable Register
pub const ITM_TPR: usize = 0xE40; // Trace Privilege Register
pub const ITM_TCR: usize = 0xE80; // Trace Control Register
pub const ITM_LAR: usize = 0xFB0; // Lock Access Register
pub const ITM_LSR: usize = 0xFB4; // Lock Status Register

/// Offset of stimulus port `port`
#[inline]
pub const fn stim(port: u8) -> usize {
    ITM_STIM + (port as usize) * 4
}

// ============================================================================
// Register Bits
// ============================================================================

/// STIM read: FIFO can accept a write
pub const STIM_FIFOREADY: u32 = 1 << 0;

/// Key written to LAR to unlock write access to the ITM
pub const LAR_UNLOCK_KEY: u32 = 0xC5AC_CE55;

/// LSR: lock mechanism present
pub const LSR_PRESENT: u32 = 1 << 0;
/// LSR: writes are currently locked out
pub const LSR_LOCKED: u32 = 1 << 1;

const TCR_TSPRESCALE_SHIFT: u32 = 8;
const TCR_TSPRESCALE_MASK: u32 = 0x3 << TCR_TSPRESCALE_SHIFT;
const TCR_TRACEBUSID_SHIFT: u32 = 16;
const TCR_TRACEBUSID_MASK: u32 = 0x7F << TCR_TRACEBUSID_SHIFT;

/// Largest valid TraceBusID
pub const TRACE_BUS_ID_MAX: u8 = 0x7F;

/// Largest valid timestamp prescaler selector
pub const TS_PRESCALE_MAX: u8 = 0x3;

bitflags::bitflags! {
    /// Single-bit fields of the Trace Control Register
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TraceControl: u32 {
        /// ITM enable
        const ITMENA = 1 << 0;
        /// Local timestamp generation
        const TSENA = 1 << 1;
        /// Synchronisation packet transmission
        const SYNCENA = 1 << 2;
        /// Forward hardware event packets from the DWT
        const TXENA = 1 << 3;
        /// Clock timestamps from the asynchronous SWO clock
        const SWOENA = 1 << 4;
        /// ITM is processing events (read-only)
        const BUSY = 1 << 23;
    }
}

/// Pack a TCR value from its flag bits and multi-bit fields
#[inline]
pub const fn tcr_pack(flags: TraceControl, prescale: u8, bus_id: u8) -> u32 {
    flags.bits()
        | (((prescale as u32) << TCR_TSPRESCALE_SHIFT) & TCR_TSPRESCALE_MASK)
        | (((bus_id as u32) << TCR_TRACEBUSID_SHIFT) & TCR_TRACEBUSID_MASK)
}

/// TSPrescale field of a TCR value
#[inline]
pub const fn tcr_prescale(tcr: u32) -> u8 {
    ((tcr & TCR_TSPRESCALE_MASK) >> TCR_TSPRESCALE_SHIFT) as u8
}

/// TraceBusID field of a TCR value
#[inline]
pub const fn tcr_bus_id(tcr: u32) -> u8 {
    ((tcr & TCR_TRACEBUSID_MASK) >> TCR_TRACEBUSID_SHIFT) as u8
}

// ============================================================================
// Register Block
// ============================================================================

/// Layout of the ITM register block.
#[repr(C)]
pub struct ItmRegisters {
    pub stim: [u32; STIM_COUNT],
    _reserved0: [u32; 864],
    pub ter: u32,
    _reserved1: [u32; 15],
    pub tpr: u32,
    _reserved2: [u32; 15],
    pub tcr: u32,
    _reserved3: [u32; 75],
    pub lar: u32,
    pub lsr: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoffset::offset_of;

    #[test]
    fn register_block_offsets() {
        assert_eq!(offset_of!(ItmRegisters, stim), stim(0));
        assert_eq!(offset_of!(ItmRegisters, ter), ITM_TER);
        assert_eq!(offset_of!(ItmRegisters, tpr), ITM_TPR);
        assert_eq!(offset_of!(ItmRegisters, tcr), ITM_TCR);
        assert_eq!(offset_of!(ItmRegisters, lar), ITM_LAR);
        assert_eq!(offset_of!(ItmRegisters, lsr), ITM_LSR);
    }

    #[test]
    fn stimulus_port_addresses() {
        assert_eq!(ITM_BASE + stim(0), 0xE000_0000);
        assert_eq!(stim(1), 0x004);
        assert_eq!(stim(31), 0x07C);
        assert_eq!(ITM_BASE + ITM_TER, 0xE000_0E00);
        assert_eq!(ITM_BASE + ITM_TCR, 0xE000_0E80);
    }

    #[test]
    fn boot_tcr_value_decodes() {
        let tcr = 0x0001_000D;
        let flags = TraceControl::from_bits_truncate(tcr);

        assert_eq!(
            flags,
            TraceControl::ITMENA | TraceControl::SYNCENA | TraceControl::TXENA
        );
        assert_eq!(tcr_bus_id(tcr), 1);
        assert_eq!(tcr_prescale(tcr), 0);
        assert_eq!(tcr_pack(flags, 0, 1), tcr);
    }

    #[test]
    fn pack_masks_out_of_range_fields() {
        let tcr = tcr_pack(TraceControl::empty(), 0xFF, 0xFF);
        assert_eq!(tcr_prescale(tcr), TS_PRESCALE_MAX);
        assert_eq!(tcr_bus_id(tcr), TRACE_BUS_ID_MAX);
    }
}
