// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Register Access
//!
//! The driver never dereferences hardware addresses itself. It goes through
//! [`RegisterIo`], which takes byte offsets relative to a peripheral base.
//! [`Mmio`] is the volatile implementation used on hardware.

/// Read a 32-bit register
///
/// # Safety
///
/// `addr` must be a valid, aligned, mapped device register.
#[inline]
pub unsafe fn read_reg32(addr: usize) -> u32 {
    core::ptr::read_volatile(addr as *const u32)
}

/// Write a 32-bit register
///
/// # Safety
///
/// `addr` must be a valid, aligned, mapped device register.
#[inline]
pub unsafe fn write_reg32(addr: usize, val: u32) {
    core::ptr::write_volatile(addr as *mut u32, val)
}

/// Write a 16-bit register
///
/// # Safety
///
/// `addr` must be a valid, 2-byte aligned, mapped device register.
#[inline]
pub unsafe fn write_reg16(addr: usize, val: u16) {
    core::ptr::write_volatile(addr as *mut u16, val)
}

/// Write an 8-bit register
///
/// # Safety
///
/// `addr` must be a valid, mapped device register.
#[inline]
pub unsafe fn write_reg8(addr: usize, val: u8) {
    core::ptr::write_volatile(addr as *mut u8, val)
}

/// Access to a block of device registers.
///
/// Offsets are in bytes from the start of the block. Stores of different
/// widths matter to some peripherals (an ITM stimulus port emits a packet
/// whose size is the store width), so they are separate methods.
pub trait RegisterIo {
    fn read32(&self, offset: usize) -> u32;
    fn write32(&self, offset: usize, value: u32);
    fn write16(&self, offset: usize, value: u16);
    fn write8(&self, offset: usize, value: u8);
}

/// Volatile memory-mapped register block at a fixed base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register block at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the start of a mapped register block large enough for
    /// every offset the owner will access.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the block
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterIo for Mmio {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: the constructor's contract covers every offset used.
        unsafe { read_reg32(self.base + offset) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        // SAFETY: the constructor's contract covers every offset used.
        unsafe { write_reg32(self.base + offset, value) }
    }

    #[inline]
    fn write16(&self, offset: usize, value: u16) {
        // SAFETY: the constructor's contract covers every offset used.
        unsafe { write_reg16(self.base + offset, value) }
    }

    #[inline]
    fn write8(&self, offset: usize, value: u8) {
        // SAFETY: the constructor's contract covers every offset used.
        unsafe { write_reg8(self.base + offset, value) }
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }

    fn write16(&self, offset: usize, value: u16) {
        (**self).write16(offset, value)
    }

    fn write8(&self, offset: usize, value: u8) {
        (**self).write8(offset, value)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmio_reads_and_writes_through_base() {
        let mut block = [0u32; 4];
        let mmio = unsafe { Mmio::new(block.as_mut_ptr() as usize) };

        mmio.write32(4, 0xDEAD_BEEF);
        mmio.write8(8, 0x5A);
        assert_eq!(mmio.read32(4), 0xDEAD_BEEF);
        assert_eq!(mmio.read32(8) & 0xFF, 0x5A);
        assert_eq!(mmio.base(), block.as_ptr() as usize);
    }

    #[test]
    fn narrow_store_leaves_neighbouring_bytes() {
        let mut block = [0xFFFF_FFFFu32; 1];
        let mmio = unsafe { Mmio::new(block.as_mut_ptr() as usize) };

        mmio.write16(0, 0);
        let word = mmio.read32(0);
        assert_eq!(word.count_ones(), 16);
    }
}
