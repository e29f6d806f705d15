//! Low-level primitives for block memory.
//!
//! The only `unsafe` in the crate. Each function documents its contract;
//! [`Block`](crate::Block) is the sole caller and upholds them.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Request `layout` from the global allocator.
///
/// Returns `None` if the allocator reports exhaustion. `layout` must have
/// a non-zero size.
pub(crate) fn allocate(layout: Layout) -> Option<NonNull<u8>> {
    debug_assert!(layout.size() > 0, "zero-sized layouts are never allocated");
    // SAFETY: layout.size() > 0, checked by the caller and asserted above.
    NonNull::new(unsafe { alloc::alloc(layout) })
}

/// Return a block to the global allocator.
///
/// # Safety
///
/// `ptr` must come from [`allocate`] with this exact `layout` and must not
/// have been deallocated already.
pub(crate) unsafe fn deallocate(ptr: NonNull<u8>, layout: Layout) {
    // SAFETY: forwarded from the caller's contract.
    unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
}

/// Write `marker` at offset 0 and every multiple of `stride` below `len`.
///
/// Volatile stores so the writes cannot be elided; each one faults in a
/// physical page. Returns the number of offsets written.
///
/// # Safety
///
/// `ptr` must be valid for writes of `len` bytes and `stride` must be
/// non-zero.
pub(crate) unsafe fn touch(ptr: NonNull<u8>, len: usize, stride: usize, marker: u8) -> usize {
    let mut touched = 0;
    for offset in (0..len).step_by(stride) {
        // SAFETY: offset < len, and ptr is valid for len bytes.
        unsafe { ptr.as_ptr().add(offset).write_volatile(marker) };
        touched += 1;
    }
    touched
}

/// Read the byte at `offset`.
///
/// # Safety
///
/// `offset` must be below the block length and the byte there must have
/// been written by [`touch`].
pub(crate) unsafe fn read(ptr: NonNull<u8>, offset: usize) -> u8 {
    // SAFETY: in bounds and initialised per the caller's contract.
    unsafe { ptr.as_ptr().add(offset).read_volatile() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_writes_every_stride_offset() {
        let layout = Layout::from_size_align(10_000, 4096).unwrap();
        let ptr = allocate(layout).unwrap();
        unsafe {
            let n = touch(ptr, 10_000, 4096, 0xAB);
            assert_eq!(n, 3); // 0, 4096, 8192
            assert_eq!(read(ptr, 0), 0xAB);
            assert_eq!(read(ptr, 4096), 0xAB);
            assert_eq!(read(ptr, 8192), 0xAB);
            deallocate(ptr, layout);
        }
    }

    #[test]
    fn touch_with_unit_stride_covers_everything() {
        let layout = Layout::from_size_align(17, 1).unwrap();
        let ptr = allocate(layout).unwrap();
        unsafe {
            assert_eq!(touch(ptr, 17, 1, 9), 17);
            assert!((0..17).all(|i| read(ptr, i) == 9));
            deallocate(ptr, layout);
        }
    }
}
