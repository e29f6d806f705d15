//! Page-committed memory blocks.
//!
//! A [`Block`] is an owned, stride-aligned raw allocation in which the
//! first byte of every stride-sized page has been written. Only those
//! touched bytes are ever read back; the rest of the block stays
//! uninitialised and is never exposed.

use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

use ballast_core::BallastError;

use crate::raw;

/// An owned ballast allocation. Frees itself on drop.
pub struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
    stride: usize,
    marker: u8,
    touched: usize,
}

// SAFETY: a Block is the unique owner of its allocation; nothing else holds
// the pointer, so moving it between threads is sound.
#[allow(unsafe_code)]
unsafe impl Send for Block {}

// SAFETY: `&Block` only permits reads of bytes that were initialised
// during construction. There is no interior mutability.
#[allow(unsafe_code)]
unsafe impl Sync for Block {}

impl Block {
    /// Allocate `bytes` bytes aligned to `stride` and write `marker` at
    /// every multiple of `stride` below `bytes`.
    ///
    /// A zero-byte block performs no system allocation. `stride` must be a
    /// non-zero power of two, which [`BallastConfig::validate`](ballast_core::BallastConfig::validate)
    /// guarantees.
    pub fn allocate(bytes: usize, stride: usize, marker: u8) -> Result<Self, BallastError> {
        let layout = Layout::from_size_align(bytes, stride)
            .map_err(|_| BallastError::AllocationFailed { requested: bytes })?;

        if bytes == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                layout,
                stride,
                marker,
                touched: 0,
            });
        }

        let ptr =
            raw::allocate(layout).ok_or(BallastError::AllocationFailed { requested: bytes })?;
        #[allow(unsafe_code)]
        // SAFETY: ptr was just allocated with `bytes` bytes; stride is
        // non-zero because Layout accepted it as an alignment.
        let touched = unsafe { raw::touch(ptr, bytes, stride, marker) };

        Ok(Self {
            ptr,
            layout,
            stride,
            marker,
            touched,
        })
    }

    /// Size of the block in bytes.
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// Whether this is the degenerate zero-byte block.
    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    /// Distance between touched offsets.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The value written at each touched offset.
    pub fn marker(&self) -> u8 {
        self.marker
    }

    /// Number of offsets written during construction.
    pub fn touched_pages(&self) -> usize {
        self.touched
    }

    /// Start address of the block, for diagnostics.
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Read back the byte at a touched offset.
    ///
    /// Returns `None` unless `offset` is a multiple of the stride and lies
    /// inside the block.
    pub fn read_touched(&self, offset: usize) -> Option<u8> {
        if offset >= self.len() || offset % self.stride != 0 {
            return None;
        }
        #[allow(unsafe_code)]
        // SAFETY: offset is in bounds and stride-aligned, so it was written
        // by raw::touch during construction.
        let value = unsafe { raw::read(self.ptr, offset) };
        Some(value)
    }

    /// Whether every touched offset still reads back the marker.
    pub fn verify(&self) -> bool {
        (0..self.len())
            .step_by(self.stride)
            .all(|offset| self.read_touched(offset) == Some(self.marker))
    }
}

impl Drop for Block {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        if self.layout.size() == 0 {
            return;
        }
        // SAFETY: ptr came from raw::allocate with self.layout and Drop runs
        // at most once.
        unsafe { raw::deallocate(self.ptr, self.layout) };
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("len", &self.len())
            .field("stride", &self.stride)
            .field("touched", &self.touched)
            .finish()
    }
}
