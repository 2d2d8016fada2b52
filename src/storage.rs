//! Physical storage for [`DynArray`](crate::DynArray): the inline slot, the
//! owned heap block, and the enum that says which of the two is live.
//!
//! Exactly one variant is active at a time. Migrations between them are plain
//! byte copies performed by the container; this module only owns allocation,
//! resizing and release of the bytes themselves.

use alloc::alloc::{Layout, alloc, dealloc, realloc};
use core::{mem::MaybeUninit, ptr::NonNull};

use crate::error::{ArrayError, Result};

/// Alignment of both the inline slot and every heap block.
///
/// Matches the strictest fundamental alignment, so callers may reinterpret
/// the buffer as any ordinary element type of matching size.
pub(crate) const BUF_ALIGN: usize = 16;

/// The fixed inline slot: `N` uninitialized bytes embedded in the array
/// object. It has no length of its own; the container tracks how many bytes
/// are live.
#[repr(align(16))]
pub(crate) struct InlineBuf<const N: usize> {
    data: [MaybeUninit<u8>; N],
}

impl<const N: usize> InlineBuf<N> {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            data: [MaybeUninit::uninit(); N],
        }
    }

    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *const u8 {
        &raw const self.data as *const u8
    }

    #[inline(always)]
    pub(crate) const fn as_mut_ptr(&mut self) -> *mut u8 {
        &raw mut self.data as *mut u8
    }
}

/// A single-owner heap block of raw bytes.
///
/// The block is exactly `bytes` long and is released on drop. Resizing is
/// in-place semantically: if the allocator fails, the previous block and its
/// contents remain valid and unchanged.
pub(crate) struct HeapBuf {
    ptr: NonNull<u8>,
    bytes: usize,
}

// The block is exclusively owned and holds plain bytes.
unsafe impl Send for HeapBuf {}
unsafe impl Sync for HeapBuf {}

impl HeapBuf {
    /// Allocates a fresh block of `bytes` bytes (uninitialized).
    ///
    /// `bytes` must be non-zero and already validated against
    /// [`MAX_BYTES`](crate::growth::MAX_BYTES).
    pub(crate) fn alloc(bytes: usize) -> Result<Self> {
        debug_assert!(bytes > 0);
        let layout = Self::layout(bytes)?;
        // SAFETY: the layout has non-zero size.
        let ptr = unsafe { alloc(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self { ptr, bytes }),
            None => Err(ArrayError::AllocFailed { new_bytes: bytes }),
        }
    }

    /// Resizes the block to `new_bytes` bytes, growing or shrinking.
    ///
    /// The leading `min(old, new)` bytes keep their values. On failure the
    /// old block is untouched and stays owned by `self`.
    pub(crate) fn realloc(&mut self, new_bytes: usize) -> Result<()> {
        debug_assert!(new_bytes > 0);
        if new_bytes == self.bytes {
            return Ok(());
        }
        let old_layout = Self::layout(self.bytes)?;
        // Validates the new size the same way `alloc` would.
        Self::layout(new_bytes)?;
        // SAFETY: `ptr` was allocated with `old_layout` and `new_bytes` is a
        // valid non-zero size for this alignment.
        let ptr = unsafe { realloc(self.ptr.as_ptr(), old_layout, new_bytes) };
        match NonNull::new(ptr) {
            Some(ptr) => {
                self.ptr = ptr;
                self.bytes = new_bytes;
                Ok(())
            }
            None => Err(ArrayError::AllocFailed {
                new_bytes,
            }),
        }
    }

    #[inline(always)]
    pub(crate) const fn bytes(&self) -> usize {
        self.bytes
    }

    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    pub(crate) const fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    fn layout(bytes: usize) -> Result<Layout> {
        Layout::from_size_align(bytes, BUF_ALIGN).map_err(|_| ArrayError::AllocFailed {
            new_bytes: bytes,
        })
    }
}

impl Drop for HeapBuf {
    fn drop(&mut self) {
        // SAFETY: `ptr` was allocated with this exact layout; sizes that pass
        // `alloc`/`realloc` always form a valid layout again.
        if let Ok(layout) = Self::layout(self.bytes) {
            unsafe { dealloc(self.ptr.as_ptr(), layout) };
        }
    }
}

/// Where the element bytes currently live.
pub(crate) enum Storage<const N: usize> {
    Inline(InlineBuf<N>),
    Heap(HeapBuf),
}

impl<const N: usize> Storage<N> {
    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *const u8 {
        match self {
            Self::Inline(slot) => slot.as_ptr(),
            Self::Heap(buf) => buf.as_ptr(),
        }
    }

    #[inline(always)]
    pub(crate) const fn as_mut_ptr(&mut self) -> *mut u8 {
        match self {
            Self::Inline(slot) => slot.as_mut_ptr(),
            Self::Heap(buf) => buf.as_mut_ptr(),
        }
    }
}
