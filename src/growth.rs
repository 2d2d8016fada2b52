//! Capacity arithmetic for [`DynArray`](crate::DynArray).
//!
//! Growth is geometric doubling so that repeated `push` stays amortized O(1).
//! Every byte size is checked here before any allocation is attempted, so the
//! storage code below never has to reason about wrapping arithmetic.

use crate::error::{ArrayError, Result};
use crate::storage::BUF_ALIGN;

/// Largest byte size the allocator interface accepts. Rust allocations are
/// capped at `isize::MAX` rounded for alignment padding.
pub(crate) const MAX_BYTES: usize = isize::MAX as usize - (BUF_ALIGN - 1);

/// Smallest capacity reachable by repeated doubling from `current` that is
/// `>= min_capacity`, starting at 1 when the current capacity is 0.
///
/// If doubling would overflow, the result is clamped to `min_capacity`
/// directly; whether that capacity is actually representable in bytes is
/// decided by [`byte_len`].
pub(crate) fn grow_capacity(current: usize, min_capacity: usize) -> usize {
    let mut new_cap = current.max(1);
    while new_cap < min_capacity {
        match new_cap.checked_mul(2) {
            Some(doubled) => new_cap = doubled,
            None => return min_capacity,
        }
    }
    new_cap
}

/// Overflow-checked byte size of `count` elements of `elem_size` bytes.
pub(crate) fn byte_len(count: usize, elem_size: usize) -> Result<usize> {
    match count.checked_mul(elem_size) {
        Some(bytes) if bytes <= MAX_BYTES => Ok(bytes),
        _ => Err(ArrayError::CapacityOverflow {
            capacity: count,
            elem_size,
        }),
    }
}

/// Capacity wanted by a `push` that found no spare slot: double, or one more
/// element when doubling would overflow or not make progress.
pub(crate) fn push_target(capacity: usize) -> usize {
    match capacity.checked_mul(2) {
        Some(doubled) if doubled > capacity => doubled,
        _ => capacity.saturating_add(1),
    }
}
