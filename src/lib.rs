//! ## Intro
//!
//! A type-erased dynamic array that keeps small payloads in an inline buffer
//! and automatically spills to the heap when needed.
//!
//! Unlike [`Vec<T>`], the element type is not a compile-time parameter: you
//! pick a byte width at construction and the array copies raw byte images in
//! and out. That makes it the right container when element layout is only
//! known at runtime — wire records, FFI structs, column batches — and the
//! wrong one for anything owning resources (no drop glue ever runs).
//!
//! Many such workloads stay small. The array therefore starts in a fixed
//! inline slot of `N` bytes embedded in the object itself, with zero heap
//! traffic, and migrates to an owned heap block only when the payload
//! actually outgrows the slot.
//!
//! ```
//! use dynarray::DynArray;
//!
//! // 8-byte elements in a 256-byte inline slot.
//! let mut arr: DynArray<256> = DynArray::new(8)?;
//! assert!(arr.is_inline());
//!
//! for v in 0u64..40 {
//!     arr.push(&v.to_ne_bytes())?;
//! }
//! assert!(!arr.is_inline()); // 40 * 8 > 256: spilled to the heap
//!
//! let mut out = [0u8; 8];
//! arr.pop_into(&mut out)?;
//! assert_eq!(u64::from_ne_bytes(out), 39);
//!
//! // Give the surplus back; 39 * 8 > 256, so the heap block shrinks instead.
//! arr.shrink_to_fit()?;
//! assert_eq!(arr.capacity(), 39);
//! # Ok::<(), dynarray::ArrayError>(())
//! ```
//!
//! ## Design
//!
//! - **Fallible everywhere**: operations that can allocate return
//!   [`Result`]; there is no panicking growth path, and a failed call leaves
//!   the array exactly as it was.
//! - **Overflow-checked**: `capacity * elem_size` is verified before any
//!   allocator call, so huge requests fail with
//!   [`CapacityOverflow`](ArrayError::CapacityOverflow) instead of wrapping.
//! - **Explicit memory control**: [`reserve`](DynArray::reserve) grows ahead
//!   of time, [`shrink_to_fit`](DynArray::shrink_to_fit) releases surplus and
//!   moves small payloads back inline. Nothing shrinks implicitly.
//!
//! ### Alias
//!
//! - [`MiniArray`] = `DynArray<64>` — for small records
//! - [`FastArray`] = `DynArray<256>` — general-purpose balance
//!
//! ## `no_std` support
//!
//! This crate requires only `core` and `alloc`, making it suitable for
//! embedded and no_std environments. The `std` feature (on by default) adds
//! the [`std::io::Write`] impl.
//!
//! ## Optional features
//!
//! ### `serde`
//!
//! When this optional dependency is enabled, [`DynArray`] implements the
//! [`serde::Serialize`] and [`serde::Deserialize`] traits, carrying the
//! element width alongside the raw bytes so a round trip restores the exact
//! element boundaries.
//!
//! [`serde::Serialize`]: https://docs.rs/serde/latest/serde/trait.Serialize.html
//! [`serde::Deserialize`]: https://docs.rs/serde/latest/serde/trait.Deserialize.html
//! [`Vec<T>`]: alloc::vec::Vec
//! [`std::io::Write`]: https://doc.rust-lang.org/std/io/trait.Write.html
#![no_std]

extern crate alloc;

mod utils;

mod error;
mod growth;
mod storage;

pub mod dyn_array;

#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "std")]
mod std_io;

#[doc(inline)]
pub use dyn_array::DynArray;
pub use error::{ArrayError, Result};

/// A small `DynArray` with a 64-byte inline slot.
///
/// This is an alias for [`DynArray<64>`].
///
/// `MiniArray` suits narrow records that rarely number more than a handful,
/// such as small fixed-width keys or per-frame scratch entries. It keeps them
/// inline with no heap allocation and spills transparently when the payload
/// grows past 64 bytes.
///
/// # Examples
///
/// ```
/// # use dynarray::MiniArray;
/// let mut arr = MiniArray::new(4).unwrap();
/// assert_eq!(arr.capacity(), 16);
///
/// for v in 0u32..16 {
///     arr.push(&v.to_ne_bytes()).unwrap();
/// }
/// assert!(arr.is_inline());
///
/// arr.push(&16u32.to_ne_bytes()).unwrap();
/// assert!(!arr.is_inline());
/// ```
pub type MiniArray = DynArray<64>;

/// A general-purpose `DynArray` with a 256-byte inline slot.
///
/// This is an alias for [`DynArray<256>`].
///
/// `FastArray` is a balanced default: 256 bytes is enough for a few dozen
/// small records or a handful of wide ones, while keeping the array object
/// itself cheap to embed in other structures.
///
/// # Examples
///
/// ```
/// # use dynarray::FastArray;
/// let mut arr = FastArray::new(1).unwrap();
///
/// for i in 0..300usize {
///     arr.push(&[(i % 256) as u8]).unwrap();
/// }
/// // 256 one-byte elements fit inline; the 257th moved everything to the heap.
/// assert!(!arr.is_inline());
/// assert_eq!(arr.len(), 300);
/// ```
pub type FastArray = DynArray<256>;
