use core::{fmt, ptr, slice};

use crate::{
    error::{ArrayError, Result},
    growth,
    storage::{HeapBuf, InlineBuf, Storage},
    utils::cold_path,
};

/// A type-erased growable array of fixed-size elements, stored inline until
/// the payload outgrows `N` bytes.
///
/// Elements are opaque byte blobs of a width chosen at construction: the
/// array copies exactly `elem_size` bytes per element and never runs
/// constructors, destructors or drop glue. This makes it a byte-blob
/// container, not a generic-element container — use it where the element
/// layout is decided at runtime (wire records, FFI structs, column data).
///
/// Small payloads live in a fixed `N`-byte slot embedded in the object, so no
/// heap allocation happens until the data actually needs it. Growing past the
/// inline budget moves the bytes to an owned heap block;
/// [`shrink_to_fit`](DynArray::shrink_to_fit) moves them back when they fit
/// again.
///
/// Every operation that can fail returns a [`Result`]; on failure the array
/// keeps its previous contents and stays fully usable. Capacity arithmetic is
/// overflow-checked before any allocation is attempted.
///
/// # Examples
///
/// ```
/// use dynarray::DynArray;
///
/// // 4-byte elements, 16-byte inline budget: capacity 4, no allocation yet.
/// let mut arr: DynArray<16> = DynArray::new(4).unwrap();
/// assert!(arr.is_inline());
/// assert_eq!(arr.capacity(), 4);
///
/// for v in 0u32..6 {
///     arr.push(&v.to_ne_bytes()).unwrap();
/// }
///
/// // The fifth push spilled to the heap; the bytes are preserved in order.
/// assert!(!arr.is_inline());
/// assert_eq!(arr.len(), 6);
/// assert_eq!(&arr.as_slice()[..4], 0u32.to_ne_bytes());
/// ```
///
/// # Pointer invalidation
///
/// [`as_ptr`](DynArray::as_ptr)/[`as_mut_ptr`](DynArray::as_mut_ptr) return
/// transient views: any subsequent call that may reallocate or migrate the
/// storage (`push` past capacity, `reserve`, `shrink_to_fit`) invalidates
/// them. The slice and [`back`](DynArray::back) accessors are borrow-scoped,
/// so the compiler enforces this rule for them.
pub struct DynArray<const N: usize> {
    len: usize,
    elem_size: usize,
    storage: Storage<N>,
}

impl<const N: usize> DynArray<N> {
    /// Constructs an empty array for elements of `elem_size` bytes.
    ///
    /// Starts inline when one element fits the inline budget `N`, with
    /// capacity `N / elem_size`. Larger elements get a one-element heap
    /// block up front.
    ///
    /// # Errors
    ///
    /// [`ZeroElemSize`](ArrayError::ZeroElemSize) if `elem_size` is 0;
    /// [`AllocFailed`](ArrayError::AllocFailed) if the initial heap block for
    /// an oversized element cannot be allocated. No partially built array is
    /// ever returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::{DynArray, ArrayError};
    /// let arr: DynArray<256> = DynArray::new(8).unwrap();
    /// assert_eq!(arr.capacity(), 32);
    ///
    /// assert_eq!(DynArray::<256>::new(0), Err(ArrayError::ZeroElemSize));
    /// ```
    pub fn new(elem_size: usize) -> Result<Self> {
        if elem_size == 0 {
            return Err(ArrayError::ZeroElemSize);
        }
        let storage = if elem_size <= N {
            Storage::Inline(InlineBuf::new())
        } else {
            let bytes = growth::byte_len(1, elem_size)?;
            Storage::Heap(HeapBuf::alloc(bytes)?)
        };
        Ok(Self {
            len: 0,
            elem_size,
            storage,
        })
    }

    /// Constructs an empty array with room for at least `capacity` elements.
    ///
    /// Equivalent to [`new`](DynArray::new) followed by
    /// [`reserve`](DynArray::reserve).
    ///
    /// # Errors
    ///
    /// Same conditions as [`new`](DynArray::new) and
    /// [`reserve`](DynArray::reserve).
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynArray;
    /// let arr: DynArray<16> = DynArray::with_capacity(4, 100).unwrap();
    /// assert!(arr.capacity() >= 100);
    /// assert!(!arr.is_inline());
    /// ```
    pub fn with_capacity(elem_size: usize, capacity: usize) -> Result<Self> {
        let mut arr = Self::new(elem_size)?;
        arr.reserve(capacity)?;
        Ok(arr)
    }

    /// Returns the number of elements in the array.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array contains no elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the byte width of one element, fixed at construction.
    #[inline(always)]
    pub const fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// Returns the number of elements the current storage can hold without
    /// reallocating.
    ///
    /// While inline this is `N / elem_size`; while heap-resident it is the
    /// block size in elements. The live block is always an exact multiple of
    /// the element width, so this is never an approximation.
    #[inline]
    pub const fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Inline(_) => N / self.elem_size,
            Storage::Heap(buf) => buf.bytes() / self.elem_size,
        }
    }

    /// Returns `true` while the bytes live in the inline slot.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynArray;
    /// let mut arr: DynArray<8> = DynArray::new(1).unwrap();
    /// assert!(arr.is_inline());
    ///
    /// arr.reserve(9).unwrap();
    /// assert!(!arr.is_inline());
    /// ```
    #[inline(always)]
    pub const fn is_inline(&self) -> bool {
        matches!(&self.storage, Storage::Inline(_))
    }

    /// Resets the logical length to 0.
    ///
    /// Storage and capacity are untouched, and no per-element work happens —
    /// elements are byte blobs with nothing to drop. O(1).
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynArray;
    /// let mut arr: DynArray<16> = DynArray::new(2).unwrap();
    /// arr.push(&[1, 2]).unwrap();
    /// arr.clear();
    /// assert!(arr.is_empty());
    /// assert_eq!(arr.capacity(), 8);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Ensures capacity for at least `min_capacity` elements.
    ///
    /// A no-op when the capacity is already sufficient. Otherwise the target
    /// is the smallest power-of-two-style doubling from the current capacity
    /// that reaches `min_capacity` (clamped to `min_capacity` near the top of
    /// the range), and the bytes move from the inline slot to a heap block if
    /// they have not already.
    ///
    /// # Errors
    ///
    /// [`CapacityOverflow`](ArrayError::CapacityOverflow) when the target
    /// byte size is not representable — detected before any allocation.
    /// [`AllocFailed`](ArrayError::AllocFailed) when the allocator refuses;
    /// the previous storage and contents remain valid in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynArray;
    /// let mut arr: DynArray<16> = DynArray::new(4).unwrap();
    /// arr.push(&5u32.to_ne_bytes()).unwrap();
    ///
    /// arr.reserve(100).unwrap();
    /// assert!(arr.capacity() >= 100);
    /// assert_eq!(arr.as_slice(), 5u32.to_ne_bytes());
    /// ```
    pub fn reserve(&mut self, min_capacity: usize) -> Result<()> {
        if min_capacity <= self.capacity() {
            return Ok(());
        }
        let new_cap = growth::grow_capacity(self.capacity(), min_capacity);
        let new_bytes = growth::byte_len(new_cap, self.elem_size)?;
        match &mut self.storage {
            Storage::Inline(slot) => {
                let mut heap = HeapBuf::alloc(new_bytes)?;
                let live = self.len * self.elem_size;
                if live > 0 {
                    // SAFETY: `live <= N` bytes are initialized in the slot
                    // and the fresh block is at least `live` bytes.
                    unsafe {
                        ptr::copy_nonoverlapping(slot.as_ptr(), heap.as_mut_ptr(), live);
                    }
                }
                self.storage = Storage::Heap(heap);
            }
            Storage::Heap(buf) => buf.realloc(new_bytes)?,
        }
        Ok(())
    }

    /// Reduces the storage to the smallest footprint that holds the current
    /// contents.
    ///
    /// Already-inline arrays are left alone. A heap-resident array whose live
    /// bytes fit the inline budget moves back into the slot and releases the
    /// block. Otherwise the block is resized down to exactly the live byte
    /// count (one element's worth when empty, so the array stays usable).
    /// Calling it twice in a row performs no further mutation.
    ///
    /// # Errors
    ///
    /// [`AllocFailed`](ArrayError::AllocFailed) if shrinking the heap block
    /// fails; the existing larger block stays valid and the length is
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynArray;
    /// let mut arr: DynArray<16> = DynArray::new(4).unwrap();
    /// for v in 0u32..8 {
    ///     arr.push(&v.to_ne_bytes()).unwrap();
    /// }
    /// assert!(!arr.is_inline());
    ///
    /// while arr.len() > 2 {
    ///     arr.pop().unwrap();
    /// }
    /// arr.shrink_to_fit().unwrap();
    /// assert!(arr.is_inline());
    /// assert_eq!(&arr.as_slice()[4..], 1u32.to_ne_bytes());
    /// ```
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let live = self.len * self.elem_size;
        match &mut self.storage {
            Storage::Inline(_) => Ok(()),
            Storage::Heap(buf) => {
                if live <= N && self.elem_size <= N {
                    let mut slot = InlineBuf::new();
                    if live > 0 {
                        // SAFETY: the block holds `live` initialized bytes
                        // and the slot has room for them.
                        unsafe {
                            ptr::copy_nonoverlapping(buf.as_ptr(), slot.as_mut_ptr(), live);
                        }
                    }
                    self.storage = Storage::Inline(slot);
                    Ok(())
                } else {
                    buf.realloc(live.max(self.elem_size))
                }
            }
        }
    }

    /// Appends one element, copying exactly `elem_size` bytes from `elem`.
    ///
    /// Amortized O(1); a growth step costs O(len). Nothing is mutated when an
    /// error is returned.
    ///
    /// # Errors
    ///
    /// [`ElemSizeMismatch`](ArrayError::ElemSizeMismatch) when `elem` is not
    /// exactly one element wide, plus any error from the capacity check
    /// ([`CapacityOverflow`](ArrayError::CapacityOverflow) /
    /// [`AllocFailed`](ArrayError::AllocFailed)).
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::{DynArray, ArrayError};
    /// let mut arr: DynArray<16> = DynArray::new(2).unwrap();
    /// arr.push(&[0xAB, 0xCD]).unwrap();
    /// assert_eq!(arr.len(), 1);
    ///
    /// let err = arr.push(&[0xAB]).unwrap_err();
    /// assert_eq!(err, ArrayError::ElemSizeMismatch { expected: 2, got: 1 });
    /// ```
    pub fn push(&mut self, elem: &[u8]) -> Result<()> {
        if elem.len() != self.elem_size {
            return Err(ArrayError::ElemSizeMismatch {
                expected: self.elem_size,
                got: elem.len(),
            });
        }
        if self.len == self.capacity() {
            self.reserve(growth::push_target(self.capacity()))?;
        }
        debug_assert!(self.len < self.capacity());
        let offset = self.len * self.elem_size;
        // SAFETY: the slot at `offset` lies within the live block, whose byte
        // size was overflow-checked when it was allocated.
        unsafe {
            ptr::copy_nonoverlapping(
                elem.as_ptr(),
                self.storage.as_mut_ptr().add(offset),
                self.elem_size,
            );
        }
        self.len += 1;
        Ok(())
    }

    /// Appends a run of whole elements from a flat byte slice.
    ///
    /// Reserves once up front, so this is cheaper than pushing in a loop for
    /// bulk input (deserialized records, reads from a file).
    ///
    /// # Errors
    ///
    /// [`ElemSizeMismatch`](ArrayError::ElemSizeMismatch) when `bytes` is not
    /// a whole number of elements, plus any error from the capacity check.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynArray;
    /// let mut arr: DynArray<16> = DynArray::new(4).unwrap();
    /// arr.extend_from_slice(&[1, 0, 0, 0, 2, 0, 0, 0]).unwrap();
    /// assert_eq!(arr.len(), 2);
    ///
    /// assert!(arr.extend_from_slice(&[1, 2, 3]).is_err());
    /// ```
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() % self.elem_size != 0 {
            return Err(ArrayError::ElemSizeMismatch {
                expected: self.elem_size,
                got: bytes.len(),
            });
        }
        let count = bytes.len() / self.elem_size;
        if count == 0 {
            return Ok(());
        }
        self.reserve(self.len + count)?;
        let offset = self.len * self.elem_size;
        // SAFETY: `reserve` guaranteed room for `count` more elements.
        unsafe {
            ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.storage.as_mut_ptr().add(offset),
                bytes.len(),
            );
        }
        self.len += count;
        Ok(())
    }

    /// Removes the last element, discarding its bytes. O(1).
    ///
    /// Storage is never shrunk by a pop; call
    /// [`shrink_to_fit`](DynArray::shrink_to_fit) to give memory back.
    ///
    /// # Errors
    ///
    /// [`Empty`](ArrayError::Empty) when there is nothing to remove.
    #[inline]
    pub fn pop(&mut self) -> Result<()> {
        if self.len == 0 {
            cold_path();
            return Err(ArrayError::Empty);
        }
        self.len -= 1;
        Ok(())
    }

    /// Removes the last element and copies its bytes into `out`.
    ///
    /// # Errors
    ///
    /// [`ElemSizeMismatch`](ArrayError::ElemSizeMismatch) when `out` is not
    /// exactly one element wide; [`Empty`](ArrayError::Empty) when the array
    /// has no elements. The array is unchanged in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynArray;
    /// let mut arr: DynArray<16> = DynArray::new(4).unwrap();
    /// arr.push(&7u32.to_ne_bytes()).unwrap();
    ///
    /// let mut out = [0u8; 4];
    /// arr.pop_into(&mut out).unwrap();
    /// assert_eq!(u32::from_ne_bytes(out), 7);
    /// assert!(arr.is_empty());
    /// ```
    pub fn pop_into(&mut self, out: &mut [u8]) -> Result<()> {
        if out.len() != self.elem_size {
            return Err(ArrayError::ElemSizeMismatch {
                expected: self.elem_size,
                got: out.len(),
            });
        }
        if self.len == 0 {
            cold_path();
            return Err(ArrayError::Empty);
        }
        let offset = (self.len - 1) * self.elem_size;
        // SAFETY: the last element's bytes are initialized and in bounds.
        unsafe {
            ptr::copy_nonoverlapping(
                self.storage.as_ptr().add(offset),
                out.as_mut_ptr(),
                self.elem_size,
            );
        }
        self.len -= 1;
        Ok(())
    }

    /// Returns the last element's bytes, or `None` if the array is empty.
    #[inline]
    pub fn back(&self) -> Option<&[u8]> {
        if self.len == 0 {
            cold_path();
            return None;
        }
        let offset = (self.len - 1) * self.elem_size;
        // SAFETY: the last element's bytes are initialized and in bounds.
        Some(unsafe { slice::from_raw_parts(self.storage.as_ptr().add(offset), self.elem_size) })
    }

    /// Returns the last element's bytes mutably, or `None` if the array is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynArray;
    /// let mut arr: DynArray<16> = DynArray::new(2).unwrap();
    /// assert!(arr.back_mut().is_none());
    ///
    /// arr.push(&[1, 2]).unwrap();
    /// arr.back_mut().unwrap()[0] = 9;
    /// assert_eq!(arr.back().unwrap(), &[9, 2]);
    /// ```
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut [u8]> {
        if self.len == 0 {
            cold_path();
            return None;
        }
        let offset = (self.len - 1) * self.elem_size;
        let elem_size = self.elem_size;
        // SAFETY: the last element's bytes are initialized and in bounds.
        Some(unsafe {
            slice::from_raw_parts_mut(self.storage.as_mut_ptr().add(offset), elem_size)
        })
    }

    /// The first `len * elem_size` bytes of the active storage: every pushed
    /// element's byte image, in insertion order. Intended for bulk reads
    /// (hashing, serialization, `fwrite`-style output).
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: exactly `len * elem_size` leading bytes are initialized.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len * self.elem_size) }
    }

    /// The live bytes, mutably. Intended for bulk writes that keep the
    /// element boundaries intact (patching records in place).
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let bytes = self.len * self.elem_size;
        // SAFETY: exactly `bytes` leading bytes are initialized.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), bytes) }
    }

    /// Raw pointer to the active storage.
    ///
    /// Invalidated by any subsequent operation that may reallocate or
    /// migrate the storage (`push` past capacity, `reserve`,
    /// `shrink_to_fit`).
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const u8 {
        self.storage.as_ptr()
    }

    /// Raw mutable pointer to the active storage. Same invalidation contract
    /// as [`as_ptr`](DynArray::as_ptr).
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut u8 {
        self.storage.as_mut_ptr()
    }
}

impl<const N: usize> fmt::Debug for DynArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArray")
            .field("elem_size", &self.elem_size)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("inline", &self.is_inline())
            .finish()
    }
}

impl<const N: usize> AsRef<[u8]> for DynArray<N> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<const N: usize> AsMut<[u8]> for DynArray<N> {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl<const N: usize, const P: usize> PartialEq<DynArray<P>> for DynArray<N> {
    /// Two arrays are equal when their element width and live bytes match,
    /// regardless of where the bytes are stored.
    #[inline]
    fn eq(&self, other: &DynArray<P>) -> bool {
        self.elem_size == other.elem_size && self.as_slice() == other.as_slice()
    }
}

impl<const N: usize> Eq for DynArray<N> {}

impl<const N: usize> PartialEq<[u8]> for DynArray<N> {
    #[inline]
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl<const N: usize> PartialEq<&[u8]> for DynArray<N> {
    #[inline]
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_slice() == *other
    }
}

impl<const N: usize, const P: usize> PartialEq<[u8; P]> for DynArray<N> {
    #[inline]
    fn eq(&self, other: &[u8; P]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn rejects_zero_elem_size() {
        assert_eq!(DynArray::<16>::new(0), Err(ArrayError::ZeroElemSize));
    }

    #[test]
    fn small_elements_start_inline() {
        let arr: DynArray<256> = DynArray::new(1).unwrap();
        assert!(arr.is_inline());
        assert_eq!(arr.capacity(), 256);
        assert_eq!(arr.len(), 0);
        assert_eq!(arr.elem_size(), 1);
    }

    #[test]
    fn oversized_elements_start_on_the_heap() {
        let arr: DynArray<16> = DynArray::new(64).unwrap();
        assert!(!arr.is_inline());
        assert_eq!(arr.capacity(), 1);
    }

    #[test]
    fn push_preserves_byte_images_in_order() {
        let mut arr: DynArray<32> = DynArray::new(4).unwrap();
        let mut expected = Vec::new();
        for v in 0u32..20 {
            arr.push(&v.to_ne_bytes()).unwrap();
            expected.extend_from_slice(&v.to_ne_bytes());
            assert_eq!(arr.len() as u32, v + 1);
            assert!(arr.len() <= arr.capacity());
        }
        assert_eq!(arr.as_slice(), expected.as_slice());
    }

    #[test]
    fn spills_to_heap_past_the_inline_budget() {
        // The 256-byte budget holds 256 one-byte elements; the 257th push
        // must migrate to the heap without losing a byte.
        let mut arr: DynArray<256> = DynArray::new(1).unwrap();
        for i in 0..300usize {
            arr.push(&[(i % 256) as u8]).unwrap();
            if i < 256 {
                assert!(arr.is_inline());
            } else {
                assert!(!arr.is_inline());
            }
        }
        assert_eq!(arr.len(), 300);
        assert!(arr.capacity() >= 300);
        for (i, byte) in arr.as_slice().iter().enumerate() {
            assert_eq!(*byte, (i % 256) as u8);
        }
    }

    #[test]
    fn push_pop_round_trip_restores_length() {
        let mut arr: DynArray<16> = DynArray::new(8).unwrap();
        arr.push(&11u64.to_ne_bytes()).unwrap();
        let before = arr.len();

        arr.push(&42u64.to_ne_bytes()).unwrap();
        let mut out = [0u8; 8];
        arr.pop_into(&mut out).unwrap();

        assert_eq!(u64::from_ne_bytes(out), 42);
        assert_eq!(arr.len(), before);
        assert_eq!(arr.back().unwrap(), 11u64.to_ne_bytes().as_slice());
    }

    #[test]
    fn pop_and_back_on_empty() {
        let mut arr: DynArray<16> = DynArray::new(4).unwrap();
        assert_eq!(arr.pop(), Err(ArrayError::Empty));
        let mut out = [0u8; 4];
        assert_eq!(arr.pop_into(&mut out), Err(ArrayError::Empty));
        assert!(arr.back().is_none());
        assert!(arr.back_mut().is_none());
    }

    #[test]
    fn wrong_width_buffers_are_rejected_without_mutation() {
        let mut arr: DynArray<16> = DynArray::new(4).unwrap();
        arr.push(&[1, 2, 3, 4]).unwrap();

        assert_eq!(
            arr.push(&[1, 2, 3]),
            Err(ArrayError::ElemSizeMismatch {
                expected: 4,
                got: 3
            })
        );
        let mut short = [0u8; 2];
        assert_eq!(
            arr.pop_into(&mut short),
            Err(ArrayError::ElemSizeMismatch {
                expected: 4,
                got: 2
            })
        );
        assert_eq!(arr.len(), 1);
        assert_eq!(arr.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn clear_is_idempotent_and_keeps_capacity() {
        let mut arr: DynArray<8> = DynArray::new(2).unwrap();
        for _ in 0..10 {
            arr.push(&[1, 2]).unwrap();
        }
        let cap = arr.capacity();

        arr.clear();
        assert!(arr.is_empty());
        assert_eq!(arr.capacity(), cap);

        arr.clear();
        assert!(arr.is_empty());
        assert_eq!(arr.capacity(), cap);
    }

    #[test]
    fn reserve_is_a_noop_when_satisfied() {
        let mut arr: DynArray<64> = DynArray::new(8).unwrap();
        assert_eq!(arr.capacity(), 8);
        arr.reserve(5).unwrap();
        assert!(arr.is_inline());
        assert_eq!(arr.capacity(), 8);
    }

    #[test]
    fn reserve_overflow_is_detected_before_allocating() {
        let mut arr: DynArray<16> = DynArray::new(8).unwrap();
        arr.push(&[7; 8]).unwrap();

        let err = arr.reserve(usize::MAX / 4).unwrap_err();
        assert!(matches!(err, ArrayError::CapacityOverflow { elem_size: 8, .. }));

        // Failure left the array untouched.
        assert_eq!(arr.len(), 1);
        assert_eq!(arr.as_slice(), &[7; 8]);
        assert!(arr.is_inline());
    }

    #[test]
    fn shrink_moves_contents_back_inline() {
        let mut arr: DynArray<16> = DynArray::new(4).unwrap();
        for v in 0u32..10 {
            arr.push(&v.to_ne_bytes()).unwrap();
        }
        assert!(!arr.is_inline());

        while arr.len() > 3 {
            arr.pop().unwrap();
        }
        arr.shrink_to_fit().unwrap();

        assert!(arr.is_inline());
        assert_eq!(arr.capacity(), 4);
        let mut expected = Vec::new();
        for v in 0u32..3 {
            expected.extend_from_slice(&v.to_ne_bytes());
        }
        assert_eq!(arr.as_slice(), expected.as_slice());
    }

    #[test]
    fn shrink_trims_a_heap_block_that_cannot_go_inline() {
        let mut arr: DynArray<8> = DynArray::new(4).unwrap();
        for v in 0u32..9 {
            arr.push(&v.to_ne_bytes()).unwrap();
        }
        assert!(!arr.is_inline());
        assert!(arr.capacity() > 9);

        arr.shrink_to_fit().unwrap();
        assert!(!arr.is_inline());
        assert_eq!(arr.capacity(), 9);
        assert_eq!(arr.len(), 9);
    }

    #[test]
    fn shrink_is_idempotent() {
        let mut arr: DynArray<8> = DynArray::new(4).unwrap();
        for v in 0u32..9 {
            arr.push(&v.to_ne_bytes()).unwrap();
        }
        arr.shrink_to_fit().unwrap();
        let cap = arr.capacity();
        let ptr = arr.as_ptr();

        arr.shrink_to_fit().unwrap();
        assert_eq!(arr.capacity(), cap);
        assert_eq!(arr.as_ptr(), ptr);

        // Inline arrays are a no-op too.
        let mut inline: DynArray<8> = DynArray::new(2).unwrap();
        inline.shrink_to_fit().unwrap();
        inline.shrink_to_fit().unwrap();
        assert!(inline.is_inline());
    }

    #[test]
    fn empty_oversized_element_array_keeps_a_usable_block() {
        // One element is wider than the inline budget, so the array can never
        // be inline; shrinking while empty keeps a one-element block.
        let mut arr: DynArray<8> = DynArray::new(32).unwrap();
        arr.push(&[0xEE; 32]).unwrap();
        arr.push(&[0xFF; 32]).unwrap();
        arr.pop().unwrap();
        arr.pop().unwrap();

        arr.shrink_to_fit().unwrap();
        assert!(!arr.is_inline());
        assert_eq!(arr.capacity(), 1);

        arr.push(&[0xAA; 32]).unwrap();
        assert_eq!(arr.back().unwrap(), &[0xAA; 32][..]);
    }

    #[test]
    fn extend_from_slice_appends_whole_elements() {
        let mut arr: DynArray<8> = DynArray::new(4).unwrap();
        arr.push(&[9, 9, 9, 9]).unwrap();
        arr.extend_from_slice(&[1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0])
            .unwrap();
        assert_eq!(arr.len(), 4);
        assert_eq!(&arr.as_slice()[..4], &[9, 9, 9, 9]);

        assert!(matches!(
            arr.extend_from_slice(&[1, 2, 3, 4, 5]),
            Err(ArrayError::ElemSizeMismatch {
                expected: 4,
                got: 5
            })
        ));
        assert_eq!(arr.len(), 4);

        // Empty input is a successful no-op.
        arr.extend_from_slice(&[]).unwrap();
        assert_eq!(arr.len(), 4);
    }

    #[test]
    fn back_mut_writes_through() {
        let mut arr: DynArray<16> = DynArray::new(4).unwrap();
        arr.push(&1u32.to_ne_bytes()).unwrap();
        arr.push(&2u32.to_ne_bytes()).unwrap();

        arr.back_mut().unwrap().copy_from_slice(&9u32.to_ne_bytes());

        let mut out = [0u8; 4];
        arr.pop_into(&mut out).unwrap();
        assert_eq!(u32::from_ne_bytes(out), 9);
        assert_eq!(arr.back().unwrap(), 1u32.to_ne_bytes().as_slice());
    }

    #[test]
    fn equality_ignores_storage_location() {
        let mut inline: DynArray<64> = DynArray::new(4).unwrap();
        let mut heap: DynArray<8> = DynArray::new(4).unwrap();
        for v in 0u32..4 {
            inline.push(&v.to_ne_bytes()).unwrap();
            heap.push(&v.to_ne_bytes()).unwrap();
        }
        assert!(inline.is_inline());
        assert!(!heap.is_inline());
        assert_eq!(inline, heap);

        heap.pop().unwrap();
        assert_ne!(inline, heap);
    }

    #[test]
    fn as_mut_slice_patches_in_place() {
        let mut arr: DynArray<16> = DynArray::new(2).unwrap();
        arr.extend_from_slice(&[1, 2, 3, 4]).unwrap();
        arr.as_mut_slice()[2] = 7;
        assert_eq!(arr, [1, 2, 7, 4]);
    }
}
