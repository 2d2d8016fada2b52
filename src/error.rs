/// Error type for every fallible [`DynArray`](crate::DynArray) operation.
///
/// The array never logs or retries: each failure is reported synchronously to
/// the caller, and the array stays valid and usable afterwards with its prior
/// contents intact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// The allocator refused an allocation or an in-place resize.
    ///
    /// The storage that existed before the call is still live and unchanged.
    AllocFailed { new_bytes: usize },
    /// `capacity * elem_size` is not representable as an allocation size.
    ///
    /// Detected before any allocation attempt is made.
    CapacityOverflow { capacity: usize, elem_size: usize },
    /// Construction was attempted with an element width of zero.
    ZeroElemSize,
    /// A caller-supplied buffer has a length incompatible with the element
    /// width (wrong width for `push`/`pop_into`, not a whole number of
    /// elements for `extend_from_slice`).
    ElemSizeMismatch { expected: usize, got: usize },
    /// `pop` or `pop_into` was called on an empty array.
    Empty,
}

impl core::fmt::Display for ArrayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AllocFailed { new_bytes } => {
                write!(f, "allocation of {} bytes failed", new_bytes)
            }
            Self::CapacityOverflow {
                capacity,
                elem_size,
            } => {
                write!(
                    f,
                    "capacity {} of {}-byte elements overflows the allocation size range",
                    capacity, elem_size
                )
            }
            Self::ZeroElemSize => {
                write!(f, "element size must be non-zero")
            }
            Self::ElemSizeMismatch { expected, got } => {
                write!(
                    f,
                    "buffer length {} does not match the element size {}",
                    got, expected
                )
            }
            Self::Empty => {
                write!(f, "the array is empty")
            }
        }
    }
}

impl core::error::Error for ArrayError {}

/// Shorthand for results carrying an [`ArrayError`].
pub type Result<T> = core::result::Result<T, ArrayError>;
