//! Sentinel-based key trait for zero-cost optional indices.
//!
//! Uses a reserved sentinel value (e.g., `u32::MAX`) instead of `Option<K>`
//! to keep node link fields at their natural width.

/// A copyable index type with a sentinel "none" value.
///
/// Node links in the ring are stored as keys into the backing storage;
/// the sentinel value marks a link that points nowhere (a detached node,
/// or the end of a temporarily linearized chain).
///
/// # Example
///
/// ```
/// use ringseq::Key;
///
/// let key: u32 = 5;
/// let none: u32 = u32::NONE;
///
/// assert!(key.is_some());
/// assert!(none.is_none());
/// ```
pub trait Key: Copy + Eq {
    /// Sentinel value representing "no key" / null.
    const NONE: Self;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Returns the key as a `usize`, for indexing and bounds checks.
    fn as_usize(self) -> usize;

    /// Creates a key from a `usize` slot index.
    fn from_usize(val: usize) -> Self;
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(val: usize) -> Self {
                    debug_assert!(val < <$ty>::MAX as usize);
                    val as $ty
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u16, u32, usize);
