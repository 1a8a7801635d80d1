//! Integer types used as positions along an axis.
//!
//! Slices and axes are generic over their position type so that a
//! storage engine can pick the width it indexes with. Every primitive
//! integer qualifies through the blanket implementation of
//! [`IndexType`].

use std::fmt;
use std::hash::Hash;

use num_traits::NumCast;
use num_traits::PrimInt;

/// A primitive integer usable as a physical or logical position.
pub trait IndexType: PrimInt + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> IndexType for T where T: PrimInt + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// Casts `value` into the index type `S`, or `None` if it is not
/// representable there.
pub fn cast_index<S: IndexType, T: IndexType>(value: T) -> Option<S> {
    <S as NumCast>::from(value)
}

/// The position of the `n`th element, if `n` fits in `T`.
pub(crate) fn from_usize<T: IndexType>(n: usize) -> Option<T> {
    <T as NumCast>::from(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_index() {
        assert_eq!(cast_index::<i64, i32>(-3), Some(-3i64));
        assert_eq!(cast_index::<u8, i32>(255), Some(255u8));
        assert_eq!(cast_index::<u8, i32>(256), None);
        assert_eq!(cast_index::<u32, i64>(-1), None);
    }

    #[test]
    fn test_from_usize() {
        assert_eq!(from_usize::<i16>(12), Some(12i16));
        assert_eq!(from_usize::<i8>(1000), None);
    }
}
