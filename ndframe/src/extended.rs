//! Position-space selections that may collapse their dimension.
//!
//! Resolving a label-space selection yields an [`ExtendedSlice`]
//! rather than a bare [`SliceVariant`], since a squeeze maps to one
//! position and removes the dimension instead of slicing it.

use serde::Deserialize;
use serde::Serialize;

use crate::index::IndexType;
use crate::slice::SliceError;
use crate::slice::SliceVariant;

/// A position-space selection that may also collapse its dimension.
///
/// This is what a label-space [`crate::AxisSlice`] resolves to once
/// its labels are mapped through an axis: the whole dimension, a
/// single squeezed position, or a [`SliceVariant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtendedSlice<T> {
    All,
    Squeeze(T),
    Slice(SliceVariant<T>),
}

impl<T: IndexType> ExtendedSlice<T> {
    pub fn get_all(&self) -> bool {
        matches!(self, ExtendedSlice::All)
    }

    /// The squeezed position, if this selection collapses its dimension.
    pub fn get_squeeze(&self) -> Option<T> {
        match self {
            ExtendedSlice::Squeeze(pos) => Some(*pos),
            _ => None,
        }
    }

    pub fn get_slice(&self) -> Option<&SliceVariant<T>> {
        match self {
            ExtendedSlice::Slice(slice) => Some(slice),
            _ => None,
        }
    }

    /// The slice to apply to a dimension of `size` indices, or `None`
    /// if the dimension is squeezed out. Fails if `size` is negative.
    pub fn to_slice(&self, size: T) -> Result<Option<SliceVariant<T>>, SliceError> {
        Ok(match self {
            ExtendedSlice::All => Some(SliceVariant::all(size)?),
            ExtendedSlice::Squeeze(_) => None,
            ExtendedSlice::Slice(slice) => Some(*slice),
        })
    }

    pub fn convert<S>(&self) -> ExtendedSlice<S>
    where
        S: IndexType + From<T>,
    {
        match self {
            ExtendedSlice::All => ExtendedSlice::All,
            ExtendedSlice::Squeeze(pos) => ExtendedSlice::Squeeze((*pos).into()),
            ExtendedSlice::Slice(slice) => ExtendedSlice::Slice(slice.convert()),
        }
    }

    pub fn try_convert<S: IndexType>(&self) -> Result<ExtendedSlice<S>, SliceError> {
        Ok(match self {
            ExtendedSlice::All => ExtendedSlice::All,
            ExtendedSlice::Squeeze(pos) => ExtendedSlice::Squeeze(
                crate::index::cast_index(*pos).ok_or_else(|| SliceError::IndexConversion {
                    value: pos.to_string(),
                    target: std::any::type_name::<S>(),
                })?,
            ),
            ExtendedSlice::Slice(slice) => ExtendedSlice::Slice(slice.try_convert()?),
        })
    }
}

impl<T> From<SliceVariant<T>> for ExtendedSlice<T> {
    fn from(slice: SliceVariant<T>) -> Self {
        ExtendedSlice::Slice(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::variant_range;

    #[test]
    fn test_accessors() {
        let all = ExtendedSlice::<u32>::All;
        assert!(all.get_all());
        assert_eq!(all.get_squeeze(), None);
        assert_eq!(all.to_slice(4).unwrap(), Some(SliceVariant::all(4).unwrap()));

        let squeeze = ExtendedSlice::Squeeze(2u32);
        assert!(!squeeze.get_all());
        assert_eq!(squeeze.get_squeeze(), Some(2));
        assert_eq!(squeeze.to_slice(4).unwrap(), None);

        let slice = ExtendedSlice::from(variant_range(1u32, 3).unwrap());
        assert_eq!(slice.get_slice(), Some(&variant_range(1u32, 3).unwrap()));
        assert_eq!(slice.to_slice(4).unwrap(), Some(variant_range(1u32, 3).unwrap()));
        assert!(ExtendedSlice::<i32>::All.to_slice(-1).is_err());
    }

    #[test]
    fn test_convert() {
        assert_eq!(
            ExtendedSlice::Squeeze(7u8).convert::<u64>(),
            ExtendedSlice::Squeeze(7u64)
        );
        assert_eq!(
            ExtendedSlice::<u8>::All.convert::<i32>(),
            ExtendedSlice::All
        );
        assert_eq!(
            ExtendedSlice::from(variant_range(2i32, 7).unwrap()).convert::<i64>(),
            ExtendedSlice::from(variant_range(2i64, 7).unwrap())
        );
        assert!(ExtendedSlice::Squeeze(300i32).try_convert::<u8>().is_err());
        assert_eq!(
            ExtendedSlice::Squeeze(30i32).try_convert::<u8>().unwrap(),
            ExtendedSlice::Squeeze(30u8)
        );
    }
}
