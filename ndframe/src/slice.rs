//! Position-space slices.
//!
//! A [`SliceVariant`] selects a sub-sequence of physical indices along
//! one dimension of the underlying storage. It is a closed sum over
//! three kinds of selection, each of which maps a logical position
//! `i` in `[0, size)` to the physical index it refers to:
//!
//! - [`RangeSlice`]: the contiguous indices `start..stop`;
//! - [`SteppedSlice`]: every `step`th index in `start..stop`;
//! - [`AllSlice`]: the whole dimension `0..size`.
//!
//! All operations dispatch with a `match` on the active member, so a
//! `SliceVariant` is `Copy`, allocation free, and as cheap to call as
//! the member it holds.

use std::fmt;

use enum_as_inner::EnumAsInner;
use serde::Deserialize;
use serde::Serialize;

use crate::index::IndexType;
use crate::index::cast_index;

/// Errors raised while building or converting a slice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    #[error("invalid range {start}:{stop}: stop precedes start")]
    InvalidRange { start: String, stop: String },

    #[error("invalid step {step}: must be at least 1")]
    InvalidStep { step: String },

    #[error("invalid start {start}: physical indices are non-negative")]
    NegativeStart { start: String },

    #[error("invalid size {size}: must be non-negative")]
    InvalidSize { size: String },

    #[error("index {value} is not representable as {target}")]
    IndexConversion { value: String, target: &'static str },
}

/// The operations shared by every position-space slice.
pub trait IndexSlice<T: IndexType> {
    /// Number of selected indices.
    fn size(&self) -> T;

    /// Whether the physical index `index` is selected.
    fn contains(&self, index: T) -> bool;

    /// The physical index selected at logical position `i`.
    fn at(&self, i: T) -> T;

    /// The physical distance covered by `n` logical steps from `i`.
    fn step_size(&self, i: T, n: T) -> T;

    /// The logical position of the physical index `index`. Inverse of
    /// [`IndexSlice::at`] on selected indices.
    fn revert_index(&self, index: T) -> T;
}

/// The contiguous physical indices `start..stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeSlice<T> {
    start: T,
    stop: T,
}

impl<T: IndexType> RangeSlice<T> {
    /// A range over `start..stop`. Fails if `start` is negative or
    /// `stop < start`.
    pub fn new(start: T, stop: T) -> Result<Self, SliceError> {
        check_start(start)?;
        if stop < start {
            return Err(SliceError::InvalidRange {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }
        Ok(Self { start, stop })
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn stop(&self) -> T {
        self.stop
    }
}

impl<T: IndexType> IndexSlice<T> for RangeSlice<T> {
    fn size(&self) -> T {
        self.stop - self.start
    }

    fn contains(&self, index: T) -> bool {
        index >= self.start && index < self.stop
    }

    fn at(&self, i: T) -> T {
        self.start + i
    }

    fn step_size(&self, _i: T, n: T) -> T {
        n
    }

    fn revert_index(&self, index: T) -> T {
        index - self.start
    }
}

/// Every `step`th physical index in `start..stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SteppedSlice<T> {
    start: T,
    stop: T,
    step: T,
}

impl<T: IndexType> SteppedSlice<T> {
    /// A stepped range over `start..stop`. Fails if `start` is
    /// negative, `stop < start` or `step < 1`.
    pub fn new(start: T, stop: T, step: T) -> Result<Self, SliceError> {
        check_start(start)?;
        if step < T::one() {
            return Err(SliceError::InvalidStep {
                step: step.to_string(),
            });
        }
        if stop < start {
            return Err(SliceError::InvalidRange {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }
        Ok(Self { start, stop, step })
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn stop(&self) -> T {
        self.stop
    }

    pub fn step(&self) -> T {
        self.step
    }
}

impl<T: IndexType> IndexSlice<T> for SteppedSlice<T> {
    fn size(&self) -> T {
        if self.stop <= self.start {
            return T::zero();
        }
        // ceil((stop - start) / step) without overflowing near T::max_value().
        (self.stop - self.start - T::one()) / self.step + T::one()
    }

    fn contains(&self, index: T) -> bool {
        index >= self.start
            && index < self.stop
            && (index - self.start) % self.step == T::zero()
    }

    fn at(&self, i: T) -> T {
        self.start + i * self.step
    }

    fn step_size(&self, _i: T, n: T) -> T {
        n * self.step
    }

    fn revert_index(&self, index: T) -> T {
        (index - self.start) / self.step
    }
}

/// The whole dimension, `0..size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllSlice<T> {
    size: T,
}

impl<T: IndexType> AllSlice<T> {
    /// The indices `0..size`. Fails if `size` is negative.
    pub fn new(size: T) -> Result<Self, SliceError> {
        if size < T::zero() {
            return Err(SliceError::InvalidSize {
                size: size.to_string(),
            });
        }
        Ok(Self { size })
    }
}

impl<T: IndexType> IndexSlice<T> for AllSlice<T> {
    fn size(&self) -> T {
        self.size
    }

    fn contains(&self, index: T) -> bool {
        index >= T::zero() && index < self.size
    }

    fn at(&self, i: T) -> T {
        i
    }

    fn step_size(&self, _i: T, n: T) -> T {
        n
    }

    fn revert_index(&self, index: T) -> T {
        index
    }
}

/// A selection along one dimension: a range, a stepped range, or the
/// whole dimension.
///
/// Equality compares the full state of the active member, so
/// `Range(0, 3)` and `All(3)` are distinct values even though they
/// select the same indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumAsInner)]
pub enum SliceVariant<T> {
    Range(RangeSlice<T>),
    SteppedRange(SteppedSlice<T>),
    All(AllSlice<T>),
}

macro_rules! visit {
    ($slice:expr, $s:ident => $body:expr) => {
        match $slice {
            SliceVariant::Range($s) => $body,
            SliceVariant::SteppedRange($s) => $body,
            SliceVariant::All($s) => $body,
        }
    };
}

impl<T: IndexType> SliceVariant<T> {
    /// Selects `start..stop`.
    pub fn range(start: T, stop: T) -> Result<Self, SliceError> {
        RangeSlice::new(start, stop).map(Self::Range)
    }

    /// Selects every `step`th index of `start..stop`.
    pub fn stepped_range(start: T, stop: T, step: T) -> Result<Self, SliceError> {
        SteppedSlice::new(start, stop, step).map(Self::SteppedRange)
    }

    /// Selects a whole dimension of `size` indices.
    pub fn all(size: T) -> Result<Self, SliceError> {
        AllSlice::new(size).map(Self::All)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == T::zero()
    }

    /// The selected physical indices, in logical order.
    pub fn indices(&self) -> SliceIndices<T> {
        SliceIndices {
            slice: *self,
            next: T::zero(),
        }
    }

    /// Converts into the index type `S`. Only available when every `T`
    /// is representable as an `S`.
    ///
    /// The slice is rebuilt from its first index, its step and its
    /// size, so the result has the same size and selects the same
    /// indices, but a stepped range's stop is normalized to one past
    /// its last selected index.
    pub fn convert<S>(&self) -> SliceVariant<S>
    where
        S: IndexType + From<T>,
    {
        let (start, stop, size, step) = self.parts();
        self.rebuild(start.into(), stop.into(), size.into(), step.into())
    }

    /// Like [`SliceVariant::convert`], for index types that cannot
    /// represent every `T`. Fails if a bound of the rebuilt slice does
    /// not fit in `S`.
    pub fn try_convert<S: IndexType>(&self) -> Result<SliceVariant<S>, SliceError> {
        let (start, stop, size, step) = self.parts();
        Ok(self.rebuild(
            convert_index(start)?,
            convert_index(stop)?,
            convert_index(size)?,
            convert_index(step)?,
        ))
    }

    // First index, tight stop, size and step. The tight stop never
    // exceeds the stored one.
    fn parts(&self) -> (T, T, T, T) {
        match self {
            SliceVariant::Range(r) => (r.start, r.stop, r.size(), T::one()),
            SliceVariant::SteppedRange(r) => {
                let size = r.size();
                let stop = if size == T::zero() {
                    r.start
                } else {
                    r.at(size - T::one()) + T::one()
                };
                (r.start, stop, size, r.step)
            }
            SliceVariant::All(a) => (T::zero(), a.size, a.size, T::one()),
        }
    }

    fn rebuild<S: IndexType>(&self, start: S, stop: S, size: S, step: S) -> SliceVariant<S> {
        match self {
            SliceVariant::Range(_) => SliceVariant::Range(RangeSlice { start, stop }),
            SliceVariant::SteppedRange(_) => {
                SliceVariant::SteppedRange(SteppedSlice { start, stop, step })
            }
            SliceVariant::All(_) => SliceVariant::All(AllSlice { size }),
        }
    }
}

fn check_start<T: IndexType>(start: T) -> Result<(), SliceError> {
    if start < T::zero() {
        return Err(SliceError::NegativeStart {
            start: start.to_string(),
        });
    }
    Ok(())
}

fn convert_index<S: IndexType, T: IndexType>(value: T) -> Result<S, SliceError> {
    cast_index(value).ok_or_else(|| SliceError::IndexConversion {
        value: value.to_string(),
        target: std::any::type_name::<S>(),
    })
}

impl<T: IndexType> IndexSlice<T> for SliceVariant<T> {
    fn size(&self) -> T {
        visit!(self, s => s.size())
    }

    fn contains(&self, index: T) -> bool {
        visit!(self, s => s.contains(index))
    }

    fn at(&self, i: T) -> T {
        visit!(self, s => s.at(i))
    }

    fn step_size(&self, i: T, n: T) -> T {
        visit!(self, s => s.step_size(i, n))
    }

    fn revert_index(&self, index: T) -> T {
        visit!(self, s => s.revert_index(index))
    }
}

impl<T> From<RangeSlice<T>> for SliceVariant<T> {
    fn from(slice: RangeSlice<T>) -> Self {
        Self::Range(slice)
    }
}

impl<T> From<SteppedSlice<T>> for SliceVariant<T> {
    fn from(slice: SteppedSlice<T>) -> Self {
        Self::SteppedRange(slice)
    }
}

impl<T> From<AllSlice<T>> for SliceVariant<T> {
    fn from(slice: AllSlice<T>) -> Self {
        Self::All(slice)
    }
}

impl<T: IndexType> fmt::Display for SliceVariant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceVariant::Range(r) => write!(f, "{}:{}", r.start, r.stop),
            SliceVariant::SteppedRange(r) => write!(f, "{}:{}:{}", r.start, r.stop, r.step),
            SliceVariant::All(a) => write!(f, ":{}", a.size),
        }
    }
}

/// Iterator over the physical indices selected by a [`SliceVariant`].
pub struct SliceIndices<T> {
    slice: SliceVariant<T>,
    next: T,
}

impl<T: IndexType> Iterator for SliceIndices<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next >= self.slice.size() {
            return None;
        }
        let index = self.slice.at(self.next);
        self.next = self.next + T::one();
        Some(index)
    }
}

/// A [`SliceVariant`] over `first..last`.
pub fn variant_range<T: IndexType>(first: T, last: T) -> Result<SliceVariant<T>, SliceError> {
    SliceVariant::range(first, last)
}

/// A [`SliceVariant`] over every `step`th index of `first..last`.
pub fn variant_stepped_range<T: IndexType>(
    first: T,
    last: T,
    step: T,
) -> Result<SliceVariant<T>, SliceError> {
    SliceVariant::stepped_range(first, last, step)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::strategy::gen_slice_variant;

    #[test]
    fn test_range() {
        let s = variant_range(2i32, 7).unwrap();
        assert_eq!(s.size(), 5);
        assert_eq!(s.at(0), 2);
        assert_eq!(s.at(4), 6);
        assert!(!s.contains(1));
        assert!(s.contains(2));
        assert!(s.contains(6));
        assert!(!s.contains(7));
        assert_eq!(s.step_size(0, 3), 3);
        assert_eq!(s.revert_index(6), 4);
        assert_eq!(s.indices().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
        assert_eq!(s.to_string(), "2:7");
    }

    #[test]
    fn test_stepped_range() {
        let s = variant_stepped_range(1usize, 10, 4).unwrap();
        assert_eq!(s.size(), 3);
        assert_eq!(s.indices().collect::<Vec<_>>(), vec![1, 5, 9]);
        assert!(s.contains(5));
        assert!(!s.contains(6));
        assert!(!s.contains(13));
        assert_eq!(s.step_size(1, 2), 8);
        assert_eq!(s.revert_index(9), 2);
        assert_eq!(s.to_string(), "1:10:4");

        // Exact multiples do not round up.
        assert_eq!(variant_stepped_range(0u32, 9, 3).unwrap().size(), 3);
        assert_eq!(variant_stepped_range(4u32, 4, 3).unwrap().size(), 0);
    }

    #[test]
    fn test_all() {
        let s = SliceVariant::all(4i64).unwrap();
        assert_eq!(s.size(), 4);
        assert_eq!(s.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(s.contains(0));
        assert!(!s.contains(4));
        assert!(!s.contains(-1));
        assert_eq!(s.revert_index(3), 3);
        assert_eq!(s.to_string(), ":4");
    }

    #[test]
    fn test_empty() {
        let s = variant_range(3u8, 3).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.indices().count(), 0);
        assert!(SliceVariant::all(0u8).unwrap().is_empty());
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            variant_range(5i32, 2).unwrap_err(),
            SliceError::InvalidRange {
                start: "5".to_string(),
                stop: "2".to_string(),
            }
        );
        assert!(matches!(
            variant_stepped_range(0i32, 4, 0).unwrap_err(),
            SliceError::InvalidStep { step } if step == "0"
        ));
        assert!(matches!(
            variant_stepped_range(0i32, 4, -2).unwrap_err(),
            SliceError::InvalidStep { .. }
        ));
    }

    #[test]
    fn test_negative_bounds() {
        // A negative start would make `stop - start` overflow for wide
        // signed spans.
        assert_eq!(
            variant_range(-100i8, 100).unwrap_err(),
            SliceError::NegativeStart {
                start: "-100".to_string()
            }
        );
        assert!(matches!(
            variant_stepped_range(-1i32, 4, 2).unwrap_err(),
            SliceError::NegativeStart { .. }
        ));
        assert_eq!(variant_range(0i8, 127).unwrap().indices().count(), 127);

        assert_eq!(
            SliceVariant::all(-3i32).unwrap_err(),
            SliceError::InvalidSize {
                size: "-3".to_string()
            }
        );
        assert!(AllSlice::new(-1i64).is_err());
        assert!(SliceVariant::all(0i32).unwrap().is_empty());
    }

    #[test]
    fn test_equality_compares_state() {
        let range = variant_range(0usize, 3).unwrap();
        let all = SliceVariant::all(3usize).unwrap();
        assert_eq!(range.indices().collect::<Vec<_>>(), all.indices().collect::<Vec<_>>());
        assert_ne!(range, all);
        assert_ne!(range, variant_range(0usize, 4).unwrap());
        assert_eq!(range, variant_range(0usize, 3).unwrap());
        assert!(range.as_range().is_some());
        assert!(all.as_all().is_some());
    }

    #[test]
    fn test_convert_widening() {
        let s = variant_range(2i32, 7).unwrap();
        let w: SliceVariant<i64> = s.convert();
        assert_eq!(w.size(), 5);
        for i in -2..12 {
            assert_eq!(s.contains(i), w.contains(i64::from(i)));
        }
        assert_eq!(w, variant_range(2i64, 7).unwrap());

        let all: SliceVariant<u64> = SliceVariant::all(9u32).unwrap().convert();
        assert_eq!(all, SliceVariant::all(9u64).unwrap());
    }

    #[test]
    fn test_convert_normalizes_stepped_stop() {
        let s = variant_stepped_range(1u16, 12, 4).unwrap();
        let w: SliceVariant<u32> = s.convert();
        assert_eq!(w, variant_stepped_range(1u32, 10, 4).unwrap());
        assert_eq!(w.size(), 3);
        assert_eq!(w.indices().collect::<Vec<_>>(), vec![1, 5, 9]);

        let empty = variant_stepped_range(3u16, 3, 2).unwrap();
        assert_eq!(empty.convert::<u32>(), variant_stepped_range(3u32, 3, 2).unwrap());
    }

    #[test]
    fn test_convert_same_width_near_max() {
        // The normalized stop is one past the last selected index, so it
        // cannot pass the stored stop.
        let s = variant_stepped_range(0u16, 65535, 65534).unwrap();
        let same: SliceVariant<u16> = s.convert();
        assert_eq!(same.size(), 2);
        assert_eq!(same, variant_stepped_range(0u16, 65535, 65534).unwrap());
        assert_eq!(same.indices().collect::<Vec<_>>(), vec![0, 65534]);

        let s = variant_stepped_range(0u8, 255, 200).unwrap();
        assert_eq!(s.try_convert::<u8>().unwrap(), variant_stepped_range(0u8, 201, 200).unwrap());
    }

    #[test]
    fn test_try_convert() {
        let s = variant_range(10i64, 20).unwrap();
        assert_eq!(s.try_convert::<u8>().unwrap(), variant_range(10u8, 20).unwrap());

        let s = variant_range(250i64, 260).unwrap();
        assert!(matches!(
            s.try_convert::<u8>().unwrap_err(),
            SliceError::IndexConversion { value, .. } if value == "260"
        ));

        let s = variant_range(300i64, 302).unwrap();
        assert!(matches!(
            s.try_convert::<u8>().unwrap_err(),
            SliceError::IndexConversion { value, .. } if value == "300"
        ));

        let s = variant_stepped_range(0u32, 65535, 65534).unwrap();
        assert!(matches!(
            s.try_convert::<u8>().unwrap_err(),
            SliceError::IndexConversion { value, .. } if value == "65535"
        ));
    }

    #[test]
    fn test_serde() {
        let s = variant_stepped_range(0i32, 8, 2).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<SliceVariant<i32>>(&json).unwrap(), s);
    }

    proptest! {
        #[test]
        fn prop_revert_inverts_at(slice in gen_slice_variant()) {
            for i in 0..slice.size() {
                let index = slice.at(i);
                prop_assert!(slice.contains(index));
                prop_assert_eq!(slice.revert_index(index), i);
            }
        }

        #[test]
        fn prop_convert_preserves_selection(slice in gen_slice_variant()) {
            let wide: SliceVariant<i64> = slice.convert();
            prop_assert_eq!(i64::from(slice.size()), wide.size());
            prop_assert_eq!(
                slice.indices().map(i64::from).collect::<Vec<_>>(),
                wide.indices().collect::<Vec<_>>()
            );
        }

        #[test]
        fn prop_contains_matches_indices(slice in gen_slice_variant()) {
            let selected: Vec<i32> = slice.indices().collect();
            for index in -4..80 {
                prop_assert_eq!(slice.contains(index), selected.contains(&index));
            }
        }
    }
}
