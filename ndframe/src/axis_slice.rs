//! Label-space slices.
//!
//! An [`AxisSlice`] selects along one named axis by label rather than
//! by position. It is resolved against the axis it applies to, which
//! maps its labels to positions and yields a [`SliceVariant`] the
//! storage engine can consume directly.
//!
//! Label ranges are inclusive: `range("b", "d")` selects `b`, `c` and
//! `d`, and resolves to the exclusive position range `axis[b]..axis[d] + 1`.
//!
//! A squeeze selects a single label and collapses its dimension. It has
//! no position range, so asking a squeeze for one is a programming
//! error; callers check [`AxisSlice::get_squeeze`] first, or use
//! [`AxisSlice::resolve`], which handles every kind.

use num_traits::CheckedAdd;
use num_traits::One;
use serde::Deserialize;
use serde::Serialize;

use crate::axis::AxisError;
use crate::axis::LabelAxis;
use crate::extended::ExtendedSlice;
use crate::index::cast_index;
use crate::label::Label;
use crate::slice::SliceError;
use crate::slice::SliceVariant;

/// `ResolveOpts` controls how label ranges are mapped to positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOpts {
    /// Resolve a range whose last label precedes its first label to an
    /// empty range instead of failing.
    pub allow_reversed_ranges: bool,
}

impl ResolveOpts {
    // Reversed ranges are errors.
    pub fn strict() -> Self {
        Self {
            allow_reversed_ranges: false,
        }
    }

    // Reversed ranges select nothing.
    pub fn lenient() -> Self {
        Self {
            allow_reversed_ranges: true,
        }
    }
}

impl Default for ResolveOpts {
    fn default() -> Self {
        Self::strict()
    }
}

/// Builds a position-space slice for an axis of type `A`.
pub trait BuildSlice<A: LabelAxis> {
    fn build_islice_with(
        &self,
        opts: &ResolveOpts,
        axis: &A,
    ) -> Result<SliceVariant<A::Position>, AxisError>;

    /// Builds the slice with [`ResolveOpts::strict`].
    fn build_islice(&self, axis: &A) -> Result<SliceVariant<A::Position>, AxisError> {
        self.build_islice_with(&ResolveOpts::strict(), axis)
    }
}

/// The labels `first..=last`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisRange<L> {
    first: L,
    last: L,
}

impl<L> AxisRange<L> {
    pub fn new(first: L, last: L) -> Self {
        Self { first, last }
    }

    pub fn first(&self) -> &L {
        &self.first
    }

    pub fn last(&self) -> &L {
        &self.last
    }

    fn convert<M: From<L>>(&self) -> AxisRange<M>
    where
        L: Clone,
    {
        AxisRange::new(self.first.clone().into(), self.last.clone().into())
    }
}

impl<A, L> BuildSlice<A> for AxisRange<L>
where
    A: LabelAxis<Label = L>,
    L: std::fmt::Debug,
{
    fn build_islice_with(
        &self,
        opts: &ResolveOpts,
        axis: &A,
    ) -> Result<SliceVariant<A::Position>, AxisError> {
        let (start, stop) = resolve_bounds(opts, axis, &self.first, &self.last)?;
        Ok(SliceVariant::range(start, stop)?)
    }
}

/// Every `step`th label of `first..=last`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisSteppedRange<L> {
    first: L,
    last: L,
    step: usize,
}

impl<L> AxisSteppedRange<L> {
    pub fn new(first: L, last: L, step: usize) -> Self {
        Self { first, last, step }
    }

    pub fn first(&self) -> &L {
        &self.first
    }

    pub fn last(&self) -> &L {
        &self.last
    }

    pub fn step(&self) -> usize {
        self.step
    }

    fn convert<M: From<L>>(&self) -> AxisSteppedRange<M>
    where
        L: Clone,
    {
        AxisSteppedRange::new(self.first.clone().into(), self.last.clone().into(), self.step)
    }
}

impl<A, L> BuildSlice<A> for AxisSteppedRange<L>
where
    A: LabelAxis<Label = L>,
    L: std::fmt::Debug,
{
    fn build_islice_with(
        &self,
        opts: &ResolveOpts,
        axis: &A,
    ) -> Result<SliceVariant<A::Position>, AxisError> {
        let (start, stop) = resolve_bounds(opts, axis, &self.first, &self.last)?;
        let step = cast_index(self.step).ok_or_else(|| SliceError::IndexConversion {
            value: self.step.to_string(),
            target: std::any::type_name::<A::Position>(),
        })?;
        Ok(SliceVariant::stepped_range(start, stop, step)?)
    }
}

/// The whole axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisAll;

impl<A: LabelAxis> BuildSlice<A> for AxisAll {
    fn build_islice_with(
        &self,
        _opts: &ResolveOpts,
        axis: &A,
    ) -> Result<SliceVariant<A::Position>, AxisError> {
        Ok(SliceVariant::all(axis.size()?)?)
    }
}

/// Maps the inclusive label range `first..=last` to the exclusive
/// position range `start..stop`.
fn resolve_bounds<A>(
    opts: &ResolveOpts,
    axis: &A,
    first: &A::Label,
    last: &A::Label,
) -> Result<(A::Position, A::Position), AxisError>
where
    A: LabelAxis,
    A::Label: std::fmt::Debug,
{
    let start = axis.position(first)?;
    let end = axis.position(last)?;
    tracing::trace!(?first, ?last, %start, %end, "resolved label range");
    if end < start {
        if opts.allow_reversed_ranges {
            return Ok((start, start));
        }
        return Err(AxisError::ReversedRange {
            first: format!("{:?}", first),
            last: format!("{:?}", last),
        });
    }
    let stop = end
        .checked_add(&<A::Position as One>::one())
        .ok_or_else(|| AxisError::PositionOverflow {
            value: axis.len(),
            target: std::any::type_name::<A::Position>(),
        })?;
    Ok((start, stop))
}

/// A selection along one axis, by label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisSlice<L = Label> {
    Range(AxisRange<L>),
    SteppedRange(AxisSteppedRange<L>),
    All(AxisAll),
    /// Selects a single label and removes its dimension.
    Squeeze(L),
}

impl<L> AxisSlice<L> {
    /// The squeezed label, if this selection collapses its dimension.
    pub fn get_squeeze(&self) -> Option<&L> {
        match self {
            AxisSlice::Squeeze(label) => Some(label),
            _ => None,
        }
    }

    pub fn is_squeeze(&self) -> bool {
        self.get_squeeze().is_some()
    }

    /// Resolves this selection against `axis` with
    /// [`ResolveOpts::strict`].
    ///
    /// # Panics
    ///
    /// Panics if this is a squeeze, which has no position range.
    pub fn build_islice<A>(&self, axis: &A) -> Result<SliceVariant<A::Position>, AxisError>
    where
        A: LabelAxis<Label = L>,
        L: std::fmt::Debug,
    {
        self.build_islice_with(&ResolveOpts::strict(), axis)
    }

    /// Resolves this selection against `axis`.
    ///
    /// # Panics
    ///
    /// Panics if this is a squeeze, which has no position range.
    pub fn build_islice_with<A>(
        &self,
        opts: &ResolveOpts,
        axis: &A,
    ) -> Result<SliceVariant<A::Position>, AxisError>
    where
        A: LabelAxis<Label = L>,
        L: std::fmt::Debug,
    {
        match self {
            AxisSlice::Range(range) => range.build_islice_with(opts, axis),
            AxisSlice::SteppedRange(range) => range.build_islice_with(opts, axis),
            AxisSlice::All(all) => all.build_islice_with(opts, axis),
            AxisSlice::Squeeze(label) => {
                panic!("build_islice called on squeeze({label:?}); squeezes have no position range")
            }
        }
    }

    /// Resolves this selection against `axis`, squeezes included.
    pub fn resolve<A>(&self, axis: &A) -> Result<ExtendedSlice<A::Position>, AxisError>
    where
        A: LabelAxis<Label = L>,
        L: std::fmt::Debug,
    {
        self.resolve_with(&ResolveOpts::strict(), axis)
    }

    pub fn resolve_with<A>(
        &self,
        opts: &ResolveOpts,
        axis: &A,
    ) -> Result<ExtendedSlice<A::Position>, AxisError>
    where
        A: LabelAxis<Label = L>,
        L: std::fmt::Debug,
    {
        Ok(match self {
            AxisSlice::All(_) => ExtendedSlice::All,
            AxisSlice::Squeeze(label) => ExtendedSlice::Squeeze(axis.position(label)?),
            _ => ExtendedSlice::Slice(self.build_islice_with(opts, axis)?),
        })
    }

    /// Converts the labels of this selection into `M`.
    pub fn convert<M: From<L>>(&self) -> AxisSlice<M>
    where
        L: Clone,
    {
        match self {
            AxisSlice::Range(range) => AxisSlice::Range(range.convert()),
            AxisSlice::SteppedRange(range) => AxisSlice::SteppedRange(range.convert()),
            AxisSlice::All(all) => AxisSlice::All(*all),
            AxisSlice::Squeeze(label) => AxisSlice::Squeeze(label.clone().into()),
        }
    }
}

impl<L> From<AxisRange<L>> for AxisSlice<L> {
    fn from(range: AxisRange<L>) -> Self {
        AxisSlice::Range(range)
    }
}

impl<L> From<AxisSteppedRange<L>> for AxisSlice<L> {
    fn from(range: AxisSteppedRange<L>) -> Self {
        AxisSlice::SteppedRange(range)
    }
}

impl<L> From<AxisAll> for AxisSlice<L> {
    fn from(all: AxisAll) -> Self {
        AxisSlice::All(all)
    }
}

// A bare label squeezes.
impl From<Label> for AxisSlice<Label> {
    fn from(label: Label) -> Self {
        AxisSlice::Squeeze(label)
    }
}

impl From<&str> for AxisSlice<Label> {
    fn from(label: &str) -> Self {
        AxisSlice::Squeeze(label.into())
    }
}

impl From<i64> for AxisSlice<Label> {
    fn from(label: i64) -> Self {
        AxisSlice::Squeeze(label.into())
    }
}

impl From<String> for AxisSlice<String> {
    fn from(label: String) -> Self {
        AxisSlice::Squeeze(label)
    }
}

impl From<&str> for AxisSlice<String> {
    fn from(label: &str) -> Self {
        AxisSlice::Squeeze(label.to_string())
    }
}

/// Selects the labels `first..=last`.
pub fn range<L>(first: impl Into<L>, last: impl Into<L>) -> AxisSlice<L> {
    AxisRange::new(first.into(), last.into()).into()
}

/// Selects every `step`th label of `first..=last`.
pub fn stepped_range<L>(first: impl Into<L>, last: impl Into<L>, step: usize) -> AxisSlice<L> {
    AxisSteppedRange::new(first.into(), last.into(), step).into()
}

/// Selects the whole axis.
pub fn all<L>() -> AxisSlice<L> {
    AxisAll.into()
}

/// Selects `label` and removes its dimension.
pub fn squeeze<L>(label: impl Into<L>) -> AxisSlice<L> {
    AxisSlice::Squeeze(label.into())
}
