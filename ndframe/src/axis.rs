//! Labeled axes.
//!
//! An axis is an ordered sequence of unique tick labels, each mapped
//! to its position along one dimension. [`LabelAxis`] is the contract
//! slices and coordinates are written against; [`Axis`] is the
//! hash-indexed implementation used by default.
//!
//! The two set combinators, [`LabelAxis::merge`] (outer join) and
//! [`LabelAxis::intersect`] (inner join), update an axis in place and
//! report whether they left it unchanged. They are total: a label
//! missing from one side is the ordinary case, not an error.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

use crate::index::IndexType;
use crate::index::from_usize;
use crate::slice::SliceError;

/// Errors raised by label lookups and axis construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AxisError {
    #[error("label {label} not found in axis")]
    LabelNotFound { label: String },

    #[error("duplicate label {label}")]
    DuplicateLabel { label: String },

    #[error("position {value} is not representable as {target}")]
    PositionOverflow { value: usize, target: &'static str },

    #[error("reversed label range {first}..={last}")]
    ReversedRange { first: String, last: String },

    #[error(transparent)]
    SliceError(#[from] SliceError),
}

/// Types usable as axis labels.
pub trait AxisLabel: Clone + Eq + Hash + fmt::Debug {}

impl<T> AxisLabel for T where T: Clone + Eq + Hash + fmt::Debug {}

/// An ordered, unique label-to-position mapping.
pub trait LabelAxis {
    type Label;
    type Position: IndexType;

    /// Number of labels.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of labels, as a position.
    fn size(&self) -> Result<Self::Position, AxisError> {
        position_from(self.len())
    }

    /// The position of `label`. Fails if the label is absent.
    fn position(&self, label: &Self::Label) -> Result<Self::Position, AxisError>;

    /// Appends the labels of `other` not already present, in the order
    /// they appear in `other`. Returns `true` iff nothing was added.
    fn merge(&mut self, other: &Self) -> bool;

    /// Retains only the labels also present in `other`, in their
    /// current order. Returns `true` iff nothing was removed.
    fn intersect(&mut self, other: &Self) -> bool;
}

pub(crate) fn position_from<P: IndexType>(value: usize) -> Result<P, AxisError> {
    from_usize(value).ok_or_else(|| AxisError::PositionOverflow {
        value,
        target: std::any::type_name::<P>(),
    })
}

/// An axis of labels `L`, reporting positions as `P`.
///
/// Positions are assigned in label order, starting at 0. An axis
/// serializes as its label list.
#[derive(Clone, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<L>",
    into = "Vec<L>",
    bound(
        serialize = "L: AxisLabel + Serialize, P: Clone",
        deserialize = "L: AxisLabel + Deserialize<'de>"
    )
)]
pub struct Axis<L, P = usize> {
    labels: Vec<L>,
    index: HashMap<L, usize>,
    marker: PhantomData<P>,
}

impl<L: AxisLabel, P> Axis<L, P> {
    /// An axis over `labels`, in order. Fails if a label repeats.
    pub fn new(labels: Vec<L>) -> Result<Self, AxisError> {
        let mut index = HashMap::with_capacity(labels.len());
        for (pos, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), pos).is_some() {
                return Err(AxisError::DuplicateLabel {
                    label: format!("{:?}", label),
                });
            }
        }
        Ok(Self {
            labels,
            index,
            marker: PhantomData,
        })
    }

    /// The labels, in position order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, L> {
        self.labels.iter()
    }

    pub fn contains(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    /// The label at `pos`, if any.
    pub fn label(&self, pos: usize) -> Option<&L> {
        self.labels.get(pos)
    }

    fn reindex(&mut self) {
        self.index = self
            .labels
            .iter()
            .enumerate()
            .map(|(pos, label)| (label.clone(), pos))
            .collect();
    }
}

impl<L: AxisLabel, P: IndexType> Axis<L, P> {
    /// The position of `label`, or `None` if it is absent or not
    /// representable as `P`.
    pub fn get(&self, label: &L) -> Option<P> {
        self.index.get(label).and_then(|pos| from_usize(*pos))
    }
}

impl<L: AxisLabel, P: IndexType> LabelAxis for Axis<L, P> {
    type Label = L;
    type Position = P;

    fn len(&self) -> usize {
        self.labels.len()
    }

    fn position(&self, label: &L) -> Result<P, AxisError> {
        let pos = self
            .index
            .get(label)
            .ok_or_else(|| AxisError::LabelNotFound {
                label: format!("{:?}", label),
            })?;
        position_from(*pos)
    }

    fn merge(&mut self, other: &Self) -> bool {
        let len = self.labels.len();
        for label in &other.labels {
            if !self.index.contains_key(label) {
                self.index.insert(label.clone(), self.labels.len());
                self.labels.push(label.clone());
            }
        }
        self.labels.len() == len
    }

    fn intersect(&mut self, other: &Self) -> bool {
        let len = self.labels.len();
        self.labels.retain(|label| other.index.contains_key(label));
        if self.labels.len() == len {
            return true;
        }
        self.reindex();
        false
    }
}

impl<L: AxisLabel, P> TryFrom<Vec<L>> for Axis<L, P> {
    type Error = AxisError;

    fn try_from(labels: Vec<L>) -> Result<Self, AxisError> {
        Self::new(labels)
    }
}

impl<L, P> From<Axis<L, P>> for Vec<L> {
    fn from(axis: Axis<L, P>) -> Self {
        axis.labels
    }
}

impl<L: PartialEq, P> PartialEq for Axis<L, P> {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl<L: Eq, P> Eq for Axis<L, P> {}

impl<L: fmt::Debug, P> fmt::Debug for Axis<L, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Axis").field(&self.labels).finish()
    }
}

impl<L: fmt::Display, P> fmt::Display for Axis<L, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.labels.iter().format(", "))
    }
}
