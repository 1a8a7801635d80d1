//! Coordinates and the coordinate broadcasting algorithm.
//!
//! A [`Coordinate`] maps axis names to axes: it is the full labeled
//! shape of one array. Before an element-wise operation the shapes of
//! every operand are combined into a single destination coordinate by
//! [`Coordinate::broadcast`], under a [`Join`] policy:
//!
//! - [`Join::Outer`] merges the axes of a shared name (label union);
//! - [`Join::Inner`] intersects them (label intersection).
//!
//! Names present in only some operands are inserted as they are under
//! either policy.
//!
//! ## Folding order
//!
//! If the destination is empty, it first adopts the first operand that
//! is a real coordinate. The remaining operands are then folded into it
//! from the last one backward. An [`Operand::Full`] operand (see
//! [`FullCoordinate`]) places no constraint and is skipped wherever it
//! appears.
//!
//! ## Outcome
//!
//! The fold reports a [`Broadcast`] with two independent flags:
//!
//! - `unchanged_keys` is `false` as soon as some operand contributed a
//!   name the destination did not have yet;
//! - `no_conflicts` is `false` as soon as some per-name join changed
//!   the destination axis (outer: labels were added, inner: labels
//!   were removed).
//!
//! Together they tell the caller whether operand data can be used as
//! is, must be re-indexed, or must be reshaped. Broadcasting cannot
//! fail.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::collections::btree_map::Entry;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::axis::AxisError;
use crate::axis::LabelAxis;
use crate::axis_slice::AxisSlice;
use crate::axis_slice::ResolveOpts;
use crate::extended::ExtendedSlice;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    #[error("axis {key} not found in coordinate")]
    KeyNotFound { key: String },

    #[error("axis {key}: {source}")]
    Axis {
        key: String,
        #[source]
        source: AxisError,
    },
}

/// How the axes of a shared name are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Join {
    /// Union of labels.
    Outer,
    /// Intersection of labels.
    Inner,
}

impl Join {
    /// Joins `input` into `output` in place. Returns `true` iff
    /// `output` was left unchanged.
    pub fn apply<A: LabelAxis>(self, output: &mut A, input: &A) -> bool {
        match self {
            Join::Outer => output.merge(input),
            Join::Inner => output.intersect(input),
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Join::Outer => write!(f, "outer"),
            Join::Inner => write!(f, "inner"),
        }
    }
}

/// A placeholder coordinate that constrains nothing. Broadcasting skips
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FullCoordinate;

/// One operand of a broadcast.
#[derive(Debug)]
pub enum Operand<'a, K, A> {
    Coordinate(&'a Coordinate<K, A>),
    Full,
}

impl<K, A> Clone for Operand<'_, K, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, A> Copy for Operand<'_, K, A> {}

impl<'a, K, A> From<&'a Coordinate<K, A>> for Operand<'a, K, A> {
    fn from(coordinate: &'a Coordinate<K, A>) -> Self {
        Operand::Coordinate(coordinate)
    }
}

impl<K, A> From<FullCoordinate> for Operand<'_, K, A> {
    fn from(_: FullCoordinate) -> Self {
        Operand::Full
    }
}

/// The outcome of a broadcast.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Broadcast {
    /// No operand introduced a new axis name.
    pub unchanged_keys: bool,
    /// No per-name join changed the destination axis.
    pub no_conflicts: bool,
}

impl Broadcast {
    fn unchanged() -> Self {
        Self {
            unchanged_keys: true,
            no_conflicts: true,
        }
    }

    /// Whether the destination already described every operand.
    pub fn is_trivial(&self) -> bool {
        self.unchanged_keys && self.no_conflicts
    }
}

impl From<Broadcast> for (bool, bool) {
    fn from(b: Broadcast) -> Self {
        (b.unchanged_keys, b.no_conflicts)
    }
}

/// A mapping from axis names `K` to axes `A`, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(
        serialize = "K: Serialize, A: Serialize",
        deserialize = "K: Ord + Deserialize<'de>, A: Deserialize<'de>"
    )
)]
pub struct Coordinate<K, A> {
    axes: BTreeMap<K, A>,
}

impl<K, A> Default for Coordinate<K, A> {
    fn default() -> Self {
        Self {
            axes: BTreeMap::new(),
        }
    }
}

impl<K: Ord, A> Coordinate<K, A> {
    pub fn new(axes: BTreeMap<K, A>) -> Self {
        Self { axes }
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn clear(&mut self) {
        self.axes.clear();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.axes.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&A> {
        self.axes.get(key)
    }

    /// Inserts an axis, returning the one it replaces.
    pub fn insert(&mut self, key: K, axis: A) -> Option<A> {
        self.axes.insert(key, axis)
    }

    pub fn data(&self) -> &BTreeMap<K, A> {
        &self.axes
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, A> {
        self.axes.iter()
    }

    /// Axis names, in order.
    pub fn keys(&self) -> btree_map::Keys<'_, K, A> {
        self.axes.keys()
    }
}

impl<K, A> Coordinate<K, A>
where
    K: Ord + Clone + fmt::Debug,
    A: LabelAxis + Clone,
    A::Label: fmt::Debug,
{
    /// The axis named `key`. Fails if there is none.
    pub fn axis(&self, key: &K) -> Result<&A, CoordinateError> {
        self.axes
            .get(key)
            .ok_or_else(|| CoordinateError::KeyNotFound {
                key: format!("{:?}", key),
            })
    }

    /// The position of `label` along the axis named `key`.
    pub fn position(&self, key: &K, label: &A::Label) -> Result<A::Position, CoordinateError> {
        self.axis(key)?
            .position(label)
            .map_err(|source| CoordinateError::Axis {
                key: format!("{:?}", key),
                source,
            })
    }

    /// The length of every axis, in name order.
    pub fn shape(&self) -> Vec<(&K, usize)> {
        self.axes.iter().map(|(k, a)| (k, a.len())).collect()
    }

    /// Resolves label selections against the named axes. Axes without a
    /// selection are selected whole.
    pub fn select(
        &self,
        slices: &BTreeMap<K, AxisSlice<A::Label>>,
    ) -> Result<BTreeMap<K, ExtendedSlice<A::Position>>, CoordinateError> {
        self.select_with(&ResolveOpts::strict(), slices)
    }

    pub fn select_with(
        &self,
        opts: &ResolveOpts,
        slices: &BTreeMap<K, AxisSlice<A::Label>>,
    ) -> Result<BTreeMap<K, ExtendedSlice<A::Position>>, CoordinateError> {
        if let Some(key) = slices.keys().find(|key| !self.axes.contains_key(*key)) {
            return Err(CoordinateError::KeyNotFound {
                key: format!("{:?}", key),
            });
        }
        self.axes
            .iter()
            .map(|(key, axis)| {
                let resolved = match slices.get(key) {
                    Some(slice) => slice.resolve_with(opts, axis).map_err(|source| {
                        CoordinateError::Axis {
                            key: format!("{:?}", key),
                            source,
                        }
                    })?,
                    None => ExtendedSlice::All,
                };
                Ok((key.clone(), resolved))
            })
            .collect()
    }

    /// Combines `operands` into this coordinate under `join`. See the
    /// [module documentation](self) for the folding order and the
    /// meaning of the outcome.
    pub fn broadcast<'a, I>(&mut self, join: Join, operands: I) -> Broadcast
    where
        I: IntoIterator,
        I::Item: Into<Operand<'a, K, A>>,
        K: 'a,
        A: 'a,
    {
        let operands: Vec<Operand<'a, K, A>> = operands.into_iter().map(Into::into).collect();
        let mut rest = operands.as_slice();

        if self.is_empty() {
            let first = rest
                .iter()
                .enumerate()
                .find_map(|(i, operand)| match operand {
                    Operand::Coordinate(c) => Some((i, *c)),
                    Operand::Full => None,
                });
            match first {
                Some((i, coordinate)) => {
                    tracing::debug!(operand = i, axes = coordinate.len(), "adopting operand");
                    self.axes = coordinate.axes.clone();
                    rest = &rest[i + 1..];
                }
                None => rest = &rest[..0],
            }
        }

        let mut outcome = Broadcast::unchanged();
        for operand in rest.iter().rev() {
            if let Operand::Coordinate(coordinate) = operand {
                self.fold(join, coordinate, &mut outcome);
            }
        }
        outcome
    }

    fn fold(&mut self, join: Join, input: &Coordinate<K, A>, outcome: &mut Broadcast) {
        for (key, axis) in &input.axes {
            match self.axes.entry(key.clone()) {
                Entry::Vacant(entry) => {
                    tracing::debug!(?key, "inserting axis from operand");
                    entry.insert(axis.clone());
                    outcome.unchanged_keys = false;
                }
                Entry::Occupied(mut entry) => {
                    let unchanged = join.apply(entry.get_mut(), axis);
                    tracing::trace!(?key, %join, unchanged, "joined axis");
                    outcome.no_conflicts &= unchanged;
                }
            }
        }
    }
}

impl<K: Ord, A> FromIterator<(K, A)> for Coordinate<K, A> {
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        Self {
            axes: iter.into_iter().collect(),
        }
    }
}

impl<'a, K, A> IntoIterator for &'a Coordinate<K, A> {
    type Item = (&'a K, &'a A);
    type IntoIter = btree_map::Iter<'a, K, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.axes.iter()
    }
}

impl<K: fmt::Display, A: fmt::Display> fmt::Display for Coordinate<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, axis) in &self.axes {
            writeln!(f, "{}: {}", key, axis)?;
        }
        Ok(())
    }
}

/// Broadcasts `operands` into `output`. See [`Coordinate::broadcast`].
pub fn broadcast_coordinates<'a, K, A, I>(
    output: &mut Coordinate<K, A>,
    join: Join,
    operands: I,
) -> Broadcast
where
    K: Ord + Clone + fmt::Debug + 'a,
    A: LabelAxis + Clone + 'a,
    A::Label: fmt::Debug,
    I: IntoIterator,
    I::Item: Into<Operand<'a, K, A>>,
{
    output.broadcast(join, operands)
}
