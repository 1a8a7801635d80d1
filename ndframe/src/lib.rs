//! Labeled axis indexing for n-dimensional arrays.
//!
//! Provides [`SliceVariant`], a compact position-space selection along
//! one dimension, and the label-space layer built on top of it:
//! [`Axis`] maps tick labels to positions, [`AxisSlice`] selects by
//! label and resolves to positions through an axis, and [`Coordinate`]
//! names the axes of an array and broadcasts them across operands.
//!
//! The crate holds no array data. It computes which physical indices a
//! labeled selection refers to and what shape an element-wise
//! operation over several labeled operands produces.

mod index;
pub use index::IndexType;
pub use index::cast_index;

/// Position-space slices and their common operations.
pub mod slice;
pub use slice::AllSlice;
pub use slice::IndexSlice;
pub use slice::RangeSlice;
pub use slice::SliceError;
pub use slice::SliceVariant;
pub use slice::SteppedSlice;

mod extended;
/// A position-space selection that may squeeze its dimension.
pub use extended::ExtendedSlice;

mod label;
/// The default label type: an integer or a string.
pub use label::Label;

/// Labeled axes and their set combinators.
pub mod axis;
pub use axis::Axis;
pub use axis::AxisError;
pub use axis::LabelAxis;

/// Label-space selections and their resolution to positions.
pub mod axis_slice;
pub use axis_slice::AxisSlice;
/// Options controlling label range resolution.
pub use axis_slice::ResolveOpts;

/// Named axes and coordinate broadcasting.
pub mod coordinate;
pub use coordinate::Broadcast;
pub use coordinate::Coordinate;
pub use coordinate::CoordinateError;
pub use coordinate::FullCoordinate;
pub use coordinate::Join;
pub use coordinate::Operand;
pub use coordinate::broadcast_coordinates;

/// Property-based generators for randomized test input.
#[cfg(test)]
pub mod strategy;
