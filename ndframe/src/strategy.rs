//! Generators for property tests.

use proptest::prelude::*;

use crate::axis::Axis;
use crate::coordinate::Coordinate;
use crate::slice::SliceVariant;

/// A slice of any kind over small non-negative indices.
pub fn gen_slice_variant() -> impl Strategy<Value = SliceVariant<i32>> {
    prop_oneof![
        (0i32..32, 0i32..32).prop_map(|(start, len)| {
            SliceVariant::range(start, start + len).unwrap()
        }),
        (0i32..32, 0i32..32, 1i32..6).prop_map(|(start, len, step)| {
            SliceVariant::stepped_range(start, start + len, step).unwrap()
        }),
        (0i32..64).prop_map(|size| SliceVariant::all(size).unwrap()),
    ]
}

/// An axis of up to five distinct single-letter labels, in random
/// order.
pub fn gen_axis() -> impl Strategy<Value = Axis<String>> {
    proptest::collection::btree_set("[a-h]", 0..6)
        .prop_map(|labels| labels.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(|labels| Axis::new(labels).unwrap())
}

/// A coordinate over up to two of the axis names `x`, `y` and `z`.
pub fn gen_coordinate() -> impl Strategy<Value = Coordinate<String, Axis<String>>> {
    proptest::collection::btree_map("[x-z]", gen_axis(), 0..3).prop_map(Coordinate::new)
}
