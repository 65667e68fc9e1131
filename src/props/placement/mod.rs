// src/props/placement/mod.rs
//! Placement transforms for instanced fields.

use rand::Rng;
use std::ops::RangeInclusive;

mod grid;
mod scatter;

pub use grid::{build_grid, PlacementGrid};
pub use scatter::scatter;

/// Uniform draw from `range`, tolerating reversed bounds.
#[inline]
pub(crate) fn draw(rng: &mut impl Rng, range: &RangeInclusive<f32>) -> f32 {
    let (a, b) = (*range.start(), *range.end());
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.random_range(lo..=hi)
}

/// Settings store ranges as tuples.
#[inline]
pub fn range((lo, hi): (f32, f32)) -> RangeInclusive<f32> {
    lo..=hi
}
