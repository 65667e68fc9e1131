use bevy::prelude::*;
use rand::Rng;
use std::ops::RangeInclusive;

use super::draw;

/// `count` translations drawn uniformly inside the given box.
pub fn scatter(
    count: usize,
    x: RangeInclusive<f32>,
    y: RangeInclusive<f32>,
    z: RangeInclusive<f32>,
    rng: &mut impl Rng,
) -> Vec<Mat4> {
    (0..count)
        .map(|_| {
            let p = Vec3::new(draw(rng, &x), draw(rng, &y), draw(rng, &z));
            Mat4::from_translation(p)
        })
        .collect()
}
