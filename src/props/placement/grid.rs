// src/props/placement/grid.rs
//! Jittered lattice centred on the origin.

use bevy::prelude::*;
use rand::Rng;
use std::ops::RangeInclusive;

use super::draw;

/// Row-major `rows × cols` translations. Built once, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementGrid {
    rows: u32,
    cols: u32,
    cells: Vec<Mat4>,
}

impl PlacementGrid {
    pub fn rows(&self) -> u32 { self.rows }
    pub fn cols(&self) -> u32 { self.cols }
    pub fn len(&self) -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn get(&self, row: u32, col: u32) -> Option<&Mat4> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize)
    }

    /// All cells in row-major order, ready for one batch registration.
    pub fn transforms(&self) -> &[Mat4] {
        &self.cells
    }

    /// Lattice coordinate of `row` before scaling, e.g. -10..10 for 20 rows.
    #[inline]
    pub fn lattice_index(row: u32, rows: u32) -> i32 {
        row as i32 - (rows / 2) as i32
    }
}

/// Translation for every `(x, z)` with `x` in `[-rows/2, rows/2)` and `z` in
/// `[-cols/2, cols/2)`: `(x*spacing + j, v, z*spacing + j)`, each `j` drawn
/// from `jitter` and `v` from `vertical`.
pub fn build_grid(
    rows: u32,
    cols: u32,
    spacing: f32,
    jitter: RangeInclusive<f32>,
    vertical: RangeInclusive<f32>,
    rng: &mut impl Rng,
) -> PlacementGrid {
    let mut cells = Vec::with_capacity(rows as usize * cols as usize);

    for row in 0..rows {
        let x = PlacementGrid::lattice_index(row, rows) as f32 * spacing;
        for col in 0..cols {
            let z = PlacementGrid::lattice_index(col, cols) as f32 * spacing;
            let jx = draw(rng, &jitter);
            let y = draw(rng, &vertical);
            let jz = draw(rng, &jitter);
            cells.push(Mat4::from_translation(Vec3::new(x + jx, y, z + jz)));
        }
    }

    PlacementGrid { rows, cols, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn cell_count_is_rows_times_cols() {
        for (r, c) in [(0, 5), (1, 1), (3, 7), (20, 20)] {
            let g = build_grid(r, c, 10.0, -1.0..=1.0, 0.0..=20.0, &mut rng());
            assert_eq!(g.len(), (r * c) as usize);
        }
    }

    #[test]
    fn box_field_stays_within_jitter_of_lattice() {
        let g = build_grid(20, 20, 10.0, -1.0..=1.0, 0.0..=20.0, &mut rng());
        assert_eq!(g.len(), 400);

        for row in 0..20 {
            for col in 0..20 {
                let t = g.get(row, col).unwrap().w_axis.truncate();
                let ideal_x = (row as f32 - 10.0) * 10.0;
                let ideal_z = (col as f32 - 10.0) * 10.0;
                assert!((t.x - ideal_x).abs() <= 1.0, "x off lattice at {row},{col}");
                assert!((t.z - ideal_z).abs() <= 1.0, "z off lattice at {row},{col}");
                assert!((0.0..=20.0).contains(&t.y));
            }
        }
    }

    #[test]
    fn lattice_spans_half_open_range() {
        let g = build_grid(4, 4, 10.0, 0.0..=0.0, 0.0..=0.0, &mut rng());
        let xs: Vec<f32> = (0..4).map(|r| g.get(r, 0).unwrap().w_axis.x).collect();
        assert_eq!(xs, vec![-20.0, -10.0, 0.0, 10.0]);
    }

    #[test]
    fn transforms_are_translation_only() {
        let g = build_grid(3, 3, 5.0, -1.0..=1.0, 0.0..=1.0, &mut rng());
        for m in g.transforms() {
            let (scale, rot, _) = m.to_scale_rotation_translation();
            assert!(scale.abs_diff_eq(Vec3::ONE, 1e-6));
            assert!(rot.abs_diff_eq(Quat::IDENTITY, 1e-6));
        }
    }

    #[test]
    fn same_seed_same_grid() {
        let a = build_grid(6, 6, 10.0, -1.0..=1.0, 0.0..=20.0, &mut rng());
        let b = build_grid(6, 6, 10.0, -1.0..=1.0, 0.0..=20.0, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let g = build_grid(2, 3, 1.0, 0.0..=0.0, 0.0..=0.0, &mut rng());
        assert!(g.get(2, 0).is_none());
        assert!(g.get(0, 3).is_none());
    }
}
