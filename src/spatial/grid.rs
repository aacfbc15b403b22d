//! Uniform-grid spatial index, used by the `spatial` collision backend for
//! scale (spec §4.3). Grounded on the teacher's `QuadTree`, which also
//! abandons an actual quad-tree for a flat spatial-hash grid in the
//! interest of simplicity and speed.

use glam::Vec2;

/// A point-plus-radius entry, indexed by its position in the grid.
#[derive(Debug, Clone, Copy)]
struct Entry {
    index: usize,
    position: Vec2,
    r: f32,
}

/// A uniform grid over a rectangular region. Cells are sized so that a
/// typical body spans only one or two cells.
pub struct Grid {
    min_x: f32,
    min_y: f32,
    cell_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<Entry>>,
}

impl Grid {
    /// Build a grid covering `[min_x, max_x] x [min_y, max_y]`, sized so
    /// that `cell_size` is a few multiples of `typical_radius`.
    pub fn build(min_x: f32, min_y: f32, max_x: f32, max_y: f32, typical_radius: f32, entries: impl Iterator<Item = (usize, Vec2, f32)>) -> Self {
        let cell_size = (typical_radius * 8.0).max(1.0);
        let cols = (((max_x - min_x) / cell_size).ceil() as usize).max(1);
        let rows = (((max_y - min_y) / cell_size).ceil() as usize).max(1);
        let mut grid = Self { min_x, min_y, cell_size, cols, rows, buckets: vec![Vec::new(); cols * rows] };
        for (index, position, r) in entries {
            grid.insert(Entry { index, position, r });
        }
        grid
    }

    #[inline]
    fn cell_coords(&self, position: Vec2) -> (usize, usize) {
        let gx = ((position.x - self.min_x) / self.cell_size).floor().max(0.0) as usize;
        let gy = ((position.y - self.min_y) / self.cell_size).floor().max(0.0) as usize;
        (gx.min(self.cols - 1), gy.min(self.rows - 1))
    }

    fn insert(&mut self, entry: Entry) {
        let (gx, gy) = self.cell_coords(entry.position);
        self.buckets[gy * self.cols + gx].push(entry);
    }

    /// Call `visit` for every entry whose bucket neighborhood could overlap
    /// a disc at `position` with radius `r` (a superset of the true
    /// overlap set — callers still do the exact circle test).
    pub fn for_each_candidate(&self, position: Vec2, r: f32, mut visit: impl FnMut(usize)) {
        let reach = (r + self.cell_size).max(self.cell_size);
        let min = Vec2::new(position.x - reach, position.y - reach);
        let max = Vec2::new(position.x + reach, position.y + reach);
        let (min_gx, min_gy) = self.cell_coords(min);
        let (max_gx, max_gy) = self.cell_coords(max);
        for gy in min_gy..=max_gy {
            for gx in min_gx..=max_gx {
                for entry in &self.buckets[gy * self.cols + gx] {
                    visit(entry.index);
                }
            }
        }
    }
}
