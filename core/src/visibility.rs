//! Visibility window — which cells are considered for caches.
//!
//! The window is a rectangle of cell offsets from the origin. Each
//! directional move translates it by the configured step on the axis of
//! movement (min and max together), so opposite moves cancel exactly.
//! Candidates are the window grown by the neighborhood radius on every
//! side, enumerated row-major, half-open on the upper edge.

use crate::{
    grid::{Direction, GridCoord},
    luck,
    types::CellIndex,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityWindow {
    pub min_i: CellIndex,
    pub max_i: CellIndex,
    pub min_j: CellIndex,
    pub max_j: CellIndex,
}

impl VisibilityWindow {
    /// A window collapsed onto a single cell.
    pub fn at(cell: GridCoord) -> Self {
        Self {
            min_i: cell.i,
            max_i: cell.i,
            min_j: cell.j,
            max_j: cell.j,
        }
    }

    /// Translate the window `step` cells in `direction`.
    pub fn shift(&mut self, direction: Direction, step: CellIndex) {
        let (di, dj) = direction.delta();
        let (di, dj) = (di.saturating_mul(step), dj.saturating_mul(step));
        self.min_i = self.min_i.saturating_add(di);
        self.max_i = self.max_i.saturating_add(di);
        self.min_j = self.min_j.saturating_add(dj);
        self.max_j = self.max_j.saturating_add(dj);
    }

    /// Collapse the window onto `cell`. Used when a location fix jumps
    /// the player to an arbitrary position.
    pub fn recenter(&mut self, cell: GridCoord) {
        *self = Self::at(cell);
    }

    /// Every candidate cell in
    /// `[min_i - r, max_i + r) x [min_j - r, max_j + r)`, row-major.
    /// Bounds saturate at the edges of `CellIndex`.
    pub fn cells_to_consider(&self, radius: CellIndex) -> impl Iterator<Item = GridCoord> {
        let (i_lo, i_hi) = self.rows(radius);
        let (j_lo, j_hi) = self.columns(radius);
        (i_lo..i_hi).flat_map(move |i| (j_lo..j_hi).map(move |j| GridCoord::new(i, j)))
    }

    /// Candidates that present a cache at spawn probability `p`.
    pub fn spawning_cells(&self, radius: CellIndex, p: f64) -> impl Iterator<Item = GridCoord> {
        self.cells_to_consider(radius)
            .filter(move |cell| luck::spawns_cache(*cell, p))
    }

    pub fn contains(&self, cell: GridCoord, radius: CellIndex) -> bool {
        let (i_lo, i_hi) = self.rows(radius);
        let (j_lo, j_hi) = self.columns(radius);
        (i_lo..i_hi).contains(&cell.i) && (j_lo..j_hi).contains(&cell.j)
    }

    fn rows(&self, radius: CellIndex) -> (CellIndex, CellIndex) {
        (self.min_i.saturating_sub(radius), self.max_i.saturating_add(radius))
    }

    fn columns(&self, radius: CellIndex) -> (CellIndex, CellIndex) {
        (self.min_j.saturating_sub(radius), self.max_j.saturating_add(radius))
    }
}
