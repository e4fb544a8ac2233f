//! Grid geometry: cell coordinates and the linear transform to lat/lng.
//!
//! Cell `(i, j)` covers `[origin + i*t, origin + (i+1)*t)` in latitude and
//! the same in longitude, with `t = tile_degrees`. `i` runs north,
//! `j` runs east. Identity of a cell is always the integer pair, never
//! its floating-point bounds.

use crate::types::CellIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance, in cells, absorbed when snapping a real coordinate to a cell.
/// Keeps `cell_for(corner_of(c)) == c` despite float rounding.
const SNAP_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub i: CellIndex,
    pub j: CellIndex,
}

impl GridCoord {
    pub const fn new(i: CellIndex, j: CellIndex) -> Self {
        Self { i, j }
    }

    pub fn offset(self, di: CellIndex, dj: CellIndex) -> Self {
        Self::new(self.i + di, self.j + dj)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite, with latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_on_earth(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Real-world rectangle covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

/// A one-cell step the player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// `(di, dj)` for one step in this direction.
    pub fn delta(self) -> (CellIndex, CellIndex) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East  => (0, 1),
            Self::West  => (0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East  => Self::West,
            Self::West  => Self::East,
        }
    }
}

/// The fixed transform between cells and real coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub origin:       LatLng,
    pub tile_degrees: f64,
}

impl Grid {
    pub fn new(origin: LatLng, tile_degrees: f64) -> Self {
        Self { origin, tile_degrees }
    }

    /// The cell containing `point`, or `None` when `point` is not finite
    /// or lies beyond the range of `CellIndex`.
    pub fn cell_for(&self, point: LatLng) -> Option<GridCoord> {
        Some(GridCoord::new(
            self.snap(point.lat - self.origin.lat)?,
            self.snap(point.lng - self.origin.lng)?,
        ))
    }

    /// South-west corner of `cell`: `origin + n * tile_degrees`.
    pub fn corner_of(&self, cell: GridCoord) -> LatLng {
        LatLng::new(
            self.origin.lat + f64::from(cell.i) * self.tile_degrees,
            self.origin.lng + f64::from(cell.j) * self.tile_degrees,
        )
    }

    pub fn bounds(&self, cell: GridCoord) -> CellBounds {
        CellBounds {
            south_west: self.corner_of(cell),
            north_east: self.corner_of(cell.offset(1, 1)),
        }
    }

    /// `point` moved `cells` whole cells in `direction`.
    pub fn step(&self, point: LatLng, direction: Direction, cells: CellIndex) -> LatLng {
        let (di, dj) = direction.delta();
        LatLng::new(
            point.lat + f64::from(di * cells) * self.tile_degrees,
            point.lng + f64::from(dj * cells) * self.tile_degrees,
        )
    }

    fn snap(&self, delta_degrees: f64) -> Option<CellIndex> {
        let cells = (delta_degrees / self.tile_degrees + SNAP_EPSILON).floor();
        let range = f64::from(CellIndex::MIN)..=f64::from(CellIndex::MAX);
        range.contains(&cells).then(|| cells as CellIndex)
    }
}
