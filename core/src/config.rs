use crate::{
    error::{GameError, GameResult},
    grid::{Grid, LatLng},
    types::CellIndex,
};
use serde::{Deserialize, Serialize};

/// Widest separation, in degrees, between the origin and any fix on Earth.
const MAX_SPAN_DEGREES: f64 = 360.0;

/// Oakes College classroom, where a fresh session starts.
pub const DEFAULT_ORIGIN: LatLng = LatLng::new(36.989_493_795_784_01, -122.062_771_285_485_04);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Real coordinate of cell (0, 0)'s south-west corner.
    pub origin: LatLng,
    /// Angular size of one cell, in degrees.
    pub tile_degrees: f64,
    /// Cells considered on each side of the visibility window.
    pub neighborhood_size: CellIndex,
    /// Chance that a considered cell holds a cache.
    pub spawn_probability: f64,
    /// Initial coins are `floor(luck * max_initial_coins)`.
    pub max_initial_coins: u32,
    /// Cells the window and the player move per directional step.
    pub map_update_distance: CellIndex,
    /// Pending location fixes before the sensor side blocks.
    pub location_channel_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            origin:                    DEFAULT_ORIGIN,
            tile_degrees:              1e-4,
            neighborhood_size:         8,
            spawn_probability:         0.1,
            max_initial_coins:         5,
            map_update_distance:       1,
            location_channel_capacity: 16,
        }
    }
}

impl GameConfig {
    /// Load from a JSON file. Absent fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config with a small neighborhood for use in tests.
    pub fn default_test() -> Self {
        Self {
            neighborhood_size: 4,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        if !(self.tile_degrees.is_finite() && self.tile_degrees > 0.0) {
            return Err(GameError::Config(format!(
                "tile_degrees must be positive, got {}",
                self.tile_degrees
            )));
        }
        let span_cells = MAX_SPAN_DEGREES / self.tile_degrees
            + f64::from(self.neighborhood_size.max(0))
            + f64::from(self.map_update_distance.max(0));
        if span_cells >= f64::from(CellIndex::MAX) {
            return Err(GameError::Config(format!(
                "tile_degrees {} is too small: the globe would not fit the cell index range",
                self.tile_degrees
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(GameError::Config(format!(
                "spawn_probability must be in [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if self.neighborhood_size < 0 {
            return Err(GameError::Config("neighborhood_size must be >= 0".into()));
        }
        if self.map_update_distance <= 0 {
            return Err(GameError::Config("map_update_distance must be > 0".into()));
        }
        if self.location_channel_capacity == 0 {
            return Err(GameError::Config("location_channel_capacity must be > 0".into()));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.origin, self.tile_degrees)
    }
}
