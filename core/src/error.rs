use crate::{coin::Coin, grid::GridCoord};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("No cache materialized at {coord}")]
    CacheNotFound { coord: GridCoord },

    #[error("Coin {coin} is not available at {coord}")]
    CoinNotAvailable { coord: GridCoord, coin: Coin },

    #[error("Inventory is empty")]
    InventoryEmpty,

    #[error("Coin {coin} is not held by the player")]
    CoinNotHeld { coin: Coin },

    #[error("Persistence unavailable: {reason}")]
    PersistenceUnavailable { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),
}

impl GameError {
    /// True for errors that only mean "nothing happens" in the UI.
    /// Pick on an empty cache and pick of a foreign coin both land here.
    pub fn is_rejected_transfer(&self) -> bool {
        matches!(
            self,
            Self::CacheNotFound { .. }
                | Self::CoinNotAvailable { .. }
                | Self::InventoryEmpty
                | Self::CoinNotHeld { .. }
        )
    }
}

pub type GameResult<T> = Result<T, GameError>;
