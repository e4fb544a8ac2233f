//! Events returned by the engine for the rendering collaborator.
//!
//! RULE: The engine never draws anything. Every visible consequence of
//! an operation is described by one of these events, returned in the
//! order it happened. A rejected transfer changes nothing on screen but
//! is still reported so the UI can stay put deliberately.

use crate::{
    coin::Coin,
    grid::{CellBounds, GridCoord, LatLng},
};
use serde::{Deserialize, Serialize};

/// Variants are appended, never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── World ──────────────────────────────────────
    CacheMaterialized {
        coord:      GridCoord,
        bounds:     CellBounds,
        coin_count: usize,
    },

    // ── Player ─────────────────────────────────────
    PlayerMoved {
        location: LatLng,
        cell:     GridCoord,
    },

    // ── Transfers ──────────────────────────────────
    CoinPicked {
        coord:           GridCoord,
        coin:            Coin,
        cache_remaining: usize,
        inventory_size:  usize,
    },
    CoinDropped {
        coord:          GridCoord,
        coin:           Coin,
        cache_total:    usize,
        inventory_size: usize,
    },
    TransferRejected {
        coord:  GridCoord,
        reason: String,
    },

    // ── Session ────────────────────────────────────
    TrackingChanged {
        enabled: bool,
    },
    ResetDeclined,
    GameReset,
}

impl GameEvent {
    /// Stable name for logs and the runner's text output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CacheMaterialized { .. } => "cache_materialized",
            Self::PlayerMoved { .. }       => "player_moved",
            Self::CoinPicked { .. }        => "coin_picked",
            Self::CoinDropped { .. }       => "coin_dropped",
            Self::TransferRejected { .. }  => "transfer_rejected",
            Self::TrackingChanged { .. }   => "tracking_changed",
            Self::ResetDeclined            => "reset_declined",
            Self::GameReset                => "game_reset",
        }
    }
}
