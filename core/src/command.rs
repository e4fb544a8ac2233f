use crate::{
    coin::Coin,
    grid::{Direction, GridCoord, LatLng},
};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants added over time — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Movement ──────────────────────────────────
    Move { direction: Direction },
    /// A position fix from the device. Applied as one atomic transition.
    Locate { location: LatLng },
    ToggleTracking,

    // ── Transfers ─────────────────────────────────
    Pick { coord: GridCoord, coin: Coin },
    /// Drop the most recently picked coin.
    Drop { coord: GridCoord },
    /// Drop a specific held coin.
    DropCoin { coord: GridCoord, coin: Coin },

    // ── Session ───────────────────────────────────
    /// Discards all state. Ignored unless `confirmed`.
    Reset { confirmed: bool },
}
