//! Persisted snapshot — everything needed to resume after a reload.
//!
//! Written after every move and every transfer, read once at startup.
//! Each field is stored under its own key (see `persistence`), so a
//! partially written store still loads: missing fields take defaults.

use crate::{
    cache::CacheRecord,
    grid::LatLng,
    inventory::Inventory,
    visibility::VisibilityWindow,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub player_location:  LatLng,
    pub view_anchor:      LatLng,
    pub movement_history: Vec<LatLng>,
    pub window:           VisibilityWindow,
    /// Every materialized cache, so player-modified counts survive reloads.
    pub caches:           Vec<CacheRecord>,
    pub inventory:        Inventory,
}

impl PersistedSnapshot {
    /// State of a brand-new session standing at `origin`.
    pub fn fresh(origin: LatLng) -> Self {
        Self {
            player_location:  origin,
            view_anchor:      origin,
            movement_history: vec![origin],
            window:           VisibilityWindow::default(),
            caches:           Vec::new(),
            inventory:        Inventory::new(),
        }
    }
}
