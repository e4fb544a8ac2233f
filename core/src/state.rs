//! Game state — the single owner of every mutable piece of the session.
//!
//! RULE: Coins move only through `pick`, `drop_top` and `drop_coin`.
//! Each of them moves exactly one coin between exactly one cache and the
//! inventory, and leaves both untouched when it fails. That keeps every
//! coin in exactly one place at all times.

use crate::{
    cache::CacheStore,
    coin::Coin,
    config::GameConfig,
    error::{GameError, GameResult},
    grid::{GridCoord, LatLng},
    inventory::Inventory,
    snapshot::PersistedSnapshot,
    visibility::VisibilityWindow,
};

#[derive(Debug, Clone)]
pub struct GameState {
    pub caches:          CacheStore,
    pub inventory:       Inventory,
    pub window:          VisibilityWindow,
    pub player_location: LatLng,
    /// Where the current stretch of travel began; the window is measured from here.
    pub view_anchor:     LatLng,
    pub history:         Vec<LatLng>,
}

impl GameState {
    pub fn fresh(config: &GameConfig) -> Self {
        Self::from_snapshot(config, PersistedSnapshot::fresh(config.origin))
    }

    /// Rebuild state from a loaded snapshot. Persisted caches are restored
    /// as saved; everything else rematerializes from `luck` on demand.
    pub fn from_snapshot(config: &GameConfig, snapshot: PersistedSnapshot) -> Self {
        let mut caches = CacheStore::new(config.max_initial_coins);
        for record in snapshot.caches {
            caches.restore(record);
        }
        let mut history = snapshot.movement_history;
        if history.is_empty() {
            history.push(snapshot.player_location);
        }
        Self {
            caches,
            inventory: snapshot.inventory,
            window: snapshot.window,
            player_location: snapshot.player_location,
            view_anchor: snapshot.view_anchor,
            history,
        }
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            player_location:  self.player_location,
            view_anchor:      self.view_anchor,
            movement_history: self.history.clone(),
            window:           self.window,
            caches:           self.caches.records().into_iter().cloned().collect(),
            inventory:        self.inventory.clone(),
        }
    }

    /// Cache → inventory.
    pub fn pick(&mut self, coord: GridCoord, coin: Coin) -> GameResult<Coin> {
        let coin = self.caches.pick(coord, coin)?;
        self.inventory.push(coin);
        Ok(coin)
    }

    /// Inventory (most recent coin) → cache at `coord`.
    pub fn drop_top(&mut self, coord: GridCoord) -> GameResult<Coin> {
        self.require_cache(coord)?;
        let coin = self.inventory.pop()?;
        self.caches.deposit(coord, coin)?;
        Ok(coin)
    }

    /// Inventory (a specific coin) → cache at `coord`.
    pub fn drop_coin(&mut self, coord: GridCoord, coin: Coin) -> GameResult<Coin> {
        self.require_cache(coord)?;
        let coin = self.inventory.take(&coin)?;
        self.caches.deposit(coord, coin)?;
        Ok(coin)
    }

    /// Coins in caches plus coins held. Constant across transfers.
    pub fn coins_in_play(&self) -> usize {
        self.caches.total_coins() + self.inventory.len()
    }

    fn require_cache(&self, coord: GridCoord) -> GameResult<()> {
        if self.caches.contains(coord) {
            Ok(())
        } else {
            Err(GameError::CacheNotFound { coord })
        }
    }
}
