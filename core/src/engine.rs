//! The game engine — the single controller of a session.
//!
//! EVERY OPERATION (move, locate, pick, drop, reset, toggle tracking):
//!   1. Mutates `GameState` synchronously, through its own methods only.
//!   2. Refreshes visibility if the player moved (materializing new caches).
//!   3. Persists the snapshot if anything durable changed.
//!   4. Returns the events describing what the renderer should show.
//!
//! RULES:
//!   - Nothing blocks and nothing runs in the background.
//!   - Location fixes arrive over the watch channel and are applied one at
//!     a time by `pump_location_updates`, on the caller's thread.
//!   - No error is fatal. Rejected transfers become `TransferRejected`
//!     events; storage failures are logged and the session continues
//!     in memory.
//!   - The engine is not shared across threads. Wrap it in a mutex if
//!     that ever changes.

use crate::{
    cache::CacheRecord,
    coin::Coin,
    command::PlayerCommand,
    config::GameConfig,
    error::{GameError, GameResult},
    event::GameEvent,
    grid::{Direction, Grid, GridCoord, LatLng},
    inventory::Inventory,
    persistence::PersistenceAdapter,
    snapshot::PersistedSnapshot,
    state::GameState,
    tracking::{LocationFeed, LocationWatch},
};

pub struct GameEngine {
    config:      GameConfig,
    grid:        Grid,
    state:       GameState,
    persistence: PersistenceAdapter,
    watch:       LocationWatch,
}

impl GameEngine {
    /// Build an engine and rehydrate it from `persistence`.
    /// Missing or unreadable keys fall back to a fresh session.
    pub fn build(config: GameConfig, persistence: PersistenceAdapter) -> GameResult<Self> {
        config.validate()?;
        let snapshot = persistence.load_snapshot(PersistedSnapshot::fresh(config.origin));
        let state = GameState::from_snapshot(&config, snapshot);
        log::info!(
            "engine: rehydrated at {} with {} caches, {} coins held",
            state.player_location,
            state.caches.len(),
            state.inventory.len()
        );
        let mut engine = Self {
            grid: config.grid(),
            watch: LocationWatch::new(config.location_channel_capacity),
            config,
            state,
            persistence,
        };
        engine.refresh_visibility();
        Ok(engine)
    }

    /// An engine over process-local storage.
    pub fn build_in_memory(config: GameConfig) -> GameResult<Self> {
        Self::build(config, PersistenceAdapter::in_memory())
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn cache_at(&self, coord: GridCoord) -> Option<&CacheRecord> {
        self.state.caches.get(coord)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.state.inventory
    }

    /// The cell under the player. The window's low corner tracks it, so
    /// that corner stands in if the position has no cell.
    pub fn player_cell(&self) -> GridCoord {
        self.grid
            .cell_for(self.state.player_location)
            .unwrap_or(GridCoord::new(self.state.window.min_i, self.state.window.min_j))
    }

    /// Everything the renderer needs to draw the session from scratch.
    pub fn render_all(&self) -> Vec<GameEvent> {
        let mut events = vec![self.player_moved_event()];
        events.extend(
            self.state
                .caches
                .records()
                .into_iter()
                .map(|record| self.materialized_event(record)),
        );
        events
    }

    // ── Commands ───────────────────────────────────────────────

    /// Apply one player command. Never fails; see the module rules.
    pub fn apply(&mut self, command: PlayerCommand) -> Vec<GameEvent> {
        match command {
            PlayerCommand::Move { direction } => self.move_player(direction),
            PlayerCommand::Locate { location } => self.relocate(location),
            PlayerCommand::ToggleTracking => self.toggle_tracking(),
            PlayerCommand::Pick { coord, coin } => {
                let result = self.request_pick(coord, coin);
                self.picked(coord, result)
            }
            PlayerCommand::Drop { coord } => {
                let result = self.request_drop(coord);
                self.dropped(coord, result)
            }
            PlayerCommand::DropCoin { coord, coin } => {
                let result = self.request_drop_coin(coord, coin);
                self.dropped(coord, result)
            }
            PlayerCommand::Reset { confirmed } => {
                if confirmed {
                    self.reset()
                } else {
                    log::info!("engine: reset declined");
                    vec![GameEvent::ResetDeclined]
                }
            }
        }
    }

    /// Step one unit of `map_update_distance` in `direction`.
    pub fn move_player(&mut self, direction: Direction) -> Vec<GameEvent> {
        let step = self.config.map_update_distance;
        self.state.player_location = self.grid.step(self.state.player_location, direction, step);
        self.state.history.push(self.state.player_location);
        self.state.window.shift(direction, step);
        log::debug!(
            "engine: moved {direction:?} to {} window={:?}",
            self.state.player_location,
            self.state.window
        );

        let mut events = vec![self.player_moved_event()];
        events.extend(self.refresh_visibility());
        self.persist();
        events
    }

    /// Jump to a device position fix. The window recenters on its cell.
    /// A fix off the globe or outside the grid is ignored.
    pub fn relocate(&mut self, location: LatLng) -> Vec<GameEvent> {
        let cell = match self.grid.cell_for(location) {
            Some(cell) if location.is_on_earth() => cell,
            _ => {
                log::warn!("engine: ignoring unusable location fix {location}");
                return Vec::new();
            }
        };
        self.state.player_location = location;
        self.state.view_anchor = location;
        self.state.history.push(location);
        self.state.window.recenter(cell);
        log::debug!("engine: located at {location} cell={cell}");

        let mut events = vec![self.player_moved_event()];
        events.extend(self.refresh_visibility());
        self.persist();
        events
    }

    pub fn request_pick(&mut self, coord: GridCoord, coin: Coin) -> GameResult<Coin> {
        let coin = self.state.pick(coord, coin)?;
        log::debug!("engine: picked {coin} from {coord}");
        self.persist();
        Ok(coin)
    }

    pub fn request_drop(&mut self, coord: GridCoord) -> GameResult<Coin> {
        let coin = self.state.drop_top(coord)?;
        log::debug!("engine: dropped {coin} into {coord}");
        self.persist();
        Ok(coin)
    }

    pub fn request_drop_coin(&mut self, coord: GridCoord, coin: Coin) -> GameResult<Coin> {
        let coin = self.state.drop_coin(coord, coin)?;
        log::debug!("engine: dropped {coin} into {coord}");
        self.persist();
        Ok(coin)
    }

    /// Discard everything: persisted keys, caches, inventory, position.
    /// Callers confirm with the player first (see `PlayerCommand::Reset`).
    pub fn reset(&mut self) -> Vec<GameEvent> {
        if let Err(e) = self.persistence.reset() {
            log::warn!("engine: {e}; continuing with in-memory reset");
        }
        let mut events = vec![GameEvent::GameReset];
        if self.watch.stop() {
            events.push(GameEvent::TrackingChanged { enabled: false });
        }
        self.state = GameState::fresh(&self.config);
        self.refresh_visibility();
        log::info!("engine: session reset to {}", self.state.player_location);
        events.extend(self.render_all());
        events
    }

    // ── Location tracking ──────────────────────────────────────

    pub fn tracking_enabled(&self) -> bool {
        self.watch.is_active()
    }

    /// Start the watch if it is off, stop it if it is on.
    pub fn toggle_tracking(&mut self) -> Vec<GameEvent> {
        let enabled = if self.watch.stop() {
            false
        } else {
            self.watch.start().is_some()
        };
        log::info!("engine: location tracking {}", if enabled { "on" } else { "off" });
        vec![GameEvent::TrackingChanged { enabled }]
    }

    /// Start the watch and return its feed; `None` if already running.
    pub fn start_tracking(&mut self) -> Option<LocationFeed> {
        self.watch.start()
    }

    pub fn location_feed(&self) -> Option<LocationFeed> {
        self.watch.feed()
    }

    /// Apply every queued position fix, oldest first.
    pub fn pump_location_updates(&mut self) -> Vec<GameEvent> {
        self.watch
            .drain()
            .into_iter()
            .flat_map(|fix| self.relocate(fix))
            .collect()
    }

    // ── Internals ──────────────────────────────────────────────

    /// Materialize every spawning cell in the window that has no cache yet.
    /// Returns one event per newly materialized cache, in enumeration order.
    fn refresh_visibility(&mut self) -> Vec<GameEvent> {
        let window = self.state.window;
        let radius = self.config.neighborhood_size;
        let p = self.config.spawn_probability;

        let mut events = Vec::new();
        for cell in window.spawning_cells(radius, p) {
            if self.state.caches.contains(cell) {
                continue;
            }
            let record = self.state.caches.materialize_if_absent(cell);
            events.push(GameEvent::CacheMaterialized {
                coord:      cell,
                bounds:     self.grid.bounds(cell),
                coin_count: record.coin_count(),
            });
        }
        events
    }

    fn picked(&self, coord: GridCoord, result: GameResult<Coin>) -> Vec<GameEvent> {
        match result {
            Ok(coin) => vec![GameEvent::CoinPicked {
                coord,
                coin,
                cache_remaining: self.coins_at(coord),
                inventory_size:  self.state.inventory.len(),
            }],
            Err(e) => rejected(coord, e),
        }
    }

    fn dropped(&self, coord: GridCoord, result: GameResult<Coin>) -> Vec<GameEvent> {
        match result {
            Ok(coin) => vec![GameEvent::CoinDropped {
                coord,
                coin,
                cache_total:    self.coins_at(coord),
                inventory_size: self.state.inventory.len(),
            }],
            Err(e) => rejected(coord, e),
        }
    }

    fn coins_at(&self, coord: GridCoord) -> usize {
        self.state.caches.get(coord).map_or(0, CacheRecord::coin_count)
    }

    fn persist(&mut self) {
        let snapshot = self.state.snapshot();
        if let Err(e) = self.persistence.save(&snapshot) {
            log::warn!("engine: {e}; state kept in memory only");
        }
    }

    fn player_moved_event(&self) -> GameEvent {
        GameEvent::PlayerMoved {
            location: self.state.player_location,
            cell:     self.player_cell(),
        }
    }

    fn materialized_event(&self, record: &CacheRecord) -> GameEvent {
        GameEvent::CacheMaterialized {
            coord:      record.coord(),
            bounds:     self.grid.bounds(record.coord()),
            coin_count: record.coin_count(),
        }
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("tracking", &self.watch.is_active())
            .finish()
    }
}

fn rejected(coord: GridCoord, err: GameError) -> Vec<GameEvent> {
    if err.is_rejected_transfer() {
        log::warn!("engine: transfer at {coord} rejected: {err}");
    } else {
        log::error!("engine: unexpected transfer failure at {coord}: {err}");
    }
    vec![GameEvent::TransferRejected {
        coord,
        reason: err.to_string(),
    }]
}
