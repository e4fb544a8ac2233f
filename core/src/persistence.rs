//! Persistence adapter — keyed save/load of the session snapshot.
//!
//! Every snapshot field lives under its own string key as a JSON value.
//! `load` never fails: a missing key, an unreadable store, or a value
//! that no longer decodes all yield the caller's default. Storage errors
//! surface as `PersistenceUnavailable` from `save` and `reset` only, and
//! the engine absorbs them (the session keeps running in memory).
//!
//! `cacheMementos` and `playerCoins` load together or not at all. Taking
//! one without the other would put a held coin back in its home cache too.

use crate::{
    cache::CacheRecord,
    error::{GameError, GameResult},
    inventory::Inventory,
    snapshot::PersistedSnapshot,
    types::StorageKey,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

pub const PLAYER_LOCATION: StorageKey = "playerLocation";
pub const PLAYER_VIEW: StorageKey = "playerView";
pub const PLAYER_HISTORY: StorageKey = "playerHistory";
pub const WINDOW_MIN_I: StorageKey = "windowMinI";
pub const WINDOW_MAX_I: StorageKey = "windowMaxI";
pub const WINDOW_MIN_J: StorageKey = "windowMinJ";
pub const WINDOW_MAX_J: StorageKey = "windowMaxJ";
pub const CACHE_MEMENTOS: StorageKey = "cacheMementos";
pub const PLAYER_COINS: StorageKey = "playerCoins";

/// Every key the adapter owns. `reset` clears exactly these.
pub const ALL_KEYS: [StorageKey; 9] = [
    PLAYER_LOCATION,
    PLAYER_VIEW,
    PLAYER_HISTORY,
    WINDOW_MIN_I,
    WINDOW_MAX_I,
    WINDOW_MIN_J,
    WINDOW_MAX_J,
    CACHE_MEMENTOS,
    PLAYER_COINS,
];

/// A string-keyed store of string values.
/// `put_all` and `clear` must apply all-or-nothing.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> GameResult<Option<String>>;
    fn put_all(&mut self, entries: &[(&str, String)]) -> GameResult<()>;
    fn clear(&mut self, keys: &[&str]) -> GameResult<()>;
}

/// Process-local storage. Used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn put_all(&mut self, entries: &[(&str, String)]) -> GameResult<()> {
        for (key, value) in entries {
            self.values.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn clear(&mut self, keys: &[&str]) -> GameResult<()> {
        for key in keys {
            self.values.remove(*key);
        }
        Ok(())
    }
}

pub struct PersistenceAdapter {
    storage: Box<dyn KeyValueStorage>,
}

impl PersistenceAdapter {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Write every snapshot field under its own key, in one batch.
    pub fn save(&mut self, snapshot: &PersistedSnapshot) -> GameResult<()> {
        let entries = [
            (PLAYER_LOCATION, encode(&snapshot.player_location)?),
            (PLAYER_VIEW, encode(&snapshot.view_anchor)?),
            (PLAYER_HISTORY, encode(&snapshot.movement_history)?),
            (WINDOW_MIN_I, encode(&snapshot.window.min_i)?),
            (WINDOW_MAX_I, encode(&snapshot.window.max_i)?),
            (WINDOW_MIN_J, encode(&snapshot.window.min_j)?),
            (WINDOW_MAX_J, encode(&snapshot.window.max_j)?),
            (CACHE_MEMENTOS, encode(&snapshot.caches)?),
            (PLAYER_COINS, encode(&snapshot.inventory)?),
        ];
        self.storage
            .put_all(&entries)
            .map_err(|e| unavailable("save", e))
    }

    /// The value stored under `key`, or `default` if there is none.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.fetch(key) {
            Stored::Value(value) => value,
            Stored::Absent | Stored::Unusable => default,
        }
    }

    fn fetch<T: DeserializeOwned>(&self, key: &str) -> Stored<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Stored::Absent,
            Err(e) => {
                log::warn!("persistence: cannot read '{key}', using default: {e}");
                return Stored::Unusable;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Stored::Value(value),
            Err(e) => {
                log::warn!("persistence: '{key}' does not decode, using default: {e}");
                Stored::Unusable
            }
        }
    }

    /// Load a whole snapshot, field by field, over `defaults`.
    pub fn load_snapshot(&self, defaults: PersistedSnapshot) -> PersistedSnapshot {
        let PersistedSnapshot {
            player_location,
            view_anchor,
            movement_history,
            window,
            caches,
            inventory,
        } = defaults;

        let mut loaded_window = window;
        loaded_window.min_i = self.load(WINDOW_MIN_I, window.min_i);
        loaded_window.max_i = self.load(WINDOW_MAX_I, window.max_i);
        loaded_window.min_j = self.load(WINDOW_MIN_J, window.min_j);
        loaded_window.max_j = self.load(WINDOW_MAX_J, window.max_j);

        let (caches, inventory) = match (
            self.fetch::<Vec<CacheRecord>>(CACHE_MEMENTOS),
            self.fetch::<Inventory>(PLAYER_COINS),
        ) {
            (Stored::Value(caches), Stored::Value(inventory)) => (caches, inventory),
            (Stored::Absent, Stored::Absent) => (caches, inventory),
            _ => {
                log::warn!(
                    "persistence: '{CACHE_MEMENTOS}' and '{PLAYER_COINS}' do not both load; \
                     coins restart from their home caches"
                );
                (caches, inventory)
            }
        };

        PersistedSnapshot {
            player_location:  self.load(PLAYER_LOCATION, player_location),
            view_anchor:      self.load(PLAYER_VIEW, view_anchor),
            movement_history: self.load(PLAYER_HISTORY, movement_history),
            window:           loaded_window,
            caches,
            inventory,
        }
    }

    /// Remove every key the adapter owns, in one batch.
    pub fn reset(&mut self) -> GameResult<()> {
        self.storage
            .clear(&ALL_KEYS)
            .map_err(|e| unavailable("reset", e))
    }
}

enum Stored<T> {
    Absent,
    Value(T),
    Unusable,
}

fn encode<T: Serialize + ?Sized>(value: &T) -> GameResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn unavailable(op: &str, err: GameError) -> GameError {
    GameError::PersistenceUnavailable {
        reason: format!("{op} failed: {err}"),
    }
}
