//! Cache store — the coordinate-keyed map of materialized caches.
//!
//! RULE: A cache is created at most once per cell. Its initial content
//! comes from `luck` and is never re-rolled; afterwards it changes only
//! through `pick` and `deposit`.
//!
//! Lookup is by exact `GridCoord` key. Nothing here compares lat/lng bounds.

use crate::{
    coin::Coin,
    error::{GameError, GameResult},
    grid::GridCoord,
    luck,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One materialized cache. The coin count is the size of the coin set,
/// so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    coord: GridCoord,
    coins: BTreeSet<Coin>,
}

impl CacheRecord {
    /// Initial content of the cache at `coord`: serials `1..=count` with
    /// `count = floor(luck("i,j,initialValue") * max_coins)`.
    pub fn initial(coord: GridCoord, max_coins: u32) -> Self {
        let count = luck::initial_coin_count(coord, max_coins);
        Self {
            coord,
            coins: Coin::minted_at(coord, count).collect(),
        }
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn holds(&self, coin: &Coin) -> bool {
        self.coins.contains(coin)
    }

    /// Coins in `(home, serial)` order.
    pub fn coins(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter()
    }

    pub fn first_coin(&self) -> Option<Coin> {
        self.coins.iter().next().copied()
    }
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    caches:            HashMap<GridCoord, CacheRecord>,
    max_initial_coins: u32,
}

impl CacheStore {
    pub fn new(max_initial_coins: u32) -> Self {
        Self {
            caches: HashMap::new(),
            max_initial_coins,
        }
    }

    /// Return the cache at `coord`, creating it from its deterministic
    /// initial content if this is the first visit.
    pub fn materialize_if_absent(&mut self, coord: GridCoord) -> &CacheRecord {
        let max = self.max_initial_coins;
        self.caches.entry(coord).or_insert_with(|| {
            let record = CacheRecord::initial(coord, max);
            log::debug!("cache: materialized {coord} with {} coins", record.coin_count());
            record
        })
    }

    pub fn get(&self, coord: GridCoord) -> Option<&CacheRecord> {
        self.caches.get(&coord)
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.caches.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Remove `coin` from the cache at `coord` and hand it to the caller.
    pub fn pick(&mut self, coord: GridCoord, coin: Coin) -> GameResult<Coin> {
        let record = self
            .caches
            .get_mut(&coord)
            .ok_or(GameError::CacheNotFound { coord })?;
        if record.coins.is_empty() || !record.coins.remove(&coin) {
            return Err(GameError::CoinNotAvailable { coord, coin });
        }
        Ok(coin)
    }

    /// Put `coin` into the cache at `coord`. The coin may come from any home.
    pub fn deposit(&mut self, coord: GridCoord, coin: Coin) -> GameResult<()> {
        let record = self
            .caches
            .get_mut(&coord)
            .ok_or(GameError::CacheNotFound { coord })?;
        let inserted = record.coins.insert(coin);
        debug_assert!(inserted, "coin {coin} deposited twice into {coord}");
        Ok(())
    }

    /// Reinstate a cache from persisted state, replacing whatever is there.
    pub fn restore(&mut self, record: CacheRecord) {
        self.caches.insert(record.coord, record);
    }

    /// Every record, ordered by coordinate so persisted output is stable.
    pub fn records(&self) -> Vec<&CacheRecord> {
        let mut records: Vec<&CacheRecord> = self.caches.values().collect();
        records.sort_by_key(|r| r.coord);
        records
    }

    /// Coins across all caches. Used by conservation checks.
    pub fn total_coins(&self) -> usize {
        self.caches.values().map(CacheRecord::coin_count).sum()
    }

    pub fn clear(&mut self) {
        self.caches.clear();
    }
}
