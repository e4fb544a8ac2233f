//! Coin identity.
//!
//! A coin is `(home cell, serial)`. Serials are assigned `1..=n` when the
//! home cache materializes, so no two coins ever share an identity.
//! The home never changes, even after the coin is dropped elsewhere.

use crate::{grid::GridCoord, types::Serial};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    pub home:   GridCoord,
    pub serial: Serial,
}

impl Coin {
    pub const fn new(home: GridCoord, serial: Serial) -> Self {
        Self { home, serial }
    }

    /// The initial coins of a cache at `home` holding `count` coins.
    pub fn minted_at(home: GridCoord, count: u32) -> impl Iterator<Item = Coin> {
        (1..=count).map(move |serial| Coin::new(home, serial))
    }
}

impl fmt::Display for Coin {
    /// `i:j#serial`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.home.i, self.home.j, self.serial)
    }
}
