//! Deterministic pseudo-random values keyed by strings.
//!
//! RULE: Nothing in the game may call any platform RNG.
//! Every random decision is `luck(key)` for a key derived from cell
//! coordinates, so the same key yields the same value in every session
//! and after every restart. Persisted state depends on this.
//!
//! The key is hashed with FNV-1a (stable across Rust releases, unlike
//! `DefaultHasher`) and the hash seeds a PCG stream. The first draw of
//! that stream is the luck value.

use crate::grid::GridCoord;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Salt used to size a cache when it first materializes.
pub const INITIAL_VALUE_SALT: &str = "initialValue";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A deterministic RNG stream seeded from a string key.
pub struct KeyedRng {
    inner: Pcg64Mcg,
}

impl KeyedRng {
    pub fn for_key(key: &str) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(fnv1a(key.as_bytes())),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// The determinism function: a stable float in [0, 1) for `key`.
pub fn luck(key: &str) -> f64 {
    KeyedRng::for_key(key).next_f64()
}

/// `"i,j"`: the key deciding whether a cell holds a cache.
pub fn cell_key(coord: GridCoord) -> String {
    format!("{},{}", coord.i, coord.j)
}

/// `"i,j,salt"`: a cell key with an extra component.
pub fn salted_key(coord: GridCoord, salt: &str) -> String {
    format!("{},{},{salt}", coord.i, coord.j)
}

/// Whether `coord` presents a cache at spawn probability `p`.
pub fn spawns_cache(coord: GridCoord, p: f64) -> bool {
    KeyedRng::for_key(&cell_key(coord)).chance(p)
}

/// `floor(luck("i,j,initialValue") * max_coins)`.
pub fn initial_coin_count(coord: GridCoord, max_coins: u32) -> u32 {
    let roll = luck(&salted_key(coord, INITIAL_VALUE_SALT));
    (roll * f64::from(max_coins)).floor() as u32
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
