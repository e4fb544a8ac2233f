//! Shared primitive types used across the entire game core.

/// One axis index of a grid cell, relative to the configured origin.
pub type CellIndex = i32;

/// Serial number of a coin within its home cache. Serials start at 1.
pub type Serial = u32;

/// Key under which a single persisted value is stored.
pub type StorageKey = &'static str;
