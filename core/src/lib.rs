//! Geocoin — grid/cache state engine for a location-grounded coin game.
//!
//! Leaf-first: `luck` → `grid`/`coin` → `cache`/`inventory`/`visibility`
//! → `state` → `persistence`/`store` → `engine`.

pub mod cache;
pub mod coin;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod grid;
pub mod inventory;
pub mod luck;
pub mod persistence;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod tracking;
pub mod types;
pub mod visibility;
