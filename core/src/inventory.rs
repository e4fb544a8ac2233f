//! Player inventory — coins held by the player, newest last.

use crate::{
    coin::Coin,
    error::{GameError, GameResult},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    coins: Vec<Coin>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, coin: Coin) {
        debug_assert!(!self.contains(&coin), "coin {coin} already held");
        self.coins.push(coin);
    }

    /// Take the most recently picked coin.
    pub fn pop(&mut self) -> GameResult<Coin> {
        self.coins.pop().ok_or(GameError::InventoryEmpty)
    }

    /// Take a specific held coin, keeping the order of the rest.
    pub fn take(&mut self, coin: &Coin) -> GameResult<Coin> {
        if self.coins.is_empty() {
            return Err(GameError::InventoryEmpty);
        }
        let idx = self
            .coins
            .iter()
            .position(|c| c == coin)
            .ok_or(GameError::CoinNotHeld { coin: *coin })?;
        Ok(self.coins.remove(idx))
    }

    pub fn peek(&self) -> Option<&Coin> {
        self.coins.last()
    }

    pub fn contains(&self, coin: &Coin) -> bool {
        self.coins.contains(coin)
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Coins in pickup order.
    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter()
    }

    pub fn clear(&mut self) {
        self.coins.clear();
    }
}
