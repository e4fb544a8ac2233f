//! Cache store tests: lazy materialization, pick and deposit.

use geocoin_core::{
    cache::{CacheRecord, CacheStore},
    coin::Coin,
    error::GameError,
    grid::GridCoord,
    luck,
};

const MAX_COINS: u32 = 5;

#[test]
fn materialize_twice_returns_the_same_content() {
    let mut store = CacheStore::new(MAX_COINS);
    for i in -15..15 {
        for j in -15..15 {
            let c = GridCoord::new(i, j);
            let first = store.materialize_if_absent(c).clone();
            let second = store.materialize_if_absent(c).clone();
            assert_eq!(first, second, "re-rolled content at {c}");
        }
    }
    assert_eq!(store.len(), 30 * 30);
}

#[test]
fn materialize_does_not_overwrite_a_modified_cache() {
    let mut store = CacheStore::new(MAX_COINS);
    let c = (0..100)
        .map(|i| GridCoord::new(i, 0))
        .find(|c| luck::initial_coin_count(*c, MAX_COINS) > 0)
        .expect("some cell has coins");

    let before = store.materialize_if_absent(c).coin_count();
    store.pick(c, Coin::new(c, 1)).expect("serial 1 exists");
    let after = store.materialize_if_absent(c).coin_count();
    assert_eq!(after, before - 1, "materialize must leave an existing record alone");
}

/// Cache at (3,-2) holds floor(luck("3,-2,initialValue") * 5) coins with
/// serials 1..=n. Picking all of them empties it; one more pick fails.
#[test]
fn scenario_drain_cache_at_3_minus_2() {
    let c = GridCoord::new(3, -2);
    let expected =
        (luck::luck("3,-2,initialValue") * 5.0).floor() as u32;

    let mut store = CacheStore::new(5);
    let record = store.materialize_if_absent(c).clone();
    assert_eq!(record.coin_count(), expected as usize);
    let serials: Vec<u32> = record.coins().map(|coin| coin.serial).collect();
    assert_eq!(serials, (1..=expected).collect::<Vec<_>>());
    assert!(record.coins().all(|coin| coin.home == c));

    let mut held = Vec::new();
    for serial in 1..=expected {
        held.push(store.pick(c, Coin::new(c, serial)).expect("coin available"));
    }
    assert_eq!(store.get(c).map(CacheRecord::coin_count), Some(0));
    assert_eq!(held.len(), expected as usize);

    let err = store.pick(c, Coin::new(c, 1)).unwrap_err();
    assert!(matches!(err, GameError::CoinNotAvailable { .. }), "got {err:?}");
    assert_eq!(held.len(), expected as usize);
}

#[test]
fn pick_of_a_foreign_coin_fails() {
    let mut store = CacheStore::new(MAX_COINS);
    let c = GridCoord::new(10, 10);
    let before = store.materialize_if_absent(c).clone();

    let foreign = Coin::new(GridCoord::new(11, 10), 1);
    let err = store.pick(c, foreign).unwrap_err();
    assert!(matches!(err, GameError::CoinNotAvailable { .. }));
    assert_eq!(store.get(c), Some(&before), "failed pick must not mutate");
}

#[test]
fn operations_on_unmaterialized_cells_fail() {
    let mut store = CacheStore::new(MAX_COINS);
    let c = GridCoord::new(-4, 9);
    let coin = Coin::new(c, 1);

    assert!(matches!(store.pick(c, coin), Err(GameError::CacheNotFound { .. })));
    assert!(matches!(store.deposit(c, coin), Err(GameError::CacheNotFound { .. })));
    assert!(!store.contains(c), "failed ops must not materialize");
}

#[test]
fn deposit_accepts_coins_from_other_homes() {
    let mut store = CacheStore::new(MAX_COINS);
    let target = GridCoord::new(0, 0);
    store.materialize_if_absent(target);
    let before = store.get(target).map(CacheRecord::coin_count).unwrap_or_default();

    let stranger = Coin::new(GridCoord::new(500, -500), 3);
    store.deposit(target, stranger).expect("deposit");
    let record = store.get(target).expect("cache exists");
    assert_eq!(record.coin_count(), before + 1);
    assert!(record.holds(&stranger));
}

#[test]
fn restore_replaces_content_and_records_are_sorted() {
    let mut store = CacheStore::new(MAX_COINS);
    for c in [GridCoord::new(2, 1), GridCoord::new(-1, 5), GridCoord::new(0, 0)] {
        store.materialize_if_absent(c);
    }
    let coords: Vec<GridCoord> = store.records().iter().map(|r| r.coord()).collect();
    let mut sorted = coords.clone();
    sorted.sort();
    assert_eq!(coords, sorted);

    let mut fresh = CacheStore::new(MAX_COINS);
    for record in store.records() {
        fresh.restore(record.clone());
    }
    assert_eq!(fresh.total_coins(), store.total_coins());
    assert_eq!(fresh.len(), store.len());
}
