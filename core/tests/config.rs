//! Config loading and validation.

use geocoin_core::{config::GameConfig, error::GameError};

#[test]
fn bundled_config_matches_defaults() {
    let config = GameConfig::load("../data/game.json").expect("load data/game.json");
    assert_eq!(config, GameConfig::default());
}

#[test]
fn missing_file_is_an_error() {
    let err = GameConfig::load("../data/does-not-exist.json").unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "got: {err}");
}

#[test]
fn partial_json_takes_defaults_for_the_rest() {
    let config: GameConfig =
        serde_json::from_str(r#"{ "spawn_probability": 0.25 }"#).expect("parse");
    assert_eq!(config.spawn_probability, 0.25);
    assert_eq!(config.tile_degrees, GameConfig::default().tile_degrees);
    config.validate().expect("valid");
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        GameConfig { tile_degrees: 0.0, ..GameConfig::default() },
        GameConfig { spawn_probability: 1.5, ..GameConfig::default() },
        GameConfig { neighborhood_size: -1, ..GameConfig::default() },
        GameConfig { map_update_distance: 0, ..GameConfig::default() },
        GameConfig { location_channel_capacity: 0, ..GameConfig::default() },
    ];
    for config in cases {
        assert!(
            matches!(config.validate(), Err(GameError::Config(_))),
            "accepted {config:?}"
        );
    }
}

#[test]
fn tiles_too_small_for_the_globe_are_rejected() {
    let fine = GameConfig { tile_degrees: 1e-7, ..GameConfig::default() };
    assert!(
        matches!(fine.validate(), Err(GameError::Config(_))),
        "360 degrees at 1e-7 per cell overflows the cell index"
    );

    let coarse_enough = GameConfig { tile_degrees: 1e-6, ..GameConfig::default() };
    coarse_enough.validate().expect("1e-6 still fits");
}
