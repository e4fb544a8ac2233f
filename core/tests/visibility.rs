//! Visibility window tests — enumeration, movement, materialization.

use geocoin_core::{
    config::GameConfig,
    engine::GameEngine,
    event::GameEvent,
    grid::{Direction, GridCoord},
    visibility::VisibilityWindow,
};

fn build(config: GameConfig) -> GameEngine {
    GameEngine::build_in_memory(config).expect("build engine")
}

#[test]
fn candidates_are_row_major_and_half_open() {
    let window = VisibilityWindow {
        min_i: 0,
        max_i: 1,
        min_j: 5,
        max_j: 5,
    };
    let cells: Vec<GridCoord> = window.cells_to_consider(1).collect();
    let expected = vec![
        GridCoord::new(-1, 4),
        GridCoord::new(-1, 5),
        GridCoord::new(0, 4),
        GridCoord::new(0, 5),
        GridCoord::new(1, 4),
        GridCoord::new(1, 5),
    ];
    assert_eq!(cells, expected);
    assert!(window.contains(GridCoord::new(1, 5), 1));
    assert!(!window.contains(GridCoord::new(2, 5), 1));
    assert!(!window.contains(GridCoord::new(0, 6), 1));
}

#[test]
fn start_window_covers_the_neighborhood() {
    let window = VisibilityWindow::default();
    let cells: Vec<GridCoord> = window.cells_to_consider(8).collect();
    assert_eq!(cells.len(), 16 * 16);
    assert_eq!(cells.first(), Some(&GridCoord::new(-8, -8)));
    assert_eq!(cells.last(), Some(&GridCoord::new(7, 7)));
}

#[test]
fn shift_moves_both_bounds_on_one_axis() {
    let mut window = VisibilityWindow::default();
    window.shift(Direction::North, 2);
    assert_eq!(
        window,
        VisibilityWindow { min_i: 2, max_i: 2, min_j: 0, max_j: 0 }
    );
    window.shift(Direction::West, 3);
    assert_eq!(
        window,
        VisibilityWindow { min_i: 2, max_i: 2, min_j: -3, max_j: -3 }
    );
}

#[test]
fn east_then_west_restores_the_window() {
    let mut engine = build(GameConfig::default_test());
    let original = engine.state().window;

    engine.move_player(Direction::East);
    assert_ne!(engine.state().window, original);
    engine.move_player(Direction::West);
    assert_eq!(engine.state().window, original);

    engine.move_player(Direction::North);
    engine.move_player(Direction::South);
    assert_eq!(engine.state().window, original);
}

#[test]
fn moving_reveals_only_new_caches() {
    let config = GameConfig {
        spawn_probability: 1.0,
        ..GameConfig::default_test()
    };
    let radius = config.neighborhood_size;
    let mut engine = build(config);
    let before = engine.state().caches.len();
    assert_eq!(before, (2 * radius * 2 * radius) as usize);

    let events = engine.move_player(Direction::East);
    assert!(matches!(events.first(), Some(GameEvent::PlayerMoved { .. })));
    let revealed: Vec<GridCoord> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::CacheMaterialized { coord, .. } => Some(*coord),
            _ => None,
        })
        .collect();

    // One new column on the east edge.
    assert_eq!(revealed.len(), (2 * radius) as usize);
    assert!(revealed.iter().all(|c| c.j == radius));
    assert_eq!(engine.state().caches.len(), before + revealed.len());

    // Walking back reveals nothing: those caches already exist.
    let events = engine.move_player(Direction::West);
    assert_eq!(events.len(), 1, "only the move itself: {events:?}");
}

#[test]
fn caches_outside_the_window_stay_materialized() {
    let config = GameConfig {
        spawn_probability: 1.0,
        ..GameConfig::default_test()
    };
    let mut engine = build(config);
    let corner = GridCoord::new(-4, -4);
    let remembered = engine.cache_at(corner).cloned().expect("corner cache");

    for _ in 0..20 {
        engine.move_player(Direction::North);
    }
    assert!(!engine.state().window.contains(corner, 4));
    assert_eq!(engine.cache_at(corner), Some(&remembered));
}

#[test]
fn player_follows_the_window() {
    let mut engine = build(GameConfig::default_test());
    assert_eq!(engine.player_cell(), GridCoord::new(0, 0));

    engine.move_player(Direction::North);
    engine.move_player(Direction::North);
    engine.move_player(Direction::East);
    assert_eq!(engine.player_cell(), GridCoord::new(2, 1));
    assert_eq!(engine.state().history.len(), 4);
}

#[test]
fn relocation_recenters_on_the_fix() {
    let mut engine = build(GameConfig::default_test());
    let target = GridCoord::new(250, -40);
    let fix = engine.grid().corner_of(target);

    let events = engine.relocate(fix);
    assert_eq!(
        events.first(),
        Some(&GameEvent::PlayerMoved { location: fix, cell: target })
    );
    assert_eq!(engine.state().window, VisibilityWindow::at(target));
    assert_eq!(engine.state().view_anchor, fix);
    assert_eq!(engine.player_cell(), target);
}
