//! geocoin-runner: headless driver for the geocoin engine.
//!
//! Usage:
//!   geocoin-runner --db geocoin.db
//!   geocoin-runner --config game.json --ipc-mode
//!
//! Interactive mode reads one command per line:
//!   n | s | e | w            move one step
//!   pick I J [SERIAL]        pick a coin (first available if no serial)
//!   drop I J                 drop the most recently picked coin
//!   loc LAT LNG              push a position fix through the location watch
//!   track                    toggle location tracking
//!   status | reset | quit
//!
//! IPC mode reads JSON `PlayerCommand`s, one per line, and answers each
//! with the resulting events plus a JSON UI state.

use anyhow::Result;
use geocoin_core::{
    coin::Coin,
    command::PlayerCommand,
    config::GameConfig,
    engine::GameEngine,
    event::GameEvent,
    grid::{Direction, GridCoord, LatLng},
    persistence::PersistenceAdapter,
    store::GameStore,
    tracking::FeedStatus,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Serialize)]
struct UiState {
    player:    LatLng,
    cell:      GridCoord,
    caches:    usize,
    inventory: Vec<String>,
    tracking:  bool,
}

#[derive(serde::Serialize)]
struct IpcReply {
    events: Vec<GameEvent>,
    state:  UiState,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db");
    let config_path = flag_value(&args, "--config");

    let config = match config_path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let persistence = match db {
        Some(path) => match GameStore::open_migrated(path) {
            Ok(store) => PersistenceAdapter::new(Box::new(store)),
            Err(e) => {
                log::warn!("Cannot open {path} ({e}); progress will not be saved");
                PersistenceAdapter::in_memory()
            }
        },
        None => PersistenceAdapter::in_memory(),
    };

    let mut engine = GameEngine::build(config, persistence)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)
    } else {
        println!("geocoin-runner");
        println!("  db:      {}", db.unwrap_or("(memory)"));
        println!("  config:  {}", config_path.unwrap_or("(defaults)"));
        println!();
        render(&engine.render_all());
        run_interactive(&mut engine)
    }
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: PlayerCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let mut events = match cmd {
            // Fixes go through the watch, like a device sensor would.
            PlayerCommand::Locate { location } => {
                push_fix(engine, location);
                Vec::new()
            }
            other => engine.apply(other),
        };
        events.extend(engine.pump_location_updates());

        let reply = IpcReply {
            events,
            state: ui_state(engine),
        };
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn run_interactive(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();

        let events = match words.as_slice() {
            [] => continue,
            ["quit"] | ["q"] => break,
            ["n"] => engine.apply(PlayerCommand::Move { direction: Direction::North }),
            ["s"] => engine.apply(PlayerCommand::Move { direction: Direction::South }),
            ["e"] => engine.apply(PlayerCommand::Move { direction: Direction::East }),
            ["w"] => engine.apply(PlayerCommand::Move { direction: Direction::West }),
            ["track"] => engine.apply(PlayerCommand::ToggleTracking),
            ["status"] => {
                print_status(engine);
                continue;
            }
            ["reset"] => {
                let confirmed = confirm(&mut lines, "Discard all progress? [y/N] ")?;
                engine.apply(PlayerCommand::Reset { confirmed })
            }
            ["loc", lat, lng] => match (lat.parse::<f64>(), lng.parse::<f64>()) {
                (Ok(lat), Ok(lng)) => {
                    push_fix(engine, LatLng::new(lat, lng));
                    Vec::new()
                }
                _ => {
                    println!("usage: loc LAT LNG");
                    continue;
                }
            },
            ["pick", i, j, rest @ ..] => match parse_cell(i, j) {
                Some(coord) => {
                    let serial = rest.first().and_then(|s| s.parse::<u32>().ok());
                    let coin = match serial {
                        Some(serial) => Some(Coin::new(coord, serial)),
                        None => engine.cache_at(coord).and_then(|r| r.first_coin()),
                    };
                    match coin {
                        Some(coin) => engine.apply(PlayerCommand::Pick { coord, coin }),
                        None => {
                            println!("nothing to pick at {coord}");
                            continue;
                        }
                    }
                }
                None => {
                    println!("usage: pick I J [SERIAL]");
                    continue;
                }
            },
            ["drop", i, j] => match parse_cell(i, j) {
                Some(coord) => engine.apply(PlayerCommand::Drop { coord }),
                None => {
                    println!("usage: drop I J");
                    continue;
                }
            },
            _ => {
                log::warn!("Unknown command: {line}");
                continue;
            }
        };

        render(&events);
        render(&engine.pump_location_updates());
    }
    Ok(())
}

/// Send a fix through the location watch. The next pump applies it.
fn push_fix(engine: &GameEngine, fix: LatLng) {
    match engine.location_feed() {
        Some(feed) => {
            if feed.push(fix) != FeedStatus::Queued {
                log::warn!("Location fix {fix} was not queued");
            }
        }
        None => log::info!("Location tracking is off; ignoring fix {fix}"),
    }
}

fn render(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::CacheMaterialized { coord, bounds, coin_count } => println!(
                "  cache {coord} [{} .. {}] holds {coin_count} coins",
                bounds.south_west, bounds.north_east
            ),
            GameEvent::PlayerMoved { location, cell } => {
                println!("  player at {location} cell {cell}")
            }
            GameEvent::CoinPicked { coord, coin, cache_remaining, inventory_size } => println!(
                "  picked {coin} from {coord} ({cache_remaining} left, holding {inventory_size})"
            ),
            GameEvent::CoinDropped { coord, coin, cache_total, inventory_size } => println!(
                "  dropped {coin} into {coord} ({cache_total} there, holding {inventory_size})"
            ),
            GameEvent::TransferRejected { coord, reason } => {
                println!("  nothing happens at {coord}: {reason}")
            }
            GameEvent::TrackingChanged { enabled } => {
                println!("  tracking {}", if *enabled { "on" } else { "off" })
            }
            GameEvent::ResetDeclined => println!("  reset cancelled"),
            GameEvent::GameReset => println!("  === session reset ==="),
        }
    }
}

fn print_status(engine: &GameEngine) {
    let state = ui_state(engine);
    println!("=== STATUS ===");
    println!("  player:    {} cell {}", state.player, state.cell);
    println!("  caches:    {}", state.caches);
    println!("  tracking:  {}", state.tracking);
    if state.inventory.is_empty() {
        println!("  inventory: (empty)");
    } else {
        println!("  inventory: {}", state.inventory.join(", "));
    }
}

fn ui_state(engine: &GameEngine) -> UiState {
    UiState {
        player:    engine.state().player_location,
        cell:      engine.player_cell(),
        caches:    engine.state().caches.len(),
        inventory: engine.inventory().iter().map(Coin::to_string).collect(),
        tracking:  engine.tracking_enabled(),
    }
}

fn confirm<B: BufRead>(lines: &mut io::Lines<B>, prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let answer = match lines.next() {
        Some(line) => line?,
        None => return Ok(false),
    };
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn parse_cell(i: &str, j: &str) -> Option<GridCoord> {
    Some(GridCoord::new(i.parse().ok()?, j.parse().ok()?))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
