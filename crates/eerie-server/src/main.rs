mod config;
mod persistence;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use config::EerieConfig;
use eerie_game::{Difficulty, GameWorld};
use tracing::{debug, error, info, warn};

const DEFAULT_CONFIG: &str = "eerie.toml";
const TICKS_PER_SECOND: u64 = 20;

/// Explicit path from the command line must exist; the default one may not.
fn load_config() -> EerieConfig {
    match std::env::args().nth(1) {
        Some(path) => match EerieConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None if Path::new(DEFAULT_CONFIG).exists() => match EerieConfig::load(DEFAULT_CONFIG) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load {DEFAULT_CONFIG}: {e}");
                std::process::exit(1);
            }
        },
        None => EerieConfig::default(),
    }
}

fn build_world(config: &EerieConfig) -> GameWorld {
    let seed = match config.world.seed {
        0 => rand::random(),
        s => s,
    };
    let mut world = GameWorld::with_seed(1, seed);
    world.spawn_config = config.spawning.to_spawn_config();

    match Difficulty::from_name(&config.world.difficulty) {
        Some(d) => world.set_difficulty(d),
        None => warn!(difficulty = %config.world.difficulty, "unknown difficulty, keeping normal"),
    }
    world.set_time(config.world.time);

    world.reload_config(&config.mobs);
    info!(seed, "world ready");
    world
}

fn save(world: &mut GameWorld, path: &Path) {
    let root = world.save_mobs();
    match persistence::save_mobs(path, &root) {
        Ok(()) => debug!(path = %path.display(), "mobs saved"),
        Err(e) => error!(path = %path.display(), error = %e, "failed to save mobs"),
    }
}

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Eerie Entities v{} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Difficulty: {}, time: {}, save file: {}",
        config.world.difficulty, config.world.time, config.world.save_file
    );

    let save_path = PathBuf::from(&config.world.save_file);
    let mut world = build_world(&config);

    match persistence::load_mobs(&save_path) {
        Ok(Some(root)) => {
            let loaded = world.load_mobs(&root);
            info!("Restored {loaded} mobs from {}", save_path.display());
        }
        Ok(None) => info!("No save file at {}, starting empty", save_path.display()),
        Err(e) => warn!(error = %e, "ignoring unreadable save file {}", save_path.display()),
    }

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

    // Handle Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let auto_save_ticks = config.world.auto_save_interval * TICKS_PER_SECOND;
    let mut tick_interval = tokio::time::interval(Duration::from_millis(50));
    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                world.tick();
                let events = world.drain_events();
                if !events.is_empty() {
                    tracing::trace!(count = events.len(), "game events");
                }

                if auto_save_ticks > 0 && world.current_tick().is_multiple_of(auto_save_ticks) {
                    save(&mut world, &save_path);
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!("Saving mobs before shutdown...");
                    save(&mut world, &save_path);
                    break;
                }
            }
        }
    }

    info!("Server shut down.");
}
