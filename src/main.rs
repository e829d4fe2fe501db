//! gridcollide demo entry point.
//!
//! Builds a `bevy_ecs` world from a JSON scene (or a random one), runs the
//! collision schedule for a number of ticks and logs what the detector found.
//!
//! Two listeners are wired up the way gameplay code would use the bus:
//! - a collision counter that only sees [`CollisionEvent`]s
//! - a "hazard" rule that turns every collision involving the `player` group
//!   into a [`DamageEvent`], published immediately from inside the collision
//!   handler
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --random 500 --ticks 10
//! cargo run -- --scene scene.json --immediate
//! ```

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gridcollide::events::collision::CollisionEvent;
use gridcollide::events::damage::DamageEvent;
use gridcollide::resources::collisionconfig::{CollisionConfig, DeliveryMode};
use gridcollide::resources::collisiondetector::CollisionDetector;
use gridcollide::resources::spatialgrid::is_valid_cell_size;
use gridcollide::scene::SceneFile;
use gridcollide::systems::{collision_schedule, setup_collision};

/// Grid collision detection demo
#[derive(Parser)]
#[command(version, about = "Runs the grid collision detector over a scene and reports collisions.")]
struct Cli {
    /// INI file with a [collision] section.
    #[arg(long, value_name = "PATH", default_value = "./collision.ini")]
    config: PathBuf,

    /// JSON scene to load. Without it a random scene is generated.
    #[arg(long, value_name = "PATH")]
    scene: Option<String>,

    /// Number of random boxes when no scene is given.
    #[arg(long, value_name = "N", default_value_t = 200)]
    random: usize,

    /// Seed for the random scene.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Side length of the square random scene area.
    #[arg(long, default_value_t = 1024.0)]
    area: f32,

    /// Ticks to simulate.
    #[arg(long, default_value_t = 1)]
    ticks: u32,

    /// Override the configured grid cell size.
    #[arg(long, value_name = "SIZE")]
    cell_size: Option<f32>,

    /// Deliver collision events immediately instead of at dispatch.
    #[arg(long)]
    immediate: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = CollisionConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        debug!("{} (using defaults)", e);
    }
    if let Some(size) = cli.cell_size {
        if is_valid_cell_size(size) {
            config.cell_size = size;
        } else {
            warn!("Ignoring invalid --cell-size {}", size);
        }
    }
    if cli.immediate {
        config.delivery = DeliveryMode::Immediate;
    }

    let scene = match &cli.scene {
        Some(path) => match SceneFile::load_from_file(path) {
            Ok(scene) => scene,
            Err(e) => {
                error!("Failed to load scene from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            let mut rng = fastrand::Rng::with_seed(cli.seed);
            SceneFile::random(cli.random, Vec2::splat(cli.area), &mut rng)
        }
    };

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    info!(
        "Collision grid: cell_size={}, delivery={}",
        config.cell_size, config.delivery
    );
    let bus = setup_collision(&mut world, config);
    let entities = scene.spawn(&mut world);
    info!("Spawned {} entities", entities.len());

    // --------------- Listeners ---------------
    let collisions = Arc::new(AtomicUsize::new(0));
    {
        let collisions = collisions.clone();
        bus.subscribe(move |e: &CollisionEvent| {
            collisions.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Collision {:?} ({:?}) <-> {:?} ({:?})",
                e.a,
                e.group_a.as_ref().map(|g| g.name()),
                e.b,
                e.group_b.as_ref().map(|g| g.name())
            );
        });
    }
    {
        let hazard_bus = bus.clone();
        bus.subscribe(move |e: &CollisionEvent| {
            let Some((player, other)) = e.split_by_group("player") else {
                return;
            };
            hazard_bus
                .publish_immediate(DamageEvent::new(player).with_source(other).with_amount(1.0));
        });
    }
    let damage_taken = Arc::new(Mutex::new(0.0f32));
    {
        let damage_taken = damage_taken.clone();
        bus.subscribe(move |e: &DamageEvent| {
            if let Ok(mut total) = damage_taken.lock() {
                *total += e.amount;
            }
        });
    }

    // --------------- Main loop ---------------
    let mut schedule = collision_schedule();
    for tick in 0..cli.ticks {
        schedule.run(&mut world);
        let stats = world.resource::<CollisionDetector<Entity>>().stats();
        info!(
            "tick {}: {} indexed, {} cells, {} candidates, {} unique pairs, {} filtered, {} collisions",
            tick,
            stats.indexed,
            stats.occupied_cells,
            stats.candidates,
            stats.unique_pairs,
            stats.filtered,
            stats.collisions
        );
    }

    let damage = damage_taken.lock().map(|d| *d).unwrap_or_default();
    info!(
        "Done: {} collision events delivered, {} damage dealt to players",
        collisions.load(Ordering::Relaxed),
        damage
    );

    // Handlers hold bus clones; clearing breaks the cycle.
    bus.clear();
}
