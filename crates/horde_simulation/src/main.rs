//! Headless симуляция HORDE
//!
//! Игрок бегает по кругу, враги спавнятся и охотятся за ним, пока миссия не закончится.
//! Usage: horde_simulation [config.ron]

use bevy::prelude::*;
use horde_simulation::{
    create_headless_app, log_error, log_info, run_fixed_ticks, spawn_player, Difficulty, Enemy, Health, MissionKind,
    MissionRequest, MissionTracker, Player, PopulationController, PopulationRequest, SimulationConfig,
    SimulationPlugin,
};

/// 10 минут симуляции при 60Hz
const MAX_TICKS: u32 = 60 * 60 * 10;
const REPORT_EVERY: u32 = 300;
const PLAYER_ORBIT_RADIUS: f32 = 6.0;
const PLAYER_ORBIT_SPEED: f32 = 0.4;

fn load_config() -> SimulationConfig {
    let loaded = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(&path),
        None => SimulationConfig::bundled(),
    };

    loaded.unwrap_or_else(|err| {
        log_error(&format!("❌ Config error: {}. Using defaults", err));
        SimulationConfig::default()
    })
}

fn main() {
    let config = load_config();
    let seed = config.seed;
    let initial_enemies = config.population.initial_enemies;
    println!("Starting HORDE headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::with_config(config));

    let player = spawn_player(app.world_mut(), Vec3::new(PLAYER_ORBIT_RADIUS, 0.0, 0.0), 100.0);

    app.world_mut().send_event(MissionRequest::Begin {
        kind: MissionKind::Survive,
        difficulty: Difficulty::Normal,
    });
    app.world_mut().send_event(PopulationRequest::SeedInitial {
        count: initial_enemies,
    });
    app.world_mut().send_event(PopulationRequest::StartSpawning);

    let step = app.world().resource::<Time<Fixed>>().timestep().as_secs_f32();
    for tick in 1..=MAX_TICKS {
        let angle = tick as f32 * step * PLAYER_ORBIT_SPEED;
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
            transform.translation = Vec3::new(angle.cos(), 0.0, angle.sin()) * PLAYER_ORBIT_RADIUS;
        }

        run_fixed_ticks(&mut app, 1);

        let running = app.world().resource::<MissionTracker>().is_running();
        if tick % REPORT_EVERY == 0 || !running {
            report(&mut app, tick);
        }
        if !running {
            break;
        }
    }

    let tracker = app.world().resource::<MissionTracker>();
    log_info(&format!(
        "Simulation complete: status={:?}, kills={}, xp={}",
        tracker.status,
        tracker.kills,
        tracker.experience_reward()
    ));
}

fn report(app: &mut App, tick: u32) {
    let world = app.world_mut();
    let enemies = world.query_filtered::<(), With<Enemy>>().iter(world).count();
    let player_health = world
        .query_filtered::<&Health, With<Player>>()
        .iter(world)
        .next()
        .map(|h| h.current)
        .unwrap_or(0.0);
    let live = world.resource::<PopulationController>().live_count();

    println!(
        "Tick {}: {} enemy entities ({} live), player health {:.0}",
        tick, enemies, live, player_health
    );
}
