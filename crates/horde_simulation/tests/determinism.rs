//! Тесты детерминизма
//!
//! Полная симуляция (spawn, FSM, patrol, стрельба) с одинаковым seed
//! даёт идентичные снепшоты Transform и Health.

use bevy::prelude::*;
use horde_simulation::*;

/// Прогон: игрок в центре, стартовая волна + steady-state спавн
fn run_simulation(seed: u64, ticks: u32) -> (Vec<u8>, Vec<u8>) {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::with_config(SimulationConfig {
        seed,
        population: PopulationConfig {
            target_max: 8,
            spawn_start_delay: 1.0,
            ..Default::default()
        },
        ..Default::default()
    }));

    spawn_player(app.world_mut(), Vec3::ZERO, 1_000.0);
    app.world_mut().send_event(PopulationRequest::SeedInitial { count: 5 });
    app.world_mut().send_event(PopulationRequest::StartSpawning);

    run_fixed_ticks(&mut app, ticks);

    let world = app.world_mut();
    (world_snapshot::<Transform>(world), world_snapshot::<Health>(world))
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: u32 = 900;

    let first = run_simulation(SEED, TICK_COUNT);
    let second = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        first, second,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: u32 = 300;

    // Запускаем 3 раза — все должны быть идентичны
    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(snapshots[0], *snapshot, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

#[test]
fn test_different_seeds_diverge() {
    let a = run_simulation(1, 60);
    let b = run_simulation(2, 60);

    // Разные seed → разные позиции стартовой волны
    assert_ne!(a.0, b.0);
}
