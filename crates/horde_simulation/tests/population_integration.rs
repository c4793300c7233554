//! Population integration test
//!
//! Проверяем:
//! - live врагов никогда не больше target_max
//! - стартовая волна режется по ёмкости
//! - Clear удаляет всех
//! - карта без земли отклоняет группы
//! - смерть освобождает место

use bevy::prelude::*;
use horde_simulation::*;

fn population_app(seed: u64, population: PopulationConfig) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::with_config(SimulationConfig {
        population,
        ..Default::default()
    }));
    app
}

fn fast_spawning(target_max: usize) -> PopulationConfig {
    PopulationConfig {
        target_max,
        spawn_start_delay: 0.5,
        spawn_interval: (0.2, 0.4),
        capacity_backoff: 0.5,
        ..Default::default()
    }
}

fn enemy_entities(app: &mut App) -> Vec<Entity> {
    let world = app.world_mut();
    world.query_filtered::<Entity, With<Enemy>>().iter(world).collect()
}

fn live_count(app: &App) -> usize {
    app.world().resource::<PopulationController>().live_count()
}

#[test]
fn test_population_never_exceeds_target_max() {
    let mut app = population_app(42, fast_spawning(4));
    spawn_player(app.world_mut(), Vec3::ZERO, 1_000_000.0);
    app.world_mut().send_event(PopulationRequest::SeedInitial { count: 20 });
    app.world_mut().send_event(PopulationRequest::StartSpawning);

    for _ in 0..60 {
        run_fixed_ticks(&mut app, 10);
        assert!(live_count(&app) <= 4);
        assert!(enemy_entities(&mut app).len() <= 4);
    }
    assert_eq!(live_count(&app), 4);
}

#[test]
fn test_seed_is_clamped_to_capacity() {
    let mut app = population_app(1, fast_spawning(3));
    spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
    app.world_mut().send_event(PopulationRequest::SeedInitial { count: 20 });

    run_fixed_ticks(&mut app, 1);

    assert_eq!(live_count(&app), 3);
    assert_eq!(enemy_entities(&mut app).len(), 3);
}

#[test]
fn test_seeded_enemies_keep_distance_from_player() {
    let mut app = population_app(9, fast_spawning(10));
    spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
    app.world_mut().send_event(PopulationRequest::SeedInitial { count: 10 });

    run_fixed_ticks(&mut app, 1);

    // 2 × min_spawn_distance, ослабленный sampler'ом, минус jitter
    let world = app.world_mut();
    for transform in world.query_filtered::<&Transform, With<Enemy>>().iter(world) {
        let planar = Vec2::new(transform.translation.x, transform.translation.z);
        assert!(planar.length() > 1.0, "enemy spawned on top of player: {:?}", planar);
    }
}

#[test]
fn test_clear_removes_every_enemy() {
    let mut app = population_app(7, fast_spawning(6));
    spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
    app.world_mut().send_event(PopulationRequest::SeedInitial { count: 6 });
    run_fixed_ticks(&mut app, 5);
    assert_eq!(enemy_entities(&mut app).len(), 6);

    app.world_mut().send_event(PopulationRequest::Clear);
    run_fixed_ticks(&mut app, 1);

    assert!(enemy_entities(&mut app).is_empty());
    assert_eq!(live_count(&app), 0);
}

#[test]
fn test_clear_in_same_tick_as_spawn() {
    let mut app = population_app(7, fast_spawning(6));
    spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
    app.world_mut().send_event(PopulationRequest::SpawnAt {
        position: Vec3::new(10.0, 0.0, 0.0),
        archetype: None,
    });
    app.world_mut().send_event(PopulationRequest::Clear);

    run_fixed_ticks(&mut app, 1);

    assert!(enemy_entities(&mut app).is_empty());
    assert_eq!(live_count(&app), 0);
}

#[test]
fn test_groundless_map_spawns_nothing() {
    let mut app = population_app(3, fast_spawning(10));
    app.insert_resource(Ground::new(TileGround::new(1.0, 0.0)));
    spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
    app.world_mut().send_event(PopulationRequest::SeedInitial { count: 5 });
    app.world_mut().send_event(PopulationRequest::StartSpawning);

    run_fixed_ticks(&mut app, 120);

    assert!(enemy_entities(&mut app).is_empty());
    assert_eq!(live_count(&app), 0);
    assert!(app.world().resource::<PopulationController>().is_spawning());
}

#[test]
fn test_spawn_cycle_waits_for_start_delay() {
    let mut app = population_app(11, fast_spawning(10));
    spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
    app.world_mut().send_event(PopulationRequest::StartSpawning);

    // start delay 0.5s + минимум 0.2s интервала
    run_fixed_ticks(&mut app, 40);
    assert_eq!(live_count(&app), 0);

    run_fixed_ticks(&mut app, 60);
    assert!(live_count(&app) >= 1);
}

#[test]
fn test_stop_spawning_halts_cycle() {
    let mut app = population_app(11, fast_spawning(10));
    spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
    app.world_mut().send_event(PopulationRequest::StartSpawning);
    run_fixed_ticks(&mut app, 10);

    app.world_mut().send_event(PopulationRequest::StopSpawning);
    run_fixed_ticks(&mut app, 300);

    assert_eq!(live_count(&app), 0);
}

#[test]
fn test_death_frees_capacity() {
    let mut app = population_app(5, fast_spawning(1));
    spawn_player(app.world_mut(), Vec3::new(60.0, 0.0, 60.0), 100.0);
    app.world_mut().send_event(PopulationRequest::SpawnAt {
        position: Vec3::ZERO,
        archetype: Some(0),
    });
    run_fixed_ticks(&mut app, 1);
    assert_eq!(live_count(&app), 1);

    // Ёмкость исчерпана — второй SpawnAt отклоняется
    app.world_mut().send_event(PopulationRequest::SpawnAt {
        position: Vec3::X,
        archetype: Some(0),
    });
    run_fixed_ticks(&mut app, 1);
    let enemies = enemy_entities(&mut app);
    assert_eq!(enemies.len(), 1);

    let enemy = enemies[0];
    app.world_mut().get_mut::<Health>(enemy).unwrap().take_damage(1000.0);
    app.world_mut().send_event(EntityDied {
        entity: enemy,
        killer: None,
    });
    run_fixed_ticks(&mut app, 1);

    assert_eq!(live_count(&app), 0);
    assert_eq!(app.world().resource::<PopulationController>().free_capacity(), 1);
}

#[test]
fn test_spawned_enemy_uses_controller_stats() {
    let mut app = population_app(5, fast_spawning(2));
    spawn_player(app.world_mut(), Vec3::new(60.0, 0.0, 60.0), 100.0);
    app.world_mut().resource_mut::<PopulationController>().set_stats(EnemyStats {
        damage: 12.0,
        max_health: 40.0,
    });
    app.world_mut().send_event(PopulationRequest::SpawnAt {
        position: Vec3::ZERO,
        archetype: Some(1),
    });
    app.world_mut().send_event(PopulationRequest::SpawnAt {
        position: Vec3::X * 3.0,
        archetype: Some(0),
    });
    run_fixed_ticks(&mut app, 1);

    let world = app.world_mut();
    let mut by_kind: Vec<(bool, f32, f32)> = world
        .query::<(&AttackStrategy, &Health)>()
        .iter(world)
        .map(|(strategy, health)| (strategy.is_melee(), strategy.damage(), health.max))
        .collect();
    by_kind.sort_by(|a, b| a.0.cmp(&b.0));

    // ranged: как есть; melee: ×2 урон, ×1.5 здоровье
    assert_eq!(by_kind, vec![(false, 12.0, 40.0), (true, 24.0, 60.0)]);
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let app = population_app(
        1,
        PopulationConfig {
            target_max: 0,
            spawn_interval: (f32::NAN, 1.0),
            ..Default::default()
        },
    );

    let defaults = PopulationConfig::default();
    let controller = app.world().resource::<PopulationController>();
    assert_eq!(controller.target_max, defaults.target_max);
    assert_eq!(controller.spawn_interval_range, defaults.spawn_interval);
}
