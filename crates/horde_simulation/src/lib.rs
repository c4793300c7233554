//! HORDE Simulation Core
//!
//! ECS-симуляция враждебных агентов на Bevy 0.16 (headless).
//!
//! Слои:
//! - combat: Health ledger, AttackStrategy (melee/ranged), projectiles
//! - ai: per-enemy decision FSM, death/loot reactions
//! - population: bounded spawning вокруг игрока
//! - mission: difficulty table, kill/survive/find-item цели
//!
//! Всё крутится в FixedUpdate (60Hz), порядок задаётся через `SimulationSet`.

use bevy::app::FixedMain;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod mission;
pub mod population;
pub mod spatial;
pub mod tasks;

// Re-export базовых типов для удобства
pub use ai::{AIConfig, AIPlugin, AIState, EnemyDied, EnemyMemory, LootDropped, LootKind};
pub use combat::{
    AttackStrategy, CombatPlugin, DamageDealt, EntityDied, HealthChanged, PelletPattern, Projectile,
};
pub use components::*;
pub use config::{ConfigError, EnemyArchetype, PopulationConfig, SimulationConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use mission::{
    Difficulty, MissionEnded, MissionKind, MissionOutcome, MissionPlugin, MissionRequest, MissionStatus, MissionTracker,
};
pub use population::{EnemyStats, PopulationController, PopulationPlugin, PopulationRequest};
pub use spatial::{FlatGround, Ground, GroundQuery, RejectionSampler, TileGround};
pub use tasks::{TaskKind, TaskScheduler};

/// Порядок фаз внутри одного FixedUpdate тика
///
/// 1. Timers — продвигаем TaskScheduler
/// 2. Combat — wind-up резолв, projectiles, damage
/// 3. Reactions — смерть, attack reset, death visual, despawn
/// 4. Decision — FSM решения врагов
/// 5. Movement — steering NavAgent
/// 6. Population — запросы, учёт смертей, spawn cycle
/// 7. Mission — прогресс миссии
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Timers,
    Combat,
    Reactions,
    Decision,
    Movement,
    Population,
    Mission,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(error) => {
                log_error(&format!("❌ Invalid simulation config, falling back to defaults: {}", error));
                SimulationConfig::default()
            }
        };

        // Seed из create_headless_app имеет приоритет над конфигом
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .insert_resource(population::EnemyRoster::new(config.archetypes.clone()))
            .insert_resource(PopulationController::from_config(
                &config.population,
                config.difficulty.profile().enemy_stats(),
            ))
            .init_resource::<TaskScheduler>()
            .init_resource::<Ground>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Timers,
                    SimulationSet::Combat,
                    SimulationSet::Reactions,
                    SimulationSet::Decision,
                    SimulationSet::Movement,
                    SimulationSet::Population,
                    SimulationSet::Mission,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                tasks::advance_task_scheduler.in_set(SimulationSet::Timers),
            )
            .add_plugins((CombatPlugin, AIPlugin, PopulationPlugin, MissionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Все случайные решения симуляции (patrol points, spread, spawn, loot) идут через него.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Прогоняет ровно `ticks` шагов FixedMain
///
/// Time<Fixed> двигается на один timestep за тик, независимо от wall clock,
/// поэтому прогоны с одинаковым seed воспроизводимы.
///
/// Каждый тик начинается с `First` (swap двойных буферов событий), поэтому
/// `Events<T>` хранят максимум два последних тика и не растут на длинных прогонах.
pub fn run_fixed_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        let world = app.world_mut();
        world.run_schedule(First);

        let step = world.resource::<Time<Fixed>>().timestep();
        world.resource_mut::<Time<Fixed>>().advance_by(step);
        // Внутри FixedMain generic Time = fixed, как в обычном RunFixedMainLoop
        let fixed = world.resource::<Time<Fixed>>().as_generic();
        *world.resource_mut::<Time>() = fixed;

        world.run_schedule(FixedMain);
    }
}

/// То же, что `run_fixed_ticks`, но собирает все `E`, записанные системами за прогон
///
/// После каждого тика текущий буфер `Events<E>` содержит события этого тика
/// (на самом первом тике app ещё и отправленные снаружи до него).
pub fn run_fixed_ticks_collecting<E: Event + Clone>(app: &mut App, ticks: u32) -> Vec<E> {
    let mut collected = Vec::new();
    for _ in 0..ticks {
        run_fixed_ticks(app, 1);
        collected.extend(app.world().resource::<Events<E>>().iter_current_update_events().cloned());
    }
    collected
}

/// Спавнит игрока (цель всех врагов) в мир напрямую
pub fn spawn_player(world: &mut World, position: Vec3, max_health: f32) -> Entity {
    world
        .spawn((
            Player,
            Transform::from_translation(position),
            Health::new(max_health),
            CollisionLayer::PLAYER,
            Collider::default(),
        ))
        .id()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
