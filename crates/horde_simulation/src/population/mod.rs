//! Population module
//!
//! Держит число живых врагов вокруг игрока ≤ target_max:
//! стартовая волна, steady-state spawn cycle, clear при рестарте.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod controller;
pub mod factory;
pub mod placement;
pub mod systems;

pub use controller::{EnemyStats, PopulationController, SpawnCycle};
pub use factory::{spawn_enemy, EnemyRoster};

/// Команды популяции (от mission / game flow)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PopulationRequest {
    /// Стартовая волна (режется по свободной ёмкости)
    SeedInitial { count: usize },
    StartSpawning,
    StopSpawning,
    /// Удалить всех врагов, live = 0
    Clear,
    /// Один враг в точке; `None` — случайный archetype
    SpawnAt { position: Vec3, archetype: Option<usize> },
}

pub struct PopulationPlugin;

impl Plugin for PopulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PopulationController>()
            .init_resource::<EnemyRoster>()
            .add_event::<PopulationRequest>()
            .add_systems(
                FixedUpdate,
                (
                    systems::handle_population_requests,
                    systems::track_enemy_deaths,
                    systems::run_spawn_cycle,
                )
                    .chain()
                    .in_set(SimulationSet::Population),
            );
    }
}
