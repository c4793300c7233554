//! Combat module
//!
//! ECS ответственность:
//! - Health ledger (общий для игрока и врагов)
//! - AttackStrategy: melee sweep / ranged projectiles после wind-up
//! - Events: DamageDealt, HealthChanged, EntityDied
//!
//! Тайминг атак живёт в TaskScheduler (TaskKind::AttackWindUp),
//! решение "когда атаковать" — в ai::systems::fsm.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod damage;
pub mod projectile;
pub mod strategy;
pub mod systems;

// Re-export основных типов
pub use damage::{DamageDealt, DamageEvents, DamageSource, EntityDied, HealthChanged};
pub use projectile::{Projectile, PROJECTILE_LIFESPAN};
pub use strategy::{
    AttackStrategy, MeleeStrike, PelletPattern, RangedVolley, MELEE_ANIMATION_OFFSET, RANGED_ANIMATION_OFFSET,
};

/// Combat Plugin
///
/// Порядок выполнения (SimulationSet::Combat):
/// 1. announce_spawned_health — стартовое HealthChanged для новых entity
/// 2. resolve_attack_wind_ups — удары и выстрелы по сработавшим wind-up
/// 3. move_projectiles — полёт снарядов, попадания, despawn
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageDealt>()
            .add_event::<HealthChanged>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (
                damage::announce_spawned_health,
                systems::resolve_attack_wind_ups,
                systems::move_projectiles,
            )
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
