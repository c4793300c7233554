//! AI decision-making module
//!
//! Per-enemy FSM (Patrol / Chase / Attack / Retreat / Dead).
//! Решение — чистая функция `decision::evaluate`, действия и таймеры — ECS системы.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod decision;
pub mod events;
pub mod loot;
pub mod systems;

// Re-export основных типов
pub use components::{AIConfig, AIState, EnemyAgent, EnemyMemory};
pub use decision::{evaluate, Decision, Perception};
pub use events::{EnemyDied, LootDropped};
pub use loot::{LootKind, LootTable};
pub use systems::CORPSE_LIFETIME;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. Reactions: handle_enemy_death → finish_attack_resets → finish_patrol_holds
///    → finish_death_visuals → despawn_corpses
/// 2. Decision: enemy_decision
/// 3. Movement: steer_nav_agents
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyDied>().add_event::<LootDropped>();

        app.add_systems(
            FixedUpdate,
            (
                systems::handle_enemy_death,
                systems::finish_attack_resets,
                systems::finish_patrol_holds,
                systems::finish_death_visuals,
                systems::despawn_corpses,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Reactions),
        )
        .add_systems(FixedUpdate, systems::enemy_decision.in_set(SimulationSet::Decision))
        .add_systems(FixedUpdate, systems::steer_nav_agents.in_set(SimulationSet::Movement));
    }
}
