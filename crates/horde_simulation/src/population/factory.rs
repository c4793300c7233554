//! Enemy factory: archetype + статы → ECS entity

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AIState, EnemyMemory};
use crate::components::{AnimationClips, AnimationIntent, Collider, CollisionLayer, Enemy, Health, NavAgent};
use crate::config::EnemyArchetype;

use super::controller::EnemyStats;

/// Список archetype'ов, доступных spawner'у
#[derive(Resource, Debug, Clone, Default)]
pub struct EnemyRoster {
    pub archetypes: Vec<EnemyArchetype>,
}

impl EnemyRoster {
    pub fn new(archetypes: Vec<EnemyArchetype>) -> Self {
        Self { archetypes }
    }

    pub fn get(&self, index: usize) -> Option<&EnemyArchetype> {
        self.archetypes.get(index)
    }

    /// Случайный archetype (равновероятно)
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&EnemyArchetype> {
        if self.archetypes.is_empty() {
            return None;
        }
        self.archetypes.get(rng.gen_range(0..self.archetypes.len()))
    }
}

/// Спавн врага; stat overrides применяются до первого тика
pub fn spawn_enemy(commands: &mut Commands, archetype: &EnemyArchetype, stats: EnemyStats, position: Vec3) -> Entity {
    let mut strategy = archetype.strategy.clone();
    let scaled = stats.for_strategy(strategy.is_melee());

    let mut health = Health::new(scaled.max_health);
    strategy.initialize(archetype.attack_animation_length, scaled.damage, scaled.max_health, &mut health);

    let mut ai = archetype.ai.clone();
    ai.is_melee = strategy.is_melee();

    commands
        .spawn((
            Enemy {
                archetype: archetype.name.clone(),
            },
            Transform::from_translation(position),
            health,
            strategy,
            AIState::Patrol,
            ai,
            EnemyMemory::default(),
            NavAgent::new(archetype.move_speed),
            CollisionLayer::ENEMY,
            Collider::default(),
            AnimationIntent::default(),
            AnimationClips {
                attack_length: archetype.attack_animation_length,
                death_length: archetype.death_animation_length,
            },
        ))
        .id()
}
