//! Чистая функция решения FSM (без ECS)
//!
//! Порядок правил (tie-break, воспроизводится дословно):
//! 1. dist < min_distance ∧ ¬melee ∧ ¬mid-attack → Retreat
//! 2. in attack range ∧ in sight ∧ facing → Attack
//! 3. in attack range ∧ in sight ∧ ¬facing → копим time_in_attack_range; ≥ required → Attack, иначе Chase
//! 4. in sight → Chase (накопитель сброшен)
//! 5. иначе → Patrol (накопитель сброшен)
//!
//! Melee никогда не отступает: при dist < min_distance проваливается в правило 2.

use bevy::prelude::*;

use super::components::{AIConfig, AIState};

/// Что враг "видит" в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub distance: f32,
    /// dot(normalize(to_player), forward)
    pub facing_dot: f32,
}

impl Perception {
    pub fn new(position: Vec3, forward: Vec3, player_position: Vec3) -> Self {
        let to_player = player_position - position;
        Self {
            distance: to_player.length(),
            facing_dot: to_player.normalize_or_zero().dot(forward),
        }
    }

    /// Нет игрока — никого не видим
    pub fn nothing() -> Self {
        Self {
            distance: f32::INFINITY,
            facing_dot: 0.0,
        }
    }

    pub fn is_facing(&self) -> bool {
        self.facing_dot > 0.0
    }
}

/// Результат оценки
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub state: AIState,
    pub time_in_attack_range: f32,
}

pub fn evaluate(
    config: &AIConfig,
    perception: &Perception,
    mid_attack: bool,
    time_in_attack_range: f32,
    delta: f32,
) -> Decision {
    let in_sight = perception.distance <= config.sight_range;
    let in_attack_range = perception.distance <= config.attack_range;

    if perception.distance < config.min_distance_to_player && !config.is_melee && !mid_attack {
        return Decision {
            state: AIState::Retreat,
            time_in_attack_range,
        };
    }

    if in_attack_range && in_sight {
        if perception.is_facing() {
            return Decision {
                state: AIState::Attack,
                time_in_attack_range,
            };
        }

        let accumulated = time_in_attack_range + delta;
        let state = if accumulated >= config.required_time_in_range {
            AIState::Attack
        } else {
            AIState::Chase
        };
        return Decision {
            state,
            time_in_attack_range: accumulated,
        };
    }

    let state = if in_sight { AIState::Chase } else { AIState::Patrol };
    Decision {
        state,
        time_in_attack_range: 0.0,
    }
}
