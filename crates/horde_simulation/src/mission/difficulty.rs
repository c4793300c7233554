//! Difficulty table
//!
//! Сложность задаёт статы новых врагов и цели миссий.
//! В PopulationController уходит явным `EnemyStats`, не через глобальный singleton.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::population::EnemyStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
    Extreme,
    Insane,
}

/// Параметры одной сложности
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub enemy_damage: f32,
    pub enemy_max_health: f32,
    pub enemies_to_kill: u32,
    /// Секунды для Survive миссии
    pub time_to_survive: f32,
    /// Множитель награды
    pub multiplier: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::VeryHard,
        Difficulty::Extreme,
        Difficulty::Insane,
    ];

    pub fn profile(self) -> DifficultyProfile {
        // (damage, max health, kills, survive seconds, multiplier)
        let (enemy_damage, enemy_max_health, enemies_to_kill, survive, multiplier) = match self {
            Difficulty::Easy => (10.0, 30.0, 10, 120.0, 1.0),
            Difficulty::Normal => (15.0, 50.0, 20, 240.0, 2.0),
            Difficulty::Hard => (20.0, 70.0, 25, 360.0, 3.0),
            Difficulty::VeryHard => (30.0, 80.0, 30, 480.0, 4.0),
            Difficulty::Extreme => (35.0, 90.0, 40, 600.0, 5.0),
            Difficulty::Insane => (40.0, 120.0, 50, 720.0, 6.0),
        };

        DifficultyProfile {
            enemy_damage,
            enemy_max_health,
            enemies_to_kill,
            time_to_survive: survive + 1.0,
            multiplier,
        }
    }
}

impl DifficultyProfile {
    pub fn enemy_stats(&self) -> EnemyStats {
        EnemyStats {
            damage: self.enemy_damage,
            max_health: self.enemy_max_health,
        }
    }
}
