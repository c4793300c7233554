//! Bounded rejection sampling
//!
//! Вместо бесконечного "пробуй пока не найдёшь": `rounds` раундов по
//! `attempts_per_round` попыток, каждый следующий раунд сужает радиус и
//! ослабляет минимальную дистанцию на `relax_factor`.
//! Все раунды исчерпаны → None, caller сам решает (patrol ждёт тик, spawn группа отклоняется).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Границы одной попытки (уже с учётом relax)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleBounds {
    pub radius: f32,
    pub min_distance: f32,
    pub round: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct RejectionSampler {
    pub attempts_per_round: u32,
    pub rounds: u32,
    pub relax_factor: f32,
}

impl Default for RejectionSampler {
    fn default() -> Self {
        Self {
            attempts_per_round: 16,
            rounds: 3,
            relax_factor: 0.75,
        }
    }
}

impl RejectionSampler {
    /// Прогнать попытки; `attempt` возвращает Some(точка) если кандидат принят
    pub fn sample<F>(&self, radius: f32, min_distance: f32, mut attempt: F) -> Option<Vec3>
    where
        F: FnMut(SampleBounds) -> Option<Vec3>,
    {
        let mut bounds = SampleBounds {
            radius,
            min_distance,
            round: 0,
        };

        for round in 0..self.rounds {
            bounds.round = round;
            for _ in 0..self.attempts_per_round {
                if let Some(point) = attempt(bounds) {
                    return Some(point);
                }
            }
            bounds.radius *= self.relax_factor;
            bounds.min_distance *= self.relax_factor;
        }

        None
    }

    /// Сколько попыток максимум сделает sampler
    pub fn max_attempts(&self) -> u32 {
        self.attempts_per_round * self.rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_accepted_candidate_wins() {
        let sampler = RejectionSampler::default();
        let mut calls = 0;

        let point = sampler.sample(20.0, 5.0, |_| {
            calls += 1;
            (calls == 3).then_some(Vec3::X)
        });

        assert_eq!(point, Some(Vec3::X));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_all_rounds() {
        let sampler = RejectionSampler {
            attempts_per_round: 4,
            rounds: 3,
            relax_factor: 0.5,
        };
        let mut seen = Vec::new();

        let point = sampler.sample(20.0, 8.0, |bounds| {
            seen.push(bounds);
            None
        });

        assert!(point.is_none());
        assert_eq!(seen.len() as u32, sampler.max_attempts());
        // Раунды ослабляют ограничения
        assert_eq!(seen[0].radius, 20.0);
        assert_eq!(seen[4].radius, 10.0);
        assert_eq!(seen[8].min_distance, 2.0);
        assert_eq!(seen[8].round, 2);
    }
}
