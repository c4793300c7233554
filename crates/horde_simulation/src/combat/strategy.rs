//! AttackStrategy — как враг наносит урон
//!
//! Melee: proximity sweep вокруг владельца после wind-up.
//! Ranged: один снаряд (или веер из трёх у shotgun) после wind-up.
//!
//! Wind-up = длина attack анимации − offset (melee 1.5s, ranged 0.7s),
//! удар/выстрел совпадает с "кадром удара" анимации.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::Health;
use crate::tasks::{TaskKind, TaskScheduler};

/// Offset от конца melee анимации до удара
pub const MELEE_ANIMATION_OFFSET: f32 = 1.5;
/// Offset от конца ranged анимации до выстрела
pub const RANGED_ANIMATION_OFFSET: f32 = 0.7;

/// Паттерн выстрела
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
pub enum PelletPattern {
    /// Один снаряд
    #[default]
    Single,
    /// Три снаряда: -angle, 0, +angle (yaw), shotgun
    Spread { angle_degrees: f32 },
}

/// Melee удар
#[derive(Debug, Clone, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeStrike {
    pub range: f32,
    #[serde(skip)]
    pub damage: f32,
    #[serde(skip)]
    pub wind_up: f32,
}

impl Default for MeleeStrike {
    fn default() -> Self {
        Self {
            range: 2.0,
            damage: 0.0,
            wind_up: 0.0,
        }
    }
}

/// Ranged выстрел
#[derive(Debug, Clone, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedVolley {
    pub projectile_speed: f32,
    pub max_range: f32,
    /// Разброс по X и Y до нормализации направления
    pub spread_amount: f32,
    pub pattern: PelletPattern,
    #[serde(skip)]
    pub damage: f32,
    #[serde(skip)]
    pub wind_up: f32,
}

impl Default for RangedVolley {
    fn default() -> Self {
        Self {
            projectile_speed: 20.0,
            max_range: 50.0,
            spread_amount: 1.0,
            pattern: PelletPattern::Single,
            damage: 0.0,
            wind_up: 0.0,
        }
    }
}

/// Стратегия атаки врага (выбирается при создании, не меняется)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum AttackStrategy {
    Melee(MeleeStrike),
    Ranged(RangedVolley),
}

impl Default for AttackStrategy {
    fn default() -> Self {
        Self::Melee(MeleeStrike::default())
    }
}

impl AttackStrategy {
    pub fn is_melee(&self) -> bool {
        matches!(self, Self::Melee(_))
    }

    pub fn damage(&self) -> f32 {
        match self {
            Self::Melee(strike) => strike.damage,
            Self::Ranged(volley) => volley.damage,
        }
    }

    pub fn wind_up(&self) -> f32 {
        match self {
            Self::Melee(strike) => strike.wind_up,
            Self::Ranged(volley) => volley.wind_up,
        }
    }

    /// Применить stat overrides до первого тика
    ///
    /// Выставляет max health владельца (полный heal) и выводит wind-up из длины анимации.
    pub fn initialize(&mut self, animation_length: f32, damage: f32, max_health: f32, health: &mut Health) {
        health.set_max(max_health);

        match self {
            Self::Melee(strike) => {
                strike.damage = damage;
                strike.wind_up = (animation_length - MELEE_ANIMATION_OFFSET).max(0.0);
            }
            Self::Ranged(volley) => {
                volley.damage = damage;
                volley.wind_up = (animation_length - RANGED_ANIMATION_OFFSET).max(0.0);
            }
        }
    }

    /// Начать атаку: in-flight wind-up отменяется и заменяется новым
    pub fn attack(&self, owner: Entity, scheduler: &mut TaskScheduler) {
        scheduler.schedule(owner, TaskKind::AttackWindUp, self.wind_up());
    }
}

impl RangedVolley {
    /// Направления снарядов одного выстрела
    ///
    /// forward + uniform(-spread, spread) по X и Y, нормализация;
    /// Spread паттерн поворачивает базовое направление по yaw на -a, 0, +a.
    pub fn pellet_directions<R: Rng + ?Sized>(&self, forward: Vec3, rng: &mut R) -> Vec<Vec3> {
        let spread = self.spread_amount.abs();
        let jitter = if spread > 0.0 {
            Vec3::new(rng.gen_range(-spread..=spread), rng.gen_range(-spread..=spread), 0.0)
        } else {
            Vec3::ZERO
        };
        let base = (forward + jitter).normalize_or(forward);

        match self.pattern {
            PelletPattern::Single => vec![base],
            PelletPattern::Spread { angle_degrees } => [-angle_degrees, 0.0, angle_degrees]
                .into_iter()
                .map(|angle| Quat::from_rotation_y(angle.to_radians()) * base)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_initialize_melee_sets_wind_up_and_health() {
        let mut strategy = AttackStrategy::Melee(MeleeStrike::default());
        let mut health = Health::new(100.0);
        health.take_damage(40.0);

        strategy.initialize(2.0, 20.0, 150.0, &mut health);

        assert_eq!(strategy.wind_up(), 0.5);
        assert_eq!(strategy.damage(), 20.0);
        assert_eq!(health.current, 150.0);
        assert_eq!(health.max, 150.0);
    }

    #[test]
    fn test_initialize_ranged_uses_ranged_offset() {
        let mut strategy = AttackStrategy::Ranged(RangedVolley::default());
        let mut health = Health::default();

        strategy.initialize(1.2, 10.0, 100.0, &mut health);

        assert!((strategy.wind_up() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_short_animation_clamps_wind_up() {
        let mut strategy = AttackStrategy::Melee(MeleeStrike::default());
        let mut health = Health::default();

        strategy.initialize(1.0, 10.0, 100.0, &mut health);

        assert_eq!(strategy.wind_up(), 0.0);
    }

    #[test]
    fn test_second_attack_replaces_pending_wind_up() {
        let mut strategy = AttackStrategy::Melee(MeleeStrike::default());
        let mut health = Health::default();
        strategy.initialize(2.0, 20.0, 100.0, &mut health);

        let owner = Entity::from_raw(7);
        let mut scheduler = TaskScheduler::default();
        strategy.attack(owner, &mut scheduler);
        scheduler.advance(0.3);
        strategy.attack(owner, &mut scheduler);

        assert_eq!(scheduler.pending_count(), 1);
        let remaining = scheduler.remaining(owner, TaskKind::AttackWindUp).unwrap();
        assert!((remaining - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_single_pellet_without_spread_follows_forward() {
        let volley = RangedVolley {
            spread_amount: 0.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let directions = volley.pellet_directions(Vec3::NEG_Z, &mut rng);

        assert_eq!(directions, vec![Vec3::NEG_Z]);
    }

    #[test]
    fn test_shotgun_fires_three_pellets_fanned_by_yaw() {
        let volley = RangedVolley {
            spread_amount: 0.0,
            pattern: PelletPattern::Spread { angle_degrees: 15.0 },
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let directions = volley.pellet_directions(Vec3::NEG_Z, &mut rng);

        assert_eq!(directions.len(), 3);
        assert!((directions[1] - Vec3::NEG_Z).length() < 1e-6);
        let angle = directions[0].angle_between(directions[2]).to_degrees();
        assert!((angle - 30.0).abs() < 1e-3, "fan angle = {}", angle);
        assert!(directions.iter().all(|d| (d.length() - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_spread_stays_normalized() {
        let volley = RangedVolley::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..32 {
            let direction = volley.pellet_directions(Vec3::NEG_Z, &mut rng)[0];
            assert!((direction.length() - 1.0).abs() < 1e-5);
            assert!(direction.z < 0.0, "spread never flips the shot backwards");
        }
    }
}
