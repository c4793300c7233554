//! Projectile компонент (ranged врагов)
//!
//! Летит по прямой, первый damageable collider чужой категории получает урон,
//! снаряд удаляется. Также удаляется на max_range или по lifespan.

use bevy::prelude::*;

/// Время жизни снаряда (секунды)
pub const PROJECTILE_LIFESPAN: f32 = 5.0;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub shooter: Entity,
    /// Категория стрелка: свои не получают урон
    pub shooter_layer: u32,
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub max_range: f32,
    pub traveled: f32,
    pub lifetime: f32,
}

impl Projectile {
    pub fn new(shooter: Entity, shooter_layer: u32, direction: Vec3, speed: f32, damage: f32, max_range: f32) -> Self {
        Self {
            shooter,
            shooter_layer,
            direction: direction.normalize_or_zero(),
            speed,
            damage,
            max_range,
            traveled: 0.0,
            lifetime: PROJECTILE_LIFESPAN,
        }
    }

    /// Дальность или lifespan исчерпаны
    pub fn is_expired(&self) -> bool {
        self.traveled >= self.max_range || self.lifetime <= 0.0
    }
}
