//! Collision категории и коллайдеры
//!
//! Layer = "кто я", mask = "кого ищу". Bit layout:
//! - Layer 1: Player
//! - Layer 2: Enemies
//! - Layer 3: Projectiles
//! - Layer 4: Ground (используется GroundQuery)

use bevy::prelude::*;

/// Collision категория entity
///
/// Снимается с врага при смерти, после чего ни melee, ни projectiles его не видят.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(1 << 0);
    pub const ENEMY: Self = Self(1 << 1);
    pub const PROJECTILE: Self = Self(1 << 2);
    pub const GROUND: Self = Self(1 << 3);

    /// Попадает ли категория под mask
    pub fn matches(self, mask: u32) -> bool {
        self.0 & mask != 0
    }
}

/// Сферический коллайдер (hurtbox) для overlap/projectile тестов
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub radius: f32,
}

impl Default for Collider {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_matching() {
        let mask = CollisionLayer::PLAYER.0 | CollisionLayer::ENEMY.0;

        assert!(CollisionLayer::PLAYER.matches(mask));
        assert!(CollisionLayer::ENEMY.matches(mask));
        assert!(!CollisionLayer::PROJECTILE.matches(mask));
        assert!(!CollisionLayer::NONE.matches(u32::MAX));
    }
}
