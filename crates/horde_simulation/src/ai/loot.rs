//! Loot roll при смерти врага
//!
//! Два независимых броска: u1 ≤ drop_chance → дроп есть;
//! тогда u2 ≤ health_drop_chance → health pack, иначе ammo pack.

use bevy::prelude::*;
use rand::Rng;

use super::components::AIConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum LootKind {
    HealthPack,
    AmmoPack,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootTable {
    pub drop_chance: f32,
    pub health_drop_chance: f32,
}

impl From<&AIConfig> for LootTable {
    fn from(config: &AIConfig) -> Self {
        Self {
            drop_chance: config.drop_chance,
            health_drop_chance: config.health_drop_chance,
        }
    }
}

impl LootTable {
    /// Детерминированный резолв по готовым броскам
    pub fn resolve(&self, first: f32, second: f32) -> Option<LootKind> {
        if first > self.drop_chance {
            return None;
        }
        if second <= self.health_drop_chance {
            Some(LootKind::HealthPack)
        } else {
            Some(LootKind::AmmoPack)
        }
    }

    /// Второй бросок делается только если первый дал дроп
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<LootKind> {
        let first: f32 = rng.gen();
        if first > self.drop_chance {
            return None;
        }
        let second: f32 = rng.gen();
        self.resolve(first, second)
    }
}
