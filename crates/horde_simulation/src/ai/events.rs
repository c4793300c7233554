//! AI Events — что враг сообщает наружу
//!
//! EnemyDied → PopulationController (live count), MissionTracker (kills).
//! LootDropped → spawn pickup (внешний collaborator).

use bevy::prelude::*;

use super::loot::LootKind;

/// Враг умер (ровно один раз на врага)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyDied {
    pub entity: Entity,
    pub position: Vec3,
}

/// Лут выпал из трупа после death анимации
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LootDropped {
    pub kind: LootKind,
    pub position: Vec3,
}
