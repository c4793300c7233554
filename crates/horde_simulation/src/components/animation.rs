//! Animation intent: симуляция пишет флаги, визуальный слой их читает

use bevy::prelude::*;

/// Флаги для animator'а
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AnimationIntent {
    pub walking: bool,
    pub attacking: bool,
    pub dead: bool,
}

/// Длительности клипов (секунды), задаются archetype'ом
///
/// attack → wind-up (`attack - offset`), death → задержка loot roll.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AnimationClips {
    pub attack_length: f32,
    pub death_length: f32,
}

impl Default for AnimationClips {
    fn default() -> Self {
        Self {
            attack_length: 2.0,
            death_length: 1.5,
        }
    }
}
