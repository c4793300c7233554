//! FSM AI components (state, config, per-enemy memory).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Состояния врага
///
/// Patrol → Chase → Attack → (Attack | Chase | Patrol), * → Retreat (только ranged),
/// * → Dead (терминальное, вытесняет всё остальное).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Бродим по случайным точкам вокруг себя
    #[default]
    Patrol,
    /// Игрок в sight range — идём к нему
    Chase,
    /// Игрок в attack range — бьём / стреляем
    Attack,
    /// Игрок слишком близко (ranged) — отходим
    Retreat,
    /// Мёртв, AI отключен
    Dead,
}

/// Параметры AI врага (задаются archetype'ом)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    pub sight_range: f32,
    pub attack_range: f32,
    /// Ближе этого ranged враг отступает
    pub min_distance_to_player: f32,
    /// Cooldown между атаками (reset таймер = max(cooldown, wind-up))
    pub time_between_attacks: f32,
    /// Радиус выбора patrol точек вокруг врага
    pub patrol_area_range: f32,
    /// Сколько секунд в attack range без facing, прежде чем атаковать
    pub required_time_in_range: f32,
    /// Ranged chase: разброс точки вокруг игрока
    pub random_offset_range: f32,
    /// Ranged chase: как часто обновлять offset (сек)
    pub offset_refresh_rate: f32,
    /// Ожидание на patrol точке (сек)
    pub wait_time_at_point: f32,
    pub is_melee: bool,
    /// Шанс дропа лута
    pub drop_chance: f32,
    /// Доля health pack среди дропов (остальное — ammo)
    pub health_drop_chance: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            sight_range: 15.0,
            attack_range: 2.0,
            min_distance_to_player: 2.0,
            time_between_attacks: 1.0,
            patrol_area_range: 20.0,
            required_time_in_range: 1.0,
            random_offset_range: 3.0,
            offset_refresh_rate: 1.0,
            wait_time_at_point: 10.0,
            is_melee: true,
            drop_chance: 0.1,
            health_drop_chance: 0.4,
        }
    }
}

/// Рабочая память врага между тиками
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct EnemyMemory {
    /// Накопленное время в attack range без facing
    pub time_in_attack_range: f32,
    /// Текущая patrol точка
    pub walk_point: Option<Vec3>,
    /// Стоим на patrol точке (PatrolHold pending)
    pub is_waiting: bool,
    /// Атака в процессе (от trigger до reset)
    pub is_attacking: bool,
    /// Удар уже запущен в этом цикле
    pub already_attacked: bool,
    /// Ranged chase offset вокруг игрока
    pub chase_offset: Vec3,
    pub last_offset_time: Option<f32>,
    /// Death handling уже выполнен
    pub death_handled: bool,
}
