//! PopulationController — ограниченная популяция врагов вокруг игрока
//!
//! Инвариант: live_count ≤ target_max. Каждый live враг зарегистрирован
//! через `register`, снимается через `unregister` (идемпотентно).

use bevy::prelude::*;
use rand::Rng;
use std::collections::BTreeSet;

use crate::config::PopulationConfig;
use crate::spatial::RejectionSampler;

/// Melee враги бьют сильнее
pub const MELEE_DAMAGE_MULTIPLIER: f32 = 2.0;
/// ...и толще
pub const MELEE_HEALTH_MULTIPLIER: f32 = 1.5;

/// Статы новых врагов (от сложности)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct EnemyStats {
    pub damage: f32,
    pub max_health: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            damage: 20.0,
            max_health: 100.0,
        }
    }
}

impl EnemyStats {
    /// Итоговые статы с учётом melee множителей
    pub fn for_strategy(&self, is_melee: bool) -> Self {
        if is_melee {
            Self {
                damage: self.damage * MELEE_DAMAGE_MULTIPLIER,
                max_health: self.max_health * MELEE_HEALTH_MULTIPLIER,
            }
        } else {
            *self
        }
    }
}

/// Состояние steady-state спавна
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnCycle {
    /// Спавн не запущен
    Idle,
    /// Стартовая задержка или backoff на полной ёмкости; по истечении — новое решение
    Delay { remaining: f32 },
    /// Ждём интервал перед следующей группой
    Interval { remaining: f32 },
    /// Интервал истёк, группа спавнится в этом тике
    Due,
}

#[derive(Resource, Debug, Clone)]
pub struct PopulationController {
    live: BTreeSet<Entity>,
    pub target_max: usize,
    pub spawn_interval_range: (f32, f32),
    pub group_size_max: usize,
    pub min_spawn_distance: f32,
    pub spawn_range: f32,
    pub spawn_start_delay: f32,
    pub capacity_backoff: f32,
    pub group_jitter: f32,
    pub sampler: RejectionSampler,
    stats: EnemyStats,
    cycle: SpawnCycle,
}

impl Default for PopulationController {
    fn default() -> Self {
        Self::from_config(&PopulationConfig::default(), EnemyStats::default())
    }
}

impl PopulationController {
    pub fn from_config(config: &PopulationConfig, stats: EnemyStats) -> Self {
        Self {
            live: BTreeSet::new(),
            target_max: config.target_max,
            spawn_interval_range: config.spawn_interval,
            group_size_max: config.group_size_max.max(1),
            min_spawn_distance: config.min_spawn_distance,
            spawn_range: config.spawn_range,
            spawn_start_delay: config.spawn_start_delay,
            capacity_backoff: config.capacity_backoff,
            group_jitter: config.group_jitter,
            sampler: config.sampler,
            stats,
            cycle: SpawnCycle::Idle,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    pub fn free_capacity(&self) -> usize {
        self.target_max.saturating_sub(self.live.len())
    }

    pub fn stats(&self) -> EnemyStats {
        self.stats
    }

    /// Новые статы действуют только на будущих врагов
    pub fn set_stats(&mut self, stats: EnemyStats) {
        self.stats = stats;
    }

    /// false если ёмкость исчерпана или entity уже учтён
    pub fn register(&mut self, entity: Entity) -> bool {
        if self.free_capacity() == 0 {
            return false;
        }
        self.live.insert(entity)
    }

    /// Идемпотентно: повторная смерть того же врага ничего не меняет
    pub fn unregister(&mut self, entity: Entity) -> bool {
        self.live.remove(&entity)
    }

    /// Забыть всех (clear)
    pub fn forget_all(&mut self) {
        self.live.clear();
    }

    pub fn cycle(&self) -> SpawnCycle {
        self.cycle
    }

    pub fn is_spawning(&self) -> bool {
        self.cycle != SpawnCycle::Idle
    }

    /// Запустить steady-state спавн (повторный вызов не перезапускает таймер)
    pub fn start_spawning(&mut self) {
        if self.cycle == SpawnCycle::Idle {
            self.cycle = SpawnCycle::Delay {
                remaining: self.spawn_start_delay,
            };
        }
    }

    pub fn stop_spawning(&mut self) {
        self.cycle = SpawnCycle::Idle;
    }

    /// Продвинуть цикл; true — пора спавнить группу
    pub fn tick_cycle<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> bool {
        match self.cycle {
            SpawnCycle::Idle | SpawnCycle::Due => false,
            SpawnCycle::Delay { remaining } => {
                let remaining = remaining - delta;
                self.cycle = if remaining <= 0.0 {
                    self.next_wait(rng)
                } else {
                    SpawnCycle::Delay { remaining }
                };
                false
            }
            SpawnCycle::Interval { remaining } => {
                let remaining = remaining - delta;
                if remaining <= 0.0 {
                    self.cycle = SpawnCycle::Due;
                    true
                } else {
                    self.cycle = SpawnCycle::Interval { remaining };
                    false
                }
            }
        }
    }

    /// После спавна группы: следующий интервал или backoff
    pub fn schedule_next<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.cycle != SpawnCycle::Idle {
            self.cycle = self.next_wait(rng);
        }
    }

    /// Размер следующей группы: 1..=group_size_max, не больше свободной ёмкости
    pub fn roll_group_size<R: Rng + ?Sized>(&self, rng: &mut R, limit: usize) -> usize {
        rng.gen_range(1..=self.group_size_max).min(limit)
    }

    fn next_wait<R: Rng + ?Sized>(&self, rng: &mut R) -> SpawnCycle {
        if self.live.len() < self.target_max {
            let (min, max) = self.spawn_interval_range;
            SpawnCycle::Interval {
                remaining: rng.gen_range(min..=max.max(min)),
            }
        } else {
            SpawnCycle::Delay {
                remaining: self.capacity_backoff,
            }
        }
    }
}
