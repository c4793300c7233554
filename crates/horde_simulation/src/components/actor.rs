//! Базовые компоненты акторов: Health, Player, Enemy

use bevy::prelude::*;

/// Игрок — единственная цель всех врагов
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Враг, созданный PopulationController
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    /// Имя archetype из конфига (для логов)
    pub archetype: String,
}

/// Результат одной мутации Health
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    pub previous: f32,
    pub current: f32,
    /// true ровно один раз — при первом переходе current ≤ 0
    pub died: bool,
}

/// Здоровье актора (игрок и враги)
///
/// Инвариант: 0 ≤ current ≤ max, clamp на каждой мутации.
/// Смерть — latch: после первого перехода в 0 повторный урон не даёт `died`,
/// пока не вызван `reset()`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Death latch уже сработал
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn take_damage(&mut self, amount: f32) -> HealthChange {
        let previous = self.current;
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);

        let died = self.current <= 0.0 && !self.dead;
        if died {
            self.dead = true;
        }

        HealthChange {
            previous,
            current: self.current,
            died,
        }
    }

    pub fn heal(&mut self, amount: f32) -> HealthChange {
        let previous = self.current;
        self.current = (self.current + amount.max(0.0)).clamp(0.0, self.max);

        HealthChange {
            previous,
            current: self.current,
            died: false,
        }
    }

    /// Новый максимум + полное восстановление (stat scaling при спавне)
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.max;
    }

    /// Полный рестарт (retry миссии): current = max, latch сброшен
    pub fn reset(&mut self) {
        self.current = self.max;
        self.dead = false;
    }
}
