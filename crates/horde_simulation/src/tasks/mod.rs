//! TaskScheduler — отменяемые one-shot таймеры
//!
//! Все точки ожидания врага (attack wind-up, attack reset, patrol hold,
//! death visual, despawn) — записи в одном resource с ключом `(owner, kind)`.
//!
//! Правила:
//! - повторный `schedule` с тем же ключом заменяет pending запись
//! - `cancel_all(owner)` убирает и pending, и уже сработавшие в этом тике записи
//! - сработавшие записи забирают системы-потребители через `take_fired(kind)`

use bevy::prelude::*;

/// Погрешность сравнения времени (накопление f32 за тысячи тиков)
const TIME_EPSILON: f32 = 1e-4;

/// Тип отложенной задачи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum TaskKind {
    /// Конец wind-up атаки → strike / выстрел
    AttackWindUp,
    /// Конец cooldown атаки → chain или выход из Attack
    AttackReset,
    /// Конец ожидания на patrol точке
    PatrolHold,
    /// Конец death анимации → loot roll
    DeathVisual,
    /// Удаление трупа
    Despawn,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTask {
    pub owner: Entity,
    pub kind: TaskKind,
    pub fire_at: f32,
}

/// Единый планировщик задач симуляции
#[derive(Resource, Debug, Default)]
pub struct TaskScheduler {
    now: f32,
    pending: Vec<ScheduledTask>,
    fired: Vec<ScheduledTask>,
}

impl TaskScheduler {
    /// Время симуляции (секунды с начала)
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Запланировать задачу через `delay` секунд (заменяет pending с тем же ключом)
    pub fn schedule(&mut self, owner: Entity, kind: TaskKind, delay: f32) {
        self.cancel(owner, kind);
        self.pending.push(ScheduledTask {
            owner,
            kind,
            fire_at: self.now + delay.max(0.0),
        });
    }

    /// Отменить задачу; true если что-то было отменено
    pub fn cancel(&mut self, owner: Entity, kind: TaskKind) -> bool {
        let before = self.pending.len() + self.fired.len();
        self.pending.retain(|t| !(t.owner == owner && t.kind == kind));
        self.fired.retain(|t| !(t.owner == owner && t.kind == kind));
        before != self.pending.len() + self.fired.len()
    }

    /// Отменить все задачи владельца (смерть, clear)
    pub fn cancel_all(&mut self, owner: Entity) -> usize {
        let before = self.pending.len() + self.fired.len();
        self.pending.retain(|t| t.owner != owner);
        self.fired.retain(|t| t.owner != owner);
        before - (self.pending.len() + self.fired.len())
    }

    pub fn is_pending(&self, owner: Entity, kind: TaskKind) -> bool {
        self.pending.iter().any(|t| t.owner == owner && t.kind == kind)
    }

    /// Сколько секунд осталось до срабатывания
    pub fn remaining(&self, owner: Entity, kind: TaskKind) -> Option<f32> {
        self.pending
            .iter()
            .find(|t| t.owner == owner && t.kind == kind)
            .map(|t| (t.fire_at - self.now).max(0.0))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Продвинуть время; созревшие задачи переходят в fired
    ///
    /// Несъеденные за прошлый тик fired записи выбрасываются.
    pub fn advance(&mut self, delta: f32) {
        self.now += delta.max(0.0);
        self.fired.clear();

        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|t| t.fire_at <= now + TIME_EPSILON);
        self.pending = pending;

        // Порядок срабатывания: по времени, при равенстве — по порядку постановки
        let mut due = due;
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at));
        self.fired = due;
    }

    /// Забрать сработавшие задачи данного типа
    pub fn take_fired(&mut self, kind: TaskKind) -> Vec<Entity> {
        let mut taken = Vec::new();
        self.fired.retain(|t| {
            if t.kind == kind {
                taken.push(t.owner);
                false
            } else {
                true
            }
        });
        taken
    }
}

/// Система: продвинуть TaskScheduler на fixed delta
pub fn advance_task_scheduler(time: Res<Time<Fixed>>, mut scheduler: ResMut<TaskScheduler>) {
    scheduler.advance(time.delta_secs());
}
