//! Damage pipeline: события + единая точка применения урона
//!
//! Любой источник урона (melee strike, projectile) идёт через `DamageEvents::apply`,
//! который мутирует Health атомарно и пишет HealthChanged / DamageDealt / EntityDied.
//! Лечение и рестарт идут через `heal` / `restore` того же параметра.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::components::Health;

/// Источник урона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DamageSource {
    Melee,
    Projectile,
}

/// Событие: урон нанесен
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: f32,
    pub source: DamageSource,
    pub target_died: bool,
}

/// Событие: Health изменился (UI / health bar collaborator)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: f32,
    pub max: f32,
}

/// Событие: entity умер (health ≤ 0), ровно один раз на death latch
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Writers всех damage событий одним параметром
#[derive(SystemParam)]
pub struct DamageEvents<'w> {
    dealt: EventWriter<'w, DamageDealt>,
    changed: EventWriter<'w, HealthChanged>,
    died: EventWriter<'w, EntityDied>,
}

impl DamageEvents<'_> {
    /// Применить урон к target; true если это удар, убивший target
    pub fn apply(
        &mut self,
        attacker: Option<Entity>,
        target: Entity,
        health: &mut Health,
        amount: f32,
        source: DamageSource,
    ) -> bool {
        let change = health.take_damage(amount);

        self.changed.write(HealthChanged {
            entity: target,
            current: change.current,
            max: health.max,
        });
        self.dealt.write(DamageDealt {
            attacker,
            target,
            damage: change.previous - change.current,
            source,
            target_died: change.died,
        });

        if change.died {
            self.died.write(EntityDied {
                entity: target,
                killer: attacker,
            });
            crate::logger::log_info(&format!("💀 Entity {:?} killed by {:?} ({:?})", target, attacker, source));
        }

        change.died
    }

    /// Лечение (health pack и т.п.); возвращает новое current
    pub fn heal(&mut self, target: Entity, health: &mut Health, amount: f32) -> f32 {
        let change = health.heal(amount);
        self.announce(target, health);
        change.current
    }

    /// Полный рестарт здоровья (retry миссии), death latch сброшен
    pub fn restore(&mut self, target: Entity, health: &mut Health) {
        health.reset();
        self.announce(target, health);
    }

    /// HealthChanged без мутации (начальное значение после спавна)
    pub fn announce(&mut self, target: Entity, health: &Health) {
        self.changed.write(HealthChanged {
            entity: target,
            current: health.current,
            max: health.max,
        });
    }
}

/// System: стартовое HealthChanged для каждого нового Health
///
/// Stat scaling (`set_max`) происходит до спавна entity, поэтому итог объявляем здесь.
pub fn announce_spawned_health(mut events: DamageEvents, spawned: Query<(Entity, &Health), Added<Health>>) {
    for (entity, health) in spawned.iter() {
        events.announce(entity, health);
    }
}
