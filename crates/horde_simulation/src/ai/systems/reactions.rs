//! Reactions: смерть врага и сработавшие таймеры FSM
//!
//! Порядок внутри SimulationSet::Reactions:
//! 1. handle_enemy_death — EntityDied → Dead (раньше решения FSM в том же тике)
//! 2. finish_attack_resets — chain атаки или выход из Attack
//! 3. finish_patrol_holds — ожидание на точке закончено
//! 4. finish_death_visuals — loot roll, таймер удаления
//! 5. despawn_corpses — удаление трупов

use bevy::prelude::*;

use crate::ai::components::{AIConfig, AIState, EnemyAgent};
use crate::ai::events::{EnemyDied, LootDropped};
use crate::ai::loot::LootTable;
use crate::ai::systems::fsm::trigger_attack;
use crate::combat::EntityDied;
use crate::components::{CollisionLayer, Enemy, Player};
use crate::tasks::{TaskKind, TaskScheduler};
use crate::DeterministicRng;

/// Труп остаётся в мире после death анимации (сек)
pub const CORPSE_LIFETIME: f32 = 10.0;

/// System: переход врага в Dead по EntityDied
///
/// Идемпотентно (memory.death_handled): отмена всех задач, отключение
/// навигации и коллизий, dead visual, EnemyDied, таймер death анимации.
pub fn handle_enemy_death(
    mut commands: Commands,
    mut deaths: EventReader<EntityDied>,
    mut enemy_died: EventWriter<EnemyDied>,
    mut scheduler: ResMut<TaskScheduler>,
    mut enemies: Query<EnemyAgent, With<Enemy>>,
) {
    for event in deaths.read() {
        let Ok(mut agent) = enemies.get_mut(event.entity) else {
            continue;
        };
        if agent.memory.death_handled {
            continue;
        }

        agent.memory.death_handled = true;
        agent.memory.is_attacking = false;
        agent.memory.already_attacked = false;
        agent.memory.is_waiting = false;
        *agent.state = AIState::Dead;

        scheduler.cancel_all(agent.entity);
        agent.nav.disable();

        agent.animation.walking = false;
        agent.animation.attacking = false;
        agent.animation.dead = true;

        if let Ok(mut entity_commands) = commands.get_entity(agent.entity) {
            entity_commands.remove::<CollisionLayer>();
        }

        let position = agent.transform.translation;
        enemy_died.write(EnemyDied {
            entity: agent.entity,
            position,
        });
        scheduler.schedule(agent.entity, TaskKind::DeathVisual, agent.clips.death_length);

        crate::logger::log_info(&format!("☠️ Enemy {:?} died at {:?}", agent.entity, position));
    }
}

/// System: attack reset — повторная проверка attack range
///
/// В range → chain новой атаки; иначе выходим из Attack в Chase (в sight) или Patrol.
pub fn finish_attack_resets(
    mut scheduler: ResMut<TaskScheduler>,
    players: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemies: Query<EnemyAgent, With<Enemy>>,
) {
    let player_position = players.single().ok().map(|t| t.translation);

    for entity in scheduler.take_fired(TaskKind::AttackReset) {
        let Ok(mut agent) = enemies.get_mut(entity) else {
            continue;
        };
        if *agent.state == AIState::Dead {
            continue;
        }

        agent.memory.already_attacked = false;
        agent.animation.attacking = false;

        let distance = player_position
            .map(|target| agent.transform.translation.distance(target))
            .unwrap_or(f32::INFINITY);
        let in_sight = distance <= agent.config.sight_range;

        match player_position {
            Some(target) if in_sight && distance <= agent.config.attack_range => {
                *agent.state = AIState::Attack;
                trigger_attack(&mut agent, target, &mut scheduler);
            }
            _ => {
                agent.memory.is_attacking = false;
                agent.nav.resume();
                *agent.state = if in_sight { AIState::Chase } else { AIState::Patrol };
            }
        }
    }
}

/// System: конец ожидания на patrol точке → искать новую
pub fn finish_patrol_holds(mut scheduler: ResMut<TaskScheduler>, mut enemies: Query<EnemyAgent, With<Enemy>>) {
    for entity in scheduler.take_fired(TaskKind::PatrolHold) {
        if let Ok(mut agent) = enemies.get_mut(entity) {
            agent.memory.is_waiting = false;
            agent.memory.walk_point = None;
            agent.nav.resume();
        }
    }
}

/// System: death анимация доиграна → loot roll + таймер удаления трупа
pub fn finish_death_visuals(
    mut scheduler: ResMut<TaskScheduler>,
    mut rng: ResMut<DeterministicRng>,
    mut loot: EventWriter<LootDropped>,
    corpses: Query<(&Transform, &AIConfig), With<Enemy>>,
) {
    for entity in scheduler.take_fired(TaskKind::DeathVisual) {
        let Ok((transform, config)) = corpses.get(entity) else {
            continue;
        };

        if let Some(kind) = LootTable::from(config).roll(&mut rng.rng) {
            loot.write(LootDropped {
                kind,
                position: transform.translation,
            });
            crate::logger::log(&format!("🎁 {:?} dropped by {:?}", kind, entity));
        }

        scheduler.schedule(entity, TaskKind::Despawn, CORPSE_LIFETIME);
    }
}

/// System: удаление трупов
pub fn despawn_corpses(
    mut commands: Commands,
    mut scheduler: ResMut<TaskScheduler>,
    corpses: Query<(), With<Enemy>>,
) {
    for entity in scheduler.take_fired(TaskKind::Despawn) {
        if !corpses.contains(entity) {
            continue;
        }
        commands.entity(entity).despawn();
        crate::logger::log(&format!("🗑️ Corpse {:?} removed", entity));
    }
}
