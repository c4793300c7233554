//! FSM decision system + действия состояний
//!
//! Каждый тик: perception → evaluate → действие текущего состояния.
//! Враг с неактивной навигацией пропускает тик целиком (retry в следующем).

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::ai::components::{AIState, EnemyAgent, EnemyAgentItem};
use crate::ai::decision::{evaluate, Perception};
use crate::components::{Enemy, Player};
use crate::spatial::{Ground, RejectionSampler};
use crate::tasks::{TaskKind, TaskScheduler};
use crate::DeterministicRng;

/// Глубина проверки земли под patrol точкой
const WALK_POINT_GROUND_CHECK: f32 = 2.0;
/// Patrol точка достигнута
const ARRIVAL_DISTANCE: f32 = 1.0;
/// Насколько отходим от игрока за одно решение
const RETREAT_DISTANCE: f32 = 5.0;

/// Поиск patrol точки: один bounded прогон за тик
const PATROL_SAMPLER: RejectionSampler = RejectionSampler {
    attempts_per_round: 8,
    rounds: 2,
    relax_factor: 0.5,
};

/// System: решение FSM для каждого живого врага
pub fn enemy_decision(
    time: Res<Time<Fixed>>,
    ground: Res<Ground>,
    mut scheduler: ResMut<TaskScheduler>,
    mut rng: ResMut<DeterministicRng>,
    players: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemies: Query<EnemyAgent, With<Enemy>>,
) {
    let delta = time.delta_secs();
    let player_position = players.single().ok().map(|t| t.translation);

    for mut agent in enemies.iter_mut() {
        if *agent.state == AIState::Dead || agent.memory.death_handled {
            continue;
        }
        if !agent.nav.is_active() {
            continue;
        }

        let perception = match player_position {
            Some(target) => Perception::new(agent.transform.translation, agent.transform.forward().as_vec3(), target),
            None => Perception::nothing(),
        };
        let decision = evaluate(
            agent.config,
            &perception,
            agent.memory.is_attacking,
            agent.memory.time_in_attack_range,
            delta,
        );
        agent.memory.time_in_attack_range = decision.time_in_attack_range;

        if decision.state != *agent.state {
            crate::logger::log(&format!(
                "AI: {:?} {:?} → {:?} (distance {:.1})",
                agent.entity, *agent.state, decision.state, perception.distance
            ));
            *agent.state = decision.state;
        }

        if decision.state != AIState::Patrol && agent.memory.is_waiting {
            abort_patrol_hold(&mut agent, &mut scheduler);
        }

        match (decision.state, player_position) {
            (AIState::Patrol, _) => patrol(&mut agent, &mut scheduler, &ground, &mut rng),
            (AIState::Chase, Some(target)) => chase(&mut agent, target, scheduler.now(), &mut rng),
            (AIState::Attack, Some(target)) => trigger_attack(&mut agent, target, &mut scheduler),
            (AIState::Retreat, Some(target)) => retreat(&mut agent, target),
            _ => {}
        }
    }
}

/// Запуск атаки: no-op если удар уже в процессе
///
/// Разворот к игроку (только yaw), стоп навигации, wind-up стратегии,
/// reset таймер на max(time_between_attacks, wind_up).
pub(crate) fn trigger_attack(agent: &mut EnemyAgentItem, target: Vec3, scheduler: &mut TaskScheduler) {
    if agent.memory.already_attacked {
        return;
    }

    face_towards(&mut agent.transform, target);
    agent.nav.stop();
    agent.strategy.attack(agent.entity, scheduler);

    agent.memory.already_attacked = true;
    agent.memory.is_attacking = true;
    agent.animation.attacking = true;

    let reset_after = agent.config.time_between_attacks.max(agent.strategy.wind_up());
    scheduler.schedule(agent.entity, TaskKind::AttackReset, reset_after);
}

fn patrol(agent: &mut EnemyAgentItem, scheduler: &mut TaskScheduler, ground: &Ground, rng: &mut DeterministicRng) {
    if agent.memory.is_attacking || agent.memory.is_waiting {
        return;
    }

    let position = agent.transform.translation;
    let Some(walk_point) = agent.memory.walk_point else {
        // Не нашли — ждём следующий тик
        if let Some(point) = search_walk_point(position, agent.config.patrol_area_range, ground, rng) {
            agent.memory.walk_point = Some(point);
            agent.nav.resume();
            agent.nav.set_destination(point);
        }
        return;
    };

    agent.nav.resume();
    agent.nav.set_destination(walk_point);

    if position.distance(walk_point) < ARRIVAL_DISTANCE {
        agent.memory.is_waiting = true;
        agent.nav.stop();
        scheduler.schedule(agent.entity, TaskKind::PatrolHold, agent.config.wait_time_at_point);
    }
}

/// Точка в диске `range` вокруг врага, под которой есть земля
fn search_walk_point(position: Vec3, range: f32, ground: &Ground, rng: &mut DeterministicRng) -> Option<Vec3> {
    PATROL_SAMPLER.sample(range, 0.0, |bounds| {
        let radius = bounds.radius * rng.rng.gen::<f32>().sqrt();
        let angle = rng.rng.gen::<f32>() * TAU;
        let candidate = position + Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
        ground.raycast_down(candidate, WALK_POINT_GROUND_CHECK)
    })
}

fn abort_patrol_hold(agent: &mut EnemyAgentItem, scheduler: &mut TaskScheduler) {
    scheduler.cancel(agent.entity, TaskKind::PatrolHold);
    agent.memory.is_waiting = false;
    agent.memory.walk_point = None;
    agent.nav.resume();
}

/// Melee — прямо к игроку; ranged — к игроку + offset, обновляемый раз в offset_refresh_rate
fn chase(agent: &mut EnemyAgentItem, target: Vec3, now: f32, rng: &mut DeterministicRng) {
    if agent.memory.is_attacking {
        return;
    }

    agent.nav.resume();

    if agent.config.is_melee {
        agent.nav.set_destination(target);
        return;
    }

    let refresh = agent
        .memory
        .last_offset_time
        .map_or(true, |last| now - last >= agent.config.offset_refresh_rate);
    if refresh {
        let range = agent.config.random_offset_range.abs();
        agent.memory.chase_offset = Vec3::new(
            rng.rng.gen_range(-range..=range),
            0.0,
            rng.rng.gen_range(-range..=range),
        );
        agent.memory.last_offset_time = Some(now);
    }

    agent.nav.set_destination(target + agent.memory.chase_offset);
}

fn retreat(agent: &mut EnemyAgentItem, target: Vec3) {
    if agent.memory.is_attacking {
        return;
    }

    let position = agent.transform.translation;
    let away = (position - target).normalize_or_zero();
    agent.nav.resume();
    agent.nav.set_destination(position + away * RETREAT_DISTANCE);
}

fn face_towards(transform: &mut Transform, target: Vec3) {
    let level_target = Vec3::new(target.x, transform.translation.y, target.z);
    if level_target.distance_squared(transform.translation) > 1e-6 {
        transform.look_at(level_target, Vec3::Y);
    }
}
