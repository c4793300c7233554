//! Population systems (SimulationSet::Population)
//!
//! Порядок: handle_population_requests → track_enemy_deaths → run_spawn_cycle.
//! Смерть снимает врага с учёта в том же тике, до решения spawn cycle.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::EnemyDied;
use crate::components::{Enemy, Player};
use crate::spatial::Ground;
use crate::tasks::TaskScheduler;
use crate::DeterministicRng;

use super::controller::PopulationController;
use super::factory::{spawn_enemy, EnemyRoster};
use super::placement::{jittered_member_position, sample_group_origin};
use super::PopulationRequest;

/// Стартовая волна ставится дальше: range и min distance удваиваются
const SEED_DISTANCE_MULTIPLIER: f32 = 2.0;

/// System: SeedInitial / StartSpawning / StopSpawning / Clear / SpawnAt
#[allow(clippy::too_many_arguments)]
pub fn handle_population_requests(
    mut commands: Commands,
    mut requests: EventReader<PopulationRequest>,
    mut controller: ResMut<PopulationController>,
    mut scheduler: ResMut<TaskScheduler>,
    mut rng: ResMut<DeterministicRng>,
    roster: Res<EnemyRoster>,
    ground: Res<Ground>,
    players: Query<&Transform, With<Player>>,
    enemies: Query<Entity, With<Enemy>>,
) {
    let player_position = players.single().ok().map(|t| t.translation);
    // Заспавненные в этом прогоне ещё не видны query (commands не применены)
    let mut spawned_now: Vec<Entity> = Vec::new();

    for request in requests.read() {
        match *request {
            PopulationRequest::SeedInitial { count } => {
                let Some(player) = player_position else {
                    crate::logger::log_warning("⚠️ SeedInitial ignored: no player in world");
                    continue;
                };
                spawned_now.extend(seed_initial(
                    &mut commands,
                    &mut controller,
                    &roster,
                    &ground,
                    &mut rng.rng,
                    player,
                    count,
                ));
            }
            PopulationRequest::StartSpawning => {
                controller.start_spawning();
                crate::logger::log("▶️ Spawn cycle started");
            }
            PopulationRequest::StopSpawning => {
                controller.stop_spawning();
                crate::logger::log("⏹️ Spawn cycle stopped");
            }
            PopulationRequest::Clear => {
                let mut cleared = 0;
                for entity in enemies.iter().chain(spawned_now.drain(..)) {
                    scheduler.cancel_all(entity);
                    if let Ok(mut entity_commands) = commands.get_entity(entity) {
                        entity_commands.despawn();
                    }
                    cleared += 1;
                }
                controller.forget_all();
                crate::logger::log_info(&format!("🧹 Population cleared ({} enemies)", cleared));
            }
            PopulationRequest::SpawnAt { position, archetype } => {
                if controller.free_capacity() == 0 {
                    crate::logger::log_warning(&format!(
                        "⚠️ SpawnAt {:?} rejected: population at capacity ({})",
                        position, controller.target_max
                    ));
                    continue;
                }

                let chosen = match archetype {
                    Some(index) => roster.get(index),
                    None => roster.pick(&mut rng.rng),
                };
                let Some(chosen) = chosen else {
                    crate::logger::log_warning(&format!("⚠️ SpawnAt: no archetype {:?} in roster", archetype));
                    continue;
                };

                let entity = spawn_enemy(&mut commands, chosen, controller.stats(), position);
                controller.register(entity);
                spawned_now.push(entity);
                crate::logger::log(&format!("👾 Spawned {} {:?} at {:?}", chosen.name, entity, position));
            }
        }
    }
}

/// System: враг умер → минус один live
pub fn track_enemy_deaths(mut deaths: EventReader<EnemyDied>, mut controller: ResMut<PopulationController>) {
    for event in deaths.read() {
        controller.unregister(event.entity);
    }
}

/// System: steady-state spawn cycle
///
/// Start delay → (ниже cap) интервал → группа → снова решение; на cap — backoff.
pub fn run_spawn_cycle(
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut controller: ResMut<PopulationController>,
    mut rng: ResMut<DeterministicRng>,
    roster: Res<EnemyRoster>,
    ground: Res<Ground>,
    players: Query<&Transform, With<Player>>,
) {
    let rng = &mut rng.rng;
    if !controller.tick_cycle(time.delta_secs(), rng) {
        return;
    }

    if let Ok(player) = players.single() {
        let free = controller.free_capacity();
        if free > 0 {
            let size = controller.roll_group_size(rng, free);
            let (range, min_distance) = (controller.spawn_range, controller.min_spawn_distance);
            let spawned = spawn_group(
                &mut commands,
                &mut controller,
                &roster,
                &ground,
                rng,
                player.translation,
                range,
                min_distance,
                size,
            );
            if spawned.is_empty() {
                crate::logger::log_warning("⚠️ Spawn group rejected: no valid ground near player");
            }
        }
    }

    controller.schedule_next(rng);
}

/// Стартовая волна: группы до `count` (не больше свободной ёмкости)
///
/// Неудачный sampling прекращает волну: лучше меньше врагов, чем зависание.
fn seed_initial(
    commands: &mut Commands,
    controller: &mut PopulationController,
    roster: &EnemyRoster,
    ground: &Ground,
    rng: &mut ChaCha8Rng,
    player: Vec3,
    count: usize,
) -> Vec<Entity> {
    let target = count.min(controller.free_capacity());
    if target < count {
        crate::logger::log_warning(&format!(
            "⚠️ SeedInitial clamped: requested {}, free capacity {}",
            count, target
        ));
    }

    let range = controller.spawn_range * SEED_DISTANCE_MULTIPLIER;
    let min_distance = controller.min_spawn_distance * SEED_DISTANCE_MULTIPLIER;
    let mut spawned = Vec::new();

    while spawned.len() < target {
        let size = controller.roll_group_size(rng, target - spawned.len());
        let group = spawn_group(commands, controller, roster, ground, rng, player, range, min_distance, size);
        if group.is_empty() {
            crate::logger::log_warning(&format!(
                "⚠️ SeedInitial stopped early: {}/{} placed",
                spawned.len(),
                target
            ));
            break;
        }
        spawned.extend(group);
    }

    crate::logger::log_info(&format!("🌱 Seeded {} enemies", spawned.len()));
    spawned
}

/// Одна группа вокруг общей базы; пустой Vec — база не найдена
#[allow(clippy::too_many_arguments)]
fn spawn_group(
    commands: &mut Commands,
    controller: &mut PopulationController,
    roster: &EnemyRoster,
    ground: &Ground,
    rng: &mut ChaCha8Rng,
    player: Vec3,
    range: f32,
    min_distance: f32,
    size: usize,
) -> Vec<Entity> {
    let Some(origin) = sample_group_origin(&controller.sampler, ground, player, range, min_distance, rng) else {
        return Vec::new();
    };

    let mut group = Vec::with_capacity(size);
    for _ in 0..size {
        if controller.free_capacity() == 0 {
            break;
        }
        let Some(archetype) = roster.pick(rng) else {
            break;
        };

        let position = jittered_member_position(origin, controller.group_jitter, ground, rng);
        let entity = spawn_enemy(commands, archetype, controller.stats(), position);
        controller.register(entity);
        group.push(entity);
    }

    if !group.is_empty() {
        crate::logger::log(&format!("👾 Group of {} spawned at {:?}", group.len(), origin));
    }
    group
}
