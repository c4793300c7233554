//! Mission layer: сложность + цель текущего забега
//!
//! Потребитель EnemyDied (kills) и EntityDied игрока (поражение).
//! Begin пушит статы сложности в PopulationController.
//! Reset — retry: spawner остановлен, враги убраны (со следующего тика),
//! игрок восстановлен, миссия снова Running. Новую волну сеет вызывающий.

use bevy::prelude::*;

use crate::ai::EnemyDied;
use crate::combat::{DamageEvents, EntityDied};
use crate::components::{Health, Player};
use crate::population::{PopulationController, PopulationRequest};
use crate::SimulationSet;

pub mod difficulty;
pub mod tracker;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use tracker::{MissionKind, MissionOutcome, MissionStatus, MissionTracker};

/// Команды миссии
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum MissionRequest {
    Begin { kind: MissionKind, difficulty: Difficulty },
    /// Retry: та же миссия с нуля, популяция очищена, игрок восстановлен
    Reset,
}

/// Игрок подобрал ключевой предмет (FindItem)
#[derive(Event, Debug, Clone, Copy)]
pub struct ItemCollected;

/// Миссия закончилась (один раз на begin)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MissionEnded {
    pub outcome: MissionOutcome,
    pub kills: u32,
    pub play_time: f32,
    pub experience: u32,
}

pub struct MissionPlugin;

impl Plugin for MissionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MissionTracker>()
            .add_event::<MissionRequest>()
            .add_event::<ItemCollected>()
            .add_event::<MissionEnded>()
            .add_systems(
                FixedUpdate,
                (handle_mission_requests, track_mission_progress)
                    .chain()
                    .in_set(SimulationSet::Mission),
            );
    }
}

/// System: Begin / Reset
pub fn handle_mission_requests(
    mut requests: EventReader<MissionRequest>,
    mut tracker: ResMut<MissionTracker>,
    mut population: ResMut<PopulationController>,
    mut population_requests: EventWriter<PopulationRequest>,
    mut health_events: DamageEvents,
    mut players: Query<(Entity, &mut Health), With<Player>>,
) {
    for request in requests.read() {
        match *request {
            MissionRequest::Begin { kind, difficulty } => {
                tracker.begin(kind, difficulty);
                population.set_stats(difficulty.profile().enemy_stats());
                crate::logger::log_info(&format!("🎯 Mission {:?} started on {:?}", kind, difficulty));
            }
            MissionRequest::Reset => {
                tracker.reset();
                population_requests.write(PopulationRequest::StopSpawning);
                population_requests.write(PopulationRequest::Clear);
                for (entity, mut health) in players.iter_mut() {
                    health_events.restore(entity, &mut health);
                }
                crate::logger::log_info(&format!("🔄 Mission reset: {:?} on {:?}", tracker.kind, tracker.difficulty));
            }
        }
    }
}

/// System: прогресс миссии
///
/// Смерть игрока проверяется первой: kill, совпавший с ней по тику, уже не засчитывает победу.
pub fn track_mission_progress(
    time: Res<Time<Fixed>>,
    mut tracker: ResMut<MissionTracker>,
    mut entity_deaths: EventReader<EntityDied>,
    mut enemy_deaths: EventReader<EnemyDied>,
    mut items: EventReader<ItemCollected>,
    mut ended: EventWriter<MissionEnded>,
    players: Query<(), With<Player>>,
) {
    let mut outcomes = Vec::new();

    for death in entity_deaths.read() {
        if players.contains(death.entity) {
            outcomes.extend(tracker.player_died());
        }
    }
    for _ in enemy_deaths.read() {
        outcomes.extend(tracker.record_kill());
    }
    for _ in items.read() {
        outcomes.extend(tracker.item_collected());
    }
    outcomes.extend(tracker.tick(time.delta_secs()));

    for outcome in outcomes {
        let experience = tracker.experience_reward();
        ended.write(MissionEnded {
            outcome,
            kills: tracker.kills,
            play_time: tracker.play_time,
            experience,
        });
        crate::logger::log_info(&format!(
            "🏁 Mission {:?}: kills={}, time={:.1}s, xp={}",
            outcome, tracker.kills, tracker.play_time, experience
        ));
    }
}
