//! MissionTracker — прогресс текущей миссии
//!
//! KillEnemies: считает EnemyDied до enemies_to_kill.
//! Survive: таймер, пока игрок жив.
//! FindItem: ждёт ItemCollected.
//! Смерть игрока → Lost. Итог фиксируется один раз.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum MissionKind {
    #[default]
    KillEnemies,
    Survive,
    FindItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum MissionStatus {
    #[default]
    Inactive,
    Running,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum MissionOutcome {
    Won,
    Lost,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct MissionTracker {
    pub kind: MissionKind,
    pub difficulty: Difficulty,
    pub status: MissionStatus,
    pub kills: u32,
    pub enemies_to_kill: u32,
    pub survive_remaining: f32,
    pub play_time: f32,
}

impl MissionTracker {
    pub fn begin(&mut self, kind: MissionKind, difficulty: Difficulty) {
        let profile = difficulty.profile();
        *self = Self {
            kind,
            difficulty,
            status: MissionStatus::Running,
            kills: 0,
            enemies_to_kill: profile.enemies_to_kill,
            survive_remaining: profile.time_to_survive,
            play_time: 0.0,
        };
    }

    /// Retry: та же миссия и сложность заново (kills, таймер, play time с нуля)
    ///
    /// Миссия, которая ни разу не начиналась, остаётся Inactive.
    pub fn reset(&mut self) {
        if self.status == MissionStatus::Inactive {
            return;
        }
        self.begin(self.kind, self.difficulty);
    }

    pub fn is_running(&self) -> bool {
        self.status == MissionStatus::Running
    }

    pub fn record_kill(&mut self) -> Option<MissionOutcome> {
        if !self.is_running() {
            return None;
        }
        self.kills += 1;
        if self.kind == MissionKind::KillEnemies && self.kills >= self.enemies_to_kill {
            return self.finish(MissionOutcome::Won);
        }
        None
    }

    pub fn tick(&mut self, delta: f32) -> Option<MissionOutcome> {
        if !self.is_running() {
            return None;
        }
        self.play_time += delta;
        if self.kind == MissionKind::Survive {
            self.survive_remaining = (self.survive_remaining - delta).max(0.0);
            if self.survive_remaining <= 0.0 {
                return self.finish(MissionOutcome::Won);
            }
        }
        None
    }

    pub fn item_collected(&mut self) -> Option<MissionOutcome> {
        if self.is_running() && self.kind == MissionKind::FindItem {
            return self.finish(MissionOutcome::Won);
        }
        None
    }

    pub fn player_died(&mut self) -> Option<MissionOutcome> {
        if self.is_running() {
            return self.finish(MissionOutcome::Lost);
        }
        None
    }

    /// XP = round((play_time · 2.5 + kills · 5) · multiplier)
    pub fn experience_reward(&self) -> u32 {
        let multiplier = self.difficulty.profile().multiplier;
        ((self.play_time * 2.5 + self.kills as f32 * 5.0) * multiplier).round() as u32
    }

    fn finish(&mut self, outcome: MissionOutcome) -> Option<MissionOutcome> {
        self.status = match outcome {
            MissionOutcome::Won => MissionStatus::Won,
            MissionOutcome::Lost => MissionStatus::Lost,
        };
        Some(outcome)
    }
}
