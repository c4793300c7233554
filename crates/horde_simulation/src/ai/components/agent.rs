//! EnemyAgent — всё, что FSM трогает у одного врага, одним query

use bevy::ecs::query::QueryData;
use bevy::prelude::*;

use super::fsm::{AIConfig, AIState, EnemyMemory};
use crate::combat::AttackStrategy;
use crate::components::{AnimationClips, AnimationIntent, NavAgent};

#[derive(QueryData)]
#[query_data(mutable)]
pub struct EnemyAgent {
    pub entity: Entity,
    pub transform: &'static mut Transform,
    pub state: &'static mut AIState,
    pub config: &'static AIConfig,
    pub memory: &'static mut EnemyMemory,
    pub nav: &'static mut NavAgent,
    pub strategy: &'static AttackStrategy,
    pub animation: &'static mut AnimationIntent,
    pub clips: &'static AnimationClips,
}
