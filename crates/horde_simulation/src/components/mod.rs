//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: Health ledger, Player/Enemy маркеры
//! - movement: NavAgent (movement capability)
//! - world: collision категории и коллайдеры
//! - animation: visual intent флаги + длительности клипов

pub mod actor;
pub mod animation;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
pub use movement::*;
pub use world::*;
