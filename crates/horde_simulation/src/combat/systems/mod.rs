//! Combat systems: wind-up резолв и полёт снарядов

pub mod attack;
pub mod projectile;

#[cfg(test)]
mod projectile_tests;

// Re-export all systems
pub use attack::*;
pub use projectile::*;
