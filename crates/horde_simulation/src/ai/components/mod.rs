//! AI components

pub mod agent;
pub mod fsm;


// Re-export all components
pub use agent::*;
pub use fsm::*;
