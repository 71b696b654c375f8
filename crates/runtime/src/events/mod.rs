//! Topic-based event routing for combat sessions.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{CombatEvent, PhaseEvent};
