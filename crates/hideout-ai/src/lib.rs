//! Agent-level behaviour on top of the navigation grid: picking a spot the
//! threat cannot see, timers for periodic re-evaluation, and the
//! Idle/Seeking hide behaviour.

pub mod agent;
pub mod error;
pub mod hide;
pub mod schedule;

pub use agent::{AgentConfig, AgentEvent, AgentState, CheckOutcome, HideAgent, HideController};
pub use error::HideError;
pub use hide::HideSpotSelector;
pub use schedule::Scheduler;
