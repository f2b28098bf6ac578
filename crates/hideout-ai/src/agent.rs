//! The hide behaviour.
//!
//! A [`HideAgent`] is either `Idle` or `Seeking`. A periodic check moves an
//! idle agent that the threat can see into `Seeking`, with a route to the
//! nearest hiding spot. Each frame the mover reports where the agent is and
//! gets the waypoint to head for; once the last waypoint is reached the
//! agent is `Idle` again. [`HideController`] wires the check to a
//! [`Scheduler`] so it runs at a fixed cadence rather than every frame.

use std::collections::VecDeque;
use std::time::Duration;

use hideout_core::{SightOracle, Vec3};
use hideout_paths::{Grid, NodeId, PathFinder};

use crate::error::HideError;
use crate::hide::HideSpotSelector;
use crate::schedule::Scheduler;

/// Tuning for the hide behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Time between visibility checks, in milliseconds.
    pub check_interval_ms: u64,
    /// Distance under which a waypoint counts as reached.
    pub arrive_epsilon: f32,
    /// Movement speed in world units per second, for movers.
    pub speed: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 500,
            arrive_epsilon: 0.001,
            speed: 1.0,
        }
    }
}

impl AgentConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    /// Standing still, either hidden or waiting for the next check.
    #[default]
    Idle,
    /// Following a route to a hiding spot.
    Seeking,
}

/// Result of a periodic hide check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Already on the way; nothing was evaluated.
    Moving,
    /// The threat cannot see the agent.
    Hidden,
    /// A route to `spot` was planned and the agent is now seeking.
    Fleeing { spot: NodeId, cost: i32 },
}

/// State machine for one hiding agent.
#[derive(Debug, Clone)]
pub struct HideAgent {
    config: AgentConfig,
    state: AgentState,
    position: Vec3,
    target: Vec3,
    waypoints: VecDeque<Vec3>,
}

impl HideAgent {
    pub fn new(position: Vec3, config: AgentConfig) -> Self {
        Self {
            config,
            state: AgentState::Idle,
            position,
            target: position,
            waypoints: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Last position reported by the mover.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Waypoint currently being approached.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Waypoints left after the current target.
    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Run one hide check against `threat`.
    ///
    /// On error the agent stays `Idle` where it is; the next check tries
    /// again.
    pub fn check<S: SightOracle>(
        &mut self,
        grid: &Grid,
        sight: &S,
        finder: &mut PathFinder,
        threat: Vec3,
    ) -> Result<CheckOutcome, HideError> {
        if self.state == AgentState::Seeking {
            return Ok(CheckOutcome::Moving);
        }

        let selector = HideSpotSelector::new(grid, sight);
        if selector.is_hidden(self.position, threat) {
            return Ok(CheckOutcome::Hidden);
        }

        let (spot, path) = selector.plan_escape(finder, threat, self.position)?;
        self.waypoints = path.waypoints(grid).into();
        self.target = self.position;
        self.state = AgentState::Seeking;
        log::debug!(
            "agent at {} seen from {}: fleeing to {} ({} steps, cost {})",
            self.position,
            threat,
            grid.node(spot).pos(),
            path.len(),
            path.cost()
        );
        Ok(CheckOutcome::Fleeing {
            spot,
            cost: path.cost(),
        })
    }

    /// Report the agent's position for this frame and get the point to move
    /// towards, or `None` when idle.
    pub fn steer(&mut self, position: Vec3) -> Option<Vec3> {
        self.position = position;
        if self.state != AgentState::Seeking {
            return None;
        }

        let arrived = position.distance(self.target) < self.config.arrive_epsilon;
        if arrived {
            match self.waypoints.pop_front() {
                Some(next) => self.target = next,
                None => {
                    self.state = AgentState::Idle;
                    log::debug!("agent reached cover at {}", position);
                    return None;
                }
            }
        }
        Some(self.target)
    }
}

/// Events the controller schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentEvent {
    HideCheck,
}

/// Drives a [`HideAgent`] from a frame loop: hide checks fire on a fixed
/// cadence, steering runs every frame.
pub struct HideController {
    agent: HideAgent,
    scheduler: Scheduler<AgentEvent>,
    finder: PathFinder,
}

impl HideController {
    /// The first check fires on the first frame.
    pub fn new(agent: HideAgent) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.every(
            AgentEvent::HideCheck,
            Duration::ZERO,
            agent.config().check_interval(),
        );
        Self {
            agent,
            scheduler,
            finder: PathFinder::new(),
        }
    }

    pub fn agent(&self) -> &HideAgent {
        &self.agent
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Advance time by `dt`, run any hide checks that fell due, and return
    /// the point the agent should move towards.
    pub fn frame<S: SightOracle>(
        &mut self,
        grid: &Grid,
        sight: &S,
        dt: Duration,
        position: Vec3,
        threat: Vec3,
    ) -> Option<Vec3> {
        self.agent.set_position(position);
        for event in self.scheduler.advance(dt) {
            match event {
                AgentEvent::HideCheck => {
                    match self.agent.check(grid, sight, &mut self.finder, threat) {
                        Ok(outcome) => log::trace!("hide check: {:?}", outcome),
                        Err(e) => log::warn!("agent at {} stays put: {}", position, e),
                    }
                }
            }
        }
        self.agent.steer(position)
    }
}
