// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use crate::dag::TaskId;

/// What a single tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tasks moved `running` → `succeeded` in the completion phase.
    pub completed: Vec<TaskId>,
    /// Tasks moved `waiting` → `running` in the promotion phase.
    pub promoted: Vec<TaskId>,
}

impl TickReport {
    /// Whether any task changed state.
    pub fn changed(&self) -> bool {
        !self.completed.is_empty() || !self.promoted.is_empty()
    }
}

/// Where the current round stands after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// The tick changed something; keep ticking.
    InProgress,
    /// Nothing changed and every task has succeeded.
    Completed,
    /// Nothing changed but some tasks are still waiting or running.
    Stalled,
}

/// Structured result of a single scheduler "step".
///
/// This is useful for tests that want to manually step the simulation and
/// make assertions about what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerStep {
    /// Round the tick belonged to.
    pub round: u64,
    /// Tick number within the round, starting at 1.
    pub tick: u64,
    pub report: TickReport,
    pub status: RoundStatus,
}
