// src/dag/state_manager.rs

//! The two-phase tick over a [`SimulationState`].

use tracing::debug;

use crate::dag::index::DependencyIndex;
use crate::dag::scheduler_step::TickReport;
use crate::dag::task_info::SimulationState;

/// Applies one tick's transitions to a borrowed state.
pub struct StateManager<'a> {
    index: &'a DependencyIndex,
    state: &'a mut SimulationState,
}

impl<'a> StateManager<'a> {
    pub fn new(index: &'a DependencyIndex, state: &'a mut SimulationState) -> Self {
        Self { index, state }
    }

    /// Completion then promotion. Promotion sees the tasks completed in the
    /// same tick, so a dependent can start the tick its prerequisite ends.
    pub fn advance(&mut self) -> TickReport {
        let completed = self.complete_running();
        let promoted = self.promote_ready();
        TickReport {
            completed,
            promoted,
        }
    }

    /// Phase 1: every running task succeeds, unconditionally.
    pub fn complete_running(&mut self) -> Vec<String> {
        let completed: Vec<String> = std::mem::take(&mut self.state.running)
            .into_iter()
            .collect();

        for task in &completed {
            debug!(task = %task, "running -> succeeded");
            self.state.succeeded.insert(task.clone());
        }

        completed
    }

    /// Phase 2: every waiting task whose conditions hold starts running.
    pub fn promote_ready(&mut self) -> Vec<String> {
        // Decide first, then mutate, so every task sees the same
        // succeeded set.
        let ready: Vec<String> = self
            .state
            .waiting
            .iter()
            .filter(|task| self.index.is_satisfied(task, &self.state.succeeded))
            .cloned()
            .collect();

        for task in &ready {
            debug!(task = %task, "waiting -> running");
            self.state.waiting.remove(task);
            self.state.running.insert(task.clone());
        }

        ready
    }
}

/// Pure tick: state in, next state and report out.
pub fn tick(state: &SimulationState, index: &DependencyIndex) -> (SimulationState, TickReport) {
    let mut next = state.clone();
    let report = StateManager::new(index, &mut next).advance();
    (next, report)
}
