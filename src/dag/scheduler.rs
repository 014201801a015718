// src/dag/scheduler.rs

use tracing::debug;

use crate::dag::graph::Graph;
use crate::dag::scheduler_step::{RoundStatus, SchedulerStep};
use crate::dag::state_manager::StateManager;
use crate::dag::task_info::{SimulationState, Snapshot, TaskState};

/// Scheduler holds the immutable graph plus the mutable simulation state.
///
/// It is responsible for:
/// - starting every round with all tasks waiting
/// - applying one tick per [`step`](Scheduler::step)
/// - deciding whether the round is still in progress, completed or stalled
#[derive(Debug)]
pub struct Scheduler {
    graph: Graph,
    state: SimulationState,
    /// Monotonically increasing round number, starting at 1.
    round: u64,
    /// Ticks taken in the current round.
    tick: u64,
}

impl Scheduler {
    pub fn new(graph: Graph) -> Self {
        let state = SimulationState::all_waiting(graph.universe().iter().cloned());
        debug!(tasks = state.len(), "scheduler: created with all tasks waiting");
        Self {
            graph,
            state,
            round: 1,
            tick: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// State of `task`, or `None` if it is not simulated.
    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        self.state.state_of(task)
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Owned copy of the current state for a renderer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            round: self.round,
            tick: self.tick,
            state: self.state.clone(),
        }
    }

    /// Put every task back to waiting and begin the next round.
    pub fn start_new_round(&mut self) {
        self.round += 1;
        self.tick = 0;
        self.state = SimulationState::all_waiting(self.graph.universe().iter().cloned());
        debug!(round = self.round, "scheduler: starting new round");
    }

    /// Apply one tick and classify the result.
    ///
    /// A tick that changes nothing ends the round: `Completed` if every task
    /// has succeeded, `Stalled` otherwise. Stepping a stalled scheduler again
    /// reports `Stalled` again without changing anything.
    pub fn step(&mut self) -> SchedulerStep {
        self.tick += 1;

        let report = StateManager::new(self.graph.index(), &mut self.state).advance();

        let status = if report.changed() {
            RoundStatus::InProgress
        } else if self.state.is_finished() {
            debug!(round = self.round, ticks = self.tick, "scheduler: every task succeeded");
            RoundStatus::Completed
        } else {
            debug!(
                round = self.round,
                waiting = ?self.state.waiting(),
                running = ?self.state.running(),
                "scheduler: no progress possible"
            );
            RoundStatus::Stalled
        };

        debug!(
            round = self.round,
            tick = self.tick,
            completed = ?report.completed,
            promoted = ?report.promoted,
            ?status,
            "scheduler: tick applied"
        );

        SchedulerStep {
            round: self.round,
            tick: self.tick,
            report,
            status,
        }
    }
}
