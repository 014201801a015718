// src/dag/task_info.rs

//! Task states and the three-set simulation state.

use std::collections::BTreeSet;
use std::fmt;

use crate::dag::TaskId;

/// State of a single task within the current round.
///
/// There is no failed state; the model only represents forward progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskState {
    /// Prerequisites not yet satisfied (or not yet evaluated this round).
    Waiting,
    /// Promoted on the previous tick; will succeed on the next one.
    Running,
    /// Completed for this round.
    Succeeded,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Waiting => "waiting",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
        };
        f.write_str(s)
    }
}

/// Partition of the task universe into `waiting`, `running` and `succeeded`.
///
/// Every task of the universe is in exactly one set. Only the state machine
/// in [`state_manager`](crate::dag::state_manager) moves tasks between sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationState {
    pub(crate) waiting: BTreeSet<TaskId>,
    pub(crate) running: BTreeSet<TaskId>,
    pub(crate) succeeded: BTreeSet<TaskId>,
}

impl SimulationState {
    /// Initial partition: every task waiting.
    pub fn all_waiting<I>(universe: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TaskId>,
    {
        Self {
            waiting: universe.into_iter().map(Into::into).collect(),
            running: BTreeSet::new(),
            succeeded: BTreeSet::new(),
        }
    }

    pub fn waiting(&self) -> &BTreeSet<TaskId> {
        &self.waiting
    }

    pub fn running(&self) -> &BTreeSet<TaskId> {
        &self.running
    }

    pub fn succeeded(&self) -> &BTreeSet<TaskId> {
        &self.succeeded
    }

    /// State of `task`, or `None` if it is not part of the universe.
    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        if self.waiting.contains(task) {
            Some(TaskState::Waiting)
        } else if self.running.contains(task) {
            Some(TaskState::Running)
        } else if self.succeeded.contains(task) {
            Some(TaskState::Succeeded)
        } else {
            None
        }
    }

    /// True once nothing is waiting or running.
    pub fn is_finished(&self) -> bool {
        self.waiting.is_empty() && self.running.is_empty()
    }

    /// Total number of tasks across the three sets.
    pub fn len(&self) -> usize {
        self.waiting.len() + self.running.len() + self.succeeded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every task with its state, sorted by name.
    pub fn tasks(&self) -> Vec<(&str, TaskState)> {
        let mut out: Vec<(&str, TaskState)> = self
            .waiting
            .iter()
            .map(|t| (t.as_str(), TaskState::Waiting))
            .chain(self.running.iter().map(|t| (t.as_str(), TaskState::Running)))
            .chain(
                self.succeeded
                    .iter()
                    .map(|t| (t.as_str(), TaskState::Succeeded)),
            )
            .collect();
        out.sort();
        out
    }

    /// Whether the three sets are pairwise disjoint and their union is
    /// exactly `universe`.
    pub fn is_partition_of(&self, universe: &BTreeSet<TaskId>) -> bool {
        let disjoint = self.waiting.is_disjoint(&self.running)
            && self.waiting.is_disjoint(&self.succeeded)
            && self.running.is_disjoint(&self.succeeded);
        disjoint && self.len() == universe.len() && universe.iter().all(|t| self.state_of(t).is_some())
    }
}

/// Read-only view handed to renderers after every changed tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Round number, starting at 1 and incremented on every reset.
    pub round: u64,
    /// Ticks taken so far in this round.
    pub tick: u64,
    pub state: SimulationState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_waiting_is_a_partition() {
        let universe: BTreeSet<TaskId> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let state = SimulationState::all_waiting(universe.iter().cloned());
        assert!(state.is_partition_of(&universe));
        assert_eq!(state.state_of("a"), Some(TaskState::Waiting));
        assert_eq!(state.state_of("zzz"), None);
        assert!(!state.is_finished());
    }

    #[test]
    fn overlapping_sets_are_not_a_partition() {
        let universe: BTreeSet<TaskId> = ["a"].iter().map(|s| s.to_string()).collect();
        let mut state = SimulationState::all_waiting(["a"]);
        state.running.insert("a".into());
        assert!(!state.is_partition_of(&universe));
    }

    #[test]
    fn tasks_are_listed_by_name() {
        let mut state = SimulationState::all_waiting(["c", "a"]);
        state.waiting.remove("a");
        state.succeeded.insert("a".into());
        assert_eq!(
            state.tasks(),
            vec![("a", TaskState::Succeeded), ("c", TaskState::Waiting)]
        );
    }
}
