// src/dag/index.rs

//! Per-task aggregation of compiled prerequisite conditions.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::dag::TaskId;
use crate::dag::condition::{Condition, ParseError};
use crate::dag::parser::Edge;

/// Mapping from a dependent task to every condition that gates it.
///
/// Each graph edge contributes one entry. Entries for the same task combine
/// with AND: `a => c` and `b => c` on separate lines require both `a` and `b`.
/// A task with no entry has no prerequisites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    conditions: BTreeMap<TaskId, Vec<Condition>>,
}

impl DependencyIndex {
    /// Compile every edge. Fails on the first malformed prerequisite; no
    /// partial index is returned.
    pub fn build(edges: &[Edge]) -> Result<Self, ParseError> {
        let mut conditions: BTreeMap<TaskId, Vec<Condition>> = BTreeMap::new();

        for edge in edges {
            let condition = Condition::compile(&edge.prerequisite)?;
            debug!(
                task = %edge.dependent,
                condition = %condition,
                "compiled prerequisite"
            );
            conditions
                .entry(edge.dependent.clone())
                .or_default()
                .push(condition);
        }

        Ok(Self { conditions })
    }

    /// Conditions gating `task`, in edge order. Empty if it has none.
    pub fn conditions_for(&self, task: &str) -> &[Condition] {
        self.conditions
            .get(task)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Whether every condition gating `task` holds.
    pub fn is_satisfied(&self, task: &str, succeeded: &BTreeSet<TaskId>) -> bool {
        self.conditions_for(task)
            .iter()
            .all(|c| c.evaluate(succeeded))
    }

    /// Tasks that have at least one condition.
    pub fn dependents(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Condition])> {
        self.conditions
            .iter()
            .map(|(task, conds)| (task.as_str(), conds.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
