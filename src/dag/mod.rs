// src/dag/mod.rs

//! Workflow graph model and the tick-based state machine.
//!
//! - [`parser`] splits graph text into edges.
//! - [`condition`] compiles prerequisite text into a boolean AST.
//! - [`index`] aggregates compiled conditions per dependent task.
//! - [`graph`] ties edges, index and task universe together.
//! - [`task_info`] defines task states and the three-set simulation state.
//! - [`state_manager`] implements the two-phase tick.
//! - [`scheduler`] owns a graph plus its evolving state, round by round.
//! - [`scheduler_step`] defines the result types for scheduler steps.
//! - [`dot`] renders a graph for graphviz.

pub mod condition;
pub mod dot;
pub mod graph;
pub mod index;
pub mod parser;
pub mod scheduler;
pub mod scheduler_step;
pub mod state_manager;
pub mod task_info;

/// Canonical task identifier type used throughout the crate.
pub type TaskId = String;

pub use condition::{Condition, ParseError};
pub use graph::Graph;
pub use index::DependencyIndex;
pub use parser::Edge;
pub use scheduler::Scheduler;
pub use scheduler_step::{RoundStatus, SchedulerStep, TickReport};
pub use task_info::{SimulationState, Snapshot, TaskState};
