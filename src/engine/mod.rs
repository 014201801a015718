// src/engine/mod.rs

//! Simulation driver.
//!
//! This module ties together:
//! - the scheduler (one tick per timer tick)
//! - round termination (reset and loop on completion, stop on stall)
//! - cancellation and the renderer
//!
//! The pure core state machine lives in [`core`]; the async/timer shell is
//! implemented in [`runtime`].

use crate::dag::TaskId;

/// Events fed into the core by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// The tick interval elapsed.
    Tick,
    /// The caller asked the simulation to stop.
    CancelRequested,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Stop after this many rounds complete. `None` loops forever.
    pub max_rounds: Option<u64>,
}

/// Diagnostic for a round that stopped making progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StallReport {
    pub round: u64,
    /// The tick that changed nothing.
    pub tick: u64,
    pub waiting: Vec<TaskId>,
    pub running: Vec<TaskId>,
}

/// Why the runtime stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// A round stopped making progress with tasks left outside `succeeded`.
    Stalled(StallReport),
    /// `max_rounds` rounds completed.
    RoundLimitReached { rounds: u64 },
    /// Stopped through the cancellation token.
    Cancelled,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use self::core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::{Runtime, SimulationHandle};
