// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`DriverEvent`]s and produces:
//! - an updated scheduler state
//! - a list of "commands" describing what the shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for:
//! - waiting the tick interval
//! - sending snapshots to the renderer
//! - observing the cancellation token
//!
//! The core is intended to be unit tested without any Tokio, timers or
//! renderers.

use crate::dag::Scheduler;
use crate::engine::event_handlers::{CoreCommand, CoreStep, handle_cancel, handle_tick};
use crate::engine::{DriverEvent, RuntimeOptions};

/// Pure core runtime state.
///
/// It has **no** timers, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: Scheduler,
    options: RuntimeOptions,
    rounds_completed: u64,
}

impl CoreRuntime {
    pub fn new(scheduler: Scheduler, options: RuntimeOptions) -> Self {
        Self {
            scheduler,
            options,
            rounds_completed: 0,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn rounds_completed(&self) -> u64 {
        self.rounds_completed
    }

    /// Commands to run before the first tick: render the initial state.
    pub fn start(&self) -> CoreStep {
        CoreStep {
            commands: vec![CoreCommand::Render(self.scheduler.snapshot())],
            keep_running: true,
        }
    }

    /// Handle a single event, updating core state and returning the
    /// resulting commands for the shell.
    pub fn step(&mut self, event: DriverEvent) -> CoreStep {
        match event {
            DriverEvent::Tick => handle_tick(
                &mut self.scheduler,
                &self.options,
                &mut self.rounds_completed,
            ),
            DriverEvent::CancelRequested => handle_cancel(&self.scheduler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::{Graph, TaskState};
    use crate::engine::SimulationOutcome;

    fn core(text: &str, max_rounds: Option<u64>) -> CoreRuntime {
        let scheduler = Scheduler::new(Graph::parse(text).unwrap());
        CoreRuntime::new(scheduler, RuntimeOptions { max_rounds })
    }

    #[test]
    fn start_renders_all_waiting() {
        let core = core("a => b", None);
        let step = core.start();
        match &step.commands[..] {
            [CoreCommand::Render(snap)] => {
                assert_eq!(snap.round, 1);
                assert_eq!(snap.tick, 0);
                assert_eq!(snap.state.waiting().len(), 2);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn completed_round_resets_and_keeps_running() {
        let mut core = core("a", None);
        core.step(DriverEvent::Tick); // a running
        core.step(DriverEvent::Tick); // a succeeded
        let step = core.step(DriverEvent::Tick); // no change, all succeeded

        assert!(step.keep_running);
        assert_eq!(step.commands[0], CoreCommand::RoundCompleted { round: 1 });
        match &step.commands[1] {
            CoreCommand::Render(snap) => {
                assert_eq!(snap.round, 2);
                assert_eq!(snap.state.state_of("a"), Some(TaskState::Waiting));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(core.rounds_completed(), 1);
    }

    #[test]
    fn round_limit_stops_without_reset() {
        let mut core = core("a", Some(1));
        core.step(DriverEvent::Tick);
        core.step(DriverEvent::Tick);
        let step = core.step(DriverEvent::Tick);

        assert!(!step.keep_running);
        assert_eq!(
            step.commands.last(),
            Some(&CoreCommand::RequestExit(SimulationOutcome::RoundLimitReached {
                rounds: 1
            }))
        );
        assert_eq!(
            core.scheduler().state_of("a"),
            Some(TaskState::Succeeded)
        );
    }

    #[test]
    fn stall_stops_and_reports_stuck_tasks() {
        let mut core = core("x // a => b // b => a", None);
        let first = core.step(DriverEvent::Tick);
        assert!(first.keep_running);
        core.step(DriverEvent::Tick);
        let step = core.step(DriverEvent::Tick);

        assert!(!step.keep_running);
        match &step.commands[0] {
            CoreCommand::Stalled(report) => {
                assert_eq!(report.tick, 3);
                assert_eq!(report.waiting, vec!["a", "b"]);
                assert!(report.running.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cancel_requests_exit() {
        let mut core = core("a => b", None);
        let step = core.step(DriverEvent::CancelRequested);
        assert!(!step.keep_running);
        assert_eq!(
            step.commands,
            vec![CoreCommand::RequestExit(SimulationOutcome::Cancelled)]
        );
    }
}
