// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{info, warn};

use crate::dag::{RoundStatus, Scheduler, Snapshot};
use crate::engine::{RuntimeOptions, SimulationOutcome, StallReport};

/// Command produced by the pure core, to be executed by the outer shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Hand this snapshot to the renderer.
    Render(Snapshot),
    /// Every task succeeded in this round; the state has been reset.
    RoundCompleted { round: u64 },
    /// The round stopped making progress. The last rendered state stays.
    Stalled(StallReport),
    /// Stop the runtime with this outcome.
    RequestExit(SimulationOutcome),
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep ticking.
    pub keep_running: bool,
}

impl CoreStep {
    fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn exit_with(mut commands: Vec<CoreCommand>, outcome: SimulationOutcome) -> Self {
        commands.push(CoreCommand::RequestExit(outcome));
        Self {
            commands,
            keep_running: false,
        }
    }
}

/// Handle one tick.
///
/// - A tick that changed something is rendered.
/// - A completed round is reported, then either the round limit ends the
///   simulation or the state is reset and the all-waiting state rendered.
/// - A stall is reported and ends the simulation.
pub fn handle_tick(
    scheduler: &mut Scheduler,
    options: &RuntimeOptions,
    rounds_completed: &mut u64,
) -> CoreStep {
    let step = scheduler.step();

    match step.status {
        RoundStatus::InProgress => {
            CoreStep::continue_with(vec![CoreCommand::Render(scheduler.snapshot())])
        }
        RoundStatus::Completed => {
            *rounds_completed += 1;
            let mut commands = vec![CoreCommand::RoundCompleted { round: step.round }];

            if options
                .max_rounds
                .is_some_and(|max| *rounds_completed >= max)
            {
                info!(rounds = *rounds_completed, "round limit reached; stopping");
                return CoreStep::exit_with(
                    commands,
                    SimulationOutcome::RoundLimitReached {
                        rounds: *rounds_completed,
                    },
                );
            }

            scheduler.start_new_round();
            info!(round = scheduler.round(), "all tasks succeeded; restarting");
            commands.push(CoreCommand::Render(scheduler.snapshot()));
            CoreStep::continue_with(commands)
        }
        RoundStatus::Stalled => {
            let state = scheduler.state();
            let report = StallReport {
                round: step.round,
                tick: step.tick,
                waiting: state.waiting().iter().cloned().collect(),
                running: state.running().iter().cloned().collect(),
            };
            warn!(
                round = report.round,
                tick = report.tick,
                waiting = ?report.waiting,
                "simulation stalled; no further ticks"
            );
            CoreStep::exit_with(
                vec![CoreCommand::Stalled(report.clone())],
                SimulationOutcome::Stalled(report),
            )
        }
    }
}

/// Handle an explicit cancellation.
pub fn handle_cancel(scheduler: &Scheduler) -> CoreStep {
    info!(
        round = scheduler.round(),
        tick = scheduler.tick_count(),
        "simulation cancelled"
    );
    CoreStep::exit_with(Vec::new(), SimulationOutcome::Cancelled)
}
