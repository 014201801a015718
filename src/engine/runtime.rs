// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::core::CoreRuntime;
use crate::engine::{CoreCommand, DriverEvent, SimulationOutcome};
use crate::errors::{MiniflowError, Result};
use crate::render::Renderer;

/// Drives the core on a fixed cadence and delegates presentation to a
/// `Renderer`.
///
/// This is a thin timer shell around `CoreRuntime`, which contains all the
/// simulation semantics. Ticks never overlap: the full interval is slept
/// after each tick and its rendering have finished, so slow renders stretch
/// the cadence instead of shortening the gap.
pub struct Runtime<R: Renderer> {
    core: CoreRuntime,
    renderer: R,
    tick_interval: Duration,
    cancel: CancellationToken,
}

impl<R: Renderer> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("tick_interval", &self.tick_interval)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> Runtime<R> {
    pub fn new(core: CoreRuntime, renderer: R, tick_interval: Duration) -> Self {
        Self {
            core,
            renderer,
            tick_interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the simulation when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Main loop.
    ///
    /// - Renders the initial all-waiting state.
    /// - Sleeps one interval, feeds a tick into the core, executes the
    ///   returned commands, and repeats.
    /// - Returns once the core stops (stall or round limit) or the token is
    ///   cancelled.
    pub async fn run(mut self) -> Result<SimulationOutcome> {
        info!(tick_ms = self.tick_interval.as_millis() as u64, "simulation started");

        let mut outcome = None;

        let start = self.core.start();
        for command in start.commands {
            self.execute_command(command, &mut outcome).await?;
        }

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => DriverEvent::CancelRequested,
                _ = sleep(self.tick_interval) => DriverEvent::Tick,
            };

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command, &mut outcome).await?;
            }

            if !step.keep_running {
                break;
            }
        }

        let outcome = outcome.unwrap_or(SimulationOutcome::Cancelled);
        info!(?outcome, "simulation finished");
        Ok(outcome)
    }

    /// Run on a Tokio task and return a handle that can stop it.
    pub fn spawn(self) -> SimulationHandle
    where
        R: 'static,
    {
        let cancel = self.cancellation_token();
        let join = tokio::spawn(self.run());
        SimulationHandle { cancel, join }
    }

    async fn execute_command(
        &mut self,
        command: CoreCommand,
        outcome: &mut Option<SimulationOutcome>,
    ) -> Result<()> {
        match command {
            CoreCommand::Render(snapshot) => {
                debug!(round = snapshot.round, tick = snapshot.tick, "rendering snapshot");
                self.renderer.render(snapshot).await?;
            }
            CoreCommand::RoundCompleted { round } => {
                debug!(round, "round completed");
            }
            CoreCommand::Stalled(report) => {
                // The core already logged the diagnostic; the last rendered
                // snapshot stays as the visible state.
                debug!(round = report.round, "stall acknowledged");
            }
            CoreCommand::RequestExit(reason) => {
                *outcome = Some(reason);
            }
        }
        Ok(())
    }
}

/// Handle to a simulation running on its own Tokio task.
#[derive(Debug)]
pub struct SimulationHandle {
    cancel: CancellationToken,
    join: JoinHandle<Result<SimulationOutcome>>,
}

impl SimulationHandle {
    /// Ask the simulation to stop. It finishes its current tick first.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the simulation to end.
    pub async fn wait(self) -> Result<SimulationOutcome> {
        self.join
            .await
            .map_err(|e| MiniflowError::Other(anyhow::Error::from(e)))?
    }
}
