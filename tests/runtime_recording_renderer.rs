// tests/runtime_recording_renderer.rs

use miniflow_test_utils::builders::core;
use miniflow_test_utils::{init_tracing, with_timeout};
use miniflow_test_utils::recording_renderer::RecordingRenderer;

use std::error::Error;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::time::{Duration, Instant, sleep, timeout};

use miniflow::dag::{Snapshot, TaskState};
use miniflow::engine::{Runtime, SimulationOutcome};
use miniflow::render::Renderer;

type TestResult = Result<(), Box<dyn Error>>;

const TICK: Duration = Duration::from_millis(1000);

#[tokio::test(start_paused = true)]
async fn chain_loops_until_round_limit() -> TestResult {
    init_tracing();

    let renderer = RecordingRenderer::new();
    let frames = renderer.frames();
    let runtime = Runtime::new(core("a=>b=>c", Some(2)), renderer, TICK);

    let started = Instant::now();
    let outcome = timeout(Duration::from_secs(60), runtime.run()).await??;
    assert_eq!(outcome, SimulationOutcome::RoundLimitReached { rounds: 2 });

    // Two rounds of 5 ticks each, one interval apart.
    let elapsed = started.elapsed();
    assert!(elapsed >= TICK * 10 && elapsed < TICK * 11, "elapsed {elapsed:?}");

    let frames = frames.lock().unwrap();
    // initial + 4 changed ticks, reset + 4 changed ticks.
    assert_eq!(frames.len(), 10);
    assert_eq!((frames[0].round, frames[0].tick), (1, 0));
    assert_eq!((frames[5].round, frames[5].tick), (2, 0));
    assert_eq!(frames[5].state.waiting().len(), 3);

    let last = frames.last().unwrap();
    assert_eq!(last.state.state_of("c"), Some(TaskState::Succeeded));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stall_stops_ticking_and_keeps_last_frame() -> TestResult {
    init_tracing();

    let renderer = RecordingRenderer::new();
    let frames = renderer.frames();
    let runtime = Runtime::new(core("x // a => b // b => a", None), renderer, TICK);

    let outcome = timeout(Duration::from_secs(60), runtime.run()).await??;
    match outcome {
        SimulationOutcome::Stalled(report) => {
            assert_eq!(report.round, 1);
            assert_eq!(report.tick, 3);
            assert_eq!(report.waiting, vec!["a", "b"]);
        }
        other => panic!("expected stall, got {other:?}"),
    }

    let frames = frames.lock().unwrap();
    // initial, x running, x succeeded. The stalled tick renders nothing.
    assert_eq!(frames.len(), 3);
    assert_eq!(
        frames[2].state.state_of("x"),
        Some(TaskState::Succeeded)
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_a_satisfiable_simulation() -> TestResult {
    init_tracing();

    let renderer = RecordingRenderer::new();
    let frames = renderer.frames();
    let runtime = Runtime::new(core("a=>b=>c", None), renderer, TICK);
    let handle = runtime.spawn();

    sleep(TICK * 2 + Duration::from_millis(500)).await;
    assert!(!handle.is_finished());
    handle.stop();

    let outcome = with_timeout(handle.wait()).await?;
    assert_eq!(outcome, SimulationOutcome::Cancelled);

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[2].state.state_of("b"), Some(TaskState::Running));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancelled_token_before_start_renders_only_initial_state() -> TestResult {
    let renderer = RecordingRenderer::new();
    let frames = renderer.frames();
    let runtime = Runtime::new(core("a", None), renderer, TICK);
    runtime.cancellation_token().cancel();

    let outcome = runtime.run().await?;
    assert_eq!(outcome, SimulationOutcome::Cancelled);
    assert_eq!(frames.lock().unwrap().len(), 1);
    Ok(())
}

/// Records when each render starts and takes `delay` to finish.
struct SlowRenderer {
    delay: Duration,
    started: Arc<Mutex<Vec<Instant>>>,
}

impl Renderer for SlowRenderer {
    fn render(
        &mut self,
        _snapshot: Snapshot,
    ) -> Pin<Box<dyn Future<Output = miniflow::errors::Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.started.lock().unwrap().push(Instant::now());
            sleep(self.delay).await;
            Ok(())
        })
    }
}

#[tokio::test(start_paused = true)]
async fn full_interval_follows_each_render() -> TestResult {
    init_tracing();

    let delay = Duration::from_millis(300);
    let started = Arc::new(Mutex::new(Vec::new()));
    let renderer = SlowRenderer {
        delay,
        started: started.clone(),
    };
    let runtime = Runtime::new(core("a=>b=>c", Some(1)), renderer, TICK);

    let outcome = timeout(Duration::from_secs(60), runtime.run()).await??;
    assert_eq!(outcome, SimulationOutcome::RoundLimitReached { rounds: 1 });

    let started = started.lock().unwrap();
    // initial + 4 changed ticks; the completing tick exits without a frame.
    assert_eq!(started.len(), 5);
    for pair in started.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(
            gap >= TICK + delay && gap < TICK + delay + Duration::from_millis(10),
            "gap {gap:?}"
        );
    }
    Ok(())
}
