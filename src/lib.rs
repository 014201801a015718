// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod render;
pub mod types;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, GraphSection, RawConfigFile};
use crate::config::{default_config_path, load_from_path};
use crate::dag::{Scheduler, dot};
use crate::engine::{CoreRuntime, Runtime, RuntimeOptions, SimulationOutcome};
use crate::render::{TerminalRenderer, Theme};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - graph compilation
/// - scheduler / core / runtime
/// - the terminal renderer
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;

    if args.dot {
        print!("{}", dot::to_dot(cfg.compiled_graph()));
        return Ok(());
    }

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let theme = Theme::named(&cfg.config.theme).with_overrides(&cfg.theme);
    let renderer = TerminalRenderer::stdout(theme, !args.no_color);

    let scheduler = Scheduler::new(cfg.compiled_graph().clone());
    let options = RuntimeOptions {
        max_rounds: (cfg.config.max_rounds > 0).then_some(cfg.config.max_rounds),
    };

    // Construct the pure core (single source of truth for semantics) and
    // the timer shell around it.
    let core = CoreRuntime::new(scheduler, options);
    let runtime = Runtime::new(core, renderer, Duration::from_millis(cfg.config.tick_ms));
    let handle = runtime.spawn();

    // Ctrl-C → cancel the simulation.
    {
        let token = handle.cancellation_token();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            token.cancel();
        });
    }

    let outcome = handle.wait().await?;
    match &outcome {
        SimulationOutcome::Stalled(report) => {
            println!(
                "workflow stalled in round {} at tick {}; waiting: {}",
                report.round,
                report.tick,
                report.waiting.join(", ")
            );
        }
        SimulationOutcome::RoundLimitReached { rounds } => {
            info!(rounds, "completed requested rounds");
        }
        SimulationOutcome::Cancelled => {
            info!("stopped");
        }
    }

    Ok(())
}

/// Build the effective configuration: config file (if any) plus CLI
/// overrides, then validate and compile.
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match (&args.config, &args.graph) {
        (Some(path), _) => {
            let path = PathBuf::from(path);
            load_from_path(&path).with_context(|| format!("loading config from {path:?}"))?
        }
        (None, Some(_)) => RawConfigFile::default(),
        (None, None) => {
            let path = default_config_path();
            load_from_path(&path).with_context(|| format!("loading config from {path:?}"))?
        }
    };

    apply_overrides(&mut raw, args);

    let cfg = ConfigFile::try_from(raw).context("invalid configuration")?;
    debug!(
        tasks = cfg.compiled_graph().universe().len(),
        edges = cfg.compiled_graph().edges().len(),
        "configuration resolved"
    );
    Ok(cfg)
}

fn apply_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(graph) = &args.graph {
        raw.graph = GraphSection {
            lines: vec![graph.clone()],
        };
    }
    if let Some(tick_ms) = args.tick_ms {
        raw.config.tick_ms = tick_ms;
    }
    if let Some(theme) = &args.theme {
        raw.config.theme = theme.clone().into();
    }
    if let Some(rounds) = args.rounds {
        raw.config.max_rounds = rounds;
    }
}

/// Simple dry-run output: print tasks, edges and compiled conditions.
fn print_dry_run(cfg: &ConfigFile) {
    let graph = cfg.compiled_graph();

    println!("miniflow dry-run");
    println!("  config.tick_ms = {}", cfg.config.tick_ms);
    println!("  config.theme = {}", cfg.config.theme);
    println!("  config.max_rounds = {}", cfg.config.max_rounds);
    println!();

    println!("edges ({}):", graph.edges().len());
    for edge in graph.edges() {
        println!("  - {} => {}", edge.prerequisite, edge.dependent);
    }
    println!();

    println!("tasks ({}):", graph.universe().len());
    for task in graph.tasks() {
        println!("  - {task}");
        for condition in graph.index().conditions_for(task) {
            println!("      requires: {condition}");
        }
    }

    let undeclared = graph.undeclared_references();
    if !undeclared.is_empty() {
        println!();
        println!("undeclared prerequisites: {}", undeclared.join(", "));
    }

    debug!("dry-run complete (no simulation)");
}
