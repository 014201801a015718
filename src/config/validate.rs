// src/config/validate.rs

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::dag::Graph;
use crate::errors::{MiniflowError, Result};
use crate::render::theme::STYLE_KEYS;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = MiniflowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_graph(&raw)?;
        validate_global_config(&raw)?;
        check_theme_keys(&raw);
        let compiled = compile_graph(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.config,
            raw.theme,
            raw.graph,
            compiled,
        ))
    }
}

fn ensure_has_graph(cfg: &RawConfigFile) -> Result<()> {
    if cfg.graph.lines.iter().all(|l| l.trim().is_empty()) {
        return Err(MiniflowError::ConfigError(
            "config must contain at least one non-empty line in [graph].lines".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.tick_ms == 0 {
        return Err(MiniflowError::ConfigError(
            "[config].tick_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

// Theme data is opaque to the simulation; unfamiliar keys are only worth a
// warning since a custom renderer may understand them.
fn check_theme_keys(cfg: &RawConfigFile) {
    for key in cfg.theme.keys() {
        if !STYLE_KEYS.contains(&key.as_str()) {
            warn!(key = %key, "unrecognised [theme] key; built-in renderers ignore it");
        }
    }
}

fn compile_graph(cfg: &RawConfigFile) -> Result<Graph> {
    let graph = Graph::from_lines(&cfg.graph.lines)?;

    if let Some(task) = graph.cycle_member() {
        warn!(
            task = %task,
            "graph contains a dependency cycle; the simulation will stall"
        );
    }

    Ok(graph)
}
