// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::dag::Graph;
use crate::types::ThemeName;

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [config]
/// tick_ms = 3000
/// theme = "default"
/// max_rounds = 0
///
/// [theme]
/// running_fill = "#00c410"
///
/// [graph]
/// lines = [
///     "a => b => c",
///     "b & c => d",
/// ]
/// ```
///
/// All sections are optional and have reasonable defaults, but a config
/// without graph lines does not validate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Driver behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Per-key theme overrides from `[theme]`, passed to the renderer as-is.
    #[serde(default)]
    pub theme: BTreeMap<String, String>,

    /// Graph definition from `[graph]`.
    #[serde(default)]
    pub graph: GraphSection,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Delay between ticks in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Built-in theme the overrides are layered on.
    #[serde(default)]
    pub theme: ThemeName,

    /// Number of rounds to complete before exiting; `0` loops forever.
    #[serde(default)]
    pub max_rounds: u64,
}

fn default_tick_ms() -> u64 {
    3000
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            theme: ThemeName::default(),
            max_rounds: 0,
        }
    }
}

/// `[graph]` section.
///
/// Each line is a chain such as `a => b => c`. Lines ending in `&`, `|` or
/// `=>` continue onto the next one. A line may also hold several chains
/// separated by `//`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphSection {
    #[serde(default)]
    pub lines: Vec<String>,
}

/// Validated configuration with its graph compiled.
///
/// Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub theme: BTreeMap<String, String>,
    pub graph: GraphSection,
    compiled: Graph,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        theme: BTreeMap<String, String>,
        graph: GraphSection,
        compiled: Graph,
    ) -> Self {
        Self {
            config,
            theme,
            graph,
            compiled,
        }
    }

    /// The compiled workflow graph.
    pub fn compiled_graph(&self) -> &Graph {
        &self.compiled
    }
}
