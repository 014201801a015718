// crates/test-utils/src/builders.rs

use miniflow::config::{ConfigFile, ConfigSection, GraphSection, RawConfigFile};
use miniflow::dag::{Graph, Scheduler};
use miniflow::engine::{CoreRuntime, RuntimeOptions};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                theme: Default::default(),
                graph: GraphSection::default(),
            },
        }
    }

    pub fn with_line(mut self, line: &str) -> Self {
        self.config.graph.lines.push(line.to_string());
        self
    }

    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.config.config.tick_ms = tick_ms;
        self
    }

    pub fn with_theme(mut self, name: &str) -> Self {
        self.config.config.theme = name.to_string().into();
        self
    }

    pub fn with_theme_override(mut self, key: &str, value: &str) -> Self {
        self.config.theme.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_max_rounds(mut self, rounds: u64) -> Self {
        self.config.config.max_rounds = rounds;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheduler over an inline graph; panics on parse errors.
pub fn scheduler(graph: &str) -> Scheduler {
    Scheduler::new(Graph::parse(graph).expect("test graph should parse"))
}

/// Core runtime over an inline graph.
pub fn core(graph: &str, max_rounds: Option<u64>) -> CoreRuntime {
    CoreRuntime::new(scheduler(graph), RuntimeOptions { max_rounds })
}
