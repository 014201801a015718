// src/render/theme.rs

//! Colour themes for renderers.
//!
//! A theme is opaque key/value data as far as the simulation is concerned.
//! Only renderers look inside it.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use crate::dag::TaskState;
use crate::types::ThemeName;

const DEFAULT_FILL: &str = "none";
const DEFAULT_STROKE: &str = "black";

/// Style keys understood by the built-in renderers.
pub const STYLE_KEYS: [&str; 6] = [
    "waiting_fill",
    "waiting_stroke",
    "running_fill",
    "running_stroke",
    "succeed_fill",
    "succeed_stroke",
];

/// Fill and stroke colour for one task state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub fill: String,
    pub stroke: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    entries: BTreeMap<String, String>,
}

impl Theme {
    /// Resolve a built-in theme by name. Unknown names log a warning and
    /// yield an empty theme, so every task gets the fallback style.
    pub fn named(name: &ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::from_pairs([
                ("waiting_fill", "none"),
                ("waiting_stroke", "#88c6ff"),
                ("running_fill", "#00c410"),
                ("running_stroke", "black"),
                ("succeed_fill", "#ada5a5"),
                ("succeed_stroke", "black"),
            ]),
            ThemeName::Demo => {
                Self::from_pairs([("succeed_fill", "#aabbff"), ("succeed_stroke", "black")])
            }
            ThemeName::Custom(other) => {
                warn!(theme = %other, "unknown theme; falling back to an empty theme");
                Self::default()
            }
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Layer `overrides` on top of this theme.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (key, value) in overrides {
            self.entries.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Style for a task in `state`, falling back to an unfilled node with a
    /// black border.
    pub fn style_for(&self, state: TaskState) -> Style {
        let prefix = match state {
            TaskState::Waiting => "waiting",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeed",
        };
        Style {
            fill: self
                .get(&format!("{prefix}_fill"))
                .unwrap_or(DEFAULT_FILL)
                .to_string(),
            stroke: self
                .get(&format!("{prefix}_stroke"))
                .unwrap_or(DEFAULT_STROKE)
                .to_string(),
        }
    }
}
