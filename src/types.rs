// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Name of the colour theme handed to the renderer.
///
/// - `Default`: the standard waiting/running/succeeded palette.
/// - `Demo`: only highlights succeeded tasks, for demonstrating workflow logic.
/// - `Custom`: any other name. The core does not interpret it; the renderer
///   falls back to an empty theme and logs a warning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(from = "String")]
pub enum ThemeName {
    #[default]
    Default,
    Demo,
    Custom(String),
}

impl From<String> for ThemeName {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "default" => ThemeName::Default,
            "demo" => ThemeName::Demo,
            _ => ThemeName::Custom(s),
        }
    }
}

impl FromStr for ThemeName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ThemeName::from(s.to_string()))
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeName::Default => f.write_str("default"),
            ThemeName::Demo => f.write_str("demo"),
            ThemeName::Custom(name) => f.write_str(name),
        }
    }
}
