// src/render/mod.rs

//! Pluggable renderer abstraction.
//!
//! The runtime hands a [`Snapshot`] to a `Renderer` after every tick that
//! changed something (and once after each reset). Renderers own their
//! [`Theme`]; the simulation never reads it.
//!
//! - [`TerminalRenderer`] prints one line per snapshot and is what the
//!   `miniflow` binary uses.
//! - Tests provide their own `Renderer` that records snapshots.

use std::future::Future;
use std::pin::Pin;

use crate::dag::Snapshot;
use crate::errors::Result;

pub mod terminal;
pub mod theme;

pub use terminal::TerminalRenderer;
pub use theme::{Style, Theme};

/// Trait abstracting how snapshots are presented.
pub trait Renderer: Send {
    /// Present one snapshot. The runtime waits for the returned future
    /// before scheduling the next tick.
    fn render(
        &mut self,
        snapshot: Snapshot,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
