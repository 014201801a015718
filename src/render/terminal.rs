// src/render/terminal.rs

use std::future::Future;
use std::io::{self, Write};
use std::pin::Pin;

use crate::dag::Snapshot;
use crate::errors::Result;

use super::{Renderer, Theme};

/// Renders each snapshot as a single line:
///
/// ```text
/// [round 1 tick 2] a:succeeded b:running c:waiting
/// ```
///
/// With colour enabled, task names are painted with the theme's fill colour
/// (or stroke colour when the fill is `none`) using 24-bit ANSI escapes.
/// Colours that are not `#rrggbb` are ignored.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    theme: Theme,
    color: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(theme: Theme, color: bool) -> Self {
        Self::new(io::stdout(), theme, color)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, theme: Theme, color: bool) -> Self {
        Self { out, theme, color }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Format a snapshot without writing it.
    pub fn format_line(&self, snapshot: &Snapshot) -> String {
        let mut line = format!("[round {} tick {}]", snapshot.round, snapshot.tick);
        for (task, state) in snapshot.state.tasks() {
            line.push(' ');
            let label = format!("{task}:{state}");
            if self.color {
                let style = self.theme.style_for(state);
                let colour = if style.fill == "none" {
                    &style.stroke
                } else {
                    &style.fill
                };
                match hex_to_rgb(colour) {
                    Some((r, g, b)) => {
                        line.push_str(&format!("\x1b[38;2;{r};{g};{b}m{label}\x1b[0m"))
                    }
                    None => line.push_str(&label),
                }
            } else {
                line.push_str(&label);
            }
        }
        line
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(
        &mut self,
        snapshot: Snapshot,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let line = self.format_line(&snapshot);
            writeln!(self.out, "{line}")?;
            self.out.flush()?;
            Ok(())
        })
    }
}

fn hex_to_rgb(colour: &str) -> Option<(u8, u8, u8)> {
    let hex = colour.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
