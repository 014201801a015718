// crates/test-utils/src/recording_renderer.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use miniflow::dag::Snapshot;
use miniflow::errors::Result;
use miniflow::render::Renderer;

/// A renderer that records every snapshot it is handed.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    frames: Arc<Mutex<Vec<Snapshot>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the recorded frames; stays valid after the renderer
    /// has been moved into a runtime.
    pub fn frames(&self) -> Arc<Mutex<Vec<Snapshot>>> {
        Arc::clone(&self.frames)
    }
}

impl Renderer for RecordingRenderer {
    fn render(
        &mut self,
        snapshot: Snapshot,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let frames = Arc::clone(&self.frames);

        Box::pin(async move {
            frames.lock().unwrap().push(snapshot);
            Ok(())
        })
    }
}
