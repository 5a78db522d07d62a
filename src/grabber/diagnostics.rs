//! Session diagnostics
//!
//! Messages go to `tracing` and, when set, to a per-session sink.

use std::sync::Arc;

pub(crate) const TRACE_TARGET: &str = "rtsp_grabber";

/// Per-session sink for human readable diagnostic lines
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Default)]
pub struct Diagnostics {
  sink: Option<DiagnosticSink>,
}

impl Diagnostics {
  pub fn new(sink: Option<DiagnosticSink>) -> Self {
    Self { sink }
  }

  pub fn info(&self, message: &str) {
    tracing::info!(target: TRACE_TARGET, "{}", message);
    self.forward(message);
  }

  pub fn warn(&self, message: &str) {
    tracing::warn!(target: TRACE_TARGET, "{}", message);
    self.forward(message);
  }

  fn forward(&self, message: &str) {
    if let Some(sink) = &self.sink {
      sink(message);
    }
  }
}

impl std::fmt::Debug for Diagnostics {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Diagnostics")
      .field("sink", &self.sink.is_some())
      .finish()
  }
}
