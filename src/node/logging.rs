//! Logging entry points for JavaScript
//!
//! `setupLogging` configures FFmpeg's own log output; `enableTracing` turns on
//! the crate's `tracing` diagnostics on stderr.

use std::sync::Arc;

use napi::bindgen_prelude::*;
use napi::threadsafe_function::{
  ThreadsafeFunction, ThreadsafeFunctionCallMode, UnknownReturnValue,
};
use napi_derive::napi;
use tracing_subscriber::EnvFilter;

use crate::logging::{self, LogFlags, LogLevel, LogSink};

use super::error::{named_error, ErrorName};

const DEFAULT_TRACE_FILTER: &str = "rtsp_grabber=info";

/// FFmpeg verbosity
#[napi(string_enum, js_name = "LogLevel")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsLogLevel {
  #[napi(value = "quiet")]
  Quiet,
  #[napi(value = "panic")]
  Panic,
  #[napi(value = "fatal")]
  Fatal,
  #[napi(value = "error")]
  Error,
  #[napi(value = "warning")]
  Warning,
  #[napi(value = "info")]
  Info,
  #[napi(value = "verbose")]
  Verbose,
  #[napi(value = "debug")]
  Debug,
  #[napi(value = "trace")]
  Trace,
  #[napi(value = "all")]
  All,
}

impl From<JsLogLevel> for LogLevel {
  fn from(level: JsLogLevel) -> Self {
    match level {
      JsLogLevel::Quiet => LogLevel::Quiet,
      JsLogLevel::Panic => LogLevel::Panic,
      JsLogLevel::Fatal => LogLevel::Fatal,
      JsLogLevel::Error => LogLevel::Error,
      JsLogLevel::Warning => LogLevel::Warning,
      JsLogLevel::Info => LogLevel::Info,
      JsLogLevel::Verbose => LogLevel::Verbose,
      JsLogLevel::Debug => LogLevel::Debug,
      JsLogLevel::Trace => LogLevel::Trace,
      JsLogLevel::All => LogLevel::All,
    }
  }
}

#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
  /// Defaults to `verbose`
  pub level: Option<JsLogLevel>,
  /// Collapse runs of identical lines (default false)
  pub skip_repeated: Option<bool>,
  /// Prefix lines with `[level]` (default true)
  pub print_level: Option<bool>,
}

impl LoggingOptions {
  fn resolve(&self) -> (LogLevel, LogFlags) {
    let level = self.level.map(LogLevel::from).unwrap_or_default();
    let mut flags = LogFlags::NONE;
    if self.skip_repeated.unwrap_or(false) {
      flags |= LogFlags::SKIP_REPEATED;
    }
    if self.print_level.unwrap_or(true) {
      flags |= LogFlags::PRINT_LEVEL;
    }
    (level, flags)
  }
}

/// (line, level) delivered without blocking FFmpeg threads
type LogCallback = ThreadsafeFunction<
  FnArgs<(String, i32)>,
  UnknownReturnValue,
  FnArgs<(String, i32)>,
  Status,
  false,
  true,
>;

/// Configure FFmpeg logging for the whole process
///
/// Without `callback`, FFmpeg prints to stderr itself. Call once before
/// opening streams.
#[napi(
  ts_args_type = "options?: LoggingOptions, callback?: (line: string, level: number) => void"
)]
pub fn setup_logging(
  options: Option<LoggingOptions>,
  callback: Option<Function<FnArgs<(String, i32)>, UnknownReturnValue>>,
) -> Result<()> {
  let (level, flags) = options.unwrap_or_default().resolve();

  let sink = match callback {
    Some(callback) => {
      let tsfn: LogCallback = callback
        .build_threadsafe_function()
        .callee_handled::<false>()
        .weak::<true>()
        .build()?;
      let sink: LogSink = Arc::new(move |line: &str, level: i32| {
        tsfn.call(
          (line.to_string(), level).into(),
          ThreadsafeFunctionCallMode::NonBlocking,
        );
      });
      Some(sink)
    }
    None => None,
  };

  logging::setup_logging(level, flags, sink);
  Ok(())
}

/// Print crate diagnostics to stderr
///
/// `filter` uses `RUST_LOG` syntax; without it `RUST_LOG` is read, falling
/// back to `rtsp_grabber=info`. Later calls are ignored.
#[napi]
pub fn enable_tracing(filter: Option<String>) -> Result<()> {
  let filter = match filter {
    Some(directives) => EnvFilter::try_new(&directives).map_err(|e| {
      named_error(
        ErrorName::TypeError,
        &format!("Invalid tracing filter '{}': {}", directives, e),
      )
    })?,
    None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_FILTER)),
  };

  // already installed is fine
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
  Ok(())
}
