//! FFmpeg log routing
//!
//! FFmpeg has a single process-wide log callback. [`setup_logging`] sets the
//! verbosity and flags and either keeps FFmpeg's default stderr output or
//! forwards every line to one Rust sink. Configure once, before any stream
//! is opened: lines logged while the sink is being replaced may go to either
//! sink.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use crate::ffi::{
  accessors::{fflog_install, fflog_restore_default},
  avutil::{av_log_get_flags, av_log_get_level, av_log_set_flags, av_log_set_level, log_flag, log_level},
};

/// Receives each formatted FFmpeg line with its numeric level
pub type LogSink = Arc<dyn Fn(&str, i32) + Send + Sync>;

static SINK: RwLock<Option<LogSink>> = RwLock::new(None);

/// FFmpeg verbosity, most to least restrictive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
  Quiet,
  Panic,
  Fatal,
  Error,
  Warning,
  Info,
  #[default]
  Verbose,
  Debug,
  Trace,
  /// Everything, including lines above trace
  All,
}

impl LogLevel {
  pub fn as_raw(self) -> c_int {
    match self {
      LogLevel::Quiet => log_level::QUIET,
      LogLevel::Panic => log_level::PANIC,
      LogLevel::Fatal => log_level::FATAL,
      LogLevel::Error => log_level::ERROR,
      LogLevel::Warning => log_level::WARNING,
      LogLevel::Info => log_level::INFO,
      LogLevel::Verbose => log_level::VERBOSE,
      LogLevel::Debug => log_level::DEBUG,
      LogLevel::Trace => log_level::TRACE,
      LogLevel::All => log_level::MAX_OFFSET,
    }
  }

  /// Current FFmpeg level, if it is one of the named levels
  pub fn current() -> Option<Self> {
    Self::from_raw(unsafe { av_log_get_level() })
  }

  pub fn from_raw(raw: c_int) -> Option<Self> {
    [
      LogLevel::Quiet,
      LogLevel::Panic,
      LogLevel::Fatal,
      LogLevel::Error,
      LogLevel::Warning,
      LogLevel::Info,
      LogLevel::Verbose,
      LogLevel::Debug,
      LogLevel::Trace,
      LogLevel::All,
    ]
    .into_iter()
    .find(|level| level.as_raw() == raw)
  }
}

/// FFmpeg log flag set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogFlags(c_int);

impl LogFlags {
  pub const NONE: Self = Self(0);
  /// Collapse runs of identical lines
  pub const SKIP_REPEATED: Self = Self(log_flag::SKIP_REPEATED);
  /// Prefix each line with `[level]`
  pub const PRINT_LEVEL: Self = Self(log_flag::PRINT_LEVEL);

  #[inline]
  pub fn bits(self) -> c_int {
    self.0
  }

  #[inline]
  pub fn contains(self, other: Self) -> bool {
    self.0 & other.0 == other.0
  }

  pub fn current() -> Self {
    Self(unsafe { av_log_get_flags() })
  }
}

impl Default for LogFlags {
  fn default() -> Self {
    Self::PRINT_LEVEL
  }
}

impl std::ops::BitOr for LogFlags {
  type Output = Self;

  fn bitor(self, rhs: Self) -> Self {
    Self(self.0 | rhs.0)
  }
}

impl std::ops::BitOrAssign for LogFlags {
  fn bitor_assign(&mut self, rhs: Self) {
    self.0 |= rhs.0;
  }
}

/// Configure FFmpeg logging for the whole process
///
/// With `sink == None` FFmpeg's default callback is restored. Otherwise every
/// line at or below `level` is formatted (honoring `flags`) and passed to
/// `sink`; more verbose lines are dropped before formatting.
pub fn setup_logging(level: LogLevel, flags: LogFlags, sink: Option<LogSink>) {
  unsafe {
    av_log_set_level(level.as_raw());
    av_log_set_flags(flags.bits());
  }

  let install = sink.is_some();
  match SINK.write() {
    Ok(mut guard) => *guard = sink,
    Err(poisoned) => *poisoned.into_inner() = sink,
  }

  unsafe {
    if install {
      fflog_install(forward_line);
    } else {
      fflog_restore_default();
    }
  }
}

/// Called from the C trampoline, possibly on FFmpeg worker threads
unsafe extern "C" fn forward_line(level: c_int, line: *const c_char) {
  if line.is_null() {
    return;
  }
  let line = unsafe { CStr::from_ptr(line) }.to_string_lossy();

  let sink = match SINK.read() {
    Ok(guard) => guard.clone(),
    Err(_) => return,
  };
  if let Some(sink) = sink {
    // never unwind into C
    let _ = catch_unwind(AssertUnwindSafe(|| sink(&line, level)));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::avutil::av_log;
  use std::sync::Mutex;

  #[test]
  fn test_level_values() {
    assert_eq!(LogLevel::Quiet.as_raw(), -8);
    assert_eq!(LogLevel::Panic.as_raw(), 0);
    assert_eq!(LogLevel::Fatal.as_raw(), 8);
    assert_eq!(LogLevel::Error.as_raw(), 16);
    assert_eq!(LogLevel::Warning.as_raw(), 24);
    assert_eq!(LogLevel::Info.as_raw(), 32);
    assert_eq!(LogLevel::Verbose.as_raw(), 40);
    assert_eq!(LogLevel::Debug.as_raw(), 48);
    assert_eq!(LogLevel::Trace.as_raw(), 56);
    assert_eq!(LogLevel::All.as_raw(), 64);
    assert_eq!(LogLevel::default(), LogLevel::Verbose);
  }

  #[test]
  fn test_level_from_raw() {
    assert_eq!(LogLevel::from_raw(24), Some(LogLevel::Warning));
    assert_eq!(LogLevel::from_raw(64), Some(LogLevel::All));
    assert_eq!(LogLevel::from_raw(33), None);
    assert!(LogLevel::Error < LogLevel::Debug);
  }

  #[test]
  fn test_flags() {
    assert_eq!(LogFlags::NONE.bits(), 0);
    assert_eq!(LogFlags::default(), LogFlags::PRINT_LEVEL);

    let mut flags = LogFlags::NONE;
    flags |= LogFlags::SKIP_REPEATED;
    assert!(flags.contains(LogFlags::SKIP_REPEATED));
    assert!(!flags.contains(LogFlags::PRINT_LEVEL));
    assert_eq!((flags | LogFlags::PRINT_LEVEL).bits(), 3);
  }

  // The only test touching the global FFmpeg logger
  #[test]
  fn test_setup_logging_routes_lines() {
    let lines = Arc::new(Mutex::new(Vec::<(String, i32)>::new()));
    let captured = lines.clone();
    let sink: LogSink = Arc::new(move |line: &str, level: i32| {
      captured.lock().unwrap().push((line.to_string(), level));
    });

    setup_logging(LogLevel::Warning, LogFlags::SKIP_REPEATED, Some(sink));
    assert_eq!(LogLevel::current(), Some(LogLevel::Warning));
    assert_eq!(LogFlags::current(), LogFlags::SKIP_REPEATED);

    unsafe {
      av_log(
        std::ptr::null_mut(),
        log_level::ERROR,
        c"grabber routed line %d\n".as_ptr(),
        7 as c_int,
      );
      av_log(
        std::ptr::null_mut(),
        log_level::DEBUG,
        c"grabber filtered line\n".as_ptr(),
      );
    }

    setup_logging(LogLevel::default(), LogFlags::default(), None);
    assert_eq!(LogFlags::current(), LogFlags::PRINT_LEVEL);

    let lines = lines.lock().unwrap();
    assert!(lines
      .iter()
      .any(|(line, level)| line.contains("grabber routed line 7") && *level == log_level::ERROR));
    assert!(!lines.iter().any(|(line, _)| line.contains("grabber filtered line")));
  }
}
