//! FFmpeg error handling
//!
//! Every negative status returned by FFmpeg becomes an [`FFmpegError`] carrying
//! the code and FFmpeg's own description of it.

use std::ffi::CStr;
use std::fmt;
use std::os::raw::{c_char, c_int};

// ============================================================================
// FFmpeg Error Codes
// ============================================================================

/// End of file / stream reached
pub const AVERROR_EOF: c_int = fferrtag(b'E', b'O', b'F', b' ');

/// Invalid data found when processing input
pub const AVERROR_INVALIDDATA: c_int = fferrtag(b'I', b'N', b'D', b'A');

// POSIX error codes (negated) - platform specific

/// Resource temporarily unavailable (try again)
/// Linux: EAGAIN = 11, macOS: EAGAIN = 35
#[cfg(target_os = "macos")]
pub const AVERROR_EAGAIN: c_int = -35;

#[cfg(not(target_os = "macos"))]
pub const AVERROR_EAGAIN: c_int = -11;

/// No such file or directory
pub const AVERROR_ENOENT: c_int = -2;

/// Invalid argument
pub const AVERROR_EINVAL: c_int = -22;

/// Size of the buffer handed to `av_strerror`
const ERROR_BUF_SIZE: usize = 256;

/// Create FFmpeg error tag from 4 bytes
const fn fferrtag(a: u8, b: u8, c: u8, d: u8) -> c_int {
  -((a as c_int) | ((b as c_int) << 8) | ((c as c_int) << 16) | ((d as c_int) << 24))
}

// ============================================================================
// FFmpeg Error Type
// ============================================================================

/// FFmpeg error with code and message
#[derive(Clone, PartialEq, Eq)]
pub struct FFmpegError {
  /// Error code (negative)
  pub code: c_int,
  /// Human-readable message rendered by FFmpeg
  pub message: String,
}

impl FFmpegError {
  /// Create error from FFmpeg error code
  pub fn from_code(code: c_int) -> Self {
    Self {
      code,
      message: get_error_message(code),
    }
  }

  /// Create error with custom message
  pub fn new(code: c_int, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
    }
  }

  /// Resource temporarily unavailable, the decoder wants more input
  #[inline]
  pub fn is_eagain(&self) -> bool {
    self.code == AVERROR_EAGAIN
  }

  /// End of input
  #[inline]
  pub fn is_eof(&self) -> bool {
    self.code == AVERROR_EOF
  }
}

impl fmt::Debug for FFmpegError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FFmpegError")
      .field("code", &self.code)
      .field("message", &self.message)
      .finish()
  }
}

impl fmt::Display for FFmpegError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "FFmpeg error {}: {}", self.code, self.message)
  }
}

impl std::error::Error for FFmpegError {}

/// Result type for FFmpeg operations
pub type FFmpegResult<T> = Result<T, FFmpegError>;

// ============================================================================
// Error Checking
// ============================================================================

/// Check FFmpeg return code and convert to Result
///
/// Returns Ok with the value if >= 0, Err with FFmpegError if < 0
#[inline]
pub fn check_error(ret: c_int) -> FFmpegResult<c_int> {
  if ret < 0 {
    Err(FFmpegError::from_code(ret))
  } else {
    Ok(ret)
  }
}

/// Check FFmpeg return code, ignoring EAGAIN
///
/// Returns Ok(Some(value)) if >= 0, Ok(None) if EAGAIN, Err otherwise
#[inline]
pub fn check_error_except_eagain(ret: c_int) -> FFmpegResult<Option<c_int>> {
  if ret >= 0 {
    Ok(Some(ret))
  } else if ret == AVERROR_EAGAIN {
    Ok(None)
  } else {
    Err(FFmpegError::from_code(ret))
  }
}

/// Check FFmpeg return code, ignoring EOF
///
/// Returns Ok(Some(value)) if >= 0, Ok(None) if EOF, Err otherwise
#[inline]
pub fn check_error_except_eof(ret: c_int) -> FFmpegResult<Option<c_int>> {
  if ret >= 0 {
    Ok(Some(ret))
  } else if ret == AVERROR_EOF {
    Ok(None)
  } else {
    Err(FFmpegError::from_code(ret))
  }
}

/// Get error message for an FFmpeg error code
pub fn get_error_message(code: c_int) -> String {
  let mut buf = [0 as c_char; ERROR_BUF_SIZE];
  unsafe {
    // av_strerror always writes a NUL-terminated fallback when the code is unknown
    super::avutil::av_strerror(code, buf.as_mut_ptr(), buf.len());
    CStr::from_ptr(buf.as_ptr()).to_string_lossy().into_owned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_codes() {
    assert!(AVERROR_EOF < 0);
    assert!(AVERROR_EAGAIN < 0);
    assert!(AVERROR_EINVAL < 0);
    assert_eq!(AVERROR_EOF, -0x2046_4f45);
  }

  #[test]
  fn test_check_error() {
    assert!(check_error(0).is_ok());
    assert!(check_error(100).is_ok());
    assert!(check_error(-1).is_err());
    assert!(check_error(AVERROR_EAGAIN).is_err());
  }

  #[test]
  fn test_check_error_carries_code() {
    let err = check_error(AVERROR_EINVAL).unwrap_err();
    assert_eq!(err.code, AVERROR_EINVAL);
    assert!(!err.message.is_empty());
  }

  #[test]
  fn test_check_error_except_eagain() {
    assert_eq!(check_error_except_eagain(0).unwrap(), Some(0));
    assert_eq!(check_error_except_eagain(AVERROR_EAGAIN).unwrap(), None);
    assert!(check_error_except_eagain(AVERROR_EINVAL).is_err());
    assert!(check_error_except_eagain(AVERROR_EOF).is_err());
  }

  #[test]
  fn test_check_error_except_eof() {
    assert_eq!(check_error_except_eof(3).unwrap(), Some(3));
    assert_eq!(check_error_except_eof(AVERROR_EOF).unwrap(), None);
    assert!(check_error_except_eof(AVERROR_EAGAIN).is_err());
  }

  #[test]
  fn test_messages_come_from_ffmpeg() {
    assert_eq!(get_error_message(AVERROR_EOF), "End of file");
    assert_eq!(
      get_error_message(AVERROR_INVALIDDATA),
      "Invalid data found when processing input"
    );
  }

  #[test]
  fn test_transient_predicates() {
    assert!(FFmpegError::from_code(AVERROR_EAGAIN).is_eagain());
    assert!(FFmpegError::from_code(AVERROR_EOF).is_eof());
    assert!(!FFmpegError::new(AVERROR_EINVAL, "x").is_eof());
  }
}
