//! Grabber error types
//!
//! Two families: sequencing errors (wrong state for the call) and media
//! errors (anything FFmpeg or the pipeline reports).

use crate::codec::CodecError;

/// Frame construction failures, one per violated precondition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
  #[error("Frame data must not be empty")]
  EmptyData,

  #[error("Frame width must be greater than zero")]
  ZeroWidth,

  #[error("Frame height must be greater than zero")]
  ZeroHeight,

  #[error("Frame data of {len} bytes does not hold {height} rows of at least {min_stride} bytes")]
  RaggedData {
    len: usize,
    height: u32,
    min_stride: usize,
  },
}

/// Grabber error type
#[derive(Debug, thiserror::Error)]
pub enum GrabberError {
  /// The session is in the wrong state for the call
  #[error("{0}")]
  InvalidState(&'static str),

  #[error(transparent)]
  Media(#[from] CodecError),

  #[error(transparent)]
  InvalidFrame(#[from] FrameError),
}

impl GrabberError {
  pub(crate) const ALREADY_OPEN: Self = GrabberError::InvalidState("Stream is already open");
  pub(crate) const NOT_OPEN: Self = GrabberError::InvalidState("Stream is not open");

  /// Native FFmpeg status code, when the failure came from FFmpeg
  pub fn code(&self) -> Option<i32> {
    match self {
      GrabberError::Media(e) => e.native_code(),
      _ => None,
    }
  }

  pub fn is_invalid_state(&self) -> bool {
    matches!(self, GrabberError::InvalidState(_))
  }
}

impl From<crate::ffi::FFmpegError> for GrabberError {
  fn from(err: crate::ffi::FFmpegError) -> Self {
    GrabberError::Media(CodecError::Ffmpeg(err))
  }
}

pub type GrabberResult<T> = Result<T, GrabberError>;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::{error::AVERROR_INVALIDDATA, FFmpegError};

  #[test]
  fn test_sequencing_errors_have_no_code() {
    assert!(GrabberError::ALREADY_OPEN.is_invalid_state());
    assert_eq!(GrabberError::NOT_OPEN.code(), None);
    assert_eq!(GrabberError::NOT_OPEN.to_string(), "Stream is not open");
  }

  #[test]
  fn test_native_errors_carry_code() {
    let err: GrabberError = FFmpegError::from_code(AVERROR_INVALIDDATA).into();
    assert!(!err.is_invalid_state());
    assert_eq!(err.code(), Some(AVERROR_INVALIDDATA));
    assert!(err.to_string().contains("Invalid data found"));
  }

  #[test]
  fn test_domain_errors_have_no_code() {
    let err: GrabberError = CodecError::ConversionUnavailable.into();
    assert_eq!(err.code(), None);
    assert_eq!(err.to_string(), "Unable to obtain a valid conversion context");
  }
}
