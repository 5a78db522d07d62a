//! Safe Rust wrappers for FFmpeg demux/decode/convert operations
//!
//! This module provides RAII wrappers around FFmpeg's C structures,
//! ensuring proper resource cleanup and memory safety.

pub mod context;
pub mod decoder;
pub mod demuxer;
pub mod dictionary;
pub mod frame;
pub mod hwdevice;
pub mod packet;
pub mod scaler;

pub use context::CodecContext;
pub use decoder::Decoder;
pub use demuxer::{BestStream, DemuxerContext, ReadOutcome};
pub use dictionary::Dictionary;
pub use frame::Frame;
pub use hwdevice::HwDeviceContext;
pub use packet::Packet;
pub use scaler::Scaler;

/// Codec error type
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
  #[error(transparent)]
  Ffmpeg(#[from] crate::ffi::FFmpegError),

  #[error("Hardware accelerated codec '{0}' not found")]
  DecoderNotFound(String),

  #[error("Hardware accelerated codec '{0}' not found (not a video decoder)")]
  NotVideoDecoder(String),

  #[error("No decodable video stream found")]
  StreamNotFound,

  #[error("Failed to allocate {0}")]
  AllocationFailed(&'static str),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Hardware acceleration error: {0}")]
  HardwareError(String),

  #[error("Unable to obtain a valid conversion context")]
  ConversionUnavailable,
}

impl CodecError {
  /// Native FFmpeg status code behind this error, if there is one
  pub fn native_code(&self) -> Option<i32> {
    match self {
      CodecError::Ffmpeg(e) => Some(e.code),
      _ => None,
    }
  }
}

pub type CodecResult<T> = Result<T, CodecError>;
