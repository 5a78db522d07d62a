#![deny(clippy::all)]

//! RTSP frame grabber for Node.js
//!
//! Opens a network video stream with FFmpeg, decodes its best video track
//! (optionally on a hardware decoder) and hands out frames one at a time as
//! packed RGB24.

// FFmpeg C bindings (hand-written, no bindgen)
pub mod ffi;

// Safe codec wrappers (RAII)
pub mod codec;

// Stream session, frame value, hardware accelerator resolution
pub mod grabber;

// FFmpeg log routing
pub mod logging;

// Node.js API surface (NAPI classes)
pub mod node;

pub use grabber::{
  FrameError, FrameGrabber, FrameSize, GrabberError, GrabberResult, HwAccelKind, PixelFormat,
  RgbFrame, SessionInfo,
};
pub use logging::{setup_logging, LogFlags, LogLevel, LogSink};
pub use node::{enable_tracing, RtspFrameGrabber};
