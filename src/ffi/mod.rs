//! Hand-written FFmpeg C bindings (no bindgen)
//!
//! Only the demux/decode/convert path is declared. All FFmpeg structs are opaque;
//! fields are reached through the thin C accessor library.

pub mod accessors;
pub mod avcodec;
pub mod avformat;
pub mod avutil;
pub mod error;
pub mod hwaccel;
pub mod swscale;
pub mod types;

pub use error::{check_error, FFmpegError, FFmpegResult};
pub use types::*;
