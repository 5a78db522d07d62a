//! libavutil function declarations
//!
//! Frames, reference-counted buffers, option dictionaries, error strings and logging.

use super::types::*;
use std::os::raw::{c_char, c_int};

unsafe extern "C" {
  // ========================================================================
  // Frame Management
  // ========================================================================

  /// Allocate an AVFrame and set its fields to default values
  pub fn av_frame_alloc() -> *mut AVFrame;

  /// Free the frame and any dynamically allocated objects in it
  pub fn av_frame_free(frame: *mut *mut AVFrame);

  /// Unreference all buffers referenced by frame and reset to defaults
  pub fn av_frame_unref(frame: *mut AVFrame);

  /// Allocate new buffers for video data based on frame format/dimensions
  ///
  /// # Arguments
  /// * `frame` - Frame with format, width, height set
  /// * `align` - Buffer size alignment (0 for default, 32 recommended for SIMD)
  pub fn av_frame_get_buffer(frame: *mut AVFrame, align: c_int) -> c_int;

  // ========================================================================
  // Buffer Reference Management
  // ========================================================================

  /// Free a given reference and automatically free the buffer if no more refs
  pub fn av_buffer_unref(buf: *mut *mut AVBufferRef);

  // ========================================================================
  // Pixel Format Descriptors
  // ========================================================================

  /// Short name of a pixel format ("yuv420p", "cuda", ...), NULL if unknown
  pub fn av_get_pix_fmt_name(pix_fmt: c_int) -> *const c_char;

  // ========================================================================
  // Error Handling
  // ========================================================================

  /// Put a description of the AVERROR code errnum in errbuf
  ///
  /// # Returns
  /// 0 on success, negative if no description was found
  pub fn av_strerror(errnum: c_int, errbuf: *mut c_char, errbuf_size: usize) -> c_int;

  // ========================================================================
  // Dictionary (Options)
  // ========================================================================

  /// Set an entry in the dictionary, allocating it on first use
  pub fn av_dict_set(
    pm: *mut *mut AVDictionary,
    key: *const c_char,
    value: *const c_char,
    flags: c_int,
  ) -> c_int;

  /// Free all memory allocated for an AVDictionary and set the pointer to NULL
  pub fn av_dict_free(m: *mut *mut AVDictionary);

  /// Number of entries in the dictionary
  pub fn av_dict_count(m: *const AVDictionary) -> c_int;

  // ========================================================================
  // Logging
  // ========================================================================

  /// Set the logging level
  pub fn av_log_set_level(level: c_int);

  /// Get the current logging level
  pub fn av_log_get_level() -> c_int;

  /// Set the logging flags (AV_LOG_SKIP_REPEATED, AV_LOG_PRINT_LEVEL)
  pub fn av_log_set_flags(flags: c_int);

  /// Get the current logging flags
  pub fn av_log_get_flags() -> c_int;

  /// Emit a log line through the installed callback
  pub fn av_log(avcl: *mut std::ffi::c_void, level: c_int, fmt: *const c_char, ...);
}

// ============================================================================
// Logging Levels
// ============================================================================

pub mod log_level {
  use std::os::raw::c_int;

  pub const QUIET: c_int = -8;
  pub const PANIC: c_int = 0;
  pub const FATAL: c_int = 8;
  pub const ERROR: c_int = 16;
  pub const WARNING: c_int = 24;
  pub const INFO: c_int = 32;
  pub const VERBOSE: c_int = 40;
  pub const DEBUG: c_int = 48;
  pub const TRACE: c_int = 56;
  /// AV_LOG_MAX_OFFSET, everything including trace
  pub const MAX_OFFSET: c_int = TRACE - QUIET;
}

pub mod log_flag {
  use std::os::raw::c_int;

  pub const SKIP_REPEATED: c_int = 1;
  pub const PRINT_LEVEL: c_int = 2;
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Get the FFmpeg name of a pixel format
pub fn pix_fmt_name(pix_fmt: c_int) -> Option<String> {
  let ptr = unsafe { av_get_pix_fmt_name(pix_fmt) };
  if ptr.is_null() {
    None
  } else {
    Some(
      unsafe { std::ffi::CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned(),
    )
  }
}
