//! libavformat function declarations
//!
//! Provides demuxing functionality for network streams and container formats.

use super::types::*;
use std::os::raw::{c_char, c_int};

unsafe extern "C" {
  /// Allocate an AVFormatContext
  ///
  /// Freed by avformat_open_input() on failure, by avformat_close_input() otherwise
  pub fn avformat_alloc_context() -> *mut AVFormatContext;

  /// Initialize network components (rtsp, rtp, tcp, ...)
  ///
  /// Optional since FFmpeg 4, still honoured when present.
  pub fn avformat_network_init() -> c_int;

  // ========================================================================
  // Input Context (Demuxing)
  // ========================================================================

  /// Open an input stream and read the header
  ///
  /// # Arguments
  /// * `ps` - Pointer to a context allocated by avformat_alloc_context, or NULL
  /// * `url` - URL to open ("rtsp://...", "udp://...", a local path)
  /// * `fmt` - Input format (NULL for auto-detect)
  /// * `options` - Demuxer/protocol options. On return, holds the entries that were not consumed
  ///
  /// # Returns
  /// * 0 on success
  /// * Negative AVERROR on error. A user-supplied context is freed and *ps set to NULL.
  pub fn avformat_open_input(
    ps: *mut *mut AVFormatContext,
    url: *const c_char,
    fmt: *const AVInputFormat,
    options: *mut *mut AVDictionary,
  ) -> c_int;

  /// Close an opened input AVFormatContext
  ///
  /// Frees the context and all its contents and sets *s to NULL.
  pub fn avformat_close_input(s: *mut *mut AVFormatContext);

  /// Read packets of a media file to get stream information
  ///
  /// # Returns
  /// * >= 0 on success
  /// * AVERROR_xxx on failure
  pub fn avformat_find_stream_info(
    ic: *mut AVFormatContext,
    options: *mut *mut AVDictionary,
  ) -> c_int;

  /// Find the "best" stream in the file
  ///
  /// # Arguments
  /// * `ic` - Format context
  /// * `type_` - Stream type (AVMEDIA_TYPE_VIDEO, ...)
  /// * `wanted_stream_nb` - Desired stream number, or -1 for automatic
  /// * `related_stream` - Related stream for disposition check, or -1
  /// * `decoder_ret` - Pointer to receive the default decoder (can be NULL)
  /// * `flags` - Reserved (should be 0)
  ///
  /// # Returns
  /// * >= 0 on success (stream index)
  /// * AVERROR_STREAM_NOT_FOUND if not found
  /// * AVERROR_DECODER_NOT_FOUND if a stream exists but has no decoder
  pub fn av_find_best_stream(
    ic: *mut AVFormatContext,
    type_: c_int,
    wanted_stream_nb: c_int,
    related_stream: c_int,
    decoder_ret: *mut *const AVCodec,
    flags: c_int,
  ) -> c_int;

  /// Return the next packet of a stream
  ///
  /// # Returns
  /// * 0 on success
  /// * AVERROR_EOF at end of input
  /// * Negative AVERROR on error
  pub fn av_read_frame(s: *mut AVFormatContext, pkt: *mut AVPacket) -> c_int;
}
