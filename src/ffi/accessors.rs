//! Rust declarations for C accessor functions
//!
//! These functions provide access to FFmpeg struct fields via the thin C accessor library.

use super::types::*;
use std::os::raw::{c_char, c_int, c_uint};

/// Signature of the Rust side of the log trampoline
///
/// Receives the already formatted line and its level.
pub type FfLogLineFn = unsafe extern "C" fn(level: c_int, line: *const c_char);

unsafe extern "C" {
  // ========================================================================
  // AVCodecContext
  // ========================================================================

  pub fn ffctx_get_width(ctx: *const AVCodecContext) -> c_int;
  pub fn ffctx_get_height(ctx: *const AVCodecContext) -> c_int;
  pub fn ffctx_get_pix_fmt(ctx: *const AVCodecContext) -> c_int;
  pub fn ffctx_set_pix_fmt(ctx: *mut AVCodecContext, pix_fmt: c_int);
  pub fn ffctx_get_codec_id(ctx: *const AVCodecContext) -> c_int;

  /// Takes a new reference to `hw_device_ctx`; the caller keeps its own
  pub fn ffctx_set_hw_device_ctx(ctx: *mut AVCodecContext, hw_device_ctx: *mut AVBufferRef) -> c_int;

  /// Closes the decoder on FFmpeg releases that still export avcodec_close
  pub fn ffctx_close(ctx: *mut AVCodecContext);

  // ========================================================================
  // AVCodec
  // ========================================================================

  pub fn ffcodec_get_type(codec: *const AVCodec) -> c_int;
  pub fn ffcodec_get_id(codec: *const AVCodec) -> c_int;
  pub fn ffcodec_get_name(codec: *const AVCodec) -> *const c_char;

  // ========================================================================
  // AVFormatContext / AVStream
  // ========================================================================

  pub fn fffmt_get_nb_streams(ctx: *const AVFormatContext) -> c_uint;
  pub fn fffmt_get_stream(ctx: *const AVFormatContext, index: c_uint) -> *mut AVStream;
  pub fn ffstream_get_codecpar_const(stream: *const AVStream) -> *const AVCodecParameters;

  // ========================================================================
  // AVFrame
  // ========================================================================

  pub fn ffframe_set_width(frame: *mut AVFrame, width: c_int);
  pub fn ffframe_set_height(frame: *mut AVFrame, height: c_int);
  pub fn ffframe_set_format(frame: *mut AVFrame, format: c_int);
  pub fn ffframe_get_width(frame: *const AVFrame) -> c_int;
  pub fn ffframe_get_height(frame: *const AVFrame) -> c_int;
  pub fn ffframe_get_format(frame: *const AVFrame) -> c_int;
  pub fn ffframe_data_const(frame: *const AVFrame, plane: c_int) -> *const u8;
  pub fn ffframe_linesize(frame: *const AVFrame, plane: c_int) -> c_int;
  /// Base of the `data[AV_NUM_DATA_POINTERS]` array
  pub fn ffframe_data_planes(frame: *const AVFrame) -> *const *const u8;
  /// Base of the `linesize[AV_NUM_DATA_POINTERS]` array
  pub fn ffframe_linesizes(frame: *const AVFrame) -> *const c_int;
  pub fn ffframe_has_hw_frames_ctx(frame: *const AVFrame) -> c_int;

  // ========================================================================
  // AVPacket
  // ========================================================================

  pub fn ffpkt_stream_index(pkt: *const AVPacket) -> c_int;
  pub fn ffpkt_size(pkt: *const AVPacket) -> c_int;

  // ========================================================================
  // Logging
  // ========================================================================

  /// Route av_log through the C trampoline into `sink`
  pub fn fflog_install(sink: FfLogLineFn);
  /// Restore av_log_default_callback
  pub fn fflog_restore_default();
}
