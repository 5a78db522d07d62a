//! libavcodec function declarations
//!
//! Provides decoding functionality.

use super::types::*;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};

unsafe extern "C" {
  // ========================================================================
  // Codec Discovery
  // ========================================================================

  /// Find a decoder by name (e.g., "h264_cuvid", "hevc_qsv")
  pub fn avcodec_find_decoder_by_name(name: *const c_char) -> *const AVCodec;

  // ========================================================================
  // Codec Context Lifecycle
  // ========================================================================

  /// Allocate an AVCodecContext and set its fields to default values
  pub fn avcodec_alloc_context3(codec: *const AVCodec) -> *mut AVCodecContext;

  /// Free the codec context and everything associated with it
  pub fn avcodec_free_context(avctx: *mut *mut AVCodecContext);

  /// Initialize the AVCodecContext to use the given AVCodec
  pub fn avcodec_open2(
    avctx: *mut AVCodecContext,
    codec: *const AVCodec,
    options: *mut *mut AVDictionary,
  ) -> c_int;

  /// Fill the codec context based on the values from the supplied codec parameters
  pub fn avcodec_parameters_to_context(
    codec: *mut AVCodecContext,
    par: *const AVCodecParameters,
  ) -> c_int;

  // ========================================================================
  // Decoding (send packet, receive frame)
  // ========================================================================

  /// Supply raw packet data to the decoder
  ///
  /// # Returns
  /// * 0 on success
  /// * AVERROR(EAGAIN) - output not available, must read with receive_frame first
  /// * AVERROR_EOF - decoder has been flushed
  /// * AVERROR(EINVAL) - codec not opened
  /// * AVERROR(ENOMEM) - failed to add packet to queue
  pub fn avcodec_send_packet(avctx: *mut AVCodecContext, avpkt: *const AVPacket) -> c_int;

  /// Return decoded output data from the decoder
  ///
  /// # Returns
  /// * 0 on success
  /// * AVERROR(EAGAIN) - output not available, must send more input
  /// * AVERROR_EOF - decoder has been fully flushed
  /// * AVERROR(EINVAL) - codec not opened
  pub fn avcodec_receive_frame(avctx: *mut AVCodecContext, frame: *mut AVFrame) -> c_int;

  // ========================================================================
  // Packet Management
  // ========================================================================

  /// Allocate an AVPacket and set its fields to default values
  pub fn av_packet_alloc() -> *mut AVPacket;

  /// Free the packet, if the packet is reference counted, it will be unreferenced first
  pub fn av_packet_free(pkt: *mut *mut AVPacket);

  /// Wipe the packet. Unreference the buffer and reset fields to defaults
  pub fn av_packet_unref(pkt: *mut AVPacket);

  // ========================================================================
  // Codec Descriptors
  // ========================================================================

  /// Get the name of a codec ID ("h264", "hevc", ...)
  pub fn avcodec_get_name(id: c_int) -> *const c_char;
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Find decoder by name
///
/// Names containing an interior NUL can never match, so they resolve to NULL.
pub fn find_decoder_by_name(name: &str) -> *const AVCodec {
  match CString::new(name) {
    Ok(c_name) => unsafe { avcodec_find_decoder_by_name(c_name.as_ptr()) },
    Err(_) => std::ptr::null(),
  }
}

/// Get the canonical name of a codec ID
pub fn codec_name(id: c_int) -> String {
  let ptr = unsafe { avcodec_get_name(id) };
  if ptr.is_null() {
    return String::from("unknown");
  }
  unsafe { std::ffi::CStr::from_ptr(ptr) }
    .to_string_lossy()
    .into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_find_decoder_by_name() {
    assert!(!find_decoder_by_name("rawvideo").is_null());
    assert!(find_decoder_by_name("definitely_not_a_decoder").is_null());
    assert!(find_decoder_by_name("bad\0name").is_null());
  }
}
