//! Decoder descriptors
//!
//! An AVCodec is a static, process-lifetime descriptor owned by libavcodec,
//! so a [`Decoder`] is a plain copyable handle with no cleanup.

use crate::ffi::{
  accessors::{ffcodec_get_id, ffcodec_get_name, ffcodec_get_type},
  avcodec::find_decoder_by_name,
  types::media_type,
  AVCodec,
};
use std::ffi::CStr;
use std::ptr::NonNull;

/// Handle to a decoder implementation registered in libavcodec
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
  ptr: NonNull<AVCodec>,
}

impl Decoder {
  /// Look up a decoder by its exact registered name ("h264", "h264_cuvid", ...)
  pub fn find_by_name(name: &str) -> Option<Self> {
    Self::from_raw(find_decoder_by_name(name))
  }

  pub(crate) fn from_raw(ptr: *const AVCodec) -> Option<Self> {
    NonNull::new(ptr as *mut AVCodec).map(|ptr| Self { ptr })
  }

  /// Registered name of the implementation
  pub fn name(&self) -> String {
    let ptr = unsafe { ffcodec_get_name(self.as_ptr()) };
    if ptr.is_null() {
      return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
  }

  /// AVCodecID implemented by this decoder
  pub fn codec_id(&self) -> i32 {
    unsafe { ffcodec_get_id(self.as_ptr()) }
  }

  /// Whether this decoder produces video frames
  pub fn is_video(&self) -> bool {
    unsafe { ffcodec_get_type(self.as_ptr()) == media_type::VIDEO }
  }

  #[inline]
  pub fn as_ptr(&self) -> *const AVCodec {
    self.ptr.as_ptr()
  }
}

// SAFETY: AVCodec descriptors are immutable static data
unsafe impl Send for Decoder {}
unsafe impl Sync for Decoder {}

impl std::fmt::Debug for Decoder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Decoder")
      .field("name", &self.name())
      .field("codec_id", &self.codec_id())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rawvideo_decoder() {
    let decoder = Decoder::find_by_name("rawvideo").unwrap();
    assert_eq!(decoder.name(), "rawvideo");
    assert!(decoder.is_video());
  }

  #[test]
  fn test_audio_decoder_is_not_video() {
    let decoder = Decoder::find_by_name("pcm_s16le").unwrap();
    assert!(!decoder.is_video());
  }

  #[test]
  fn test_unknown_decoder() {
    assert!(Decoder::find_by_name("no_such_decoder_cuvid").is_none());
  }
}
