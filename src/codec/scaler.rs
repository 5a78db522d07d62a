//! Safe wrapper around FFmpeg SwsContext
//!
//! Converts decoded pictures to a packed output format at the same size.

use crate::ffi::{
  avutil::pix_fmt_name,
  swscale::{
    is_input_supported, is_output_supported, sws_freeContext, sws_getContext, sws_scale,
    SWS_POINT,
  },
  AVPixelFormat, SwsContext,
};
use std::os::raw::c_int;
use std::ptr::NonNull;

use super::{CodecError, CodecResult, Frame};

/// Pixel format converter with identical source and destination dimensions
pub struct Scaler {
  ptr: NonNull<SwsContext>,
  width: u32,
  height: u32,
  src_format: c_int,
  dst_format: AVPixelFormat,
}

impl Scaler {
  /// Create a converter from `src_format` to `dst_format` at `width`x`height`
  ///
  /// `src_format` is a raw value since decoders may emit formats without a
  /// stable number. Fails with [`CodecError::ConversionUnavailable`] when
  /// swscale has no path for the pair.
  pub fn new_converter(
    width: u32,
    height: u32,
    src_format: c_int,
    dst_format: AVPixelFormat,
  ) -> CodecResult<Self> {
    if width == 0 || height == 0 {
      return Err(CodecError::ConversionUnavailable);
    }
    if !is_input_supported(src_format) || !is_output_supported(dst_format.as_raw()) {
      return Err(CodecError::ConversionUnavailable);
    }

    let ptr = unsafe {
      sws_getContext(
        width as c_int,
        height as c_int,
        src_format,
        width as c_int,
        height as c_int,
        dst_format.as_raw(),
        // same size, so no resampling filter is needed
        SWS_POINT,
        std::ptr::null_mut(),
        std::ptr::null_mut(),
        std::ptr::null(),
      )
    };

    NonNull::new(ptr)
      .map(|ptr| Self {
        ptr,
        width,
        height,
        src_format,
        dst_format,
      })
      .ok_or(CodecError::ConversionUnavailable)
  }

  /// Whether this converter was built for this source geometry and format
  pub fn accepts(&self, width: u32, height: u32, src_format: c_int) -> bool {
    width == self.width && height == self.height && src_format == self.src_format
  }

  /// Convert `src` into a newly allocated frame in the destination format
  pub fn convert(&self, src: &Frame) -> CodecResult<Frame> {
    if src.width() != self.width || src.height() != self.height {
      return Err(CodecError::InvalidConfig(format!(
        "Frame size {}x{} doesn't match converter size {}x{}",
        src.width(),
        src.height(),
        self.width,
        self.height
      )));
    }

    let dst = Frame::new_video(self.width, self.height, self.dst_format)?;

    let rows = unsafe {
      sws_scale(
        self.ptr.as_ptr(),
        src.planes(),
        src.linesizes(),
        0,
        self.height as c_int,
        dst.planes() as *const *mut u8,
        dst.linesizes(),
      )
    };

    if rows != self.height as c_int {
      return Err(CodecError::InvalidConfig(format!(
        "Conversion produced {} rows instead of {}",
        rows, self.height
      )));
    }

    Ok(dst)
  }

}

impl Drop for Scaler {
  fn drop(&mut self) {
    unsafe { sws_freeContext(self.ptr.as_ptr()) }
  }
}

// Scaler is Send but not Sync
unsafe impl Send for Scaler {}

impl std::fmt::Debug for Scaler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Scaler")
      .field("width", &self.width)
      .field("height", &self.height)
      .field("src_format", &pix_fmt_name(self.src_format))
      .field("dst_format", &self.dst_format)
      .finish()
  }
}
