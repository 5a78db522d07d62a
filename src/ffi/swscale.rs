//! libswscale function declarations
//!
//! Provides pixel format conversion.

use super::types::*;
use std::os::raw::c_int;

unsafe extern "C" {
  /// Allocate and return an SwsContext
  ///
  /// # Arguments
  /// * `srcW` - Source width
  /// * `srcH` - Source height
  /// * `srcFormat` - Source pixel format
  /// * `dstW` - Destination width
  /// * `dstH` - Destination height
  /// * `dstFormat` - Destination pixel format
  /// * `flags` - Scaling algorithm flags (SWS_*)
  /// * `srcFilter` - Source filter (NULL for none)
  /// * `dstFilter` - Destination filter (NULL for none)
  /// * `param` - Extra parameters for scaling algorithm (NULL for defaults)
  ///
  /// Returns NULL when the format pair is unsupported.
  pub fn sws_getContext(
    srcW: c_int,
    srcH: c_int,
    srcFormat: c_int,
    dstW: c_int,
    dstH: c_int,
    dstFormat: c_int,
    flags: c_int,
    srcFilter: *mut SwsFilter,
    dstFilter: *mut SwsFilter,
    param: *const f64,
  ) -> *mut SwsContext;

  /// Free the swscaler context
  pub fn sws_freeContext(swsContext: *mut SwsContext);

  /// Scale the image slice in srcSlice and put the resulting scaled
  /// slice in the image in dst
  ///
  /// # Returns
  /// Height of the output slice
  pub fn sws_scale(
    c: *mut SwsContext,
    srcSlice: *const *const u8,
    srcStride: *const c_int,
    srcSliceY: c_int,
    srcSliceH: c_int,
    dst: *const *mut u8,
    dstStride: *const c_int,
  ) -> c_int;

  /// Non-zero if the pixel format is a supported input format
  pub fn sws_isSupportedInput(pix_fmt: c_int) -> c_int;

  /// Non-zero if the pixel format is a supported output format
  pub fn sws_isSupportedOutput(pix_fmt: c_int) -> c_int;
}

/// Opaque SwsFilter
#[repr(C)]
pub struct SwsFilter {
  _opaque: [u8; 0],
}

/// Nearest neighbor
pub const SWS_POINT: c_int = 0x10;

/// Check if a pixel format can be converted from
pub fn is_input_supported(format: c_int) -> bool {
  unsafe { sws_isSupportedInput(format) != 0 }
}

/// Check if a pixel format can be converted to
pub fn is_output_supported(format: c_int) -> bool {
  unsafe { sws_isSupportedOutput(format) != 0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rgb24_conversion_supported() {
    assert!(is_input_supported(AVPixelFormat::Yuv420p.as_raw()));
    assert!(is_output_supported(AVPixelFormat::Rgb24.as_raw()));
  }
}
