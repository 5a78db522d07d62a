//! Safe wrapper around FFmpeg hardware device context
//!
//! Provides hardware acceleration device management for CUDA, VAAPI, QSV, VideoToolbox, etc.

use crate::ffi::{
  self,
  avutil::av_buffer_unref,
  hwaccel::{av_hwdevice_ctx_create, get_hwdevice_type_name, is_hwdevice_available},
  AVBufferRef, AVHWDeviceType,
};
use std::ptr::NonNull;

use super::{CodecError, CodecResult};

/// Safe wrapper around FFmpeg hardware device context
pub struct HwDeviceContext {
  ptr: NonNull<AVBufferRef>,
  device_type: AVHWDeviceType,
}

impl HwDeviceContext {
  /// Create a hardware device context on the default device
  ///
  /// Failure is reported as-is; there is no software fallback at this level.
  pub fn new(device_type: AVHWDeviceType) -> CodecResult<Self> {
    if device_type == AVHWDeviceType::None {
      return Err(CodecError::HardwareError(
        "Cannot create a device context without a device type".into(),
      ));
    }

    if !is_hwdevice_available(device_type) {
      return Err(CodecError::HardwareError(format!(
        "{} is not supported by this FFmpeg build",
        get_hwdevice_type_name(device_type).unwrap_or("Device type")
      )));
    }

    let mut device_ctx: *mut AVBufferRef = std::ptr::null_mut();

    let ret = unsafe {
      av_hwdevice_ctx_create(
        &mut device_ctx,
        device_type.as_raw(),
        std::ptr::null(),     // Use default device
        std::ptr::null_mut(), // No options
        0,                    // Flags
      )
    };

    ffi::check_error(ret)?;

    NonNull::new(device_ctx)
      .map(|ptr| Self { ptr, device_type })
      .ok_or(CodecError::HardwareError(
        "Failed to create hardware device context".into(),
      ))
  }

  /// Get the raw pointer
  #[inline]
  pub fn as_ptr(&self) -> *mut AVBufferRef {
    self.ptr.as_ptr()
  }

  /// Get the device type
  #[inline]
  pub fn device_type(&self) -> AVHWDeviceType {
    self.device_type
  }

  /// Get device type name
  pub fn device_name(&self) -> &'static str {
    get_hwdevice_type_name(self.device_type).unwrap_or("unknown")
  }
}

impl Drop for HwDeviceContext {
  fn drop(&mut self) {
    unsafe {
      let mut ptr = self.ptr.as_ptr();
      av_buffer_unref(&mut ptr);
    }
  }
}

// Hardware device contexts are reference counted and can be shared across threads
unsafe impl Send for HwDeviceContext {}
unsafe impl Sync for HwDeviceContext {}

impl std::fmt::Debug for HwDeviceContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HwDeviceContext")
      .field("type", &self.device_type)
      .field("name", &self.device_name())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_none_device_is_rejected() {
    let err = HwDeviceContext::new(AVHWDeviceType::None).unwrap_err();
    assert!(matches!(err, CodecError::HardwareError(_)));
  }

  #[test]
  #[cfg(target_os = "macos")]
  fn test_videotoolbox() {
    let ctx = HwDeviceContext::new(AVHWDeviceType::Videotoolbox)
      .expect("VideoToolbox should be available on macOS");
    assert_eq!(ctx.device_name(), "videotoolbox");
  }
}
