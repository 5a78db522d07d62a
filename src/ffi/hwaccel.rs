//! Hardware acceleration function declarations
//!
//! Provides hardware device context management for CUDA, VAAPI, QSV, VideoToolbox, etc.

use super::types::*;
use std::os::raw::{c_char, c_int};

unsafe extern "C" {
  /// Create a hardware device context for the specified type
  ///
  /// # Arguments
  /// * `device_ctx` - On success, pointer to the created context
  /// * `type_` - Hardware device type
  /// * `device` - Device name (e.g., "/dev/dri/renderD128" for VAAPI, NULL for default)
  /// * `opts` - Options dictionary (can be NULL)
  /// * `flags` - Currently unused, should be 0
  ///
  /// # Returns
  /// 0 on success, negative AVERROR on failure
  pub fn av_hwdevice_ctx_create(
    device_ctx: *mut *mut AVBufferRef,
    type_: c_int,
    device: *const c_char,
    opts: *mut AVDictionary,
    flags: c_int,
  ) -> c_int;

  /// Iterate over supported device types (pass AV_HWDEVICE_TYPE_NONE to start)
  pub fn av_hwdevice_iterate_types(prev: c_int) -> c_int;

  /// Get the string name of a hardware device type
  pub fn av_hwdevice_get_type_name(type_: c_int) -> *const c_char;

  /// Copy data between hardware and software frames
  ///
  /// If src is a HW frame and dst is a SW frame this downloads to host memory.
  /// An unset dst format picks the first supported transfer format.
  pub fn av_hwframe_transfer_data(dst: *mut AVFrame, src: *const AVFrame, flags: c_int) -> c_int;
}

/// Check if a hardware device type is compiled into this FFmpeg build
pub fn is_hwdevice_available(device_type: AVHWDeviceType) -> bool {
  let mut current = unsafe { av_hwdevice_iterate_types(0) };
  while current != 0 {
    if current == device_type.as_raw() {
      return true;
    }
    current = unsafe { av_hwdevice_iterate_types(current) };
  }
  false
}

/// Get hardware device type name
pub fn get_hwdevice_type_name(device_type: AVHWDeviceType) -> Option<&'static str> {
  let name_ptr = unsafe { av_hwdevice_get_type_name(device_type.as_raw()) };
  if name_ptr.is_null() {
    return None;
  }
  let cstr = unsafe { std::ffi::CStr::from_ptr(name_ptr) };
  cstr.to_str().ok()
}
