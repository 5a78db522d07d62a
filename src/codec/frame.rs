//! Safe wrapper around FFmpeg AVFrame
//!
//! Provides RAII-based memory management and safe access to frame data.

use crate::ffi::{
  self,
  accessors::{
    ffframe_data_const, ffframe_data_planes, ffframe_get_format, ffframe_get_height,
    ffframe_get_width, ffframe_has_hw_frames_ctx, ffframe_linesize, ffframe_linesizes,
    ffframe_set_format, ffframe_set_height, ffframe_set_width,
  },
  avutil::{av_frame_alloc, av_frame_free, av_frame_get_buffer, av_frame_unref},
  hwaccel::av_hwframe_transfer_data,
  AVFrame, AVPixelFormat,
};
use std::os::raw::c_int;
use std::ptr::NonNull;

use super::{CodecError, CodecResult};

/// Buffer alignment used for frames allocated here (SIMD friendly)
pub const FRAME_ALIGN: c_int = 32;

/// Safe wrapper around AVFrame with RAII cleanup
pub struct Frame {
  ptr: NonNull<AVFrame>,
}

impl Frame {
  /// Allocate a new empty frame
  pub fn new() -> CodecResult<Self> {
    let ptr = unsafe { av_frame_alloc() };
    NonNull::new(ptr)
      .map(|ptr| Self { ptr })
      .ok_or(CodecError::AllocationFailed("AVFrame"))
  }

  /// Allocate a frame with buffers for the given format and dimensions
  pub fn new_video(width: u32, height: u32, format: AVPixelFormat) -> CodecResult<Self> {
    let mut frame = Self::new()?;
    unsafe {
      ffframe_set_width(frame.as_mut_ptr(), width as c_int);
      ffframe_set_height(frame.as_mut_ptr(), height as c_int);
      ffframe_set_format(frame.as_mut_ptr(), format.as_raw());
    }

    let ret = unsafe { av_frame_get_buffer(frame.as_mut_ptr(), FRAME_ALIGN) };
    ffi::check_error(ret)?;

    Ok(frame)
  }

  /// Get the raw pointer (for FFmpeg API calls)
  #[inline]
  pub fn as_ptr(&self) -> *const AVFrame {
    self.ptr.as_ptr()
  }

  /// Get the mutable raw pointer (for FFmpeg API calls)
  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut AVFrame {
    self.ptr.as_ptr()
  }

  #[inline]
  pub fn width(&self) -> u32 {
    unsafe { ffframe_get_width(self.as_ptr()).max(0) as u32 }
  }

  #[inline]
  pub fn height(&self) -> u32 {
    unsafe { ffframe_get_height(self.as_ptr()).max(0) as u32 }
  }

  /// Raw pixel format value, may be a hardware surface format
  #[inline]
  pub fn format_raw(&self) -> c_int {
    unsafe { ffframe_get_format(self.as_ptr()) }
  }

  /// Whether the frame lives in device memory
  #[inline]
  pub fn is_hw_frame(&self) -> bool {
    unsafe { ffframe_has_hw_frames_ctx(self.as_ptr()) != 0 }
  }

  /// Line size of a plane in bytes
  #[inline]
  pub fn linesize(&self, plane: usize) -> i32 {
    unsafe { ffframe_linesize(self.as_ptr(), plane as c_int) }
  }

  /// Plane pointer array, for sws_scale
  #[inline]
  pub fn planes(&self) -> *const *const u8 {
    unsafe { ffframe_data_planes(self.as_ptr()) }
  }

  /// Line size array, for sws_scale
  #[inline]
  pub fn linesizes(&self) -> *const c_int {
    unsafe { ffframe_linesizes(self.as_ptr()) }
  }

  /// Copy out a packed plane including its row padding
  ///
  /// Returns `height * linesize` bytes, or `None` if the plane is empty or has
  /// a negative (bottom-up) line size.
  pub fn copy_plane(&self, plane: usize) -> Option<Vec<u8>> {
    let linesize = self.linesize(plane);
    let height = self.height() as usize;
    let ptr = unsafe { ffframe_data_const(self.as_ptr(), plane as c_int) };
    if ptr.is_null() || linesize <= 0 || height == 0 {
      return None;
    }
    let len = linesize as usize * height;
    Some(unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec())
  }

  /// Download a device-memory frame into this (host) frame
  ///
  /// The destination picks the first format the device supports for transfer.
  pub fn transfer_from(&mut self, hw_frame: &Frame) -> CodecResult<()> {
    let ret = unsafe { av_hwframe_transfer_data(self.as_mut_ptr(), hw_frame.as_ptr(), 0) };
    ffi::check_error(ret)?;
    Ok(())
  }

  /// Unreference all buffers, keeping the allocation for reuse
  pub fn unref(&mut self) {
    unsafe { av_frame_unref(self.as_mut_ptr()) }
  }
}

impl Drop for Frame {
  fn drop(&mut self) {
    unsafe {
      let mut ptr = self.ptr.as_ptr();
      av_frame_free(&mut ptr);
    }
  }
}

// Frame is Send but not Sync
unsafe impl Send for Frame {}

impl std::fmt::Debug for Frame {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Frame")
      .field("width", &self.width())
      .field("height", &self.height())
      .field("format", &self.format_raw())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_frame_allocation() {
    let frame = Frame::new().unwrap();
    assert_eq!(frame.width(), 0);
    assert_eq!(frame.height(), 0);
    assert!(!frame.is_hw_frame());
    assert!(frame.copy_plane(0).is_none());
  }

  #[test]
  fn test_video_frame_allocation() {
    let frame = Frame::new_video(1920, 1080, AVPixelFormat::Rgb24).unwrap();
    assert_eq!(frame.width(), 1920);
    assert_eq!(frame.height(), 1080);
    assert_eq!(frame.format_raw(), AVPixelFormat::Rgb24.as_raw());
    assert!(frame.linesize(0) >= 1920 * 3);
  }

  #[test]
  fn test_copy_plane_includes_padding() {
    // 33 * 3 = 99 bytes per row, padded up to the alignment
    let frame = Frame::new_video(33, 4, AVPixelFormat::Rgb24).unwrap();
    let stride = frame.linesize(0) as usize;
    assert!(stride >= 99);
    let data = frame.copy_plane(0).unwrap();
    assert_eq!(data.len(), stride * 4);
  }

  #[test]
  fn test_unref_resets_dimensions() {
    let mut frame = Frame::new_video(16, 16, AVPixelFormat::Yuv420p).unwrap();
    frame.unref();
    assert_eq!(frame.width(), 0);
    assert_eq!(frame.format_raw(), AVPixelFormat::None.as_raw());
  }
}
