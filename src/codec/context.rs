//! Safe wrapper around FFmpeg AVCodecContext
//!
//! Decoder instance with RAII cleanup and an optional attached hardware device.

use crate::ffi::{
  self,
  accessors::{
    ffctx_close, ffctx_get_codec_id, ffctx_get_height, ffctx_get_pix_fmt, ffctx_get_width,
    ffctx_set_hw_device_ctx, ffctx_set_pix_fmt,
  },
  avcodec::{
    avcodec_alloc_context3, avcodec_free_context, avcodec_open2, avcodec_parameters_to_context,
    avcodec_receive_frame, avcodec_send_packet,
  },
  AVCodecContext, AVCodecParameters,
};
use std::os::raw::c_int;
use std::ptr::NonNull;

use super::{CodecError, CodecResult, Decoder, Frame, HwDeviceContext, Packet};

/// Safe wrapper around a decoding AVCodecContext
pub struct CodecContext {
  ptr: NonNull<AVCodecContext>,
  decoder: Decoder,
  hw_device: Option<HwDeviceContext>,
}

impl CodecContext {
  /// Allocate a decoder context for the given decoder
  pub fn new_decoder(decoder: Decoder) -> CodecResult<Self> {
    let ptr = unsafe { avcodec_alloc_context3(decoder.as_ptr()) };
    NonNull::new(ptr)
      .map(|ptr| Self {
        ptr,
        decoder,
        hw_device: None,
      })
      .ok_or(CodecError::AllocationFailed("AVCodecContext"))
  }

  // ========================================================================
  // Configuration
  // ========================================================================

  /// Copy a stream's codec parameters into the context
  ///
  /// # Safety
  /// `par` must point to valid codec parameters that outlive this call.
  pub unsafe fn apply_parameters(&mut self, par: *const AVCodecParameters) -> CodecResult<()> {
    let ret = unsafe { avcodec_parameters_to_context(self.ptr.as_ptr(), par) };
    ffi::check_error(ret)?;
    Ok(())
  }

  /// Attach a hardware device context for hardware-accelerated decoding
  ///
  /// The codec context takes its own reference; the wrapper is kept alive
  /// alongside it.
  pub fn set_hw_device(&mut self, hw_device: HwDeviceContext) -> CodecResult<()> {
    let ret = unsafe { ffctx_set_hw_device_ctx(self.ptr.as_ptr(), hw_device.as_ptr()) };
    ffi::check_error(ret)?;
    self.hw_device = Some(hw_device);
    Ok(())
  }

  /// Open the codec (must be called after configuration)
  pub fn open(&mut self) -> CodecResult<()> {
    let ret =
      unsafe { avcodec_open2(self.ptr.as_ptr(), self.decoder.as_ptr(), std::ptr::null_mut()) };
    ffi::check_error(ret)?;
    Ok(())
  }

  // ========================================================================
  // Decoding
  // ========================================================================

  /// Send a packet to the decoder
  ///
  /// Returns Ok(true) if packet was accepted, Ok(false) if decoder needs output drained first
  pub fn send_packet(&mut self, packet: &Packet) -> CodecResult<bool> {
    let ret = unsafe { avcodec_send_packet(self.ptr.as_ptr(), packet.as_ptr()) };
    Ok(ffi::error::check_error_except_eagain(ret)?.is_some())
  }

  /// Receive a decoded frame into a reusable frame buffer
  ///
  /// Returns Ok(true) if a frame was written, Ok(false) if the decoder needs more input.
  /// Any other status, EOF included, is an error.
  pub fn receive_frame_into(&mut self, frame: &mut Frame) -> CodecResult<bool> {
    let ret = unsafe { avcodec_receive_frame(self.ptr.as_ptr(), frame.as_mut_ptr()) };
    Ok(ffi::error::check_error_except_eagain(ret)?.is_some())
  }

  // ========================================================================
  // Utility
  // ========================================================================

  /// Get raw pointer (for FFmpeg API calls)
  #[inline]
  pub fn as_ptr(&self) -> *const AVCodecContext {
    self.ptr.as_ptr()
  }

  #[inline]
  pub fn decoder(&self) -> Decoder {
    self.decoder
  }

  /// Negotiated AVCodecID
  pub fn codec_id(&self) -> c_int {
    unsafe { ffctx_get_codec_id(self.as_ptr()) }
  }

  pub fn width(&self) -> u32 {
    unsafe { ffctx_get_width(self.as_ptr()).max(0) as u32 }
  }

  pub fn height(&self) -> u32 {
    unsafe { ffctx_get_height(self.as_ptr()).max(0) as u32 }
  }

  /// Raw negotiated pixel format
  pub fn pixel_format_raw(&self) -> c_int {
    unsafe { ffctx_get_pix_fmt(self.as_ptr()) }
  }

  pub fn set_pixel_format_raw(&mut self, pix_fmt: c_int) {
    unsafe { ffctx_set_pix_fmt(self.ptr.as_ptr(), pix_fmt) }
  }
}

impl Drop for CodecContext {
  fn drop(&mut self) {
    unsafe {
      let mut ptr = self.ptr.as_ptr();
      // close before free; a no-op on releases where free closes by itself
      ffctx_close(ptr);
      avcodec_free_context(&mut ptr);
    }
    // hw_device drops after this, releasing our own device reference last
  }
}

// CodecContext is NOT Sync - FFmpeg contexts are not thread-safe
unsafe impl Send for CodecContext {}

impl std::fmt::Debug for CodecContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CodecContext")
      .field("decoder", &self.decoder)
      .field("width", &self.width())
      .field("height", &self.height())
      .field("pixel_format", &self.pixel_format_raw())
      .field("hw_device", &self.hw_device)
      .finish()
  }
}
