//! Safe wrapper around FFmpeg AVPacket
//!
//! The demux loop reuses one packet allocation for every read.

use crate::ffi::{
  accessors::{ffpkt_size, ffpkt_stream_index},
  avcodec::{av_packet_alloc, av_packet_free, av_packet_unref},
  AVPacket,
};
use std::ptr::NonNull;

use super::{CodecError, CodecResult};

/// Safe wrapper around AVPacket with RAII cleanup
pub struct Packet {
  ptr: NonNull<AVPacket>,
}

impl Packet {
  /// Allocate a new empty packet
  pub fn new() -> CodecResult<Self> {
    let ptr = unsafe { av_packet_alloc() };
    NonNull::new(ptr)
      .map(|ptr| Self { ptr })
      .ok_or(CodecError::AllocationFailed("AVPacket"))
  }

  /// Get the raw pointer (for FFmpeg API calls)
  #[inline]
  pub fn as_ptr(&self) -> *const AVPacket {
    self.ptr.as_ptr()
  }

  /// Get the mutable raw pointer (for FFmpeg API calls)
  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut AVPacket {
    self.ptr.as_ptr()
  }

  /// Index of the stream this packet belongs to
  #[inline]
  pub fn stream_index(&self) -> i32 {
    unsafe { ffpkt_stream_index(self.as_ptr()) }
  }

  /// Payload size in bytes
  #[inline]
  pub fn size(&self) -> i32 {
    unsafe { ffpkt_size(self.as_ptr()) }
  }

  /// Release the payload, keeping the allocation for the next read
  pub fn unref(&mut self) {
    unsafe { av_packet_unref(self.as_mut_ptr()) }
  }
}

impl Drop for Packet {
  fn drop(&mut self) {
    unsafe {
      let mut ptr = self.ptr.as_ptr();
      av_packet_free(&mut ptr);
    }
  }
}

// Packet is Send but not Sync
unsafe impl Send for Packet {}

impl std::fmt::Debug for Packet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Packet")
      .field("stream_index", &self.stream_index())
      .field("size", &self.size())
      .finish()
  }
}
