//! Demuxer context wrapper for FFmpeg libavformat
//!
//! Provides RAII wrapper around AVFormatContext for reading a network or file input.

use super::{CodecError, CodecResult, Decoder, Dictionary, Packet};
use crate::ffi::{
  self,
  accessors::{fffmt_get_nb_streams, fffmt_get_stream, ffstream_get_codecpar_const},
  avformat::{
    av_find_best_stream, av_read_frame, avformat_alloc_context, avformat_close_input,
    avformat_find_stream_info, avformat_network_init, avformat_open_input,
  },
  media_type, AVCodec, AVCodecParameters, AVFormatContext,
};
use std::ffi::CString;
use std::os::raw::c_uint;
use std::ptr::{self, NonNull};
use std::sync::Once;

static NETWORK_INIT: Once = Once::new();

/// The stream chosen for decoding and its default decoder
#[derive(Debug, Clone, Copy)]
pub struct BestStream {
  pub index: usize,
  pub decoder: Decoder,
}

/// Result of a single packet read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
  /// The packet buffer holds a new packet
  Packet,
  /// The input has no more packets
  EndOfStream,
}

/// Demuxer context wrapper
pub struct DemuxerContext {
  ptr: NonNull<AVFormatContext>,
}

impl DemuxerContext {
  /// Open an input URL (rtsp://, http://, a file path, ...)
  ///
  /// `options` is consumed by FFmpeg; entries it did not recognize stay in
  /// the dictionary and are freed with it by the caller.
  pub fn open_input(url: &str, options: &mut Dictionary) -> CodecResult<Self> {
    let c_url =
      CString::new(url).map_err(|_| CodecError::InvalidConfig("URL contains a NUL byte".into()))?;

    NETWORK_INIT.call_once(|| unsafe {
      avformat_network_init();
    });

    let mut ctx_ptr = unsafe { avformat_alloc_context() };
    if ctx_ptr.is_null() {
      return Err(CodecError::AllocationFailed("AVFormatContext"));
    }

    let dict = if options.is_empty() {
      ptr::null_mut()
    } else {
      options.as_mut_ptr()
    };

    // On failure avformat_open_input frees the context and nulls the pointer
    let ret = unsafe { avformat_open_input(&mut ctx_ptr, c_url.as_ptr(), ptr::null(), dict) };
    ffi::check_error(ret)?;

    NonNull::new(ctx_ptr)
      .map(|ptr| Self { ptr })
      .ok_or(CodecError::AllocationFailed("AVFormatContext"))
  }

  /// Probe the input to fill in stream parameters
  pub fn find_stream_info(&mut self) -> CodecResult<()> {
    let ret = unsafe { avformat_find_stream_info(self.ptr.as_ptr(), ptr::null_mut()) };
    ffi::check_error(ret)?;
    Ok(())
  }

  /// Number of streams in the input
  pub fn num_streams(&self) -> usize {
    unsafe { fffmt_get_nb_streams(self.ptr.as_ptr()) as usize }
  }

  /// Select the best video stream and its default decoder
  pub fn find_best_video_stream(&self) -> CodecResult<BestStream> {
    let mut codec: *const AVCodec = ptr::null();
    let index =
      unsafe { av_find_best_stream(self.ptr.as_ptr(), media_type::VIDEO, -1, -1, &mut codec, 0) };
    ffi::check_error(index)?;

    let decoder = Decoder::from_raw(codec).ok_or(CodecError::StreamNotFound)?;
    Ok(BestStream {
      index: index as usize,
      decoder,
    })
  }

  /// Codec parameters of a stream
  ///
  /// The pointer stays valid for the lifetime of this context.
  pub fn codec_parameters(&self, index: usize) -> CodecResult<*const AVCodecParameters> {
    let stream = unsafe { fffmt_get_stream(self.ptr.as_ptr(), index as c_uint) };
    if stream.is_null() {
      return Err(CodecError::StreamNotFound);
    }
    let par = unsafe { ffstream_get_codecpar_const(stream) };
    if par.is_null() {
      return Err(CodecError::StreamNotFound);
    }
    Ok(par)
  }

  /// Read the next packet into a reusable packet buffer
  ///
  /// The packet is unreferenced first. End of input is an outcome, not an error.
  pub fn read_packet(&mut self, packet: &mut Packet) -> CodecResult<ReadOutcome> {
    packet.unref();
    let ret = unsafe { av_read_frame(self.ptr.as_ptr(), packet.as_mut_ptr()) };
    match ffi::error::check_error_except_eof(ret)? {
      Some(_) => Ok(ReadOutcome::Packet),
      None => Ok(ReadOutcome::EndOfStream),
    }
  }
}

impl Drop for DemuxerContext {
  fn drop(&mut self) {
    let mut ptr = self.ptr.as_ptr();
    unsafe {
      avformat_close_input(&mut ptr);
    }
  }
}

// SAFETY: DemuxerContext owns all its resources and can be safely sent between threads
unsafe impl Send for DemuxerContext {}

impl std::fmt::Debug for DemuxerContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DemuxerContext")
      .field("streams", &self.num_streams())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::error::AVERROR_ENOENT;

  #[test]
  fn test_open_missing_file() {
    let mut options = Dictionary::new();
    let err = DemuxerContext::open_input("/nonexistent/rtsp-frame-grabber/input.mp4", &mut options)
      .unwrap_err();
    assert_eq!(err.native_code(), Some(AVERROR_ENOENT));
  }

  #[test]
  fn test_open_rejects_nul_url() {
    let mut options = Dictionary::new();
    let err = DemuxerContext::open_input("rtsp://cam\0/stream", &mut options).unwrap_err();
    assert!(matches!(err, CodecError::InvalidConfig(_)));
  }

  #[test]
  fn test_options_survive_failed_open() {
    let mut options = Dictionary::from_pairs([("rtsp_transport", "tcp")]).unwrap();
    assert!(DemuxerContext::open_input("/nonexistent/input.mp4", &mut options).is_err());
    // still owned and freed by the caller
    drop(options);
  }
}
