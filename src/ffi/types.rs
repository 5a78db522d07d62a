//! Core FFmpeg type definitions
//!
//! All FFmpeg structs are opaque (zero-sized) to avoid version-specific layout dependencies.
//! Field access is done via the thin C accessor library in accessors.c

use std::marker::PhantomData;
use std::os::raw::c_int;

// ============================================================================
// Pixel Formats
// ============================================================================

/// Pixel formats whose numeric values are stable across FFmpeg releases
///
/// Hardware surface formats (cuda, vaapi, ...) moved between releases, so they
/// are never matched by value. Use `av_get_pix_fmt_name` to describe them.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVPixelFormat {
  None = -1,
  // Planar YUV formats
  Yuv420p = 0,
  Yuyv422 = 1,
  Yuv422p = 4,
  Yuv444p = 5,
  Gray8 = 8,
  // Full-range (JPEG) planar YUV
  Yuvj420p = 12,
  Yuvj422p = 13,
  Yuvj444p = 14,
  // Semi-planar formats
  Nv12 = 23,
  Nv21 = 24,
  // Packed RGB formats
  Rgb24 = 2,
  Bgr24 = 3,
  Argb = 25,
  Rgba = 26,
  Abgr = 27,
  Bgra = 28,
}

impl AVPixelFormat {
  /// Map a raw format value back to a known variant
  pub fn from_raw(raw: c_int) -> Option<Self> {
    Some(match raw {
      -1 => Self::None,
      0 => Self::Yuv420p,
      1 => Self::Yuyv422,
      2 => Self::Rgb24,
      3 => Self::Bgr24,
      4 => Self::Yuv422p,
      5 => Self::Yuv444p,
      8 => Self::Gray8,
      12 => Self::Yuvj420p,
      13 => Self::Yuvj422p,
      14 => Self::Yuvj444p,
      23 => Self::Nv12,
      24 => Self::Nv21,
      25 => Self::Argb,
      26 => Self::Rgba,
      27 => Self::Abgr,
      28 => Self::Bgra,
      _ => return None,
    })
  }

  pub fn as_raw(&self) -> c_int {
    *self as c_int
  }
}

// ============================================================================
// Hardware Device Types
// ============================================================================

/// Hardware device type (AVHWDeviceType)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVHWDeviceType {
  None = 0,
  Vdpau = 1,
  Cuda = 2,
  Vaapi = 3,
  Dxva2 = 4,
  Qsv = 5,
  Videotoolbox = 6,
  D3d11va = 7,
  Drm = 8,
  Opencl = 9,
  Mediacodec = 10,
  Vulkan = 11,
}

impl AVHWDeviceType {
  pub fn as_raw(&self) -> c_int {
    *self as c_int
  }
}

// ============================================================================
// Media Types
// ============================================================================

/// AVMediaType values used by stream selection
pub mod media_type {
  use std::os::raw::c_int;

  pub const VIDEO: c_int = 0;
}

// ============================================================================
// Opaque FFmpeg Types
// ============================================================================

/// Opaque AVCodec structure (codec implementation descriptor)
#[repr(C)]
pub struct AVCodec {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVCodecContext structure (decoder instance)
#[repr(C)]
pub struct AVCodecContext {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVCodecParameters structure (stream codec parameters)
#[repr(C)]
pub struct AVCodecParameters {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVFrame structure (uncompressed video data)
#[repr(C)]
pub struct AVFrame {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVPacket structure (compressed data)
#[repr(C)]
pub struct AVPacket {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVBufferRef structure (reference-counted buffer)
#[repr(C)]
pub struct AVBufferRef {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque SwsContext structure (software scaler context)
#[repr(C)]
pub struct SwsContext {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVDictionary structure (key-value options)
#[repr(C)]
pub struct AVDictionary {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVFormatContext structure (demuxer context)
#[repr(C)]
pub struct AVFormatContext {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVStream structure (stream within container)
#[repr(C)]
pub struct AVStream {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVInputFormat structure (input format descriptor)
#[repr(C)]
pub struct AVInputFormat {
  _opaque: [u8; 0],
  _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pixel_format_raw_roundtrip() {
    for fmt in [
      AVPixelFormat::None,
      AVPixelFormat::Yuv420p,
      AVPixelFormat::Rgb24,
      AVPixelFormat::Nv12,
      AVPixelFormat::Yuvj420p,
      AVPixelFormat::Bgra,
    ] {
      assert_eq!(AVPixelFormat::from_raw(fmt.as_raw()), Some(fmt));
    }
  }

  #[test]
  fn test_unknown_pixel_format() {
    // hardware surface formats are never matched by value
    assert_eq!(AVPixelFormat::from_raw(119), None);
    assert_eq!(AVPixelFormat::from_raw(-2), None);
  }
}
