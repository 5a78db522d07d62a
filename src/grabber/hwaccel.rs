//! Hardware accelerator resolution from decoder names
//!
//! FFmpeg names hardware decoders `<codec>_<backend>` (`h264_cuvid`,
//! `hevc_qsv`, `h264_v4l2m2m`, ...). The backend suffix picks the device
//! family.

use crate::codec::{CodecError, CodecResult, Decoder};
use crate::ffi::AVHWDeviceType;

use super::diagnostics::Diagnostics;

/// Hardware acceleration backend family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HwAccelKind {
  #[default]
  None,
  Cuda,
  Qsv,
  Vdpau,
  Vaapi,
  D3d11va,
  VideoToolbox,
  Drm,
  OpenCl,
}

impl HwAccelKind {
  pub fn device_type(self) -> AVHWDeviceType {
    match self {
      HwAccelKind::None => AVHWDeviceType::None,
      HwAccelKind::Cuda => AVHWDeviceType::Cuda,
      HwAccelKind::Qsv => AVHWDeviceType::Qsv,
      HwAccelKind::Vdpau => AVHWDeviceType::Vdpau,
      HwAccelKind::Vaapi => AVHWDeviceType::Vaapi,
      HwAccelKind::D3d11va => AVHWDeviceType::D3d11va,
      HwAccelKind::VideoToolbox => AVHWDeviceType::Videotoolbox,
      HwAccelKind::Drm => AVHWDeviceType::Drm,
      HwAccelKind::OpenCl => AVHWDeviceType::Opencl,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      HwAccelKind::None => "none",
      HwAccelKind::Cuda => "cuda",
      HwAccelKind::Qsv => "qsv",
      HwAccelKind::Vdpau => "vdpau",
      HwAccelKind::Vaapi => "vaapi",
      HwAccelKind::D3d11va => "d3d11va",
      HwAccelKind::VideoToolbox => "videotoolbox",
      HwAccelKind::Drm => "drm",
      HwAccelKind::OpenCl => "opencl",
    }
  }
}

impl std::fmt::Display for HwAccelKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

/// One row of the suffix table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixRule {
  pub suffix: &'static str,
  pub kind: HwAccelKind,
  /// Whether the decoder needs a device context; memory-mapped decoders
  /// already hand out host frames
  pub attach_device: bool,
}

const fn rule(suffix: &'static str, kind: HwAccelKind, attach_device: bool) -> SuffixRule {
  SuffixRule {
    suffix,
    kind,
    attach_device,
  }
}

pub static SUFFIX_TABLE: &[SuffixRule] = &[
  rule("venc", HwAccelKind::Cuda, true),
  rule("cuvid", HwAccelKind::Cuda, true),
  rule("nvdec", HwAccelKind::Cuda, true),
  rule("qsv", HwAccelKind::Qsv, true),
  rule("vdpau", HwAccelKind::Vdpau, true),
  rule("vaapi", HwAccelKind::Vaapi, true),
  rule("d3d11va", HwAccelKind::D3d11va, true),
  rule("d3d11", HwAccelKind::D3d11va, true),
  rule("videotoolbox", HwAccelKind::VideoToolbox, true),
  rule("drm", HwAccelKind::Drm, true),
  rule("v4l2m2m", HwAccelKind::Drm, false),
  rule("opencl", HwAccelKind::OpenCl, true),
];

/// Look up the table row for a decoder name's backend suffix
pub fn classify(decoder_name: &str) -> Option<&'static SuffixRule> {
  let (_, suffix) = decoder_name.rsplit_once('_')?;
  SUFFIX_TABLE.iter().find(|rule| rule.suffix == suffix)
}

/// Outcome of resolving a requested decoder name
#[derive(Debug, Clone, Copy, Default)]
pub struct HwAccelResolution {
  /// Decoder overriding the stream default, if one was requested
  pub decoder: Option<Decoder>,
  pub kind: HwAccelKind,
  pub attach_device: bool,
}

impl HwAccelResolution {
  /// Whether decoded frames come back in device memory
  pub fn uses_device(&self) -> bool {
    self.kind != HwAccelKind::None && self.attach_device
  }
}

/// Resolve a requested decoder name using FFmpeg's decoder registry
pub fn resolve(name: Option<&str>, diag: &Diagnostics) -> CodecResult<HwAccelResolution> {
  resolve_with(name, Decoder::find_by_name, diag)
}

/// Resolve a requested decoder name with a caller-supplied decoder lookup
///
/// A missing or blank name keeps the stream's default decoder. An unknown
/// backend suffix keeps the named decoder without acceleration and logs one
/// warning.
pub fn resolve_with<F>(name: Option<&str>, lookup: F, diag: &Diagnostics) -> CodecResult<HwAccelResolution>
where
  F: FnOnce(&str) -> Option<Decoder>,
{
  let name = match name.map(str::trim) {
    Some(name) if !name.is_empty() => name,
    _ => return Ok(HwAccelResolution::default()),
  };

  let decoder = lookup(name).ok_or_else(|| CodecError::DecoderNotFound(name.to_string()))?;
  if !decoder.is_video() {
    return Err(CodecError::NotVideoDecoder(name.to_string()));
  }

  match classify(name) {
    Some(rule) => Ok(HwAccelResolution {
      decoder: Some(decoder),
      kind: rule.kind,
      attach_device: rule.attach_device,
    }),
    None => {
      diag.warn(&format!("Unsupported hardware accelerated codec '{}'", name));
      Ok(HwAccelResolution {
        decoder: Some(decoder),
        kind: HwAccelKind::None,
        attach_device: false,
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grabber::diagnostics::testing::capturing;

  fn rawvideo(_: &str) -> Option<Decoder> {
    Decoder::find_by_name("rawvideo")
  }

  #[test]
  fn test_suffix_table() {
    let cases = [
      ("h264_venc", HwAccelKind::Cuda, true),
      ("h264_cuvid", HwAccelKind::Cuda, true),
      ("hevc_nvdec", HwAccelKind::Cuda, true),
      ("h264_qsv", HwAccelKind::Qsv, true),
      ("h264_vdpau", HwAccelKind::Vdpau, true),
      ("h264_vaapi", HwAccelKind::Vaapi, true),
      ("h264_d3d11va", HwAccelKind::D3d11va, true),
      ("h264_d3d11", HwAccelKind::D3d11va, true),
      ("h264_videotoolbox", HwAccelKind::VideoToolbox, true),
      ("h264_drm", HwAccelKind::Drm, true),
      ("h264_v4l2m2m", HwAccelKind::Drm, false),
      ("h264_opencl", HwAccelKind::OpenCl, true),
    ];
    for (name, kind, attach) in cases {
      let rule = classify(name).unwrap_or_else(|| panic!("{name} not classified"));
      assert_eq!(rule.kind, kind, "{name}");
      assert_eq!(rule.attach_device, attach, "{name}");
    }
  }

  #[test]
  fn test_suffix_is_after_last_underscore() {
    assert_eq!(classify("mpeg2_video_qsv").map(|r| r.kind), Some(HwAccelKind::Qsv));
    assert!(classify("h264").is_none());
    assert!(classify("h264_").is_none());
    assert!(classify("h264_cuda").is_none());
  }

  #[test]
  fn test_device_types() {
    assert_eq!(HwAccelKind::None.device_type(), AVHWDeviceType::None);
    assert_eq!(HwAccelKind::Cuda.device_type(), AVHWDeviceType::Cuda);
    assert_eq!(HwAccelKind::VideoToolbox.device_type(), AVHWDeviceType::Videotoolbox);
    assert_eq!(HwAccelKind::OpenCl.device_type(), AVHWDeviceType::Opencl);
    assert_eq!(HwAccelKind::D3d11va.to_string(), "d3d11va");
  }

  #[test]
  fn test_absent_or_blank_name() {
    let (diag, lines) = capturing();
    for name in [None, Some(""), Some("   ")] {
      let res = resolve_with(name, |_| panic!("lookup must not run"), &diag).unwrap();
      assert!(res.decoder.is_none());
      assert_eq!(res.kind, HwAccelKind::None);
      assert!(!res.uses_device());
    }
    assert!(lines.lock().unwrap().is_empty());
  }

  #[test]
  fn test_recognized_suffix() {
    let (diag, lines) = capturing();
    let res = resolve_with(Some("h264_cuvid"), rawvideo, &diag).unwrap();
    assert!(res.decoder.is_some());
    assert_eq!(res.kind, HwAccelKind::Cuda);
    assert!(res.uses_device());
    assert!(lines.lock().unwrap().is_empty());
  }

  #[test]
  fn test_memory_mapped_family_skips_device() {
    let (diag, _) = capturing();
    let res = resolve_with(Some("h264_v4l2m2m"), rawvideo, &diag).unwrap();
    assert_eq!(res.kind, HwAccelKind::Drm);
    assert!(!res.uses_device());
  }

  #[test]
  fn test_unknown_suffix_warns_once() {
    let (diag, lines) = capturing();
    let res = resolve_with(Some("h264_mediacodec"), rawvideo, &diag).unwrap();
    assert!(res.decoder.is_some());
    assert_eq!(res.kind, HwAccelKind::None);
    assert!(!res.uses_device());

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], "Unsupported hardware accelerated codec 'h264_mediacodec'");
  }

  #[test]
  fn test_name_without_suffix_warns() {
    let (diag, lines) = capturing();
    let res = resolve_with(Some("rawvideo"), rawvideo, &diag).unwrap();
    assert_eq!(res.kind, HwAccelKind::None);
    assert_eq!(lines.lock().unwrap().len(), 1);
  }

  #[test]
  fn test_unknown_decoder() {
    let (diag, lines) = capturing();
    let err = resolve_with(Some("h264_nope"), |_| None, &diag).unwrap_err();
    assert!(matches!(err, CodecError::DecoderNotFound(ref n) if n == "h264_nope"));
    assert!(lines.lock().unwrap().is_empty());
  }

  #[test]
  fn test_non_video_decoder() {
    let (diag, _) = capturing();
    let err = resolve_with(
      Some("pcm_s16le"),
      |_| Decoder::find_by_name("pcm_s16le"),
      &diag,
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::NotVideoDecoder(_)));
  }

  #[test]
  fn test_registry_lookup() {
    let err = resolve(Some("h264_does_not_exist"), &Diagnostics::default()).unwrap_err();
    assert!(matches!(err, CodecError::DecoderNotFound(_)));
  }
}
