//! Stream session: demux, decode, optional device download, RGB conversion
//!
//! A [`FrameGrabber`] is either closed or holds a fully built [`OpenSession`].
//! Every native handle is an RAII wrapper, so releasing the session is a
//! single drop whichever path closes it: explicit close, dispose, a failed
//! open (partial prefix) or a fatal decode error.

use std::os::raw::c_int;

use crate::codec::{
  CodecContext, CodecError, DemuxerContext, Dictionary, Frame, HwDeviceContext, Packet,
  ReadOutcome, Scaler,
};
use crate::ffi::{
  avcodec::codec_name, avutil::pix_fmt_name, error::AVERROR_EAGAIN, AVPixelFormat, FFmpegError,
};

use super::diagnostics::{DiagnosticSink, Diagnostics};
use super::error::{GrabberError, GrabberResult};
use super::frame::RgbFrame;
use super::hwaccel::{self, HwAccelKind, HwAccelResolution};

/// Pixel layout of every frame handed out
pub const OUTPUT_FORMAT: AVPixelFormat = AVPixelFormat::Rgb24;

/// Assumed when a stream does not report its pixel format
pub const FALLBACK_FORMAT: AVPixelFormat = AVPixelFormat::Yuv420p;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
  pub width: u32,
  pub height: u32,
}

impl std::fmt::Display for FrameSize {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

/// Negotiated pixel format as reported by the decoder
///
/// Kept as the raw FFmpeg value: hardware surface formats have no stable
/// number across FFmpeg releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat(c_int);

impl PixelFormat {
  pub fn from_raw(raw: c_int) -> Self {
    Self(raw)
  }

  #[inline]
  pub fn raw(self) -> c_int {
    self.0
  }

  /// FFmpeg's name for the format ("yuv420p", "cuda", ...)
  pub fn name(self) -> Option<String> {
    pix_fmt_name(self.0)
  }

  /// The format as a well-known software format, if it is one
  pub fn known(self) -> Option<AVPixelFormat> {
    AVPixelFormat::from_raw(self.0)
  }

  pub fn is_none(self) -> bool {
    self.0 == AVPixelFormat::None.as_raw()
  }
}

impl From<AVPixelFormat> for PixelFormat {
  fn from(format: AVPixelFormat) -> Self {
    Self(format.as_raw())
  }
}

impl std::fmt::Display for PixelFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.name() {
      Some(name) => f.write_str(&name),
      None => write!(f, "unknown({})", self.0),
    }
  }
}

/// Attributes of an open stream, fixed once it is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
  pub url: String,
  pub stream_index: usize,
  pub codec_name: String,
  pub frame_size: FrameSize,
  pub pixel_format: PixelFormat,
  pub hw_accel: HwAccelKind,
}

/// Resources and attributes of an open stream
///
/// Fields drop in declaration order, which is the required release order:
/// transfer frame, frame, packet, converter, decoder (closed then freed),
/// demuxer.
struct OpenSession {
  hw_frame: Frame,
  frame: Frame,
  packet: Packet,
  scaler: Option<Scaler>,
  decoder: CodecContext,
  demuxer: DemuxerContext,

  info: SessionInfo,
  transfer_frames: bool,
  /// the yuv420p fallback has been reported for this stream
  fallback_reported: bool,
}

impl OpenSession {
  fn open(
    url: &str,
    mut options: Dictionary,
    resolution: HwAccelResolution,
    diag: &Diagnostics,
  ) -> GrabberResult<Self> {
    let opened = DemuxerContext::open_input(url, &mut options);
    // unconsumed options are released whatever the outcome
    drop(options);
    let mut demuxer = opened?;
    demuxer.find_stream_info()?;

    let best = demuxer.find_best_video_stream()?;
    let mut decoder = CodecContext::new_decoder(resolution.decoder.unwrap_or(best.decoder))?;

    let par = demuxer.codec_parameters(best.index)?;
    // SAFETY: the parameters belong to the demuxer, which outlives this call
    unsafe { decoder.apply_parameters(par)? };

    if resolution.uses_device() {
      let device = HwDeviceContext::new(resolution.kind.device_type())?;
      decoder.set_hw_device(device)?;
    }

    decoder.open()?;

    let mut fallback_reported = false;
    if PixelFormat::from_raw(decoder.pixel_format_raw()).is_none() {
      assume_fallback_format(diag, &mut fallback_reported);
      decoder.set_pixel_format_raw(FALLBACK_FORMAT.as_raw());
    }

    let codec_name = codec_name(decoder.codec_id());
    let frame_size = FrameSize {
      width: decoder.width(),
      height: decoder.height(),
    };
    let pixel_format = PixelFormat::from_raw(decoder.pixel_format_raw());

    let packet = Packet::new()?;
    let frame = Frame::new()?;
    let hw_frame = Frame::new()?;

    diag.info(&format!(
      "Video stream opened successfully (Codec: {}, Frame size: {}, Pixel format: {})",
      codec_name, frame_size, pixel_format
    ));

    Ok(Self {
      hw_frame,
      frame,
      packet,
      scaler: None,
      decoder,
      demuxer,
      info: SessionInfo {
        url: url.to_string(),
        stream_index: best.index,
        codec_name,
        frame_size,
        pixel_format,
        hw_accel: resolution.kind,
      },
      transfer_frames: resolution.uses_device(),
      fallback_reported,
    })
  }

  /// Pull the next decoded frame into `self.frame`
  ///
  /// Returns false once the input is exhausted.
  fn receive_next(&mut self) -> GrabberResult<bool> {
    loop {
      // a single packet may yield several frames, so drain first
      if self.decoder.receive_frame_into(&mut self.frame)? {
        return Ok(true);
      }

      loop {
        match self.demuxer.read_packet(&mut self.packet)? {
          ReadOutcome::EndOfStream => return Ok(false),
          ReadOutcome::Packet if self.packet.stream_index() as usize == self.info.stream_index => break,
          ReadOutcome::Packet => continue,
        }
      }

      // the decoder just asked for input, so it cannot refuse this packet
      if !self.decoder.send_packet(&self.packet)? {
        return Err(FFmpegError::from_code(AVERROR_EAGAIN).into());
      }
    }
  }

  fn next_frame(&mut self, diag: &Diagnostics) -> GrabberResult<Option<RgbFrame>> {
    if !self.receive_next()? {
      return Ok(None);
    }

    let working = if self.transfer_frames && self.frame.is_hw_frame() {
      self.hw_frame.unref();
      self.hw_frame.transfer_from(&self.frame)?;
      &self.hw_frame
    } else {
      &self.frame
    };

    let width = working.width();
    let height = working.height();
    let mut src_format = working.format_raw();
    if PixelFormat::from_raw(src_format).is_none() {
      assume_fallback_format(diag, &mut self.fallback_reported);
      src_format = FALLBACK_FORMAT.as_raw();
    }

    // built on first use, rebuilt if the stream changes geometry mid-flight
    if !matches!(&self.scaler, Some(s) if s.accepts(width, height, src_format)) {
      self.scaler = None;
      self.scaler = Some(Scaler::new_converter(
        width,
        height,
        src_format,
        OUTPUT_FORMAT,
      )?);
    }
    let scaler = self.scaler.as_ref().ok_or(CodecError::ConversionUnavailable)?;

    let rgb = scaler.convert(working)?;
    let data = rgb
      .copy_plane(0)
      .ok_or_else(|| CodecError::InvalidConfig("Converted picture has no pixel data".into()))?;
    drop(rgb);

    Ok(Some(RgbFrame::new(data, width, height)?))
  }
}

/// Warn about the yuv420p fallback once per stream
fn assume_fallback_format(diag: &Diagnostics, reported: &mut bool) {
  if std::mem::replace(reported, true) {
    return;
  }
  diag.warn(&format!(
    "Cannot detect stream's pixel format, assuming {}",
    PixelFormat::from(FALLBACK_FORMAT)
  ));
}

/// Pull-based RGB frame grabber for a single video stream
///
/// Not safe for concurrent use; callers serialize access (`&mut self`
/// enforces this in Rust). Independent grabbers may run on separate threads.
#[derive(Default)]
pub struct FrameGrabber {
  session: Option<OpenSession>,
  diagnostics: Diagnostics,
}

impl FrameGrabber {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a grabber that also reports session diagnostics to `sink`
  pub fn with_diagnostics(sink: DiagnosticSink) -> Self {
    Self {
      session: None,
      diagnostics: Diagnostics::new(Some(sink)),
    }
  }

  /// Open `url` and negotiate its best video stream
  ///
  /// `options` are passed verbatim to the demuxer and protocol
  /// (`rtsp_transport=tcp`, `timeout=5000000`, ...). `hardware_decoder`
  /// names an FFmpeg decoder to use instead of the stream's default; its
  /// suffix selects the acceleration backend.
  ///
  /// On failure the grabber stays closed.
  pub fn open<I, K, V>(
    &mut self,
    url: &str,
    options: I,
    hardware_decoder: Option<&str>,
  ) -> GrabberResult<()>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    if self.session.is_some() {
      return Err(GrabberError::ALREADY_OPEN);
    }

    // nothing native is allocated until the decoder name checks out
    let resolution = hwaccel::resolve(hardware_decoder, &self.diagnostics)?;
    let options = Dictionary::from_pairs(options)?;

    self.session = Some(OpenSession::open(
      url,
      options,
      resolution,
      &self.diagnostics,
    )?);
    Ok(())
  }

  /// Decode the next frame of the selected stream as RGB24
  ///
  /// `Ok(None)` means the input is exhausted; the grabber stays open. Any
  /// error closes the grabber before it is returned.
  pub fn decode_next_frame(&mut self) -> GrabberResult<Option<RgbFrame>> {
    let session = self.session.as_mut().ok_or(GrabberError::NOT_OPEN)?;
    match session.next_frame(&self.diagnostics) {
      Ok(frame) => Ok(frame),
      Err(e) => {
        self.session = None;
        Err(e)
      }
    }
  }

  /// Release the stream; fails if it is not open
  pub fn close(&mut self) -> GrabberResult<()> {
    self.session.take().map(drop).ok_or(GrabberError::NOT_OPEN)
  }

  /// Release the stream if it is open
  pub fn dispose(&mut self) {
    self.session = None;
  }

  pub fn is_open(&self) -> bool {
    self.session.is_some()
  }

  /// Attributes of the open stream
  pub fn info(&self) -> Option<&SessionInfo> {
    self.session.as_ref().map(|s| &s.info)
  }

  pub fn url(&self) -> Option<&str> {
    self.session.as_ref().map(|s| s.info.url.as_str())
  }

  pub fn codec_name(&self) -> Option<&str> {
    self.session.as_ref().map(|s| s.info.codec_name.as_str())
  }

  pub fn frame_size(&self) -> Option<FrameSize> {
    self.session.as_ref().map(|s| s.info.frame_size)
  }

  pub fn pixel_format(&self) -> Option<PixelFormat> {
    self.session.as_ref().map(|s| s.info.pixel_format)
  }

  pub fn stream_index(&self) -> Option<usize> {
    self.session.as_ref().map(|s| s.info.stream_index)
  }

  /// Acceleration backend of the open stream, `None` when closed
  pub fn hw_accel(&self) -> HwAccelKind {
    self
      .session
      .as_ref()
      .map(|s| s.info.hw_accel)
      .unwrap_or_default()
  }
}

impl std::fmt::Debug for FrameGrabber {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FrameGrabber")
      .field("url", &self.url())
      .field("codec", &self.codec_name())
      .field("frame_size", &self.frame_size())
      .field("pixel_format", &self.pixel_format())
      .field("hw_accel", &self.hw_accel())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::error::{AVERROR_EINVAL, AVERROR_ENOENT};
  use crate::grabber::diagnostics::testing::capturing;
  use std::io::Write;
  use std::path::PathBuf;
  use std::sync::Arc;

  const NO_OPTIONS: [(&str, &str); 0] = [];

  /// Raw RGB24 clip readable by the rawvideo demuxer
  struct RawClip {
    path: PathBuf,
  }

  impl RawClip {
    fn write(name: &str, width: u32, height: u32, frames: u32) -> Self {
      Self::write_with_tail(name, width, height, frames, 0)
    }

    /// `frames` whole frames followed by `tail` bytes of a cut-off one
    fn write_with_tail(name: &str, width: u32, height: u32, frames: u32, tail: usize) -> Self {
      let path = std::env::temp_dir().join(format!(
        "rtsp-frame-grabber-{}-{}.yuv",
        name,
        std::process::id()
      ));
      let frame_len = (width * height * 3) as usize;
      let mut file = std::fs::File::create(&path).unwrap();
      for i in 0..frames {
        file.write_all(&vec![(i * 40) as u8; frame_len]).unwrap();
      }
      file.write_all(&vec![0xff; tail]).unwrap();
      Self { path }
    }

    fn url(&self) -> &str {
      self.path.to_str().unwrap()
    }
  }

  impl Drop for RawClip {
    fn drop(&mut self) {
      let _ = std::fs::remove_file(&self.path);
    }
  }

  fn raw_options(width: u32, height: u32) -> Vec<(String, String)> {
    vec![
      ("video_size".to_string(), format!("{}x{}", width, height)),
      ("pixel_format".to_string(), "rgb24".to_string()),
    ]
  }

  #[test]
  fn test_closed_grabber_rejects_operations() {
    let mut grabber = FrameGrabber::new();
    assert!(!grabber.is_open());

    let err = grabber.decode_next_frame().unwrap_err();
    assert!(err.is_invalid_state());
    assert_eq!(err.to_string(), "Stream is not open");

    let err = grabber.close().unwrap_err();
    assert!(err.is_invalid_state());
  }

  #[test]
  fn test_closed_grabber_has_no_attributes() {
    let grabber = FrameGrabber::new();
    assert!(grabber.url().is_none());
    assert!(grabber.codec_name().is_none());
    assert!(grabber.frame_size().is_none());
    assert!(grabber.pixel_format().is_none());
    assert!(grabber.stream_index().is_none());
    assert_eq!(grabber.hw_accel(), HwAccelKind::None);
  }

  #[test]
  fn test_dispose_is_idempotent() {
    let mut grabber = FrameGrabber::new();
    grabber.dispose();
    grabber.dispose();
    assert!(!grabber.is_open());
  }

  #[test]
  fn test_failed_open_stays_closed() {
    let mut grabber = FrameGrabber::new();
    let err = grabber
      .open("/nonexistent/rtsp-frame-grabber/clip.mp4", NO_OPTIONS, None)
      .unwrap_err();
    assert!(!err.is_invalid_state());
    assert_eq!(err.code(), Some(AVERROR_ENOENT));
    assert!(!grabber.is_open());
    assert!(grabber.close().unwrap_err().is_invalid_state());
  }

  #[test]
  fn test_unknown_hardware_decoder_fails_before_input_is_touched() {
    let mut grabber = FrameGrabber::new();
    // the path would fail with ENOENT if the demuxer were reached
    let err = grabber
      .open("/nonexistent/clip.mp4", NO_OPTIONS, Some("h264_not_a_decoder"))
      .unwrap_err();
    assert!(matches!(
      err,
      GrabberError::Media(CodecError::DecoderNotFound(_))
    ));
    assert_eq!(err.code(), None);
    assert!(!grabber.is_open());
  }

  #[test]
  fn test_nul_in_options_rejected() {
    let mut grabber = FrameGrabber::new();
    let err = grabber
      .open("/nonexistent/clip.mp4", [("rtsp_transport", "t\0cp")], None)
      .unwrap_err();
    assert!(matches!(err, GrabberError::Media(CodecError::InvalidConfig(_))));
    assert!(!grabber.is_open());
  }

  #[test]
  fn test_pixel_format_names() {
    assert_eq!(PixelFormat::from(AVPixelFormat::Yuv420p).name().as_deref(), Some("yuv420p"));
    assert_eq!(PixelFormat::from(AVPixelFormat::Rgb24).to_string(), "rgb24");
    assert_eq!(PixelFormat::from_raw(0).known(), Some(AVPixelFormat::Yuv420p));
    assert!(PixelFormat::from(AVPixelFormat::None).is_none());
  }

  #[test]
  fn test_fallback_format_reported_once() {
    let (diag, lines) = capturing();
    let mut reported = false;
    assume_fallback_format(&diag, &mut reported);
    assume_fallback_format(&diag, &mut reported);
    assert!(reported);
    assert_eq!(
      *lines.lock().unwrap(),
      vec!["Cannot detect stream's pixel format, assuming yuv420p".to_string()]
    );
  }

  #[test]
  fn test_decode_raw_clip() {
    let clip = RawClip::write("decode", 6, 4, 3);
    let (diag, _) = capturing();
    let mut grabber = FrameGrabber {
      session: None,
      diagnostics: diag,
    };

    grabber.open(clip.url(), raw_options(6, 4), None).unwrap();
    assert!(grabber.is_open());
    assert_eq!(grabber.codec_name(), Some("rawvideo"));
    assert_eq!(grabber.frame_size(), Some(FrameSize { width: 6, height: 4 }));
    assert_eq!(grabber.pixel_format().and_then(|p| p.known()), Some(AVPixelFormat::Rgb24));
    assert_eq!(grabber.stream_index(), Some(0));

    let mut frames = 0;
    while let Some(frame) = grabber.decode_next_frame().unwrap() {
      assert_eq!(frame.width(), 6);
      assert_eq!(frame.height(), 4);
      assert!(frame.stride() >= 6 * 3);
      assert_eq!(frame.data().len(), frame.stride() * 4);
      frames += 1;
    }
    assert_eq!(frames, 3);

    // exhausted input keeps the stream open
    assert!(grabber.is_open());
    assert!(grabber.decode_next_frame().unwrap().is_none());

    grabber.close().unwrap();
    assert!(!grabber.is_open());
    assert!(grabber.codec_name().is_none());
  }

  #[test]
  fn test_decode_failure_closes_stream() {
    let frame_len = 6 * 4 * 3;
    let clip = RawClip::write_with_tail("truncated", 6, 4, 2, frame_len / 2);
    let mut grabber = FrameGrabber::new();
    grabber.open(clip.url(), raw_options(6, 4), None).unwrap();

    assert!(grabber.decode_next_frame().unwrap().is_some());
    assert!(grabber.decode_next_frame().unwrap().is_some());

    // rawvideo refuses a packet shorter than one picture
    let err = grabber.decode_next_frame().unwrap_err();
    assert!(!err.is_invalid_state());
    assert_eq!(err.code(), Some(AVERROR_EINVAL));
    assert!(!grabber.is_open());
    assert!(grabber.info().is_none());
    assert!(grabber.close().unwrap_err().is_invalid_state());
  }

  #[test]
  fn test_open_twice_is_rejected() {
    let clip = RawClip::write("reopen", 4, 2, 1);
    let mut grabber = FrameGrabber::new();
    grabber.open(clip.url(), raw_options(4, 2), None).unwrap();

    let err = grabber.open(clip.url(), raw_options(4, 2), None).unwrap_err();
    assert!(err.is_invalid_state());
    assert_eq!(err.to_string(), "Stream is already open");
    // the first session is untouched
    assert_eq!(grabber.frame_size(), Some(FrameSize { width: 4, height: 2 }));

    grabber.dispose();
    grabber.dispose();
    assert!(!grabber.is_open());
  }

  #[test]
  fn test_open_reports_summary() {
    let clip = RawClip::write("summary", 4, 2, 1);
    let lines = Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
    let captured = lines.clone();
    let mut grabber = FrameGrabber::with_diagnostics(Arc::new(move |line: &str| {
      captured.lock().unwrap().push(line.to_string());
    }));
    grabber.open(clip.url(), raw_options(4, 2), None).unwrap();

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(
      lines[0],
      "Video stream opened successfully (Codec: rawvideo, Frame size: 4x2, Pixel format: rgb24)"
    );
  }

  #[test]
  fn test_named_decoder_without_backend_suffix() {
    let clip = RawClip::write("named", 4, 2, 1);
    let (diag, lines) = capturing();
    let mut grabber = FrameGrabber {
      session: None,
      diagnostics: diag,
    };
    grabber
      .open(clip.url(), raw_options(4, 2), Some("rawvideo"))
      .unwrap();
    assert_eq!(grabber.hw_accel(), HwAccelKind::None);
    assert_eq!(
      lines.lock().unwrap()[0],
      "Unsupported hardware accelerated codec 'rawvideo'"
    );
    assert!(grabber.decode_next_frame().unwrap().is_some());
  }
}
