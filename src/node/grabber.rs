//! RtspFrameGrabber - Node.js binding for [`FrameGrabber`]
//!
//! Opening and decoding block on the network, so both run on the tokio
//! blocking pool and resolve a Promise. The grabber sits behind a mutex,
//! which also serializes calls made without awaiting the previous one.
//! Attribute getters read a snapshot published after open, close and fatal
//! decode errors, so they never wait behind a stalled read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use napi::bindgen_prelude::*;
use napi_derive::napi;

use crate::grabber::{self, FrameGrabber, SessionInfo};

use super::error::{grabber_error, lock_poisoned};

/// A decoded picture in packed RGB24
#[napi(object, js_name = "RgbFrame")]
pub struct JsRgbFrame {
  /// `height * stride` bytes, rows top to bottom
  pub data: Uint8Array,
  pub width: u32,
  pub height: u32,
  /// Bytes per row, at least `width * 3`
  pub stride: u32,
}

impl From<grabber::RgbFrame> for JsRgbFrame {
  fn from(frame: grabber::RgbFrame) -> Self {
    let width = frame.width();
    let height = frame.height();
    let stride = frame.stride() as u32;
    Self {
      data: Uint8Array::from(frame.into_data()),
      width,
      height,
      stride,
    }
  }
}

#[napi(object, js_name = "FrameSize")]
pub struct JsFrameSize {
  pub width: u32,
  pub height: u32,
}

#[napi]
pub struct RtspFrameGrabber {
  inner: Arc<Mutex<FrameGrabber>>,
  info: Arc<RwLock<Option<SessionInfo>>>,
}

#[napi]
impl RtspFrameGrabber {
  #[napi(constructor)]
  pub fn new() -> Self {
    Self {
      inner: Arc::new(Mutex::new(FrameGrabber::new())),
      info: Arc::new(RwLock::new(None)),
    }
  }

  /// Open a stream and negotiate its best video track
  ///
  /// `options` go to FFmpeg unchanged, e.g. `{ rtsp_transport: 'tcp' }`.
  /// `hardwareDecoder` names an FFmpeg decoder such as `h264_cuvid`.
  #[napi]
  pub async fn open(
    &self,
    url: String,
    options: Option<HashMap<String, String>>,
    hardware_decoder: Option<String>,
  ) -> Result<()> {
    let inner = self.inner.clone();
    let info = self.info.clone();

    tokio::task::spawn_blocking(move || {
      let mut guard = inner.lock().map_err(|_| lock_poisoned())?;
      let opened = guard.open(&url, options.unwrap_or_default(), hardware_decoder.as_deref());
      publish(&info, &guard)?;
      opened.map_err(grabber_error)
    })
    .await
    .map_err(|e| Error::new(Status::GenericFailure, format!("Task error: {}", e)))?
  }

  /// Decode the next frame; resolves `null` at the end of the input
  ///
  /// A rejected Promise means the stream was closed.
  #[napi(ts_return_type = "Promise<RgbFrame | null>")]
  pub async fn decode_next_frame(&self) -> Result<Option<JsRgbFrame>> {
    let inner = self.inner.clone();
    let info = self.info.clone();

    tokio::task::spawn_blocking(move || {
      let mut guard = inner.lock().map_err(|_| lock_poisoned())?;
      match guard.decode_next_frame() {
        Ok(frame) => Ok(frame.map(JsRgbFrame::from)),
        Err(e) => {
          // a fatal error closed the stream
          publish(&info, &guard)?;
          Err(grabber_error(e))
        }
      }
    })
    .await
    .map_err(|e| Error::new(Status::GenericFailure, format!("Task error: {}", e)))?
  }

  /// Close the stream; throws if it is not open
  #[napi]
  pub fn close(&self) -> Result<()> {
    let mut guard = self.lock()?;
    let closed = guard.close();
    publish(&self.info, &guard)?;
    closed.map_err(grabber_error)
  }

  /// Close the stream if it is open
  #[napi]
  pub fn dispose(&self) -> Result<()> {
    let mut guard = self.lock()?;
    guard.dispose();
    publish(&self.info, &guard)
  }

  #[napi(getter)]
  pub fn is_open(&self) -> Result<bool> {
    Ok(self.snapshot()?.is_some())
  }

  #[napi(getter)]
  pub fn url(&self) -> Result<Option<String>> {
    Ok(self.snapshot()?.map(|info| info.url))
  }

  #[napi(getter)]
  pub fn codec_name(&self) -> Result<Option<String>> {
    Ok(self.snapshot()?.map(|info| info.codec_name))
  }

  #[napi(getter)]
  pub fn frame_size(&self) -> Result<Option<JsFrameSize>> {
    Ok(self.snapshot()?.map(|info| JsFrameSize {
      width: info.frame_size.width,
      height: info.frame_size.height,
    }))
  }

  /// FFmpeg pixel format name, e.g. `yuv420p`
  #[napi(getter)]
  pub fn pixel_format(&self) -> Result<Option<String>> {
    Ok(self.snapshot()?.map(|info| info.pixel_format.to_string()))
  }

  /// Acceleration backend in use, `none` without one
  #[napi(getter)]
  pub fn hardware_accelerator(&self) -> Result<String> {
    let kind = self.snapshot()?.map(|info| info.hw_accel).unwrap_or_default();
    Ok(kind.name().to_string())
  }
}

impl RtspFrameGrabber {
  fn lock(&self) -> Result<MutexGuard<'_, FrameGrabber>> {
    self.inner.lock().map_err(|_| lock_poisoned())
  }

  fn snapshot(&self) -> Result<Option<SessionInfo>> {
    Ok(self.info.read().map_err(|_| lock_poisoned())?.clone())
  }
}

/// Mirror the grabber's state into the getter snapshot
fn publish(info: &RwLock<Option<SessionInfo>>, grabber: &FrameGrabber) -> Result<()> {
  *info.write().map_err(|_| lock_poisoned())? = grabber.info().cloned();
  Ok(())
}

impl Default for RtspFrameGrabber {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grabber::{FrameSize, HwAccelKind, PixelFormat};
  use std::sync::mpsc;
  use std::time::Duration;

  #[test]
  fn test_closed_getters() {
    let grabber = RtspFrameGrabber::new();
    assert!(!grabber.is_open().unwrap());
    assert!(grabber.url().unwrap().is_none());
    assert!(grabber.frame_size().unwrap().is_none());
    assert_eq!(grabber.hardware_accelerator().unwrap(), "none");
  }

  #[test]
  fn test_getters_do_not_wait_for_decode_lock() {
    let grabber = Arc::new(RtspFrameGrabber::new());
    // stands in for a decode stuck in a network read
    let busy = grabber.inner.lock().unwrap();

    let (tx, rx) = mpsc::channel();
    let reader = grabber.clone();
    std::thread::spawn(move || {
      let state = (
        reader.is_open().unwrap(),
        reader.codec_name().unwrap(),
        reader.pixel_format().unwrap(),
        reader.hardware_accelerator().unwrap(),
      );
      let _ = tx.send(state);
    });

    let (open, codec, format, accel) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(!open);
    assert!(codec.is_none());
    assert!(format.is_none());
    assert_eq!(accel, "none");
    drop(busy);
  }

  #[test]
  fn test_snapshot_follows_close() {
    let grabber = RtspFrameGrabber::new();
    *grabber.info.write().unwrap() = Some(SessionInfo {
      url: "rtsp://camera/stream".to_string(),
      stream_index: 0,
      codec_name: "h264".to_string(),
      frame_size: FrameSize {
        width: 640,
        height: 480,
      },
      pixel_format: PixelFormat::from_raw(0),
      hw_accel: HwAccelKind::Cuda,
    });
    assert!(grabber.is_open().unwrap());
    assert_eq!(grabber.hardware_accelerator().unwrap(), "cuda");

    grabber.dispose().unwrap();
    assert!(!grabber.is_open().unwrap());
    assert!(grabber.url().unwrap().is_none());
  }
}
