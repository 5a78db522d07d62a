//! Pull-based RGB frame grabbing from network video streams
//!
//! ```no_run
//! use rtsp_frame_grabber::grabber::FrameGrabber;
//!
//! # fn main() -> Result<(), rtsp_frame_grabber::grabber::GrabberError> {
//! let mut grabber = FrameGrabber::new();
//! grabber.open("rtsp://camera.local/stream", [("rtsp_transport", "tcp")], None)?;
//! while let Some(frame) = grabber.decode_next_frame()? {
//!   println!("{}x{} stride {}", frame.width(), frame.height(), frame.stride());
//! }
//! grabber.close()?;
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod error;
pub mod frame;
pub mod hwaccel;
pub mod session;

pub use diagnostics::{DiagnosticSink, Diagnostics};
pub use error::{FrameError, GrabberError, GrabberResult};
pub use frame::RgbFrame;
pub use hwaccel::{HwAccelKind, HwAccelResolution};
pub use session::{FrameGrabber, FrameSize, PixelFormat, SessionInfo};
