//! Node.js API surface (NAPI classes and functions)

pub mod error;
pub mod grabber;
pub mod logging;

pub use grabber::{JsFrameSize, JsRgbFrame, RtspFrameGrabber};
pub use logging::{enable_tracing, setup_logging, JsLogLevel, LoggingOptions};
