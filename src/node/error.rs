//! JavaScript error mapping
//!
//! Errors cross into JavaScript as `Error` objects whose message starts with a
//! DOMException-style name, so callers can branch on `err.message`.

use napi::bindgen_prelude::*;

use crate::grabber::GrabberError;

#[derive(Debug, Clone, Copy)]
pub enum ErrorName {
  /// Wrong state for the call (open twice, decode while closed)
  InvalidStateError,
  /// FFmpeg or pipeline failure
  EncodingError,
  /// Bad argument from JavaScript
  TypeError,
}

impl ErrorName {
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorName::InvalidStateError => "InvalidStateError",
      ErrorName::EncodingError => "EncodingError",
      ErrorName::TypeError => "TypeError",
    }
  }
}

pub fn named_error(name: ErrorName, message: &str) -> Error {
  Error::new(
    Status::GenericFailure,
    format!("{}: {}", name.as_str(), message),
  )
}

pub fn lock_poisoned() -> Error {
  Error::new(Status::GenericFailure, "Lock poisoned")
}

/// Convert a grabber failure; native failures already carry their code
pub fn grabber_error(err: GrabberError) -> Error {
  let name = if err.is_invalid_state() {
    ErrorName::InvalidStateError
  } else {
    ErrorName::EncodingError
  };
  named_error(name, &err.to_string())
}
