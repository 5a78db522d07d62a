//! Owned AVDictionary for demuxer/protocol options
//!
//! An empty dictionary is a NULL pointer, which is what FFmpeg expects when
//! no options are given.

use crate::ffi::{
  self,
  avutil::{av_dict_count, av_dict_free, av_dict_set},
  AVDictionary,
};
use std::ffi::CString;

use super::{CodecError, CodecResult};

/// Key/value option set handed to FFmpeg, freed on drop
pub struct Dictionary {
  ptr: *mut AVDictionary,
}

impl Dictionary {
  /// Create an empty dictionary (no native allocation)
  pub fn new() -> Self {
    Self {
      ptr: std::ptr::null_mut(),
    }
  }

  /// Build a dictionary from key/value pairs
  ///
  /// Every pair is validated before the first native allocation, so a bad
  /// entry never leaves a half-built dictionary behind.
  pub fn from_pairs<I, K, V>(pairs: I) -> CodecResult<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let entries = pairs
      .into_iter()
      .map(|(k, v)| Ok((to_cstring(k.as_ref())?, to_cstring(v.as_ref())?)))
      .collect::<CodecResult<Vec<_>>>()?;

    let mut dict = Self::new();
    for (key, value) in &entries {
      dict.set_c(key, value)?;
    }
    Ok(dict)
  }

  fn set_c(&mut self, key: &CString, value: &CString) -> CodecResult<()> {
    let ret = unsafe { av_dict_set(&mut self.ptr, key.as_ptr(), value.as_ptr(), 0) };
    ffi::check_error(ret)?;
    Ok(())
  }

  /// Number of entries
  pub fn len(&self) -> usize {
    unsafe { av_dict_count(self.ptr).max(0) as usize }
  }

  pub fn is_empty(&self) -> bool {
    self.ptr.is_null() || self.len() == 0
  }

  /// Pointer-to-pointer for FFmpeg calls that consume and rewrite the dictionary
  ///
  /// FFmpeg leaves unconsumed entries behind; they are freed on drop.
  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut *mut AVDictionary {
    &mut self.ptr
  }
}

impl Default for Dictionary {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for Dictionary {
  fn drop(&mut self) {
    if !self.ptr.is_null() {
      unsafe { av_dict_free(&mut self.ptr) }
    }
  }
}

// Dictionary is Send but not Sync
unsafe impl Send for Dictionary {}

fn to_cstring(s: &str) -> CodecResult<CString> {
  CString::new(s)
    .map_err(|_| CodecError::InvalidConfig(format!("Option '{}' contains a NUL byte", s.escape_debug())))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_dictionary_is_null() {
    let dict = Dictionary::new();
    assert!(dict.is_empty());
    assert_eq!(dict.len(), 0);
  }

  #[test]
  fn test_from_pairs() {
    let dict = Dictionary::from_pairs([("rtsp_transport", "tcp"), ("timeout", "5000000")]).unwrap();
    assert_eq!(dict.len(), 2);
    assert!(!dict.is_empty());
  }

  #[test]
  fn test_duplicate_keys_overwrite() {
    let dict =
      Dictionary::from_pairs([("rtsp_transport", "udp"), ("rtsp_transport", "tcp")]).unwrap();
    assert_eq!(dict.len(), 1);
  }

  #[test]
  fn test_nul_byte_rejected() {
    let err = Dictionary::from_pairs([("ok", "fine"), ("bad\0key", "x")]).err().unwrap();
    assert!(matches!(err, CodecError::InvalidConfig(_)));

    let err = Dictionary::from_pairs([("key", "bad\0value")]).err().unwrap();
    assert!(matches!(err, CodecError::InvalidConfig(_)));
  }
}
