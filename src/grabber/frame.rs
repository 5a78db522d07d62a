//! Decoded and converted picture handed to callers

use super::error::FrameError;

/// Bytes per pixel of the packed RGB24 layout
pub const RGB24_BYTES_PER_PIXEL: usize = 3;

/// An immutable packed RGB24 picture
///
/// Rows are stored top to bottom, `stride()` bytes apart. The stride may
/// exceed `width * 3` because of alignment padding at the end of each row.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbFrame {
  data: Vec<u8>,
  width: u32,
  height: u32,
}

impl RgbFrame {
  /// Build a frame from row-major RGB24 bytes
  pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
    if data.is_empty() {
      return Err(FrameError::EmptyData);
    }
    if width == 0 {
      return Err(FrameError::ZeroWidth);
    }
    if height == 0 {
      return Err(FrameError::ZeroHeight);
    }

    let min_stride = width as usize * RGB24_BYTES_PER_PIXEL;
    let len = data.len();
    if len % height as usize != 0 || len / (height as usize) < min_stride {
      return Err(FrameError::RaggedData {
        len,
        height,
        min_stride,
      });
    }

    Ok(Self {
      data,
      width,
      height,
    })
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Distance in bytes between the starts of two rows
  #[inline]
  pub fn stride(&self) -> usize {
    self.data.len() / self.height as usize
  }

  /// All bytes, padding included
  #[inline]
  pub fn data(&self) -> &[u8] {
    &self.data
  }

  /// The visible `width * 3` bytes of row `y`
  pub fn row(&self, y: u32) -> Option<&[u8]> {
    if y >= self.height {
      return None;
    }
    let start = y as usize * self.stride();
    Some(&self.data[start..start + self.width as usize * RGB24_BYTES_PER_PIXEL])
  }

  pub fn into_data(self) -> Vec<u8> {
    self.data
  }
}

impl std::fmt::Debug for RgbFrame {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RgbFrame")
      .field("width", &self.width)
      .field("height", &self.height)
      .field("stride", &self.stride())
      .field("len", &self.data.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tight_frame() {
    let frame = RgbFrame::new(vec![0u8; 4 * 2 * 3], 4, 2).unwrap();
    assert_eq!(frame.width(), 4);
    assert_eq!(frame.height(), 2);
    assert_eq!(frame.stride(), 12);
    assert_eq!(frame.data().len(), 24);
  }

  #[test]
  fn test_padded_frame() {
    // 5 px * 3 = 15 visible bytes, padded to 32
    let mut data = vec![0u8; 32 * 3];
    data[32] = 7;
    let frame = RgbFrame::new(data, 5, 3).unwrap();
    assert_eq!(frame.stride(), 32);
    let row = frame.row(1).unwrap();
    assert_eq!(row.len(), 15);
    assert_eq!(row[0], 7);
    assert!(frame.row(3).is_none());
  }

  #[test]
  fn test_validation_errors_are_distinct() {
    assert_eq!(RgbFrame::new(Vec::new(), 1, 1).unwrap_err(), FrameError::EmptyData);
    assert_eq!(RgbFrame::new(vec![0; 3], 0, 1).unwrap_err(), FrameError::ZeroWidth);
    assert_eq!(RgbFrame::new(vec![0; 3], 1, 0).unwrap_err(), FrameError::ZeroHeight);
  }

  #[test]
  fn test_ragged_data() {
    // not a whole number of rows
    assert!(matches!(
      RgbFrame::new(vec![0; 13], 2, 2),
      Err(FrameError::RaggedData { .. })
    ));
    // rows shorter than width * 3
    assert!(matches!(
      RgbFrame::new(vec![0; 10], 4, 2),
      Err(FrameError::RaggedData { .. })
    ));
  }

  #[test]
  fn test_into_data() {
    let frame = RgbFrame::new(vec![1, 2, 3], 1, 1).unwrap();
    assert_eq!(frame.into_data(), vec![1, 2, 3]);
  }
}
