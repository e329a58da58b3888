// product_widget/src/image/bitmap.rs

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
  Png,
  Jpeg,
  Gif,
  WebP,
  Bmp,
}

impl ImageFormat {
  /// Identifies the encoding from its leading signature bytes.
  pub fn sniff(bytes: &[u8]) -> Option<Self> {
    match bytes {
      [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageFormat::Png),
      [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
      [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(ImageFormat::Gif),
      [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(ImageFormat::WebP),
      [b'B', b'M', ..] => Some(ImageFormat::Bmp),
      _ => None,
    }
  }
}

/// An encoded image ready to hand to the platform's image view.
///
/// Cloning shares the underlying bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
  format: ImageFormat,
  bytes: Arc<[u8]>,
}

impl Bitmap {
  /// Accepts `bytes` if they carry a known image signature.
  pub fn decode(bytes: &[u8]) -> Result<Self, String> {
    if bytes.is_empty() {
      return Err("empty response body".to_string());
    }
    let format = ImageFormat::sniff(bytes).ok_or_else(|| "unrecognized image format".to_string())?;
    Ok(Self {
      format,
      bytes: Arc::from(bytes),
    })
  }

  pub fn format(&self) -> ImageFormat {
    self.format
  }

  pub fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

impl fmt::Debug for Bitmap {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Bitmap")
      .field("format", &self.format)
      .field("len", &self.bytes.len())
      .finish()
  }
}
