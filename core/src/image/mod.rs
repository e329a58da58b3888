pub mod bitmap;
pub mod fetcher;

pub use bitmap::{Bitmap, ImageFormat};
pub use fetcher::{HttpImageFetcher, ImageFetcher};
