// product_widget/src/image/fetcher.rs

use super::bitmap::Bitmap;
use crate::error::{WidgetError, WidgetResult};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{event, instrument, Level};

/// Retrieves a product image. Runs off the rendering path; callers treat any
/// error as "no image".
#[async_trait]
pub trait ImageFetcher: Send + Sync {
  async fn fetch(&self, url: &str) -> WidgetResult<Bitmap>;
}

/// Fetches images over HTTP(S). No retries and no caching.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
  client: reqwest::Client,
}

impl HttpImageFetcher {
  pub fn new(timeout: Duration) -> WidgetResult<Self> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| WidgetError::Internal(format!("failed to build HTTP client: {}", e)))?;
    Ok(Self { client })
  }

  pub fn with_client(client: reqwest::Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
  #[instrument(name = "HttpImageFetcher::fetch", skip(self), err(Display))]
  async fn fetch(&self, url: &str) -> WidgetResult<Bitmap> {
    let parsed = Url::parse(url).map_err(|e| WidgetError::InvalidImageUrl {
      url: url.to_string(),
      reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
      return Err(WidgetError::InvalidImageUrl {
        url: url.to_string(),
        reason: format!("unsupported scheme '{}'", parsed.scheme()),
      });
    }

    event!(Level::DEBUG, "Starting image download.");
    let response = self.client.get(parsed).send().await.map_err(|source| WidgetError::ImageFetch {
      url: url.to_string(),
      source,
    })?;

    let status = response.status();
    if !status.is_success() {
      return Err(WidgetError::ImageStatus {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    let body = response.bytes().await.map_err(|source| WidgetError::ImageFetch {
      url: url.to_string(),
      source,
    })?;

    let bitmap = Bitmap::decode(&body).map_err(|reason| WidgetError::ImageDecode {
      url: url.to_string(),
      reason,
    })?;
    event!(Level::DEBUG, format = ?bitmap.format(), len = bitmap.len(), "Image download complete.");
    Ok(bitmap)
  }
}
