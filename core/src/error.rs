// product_widget/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
  #[error("Storage area '{area}' unavailable. Source: {source}")]
  StorageUnavailable {
    area: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Malformed product document at '{area}'/'{key}'. Source: {source}")]
  MalformedDocument {
    area: String,
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid image URL '{url}': {reason}")]
  InvalidImageUrl { url: String, reason: String },

  #[error("Image request for '{url}' failed. Source: {source}")]
  ImageFetch {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Image request for '{url}' returned HTTP {status}")]
  ImageStatus { url: String, status: u16 },

  #[error("Could not decode image from '{url}': {reason}")]
  ImageDecode { url: String, reason: String },

  #[error("Launch target could not be resolved: {0}")]
  LaunchUnresolved(String),

  #[error("Widget registry failed: {0}")]
  Registry(String),

  #[error("Configuration error for '{key}': {message}")]
  Config { key: String, message: String },

  #[error("Error in host adapter. Source: {source}")]
  Host {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal widget error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for WidgetError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a WidgetError that went through anyhow rather than nesting it.
    match err.downcast::<WidgetError>() {
      Ok(widget_err) => widget_err,
      Err(source) => WidgetError::Host { source },
    }
  }
}

pub type WidgetResult<T, E = WidgetError> = std::result::Result<T, E>;
