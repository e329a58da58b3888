// product_widget/src/storage/mod.rs

//! Read-only view of the key-value areas the host app writes into
//! (Android SharedPreferences files, iOS app-group UserDefaults suites).

pub mod json_dir;
pub mod memory;

pub use json_dir::JsonDirStorage;
pub use memory::MemoryStorage;

use crate::error::WidgetResult;
use serde::{Deserialize, Serialize};

/// A single stored value. Mirrors the primitive types the platform stores
/// support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
}

impl StoredValue {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      StoredValue::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      StoredValue::Bool(b) => Some(*b),
      _ => None,
    }
  }
}

impl From<&str> for StoredValue {
  fn from(s: &str) -> Self {
    StoredValue::String(s.to_string())
  }
}

impl From<String> for StoredValue {
  fn from(s: String) -> Self {
    StoredValue::String(s)
  }
}

impl From<bool> for StoredValue {
  fn from(b: bool) -> Self {
    StoredValue::Bool(b)
  }
}

impl From<i64> for StoredValue {
  fn from(i: i64) -> Self {
    StoredValue::Int(i)
  }
}

/// Platform shared storage. The widget only ever reads from it.
///
/// A missing area behaves like an empty one; an `Err` means the area could
/// not be read at all.
pub trait SharedStorage: Send + Sync {
  fn get(&self, area: &str, key: &str) -> WidgetResult<Option<StoredValue>>;

  /// Keys currently present in `area`, for diagnostics.
  fn keys(&self, area: &str) -> WidgetResult<Vec<String>>;

  /// String value under `key`; values of another type count as absent.
  fn get_string(&self, area: &str, key: &str) -> WidgetResult<Option<String>> {
    Ok(match self.get(area, key)? {
      Some(StoredValue::String(s)) => Some(s),
      Some(other) => {
        tracing::debug!(area, key, value = ?other, "Ignoring non-string value.");
        None
      }
      None => None,
    })
  }

  /// Boolean value under `key`; values of another type count as absent.
  fn get_bool(&self, area: &str, key: &str) -> WidgetResult<Option<bool>> {
    Ok(match self.get(area, key)? {
      Some(StoredValue::Bool(b)) => Some(b),
      Some(other) => {
        tracing::debug!(area, key, value = ?other, "Ignoring non-boolean value.");
        None
      }
      None => None,
    })
  }
}
