// product_widget/src/storage/memory.rs

use super::{SharedStorage, StoredValue};
use crate::error::{WidgetError, WidgetResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};

/// In-process shared storage, for headless hosts and tests.
///
/// The widget never writes; the `set`/`remove` methods stand in for the host app.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  areas: RwLock<HashMap<String, BTreeMap<String, StoredValue>>>,
  unavailable: RwLock<HashSet<String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style `set`.
  pub fn with(self, area: &str, key: &str, value: impl Into<StoredValue>) -> Self {
    self.set(area, key, value);
    self
  }

  pub fn set(&self, area: &str, key: &str, value: impl Into<StoredValue>) {
    self
      .areas
      .write()
      .entry(area.to_string())
      .or_default()
      .insert(key.to_string(), value.into());
  }

  pub fn remove(&self, area: &str, key: &str) {
    if let Some(entries) = self.areas.write().get_mut(area) {
      entries.remove(key);
    }
  }

  pub fn clear(&self) {
    self.areas.write().clear();
  }

  /// Makes every read of `area` fail, simulating a storage file that cannot be opened.
  pub fn mark_unavailable(&self, area: &str) {
    self.unavailable.write().insert(area.to_string());
  }

  fn check_available(&self, area: &str) -> WidgetResult<()> {
    if self.unavailable.read().contains(area) {
      return Err(WidgetError::StorageUnavailable {
        area: area.to_string(),
        source: anyhow::anyhow!("area marked unavailable"),
      });
    }
    Ok(())
  }
}

impl SharedStorage for MemoryStorage {
  fn get(&self, area: &str, key: &str) -> WidgetResult<Option<StoredValue>> {
    self.check_available(area)?;
    Ok(self.areas.read().get(area).and_then(|entries| entries.get(key).cloned()))
  }

  fn keys(&self, area: &str) -> WidgetResult<Vec<String>> {
    self.check_available(area)?;
    Ok(
      self
        .areas
        .read()
        .get(area)
        .map(|entries| entries.keys().cloned().collect())
        .unwrap_or_default(),
    )
  }
}
