// product_widget/src/storage/json_dir.rs

//! File-backed shared storage: one flat JSON object per area, stored as
//! `<root>/<area>.json`.

use super::{SharedStorage, StoredValue};
use crate::error::{WidgetError, WidgetResult};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonDirStorage {
  root: PathBuf,
}

impl JsonDirStorage {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn area_path(&self, area: &str) -> WidgetResult<PathBuf> {
    if area.is_empty() || area.contains(['/', '\\']) || area == "." || area == ".." {
      return Err(WidgetError::StorageUnavailable {
        area: area.to_string(),
        source: anyhow::anyhow!("area name is not a valid file name"),
      });
    }
    Ok(self.root.join(format!("{}.json", area)))
  }

  /// Reads the whole area. The host may rewrite the file at any time, so
  /// nothing is cached between reads.
  fn load_area(&self, area: &str) -> WidgetResult<BTreeMap<String, StoredValue>> {
    let path = self.area_path(area)?;
    let raw = match fs::read_to_string(&path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
      Err(e) => {
        return Err(WidgetError::StorageUnavailable {
          area: area.to_string(),
          source: anyhow::Error::new(e).context(format!("reading {}", path.display())),
        })
      }
    };

    let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(&raw)
      .with_context(|| format!("parsing {}", path.display()))
      .map_err(|source| WidgetError::StorageUnavailable {
        area: area.to_string(),
        source,
      })?;

    // Nested values have no counterpart in a flat preferences store.
    Ok(
      entries
        .into_iter()
        .filter_map(|(key, value)| serde_json::from_value::<StoredValue>(value).ok().map(|v| (key, v)))
        .collect(),
    )
  }
}

impl SharedStorage for JsonDirStorage {
  fn get(&self, area: &str, key: &str) -> WidgetResult<Option<StoredValue>> {
    Ok(self.load_area(area)?.remove(key))
  }

  fn keys(&self, area: &str) -> WidgetResult<Vec<String>> {
    Ok(self.load_area(area)?.into_keys().collect())
  }
}
