// product_widget/src/resolver/resolve.rs

use super::document::decode_document;
use super::fields::scan_sources;
use super::layout::{DocumentLocation, StorageLayout};
use crate::config::DiscountPolicy;
use crate::core::ProductSnapshot;
use crate::error::WidgetError;
use crate::storage::SharedStorage;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Where a resolved snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOrigin {
  Document { area: String, key: String },
  Scan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Found {
    snapshot: ProductSnapshot,
    origin: SnapshotOrigin,
  },
  NoData,
}

impl Resolution {
  pub fn snapshot(&self) -> Option<&ProductSnapshot> {
    match self {
      Resolution::Found { snapshot, .. } => Some(snapshot),
      Resolution::NoData => None,
    }
  }

  pub fn into_snapshot_or_placeholder(self) -> ProductSnapshot {
    match self {
      Resolution::Found { snapshot, .. } => snapshot,
      Resolution::NoData => ProductSnapshot::placeholder(),
    }
  }
}

/// Locates the single authoritative product snapshot in shared storage.
///
/// Never fails: unreadable areas and malformed documents are logged and
/// treated as absent.
pub struct SnapshotResolver {
  storage: Arc<dyn SharedStorage>,
  layout: StorageLayout,
  document_policy: DiscountPolicy,
}

impl SnapshotResolver {
  pub fn new(storage: Arc<dyn SharedStorage>, layout: StorageLayout) -> Self {
    Self {
      storage,
      layout,
      document_policy: DiscountPolicy::default(),
    }
  }

  pub fn with_document_policy(mut self, policy: DiscountPolicy) -> Self {
    self.document_policy = policy;
    self
  }

  pub fn layout(&self) -> &StorageLayout {
    &self.layout
  }

  #[instrument(name = "SnapshotResolver::resolve", skip_all)]
  pub fn resolve(&self) -> Resolution {
    if let Some((snapshot, location)) = self.find_document() {
      event!(
        Level::DEBUG,
        area = %location.area,
        key = %location.key,
        name = %snapshot.name,
        price = %snapshot.price,
        has_discount = snapshot.has_discount,
        "Resolved product from structured document."
      );
      return Resolution::Found {
        snapshot,
        origin: SnapshotOrigin::Document {
          area: location.area.clone(),
          key: location.key.clone(),
        },
      };
    }

    let merged = scan_sources(self.storage.as_ref(), &self.layout.sources);
    match merged.into_snapshot() {
      Some(snapshot) => {
        event!(
          Level::DEBUG,
          id = ?snapshot.id,
          name = %snapshot.name,
          price = %snapshot.price,
          image = %snapshot.image_url,
          "Resolved product from scattered keys."
        );
        Resolution::Found {
          snapshot,
          origin: SnapshotOrigin::Scan,
        }
      }
      None => {
        event!(Level::INFO, "No product data found in shared storage.");
        Resolution::NoData
      }
    }
  }

  /// Resolved snapshot, or the placeholder when nothing usable is stored.
  pub fn resolve_or_placeholder(&self) -> ProductSnapshot {
    self.resolve().into_snapshot_or_placeholder()
  }

  /// First document location holding a decodable, renderable document.
  fn find_document(&self) -> Option<(ProductSnapshot, &DocumentLocation)> {
    for location in &self.layout.documents {
      let raw = match self.storage.get_string(&location.area, &location.key) {
        Ok(Some(raw)) => raw,
        Ok(None) => continue,
        Err(e) => {
          event!(Level::WARN, area = %location.area, error = %e, "Error reading product document.");
          continue;
        }
      };

      match decode_document(&raw, location.schema, self.document_policy) {
        Ok(snapshot) if snapshot.is_renderable() => return Some((snapshot, location)),
        Ok(_) => {
          event!(Level::WARN, area = %location.area, key = %location.key, "Product document has an empty name, ignoring it.");
        }
        Err(source) => {
          let err = WidgetError::MalformedDocument {
            area: location.area.clone(),
            key: location.key.clone(),
            source,
          };
          event!(Level::WARN, error = %err, "Skipping malformed product document.");
        }
      }
    }
    None
  }
}
