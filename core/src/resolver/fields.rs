// product_widget/src/resolver/fields.rs

//! Scattered-key reads: each candidate source yields a partial field map, and
//! maps are merged in scan order with last-non-empty-wins.

use super::layout::{field, CandidateSource};
use crate::core::ProductSnapshot;
use crate::error::WidgetResult;
use crate::storage::SharedStorage;
use tracing::{event, Level};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScatteredFields {
  pub id: Option<String>,
  pub name: Option<String>,
  pub image_url: Option<String>,
  pub price: Option<String>,
  pub regular_price: Option<String>,
  /// Explicit discount flag, if the source stored one.
  pub has_discount: Option<bool>,
}

impl ScatteredFields {
  /// Reads every logical field from one source. Empty strings count as absent.
  pub fn read(storage: &dyn SharedStorage, source: &CandidateSource) -> WidgetResult<Self> {
    let text = |name: &str| -> WidgetResult<Option<String>> {
      Ok(storage.get_string(&source.area, &source.key(name))?.filter(|v| !v.is_empty()))
    };
    Ok(Self {
      id: text(field::ID)?,
      name: text(field::NAME)?,
      image_url: text(field::IMAGE)?,
      price: text(field::PRICE)?,
      regular_price: text(field::REGULAR_PRICE)?,
      has_discount: storage.get_bool(&source.area, &source.key(field::HAS_DISCOUNT))?,
    })
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  /// Overlays `later` on top of `self`: every value present in `later` wins.
  pub fn merge(self, later: ScatteredFields) -> ScatteredFields {
    ScatteredFields {
      id: later.id.or(self.id),
      name: later.name.or(self.name),
      image_url: later.image_url.or(self.image_url),
      price: later.price.or(self.price),
      regular_price: later.regular_price.or(self.regular_price),
      has_discount: later.has_discount.or(self.has_discount),
    }
  }

  /// Final snapshot for the merged fields, or `None` without a name.
  ///
  /// A resolved regular price always turns the discount on; the explicit flag
  /// only matters when no regular price was found.
  pub fn into_snapshot(self) -> Option<ProductSnapshot> {
    let name = self.name?;
    let regular_price = self.regular_price.unwrap_or_default();
    let has_discount = !regular_price.is_empty() || self.has_discount.unwrap_or(false);
    Some(ProductSnapshot {
      id: self.id,
      name,
      image_url: self.image_url.unwrap_or_default(),
      price: self.price.unwrap_or_default(),
      regular_price,
      has_discount,
    })
  }
}

/// Folds all sources in order. A source that cannot be read contributes nothing.
pub fn scan_sources(storage: &dyn SharedStorage, sources: &[CandidateSource]) -> ScatteredFields {
  sources.iter().fold(ScatteredFields::default(), |acc, source| {
    if tracing::enabled!(Level::TRACE) {
      match storage.keys(&source.area) {
        Ok(keys) => event!(Level::TRACE, area = %source.area, keys = ?keys, "Keys present in storage area."),
        Err(e) => event!(Level::TRACE, area = %source.area, error = %e, "Could not list storage area keys."),
      }
    }
    match ScatteredFields::read(storage, source) {
      Ok(found) => {
        if let Some(name) = &found.name {
          event!(Level::DEBUG, area = %source.area, prefix = %source.prefix, name = %name, "Found product name.");
        }
        acc.merge(found)
      }
      Err(e) => {
        event!(Level::WARN, area = %source.area, prefix = %source.prefix, error = %e, "Skipping unreadable storage source.");
        acc
      }
    }
  })
}
