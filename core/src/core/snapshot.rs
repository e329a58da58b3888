// product_widget/src/core/snapshot.rs

//! The product record rendered by the widget for one refresh cycle.

use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_NAME: &str = "Loading Product...";
pub const PLACEHOLDER_PRICE: &str = "$0.00";

/// A product snapshot as written by the host app.
///
/// Prices are pre-formatted display strings; nothing here parses them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductSnapshot {
  pub id: Option<String>,
  pub name: String,
  pub image_url: String,
  pub price: String,
  pub regular_price: String,
  pub has_discount: bool,
}

impl ProductSnapshot {
  /// The snapshot shown while no product data can be resolved.
  pub fn placeholder() -> Self {
    Self {
      id: None,
      name: PLACEHOLDER_NAME.to_string(),
      image_url: String::new(),
      price: PLACEHOLDER_PRICE.to_string(),
      regular_price: String::new(),
      has_discount: false,
    }
  }

  /// A snapshot can be rendered once it has a name. An empty price is fine.
  pub fn is_renderable(&self) -> bool {
    !self.name.is_empty()
  }

  /// Whether the pre-discount price should be shown next to the price.
  pub fn shows_regular_price(&self) -> bool {
    self.has_discount && !self.regular_price.is_empty()
  }

  pub fn has_image(&self) -> bool {
    !self.image_url.is_empty()
  }
}
