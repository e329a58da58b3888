// product_widget/src/resolver/document.rs

//! Strict decoding of a serialized product document into a [`ProductSnapshot`].

use super::layout::DocumentSchema;
use crate::config::DiscountPolicy;
use crate::core::ProductSnapshot;
use serde::de::Error as _;
use serde::Deserialize;

const DEFAULT_NAME: &str = "Product";
const DEFAULT_PRICE: &str = "$0.00";

/// `product_id` is written as a string by some host versions and as an integer
/// by others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpaqueId {
  Text(String),
  Number(i64),
}

impl From<OpaqueId> for String {
  fn from(id: OpaqueId) -> Self {
    match id {
      OpaqueId::Text(s) => s,
      OpaqueId::Number(n) => n.to_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
struct HomeWidgetDocument {
  #[serde(default)]
  product_id: Option<OpaqueId>,
  #[serde(default)]
  product_name: Option<String>,
  #[serde(default)]
  product_price: Option<String>,
  #[serde(default)]
  product_image: Option<String>,
  #[serde(default)]
  product_has_discount: Option<bool>,
  #[serde(default)]
  product_regular_price: Option<String>,
}

impl HomeWidgetDocument {
  fn into_snapshot(self, policy: DiscountPolicy) -> ProductSnapshot {
    let regular_price = self.product_regular_price.unwrap_or_default();
    let flag = self.product_has_discount.unwrap_or(false);
    let has_discount = match policy {
      DiscountPolicy::Literal => flag,
      DiscountPolicy::RegularPriceImplies => flag || !regular_price.is_empty(),
    };
    ProductSnapshot {
      id: self.product_id.map(String::from).filter(|id| !id.is_empty()),
      name: self.product_name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
      image_url: self.product_image.unwrap_or_default(),
      price: self.product_price.unwrap_or_else(|| DEFAULT_PRICE.to_string()),
      regular_price,
      has_discount,
    }
  }
}

#[derive(Debug, Deserialize)]
struct AppGroupDocument {
  id: i64,
  name: String,
  image: String,
  price: String,
}

impl From<AppGroupDocument> for ProductSnapshot {
  fn from(doc: AppGroupDocument) -> Self {
    ProductSnapshot {
      id: Some(doc.id.to_string()),
      name: doc.name,
      image_url: doc.image,
      price: doc.price,
      regular_price: String::new(),
      has_discount: false,
    }
  }
}

/// Decodes `raw` with the given schema.
///
/// The payload must be a JSON object; arrays and scalars are rejected even
/// where serde would accept them for a struct.
pub fn decode_document(
  raw: &str,
  schema: DocumentSchema,
  policy: DiscountPolicy,
) -> Result<ProductSnapshot, serde_json::Error> {
  let value: serde_json::Value = serde_json::from_str(raw)?;
  if !value.is_object() {
    return Err(serde_json::Error::custom("product document is not a JSON object"));
  }
  match schema {
    DocumentSchema::HomeWidget => serde_json::from_value::<HomeWidgetDocument>(value).map(|doc| doc.into_snapshot(policy)),
    DocumentSchema::AppGroup => serde_json::from_value::<AppGroupDocument>(value).map(ProductSnapshot::from),
  }
}
