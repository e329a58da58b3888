// product_widget/src/resolver/layout.rs

//! Where the host app writes product data. The names here are the storage
//! contract with the host; changing them silently degrades the widget to its
//! placeholder.

pub const HOME_WIDGET_AREA: &str = "home_widget";
pub const HOME_WIDGET_DATA_AREA: &str = "home_widget_data";
pub const FLUTTER_SHARED_PREFS_AREA: &str = "FlutterSharedPreferences";
pub const FLUTTER_PREFIX: &str = "flutter.";

pub const PRODUCT_INFO_KEY: &str = "product_info";
pub const RAW_DATA_KEY: &str = "widget_raw_data";
pub const APP_GROUP_PRODUCT_KEY: &str = "product_data";

/// Logical field names probed by the scattered-key scan.
pub mod field {
  pub const ID: &str = "product_id";
  pub const NAME: &str = "product_name";
  pub const IMAGE: &str = "product_image";
  pub const PRICE: &str = "product_price";
  pub const REGULAR_PRICE: &str = "product_regular_price";
  pub const HAS_DISCOUNT: &str = "product_has_discount";
}

/// The JSON shape expected at a document location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSchema {
  /// `product_*` fields, all optional.
  HomeWidget,
  /// `{id, name, image, price}`, all required.
  AppGroup,
}

/// A key that may hold a whole serialized product document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
  pub area: String,
  pub key: String,
  pub schema: DocumentSchema,
}

impl DocumentLocation {
  pub fn new(area: impl Into<String>, key: impl Into<String>, schema: DocumentSchema) -> Self {
    Self {
      area: area.into(),
      key: key.into(),
      schema,
    }
  }
}

/// One position in the scattered-key scan: a storage area read with one key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSource {
  pub area: String,
  pub prefix: String,
}

impl CandidateSource {
  pub fn new(area: impl Into<String>, prefix: impl Into<String>) -> Self {
    Self {
      area: area.into(),
      prefix: prefix.into(),
    }
  }

  pub fn key(&self, field: &str) -> String {
    format!("{}{}", self.prefix, field)
  }
}

/// Ordered document locations (first decodable wins) and ordered scan sources
/// (last non-empty value wins).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageLayout {
  pub documents: Vec<DocumentLocation>,
  pub sources: Vec<CandidateSource>,
}

impl StorageLayout {
  pub fn new(documents: Vec<DocumentLocation>, sources: Vec<CandidateSource>) -> Self {
    Self { documents, sources }
  }

  /// Layout used by the Android home-widget integration.
  pub fn android(package_name: &str) -> Self {
    let mut documents = vec![DocumentLocation::new(
      HOME_WIDGET_AREA,
      PRODUCT_INFO_KEY,
      DocumentSchema::HomeWidget,
    )];
    for area in [HOME_WIDGET_DATA_AREA, FLUTTER_SHARED_PREFS_AREA, package_name] {
      for key in [RAW_DATA_KEY.to_string(), format!("{}{}", FLUTTER_PREFIX, RAW_DATA_KEY)] {
        documents.push(DocumentLocation::new(area, key, DocumentSchema::HomeWidget));
      }
    }

    let app_area = format!("{}.home_widget", package_name);
    let mut sources = Vec::new();
    for area in [HOME_WIDGET_AREA, HOME_WIDGET_DATA_AREA, app_area.as_str()] {
      sources.push(CandidateSource::new(area, ""));
      sources.push(CandidateSource::new(area, FLUTTER_PREFIX));
    }
    // The Flutter plugin always prefixes its keys.
    sources.push(CandidateSource::new(FLUTTER_SHARED_PREFS_AREA, FLUTTER_PREFIX));

    Self { documents, sources }
  }

  /// Layout used by the iOS app-group integration.
  pub fn ios(app_group: &str) -> Self {
    Self {
      documents: vec![DocumentLocation::new(
        app_group,
        APP_GROUP_PRODUCT_KEY,
        DocumentSchema::AppGroup,
      )],
      sources: Vec::new(),
    }
  }
}
