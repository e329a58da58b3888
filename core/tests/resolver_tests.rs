// tests/resolver_tests.rs
mod common;

use common::*;
use product_widget::resolver::layout::{FLUTTER_SHARED_PREFS_AREA, HOME_WIDGET_AREA, HOME_WIDGET_DATA_AREA};
use product_widget::resolver::CandidateSource;
use product_widget::{
  DiscountPolicy, JsonDirStorage, MemoryStorage, ProductSnapshot, Resolution, SharedStorage, SnapshotOrigin,
  SnapshotResolver, StorageLayout, StoredValue, WidgetResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;

/// Counts key listings on top of an in-memory store.
struct CountingStorage {
  inner: MemoryStorage,
  key_listings: AtomicUsize,
}

impl SharedStorage for CountingStorage {
  fn get(&self, area: &str, key: &str) -> WidgetResult<Option<StoredValue>> {
    self.inner.get(area, key)
  }

  fn keys(&self, area: &str) -> WidgetResult<Vec<String>> {
    self.key_listings.fetch_add(1, Ordering::SeqCst);
    self.inner.keys(area)
  }
}

const APP_AREA: &str = "com.melamine_elsherif.home_widget";

fn resolve(storage: MemoryStorage) -> Resolution {
  android_resolver(Arc::new(storage)).resolve()
}

#[test]
fn empty_storage_resolves_to_placeholder() {
  setup_tracing();
  let resolver = android_resolver(Arc::new(MemoryStorage::new()));
  assert_eq!(resolver.resolve(), Resolution::NoData);

  let snapshot = resolver.resolve_or_placeholder();
  assert_eq!(snapshot.name, "Loading Product...");
  assert_eq!(snapshot.price, "$0.00");
  assert_eq!(snapshot.image_url, "");
  assert_eq!(snapshot, ProductSnapshot::placeholder());
}

#[test]
fn unrelated_keys_resolve_to_placeholder() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "theme", "dark")
    .with(FLUTTER_SHARED_PREFS_AREA, "flutter.locale", "ar");
  assert_eq!(resolve(storage), Resolution::NoData);
}

#[test]
fn product_info_document_takes_precedence_over_scattered_keys() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(
      HOME_WIDGET_AREA,
      "product_info",
      product_document("Serving Plate", "$20.00", "https://cdn.example/plate.png", true, "$25.00"),
    )
    .with(HOME_WIDGET_AREA, "product_name", "Scattered Name")
    .with(FLUTTER_SHARED_PREFS_AREA, "flutter.product_price", "$1.00");

  match resolve(storage) {
    Resolution::Found { snapshot, origin } => {
      assert_eq!(
        origin,
        SnapshotOrigin::Document {
          area: HOME_WIDGET_AREA.to_string(),
          key: "product_info".to_string()
        }
      );
      assert_eq!(snapshot.name, "Serving Plate");
      assert_eq!(snapshot.price, "$20.00");
      assert_eq!(snapshot.image_url, "https://cdn.example/plate.png");
      assert!(snapshot.has_discount);
      assert_eq!(snapshot.regular_price, "$25.00");
    }
    Resolution::NoData => panic!("expected document snapshot"),
  }
}

#[test]
fn raw_data_documents_are_found_in_secondary_areas() {
  setup_tracing();
  let storage = MemoryStorage::new().with(
    FLUTTER_SHARED_PREFS_AREA,
    "flutter.widget_raw_data",
    product_document("Soup Bowl", "$4.50", "", false, ""),
  );
  match resolve(storage) {
    Resolution::Found { snapshot, origin } => {
      assert_eq!(snapshot.name, "Soup Bowl");
      assert_eq!(
        origin,
        SnapshotOrigin::Document {
          area: FLUTTER_SHARED_PREFS_AREA.to_string(),
          key: "flutter.widget_raw_data".to_string()
        }
      );
    }
    Resolution::NoData => panic!("expected raw data snapshot"),
  }
}

#[test]
fn product_info_is_preferred_over_raw_data() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_DATA_AREA, "widget_raw_data", product_document("Second", "$2", "", false, ""))
    .with(HOME_WIDGET_AREA, "product_info", product_document("First", "$1", "", false, ""));
  assert_eq!(resolve(storage).snapshot().unwrap().name, "First");
}

#[test]
fn malformed_document_falls_through_to_next_source() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_info", "{not json")
    .with(HOME_WIDGET_DATA_AREA, "widget_raw_data", product_document("Tray", "$9.00", "", false, ""));
  assert_eq!(resolve(storage).snapshot().unwrap().name, "Tray");

  let scan_only = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_info", "[1, 2, 3]")
    .with(HOME_WIDGET_AREA, "product_name", "Kettle");
  match resolve(scan_only) {
    Resolution::Found { snapshot, origin } => {
      assert_eq!(origin, SnapshotOrigin::Scan);
      assert_eq!(snapshot.name, "Kettle");
    }
    Resolution::NoData => panic!("expected scan snapshot"),
  }
}

#[test]
fn document_with_empty_name_is_not_authoritative() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_info", product_document("", "$3.00", "", false, ""))
    .with(HOME_WIDGET_AREA, "product_name", "Glass");
  assert_eq!(resolve(storage).snapshot().unwrap().name, "Glass");
}

#[test]
fn scan_last_non_empty_value_wins() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_name", "From home_widget")
    .with(HOME_WIDGET_AREA, "product_price", "$5.00")
    .with(HOME_WIDGET_DATA_AREA, "flutter.product_name", "From home_widget_data")
    .with(APP_AREA, "product_name", "From app area")
    .with(APP_AREA, "product_price", "")
    .with(FLUTTER_SHARED_PREFS_AREA, "flutter.product_image", "https://cdn.example/cup.png");

  let snapshot = resolve(storage).snapshot().cloned().unwrap();
  assert_eq!(snapshot.name, "From app area");
  // The empty price in the app area does not clobber the earlier value.
  assert_eq!(snapshot.price, "$5.00");
  assert_eq!(snapshot.image_url, "https://cdn.example/cup.png");
}

#[test]
fn prefixed_key_wins_within_an_area() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_name", "Plain")
    .with(HOME_WIDGET_AREA, "flutter.product_name", "Prefixed")
    .with(HOME_WIDGET_AREA, "flutter.product_price", "$6.00")
    .with(HOME_WIDGET_AREA, "product_price", "$5.00");
  let snapshot = resolve(storage).snapshot().cloned().unwrap();
  assert_eq!(snapshot.name, "Prefixed");
  assert_eq!(snapshot.price, "$6.00");
}

#[test]
fn android_scan_order_is_fixed() {
  let layout = StorageLayout::android(PACKAGE);
  let expected = vec![
    CandidateSource::new(HOME_WIDGET_AREA, ""),
    CandidateSource::new(HOME_WIDGET_AREA, "flutter."),
    CandidateSource::new(HOME_WIDGET_DATA_AREA, ""),
    CandidateSource::new(HOME_WIDGET_DATA_AREA, "flutter."),
    CandidateSource::new(APP_AREA, ""),
    CandidateSource::new(APP_AREA, "flutter."),
    CandidateSource::new(FLUTTER_SHARED_PREFS_AREA, "flutter."),
  ];
  assert_eq!(layout.sources, expected);
}

#[test]
fn flutter_prefs_are_only_read_with_prefix() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_name", "Prefixless")
    .with(FLUTTER_SHARED_PREFS_AREA, "product_name", "Should be ignored");
  assert_eq!(resolve(storage).snapshot().unwrap().name, "Prefixless");
}

#[test]
fn regular_price_forces_discount_in_scan() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_name", "Cup")
    .with(HOME_WIDGET_AREA, "product_regular_price", "$10.00")
    .with(HOME_WIDGET_AREA, "product_has_discount", false)
    // A later source without a regular price must not switch the discount off.
    .with(FLUTTER_SHARED_PREFS_AREA, "flutter.product_has_discount", false);

  let snapshot = resolve(storage).snapshot().cloned().unwrap();
  assert!(snapshot.has_discount);
  assert_eq!(snapshot.regular_price, "$10.00");
}

#[test]
fn explicit_flag_applies_without_regular_price() {
  setup_tracing();
  let flagged = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_name", "Cup")
    .with(HOME_WIDGET_DATA_AREA, "product_has_discount", true);
  assert!(resolve(flagged).snapshot().unwrap().has_discount);

  let unflagged = MemoryStorage::new().with(HOME_WIDGET_AREA, "product_name", "Cup");
  assert!(!resolve(unflagged).snapshot().unwrap().has_discount);
}

#[test]
fn non_string_values_are_ignored() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_name", "Spoon")
    .with(HOME_WIDGET_DATA_AREA, "product_name", 42_i64)
    .with(HOME_WIDGET_AREA, "product_price", true);
  let snapshot = resolve(storage).snapshot().cloned().unwrap();
  assert_eq!(snapshot.name, "Spoon");
  assert_eq!(snapshot.price, "");
}

#[test]
fn unavailable_area_is_skipped() {
  setup_tracing();
  let storage = MemoryStorage::new()
    .with(HOME_WIDGET_AREA, "product_name", "Fork")
    .with(HOME_WIDGET_DATA_AREA, "product_name", "Unreachable");
  storage.mark_unavailable(HOME_WIDGET_DATA_AREA);
  assert_eq!(resolve(storage).snapshot().unwrap().name, "Fork");

  let nothing_readable = MemoryStorage::new();
  for area in [HOME_WIDGET_AREA, HOME_WIDGET_DATA_AREA, APP_AREA, FLUTTER_SHARED_PREFS_AREA, PACKAGE] {
    nothing_readable.mark_unavailable(area);
  }
  assert_eq!(resolve(nothing_readable), Resolution::NoData);
}

#[test]
fn document_discount_policy_is_configurable() {
  setup_tracing();
  let doc = product_document("Coffee Mug", "$12.00", "", false, "$15.00");
  let storage = Arc::new(MemoryStorage::new().with(HOME_WIDGET_AREA, "product_info", doc));

  let literal = android_resolver(Arc::clone(&storage)).resolve_or_placeholder();
  assert!(!literal.has_discount);
  assert!(!literal.shows_regular_price());

  let implied = android_resolver(storage)
    .with_document_policy(DiscountPolicy::RegularPriceImplies)
    .resolve_or_placeholder();
  assert!(implied.has_discount);
}

#[test]
fn ios_layout_reads_app_group_document() {
  setup_tracing();
  let group = "group.com.melamine.elsherif.widget";
  let storage = Arc::new(MemoryStorage::new().with(
    group,
    "product_data",
    r#"{"id":3,"name":"Salad Bowl","image":"https://cdn.example/bowl.png","price":"$7.25"}"#,
  ));
  let resolver = SnapshotResolver::new(storage.clone(), StorageLayout::ios(group));
  let snapshot = resolver.resolve_or_placeholder();
  assert_eq!(snapshot.id.as_deref(), Some("3"));
  assert_eq!(snapshot.name, "Salad Bowl");
  assert!(!snapshot.has_discount);

  storage.set(group, "product_data", r#"{"name":"Missing id"}"#);
  assert_eq!(resolver.resolve(), Resolution::NoData);
}

#[test]
fn json_dir_storage_backs_the_resolver() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(
    dir.path().join("FlutterSharedPreferences.json"),
    r#"{"flutter.product_name":"Teapot","flutter.product_price":"$30.00","flutter.product_has_discount":true}"#,
  )
  .unwrap();
  std::fs::write(dir.path().join("home_widget_data.json"), "{ broken").unwrap();

  let resolver = SnapshotResolver::new(Arc::new(JsonDirStorage::new(dir.path())), StorageLayout::android(PACKAGE));
  let snapshot = resolver.resolve_or_placeholder();
  assert_eq!(snapshot.name, "Teapot");
  assert_eq!(snapshot.price, "$30.00");
  assert!(snapshot.has_discount);
}

#[test]
fn scan_skips_key_listing_unless_tracing_keys() {
  let storage = Arc::new(CountingStorage {
    inner: MemoryStorage::new().with(HOME_WIDGET_AREA, "product_name", "Ladle"),
    key_listings: AtomicUsize::new(0),
  });
  let resolver = SnapshotResolver::new(storage.clone(), StorageLayout::android(PACKAGE));

  let quiet = tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().finish();
  let snapshot = tracing::subscriber::with_default(quiet, || resolver.resolve_or_placeholder());
  assert_eq!(snapshot.name, "Ladle");
  assert_eq!(storage.key_listings.load(Ordering::SeqCst), 0);

  let verbose = tracing_subscriber::fmt().with_max_level(Level::TRACE).with_test_writer().finish();
  tracing::subscriber::with_default(verbose, || resolver.resolve());
  assert_eq!(storage.key_listings.load(Ordering::SeqCst), StorageLayout::android(PACKAGE).sources.len());
}
