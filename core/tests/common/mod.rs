// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use product_widget::{
  Bitmap, ImageFetcher, InstanceId, LaunchResolver, MemoryStorage, MemorySurface, RefreshCoordinator, SnapshotResolver,
  StaticLaunchResolver, StorageLayout, WidgetError, WidgetRenderer, WidgetResult,
};
use std::collections::HashMap;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tracing::Level;

pub const PACKAGE: &str = "com.melamine_elsherif";

/// Smallest byte sequence the bitmap decoder accepts as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

// --- Helper for Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn png_bitmap() -> Bitmap {
  Bitmap::decode(PNG_BYTES).unwrap()
}

/// Home-widget document JSON as the host app writes it.
pub fn product_document(name: &str, price: &str, image: &str, has_discount: bool, regular_price: &str) -> String {
  serde_json::json!({
    "product_name": name,
    "product_price": price,
    "product_image": image,
    "product_has_discount": has_discount,
    "product_regular_price": regular_price,
  })
  .to_string()
}

pub fn android_resolver(storage: Arc<MemoryStorage>) -> SnapshotResolver {
  SnapshotResolver::new(storage, StorageLayout::android(PACKAGE))
}

pub fn renderer_with_launch() -> WidgetRenderer {
  let launch: Arc<dyn LaunchResolver> = Arc::new(StaticLaunchResolver::package(PACKAGE));
  WidgetRenderer::new(launch)
}

// --- Mock image fetcher ---

#[derive(Clone)]
pub enum MockOutcome {
  Image(Bitmap),
  Fail(String),
}

/// Fetcher returning canned outcomes per URL, optionally after a delay.
#[derive(Default)]
pub struct MockImageFetcher {
  outcomes: Mutex<HashMap<String, (MockOutcome, Duration)>>,
  pub calls: AtomicUsize,
}

impl MockImageFetcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn respond(self, url: &str, outcome: MockOutcome) -> Self {
    self.respond_after(url, outcome, Duration::ZERO)
  }

  pub fn respond_after(self, url: &str, outcome: MockOutcome, delay: Duration) -> Self {
    self.outcomes.lock().insert(url.to_string(), (outcome, delay));
    self
  }

  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
  async fn fetch(&self, url: &str) -> WidgetResult<Bitmap> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let entry = self.outcomes.lock().get(url).cloned();
    let (outcome, delay) = entry.unwrap_or((MockOutcome::Fail("no canned response".to_string()), Duration::ZERO));
    if !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }
    match outcome {
      MockOutcome::Image(bitmap) => Ok(bitmap),
      MockOutcome::Fail(reason) => Err(WidgetError::ImageDecode {
        url: url.to_string(),
        reason,
      }),
    }
  }
}

pub struct Harness {
  pub storage: Arc<MemoryStorage>,
  pub surface: Arc<MemorySurface>,
  pub fetcher: Arc<MockImageFetcher>,
  pub coordinator: Arc<RefreshCoordinator>,
}

pub fn harness(storage: MemoryStorage, fetcher: MockImageFetcher) -> Harness {
  let storage = Arc::new(storage);
  let surface = Arc::new(MemorySurface::new());
  let fetcher = Arc::new(fetcher);
  let coordinator = Arc::new(RefreshCoordinator::new(
    android_resolver(Arc::clone(&storage)),
    renderer_with_launch(),
    fetcher.clone(),
    surface.clone(),
  ));
  Harness {
    storage,
    surface,
    fetcher,
    coordinator,
  }
}

/// Lets spawned tasks run until `check` holds or the deadline passes.
pub async fn wait_until<F: Fn() -> bool>(check: F) -> bool {
  for _ in 0..200 {
    if check() {
      return true;
    }
    tokio::time::sleep(Duration::from_millis(5)).await;
  }
  check()
}

pub const W1: InstanceId = InstanceId(1);
pub const W2: InstanceId = InstanceId(2);
