// src/lib.rs

//! product_widget: the data-resolution and refresh core of a home-screen
//! product widget.
//!
//! The host app writes a product snapshot into platform shared storage; this
//! crate:
//!  - Resolves the authoritative snapshot from a structured document or, failing
//!    that, from scattered per-field keys across several storage areas.
//!  - Renders it onto a fixed widget layout (text immediately, placeholder image).
//!  - Fetches the remote product image asynchronously and re-renders, cancelling
//!    fetches that a newer refresh has superseded.
//!  - Drives refreshes from broadcasts (debounced) or from a timeline policy.
//!
//! Platform plumbing stays behind small traits: [`SharedStorage`],
//! [`WidgetSurface`], [`LaunchResolver`], [`ImageFetcher`], [`WidgetRegistry`].

pub mod config;
pub mod core;
pub mod error;
pub mod image;
pub mod refresh;
pub mod render;
pub mod resolver;
pub mod scheduler;
pub mod storage;

// --- Re-exports for the Public API ---

pub use crate::config::{DiscountPolicy, WidgetConfig};
pub use crate::core::{InstanceId, ProductSnapshot};
pub use crate::error::{WidgetError, WidgetResult};

pub use crate::storage::{JsonDirStorage, MemoryStorage, SharedStorage, StoredValue};

pub use crate::resolver::{Resolution, SnapshotOrigin, SnapshotResolver, StorageLayout};

pub use crate::render::{
  ImageSlot, LaunchResolver, LaunchTarget, MemorySurface, RegularPrice, RenderCommand, StaticLaunchResolver, TapAction,
  WidgetRenderer, WidgetSurface, WidgetView,
};

pub use crate::image::{Bitmap, HttpImageFetcher, ImageFetcher, ImageFormat};

pub use crate::refresh::{FetchTaskRegistry, RefreshCoordinator};

pub use crate::scheduler::{
  Broadcast, RefreshTrigger, ReloadPolicy, StaticWidgetRegistry, Timeline, TimelineEntry, TimelineScheduler,
  TriggerState, WidgetRegistry,
};
