// product_widget/src/scheduler/timeline.rs

//! Timeline-driven refreshes (iOS WidgetKit). The platform decides when to
//! ask; each answer is one entry for "now" plus a reload after a fixed interval.

use crate::config::WidgetConfig;
use crate::core::ProductSnapshot;
use crate::error::{WidgetError, WidgetResult};
use crate::resolver::{SnapshotResolver, StorageLayout};
use crate::storage::SharedStorage;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{event, Level};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
  pub date: DateTime<Utc>,
  pub snapshot: ProductSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReloadPolicy {
  /// Ask for a new timeline once this moment has passed.
  After(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
  pub entries: Vec<TimelineEntry>,
  pub policy: ReloadPolicy,
}

pub struct TimelineScheduler {
  resolver: SnapshotResolver,
  refresh_interval: TimeDelta,
}

impl TimelineScheduler {
  pub fn new(resolver: SnapshotResolver, refresh_interval: Duration) -> WidgetResult<Self> {
    let refresh_interval = TimeDelta::from_std(refresh_interval)
      .ok()
      .filter(|interval| *interval > TimeDelta::zero())
      .filter(|interval| Utc::now().checked_add_signed(*interval).is_some())
      .ok_or_else(|| WidgetError::Config {
        key: "refresh_interval".to_string(),
        message: format!("{:?} is not a usable timeline interval", refresh_interval),
      })?;
    Ok(Self {
      resolver,
      refresh_interval,
    })
  }

  /// Scheduler wired for the iOS app-group integration.
  pub fn ios(config: &WidgetConfig, storage: Arc<dyn SharedStorage>) -> WidgetResult<Self> {
    let resolver = SnapshotResolver::new(storage, StorageLayout::ios(&config.app_group))
      .with_document_policy(config.document_discount_policy);
    Self::new(resolver, config.refresh_interval)
  }

  /// Entry shown before any data is loaded.
  pub fn placeholder(&self, now: DateTime<Utc>) -> TimelineEntry {
    TimelineEntry {
      date: now,
      snapshot: ProductSnapshot::placeholder(),
    }
  }

  /// Entry for "now": the resolved product, or the placeholder.
  pub fn snapshot(&self, now: DateTime<Utc>) -> TimelineEntry {
    TimelineEntry {
      date: now,
      snapshot: self.resolver.resolve_or_placeholder(),
    }
  }

  pub fn timeline(&self, now: DateTime<Utc>) -> Timeline {
    let entry = self.snapshot(now);
    // Only reachable with a `now` far past the present; keep a valid policy.
    let reload_at = now.checked_add_signed(self.refresh_interval).unwrap_or(DateTime::<Utc>::MAX_UTC);
    event!(Level::DEBUG, name = %entry.snapshot.name, reload_at = %reload_at, "Timeline built.");
    Timeline {
      entries: vec![entry],
      policy: ReloadPolicy::After(reload_at),
    }
  }
}
