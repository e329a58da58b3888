// product_widget/src/scheduler/broadcast.rs

//! Broadcast-driven refreshes (Android App Widgets).
//!
//! `Idle → (update broadcast) → PendingDebounce → Idle`. The debounce gives the
//! host app's storage write time to land before the widget reads it. Each new
//! broadcast restarts the timer, but never past `max_wait` after the first
//! broadcast of the burst.

use crate::config::WidgetConfig;
use crate::core::InstanceId;
use crate::error::WidgetResult;
use crate::refresh::RefreshCoordinator;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{event, instrument, Level};

pub const ACTION_APPWIDGET_UPDATE: &str = "android.appwidget.action.APPWIDGET_UPDATE";
pub const ACTION_APPWIDGET_ENABLED: &str = "android.appwidget.action.APPWIDGET_ENABLED";
pub const ACTION_APPWIDGET_DISABLED: &str = "android.appwidget.action.APPWIDGET_DISABLED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Broadcast {
  /// The host app asked for an out-of-cycle refresh.
  UpdateRequested,
  /// The platform's own update for specific instances.
  PlatformUpdate { instances: Vec<InstanceId> },
  /// First instance placed.
  Enabled,
  /// Last instance removed.
  Disabled,
  Other(String),
}

impl Broadcast {
  pub fn from_action(action: &str, instances: Vec<InstanceId>, update_action: &str) -> Self {
    match action {
      a if a == update_action => Broadcast::UpdateRequested,
      ACTION_APPWIDGET_UPDATE => Broadcast::PlatformUpdate { instances },
      ACTION_APPWIDGET_ENABLED => Broadcast::Enabled,
      ACTION_APPWIDGET_DISABLED => Broadcast::Disabled,
      other => Broadcast::Other(other.to_string()),
    }
  }
}

/// The platform's list of placed widget instances.
pub trait WidgetRegistry: Send + Sync {
  fn active_instances(&self) -> WidgetResult<Vec<InstanceId>>;
}

/// Widget registry held in memory; the host keeps it in sync with placements.
#[derive(Debug, Default)]
pub struct StaticWidgetRegistry {
  instances: RwLock<Vec<InstanceId>>,
}

impl StaticWidgetRegistry {
  pub fn new(instances: Vec<InstanceId>) -> Self {
    Self {
      instances: RwLock::new(instances),
    }
  }

  pub fn add(&self, instance: InstanceId) {
    let mut instances = self.instances.write();
    if !instances.contains(&instance) {
      instances.push(instance);
    }
  }

  pub fn remove(&self, instance: InstanceId) {
    self.instances.write().retain(|id| *id != instance);
  }
}

impl WidgetRegistry for StaticWidgetRegistry {
  fn active_instances(&self) -> WidgetResult<Vec<InstanceId>> {
    Ok(self.instances.read().clone())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
  Idle,
  PendingDebounce,
}

#[derive(Debug, Default)]
struct PendingRefresh {
  generation: u64,
  handle: Option<AbortHandle>,
  burst_started: Option<Instant>,
}

const DEFAULT_MAX_WAIT_FACTOR: u32 = 4;

pub struct RefreshTrigger {
  coordinator: Arc<RefreshCoordinator>,
  registry: Arc<dyn WidgetRegistry>,
  debounce: Duration,
  max_wait: Duration,
  pending: Arc<Mutex<PendingRefresh>>,
}

impl RefreshTrigger {
  pub fn new(coordinator: Arc<RefreshCoordinator>, registry: Arc<dyn WidgetRegistry>, debounce: Duration) -> Self {
    Self {
      coordinator,
      registry,
      debounce,
      max_wait: debounce.saturating_mul(DEFAULT_MAX_WAIT_FACTOR),
      pending: Arc::new(Mutex::new(PendingRefresh::default())),
    }
  }

  pub fn from_config(config: &WidgetConfig, coordinator: Arc<RefreshCoordinator>, registry: Arc<dyn WidgetRegistry>) -> Self {
    Self::new(coordinator, registry, config.debounce).with_max_wait(config.debounce_max_wait)
  }

  /// Upper bound on how long a burst of broadcasts can postpone the refresh.
  /// Clamped to at least the debounce.
  pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
    self.max_wait = max_wait.max(self.debounce);
    self
  }

  pub fn state(&self) -> TriggerState {
    if self.pending.lock().handle.is_some() {
      TriggerState::PendingDebounce
    } else {
      TriggerState::Idle
    }
  }

  #[instrument(name = "RefreshTrigger::on_receive", skip(self))]
  pub fn on_receive(&self, broadcast: Broadcast) {
    match broadcast {
      Broadcast::UpdateRequested => {
        event!(Level::DEBUG, "Received widget update broadcast.");
        self.schedule_debounced();
      }
      Broadcast::PlatformUpdate { instances } => {
        if instances.is_empty() {
          event!(Level::DEBUG, "Platform update without instances; nothing to do.");
        } else {
          self.coordinator.refresh_all(&instances);
        }
      }
      Broadcast::Enabled => event!(Level::DEBUG, "Widget provider enabled."),
      Broadcast::Disabled => {
        event!(Level::DEBUG, "Widget provider disabled.");
        self.cancel_pending();
        self.coordinator.cancel_all();
      }
      Broadcast::Other(action) => event!(Level::DEBUG, action = %action, "Ignoring unrelated broadcast."),
    }
  }

  /// Refreshes every active instance right away. Returns how many were refreshed.
  pub fn refresh_active_now(&self) -> usize {
    refresh_active(&self.coordinator, self.registry.as_ref())
  }

  /// Replaces any pending timer with a fresh one.
  fn schedule_debounced(&self) {
    let runtime = match Handle::try_current() {
      Ok(runtime) => runtime,
      Err(_) => {
        event!(Level::WARN, "No async runtime available; refreshing without debounce.");
        self.refresh_active_now();
        return;
      }
    };

    let mut pending = self.pending.lock();
    if let Some(previous) = pending.handle.take() {
      previous.abort();
    }
    pending.generation += 1;
    let generation = pending.generation;
    let now = Instant::now();
    let burst_started = *pending.burst_started.get_or_insert(now);
    let fire_at = (now + self.debounce).min(burst_started + self.max_wait);

    let coordinator = Arc::clone(&self.coordinator);
    let registry = Arc::clone(&self.registry);
    let slot = Arc::clone(&self.pending);
    let handle = runtime.spawn(async move {
      tokio::time::sleep_until(fire_at).await;
      {
        let mut pending = slot.lock();
        if pending.generation != generation {
          return;
        }
        pending.handle = None;
        pending.burst_started = None;
      }
      refresh_active(&coordinator, registry.as_ref());
    });
    pending.handle = Some(handle.abort_handle());
    event!(Level::DEBUG, delay = ?fire_at.saturating_duration_since(now), "Debounced refresh scheduled.");
  }

  fn cancel_pending(&self) {
    let mut pending = self.pending.lock();
    pending.generation += 1;
    pending.burst_started = None;
    if let Some(handle) = pending.handle.take() {
      handle.abort();
    }
  }
}

fn refresh_active(coordinator: &RefreshCoordinator, registry: &dyn WidgetRegistry) -> usize {
  match registry.active_instances() {
    Ok(instances) if instances.is_empty() => {
      event!(Level::DEBUG, "No widgets found to update.");
      0
    }
    Ok(instances) => {
      event!(Level::DEBUG, count = instances.len(), "Updating widgets.");
      coordinator.refresh_all(&instances);
      instances.len()
    }
    Err(e) => {
      event!(Level::ERROR, error = %e, "Error listing widget instances.");
      0
    }
  }
}
