// product_widget/src/render/surface.rs

use super::view::WidgetView;
use crate::core::InstanceId;
use crate::error::WidgetResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// The platform widget-update API. Each call replaces the instance's whole view.
///
/// Implementations are responsible for delivering the update on whatever
/// thread the platform requires.
pub trait WidgetSurface: Send + Sync {
  fn update(&self, instance: InstanceId, view: &WidgetView) -> WidgetResult<()>;
}

/// Surface that keeps views in memory, with the full update history per instance.
#[derive(Debug, Default)]
pub struct MemorySurface {
  history: RwLock<HashMap<InstanceId, Vec<WidgetView>>>,
}

impl MemorySurface {
  pub fn new() -> Self {
    Self::default()
  }

  /// Currently displayed view for `instance`.
  pub fn current(&self, instance: InstanceId) -> Option<WidgetView> {
    self.history.read().get(&instance).and_then(|views| views.last().cloned())
  }

  pub fn history(&self, instance: InstanceId) -> Vec<WidgetView> {
    self.history.read().get(&instance).cloned().unwrap_or_default()
  }

  pub fn update_count(&self, instance: InstanceId) -> usize {
    self.history.read().get(&instance).map_or(0, Vec::len)
  }

  pub fn instances(&self) -> Vec<InstanceId> {
    let mut ids: Vec<InstanceId> = self.history.read().keys().copied().collect();
    ids.sort();
    ids
  }
}

impl WidgetSurface for MemorySurface {
  fn update(&self, instance: InstanceId, view: &WidgetView) -> WidgetResult<()> {
    self.history.write().entry(instance).or_default().push(view.clone());
    Ok(())
  }
}
