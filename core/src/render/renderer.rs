// product_widget/src/render/renderer.rs

use super::view::{ImageSlot, LaunchTarget, RegularPrice, RenderCommand, TapAction, WidgetView};
use crate::core::{InstanceId, ProductSnapshot};
use crate::error::WidgetResult;
use std::sync::Arc;
use tracing::{event, Level};

/// Resolves the host app's launch entry point for the widget's tap action.
pub trait LaunchResolver: Send + Sync {
  fn launch_target(&self) -> WidgetResult<Option<LaunchTarget>>;
}

/// A launch target known up front (or known to be missing).
#[derive(Debug, Clone, Default)]
pub struct StaticLaunchResolver(pub Option<LaunchTarget>);

impl StaticLaunchResolver {
  pub fn package(name: impl Into<String>) -> Self {
    Self(Some(LaunchTarget::Package(name.into())))
  }

  pub fn url(url: impl Into<String>) -> Self {
    Self(Some(LaunchTarget::Url(url.into())))
  }

  pub fn none() -> Self {
    Self(None)
  }
}

impl LaunchResolver for StaticLaunchResolver {
  fn launch_target(&self) -> WidgetResult<Option<LaunchTarget>> {
    Ok(self.0.clone())
  }
}

/// Maps a snapshot onto the fixed widget layout.
///
/// Rendering is a pure function of the snapshot and the launch target, so the
/// same snapshot always yields the same view.
pub struct WidgetRenderer {
  launch: Arc<dyn LaunchResolver>,
}

impl WidgetRenderer {
  pub fn new(launch: Arc<dyn LaunchResolver>) -> Self {
    Self { launch }
  }

  pub fn render(&self, instance: InstanceId, snapshot: &ProductSnapshot) -> RenderCommand {
    let regular_price = if snapshot.shows_regular_price() {
      RegularPrice::Visible(snapshot.regular_price.clone())
    } else {
      RegularPrice::Hidden
    };
    event!(
      Level::TRACE,
      %instance,
      regular_price_visible = regular_price.is_visible(),
      has_image = snapshot.has_image(),
      "Rendering widget view."
    );

    let view = WidgetView {
      name: snapshot.name.clone(),
      price: snapshot.price.clone(),
      regular_price,
      // The remote image, if any, arrives later.
      image: ImageSlot::Placeholder,
      tap: self.tap_action(),
    };

    RenderCommand {
      instance,
      view,
      image_request: snapshot.has_image().then(|| snapshot.image_url.clone()),
    }
  }

  fn tap_action(&self) -> TapAction {
    match self.launch.launch_target() {
      Ok(Some(target)) => TapAction::Launch(target),
      Ok(None) => {
        event!(Level::DEBUG, "No launch target for host app; tap is inert.");
        TapAction::Inert
      }
      Err(e) => {
        event!(Level::WARN, error = %e, "Failed to resolve launch target; tap is inert.");
        TapAction::Inert
      }
    }
  }
}
