// product_widget/src/render/view.rs

//! The visible state of one widget instance. Always built whole; never patched.

use crate::core::InstanceId;
use crate::image::Bitmap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegularPrice {
  Hidden,
  Visible(String),
}

impl RegularPrice {
  pub fn is_visible(&self) -> bool {
    matches!(self, RegularPrice::Visible(_))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
  /// The bundled placeholder asset.
  Placeholder,
  Remote(Bitmap),
}

/// Where a tap on the widget leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
  /// Android launch intent for a package.
  Package(String),
  /// iOS URL opened by the widget.
  Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapAction {
  Launch(LaunchTarget),
  /// The host app could not be resolved; taps do nothing.
  Inert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
  pub name: String,
  pub price: String,
  pub regular_price: RegularPrice,
  pub image: ImageSlot,
  pub tap: TapAction,
}

impl WidgetView {
  /// Same view with the image slot replaced.
  pub fn with_image(&self, image: ImageSlot) -> WidgetView {
    WidgetView {
      image,
      ..self.clone()
    }
  }
}

/// Output of one render: the view to show now, plus the image to fetch for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCommand {
  pub instance: InstanceId,
  pub view: WidgetView,
  pub image_request: Option<String>,
}
