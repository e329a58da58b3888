pub mod renderer;
pub mod surface;
pub mod view;

pub use renderer::{LaunchResolver, StaticLaunchResolver, WidgetRenderer};
pub use surface::{MemorySurface, WidgetSurface};
pub use view::{ImageSlot, LaunchTarget, RegularPrice, RenderCommand, TapAction, WidgetView};
