// product_widget/src/scheduler/mod.rs

//! Platform-side drivers of the refresh cycle.

pub mod broadcast;
pub mod timeline;

pub use broadcast::{Broadcast, RefreshTrigger, StaticWidgetRegistry, TriggerState, WidgetRegistry};
pub use timeline::{ReloadPolicy, Timeline, TimelineEntry, TimelineScheduler};
