// product_widget/src/refresh/cycle.rs

//! One refresh cycle: resolve → render text with the placeholder image →
//! fetch the remote image → re-render with the image (or the placeholder again).

use super::tasks::FetchTaskRegistry;
use crate::config::WidgetConfig;
use crate::core::InstanceId;
use crate::error::WidgetResult;
use crate::image::{HttpImageFetcher, ImageFetcher};
use crate::render::{ImageSlot, LaunchResolver, RenderCommand, StaticLaunchResolver, WidgetRenderer, WidgetSurface, WidgetView};
use crate::resolver::{SnapshotResolver, StorageLayout};
use crate::storage::SharedStorage;
use parking_lot::ReentrantMutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{event, instrument, Level};

pub struct RefreshCoordinator {
  resolver: SnapshotResolver,
  renderer: WidgetRenderer,
  fetcher: Arc<dyn ImageFetcher>,
  surface: Arc<dyn WidgetSurface>,
  tasks: Arc<FetchTaskRegistry>,
  // Serializes "check generation, then update surface" against newer refreshes.
  // Reentrant so a surface may start a refresh from inside `update`.
  surface_gate: Arc<ReentrantMutex<()>>,
}

impl RefreshCoordinator {
  pub fn new(
    resolver: SnapshotResolver,
    renderer: WidgetRenderer,
    fetcher: Arc<dyn ImageFetcher>,
    surface: Arc<dyn WidgetSurface>,
  ) -> Self {
    Self {
      resolver,
      renderer,
      fetcher,
      surface,
      tasks: Arc::new(FetchTaskRegistry::new()),
      surface_gate: Arc::new(ReentrantMutex::new(())),
    }
  }

  /// Coordinator wired for the Android home-widget integration: Android
  /// storage layout, package launch intent, HTTP image fetches.
  pub fn android(config: &WidgetConfig, storage: Arc<dyn SharedStorage>, surface: Arc<dyn WidgetSurface>) -> WidgetResult<Self> {
    let resolver = SnapshotResolver::new(storage, StorageLayout::android(&config.package_name))
      .with_document_policy(config.document_discount_policy);
    let launch: Arc<dyn LaunchResolver> = Arc::new(StaticLaunchResolver::package(config.package_name.clone()));
    let fetcher = Arc::new(HttpImageFetcher::new(config.image_timeout)?);
    Ok(Self::new(resolver, WidgetRenderer::new(launch), fetcher, surface))
  }

  pub fn resolver(&self) -> &SnapshotResolver {
    &self.resolver
  }

  pub fn tasks(&self) -> &FetchTaskRegistry {
    &self.tasks
  }

  /// Resolves and renders without touching the surface.
  pub fn plan(&self, instance: InstanceId) -> RenderCommand {
    let snapshot = self.resolver.resolve_or_placeholder();
    self.renderer.render(instance, &snapshot)
  }

  /// Runs a full refresh for `instance`: shows text and the placeholder image
  /// immediately, then starts the image fetch. Any fetch still running from an
  /// earlier refresh of this instance is cancelled first.
  #[instrument(name = "RefreshCoordinator::refresh", skip_all, fields(%instance))]
  pub fn refresh(&self, instance: InstanceId) -> RenderCommand {
    let command = self.plan(instance);
    let generation = {
      let _gate = self.surface_gate.lock();
      let generation = self.tasks.begin(instance);
      apply_view(self.surface.as_ref(), instance, &command.view);
      generation
    };

    match &command.image_request {
      Some(url) => self.spawn_fetch(instance, generation, url.clone(), command.view.clone()),
      None => self.tasks.release(instance, generation),
    }
    command
  }

  pub fn refresh_all(&self, instances: &[InstanceId]) -> Vec<RenderCommand> {
    event!(Level::DEBUG, count = instances.len(), "Refreshing widget instances.");
    instances.iter().map(|instance| self.refresh(*instance)).collect()
  }

  pub fn cancel_all(&self) {
    self.tasks.cancel_all();
  }

  fn spawn_fetch(&self, instance: InstanceId, generation: u64, url: String, base_view: WidgetView) {
    let runtime = match Handle::try_current() {
      Ok(runtime) => runtime,
      Err(_) => {
        event!(Level::WARN, %instance, "No async runtime available; keeping placeholder image.");
        self.tasks.release(instance, generation);
        return;
      }
    };

    let fetcher = Arc::clone(&self.fetcher);
    let surface = Arc::clone(&self.surface);
    let tasks = Arc::clone(&self.tasks);
    let gate = Arc::clone(&self.surface_gate);
    self.tasks.attach(instance, generation, move || {
      runtime
        .spawn(async move {
          let image = match fetcher.fetch(&url).await {
            Ok(bitmap) => ImageSlot::Remote(bitmap),
            Err(e) => {
              event!(Level::WARN, %instance, url = %url, error = %e, "Image fetch failed; using placeholder.");
              ImageSlot::Placeholder
            }
          };
          let view = base_view.with_image(image);
          apply_fetched(&gate, &tasks, surface.as_ref(), instance, generation, &view);
        })
        .abort_handle()
    });
  }
}

/// Applies a fetched image's view unless a newer refresh took over. The guard
/// is not `Send`, so this stays a plain function outside the async block.
fn apply_fetched(
  gate: &ReentrantMutex<()>,
  tasks: &FetchTaskRegistry,
  surface: &dyn WidgetSurface,
  instance: InstanceId,
  generation: u64,
  view: &WidgetView,
) {
  let _gate = gate.lock();
  if tasks.retire_if_current(instance, generation) {
    apply_view(surface, instance, view);
  } else {
    event!(Level::DEBUG, %instance, generation, "Discarding image for superseded refresh.");
  }
}

fn apply_view(surface: &dyn WidgetSurface, instance: InstanceId, view: &WidgetView) {
  if let Err(e) = surface.update(instance, view) {
    event!(Level::ERROR, %instance, error = %e, "Error updating widget.");
  }
}
