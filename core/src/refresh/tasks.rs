// product_widget/src/refresh/tasks.rs

//! Registry of in-flight image fetches, keyed by widget instance.
//!
//! Every refresh of an instance takes a new generation. A fetch may only
//! apply its result while its generation is still the instance's current one.
//! The registry lock never covers a surface update; ordering between the
//! generation check and the apply is kept by the coordinator's surface gate.

use crate::core::InstanceId;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::task::AbortHandle;
use tracing::{event, Level};

#[derive(Debug)]
struct FetchSlot {
  generation: u64,
  handle: Option<AbortHandle>,
}

#[derive(Debug, Default)]
struct RegistryState {
  next_generation: u64,
  slots: HashMap<InstanceId, FetchSlot>,
}

#[derive(Debug, Default)]
pub struct FetchTaskRegistry {
  state: Mutex<RegistryState>,
}

impl FetchTaskRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Starts a new generation for `instance`, aborting any fetch still running
  /// for an older one.
  pub fn begin(&self, instance: InstanceId) -> u64 {
    let mut state = self.state.lock();
    state.next_generation += 1;
    let generation = state.next_generation;
    let previous = state.slots.insert(
      instance,
      FetchSlot {
        generation,
        handle: None,
      },
    );
    if let Some(FetchSlot {
      handle: Some(handle),
      generation: old,
    }) = previous
    {
      event!(Level::DEBUG, %instance, superseded_generation = old, "Cancelling in-flight image fetch.");
      handle.abort();
    }
    generation
  }

  /// Spawns the fetch for `generation` if it is still current. The spawn
  /// happens under the registry lock, so the task cannot complete before its
  /// handle is recorded.
  pub fn attach<F>(&self, instance: InstanceId, generation: u64, spawn: F) -> bool
  where
    F: FnOnce() -> AbortHandle,
  {
    let mut state = self.state.lock();
    match state.slots.get_mut(&instance) {
      Some(slot) if slot.generation == generation => {
        slot.handle = Some(spawn());
        true
      }
      _ => {
        event!(Level::DEBUG, %instance, generation, "Refresh superseded before fetch started.");
        false
      }
    }
  }

  /// Retires the slot if `generation` is still current. Returns whether it was,
  /// i.e. whether the caller may apply its result. The caller applies after the
  /// registry lock is released.
  pub fn retire_if_current(&self, instance: InstanceId, generation: u64) -> bool {
    let mut state = self.state.lock();
    match state.slots.get(&instance) {
      Some(slot) if slot.generation == generation => {
        state.slots.remove(&instance);
        true
      }
      _ => false,
    }
  }

  /// Retires `generation` without applying anything (no fetch was needed).
  pub fn release(&self, instance: InstanceId, generation: u64) {
    let mut state = self.state.lock();
    if state.slots.get(&instance).is_some_and(|slot| slot.generation == generation) {
      state.slots.remove(&instance);
    }
  }

  pub fn cancel(&self, instance: InstanceId) {
    if let Some(slot) = self.state.lock().slots.remove(&instance) {
      if let Some(handle) = slot.handle {
        handle.abort();
      }
    }
  }

  pub fn cancel_all(&self) {
    let drained: Vec<FetchSlot> = self.state.lock().slots.drain().map(|(_, slot)| slot).collect();
    let mut aborted = 0usize;
    for handle in drained.into_iter().filter_map(|slot| slot.handle) {
      handle.abort();
      aborted += 1;
    }
    event!(Level::DEBUG, aborted, "Cancelled all in-flight image fetches.");
  }

  /// Number of fetches currently running.
  pub fn in_flight(&self) -> usize {
    self.state.lock().slots.values().filter(|slot| slot.handle.is_some()).count()
  }

  pub fn current_generation(&self, instance: InstanceId) -> Option<u64> {
    self.state.lock().slots.get(&instance).map(|slot| slot.generation)
  }
}
