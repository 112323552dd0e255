//! Surface lifecycle binding.
//!
//! A [`SurfaceBinder`] owns at most one backend surface for one
//! [`PlaceholderRegion`] and keeps it matching the region's latest geometry.
//!
//! Lifecycle: `Idle → Settling → Creating → Live → Destroying → Idle`.
//!
//! - Binding waits a fixed settle interval before creating, so the rapid
//!   layout passes of a fresh mount never reach the backend.
//! - Geometry that changes while create() is in flight is applied once,
//!   latest value only, after the surface arrives.
//! - create() cannot be cancelled. Unbinding while it is in flight marks the
//!   binding `pending_destroy`; the surface is destroyed as soon as it
//!   arrives and never receives a geometry update.
//! - Every surface the binder creates receives exactly one destroy().
//!
//! All backend failures are logged inside the binding task. The public
//! methods never fail and never block.

mod state;
mod task;
mod timer;


use std::sync::Arc;
use std::time::Duration;

use lens_common::{Event, RegionId};
use lens_surface::SurfaceBackend;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::region::PlaceholderRegion;

pub use state::{BinderSnapshot, BindingPhase, BindingState, PreviewStatus};

use task::{BindingTask, Command};

/// Per-binding settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingOptions {
    /// Delay between bind and the first create().
    pub settle_interval: Duration,
    /// Surface clear color, `0xAARRGGBB`.
    pub background_color: u32,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            settle_interval: Duration::from_millis(150),
            background_color: 0xff1f_2937,
        }
    }
}

/// Handle to the binding task of one region.
///
/// Dropping the handle unbinds; the task keeps running until any surface
/// still in flight has been destroyed.
///
/// Geometry updates are spawned per event, so they reach the backend in
/// arrival order only on a current-thread runtime.
pub struct SurfaceBinder {
    id: RegionId,
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<BinderSnapshot>,
    task: JoinHandle<()>,
}

impl SurfaceBinder {
    /// Spawn the binding task for `region`. The binder starts unbound.
    ///
    /// Only a weak reference to the region is kept: dropping the last
    /// `Arc` is treated as an unmount.
    pub fn new(
        id: RegionId,
        region: &Arc<PlaceholderRegion>,
        backend: Arc<dyn SurfaceBackend>,
        options: BindingOptions,
        events: Option<broadcast::Sender<Event>>,
    ) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (task, snapshots) =
            BindingTask::new(id, region, backend, options, events, command_rx);
        let task = tokio::spawn(task.run());
        Self {
            id,
            commands,
            snapshots,
            task,
        }
    }

    pub fn region_id(&self) -> RegionId {
        self.id
    }

    /// Start observing the region and create a surface once it settles.
    pub fn bind(&self) {
        self.send(Command::Bind);
    }

    /// Stop observing and release the surface, now or when it arrives.
    pub fn unbind(&self) {
        self.send(Command::Unbind);
    }

    /// Unbind, then bind again. Also the way to retry after the backend
    /// was unavailable.
    pub fn rebind(&self) {
        self.send(Command::Rebind);
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> BinderSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshots.
    pub fn status(&self) -> watch::Receiver<BinderSnapshot> {
        self.snapshots.clone()
    }

    /// Whether the binding task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Unbind and wait until every surface this binder created has been
    /// destroyed.
    pub async fn shutdown(self) {
        let Self {
            id, commands, task, ..
        } = self;
        drop(commands);
        if let Err(e) = task.await {
            warn!(region = %id, error = %e, "binding task ended abnormally");
        }
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!(region = %self.id, ?command, "binding task already finished");
        }
    }
}
