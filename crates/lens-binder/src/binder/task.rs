//! The binding task: sole owner of one region's surface state.
//!
//! Commands from the UI, geometry from the observer and completions of
//! backend calls all arrive here and are handled one at a time, so every
//! race between them becomes an ordering of messages on this loop.

use std::sync::{Arc, Weak};

use lens_common::{Event, Position, Rect, RegionId, Size, SurfaceError, SurfaceHandle};
use lens_surface::SurfaceBackend;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::observer::{GeometryEvent, GeometryObserver, GeometryStream};
use crate::region::PlaceholderRegion;

use super::state::{BinderSnapshot, Creation, Phase, PreviewStatus};
use super::timer::SettleTimer;
use super::BindingOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Bind,
    Unbind,
    Rebind,
}

#[derive(Debug)]
pub(crate) enum Completion {
    Settled {
        generation: u64,
    },
    Created {
        result: Result<SurfaceHandle, SurfaceError>,
    },
    Destroyed {
        handle: SurfaceHandle,
        result: Result<(), SurfaceError>,
    },
}

pub(crate) struct BindingTask {
    id: RegionId,
    owner: String,
    region: Weak<PlaceholderRegion>,
    backend: Arc<dyn SurfaceBackend>,
    options: BindingOptions,
    events: Option<broadcast::Sender<Event>>,
    snapshots: watch::Sender<BinderSnapshot>,
    commands: mpsc::UnboundedReceiver<Command>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    /// Present exactly while the region is bound.
    geometry: Option<GeometryStream>,
    phase: Phase,
    rect: Rect,
    status: PreviewStatus,
    /// Set after a geometry rejection: the next usable geometry change
    /// starts a fresh settle.
    retry_on_geometry: bool,
    settle_generation: u64,
    destroys_in_flight: usize,
}

impl BindingTask {
    pub fn new(
        id: RegionId,
        region: &Arc<PlaceholderRegion>,
        backend: Arc<dyn SurfaceBackend>,
        options: BindingOptions,
        events: Option<broadcast::Sender<Event>>,
        commands: mpsc::UnboundedReceiver<Command>,
    ) -> (Self, watch::Receiver<BinderSnapshot>) {
        let rect = region.rect();
        let (snapshots, snapshot_rx) = watch::channel(BinderSnapshot {
            phase: Phase::Idle.kind(),
            state: Phase::Idle.state(),
            status: PreviewStatus::Hidden,
            rect,
        });
        let (completions_tx, completions) = mpsc::unbounded_channel();

        let task = Self {
            id,
            owner: region.owner().to_string(),
            region: Arc::downgrade(region),
            backend,
            options,
            events,
            snapshots,
            commands,
            completions_tx,
            completions,
            geometry: None,
            phase: Phase::Idle,
            rect,
            status: PreviewStatus::Hidden,
            retry_on_geometry: false,
            settle_generation: 0,
            destroys_in_flight: 0,
        };
        (task, snapshot_rx)
    }

    /// Runs until the binder handle is gone and every surface this binding
    /// created has had its destroy() resolve.
    pub async fn run(mut self) {
        let mut accepting = true;
        loop {
            if !accepting && self.is_drained() {
                break;
            }

            tokio::select! {
                command = self.commands.recv(), if accepting => match command {
                    Some(command) => self.on_command(command),
                    None => {
                        accepting = false;
                        self.unbind();
                    }
                },
                Some(completion) = self.completions.recv() => self.on_completion(completion),
                event = next_geometry(&mut self.geometry) => match event {
                    Some(event) => self.on_geometry(event),
                    None => {
                        debug!(region = %self.id, "region unmounted");
                        self.unbind();
                    }
                },
            }

            self.publish();
        }
        debug!(region = %self.id, "binding task finished");
    }

    fn is_drained(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.destroys_in_flight == 0
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::Bind => self.bind(),
            Command::Unbind => self.unbind(),
            Command::Rebind => {
                self.unbind();
                self.bind();
            }
        }
    }

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Settled { generation } => self.on_settled(generation),
            Completion::Created { result } => self.on_created(result),
            Completion::Destroyed { handle, result } => self.on_destroyed(handle, result),
        }
    }

    fn bind(&mut self) {
        if self.geometry.is_some() {
            debug!(region = %self.id, "already bound");
            return;
        }
        let Some(region) = self.region.upgrade() else {
            warn!(region = %self.id, "cannot bind: region is gone");
            return;
        };
        self.geometry = Some(GeometryObserver::observe(&region));
        self.rect = region.rect();
        drop(region);

        match self.phase {
            Phase::Idle | Phase::Destroying(_) => self.start_settle(),
            Phase::Creating(_) => {
                self.status = PreviewStatus::Pending;
                debug!(region = %self.id, "previous create still in flight; settling once it resolves");
            }
            Phase::Settling(_) | Phase::Live(_) => {}
        }
    }

    fn unbind(&mut self) {
        self.geometry = None;
        self.retry_on_geometry = false;
        self.status = PreviewStatus::Hidden;

        self.phase = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => Phase::Idle,
            Phase::Settling(_timer) => {
                debug!(region = %self.id, "unbound before settle; nothing was created");
                Phase::Idle
            }
            Phase::Creating(mut creation) => {
                debug!(region = %self.id, "unbound while creating; destroying on arrival");
                creation.pending_destroy = true;
                Phase::Creating(creation)
            }
            Phase::Live(handle) => {
                self.destroy(handle);
                Phase::Destroying(handle)
            }
            Phase::Destroying(handle) => Phase::Destroying(handle),
        };
    }

    fn start_settle(&mut self) {
        self.settle_generation += 1;
        let timer = SettleTimer::schedule(
            self.options.settle_interval,
            self.settle_generation,
            self.completions_tx.clone(),
        );
        self.phase = Phase::Settling(timer);
        self.status = PreviewStatus::Pending;
        self.retry_on_geometry = false;
    }

    fn on_settled(&mut self, generation: u64) {
        let current =
            matches!(&self.phase, Phase::Settling(timer) if timer.generation() == generation);
        if !current {
            debug!(region = %self.id, generation, "ignoring stale settle timer");
            return;
        }
        self.phase = Phase::Idle;
        self.create();
    }

    fn create(&mut self) {
        let rect = self.rect;
        if !rect.is_valid() {
            debug!(region = %self.id, ?rect, "geometry not usable yet; waiting for the next change");
            self.phase = Phase::Idle;
            self.status = PreviewStatus::Hidden;
            self.retry_on_geometry = true;
            return;
        }

        debug!(region = %self.id, ?rect, "creating surface");
        self.phase = Phase::Creating(Creation {
            requested: rect,
            pending_destroy: false,
        });

        let backend = Arc::clone(&self.backend);
        let owner = self.owner.clone();
        let background = self.options.background_color;
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = backend.create(&owner, rect, background).await;
            let _ = completions.send(Completion::Created { result });
        });
    }

    fn on_created(&mut self, result: Result<SurfaceHandle, SurfaceError>) {
        let creation = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Creating(creation) => creation,
            other => {
                self.phase = other;
                error!(region = %self.id, "create resolved with no create in flight");
                if let Ok(handle) = result {
                    self.destroy(handle);
                }
                return;
            }
        };

        match result {
            Ok(handle) if creation.pending_destroy => {
                info!(region = %self.id, %handle, "surface arrived after unbind; destroying");
                self.emit(Event::SurfaceCreated {
                    region: self.id,
                    handle,
                });
                self.destroy(handle);
                if self.geometry.is_some() {
                    self.start_settle();
                }
            }
            Ok(handle) => {
                info!(region = %self.id, %handle, "surface live");
                self.phase = Phase::Live(handle);
                self.status = PreviewStatus::Showing;
                self.emit(Event::SurfaceCreated {
                    region: self.id,
                    handle,
                });

                // Geometry that moved on while create() was in flight.
                if self.rect.size() != creation.requested.size() {
                    self.apply(handle, GeometryEvent::resize(self.rect.size()));
                }
                if self.rect.position() != creation.requested.position() {
                    self.apply(handle, GeometryEvent::reposition(self.rect.position()));
                }
            }
            Err(e) if creation.pending_destroy => {
                debug!(region = %self.id, error = %e, "create failed after unbind");
                if self.geometry.is_some() {
                    self.start_settle();
                }
            }
            Err(e) => self.on_create_failed(e),
        }
    }

    fn on_create_failed(&mut self, e: SurfaceError) {
        self.phase = Phase::Idle;
        if e.is_transient() {
            warn!(region = %self.id, error = %e, "surface geometry rejected; waiting for the next change");
            self.status = PreviewStatus::Hidden;
            self.retry_on_geometry = true;
        } else {
            error!(region = %self.id, error = %e, "failed to create surface");
            self.status = PreviewStatus::Unavailable(e.to_string());
            self.retry_on_geometry = false;
            self.emit(Event::PreviewUnavailable {
                region: self.id,
                reason: e.to_string(),
            });
        }
    }

    fn on_geometry(&mut self, event: GeometryEvent) {
        self.rect = match event {
            GeometryEvent::Resize { width, height } => self.rect.with_size(Size::new(width, height)),
            GeometryEvent::Reposition { x, y } => self.rect.with_position(Position::new(x, y)),
        };

        match self.phase {
            Phase::Live(handle) => self.apply(handle, event),
            Phase::Idle if self.retry_on_geometry && self.rect.is_valid() => self.start_settle(),
            _ => {}
        }
    }

    /// Fire-and-forget geometry update; failures are only logged.
    fn apply(&self, handle: SurfaceHandle, event: GeometryEvent) {
        let backend = Arc::clone(&self.backend);
        let region = self.id;
        tokio::spawn(async move {
            let result = match event {
                GeometryEvent::Resize { width, height } => {
                    backend.set_size(handle, Size::new(width, height)).await
                }
                GeometryEvent::Reposition { x, y } => {
                    backend.set_position(handle, Position::new(x, y)).await
                }
            };
            match result {
                Ok(()) => {}
                Err(e) if e.is_benign() => {
                    debug!(%region, %handle, error = %e, "geometry update raced surface teardown")
                }
                Err(e) => warn!(%region, %handle, error = %e, ?event, "geometry update failed"),
            }
        });
    }

    fn destroy(&mut self, handle: SurfaceHandle) {
        self.destroys_in_flight += 1;
        let backend = Arc::clone(&self.backend);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = backend.destroy(handle).await;
            let _ = completions.send(Completion::Destroyed { handle, result });
        });
    }

    fn on_destroyed(&mut self, handle: SurfaceHandle, result: Result<(), SurfaceError>) {
        self.destroys_in_flight = self.destroys_in_flight.saturating_sub(1);
        match result {
            Ok(()) => info!(region = %self.id, %handle, "surface destroyed"),
            Err(e) if e.is_benign() => {
                debug!(region = %self.id, %handle, "surface was already gone")
            }
            Err(e) => warn!(region = %self.id, %handle, error = %e, "surface destroy failed"),
        }
        self.emit(Event::SurfaceDestroyed {
            region: self.id,
            handle,
        });

        if matches!(self.phase, Phase::Destroying(h) if h == handle) {
            self.phase = Phase::Idle;
        }
    }

    fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    fn snapshot(&self) -> BinderSnapshot {
        BinderSnapshot {
            phase: self.phase.kind(),
            state: self.phase.state(),
            status: self.status.clone(),
            rect: self.rect,
        }
    }

    fn publish(&self) {
        let next = self.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

async fn next_geometry(geometry: &mut Option<GeometryStream>) -> Option<GeometryEvent> {
    match geometry {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}
