//! In-process surface backend.
//!
//! All surface state lives on one dedicated host thread. Callers submit
//! jobs over a channel and await the answer on a oneshot, so the table is
//! never touched concurrently and requests are served in submission order.

mod table;

pub use table::{PixelRect, SurfaceRecord, SurfaceTable};

use std::sync::Mutex;
use std::thread::JoinHandle;

use async_trait::async_trait;
use lens_common::{Position, Rect, Size, SurfaceError, SurfaceHandle};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::backend::SurfaceBackend;

type Job = Box<dyn FnOnce(&mut SurfaceTable) + Send>;

/// Handle to the host thread. Stopping the host (or dropping it) makes
/// every later call fail with `BackendUnavailable`.
pub struct SurfaceHost {
    jobs: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl SurfaceHost {
    /// Spawn the host thread.
    pub fn start() -> Result<Self, SurfaceError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        let thread = std::thread::Builder::new()
            .name("surface-host".into())
            .spawn(move || {
                let mut table = SurfaceTable::new();
                while let Some(job) = rx.blocking_recv() {
                    job(&mut table);
                }
                debug!(remaining = table.len(), "surface host thread exiting");
            })
            .map_err(|e| SurfaceError::BackendUnavailable(format!("failed to spawn host: {e}")))?;

        info!("surface host started");
        Ok(Self {
            jobs: Mutex::new(Some(tx)),
            thread: Mutex::new(Some(thread)),
        })
    }

    /// Run `f` against the surface table on the host thread.
    pub async fn run<T, F>(&self, f: F) -> Result<T, SurfaceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SurfaceTable) -> Result<T, SurfaceError> + Send + 'static,
    {
        let sender = self
            .sender()
            .ok_or_else(|| SurfaceError::BackendUnavailable("surface host stopped".into()))?;

        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move |table| {
            let _ = tx.send(f(table));
        });
        sender
            .send(job)
            .map_err(|_| SurfaceError::BackendUnavailable("surface host stopped".into()))?;

        rx.await
            .map_err(|_| SurfaceError::BackendUnavailable("surface host dropped the request".into()))?
    }

    /// Allow surfaces to be created inside the window labelled `label`.
    pub async fn register_window(&self, label: &str) -> Result<(), SurfaceError> {
        let label = label.to_string();
        let added = self.run(move |table| Ok(table.register_window(&label))).await?;
        if !added {
            debug!("window registered twice");
        }
        Ok(())
    }

    /// Forget a window; its surfaces are released with it.
    pub async fn unregister_window(&self, label: &str) -> Result<usize, SurfaceError> {
        let label = label.to_string();
        self.run(move |table| Ok(table.unregister_window(&label)))
            .await
    }

    /// Current record for `handle`, if the surface is live.
    pub async fn surface(&self, handle: SurfaceHandle) -> Option<SurfaceRecord> {
        self.run(move |table| Ok(table.get(handle).cloned()))
            .await
            .ok()
            .flatten()
    }

    /// Number of live surfaces.
    pub async fn surface_count(&self) -> Result<usize, SurfaceError> {
        self.run(|table| Ok(table.len())).await
    }

    /// Stop accepting jobs. Jobs already queued still run.
    pub fn stop(&self) {
        let stopped = match self.jobs.lock() {
            Ok(mut jobs) => jobs.take().is_some(),
            Err(_) => false,
        };
        if stopped {
            info!("surface host stopping");
        }
    }

    fn sender(&self) -> Option<mpsc::UnboundedSender<Job>> {
        self.jobs.lock().ok()?.clone()
    }
}

impl Drop for SurfaceHost {
    fn drop(&mut self) {
        self.stop();
        let thread = self.thread.get_mut().ok().and_then(Option::take);
        if let Some(thread) = thread {
            if thread.join().is_err() {
                warn!("surface host thread panicked");
            }
        }
    }
}

#[async_trait]
impl SurfaceBackend for SurfaceHost {
    async fn create(
        &self,
        owner_label: &str,
        rect: Rect,
        background_color: u32,
    ) -> Result<SurfaceHandle, SurfaceError> {
        let owner = owner_label.to_string();
        let handle = self
            .run(move |table| table.create(&owner, rect, background_color))
            .await?;
        debug!(%handle, owner = owner_label, ?rect, "surface created");
        Ok(handle)
    }

    async fn set_size(&self, handle: SurfaceHandle, size: Size) -> Result<(), SurfaceError> {
        self.run(move |table| table.set_size(handle, size)).await
    }

    async fn set_position(
        &self,
        handle: SurfaceHandle,
        position: Position,
    ) -> Result<(), SurfaceError> {
        self.run(move |table| table.set_position(handle, position))
            .await
    }

    async fn destroy(&self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        self.run(move |table| table.destroy(handle)).await?;
        debug!(%handle, "surface destroyed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn host_with_main() -> SurfaceHost {
        let host = SurfaceHost::start().unwrap();
        host.register_window("main").await.unwrap();
        host
    }

    #[tokio::test]
    async fn create_resize_move_destroy() {
        let host = host_with_main().await;
        let h = host
            .create("main", Rect::new(0.0, 0.0, 100.0, 100.0), 0xff1f_2937)
            .await
            .unwrap();

        host.set_size(h, Size::new(150.0, 100.0)).await.unwrap();
        host.set_position(h, Position::new(20.0, 30.0)).await.unwrap();

        let record = host.surface(h).await.unwrap();
        assert_eq!(
            record.bounds,
            PixelRect {
                x: 20,
                y: 30,
                width: 150,
                height: 100
            }
        );
        assert_eq!(record.background_color, 0xff1f_2937);

        host.destroy(h).await.unwrap();
        assert!(host.surface(h).await.is_none());
        assert_eq!(host.surface_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn destroy_is_tolerant_of_repeats() {
        let host = host_with_main().await;
        let h = host
            .create("main", Rect::new(0.0, 0.0, 10.0, 10.0), 0)
            .await
            .unwrap();
        host.destroy(h).await.unwrap();
        let err = host.destroy(h).await.unwrap_err();
        assert!(err.is_benign());
    }

    #[tokio::test]
    async fn zero_area_create_is_invalid_geometry() {
        let host = host_with_main().await;
        let err = host
            .create("main", Rect::new(0.0, 0.0, 0.0, 0.0), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidGeometry(_)));
    }

    #[tokio::test]
    async fn stopped_host_is_unavailable() {
        let host = host_with_main().await;
        host.stop();
        let err = host
            .create("main", Rect::new(0.0, 0.0, 10.0, 10.0), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SurfaceError::BackendUnavailable(_)));
        assert!(host.surface_count().await.is_err());
    }

    #[tokio::test]
    async fn unregistered_window_is_unavailable() {
        let host = SurfaceHost::start().unwrap();
        let err = host
            .create("main", Rect::new(0.0, 0.0, 10.0, 10.0), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SurfaceError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn unregister_window_releases_surfaces() {
        let host = host_with_main().await;
        let h = host
            .create("main", Rect::new(0.0, 0.0, 10.0, 10.0), 0)
            .await
            .unwrap();
        assert_eq!(host.unregister_window("main").await.unwrap(), 1);
        let err = host.set_size(h, Size::new(5.0, 5.0)).await.unwrap_err();
        assert_eq!(err, SurfaceError::UnknownHandle(h));
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let host = host_with_main().await;
        let backend: std::sync::Arc<dyn SurfaceBackend> = std::sync::Arc::new(host);
        let h = backend
            .create("main", Rect::new(1.0, 2.0, 3.0, 4.0), 0)
            .await
            .unwrap();
        assert_eq!(h, SurfaceHandle(1));
    }

    #[test]
    fn record_serializes() {
        let record = SurfaceRecord {
            owner: "main".into(),
            bounds: PixelRect {
                x: 1,
                y: 2,
                width: 3,
                height: 4,
            },
            background_color: 7,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"owner\":\"main\""));
    }
}
