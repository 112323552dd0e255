//! The preview shell: surface host, region registry and user notices.

use std::sync::Arc;

use lens_binder::{BinderSnapshot, BindingOptions, PlaceholderRegion, PreviewRegistry};
use lens_common::{Event, EventBus, Notification, NotificationQueue, Rect, RegionId};
use lens_config::LensConfig;
use lens_surface::SurfaceHost;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

const NOTIFICATION_CAPACITY: usize = 16;

pub struct PreviewShell {
    host: Arc<SurfaceHost>,
    bus: EventBus,
    events: broadcast::Receiver<Event>,
    notifications: NotificationQueue,
    registry: PreviewRegistry,
    owner: String,
}

impl PreviewShell {
    /// Start the surface host and open the configured owner window.
    pub async fn start(config: &LensConfig) -> lens_common::Result<Self> {
        let host = Arc::new(SurfaceHost::start()?);
        let owner = config.preview.owner_window.clone();
        host.register_window(&owner).await?;

        let bus = EventBus::new(64);
        let events = bus.subscribe();
        let options = BindingOptions {
            settle_interval: config.preview.settle_interval(),
            background_color: config.preview.background_argb(),
        };
        let registry = PreviewRegistry::new(host.clone(), bus.sender(), options);

        info!(window = %owner, settle_ms = config.preview.settle_interval_ms, "preview shell ready");
        Ok(Self {
            host,
            bus,
            events,
            notifications: NotificationQueue::new(NOTIFICATION_CAPACITY),
            registry,
            owner,
        })
    }

    pub fn host(&self) -> &Arc<SurfaceHost> {
        &self.host
    }

    pub fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    /// Mount a preview region in the owner window.
    pub fn mount(&mut self, rect: Rect) -> RegionId {
        self.registry.mount(&self.owner, rect)
    }

    pub fn unmount(&mut self, id: RegionId) -> bool {
        self.registry.unmount(id)
    }

    pub fn region(&self, id: RegionId) -> Option<Arc<PlaceholderRegion>> {
        self.registry.region(id)
    }

    pub fn snapshot(&self, id: RegionId) -> Option<BinderSnapshot> {
        self.registry.snapshot(id)
    }

    /// Handle every event published since the last pump. Returns how many
    /// were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.on_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "event bus lagged; some events were dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        handled
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::PreviewUnavailable { region, reason } => {
                warn!(%region, %reason, "preview unavailable");
                self.notifications
                    .push(Notification::preview_unavailable(region, reason));
            }
            Event::SurfaceCreated { region, .. } => {
                if self.notifications.dismiss_region(region) > 0 {
                    info!(%region, "preview restored");
                    self.notifications.push(Notification::preview_restored(region));
                }
            }
            Event::RegionUnmounted(region) => {
                let dismissed = self.notifications.dismiss_region(region);
                if dismissed > 0 {
                    debug!(%region, dismissed, "cleared preview notices");
                }
            }
            other => debug!(event = ?other, "event"),
        }
    }

    /// Notices currently on screen.
    pub fn notifications(&mut self) -> Vec<&Notification> {
        self.notifications.visible()
    }

    /// Unmount every region and wait for their surfaces to be released.
    pub async fn shutdown(mut self) {
        self.registry.shutdown().await;
        self.pump_events();
        info!(subscribers = self.bus.publish(Event::Shutdown), "preview shell stopped");
        self.host.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lens_binder::{BindingPhase, PreviewStatus};
    use lens_common::{NotificationLevel, SurfaceHandle};

    use super::*;

    fn config() -> LensConfig {
        let mut config = LensConfig::default();
        config.preview.settle_interval_ms = 20;
        config
    }

    async fn wait_for(shell: &PreviewShell, id: RegionId, phase: BindingPhase) {
        let mut status = shell.registry().binder(id).unwrap().status();
        tokio::time::timeout(Duration::from_secs(5), status.wait_for(|s| s.phase == phase))
            .await
            .expect("timed out")
            .expect("binder gone");
    }

    #[tokio::test]
    async fn mounted_region_goes_live_in_owner_window() {
        let mut shell = PreviewShell::start(&config()).await.unwrap();
        let id = shell.mount(Rect::new(0.0, 0.0, 640.0, 360.0));
        wait_for(&shell, id, BindingPhase::Live).await;

        let handle = shell.snapshot(id).unwrap().state.handle.unwrap();
        let record = shell.host().surface(handle).await.unwrap();
        assert_eq!(record.owner, "main");
        assert_eq!(record.background_color, 0xff1f_2937);
        assert_eq!(shell.snapshot(id).unwrap().status, PreviewStatus::Showing);

        shell.shutdown().await;
    }

    #[tokio::test]
    async fn unavailable_backend_raises_one_notice_per_region() {
        let mut shell = PreviewShell::start(&config()).await.unwrap();
        shell.host().stop();

        let id = shell.mount(Rect::new(0.0, 0.0, 640.0, 360.0));
        let mut status = shell.registry().binder(id).unwrap().status();
        tokio::time::timeout(
            Duration::from_secs(5),
            status.wait_for(|s| matches!(s.status, PreviewStatus::Unavailable(_))),
        )
        .await
        .unwrap()
        .unwrap();
        shell.pump_events();

        // A retry that fails again replaces the notice instead of stacking.
        shell.registry().rebind(id);
        tokio::time::sleep(Duration::from_millis(100)).await;
        shell.pump_events();

        let notices = shell.notifications();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NotificationLevel::Warning);
        assert_eq!(notices[0].region, Some(id));
        assert!(notices[0].body.contains("surface host stopped"));

        shell.unmount(id);
        shell.pump_events();
        assert!(shell.notifications().is_empty());
        shell.shutdown().await;
    }

    #[tokio::test]
    async fn surface_arriving_after_a_failure_replaces_the_notice() {
        let mut shell = PreviewShell::start(&config()).await.unwrap();
        let region = RegionId(9);

        shell.on_event(Event::PreviewUnavailable {
            region,
            reason: "surface backend unavailable: busy".into(),
        });
        shell.on_event(Event::SurfaceCreated {
            region,
            handle: SurfaceHandle(1),
        });

        let notices = shell.notifications();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NotificationLevel::Info);
        assert_eq!(notices[0].title, "Preview restored");
        assert_eq!(notices[0].region, Some(region));

        // A surface with no prior failure raises nothing.
        shell.on_event(Event::SurfaceCreated {
            region: RegionId(10),
            handle: SurfaceHandle(2),
        });
        assert_eq!(shell.notifications().len(), 1);
        shell.shutdown().await;
    }
}
