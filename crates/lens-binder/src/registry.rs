//! Region registry: mounted placeholder regions and their binders.

use std::collections::HashMap;
use std::sync::Arc;

use lens_common::{Event, Rect, RegionId};
use lens_surface::SurfaceBackend;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::binder::{BinderSnapshot, BindingOptions, SurfaceBinder};
use crate::region::PlaceholderRegion;

struct MountedRegion {
    region: Arc<PlaceholderRegion>,
    binder: SurfaceBinder,
}

/// Owns every mounted region and the binder keeping its surface in place.
///
/// Unmounted binders are kept until their task has drained so that
/// [`shutdown`](Self::shutdown) can wait for late destroys.
pub struct PreviewRegistry {
    backend: Arc<dyn SurfaceBackend>,
    events: broadcast::Sender<Event>,
    options: BindingOptions,
    next_id: u32,
    regions: HashMap<RegionId, MountedRegion>,
    retiring: Vec<SurfaceBinder>,
}

impl PreviewRegistry {
    pub fn new(
        backend: Arc<dyn SurfaceBackend>,
        events: broadcast::Sender<Event>,
        options: BindingOptions,
    ) -> Self {
        Self {
            backend,
            events,
            options,
            next_id: 1,
            regions: HashMap::new(),
            retiring: Vec::new(),
        }
    }

    /// Mount a region in window `owner` and bind it.
    pub fn mount(&mut self, owner: &str, rect: Rect) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;

        let region = Arc::new(PlaceholderRegion::new(owner, rect));
        let binder = SurfaceBinder::new(
            id,
            &region,
            Arc::clone(&self.backend),
            self.options,
            Some(self.events.clone()),
        );
        binder.bind();
        self.regions.insert(id, MountedRegion { region, binder });

        info!(region = %id, owner, ?rect, "region mounted");
        let _ = self.events.send(Event::RegionMounted(id));
        id
    }

    /// Unmount a region. Returns `false` if it was not mounted.
    pub fn unmount(&mut self, id: RegionId) -> bool {
        let Some(MountedRegion { region, binder }) = self.regions.remove(&id) else {
            debug!(region = %id, "unmount of unknown region");
            return false;
        };
        binder.unbind();
        drop(region);
        self.retiring.push(binder);
        self.retiring.retain(|b| !b.is_finished());

        info!(region = %id, "region unmounted");
        let _ = self.events.send(Event::RegionUnmounted(id));
        true
    }

    /// Tear down and recreate the surface of a mounted region.
    pub fn rebind(&self, id: RegionId) -> bool {
        match self.regions.get(&id) {
            Some(mounted) => {
                mounted.binder.rebind();
                true
            }
            None => false,
        }
    }

    /// The region, for the UI to push geometry into.
    pub fn region(&self, id: RegionId) -> Option<Arc<PlaceholderRegion>> {
        self.regions.get(&id).map(|m| Arc::clone(&m.region))
    }

    pub fn binder(&self, id: RegionId) -> Option<&SurfaceBinder> {
        self.regions.get(&id).map(|m| &m.binder)
    }

    pub fn snapshot(&self, id: RegionId) -> Option<BinderSnapshot> {
        self.binder(id).map(SurfaceBinder::snapshot)
    }

    /// Mounted region ids, ascending.
    pub fn active_regions(&self) -> Vec<RegionId> {
        let mut ids: Vec<_> = self.regions.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn count(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Unmount everything and wait until every binder has released its
    /// surface.
    pub async fn shutdown(&mut self) {
        for id in self.active_regions() {
            self.unmount(id);
        }
        let binders = std::mem::take(&mut self.retiring);
        info!(count = binders.len(), "waiting for binders to drain");
        for binder in binders {
            binder.shutdown().await;
        }
    }
}
