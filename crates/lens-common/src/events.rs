use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::{RegionId, SurfaceHandle};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    RegionMounted(RegionId),
    RegionUnmounted(RegionId),
    SurfaceCreated {
        region: RegionId,
        handle: SurfaceHandle,
    },
    SurfaceDestroyed {
        region: RegionId,
        handle: SurfaceHandle,
    },
    PreviewUnavailable {
        region: RegionId,
        reason: String,
    },
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// A publisher handle that can be moved into a binding task.
    pub fn sender(&self) -> broadcast::Sender<Event> {
        self.sender.clone()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
