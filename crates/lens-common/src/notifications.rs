use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::id::RegionId;

/// Severity level for in-app notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
}

/// A non-blocking notice shown over the window, optionally tied to the
/// region that raised it.
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub body: String,
    pub region: Option<RegionId>,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    /// Creates an info notification with a 5-second TTL.
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Info, title, body, Duration::from_secs(5))
    }

    /// Creates a warning notification with an 8-second TTL.
    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_level(
            NotificationLevel::Warning,
            title,
            body,
            Duration::from_secs(8),
        )
    }

    /// The notice shown when a region's preview surface could not be created.
    pub fn preview_unavailable(region: RegionId, reason: impl Into<String>) -> Self {
        Self::warning("Preview unavailable", reason).for_region(region)
    }

    /// Replaces the unavailable notice once a region's surface shows again.
    pub fn preview_restored(region: RegionId) -> Self {
        Self::info("Preview restored", "The live preview is back.").for_region(region)
    }

    pub fn for_region(mut self, region: RegionId) -> Self {
        self.region = Some(region);
        self
    }

    /// Returns `true` if this notification has exceeded its TTL.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }

    fn with_level(
        level: NotificationLevel,
        title: impl Into<String>,
        body: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            body: body.into(),
            region: None,
            created_at: Instant::now(),
            ttl,
        }
    }
}

/// A bounded queue of notices that auto-evicts expired entries.
///
/// A region has at most one notice with a given title at a time; pushing a
/// duplicate replaces the older one.
#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.evict_expired();
        if notification.region.is_some() {
            self.items.retain(|n| {
                !(n.region == notification.region && n.title == notification.title)
            });
        }
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(notification);
    }

    /// Drop every notice raised by `region`, e.g. once its preview shows again.
    pub fn dismiss_region(&mut self, region: RegionId) -> usize {
        let before = self.items.len();
        self.items.retain(|n| n.region != Some(region));
        before - self.items.len()
    }

    /// Returns all currently visible (non-expired) notifications.
    pub fn visible(&mut self) -> Vec<&Notification> {
        self.evict_expired();
        self.items.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn evict_expired(&mut self) {
        self.items.retain(|n| !n.is_expired());
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(16)
    }
}
