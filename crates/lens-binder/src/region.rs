//! UI-owned placeholder rectangles.

use lens_common::{Position, Rect, Size};
use tokio::sync::watch;

/// A rectangle the UI reserves for a preview surface.
///
/// Size and position are separate single-writer cells: the UI's resize
/// notifications write one, scroll/layout notifications write the other.
/// Dropping the region is the unmount signal for every observer.
#[derive(Debug)]
pub struct PlaceholderRegion {
    owner: String,
    size: watch::Sender<Size>,
    position: watch::Sender<Position>,
}

impl PlaceholderRegion {
    /// Mount a region in window `owner` with its initial rect.
    pub fn new(owner: impl Into<String>, rect: Rect) -> Self {
        let (size, _) = watch::channel(rect.size());
        let (position, _) = watch::channel(rect.position());
        Self {
            owner: owner.into(),
            size,
            position,
        }
    }

    /// Label of the window hosting this region.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Snapshot of the current rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_parts(*self.position.borrow(), *self.size.borrow())
    }

    /// Record a new pixel size. Returns `false` if nothing changed.
    pub fn resize(&self, size: Size) -> bool {
        self.size.send_if_modified(|current| {
            if *current == size {
                return false;
            }
            *current = size;
            true
        })
    }

    /// Record a new screen position. Returns `false` if nothing changed.
    pub fn reposition(&self, position: Position) -> bool {
        self.position.send_if_modified(|current| {
            if *current == position {
                return false;
            }
            *current = position;
            true
        })
    }

    /// Apply a full layout pass; each half only notifies if it changed.
    pub fn set_rect(&self, rect: Rect) {
        self.resize(rect.size());
        self.reposition(rect.position());
    }

    /// Number of live geometry subscriptions on this region.
    pub fn observer_count(&self) -> usize {
        self.size.receiver_count()
    }

    pub(crate) fn subscribe(&self) -> (watch::Receiver<Size>, watch::Receiver<Position>) {
        (self.size.subscribe(), self.position.subscribe())
    }
}
