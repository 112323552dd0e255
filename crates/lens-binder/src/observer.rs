//! Geometry observation for placeholder regions.

use futures_util::stream::{self, Stream};
use lens_common::{Position, Size};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::region::PlaceholderRegion;

/// One change to a region's geometry, carrying only the changed half.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeometryEvent {
    Resize { width: f64, height: f64 },
    Reposition { x: f64, y: f64 },
}

impl GeometryEvent {
    pub fn resize(size: Size) -> Self {
        Self::Resize {
            width: size.width,
            height: size.height,
        }
    }

    pub fn reposition(position: Position) -> Self {
        Self::Reposition {
            x: position.x,
            y: position.y,
        }
    }
}

/// Entry point for watching a region's geometry.
pub struct GeometryObserver;

impl GeometryObserver {
    /// Start observing `region`. Only changes made after this call are
    /// reported; dropping the stream releases both subscriptions.
    pub fn observe(region: &PlaceholderRegion) -> GeometryStream {
        let (size, position) = region.subscribe();
        GeometryStream { size, position }
    }
}

/// Live geometry events for one region.
///
/// Intermediate values written between two polls are coalesced: the
/// stream yields the latest size and the latest position, never a backlog.
#[derive(Debug)]
pub struct GeometryStream {
    size: watch::Receiver<Size>,
    position: watch::Receiver<Position>,
}

impl GeometryStream {
    /// Next change, or `None` once the region has been unmounted.
    ///
    /// Cancel safe: a change is never lost if this future is dropped.
    pub async fn next(&mut self) -> Option<GeometryEvent> {
        tokio::select! {
            biased;
            changed = self.size.changed() => {
                changed.ok()?;
                Some(GeometryEvent::resize(*self.size.borrow_and_update()))
            }
            changed = self.position.changed() => {
                changed.ok()?;
                Some(GeometryEvent::reposition(*self.position.borrow_and_update()))
            }
        }
    }

    /// Adapt into a `futures` stream.
    pub fn into_stream(self) -> impl Stream<Item = GeometryEvent> {
        stream::unfold(self, |mut geometry| async move {
            let event = geometry.next().await?;
            Some((event, geometry))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use lens_common::Rect;
    use std::time::Duration;

    fn region() -> PlaceholderRegion {
        PlaceholderRegion::new("main", Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    async fn no_event(geometry: &mut GeometryStream) -> bool {
        tokio::time::timeout(Duration::from_millis(20), geometry.next())
            .await
            .is_err()
    }

    #[tokio::test]
    async fn size_and_position_are_reported_separately() {
        let region = region();
        let mut geometry = GeometryObserver::observe(&region);

        region.resize(Size::new(150.0, 100.0));
        assert_eq!(
            geometry.next().await,
            Some(GeometryEvent::Resize {
                width: 150.0,
                height: 100.0
            })
        );

        region.reposition(Position::new(10.0, 20.0));
        assert_eq!(
            geometry.next().await,
            Some(GeometryEvent::Reposition { x: 10.0, y: 20.0 })
        );
    }

    #[tokio::test]
    async fn position_change_does_not_emit_resize() {
        let region = region();
        let mut geometry = GeometryObserver::observe(&region);

        region.set_rect(Rect::new(30.0, 0.0, 100.0, 100.0));
        assert_eq!(
            geometry.next().await,
            Some(GeometryEvent::Reposition { x: 30.0, y: 0.0 })
        );
        assert!(no_event(&mut geometry).await);
    }

    #[tokio::test]
    async fn bursts_are_coalesced() {
        let region = region();
        let mut geometry = GeometryObserver::observe(&region);

        region.resize(Size::new(50.0, 50.0));
        region.resize(Size::new(60.0, 60.0));
        region.resize(Size::new(80.0, 80.0));

        assert_eq!(
            geometry.next().await,
            Some(GeometryEvent::Resize {
                width: 80.0,
                height: 80.0
            })
        );
        assert!(no_event(&mut geometry).await);
    }

    #[tokio::test]
    async fn fresh_observer_starts_clean() {
        let region = region();
        let first = GeometryObserver::observe(&region);
        region.resize(Size::new(10.0, 10.0));
        drop(first);
        assert_eq!(region.observer_count(), 0);

        let mut second = GeometryObserver::observe(&region);
        assert_eq!(region.observer_count(), 1);
        assert!(no_event(&mut second).await);
    }

    #[tokio::test]
    async fn stream_ends_on_unmount() {
        let region = region();
        let mut geometry = GeometryObserver::observe(&region);
        drop(region);
        assert_eq!(geometry.next().await, None);
    }

    #[tokio::test]
    async fn into_stream_yields_until_unmount() {
        let region = region();
        let events = GeometryObserver::observe(&region).into_stream();
        region.resize(Size::new(1.0, 2.0));
        drop(region);

        let collected: Vec<_> = events.collect().await;
        assert_eq!(
            collected,
            vec![GeometryEvent::Resize {
                width: 1.0,
                height: 2.0
            }]
        );
    }
}
