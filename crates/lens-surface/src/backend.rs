use async_trait::async_trait;
use lens_common::{Position, Rect, Size, SurfaceError, SurfaceHandle};

/// Asynchronous operations against the surface backend.
///
/// Every call reports failure as a value. Implementations do not retry.
#[async_trait]
pub trait SurfaceBackend: Send + Sync {
    /// Create a surface inside the window labelled `owner_label`.
    ///
    /// Fails with `BackendUnavailable` or `InvalidGeometry`.
    async fn create(
        &self,
        owner_label: &str,
        rect: Rect,
        background_color: u32,
    ) -> Result<SurfaceHandle, SurfaceError>;

    /// Fails with `UnknownHandle` if the surface is gone.
    async fn set_size(&self, handle: SurfaceHandle, size: Size) -> Result<(), SurfaceError>;

    /// Fails with `UnknownHandle` if the surface is gone.
    async fn set_position(
        &self,
        handle: SurfaceHandle,
        position: Position,
    ) -> Result<(), SurfaceError>;

    /// Destroying an already destroyed handle yields `UnknownHandle`.
    async fn destroy(&self, handle: SurfaceHandle) -> Result<(), SurfaceError>;
}
