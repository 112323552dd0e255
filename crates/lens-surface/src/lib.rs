//! Backend surface proxy for lens.
//!
//! - [`SurfaceBackend`]: the asynchronous create/resize/reposition/destroy
//!   contract the binder drives
//! - [`SurfaceHost`]: an in-process backend that owns a surface table on a
//!   dedicated host thread

pub mod backend;
pub mod host;

pub use backend::SurfaceBackend;
pub use host::{PixelRect, SurfaceHost, SurfaceRecord, SurfaceTable};
