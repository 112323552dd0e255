//! Keeps a backend-owned preview surface glued to a UI placeholder region.
//!
//! - [`PlaceholderRegion`]: the UI-owned rectangle, published as two
//!   independent state cells (size and position)
//! - [`GeometryObserver`]: turns a region into a stream of [`GeometryEvent`]s
//! - [`SurfaceBinder`]: creates, resizes, moves and destroys one surface per
//!   region, tolerating out-of-order backend completions
//! - [`PreviewRegistry`]: mount/unmount bookkeeping for many regions

pub mod binder;
pub mod observer;
pub mod region;
pub mod registry;

pub use binder::{
    BinderSnapshot, BindingOptions, BindingPhase, BindingState, PreviewStatus, SurfaceBinder,
};
pub use observer::{GeometryEvent, GeometryObserver, GeometryStream};
pub use region::PlaceholderRegion;
pub use registry::PreviewRegistry;
