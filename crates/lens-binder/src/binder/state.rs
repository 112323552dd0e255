use lens_common::{Rect, SurfaceHandle};
use serde::{Deserialize, Serialize};

use super::timer::SettleTimer;

/// Coarse lifecycle phase of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingPhase {
    Idle,
    /// Bound and waiting for the settle interval before creating.
    Settling,
    Creating,
    Live,
    Destroying,
}

/// The `{ pending, handle, pending_destroy }` view of a binding.
///
/// `pending_destroy` is only ever set while `pending` is: the surface that
/// create() eventually returns is destroyed on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BindingState {
    pub pending: bool,
    pub handle: Option<SurfaceHandle>,
    pub pending_destroy: bool,
}

/// What the UI should show in the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewStatus {
    /// Not bound, or waiting for usable geometry.
    Hidden,
    /// A surface is on its way.
    Pending,
    Showing,
    /// The backend could not be reached; stays until the next rebind.
    Unavailable(String),
}

/// Published after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinderSnapshot {
    pub phase: BindingPhase,
    pub state: BindingState,
    pub status: PreviewStatus,
    /// Latest geometry the binder knows about.
    pub rect: Rect,
}

/// An in-flight create() call.
#[derive(Debug)]
pub(crate) struct Creation {
    /// Geometry the call was issued with.
    pub requested: Rect,
    pub pending_destroy: bool,
}

#[derive(Debug)]
pub(crate) enum Phase {
    Idle,
    Settling(SettleTimer),
    Creating(Creation),
    Live(SurfaceHandle),
    Destroying(SurfaceHandle),
}

impl Phase {
    pub fn kind(&self) -> BindingPhase {
        match self {
            Self::Idle => BindingPhase::Idle,
            Self::Settling(_) => BindingPhase::Settling,
            Self::Creating(_) => BindingPhase::Creating,
            Self::Live(_) => BindingPhase::Live,
            Self::Destroying(_) => BindingPhase::Destroying,
        }
    }

    pub fn state(&self) -> BindingState {
        match self {
            Self::Creating(creation) => BindingState {
                pending: true,
                handle: None,
                pending_destroy: creation.pending_destroy,
            },
            Self::Live(handle) | Self::Destroying(handle) => BindingState {
                pending: false,
                handle: Some(*handle),
                pending_destroy: false,
            },
            Self::Idle | Self::Settling(_) => BindingState::default(),
        }
    }
}
