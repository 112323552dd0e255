pub mod errors;
pub mod events;
pub mod id;
pub mod notifications;
pub mod types;

pub use errors::{ConfigError, LensError, SurfaceError};
pub use events::{Event, EventBus};
pub use id::{RegionId, SurfaceHandle};
pub use notifications::{Notification, NotificationLevel, NotificationQueue};
pub use types::{Color, Position, Rect, Size};

pub type Result<T> = std::result::Result<T, LensError>;
