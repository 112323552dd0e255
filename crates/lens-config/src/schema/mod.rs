//! Configuration schema types for lens.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod preview;
mod system;

pub use preview::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub preview: PreviewConfig,
    pub logging: LoggingConfig,
}
