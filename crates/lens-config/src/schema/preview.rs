//! Live preview surface configuration.

use std::time::Duration;

use lens_common::Color;
use serde::{Deserialize, Serialize};

/// Fallback clear color when `background_color` does not parse.
pub const DEFAULT_BACKGROUND: &str = "#1f2937";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Delay between mounting a region and creating its surface, in
    /// milliseconds (valid range: 0-5000).
    pub settle_interval_ms: u32,
    /// Clear color of the backend surface, `#rrggbb` or `#rrggbbaa`.
    pub background_color: String,
    /// Label of the window that owns mounted preview regions.
    pub owner_window: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            settle_interval_ms: 150,
            background_color: DEFAULT_BACKGROUND.to_string(),
            owner_window: "main".to_string(),
        }
    }
}

impl PreviewConfig {
    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.settle_interval_ms))
    }

    /// Background color packed as `0xAARRGGBB`.
    pub fn background_argb(&self) -> u32 {
        Color::from_hex(&self.background_color)
            .or_else(|| Color::from_hex(DEFAULT_BACKGROUND))
            .map(|c| c.to_argb())
            .unwrap_or(0xff00_0000)
    }
}
