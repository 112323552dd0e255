use lens_common::Color;

use crate::schema::LensConfig;

use super::helpers::validate_range;

pub(crate) fn validate_preview(errors: &mut Vec<String>, config: &LensConfig) {
    let preview = &config.preview;

    validate_range(
        errors,
        "preview.settle_interval_ms",
        preview.settle_interval_ms,
        0,
        5000,
    );

    if Color::from_hex(&preview.background_color).is_none() {
        errors.push(format!(
            "preview.background_color = {:?} is not a hex color",
            preview.background_color
        ));
    }

    if preview.owner_window.trim().is_empty() {
        errors.push("preview.owner_window must not be empty".to_string());
    }
}
