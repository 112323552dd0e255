//! Default TOML config template with inline documentation comments.

use crate::schema::CONFIG_SCHEMA_VERSION;

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    format!(
        r##"# Lens Configuration
# Schema version {CONFIG_SCHEMA_VERSION}
# Only override what you want to change -- missing fields use defaults.

[preview]
# settle_interval_ms = 150      # 0-5000, wait after mount before creating the surface
# background_color = "#1f2937"  # surface clear color, #rrggbb or #rrggbbaa
# owner_window = "main"

[logging]
# level = "INFO"                # DEBUG, INFO, WARNING, ERROR
"##
    )
}
