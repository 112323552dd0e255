use clap::Parser;

/// Lens: a live capture preview that stays glued to its placeholder.
#[derive(Parser, Debug)]
#[command(name = "lens", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Settle interval override in milliseconds.
    #[arg(long)]
    pub settle_ms: Option<u32>,

    /// Stop the surface host before the session starts, so every preview
    /// reports itself unavailable.
    #[arg(long)]
    pub offline: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Turn a `--log-level` value into a filter directive. A bare level applies
/// to the lens crates; a `target=level` directive passes through. Anything
/// else is rejected rather than read as a target name.
pub fn log_directive(value: &str) -> Option<String> {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        level @ ("trace" | "debug" | "info" | "warn" | "error") => Some(format!("lens={level}")),
        "warning" => Some("lens=warn".to_string()),
        _ if value.contains('=') => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_online_without_overrides() {
        let args = Args::parse_from(["lens"]);
        assert!(!args.offline);
        assert!(args.config.is_none());
        assert!(args.settle_ms.is_none());
    }

    #[test]
    fn overrides_parse() {
        let args = Args::parse_from([
            "lens",
            "--config",
            "/tmp/lens.toml",
            "--log-level",
            "lens=debug",
            "--settle-ms",
            "40",
            "--offline",
        ]);
        assert_eq!(args.config.as_deref(), Some("/tmp/lens.toml"));
        assert_eq!(args.log_level.as_deref(), Some("lens=debug"));
        assert_eq!(args.settle_ms, Some(40));
        assert!(args.offline);
    }

    #[test]
    fn bare_levels_target_the_lens_crates() {
        assert_eq!(log_directive("debug").as_deref(), Some("lens=debug"));
        assert_eq!(log_directive(" WARN ").as_deref(), Some("lens=warn"));
        assert_eq!(log_directive("warning").as_deref(), Some("lens=warn"));
    }

    #[test]
    fn full_directives_pass_through() {
        assert_eq!(
            log_directive("lens_binder=trace").as_deref(),
            Some("lens_binder=trace")
        );
    }

    #[test]
    fn unknown_words_are_rejected() {
        assert_eq!(log_directive("verbose"), None);
        assert_eq!(log_directive(""), None);
    }
}
