mod cli;
mod session;
mod shell;

use std::path::Path;
use std::process::ExitCode;

use lens_config::LensConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "lens=info";

fn init_logging(directive: &str) {
    let directive = directive
        .parse()
        .or_else(|_| DEFAULT_DIRECTIVE.parse());
    let filter = match directive {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = match args.config.as_deref() {
        Some(path) => lens_config::load_config_from(Path::new(path)),
        None => lens_config::load_config(),
    };

    // CLI override, then the configured level, then the default.
    let cli_directive = args.log_level.as_deref().map(cli::log_directive);
    let directive = match (&cli_directive, &loaded) {
        (Some(Some(directive)), _) => directive.clone(),
        (_, Ok(config)) => config.logging.level.directive().to_string(),
        (_, Err(_)) => DEFAULT_DIRECTIVE.to_string(),
    };
    init_logging(&directive);
    if let (Some(None), Some(level)) = (&cli_directive, &args.log_level) {
        tracing::warn!(
            "Ignoring --log-level {level:?}: expected trace, debug, info, warn, error or target=level"
        );
    }

    tracing::info!("Lens v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        LensConfig::default()
    });
    if let Some(ms) = args.settle_ms {
        config.preview.settle_interval_ms = ms;
        if let Err(e) = lens_config::validation::validate(&config) {
            tracing::error!("Invalid --settle-ms: {e}");
            return ExitCode::FAILURE;
        }
    }
    tracing::debug!(config = %lens_config::config_to_json(&config), "effective config");

    let mut shell = match shell::PreviewShell::start(&config).await {
        Ok(shell) => shell,
        Err(e) => {
            tracing::error!("Failed to start preview shell: {e}");
            return ExitCode::FAILURE;
        }
    };
    if args.offline {
        tracing::info!("Offline mode: stopping the surface host");
        shell.host().stop();
    }

    let report = session::run(&mut shell, config.preview.settle_interval()).await;
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize session report: {e}"),
    }

    shell.shutdown().await;
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
