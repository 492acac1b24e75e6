mod cli;
pub mod router;
pub mod server;
mod state;
pub mod tracing;

pub use cli::{Cli, Command};
pub use state::AppState;

use crate::config::Settings;
use crate::error::ReporterError;
use tokio_util::sync::CancellationToken;

/// Application entry point. Initializes tracing and configuration, starts the
/// server, then fires the one-shot collector registration.
pub async fn run(cli: Cli) -> Result<(), ReporterError> {
    // container probe mode: no tracing, no settings
    if let Some(Command::Healthcheck { port }) = cli.command {
        match crate::healthcheck_with_port(port).await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();

    let settings = Settings::load(cli.config_dir.as_deref())?;
    ::tracing::info!(
        log_file = %settings.log_file_path.display(),
        "Loaded settings"
    );

    let app_state = AppState::from_settings(&settings)?;
    let app = router::main_router(app_state.extractor.clone(), app_state.registration.clone());

    let listener = server::bind(settings.http_port).await?;
    let shutdown_token = CancellationToken::new();
    let server_handle = tokio::spawn(server::serve(listener, app, shutdown_token));

    // Exactly once per process, after the server accepts connections.
    app_state.registration.register_on_startup().await;

    server_handle.await?
}
