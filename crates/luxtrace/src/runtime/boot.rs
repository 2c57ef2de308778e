//! Boot — logging init, config load, session context.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::CaptureConfig;
use crate::error::{CaptureError, CaptureResult};
use crate::ingest::{Session, STAMP_FORMAT};

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luxtrace=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load and validate config, then stamp a session for this run.
pub fn boot() -> CaptureResult<Session> {
    info!("Starting luxtrace v{}", env!("CARGO_PKG_VERSION"));

    let config = CaptureConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        CaptureError::Config(e)
    })?;
    info!(
        "Loaded configuration: session={}, port={}, baud={}",
        config.session, config.port, config.baud
    );

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        CaptureError::Config(format!("cannot create output dir {}: {}", config.output_dir, e))
    })?;

    let stamp = chrono::Local::now().format(STAMP_FORMAT).to_string();
    let session = Session::from_config(&config, &stamp);
    info!("Logging to {}", session.csv_path.display());
    if let Some(path) = &session.image_path {
        info!("Final plot will be saved to {}", path.display());
    }

    Ok(session)
}
