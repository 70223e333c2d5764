use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing. The TUI owns the terminal, so output goes to a file.
pub fn init_logger(log_file: &str) -> Result<()> {
    // Get log level from environment or default to info
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = File::create(log_file)
        .with_context(|| format!("Failed to create log file {}", log_file))?;

    fmt()
        .with_env_filter(env_filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
