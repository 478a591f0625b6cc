//! API Tools MCP Server
//!
//! An MCP tool gateway: third-party REST APIs (the Lichess board API, the
//! MetalpriceAPI pricing API) exposed as schema-described tools. Each
//! invocation is validated against its tool schema, translated into exactly
//! one outbound HTTP request and normalized back into a uniform result or
//! typed error.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod server;
pub mod tools;
pub mod utils;

/// Re-export common types
pub use crate::error::{Error, Result, ToolError};
pub use crate::server::{GatewayServer, ServerConfig};

/// Server version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const NAME: &str = "api-tools";

/// Initialize logging system with configuration
///
/// The console layer writes to stderr: with the stdio transport, stdout
/// carries protocol frames and must stay clean.
///
/// # Errors
/// Returns an error if logging system initialization fails
pub fn init_logging_with_config(config: &crate::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Parse log level
    let level = match config.level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };

    let filter = EnvFilter::new(level);

    let console_layer = config.enable_console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .compact()
    });

    let file_layer = match (config.enable_file, &config.file_path) {
        (true, Some(file_path)) => {
            // Determine log directory
            let log_dir = std::path::Path::new(file_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let log_file_name = std::path::Path::new(file_path)
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("api-tools.log"));

            // Ensure directory exists
            std::fs::create_dir_all(log_dir).map_err(|e| {
                error::Error::Initialization(format!("Failed to create log directory: {e}"))
            })?;

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);

            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .compact(),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| error::Error::Initialization(e.to_string()))?;

    Ok(())
}
