//! Gatebind Runtime - configuration, logging and the invocation loop.
//!
//! This crate provides:
//! - Layered configuration (`ConfigLoader`, `GatebindConfig`)
//! - Logging setup driven by that configuration (`LoggingBuilder`)
//! - The invocation runtime (`GatewayRuntime`)
//!
//! ```ignore
//! use gatebind_runtime::GatewayRuntime;
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Reads gatebind.toml and GATEBIND_* variables, then installs logging
//!     let runtime = GatewayRuntime::from_env(SampleFunction::default())?;
//!
//!     // One JSON event per line in, one JSON response per line out
//!     runtime
//!         .run_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! Logs go to stderr unless configured otherwise, keeping stdout free for
//! responses.

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    BindingConfig, ConfigError, ConfigLoader, ConfigResult, GatebindConfig, LoggingConfig,
    Profile,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{GatewayRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
