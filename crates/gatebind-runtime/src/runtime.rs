//! The invocation runtime.
//!
//! [`GatewayRuntime`] wires configuration into a [`Dispatcher`] and exposes
//! three ways in: typed events ([`invoke`](GatewayRuntime::invoke)), raw JSON
//! ([`invoke_json`](GatewayRuntime::invoke_json)) and a JSON-lines loop over
//! any async reader/writer pair ([`run_lines`](GatewayRuntime::run_lines)).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gatebind_runtime::GatewayRuntime;
//!
//! // Loads gatebind.toml + GATEBIND_* and installs logging
//! let runtime = GatewayRuntime::from_env(SampleFunction::default())?;
//!
//! // Custom configuration path
//! let runtime = GatewayRuntime::builder(SampleFunction::default())
//!     .config_file("config/gatebind.toml")
//!     .profile("production")
//!     .build()?;
//!
//! runtime
//!     .run_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
//!     .await?;
//! ```

use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use gatebind_core::{GatewayEvent, GatewayResponse, InvocationContext};
use gatebind_framework::{Action, ConstraintRegistry, Dispatcher};

use crate::config::{BindingConfig, ConfigLoader, GatebindConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Encoded when a response cannot be serialized at all.
const ENCODE_FAILURE: &str =
    r#"{"statusCode":500,"headers":{},"body":"{\"message\":\"failed to encode response\"}","isBase64Encoded":false}"#;

/// Drives one [`Action`] from configuration to responses.
pub struct GatewayRuntime<A: Action> {
    dispatcher: Dispatcher<A>,
    config: GatebindConfig,
    function_name: Option<String>,
}

impl<A> GatewayRuntime<A>
where
    A: Action,
    A::Input: Default,
{
    /// Creates a runtime with the built-in defaults.
    pub fn new(action: A) -> Self {
        Self::with_config(action, GatebindConfig::default())
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Message overrides are installed into the global registry. If the
    /// registry already exists the overrides are dropped with a warning.
    pub fn with_config(action: A, config: GatebindConfig) -> Self {
        let registry = install_registry(&config.binding);
        let dispatcher = Dispatcher::builder(action)
            .config(config.binding.dispatch_config())
            .registry(registry)
            .build();
        Self::from_parts(dispatcher, config)
    }

    /// Loads configuration from the default locations and initializes logging.
    pub fn from_env(action: A) -> RuntimeResult<Self> {
        Self::builder(action).build()
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder(action: A) -> RuntimeBuilder<A> {
        RuntimeBuilder::new(action)
    }
}

impl<A: Action> GatewayRuntime<A> {
    /// Wraps a prebuilt dispatcher; `config` is kept for inspection only.
    pub fn from_parts(dispatcher: Dispatcher<A>, config: GatebindConfig) -> Self {
        info!(
            action = std::any::type_name::<A>(),
            bind_failure_status = ?dispatcher.bind_failure_status(),
            "Gateway runtime ready"
        );
        Self {
            dispatcher,
            config,
            function_name: None,
        }
    }

    /// Name reported in every generated [`InvocationContext`].
    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    pub fn config(&self) -> &GatebindConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher<A> {
        &self.dispatcher
    }

    /// A fresh context with a generated request id.
    pub fn new_context(&self) -> InvocationContext {
        let ctx = InvocationContext::new(Uuid::new_v4().to_string());
        match &self.function_name {
            Some(name) => ctx.function_name(name.clone()),
            None => ctx,
        }
    }

    /// Handles one typed event.
    pub async fn invoke(&self, event: &GatewayEvent, ctx: &InvocationContext) -> GatewayResponse {
        self.dispatcher.handle(event, ctx).await
    }

    /// Handles one raw JSON event and returns the encoded response.
    ///
    /// A payload that is not a gateway event yields a 500 response.
    pub async fn invoke_json(&self, raw: &str, ctx: &InvocationContext) -> String {
        let response = match serde_json::from_str::<GatewayEvent>(raw) {
            Ok(event) => self.invoke(&event, ctx).await,
            Err(e) => {
                let err = RuntimeError::MalformedEvent(e);
                error!(request_id = %ctx.request_id, error = %err, "Rejecting raw event");
                GatewayResponse::internal_error(&err.to_string())
            }
        };
        encode_response(&response)
    }

    /// Reads one JSON event per line and writes one JSON response per line.
    ///
    /// Lines are handled sequentially; blank lines are skipped. A line that is
    /// not valid UTF-8 is answered with a 500 response. Returns the number of
    /// events handled once the reader is exhausted; only IO failures abort.
    pub async fn run_lines<R, W>(&self, mut reader: R, mut writer: W) -> RuntimeResult<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        let mut handled = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            if buf.trim_ascii().is_empty() {
                continue;
            }

            let ctx = self.new_context();
            let encoded = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(line) => self.invoke_json(line.trim(), &ctx).await,
                Err(e) => {
                    let err = RuntimeError::InvalidUtf8(e);
                    error!(request_id = %ctx.request_id, error = %err, "Rejecting raw event");
                    encode_response(&GatewayResponse::internal_error(&err.to_string()))
                }
            };
            writer.write_all(encoded.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            handled += 1;
        }

        debug!(handled, "Event stream finished");
        Ok(handled)
    }
}

fn install_registry(binding: &BindingConfig) -> &'static ConstraintRegistry {
    if binding.messages.is_empty() {
        return ConstraintRegistry::global();
    }
    match ConstraintRegistry::install(binding.messages.clone()) {
        Ok(registry) => registry,
        Err(e) => {
            warn!(error = %e, "Message overrides ignored");
            ConstraintRegistry::global()
        }
    }
}

fn encode_response(response: &GatewayResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        error!(error = %RuntimeError::Encode(e), "Falling back to a fixed error response");
        ENCODE_FAILURE.to_string()
    })
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for a configuration-driven [`GatewayRuntime`].
///
/// # Example
///
/// ```rust,ignore
/// let runtime = GatewayRuntime::builder(action)
///     .config_file("config/production.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct RuntimeBuilder<A> {
    action: A,
    config_loader: ConfigLoader,
    init_logging: bool,
}

impl<A> RuntimeBuilder<A>
where
    A: Action,
    A::Input: Default,
{
    fn new(action: A) -> Self {
        Self {
            action,
            config_loader: ConfigLoader::new(),
            init_logging: true,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Enables loading environment variables (default: enabled).
    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges a base configuration below files and environment variables.
    pub fn merge(mut self, config: GatebindConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Overrides one dotted key (e.g. `"binding.bind_failure_status"`) above every source.
    pub fn set<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    /// Skips installing the global tracing subscriber.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self) -> RuntimeResult<GatewayRuntime<A>> {
        let config = self.config_loader.load()?;
        if self.init_logging {
            logging::init_from_config(&config.logging);
        }
        Ok(GatewayRuntime::with_config(self.action, config))
    }
}
