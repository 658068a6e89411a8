//! Process-wide constraint registry.
//!
//! The registry holds the message catalog used to render violation messages:
//! a mapping from error code to message template. Templates may reference the
//! constraint's arguments as `{min}` / `{max}`, and binding failures as
//! `{reason}`.
//!
//! The global instance is created at most once per process, either explicitly
//! through [`ConstraintRegistry::install`] (typically from configuration at
//! startup) or lazily with the built-in defaults on first use. It is never
//! mutated afterwards.
//!
//! ```rust,ignore
//! let mut messages = HashMap::new();
//! messages.insert("NotBlank".to_string(), "is required".to_string());
//! ConstraintRegistry::install(messages)?;
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use gatebind_core::Constraint;
use tracing::debug;

use crate::error::RegistryError;

/// Code reported when a value cannot be coerced into the field type.
pub const TYPE_MISMATCH: &str = "typeMismatch";

/// Code reported for keys the target does not declare (when not ignored).
pub const UNKNOWN_FIELD: &str = "unknownField";

/// Code reported on the `body` field for a malformed body under the client-error policy.
pub const MALFORMED_BODY: &str = "malformedBody";

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("NotBlank", "must not be blank"),
    ("NotEmpty", "must not be empty"),
    ("NotNull", "must not be null"),
    ("Length", "length must be between {min} and {max}"),
    ("Range", "must be between {min} and {max}"),
    (TYPE_MISMATCH, "invalid value: {reason}"),
    (UNKNOWN_FIELD, "unknown field"),
    (MALFORMED_BODY, "request body could not be read: {reason}"),
];

static REGISTRY: OnceLock<ConstraintRegistry> = OnceLock::new();

/// Immutable message catalog shared by every invocation.
#[derive(Debug, Clone)]
pub struct ConstraintRegistry {
    messages: HashMap<String, String>,
}

impl Default for ConstraintRegistry {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl ConstraintRegistry {
    /// Creates a registry with the defaults overlaid by `overrides`.
    ///
    /// Override keys matching a built-in code case-insensitively are stored
    /// under the built-in spelling, so `notblank` overrides `NotBlank`.
    pub fn new(overrides: HashMap<String, String>) -> Self {
        let mut messages: HashMap<String, String> = DEFAULT_MESSAGES
            .iter()
            .map(|(code, msg)| ((*code).to_string(), (*msg).to_string()))
            .collect();
        for (code, message) in overrides {
            let code = DEFAULT_MESSAGES
                .iter()
                .find(|(builtin, _)| builtin.eq_ignore_ascii_case(&code))
                .map_or(code, |(builtin, _)| (*builtin).to_string());
            messages.insert(code, message);
        }
        Self { messages }
    }

    /// Returns the global registry, initializing it with defaults if needed.
    pub fn global() -> &'static ConstraintRegistry {
        REGISTRY.get_or_init(|| {
            debug!("Initializing constraint registry with default messages");
            ConstraintRegistry::default()
        })
    }

    /// Initializes the global registry with message overrides.
    ///
    /// Fails if the registry was already initialized, explicitly or lazily.
    pub fn install(
        overrides: HashMap<String, String>,
    ) -> Result<&'static ConstraintRegistry, RegistryError> {
        let mut installed = false;
        let registry = REGISTRY.get_or_init(|| {
            installed = true;
            debug!(
                overrides = overrides.len(),
                "Initializing constraint registry"
            );
            ConstraintRegistry::new(overrides)
        });
        if installed {
            Ok(registry)
        } else {
            Err(RegistryError::AlreadyInitialized)
        }
    }

    /// Returns `true` once the global registry exists.
    pub fn is_initialized() -> bool {
        REGISTRY.get().is_some()
    }

    /// The raw template for `code`, if one is registered.
    pub fn template(&self, code: &str) -> Option<&str> {
        self.messages.get(code).map(String::as_str)
    }

    /// Renders the template for `code` with `args`; unknown codes render as the code itself.
    pub fn render(&self, code: &str, args: &[(&str, String)]) -> String {
        let template = self.template(code).unwrap_or(code);
        interpolate(template, args)
    }

    /// Renders the violation message for `constraint`.
    ///
    /// A message declared on the constraint wins over the catalog.
    pub fn message_for(&self, constraint: &Constraint) -> String {
        let args = constraint.kind.arguments();
        match constraint.message {
            Some(message) => interpolate(message, &args),
            None => self.render(constraint.code(), &args),
        }
    }
}

fn interpolate(template: &str, args: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
