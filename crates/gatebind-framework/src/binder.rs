//! Multi-source binding into a typed target.
//!
//! Raw input arrives in up to three layers: path parameters, query parameters
//! and the JSON body. [`Sources`] keeps them apart until [`Sources::flatten`]
//! merges them with later layers overwriting earlier ones, so on a key
//! collision the body wins over the query string, which wins over the path.
//!
//! [`Binder`] then offers every merged key to the target, collects coercion
//! failures, and runs the validator passes in a fixed order:
//!
//! ```text
//! coercion ──▶ constraints (#[validate]) ──▶ Validate::validate ──▶ extra validators
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use gatebind_core::{
    BindError, BindResult, Bindable, BindingResult, Errors, FieldBinding, GatewayEvent, Groups,
    SelfValidator, Validate, Validator, kind_name,
};

use crate::registry::{ConstraintRegistry, TYPE_MISMATCH, UNKNOWN_FIELD};
use crate::validator::ConstraintValidator;

// =============================================================================
// Sources
// =============================================================================

/// Where a layer of raw input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Path,
    Query,
    Body,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
        })
    }
}

/// Ordered layers of raw key/value input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sources {
    layers: Vec<(SourceKind, Map<String, Value>)>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts path, query and body layers from an event.
    ///
    /// Fails only when the body is present but not a JSON object.
    pub fn from_event(event: &GatewayEvent) -> BindResult<Self> {
        let body = parse_body(event.body.as_deref())?;
        Ok(Self::new()
            .with(SourceKind::Path, string_map(event.path_parameters.as_ref()))
            .with(
                SourceKind::Query,
                string_map(event.query_string_parameters.as_ref()),
            )
            .with(SourceKind::Body, body))
    }

    /// Appends a layer; it overrides every layer added before it.
    pub fn with(mut self, kind: SourceKind, values: Map<String, Value>) -> Self {
        self.layers.push((kind, values));
        self
    }

    /// Total number of keys across all layers, duplicates included.
    pub fn key_count(&self) -> usize {
        self.layers.iter().map(|(_, values)| values.len()).sum()
    }

    /// Merges all layers into one mapping.
    pub fn flatten(&self) -> Map<String, Value> {
        let mut merged = Map::new();
        for (kind, values) in &self.layers {
            for (key, value) in values {
                if merged.insert(key.clone(), value.clone()).is_some() {
                    trace!(key = %key, source = %kind, "Overriding lower-precedence value");
                }
            }
        }
        merged
    }
}

fn string_map(values: Option<&HashMap<String, String>>) -> Map<String, Value> {
    values
        .into_iter()
        .flatten()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Parses a raw body into a key/value layer.
///
/// An absent, empty or `null` body yields an empty layer.
pub fn parse_body(body: Option<&str>) -> BindResult<Map<String, Value>> {
    let raw = match body.map(str::trim) {
        None | Some("") => return Ok(Map::new()),
        Some(raw) => raw,
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(values)) => Ok(values),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(BindError::malformed(format!(
            "expected a JSON object, got {}",
            kind_name(&other)
        ))),
        Err(e) => Err(BindError::malformed(e.to_string())),
    }
}

// =============================================================================
// Binder
// =============================================================================

/// Binder behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Silently drop keys the target does not declare.
    pub ignore_unknown_fields: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            ignore_unknown_fields: true,
        }
    }
}

/// Populates targets and runs validation.
#[derive(Clone)]
pub struct Binder {
    registry: &'static ConstraintRegistry,
    config: BinderConfig,
    validators: Vec<Arc<dyn Validator>>,
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("config", &self.config)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(ConstraintRegistry::global(), BinderConfig::default())
    }
}

impl Binder {
    pub fn new(registry: &'static ConstraintRegistry, config: BinderConfig) -> Self {
        Self {
            registry,
            config,
            validators: Vec::new(),
        }
    }

    /// Adds a validator run after the built-in passes.
    ///
    /// Validators that do not support the target type are skipped.
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    pub fn registry(&self) -> &'static ConstraintRegistry {
        self.registry
    }

    /// Binds an event into `target` and validates it under `groups`.
    pub fn bind<I>(
        &self,
        event: &GatewayEvent,
        target: &mut I,
        groups: &Groups,
    ) -> BindResult<BindingResult>
    where
        I: Bindable + Validate,
    {
        let sources = Sources::from_event(event)?;
        Ok(self.bind_sources(&sources, target, groups))
    }

    /// Binds already extracted sources into `target` and validates it.
    pub fn bind_sources<I>(&self, sources: &Sources, target: &mut I, groups: &Groups) -> BindingResult
    where
        I: Bindable + Validate,
    {
        let mut errors = Errors::new(I::object_name());

        for (key, value) in &sources.flatten() {
            match target.bind_field(key, value) {
                FieldBinding::Bound => {}
                FieldBinding::Unknown if self.config.ignore_unknown_fields => {
                    trace!(key = %key, "Ignoring unknown field");
                }
                FieldBinding::Unknown => {
                    let message = self.registry.render(UNKNOWN_FIELD, &[]);
                    errors.reject_value_with(key.as_str(), UNKNOWN_FIELD, message, value.clone());
                }
                FieldBinding::Rejected(e) => {
                    let message = self
                        .registry
                        .render(TYPE_MISMATCH, &[("reason", e.to_string())]);
                    errors.reject_value_with(key.as_str(), TYPE_MISMATCH, message, value.clone());
                }
            }
        }

        let type_id = TypeId::of::<I>();
        let subject: &dyn Any = &*target;
        let mut run = |validator: &dyn Validator| {
            if validator.supports(type_id) {
                validator.validate(subject, &mut errors, groups);
            }
        };
        run(&ConstraintValidator::<I>::new(self.registry));
        run(&SelfValidator::<I>::new());
        for validator in &self.validators {
            run(validator.as_ref());
        }

        let result = errors.into_result();
        debug!(
            target_type = I::object_name(),
            keys = sources.key_count(),
            errors = result.error_count(),
            "Bound request target"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatebind_core::{
        AsConstraintValue, Constraint, ConstraintKind, ConstraintValue, FieldDescriptor,
        FieldValue, TargetDescriptor, bind_value,
    };
    use serde_json::json;
    use std::sync::OnceLock;

    #[derive(Debug, Default)]
    struct Order {
        item: String,
        quantity: i32,
        note: Option<String>,
    }

    impl Bindable for Order {
        fn object_name() -> &'static str {
            "Order"
        }

        fn descriptor() -> &'static TargetDescriptor {
            static DESCRIPTOR: OnceLock<TargetDescriptor> = OnceLock::new();
            DESCRIPTOR.get_or_init(|| {
                TargetDescriptor::new(
                    "Order",
                    vec![
                        FieldDescriptor::new("item")
                            .constraint(Constraint::new(ConstraintKind::NotBlank)),
                        FieldDescriptor::new("quantity").constraint(Constraint::new(
                            ConstraintKind::Range {
                                min: Some(1),
                                max: None,
                            },
                        )),
                        FieldDescriptor::new("note"),
                    ],
                )
            })
        }

        fn bind_field(&mut self, key: &str, value: &FieldValue) -> FieldBinding {
            match key {
                "item" => FieldBinding::from_result(bind_value(&mut self.item, value)),
                "quantity" => FieldBinding::from_result(bind_value(&mut self.quantity, value)),
                "note" => FieldBinding::from_result(bind_value(&mut self.note, value)),
                _ => FieldBinding::Unknown,
            }
        }

        fn field_value(&self, key: &str) -> Option<ConstraintValue<'_>> {
            match key {
                "item" => Some(self.item.as_constraint_value()),
                "quantity" => Some(self.quantity.as_constraint_value()),
                "note" => Some(self.note.as_constraint_value()),
                _ => None,
            }
        }
    }

    impl Validate for Order {
        fn validate(&self, errors: &mut Errors, _groups: &Groups) {
            if self.item == "forbidden" {
                errors.reject_value("item", "forbidden", "item is not for sale");
            }
        }
    }

    fn bind(event: &GatewayEvent) -> (Order, BindingResult) {
        let mut order = Order::default();
        let result = Binder::default()
            .bind(event, &mut order, &Groups::DEFAULT)
            .unwrap();
        (order, result)
    }

    #[test]
    fn test_body_overrides_query_overrides_path() {
        let event = GatewayEvent::new()
            .path_param("item", "from-path")
            .path_param("quantity", "1")
            .query_param("item", "from-query")
            .query_param("quantity", "2")
            .json_body(&json!({"item": "from-body"}));
        let (order, result) = bind(&event);

        assert!(!result.has_errors());
        assert_eq!(order.item, "from-body");
        assert_eq!(order.quantity, 2);
    }

    #[test]
    fn test_empty_and_null_bodies_contribute_nothing() {
        for body in [None, Some(""), Some("   "), Some("null")] {
            assert!(parse_body(body).unwrap().is_empty());
        }
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        assert!(parse_body(Some("[1, 2]")).is_err());
        assert!(parse_body(Some("{\"item\":")).is_err());

        let event = GatewayEvent::new().body("42");
        let mut order = Order::default();
        let err = Binder::default()
            .bind(&event, &mut order, &Groups::DEFAULT)
            .unwrap_err();
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_coercion_failure_reports_type_mismatch_once() {
        let event = GatewayEvent::new().json_body(&json!({"item": "pen", "quantity": "lots"}));
        let (_, result) = bind(&event);

        let errors: Vec<_> = result.field_errors("quantity").collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, TYPE_MISMATCH);
        assert_eq!(errors[0].rejected_value, Some(json!("lots")));
    }

    #[test]
    fn test_null_clears_option_and_keeps_zero_value() {
        let event = GatewayEvent::new()
            .query_param("note", "old")
            .json_body(&json!({"item": "pen", "quantity": 3, "note": null}));
        let (order, result) = bind(&event);

        assert!(!result.has_errors());
        assert_eq!(order.note, None);

        let event = GatewayEvent::new().json_body(&json!({"item": null, "quantity": 3}));
        let (order, result) = bind(&event);
        assert_eq!(order.item, "");
        assert_eq!(result.field_error("item").unwrap().code, "NotBlank");
    }

    #[test]
    fn test_unknown_fields_policy() {
        let event = GatewayEvent::new().json_body(&json!({"item": "pen", "quantity": 1, "extra": 1}));
        let (_, result) = bind(&event);
        assert!(!result.has_errors());

        let strict = Binder::new(
            ConstraintRegistry::global(),
            BinderConfig {
                ignore_unknown_fields: false,
            },
        );
        let mut order = Order::default();
        let result = strict.bind(&event, &mut order, &Groups::DEFAULT).unwrap();
        assert_eq!(result.field_error("extra").unwrap().code, UNKNOWN_FIELD);
    }

    #[test]
    fn test_passes_run_in_order() {
        struct Audit;

        impl Validator for Audit {
            fn supports(&self, target: TypeId) -> bool {
                target == TypeId::of::<Order>()
            }

            fn validate(&self, _target: &dyn Any, errors: &mut Errors, _groups: &Groups) {
                errors.reject_value("audit", "audit", "audited");
            }
        }

        let event = GatewayEvent::new().json_body(&json!({"item": "forbidden", "quantity": 0}));
        let binder = Binder::default().with_validator(Arc::new(Audit));
        let mut order = Order::default();
        let result = binder.bind(&event, &mut order, &Groups::DEFAULT).unwrap();

        let codes: Vec<_> = result.errors().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["Range", "forbidden", "audit"]);
    }
}
