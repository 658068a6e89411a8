//! Field value coercion.
//!
//! Every binding source is reduced to [`FieldValue`]s (JSON values; path and
//! query parameters become JSON strings). [`FromFieldValue`] converts a value
//! into a field's declared type, and [`AsConstraintValue`] gives the structural
//! validator a uniform read-only view of a field.
//!
//! `null` never overwrites a non-`Option` field: it keeps its zero value, which
//! lets `not_blank`/`not_null` constraints report it.

use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::{CoercionError, CoercionResult};

/// A raw value taken from one of the binding sources.
pub type FieldValue = Value;

/// Returns the JSON kind name of `value`, for error messages.
pub fn kind_name(value: &FieldValue) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Conversion from a raw field value into a declared field type.
pub trait FromFieldValue: Sized {
    /// Converts a non-null value.
    fn from_field_value(value: &FieldValue) -> CoercionResult<Self>;

    /// The value a `null` input should produce, or `None` to leave the field untouched.
    fn from_null() -> Option<Self> {
        None
    }
}

/// Assigns `value` to `slot`, honoring the `null` rule.
pub fn bind_value<T: FromFieldValue>(slot: &mut T, value: &FieldValue) -> CoercionResult<()> {
    if value.is_null() {
        if let Some(v) = T::from_null() {
            *slot = v;
        }
        return Ok(());
    }
    *slot = T::from_field_value(value)?;
    Ok(())
}

impl FromFieldValue for String {
    fn from_field_value(value: &FieldValue) -> CoercionResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(CoercionError::unexpected("string", kind_name(other))),
        }
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: &FieldValue) -> CoercionResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(CoercionError::unparseable("boolean", s.clone())),
            },
            other => Err(CoercionError::unexpected("boolean", kind_name(other))),
        }
    }
}

macro_rules! impl_from_field_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromFieldValue for $ty {
                fn from_field_value(value: &FieldValue) -> CoercionResult<Self> {
                    const EXPECTED: &str = stringify!($ty);
                    match value {
                        Value::Number(n) => n
                            .as_i64()
                            .and_then(|v| <$ty>::try_from(v).ok())
                            .or_else(|| n.as_u64().and_then(|v| <$ty>::try_from(v).ok()))
                            .ok_or_else(|| CoercionError::unparseable(EXPECTED, n.to_string())),
                        Value::String(s) => s
                            .trim()
                            .parse::<$ty>()
                            .map_err(|_| CoercionError::unparseable(EXPECTED, s.clone())),
                        other => Err(CoercionError::unexpected(EXPECTED, kind_name(other))),
                    }
                }
            }
        )*
    };
}

impl_from_field_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

macro_rules! impl_from_field_value_float {
    ($($ty:ty),*) => {
        $(
            impl FromFieldValue for $ty {
                fn from_field_value(value: &FieldValue) -> CoercionResult<Self> {
                    const EXPECTED: &str = stringify!($ty);
                    match value {
                        Value::Number(n) => n
                            .as_f64()
                            .map(|v| v as $ty)
                            .ok_or_else(|| CoercionError::unparseable(EXPECTED, n.to_string())),
                        Value::String(s) => s
                            .trim()
                            .parse::<$ty>()
                            .map_err(|_| CoercionError::unparseable(EXPECTED, s.clone())),
                        other => Err(CoercionError::unexpected(EXPECTED, kind_name(other))),
                    }
                }
            }
        )*
    };
}

impl_from_field_value_float!(f32, f64);

/// Dates bind from ISO `YYYY-MM-DD` strings.
impl FromFieldValue for Date {
    fn from_field_value(value: &FieldValue) -> CoercionResult<Self> {
        let format = format_description!("[year]-[month]-[day]");
        match value {
            Value::String(s) => Date::parse(s.trim(), &format)
                .map_err(|_| CoercionError::unparseable("date", s.clone())),
            other => Err(CoercionError::unexpected("date", kind_name(other))),
        }
    }
}

/// Timestamps bind from RFC 3339 strings.
impl FromFieldValue for OffsetDateTime {
    fn from_field_value(value: &FieldValue) -> CoercionResult<Self> {
        match value {
            Value::String(s) => OffsetDateTime::parse(s.trim(), &Rfc3339)
                .map_err(|_| CoercionError::unparseable("timestamp", s.clone())),
            other => Err(CoercionError::unexpected("timestamp", kind_name(other))),
        }
    }
}

impl<T: FromFieldValue> FromFieldValue for Option<T> {
    fn from_field_value(value: &FieldValue) -> CoercionResult<Self> {
        T::from_field_value(value).map(Some)
    }

    fn from_null() -> Option<Self> {
        Some(None)
    }
}

// =============================================================================
// Constraint view
// =============================================================================

/// A read-only view of a field value, as seen by constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintValue<'a> {
    /// An `Option` field holding `None`.
    Absent,
    Text(&'a str),
    Integer(i128),
    Float(f64),
    Bool(bool),
    /// Any other present value (dates, timestamps).
    Other,
}

/// Exposes a field to the structural validator.
pub trait AsConstraintValue {
    fn as_constraint_value(&self) -> ConstraintValue<'_>;
}

impl AsConstraintValue for String {
    fn as_constraint_value(&self) -> ConstraintValue<'_> {
        ConstraintValue::Text(self)
    }
}

impl AsConstraintValue for bool {
    fn as_constraint_value(&self) -> ConstraintValue<'_> {
        ConstraintValue::Bool(*self)
    }
}

macro_rules! impl_as_constraint_value {
    ($variant:ident as $cast:ty: $($ty:ty),*) => {
        $(
            impl AsConstraintValue for $ty {
                fn as_constraint_value(&self) -> ConstraintValue<'_> {
                    ConstraintValue::$variant(*self as $cast)
                }
            }
        )*
    };
}

impl_as_constraint_value!(Integer as i128: i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);
impl_as_constraint_value!(Float as f64: f32, f64);

impl AsConstraintValue for Date {
    fn as_constraint_value(&self) -> ConstraintValue<'_> {
        ConstraintValue::Other
    }
}

impl AsConstraintValue for OffsetDateTime {
    fn as_constraint_value(&self) -> ConstraintValue<'_> {
        ConstraintValue::Other
    }
}

impl<T: AsConstraintValue> AsConstraintValue for Option<T> {
    fn as_constraint_value(&self) -> ConstraintValue<'_> {
        match self {
            Some(v) => v.as_constraint_value(),
            None => ConstraintValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_accepts_scalars() {
        assert_eq!(String::from_field_value(&json!("a")).unwrap(), "a");
        assert_eq!(String::from_field_value(&json!(12)).unwrap(), "12");
        assert_eq!(String::from_field_value(&json!(true)).unwrap(), "true");
        assert!(String::from_field_value(&json!([1])).is_err());
    }

    #[test]
    fn test_integers_parse_strings_and_check_range() {
        assert_eq!(i32::from_field_value(&json!("42")).unwrap(), 42);
        assert_eq!(u8::from_field_value(&json!(255)).unwrap(), 255);
        assert!(u8::from_field_value(&json!(256)).is_err());
        assert!(u32::from_field_value(&json!(-1)).is_err());
        assert!(i64::from_field_value(&json!("4x")).is_err());
    }

    #[test]
    fn test_null_keeps_zero_value_but_clears_option() {
        let mut name = String::from("kept");
        bind_value(&mut name, &Value::Null).unwrap();
        assert_eq!(name, "kept");

        let mut maybe = Some(3_i32);
        bind_value(&mut maybe, &Value::Null).unwrap();
        assert_eq!(maybe, None);
    }

    #[test]
    fn test_date_parses_iso_format() {
        let date = Date::from_field_value(&json!("2019-07-01")).unwrap();
        assert_eq!(date.year(), 2019);
        assert!(Date::from_field_value(&json!("2019/07/01")).is_err());
    }

    #[test]
    fn test_bool_from_text() {
        assert!(bool::from_field_value(&json!("TRUE")).unwrap());
        assert!(!bool::from_field_value(&json!("false")).unwrap());
        assert!(bool::from_field_value(&json!("yes")).is_err());
    }

    #[test]
    fn test_option_view() {
        assert_eq!(None::<String>.as_constraint_value(), ConstraintValue::Absent);
        assert_eq!(Some(5_u16).as_constraint_value(), ConstraintValue::Integer(5));
    }
}
