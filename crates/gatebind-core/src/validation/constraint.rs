//! Declarative constraint metadata.
//!
//! Constraints are compiled once per target type into a [`TargetDescriptor`]
//! (the derive macro keeps it in a `static OnceLock`) and never change
//! afterwards. Evaluation is pure: [`Constraint::is_satisfied_by`] only reads a
//! [`ConstraintValue`].

use super::groups::Groups;
use super::value::ConstraintValue;

/// The rule a constraint enforces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintKind {
    /// Present, and text contains at least one non-whitespace character.
    NotBlank,
    /// Present, and text is non-empty.
    NotEmpty,
    /// Present (`Option` fields only).
    NotNull,
    /// Text length in characters lies within the bounds. Absent passes.
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Numeric value lies within the bounds. Absent passes.
    Range { min: Option<i64>, max: Option<i64> },
}

impl ConstraintKind {
    /// Stable error code reported for a violation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotBlank => "NotBlank",
            Self::NotEmpty => "NotEmpty",
            Self::NotNull => "NotNull",
            Self::Length { .. } => "Length",
            Self::Range { .. } => "Range",
        }
    }

    /// Named arguments available for message interpolation.
    pub fn arguments(&self) -> Vec<(&'static str, String)> {
        fn bound<T: ToString>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "*".to_string())
        }
        match *self {
            Self::Length { min, max } => vec![("min", bound(min)), ("max", bound(max))],
            Self::Range { min, max } => vec![("min", bound(min)), ("max", bound(max))],
            _ => Vec::new(),
        }
    }

    fn check(&self, value: &ConstraintValue<'_>) -> bool {
        match (*self, value) {
            (Self::NotBlank | Self::NotEmpty | Self::NotNull, ConstraintValue::Absent) => false,
            (Self::NotBlank, ConstraintValue::Text(s)) => !s.trim().is_empty(),
            (Self::NotEmpty, ConstraintValue::Text(s)) => !s.is_empty(),
            (_, ConstraintValue::Absent) => true,
            (Self::Length { min, max }, ConstraintValue::Text(s)) => {
                let len = s.chars().count();
                min.is_none_or(|m| len >= m) && max.is_none_or(|m| len <= m)
            }
            (Self::Range { min, max }, ConstraintValue::Integer(n)) => {
                min.is_none_or(|m| *n >= i128::from(m)) && max.is_none_or(|m| *n <= i128::from(m))
            }
            (Self::Range { min, max }, ConstraintValue::Float(f)) => {
                min.is_none_or(|m| *f >= m as f64) && max.is_none_or(|m| *f <= m as f64)
            }
            _ => true,
        }
    }
}

/// A single constraint on a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    /// Message overriding the catalog default.
    pub message: Option<&'static str>,
    /// Groups this constraint belongs to; empty means the default group.
    pub groups: &'static [&'static str],
}

impl Constraint {
    pub const fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            message: None,
            groups: &[],
        }
    }

    /// Overrides the violation message.
    pub const fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    /// Puts the constraint into the given groups.
    pub const fn groups(mut self, groups: &'static [&'static str]) -> Self {
        self.groups = groups;
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns `true` if this constraint runs under `groups`.
    pub fn applies_to(&self, groups: &Groups) -> bool {
        groups.matches(self.groups)
    }

    pub fn is_satisfied_by(&self, value: &ConstraintValue<'_>) -> bool {
        self.kind.check(value)
    }
}

/// Constraints declared on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Bound key of the field.
    pub name: &'static str,
    pub constraints: Vec<Constraint>,
}

impl FieldDescriptor {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint (builder pattern).
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Compiled constraint metadata for one target type.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDescriptor {
    object_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl TargetDescriptor {
    pub fn new(object_name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            object_name,
            fields,
        }
    }

    pub fn object_name(&self) -> &'static str {
        self.object_name
    }

    /// Field descriptors, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if `name` is a bindable field.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        let c = Constraint::new(ConstraintKind::NotBlank);
        assert!(c.is_satisfied_by(&ConstraintValue::Text("x")));
        assert!(!c.is_satisfied_by(&ConstraintValue::Text("  ")));
        assert!(!c.is_satisfied_by(&ConstraintValue::Absent));
    }

    #[test]
    fn test_not_empty_allows_whitespace() {
        let c = Constraint::new(ConstraintKind::NotEmpty);
        assert!(c.is_satisfied_by(&ConstraintValue::Text(" ")));
        assert!(!c.is_satisfied_by(&ConstraintValue::Text("")));
    }

    #[test]
    fn test_length_counts_chars_and_skips_absent() {
        let c = Constraint::new(ConstraintKind::Length {
            min: Some(2),
            max: Some(3),
        });
        assert!(c.is_satisfied_by(&ConstraintValue::Text("日本")));
        assert!(!c.is_satisfied_by(&ConstraintValue::Text("a")));
        assert!(!c.is_satisfied_by(&ConstraintValue::Text("abcd")));
        assert!(c.is_satisfied_by(&ConstraintValue::Absent));
    }

    #[test]
    fn test_range_on_integers_and_floats() {
        let c = Constraint::new(ConstraintKind::Range {
            min: Some(0),
            max: Some(10),
        });
        assert!(c.is_satisfied_by(&ConstraintValue::Integer(10)));
        assert!(!c.is_satisfied_by(&ConstraintValue::Integer(-1)));
        assert!(!c.is_satisfied_by(&ConstraintValue::Float(10.5)));
    }

    #[test]
    fn test_arguments_use_star_for_open_bound() {
        let kind = ConstraintKind::Length {
            min: None,
            max: Some(5),
        };
        assert_eq!(
            kind.arguments(),
            vec![("min", "*".to_string()), ("max", "5".to_string())]
        );
    }

    #[test]
    fn test_groups_scope_constraint() {
        let c = Constraint::new(ConstraintKind::NotNull).groups(&["Create"]);
        assert!(!c.applies_to(&Groups::DEFAULT));
        assert!(Constraint::new(ConstraintKind::NotNull).applies_to(&Groups::DEFAULT));
        assert!(c.applies_to(&Groups::of(&["Create"])));
        assert!(!c.applies_to(&Groups::of(&["Update"])));
    }
}
