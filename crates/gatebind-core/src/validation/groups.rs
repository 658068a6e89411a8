//! Validation groups.
//!
//! A group is a named scope for constraints. Constraints declared without any
//! group belong to [`DEFAULT_GROUP`]. The active [`Groups`] of an invocation are
//! fixed by the action type; when none are declared only the default group
//! runs, so constraints tagged with an explicit group are skipped.

/// Group implicitly assigned to constraints that declare none.
pub const DEFAULT_GROUP: &str = "Default";

/// The set of groups active for one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Groups(Option<&'static [&'static str]>);

impl Groups {
    /// No explicit scoping: only the default group is active.
    pub const DEFAULT: Groups = Groups(None);

    /// Activates exactly the given groups. An empty slice means [`DEFAULT`](Self::DEFAULT).
    pub const fn of(groups: &'static [&'static str]) -> Self {
        if groups.is_empty() {
            Self(None)
        } else {
            Self(Some(groups))
        }
    }

    /// Returns `true` if no groups were declared.
    pub fn is_default(&self) -> bool {
        self.0.is_none()
    }

    /// The active group names; `["Default"]` when unscoped.
    pub fn names(&self) -> &'static [&'static str] {
        self.0.unwrap_or(&[DEFAULT_GROUP])
    }

    /// Returns `true` if `group` is active.
    pub fn includes(&self, group: &str) -> bool {
        self.names().contains(&group)
    }

    /// Returns `true` if a rule declaring `declared` groups should run.
    ///
    /// A rule with no declared groups belongs to [`DEFAULT_GROUP`].
    pub fn matches(&self, declared: &[&str]) -> bool {
        if declared.is_empty() {
            self.includes(DEFAULT_GROUP)
        } else {
            declared.iter().any(|g| self.includes(g))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscoped_runs_only_default_group() {
        assert!(Groups::DEFAULT.matches(&[]));
        assert!(Groups::DEFAULT.matches(&[DEFAULT_GROUP]));
        assert!(!Groups::DEFAULT.matches(&["Create"]));
        assert!(Groups::of(&[]).is_default());
        assert_eq!(Groups::DEFAULT.names(), &[DEFAULT_GROUP]);
    }

    #[test]
    fn test_scoped_matches_declared_groups() {
        let groups = Groups::of(&["Create"]);
        assert!(groups.matches(&["Create", "Update"]));
        assert!(!groups.matches(&["Update"]));
        assert!(!groups.matches(&[]));
        assert!(!groups.matches(&[DEFAULT_GROUP]));
    }

    #[test]
    fn test_default_group_covers_undeclared_rules() {
        let groups = Groups::of(&["Create", DEFAULT_GROUP]);
        assert!(groups.matches(&[]));
        assert!(groups.includes("Create"));
        assert!(!groups.includes("Update"));
    }
}
