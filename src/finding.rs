use std::fmt::{self, Display};

/// How a related resource is attached to the deletion target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationKind {
    /// Mounted as a volume or consumed through container environment
    Mount,
    /// Referenced without being mounted (e.g. a claim's bound volume)
    Reference,
    /// Owned by the target, directly or transitively
    Ownership,
    /// Matched by the target's label selector
    Selector,
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationKind::Mount => "mount",
            RelationKind::Reference => "reference",
            RelationKind::Ownership => "ownership",
            RelationKind::Selector => "selector",
        })
    }
}

/// `Error` is reserved for relationships where deletion breaks a currently
/// live consumer; `Warning` degrades or orphans something without breaking a
/// running workload; `Info` resolves itself (cascade deletions).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Grouping rank for output ordering: errors, then warnings, then info
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// One detected relationship between the deletion target and another resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyFinding {
    pub relation: RelationKind,
    pub related_kind: String,
    pub related_name: String,
    pub related_namespace: Option<String>,
    pub description: String,
    pub severity: Severity,
}

impl Display for DependencyFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.description)
    }
}
