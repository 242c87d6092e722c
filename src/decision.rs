use crate::finding::{DependencyFinding, Severity};
use crate::identity::ResourceId;

/// Outcome of combining classifier and cascade output for one deletion attempt
#[derive(Clone, Debug)]
pub struct DeletionDecision {
    /// Deletion must not proceed without an explicit force override
    pub blocking: bool,
    pub has_warnings: bool,
    pub findings: Vec<DependencyFinding>,
    pub cascading: Vec<DependencyFinding>,
}

/// `blocking` iff an error-severity finding exists and the caller did not
/// force; forced deletions still surface every finding for information
pub fn decide(
    findings: Vec<DependencyFinding>,
    cascading: Vec<DependencyFinding>,
    force: bool,
) -> DeletionDecision {
    let has_errors = findings.iter().any(|f| f.severity == Severity::Error);
    let has_warnings =
        findings.iter().any(|f| f.severity == Severity::Warning) || !cascading.is_empty();
    DeletionDecision {
        blocking: has_errors && !force,
        has_warnings,
        findings,
        cascading,
    }
}

/// Mutually exclusive presentation states for the confirmation dialog
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptState {
    /// Confirm disabled, message explains why and names the force escape hatch
    Blocked,
    /// Confirm enabled, dependency and cascade lists rendered as advisory
    Warn,
    /// Plain "are you sure" with no dependency detail
    Clean,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Structured confirmation content; rendering is the caller's business
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub sections: Vec<PromptSection>,
    pub confirm_enabled: bool,
    /// A force override exists and would let this deletion proceed
    pub force_available: bool,
}

impl DeletionDecision {
    pub fn state(&self) -> PromptState {
        if self.blocking {
            PromptState::Blocked
        } else if self.has_warnings || !self.findings.is_empty() {
            PromptState::Warn
        } else {
            PromptState::Clean
        }
    }

    pub fn prompt(&self, target: &ResourceId) -> Prompt {
        let state = self.state();
        let title = match state {
            PromptState::Blocked => format!("Cannot delete {}", target),
            PromptState::Warn | PromptState::Clean => format!("Delete {}?", target),
        };

        let mut sections = Vec::new();
        if !self.findings.is_empty() {
            let heading = match state {
                PromptState::Blocked => "Blocked by".to_owned(),
                _ => "Dependent resources".to_owned(),
            };
            sections.push(PromptSection {
                heading,
                lines: self.findings.iter().map(|f| f.to_string()).collect(),
            });
        }
        if !self.cascading.is_empty() {
            sections.push(PromptSection {
                heading: "Will also be deleted".to_owned(),
                lines: self.cascading.iter().map(|f| f.to_string()).collect(),
            });
        }
        if state == PromptState::Blocked {
            sections.push(PromptSection {
                heading: "Resolution".to_owned(),
                lines: vec![
                    "Remove the dependent resources first, or force the deletion to proceed anyway."
                        .to_owned(),
                ],
            });
        }

        Prompt {
            title,
            sections,
            confirm_enabled: state != PromptState::Blocked,
            force_available: state == PromptState::Blocked,
        }
    }
}
