//! Pre-flight dependency analysis for cluster resource deletion.
//!
//! Given a resource a user wants to delete and a snapshot of resources from
//! the same scope, this crate finds what still mounts, references or is owned
//! by the target, grades each relationship, and decides whether the deletion
//! may proceed, needs a warning, or must be blocked until explicitly forced.
//!
//! The analysis itself ([`classify_dependencies`],
//! [`resolve_cascading_deletions`], [`decide`]) is pure and synchronous; all
//! I/O sits behind the [`RelatedLister`] collaborator driven by
//! [`DeleteWorkflow`].

mod cascade;
mod classify;
mod decision;
mod error;
mod finding;
mod identity;
pub mod list;
mod workflow;

pub use cascade::{resolve_cascading_deletions, resolve_cascading_with_depth, DEFAULT_OWNER_DEPTH};
pub use classify::classify_dependencies;
pub use decision::{decide, DeletionDecision, Prompt, PromptSection, PromptState};
pub use error::{Error, Result};
pub use finding::{DependencyFinding, RelationKind, Severity};
pub use identity::ResourceId;
pub use workflow::{AnalyzeOpts, Canceller, DeleteWorkflow, Outcome, RelatedLister};
