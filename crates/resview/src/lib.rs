//! Lenient, read-only views over unstructured cluster objects.
//!
//! Dependency analysis only ever looks at a handful of fields (volume specs,
//! container env sources, owner references, claim binding status). These types
//! deserialize exactly those fields from a `serde_json::Value` and default
//! everything that is absent, so a half-formed object degrades to an empty
//! view instead of an error.

mod object;
pub use object::{Meta, ObjectView, OwnerRef, Shape, Status};
mod podspec;
pub use podspec::{ClaimSource, Container, EnvFromSource, EnvVar, EnvVarSource, NameRef, SecretSource, Spec, Template, Volume};
