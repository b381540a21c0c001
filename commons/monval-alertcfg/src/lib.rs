//! Alertmanager configuration patching.
//!
//! The routing configuration lives as YAML inside a cluster secret. The
//! functions here decode it, upsert one receiver or one child route, and
//! encode it again while keeping every unrelated key intact.

pub mod document;
pub mod error;
pub mod patcher;

pub use document::AlertConfigDocument;
pub use error::{DecodeError, PatchError, StructuralEditError};
pub use patcher::{ConfigPatcher, RouteTemplate};
