//! Template source port

use serde::Serialize;

use super::entry::TemplateEntry;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Presence report for the template root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateStatus {
    pub exists: bool,
    pub count: usize,
    pub files: Vec<String>,
}

/// Read access to the template tree a package is derived from
#[cfg_attr(test, automock)]
pub trait TemplateSource: Send + Sync {
    /// Verify the root is present and readable. Called on every generation.
    fn check(&self) -> Result<(), DomainError>;

    /// Enumerate every non-excluded file, depth-first, in a stable order
    fn scan(&self) -> Result<Vec<TemplateEntry>, DomainError>;

    /// Names of the immediate children of the root
    fn list_top_level(&self) -> Result<Vec<String>, DomainError>;
}
