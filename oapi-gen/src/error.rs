//! Error types for the core.

use thiserror::Error;

/// Errors raised while expanding response wrappers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// A wrapper's name template has no `%s` slot, so every model would map
    /// to the same schema name.
    #[error("Response wrapper '{wrapper}' has name template '{template}' without a %s slot")]
    MissingNameSlot { wrapper: String, template: String },
}

/// Result type for expansion.
pub type ExpandResult<T> = Result<T, ExpandError>;
