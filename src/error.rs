//! Error types for the HR workflow engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure an engine operation can report to its caller.

use thiserror::Error;

/// The main error type for the HR workflow engine.
///
/// Every operation returns this error type. No operation commits any
/// change before returning one of these.
///
/// # Example
///
/// ```
/// use hr_workflow::error::WorkflowError;
///
/// let error = WorkflowError::NotFound {
///     entity: "leave request",
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "leave request 42 not found");
/// ```
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Input was malformed or out of range.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The input field that failed validation.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A uniqueness rule would be violated.
    #[error("{field} '{value}' already exists")]
    Duplicate {
        /// The unique field (e.g. "username").
        field: &'static str,
        /// The offending value as supplied.
        value: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The surrogate key that was looked up.
        id: i64,
    },

    /// The requested transition is not legal from the current status.
    #[error("Cannot {action} {entity} {id} while it is {status}")]
    InvalidState {
        /// The kind of entity.
        entity: &'static str,
        /// The entity's key.
        id: i64,
        /// The entity's current status.
        status: String,
        /// The attempted action.
        action: &'static str,
    },

    /// Deletion is blocked by dependent records.
    #[error("{entity} {id} still has {dependents} dependent record(s)")]
    HasDependents {
        /// The kind of entity that could not be deleted.
        entity: &'static str,
        /// The entity's key.
        id: i64,
        /// How many records still reference it.
        dependents: usize,
    },

    /// The acting user is not allowed to perform the action.
    #[error("Role '{role}' may not {action}")]
    Denied {
        /// The acting user's role.
        role: String,
        /// The refused action.
        action: String,
    },

    /// The underlying store failed.
    #[error("Store error: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },

    /// Password hashing or verification failed for a reason other than a mismatch.
    #[error("Credential error: {message}")]
    Credential {
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl WorkflowError {
    /// Shorthand for a [`WorkflowError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return WorkflowError.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
