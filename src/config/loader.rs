//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the workflow
//! policy from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{WorkflowError, WorkflowResult};

use super::types::WorkflowPolicy;

/// Loads and validates the workflow policy.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── policy.yaml   # Leave limits, text limits, new-hire defaults
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_workflow::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Max leave per request: {}", loader.policy().leave.max_days_per_request);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    policy: WorkflowPolicy,
}

impl ConfigLoader {
    /// Loads `policy.yaml` from the specified directory.
    ///
    /// Returns an error if the file is missing, is not valid YAML, or holds
    /// values that make no sense (such as a zero leave limit or a tax rate
    /// outside 0 to 100).
    pub fn load<P: AsRef<Path>>(path: P) -> WorkflowResult<Self> {
        let policy_path = path.as_ref().join("policy.yaml");
        let path_str = policy_path.display().to_string();

        let content = fs::read_to_string(&policy_path).map_err(|_| {
            WorkflowError::ConfigNotFound {
                path: path_str.clone(),
            }
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            WorkflowError::ConfigParseError { message, .. } => WorkflowError::ConfigParseError {
                path: path_str,
                message,
            },
            other => other,
        })
    }

    /// Parses a policy from YAML text.
    pub fn from_yaml(content: &str) -> WorkflowResult<Self> {
        let policy: WorkflowPolicy =
            serde_yaml::from_str(content).map_err(|e| WorkflowError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Self::from_policy(policy)
    }

    /// Wraps an already-built policy after validating it.
    pub fn from_policy(policy: WorkflowPolicy) -> WorkflowResult<Self> {
        let invalid = |message: &str| WorkflowError::ConfigParseError {
            path: "policy.yaml".to_string(),
            message: message.to_string(),
        };

        if policy.leave.max_days_per_request == 0 {
            return Err(invalid("leave.max_days_per_request must be positive"));
        }
        let rate = policy.new_hire.tax_rate;
        if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
            return Err(invalid("new_hire.tax_rate must be between 0 and 100"));
        }

        Ok(Self { policy })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &WorkflowPolicy {
        &self.policy
    }
}
