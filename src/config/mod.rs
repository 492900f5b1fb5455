//! Configuration loading for the HR workflow engine.
//!
//! The workflow thresholds (leave limits, minimum text lengths, new-hire
//! defaults) live in a YAML policy file so they can be tuned per deployment.
//!
//! # Example
//!
//! ```no_run
//! use hr_workflow::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Title min length: {}", config.policy().text.grievance_title);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{LeavePolicy, NewHireDefaults, TextLimits, WorkflowPolicy};
