//! HR Workflow Engine
//!
//! This crate keeps employee, department, and account records, runs the
//! leave-request and grievance approval workflows, and issues payslips.
//! Every operation takes the acting user explicitly, is checked against the
//! role permission table, and commits atomically against the store.

#![warn(missing_docs)]

pub mod api;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod guard;
pub mod management;
pub mod models;
pub mod payroll;
pub mod store;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use engine::Engine;
pub use error::{WorkflowError, WorkflowResult};
