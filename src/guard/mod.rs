//! Access and integrity guard.
//!
//! Every mutating operation consults these checks before touching the
//! store. The checks only return a decision; they never mutate.

mod access;
mod integrity;

pub use access::{Action, Scope, authorize, authorize_for, permits, resolve_actor};
pub use integrity::{UniqueField, ensure_deletable, ensure_unique};
