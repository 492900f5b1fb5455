//! Persistence for the HR workflow engine.
//!
//! The engine talks to storage through the [`Store`] trait: a read-only
//! view and an all-or-nothing transaction over [`Tables`]. [`MemoryStore`]
//! is the local single-process implementation.

mod table;
mod tables;

use std::sync::{PoisonError, RwLock};

use tracing::{debug, error, warn};

use crate::error::{WorkflowError, WorkflowResult};

pub use table::Table;
pub use tables::{CascadeSummary, Tables};

/// Transactional access to the relations.
///
/// Implementations must serialize transactions so that no transaction
/// observes another's partial effect, and must discard every change made
/// by a transaction whose closure returns an error.
pub trait Store: Send + Sync {
    /// Runs a read-only query against committed state.
    fn read<T, F>(&self, query: F) -> WorkflowResult<T>
    where
        F: FnOnce(&Tables) -> WorkflowResult<T>;

    /// Runs `work` as one atomic unit.
    fn transaction<T, F>(&self, work: F) -> WorkflowResult<T>
    where
        F: FnOnce(&mut Tables) -> WorkflowResult<T>;
}

/// An in-process store.
///
/// Each transaction runs against a working copy taken under the write
/// lock; the copy replaces committed state only when the work succeeds.
/// A transaction that panics leaves committed state untouched, so the
/// lock is recovered rather than left poisoned.
///
/// Taking the copy clones every table, so the cost of a write grows with
/// the total number of rows held. That suits a single local store; a
/// large deployment wants a [`Store`] backed by a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read<T, F>(&self, query: F) -> WorkflowResult<T>
    where
        F: FnOnce(&Tables) -> WorkflowResult<T>,
    {
        let tables = self.tables.read().unwrap_or_else(|poison| {
            error!("store lock poisoned by an earlier panic; recovering committed state");
            PoisonError::into_inner(poison)
        });
        query(&tables)
    }

    fn transaction<T, F>(&self, work: F) -> WorkflowResult<T>
    where
        F: FnOnce(&mut Tables) -> WorkflowResult<T>,
    {
        // A panicking transaction only ever touched its working copy.
        let mut committed = self.tables.write().unwrap_or_else(|poison| {
            error!("store lock poisoned by an earlier panic; recovering committed state");
            PoisonError::into_inner(poison)
        });
        let mut working = committed.clone();
        match work(&mut working) {
            Ok(value) => {
                *committed = working;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, Role};

    fn add_department(tables: &mut Tables, name: &str) -> i64 {
        tables
            .departments
            .insert_with(|id| Department {
                id,
                name: name.to_string(),
                description: None,
            })
            .id
    }

    #[test]
    fn test_successful_transaction_commits() {
        let store = MemoryStore::new();
        let id = store
            .transaction(|tables| Ok(add_department(tables, "Finance")))
            .unwrap();

        let name = store
            .read(|tables| Ok(tables.departments.get(id).map(|d| d.name.clone())))
            .unwrap();
        assert_eq!(name.as_deref(), Some("Finance"));
    }

    #[test]
    fn test_failed_transaction_rolls_back_everything() {
        let store = MemoryStore::new();
        let result: WorkflowResult<()> = store.transaction(|tables| {
            add_department(tables, "Finance");
            add_department(tables, "Legal");
            Err(WorkflowError::validation("name", "forced failure"))
        });
        assert!(result.is_err());

        let count = store.read(|tables| Ok(tables.departments.len())).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_store_recovers_after_panicking_transaction() {
        let store = MemoryStore::new();
        store
            .transaction(|tables| Ok(add_department(tables, "Finance")))
            .unwrap();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: WorkflowResult<()> = store.transaction(|tables| {
                add_department(tables, "Legal");
                panic!("work failed midway");
            });
        }));
        assert!(outcome.is_err());

        let names = store
            .read(|tables| Ok(tables.departments.values().map(|d| d.name.clone()).collect::<Vec<_>>()))
            .unwrap();
        assert_eq!(names, vec!["Finance".to_string()]);

        store
            .transaction(|tables| Ok(add_department(tables, "Legal")))
            .unwrap();
        assert_eq!(store.read(|tables| Ok(tables.departments.len())).unwrap(), 2);
    }

    #[test]
    fn test_roles_of_returns_every_role_of_one_account() {
        let store = MemoryStore::new();
        store
            .transaction(|tables| {
                tables.role_assignments.insert((1, Role::Trainer));
                for role in Role::ALL {
                    tables.role_assignments.insert((2, role));
                }
                tables.role_assignments.insert((3, Role::Admin));
                Ok(())
            })
            .unwrap();

        let roles = store
            .read(|tables| Ok(tables.roles_of(2).into_iter().map(|r| r.role).collect::<Vec<_>>()))
            .unwrap();
        assert_eq!(roles, Role::ALL.to_vec());
    }

    #[test]
    fn test_department_lookup_ignores_case() {
        let store = MemoryStore::new();
        store
            .transaction(|tables| Ok(add_department(tables, "Human Resources")))
            .unwrap();

        let found = store
            .read(|tables| Ok(tables.department_by_name("  human RESOURCES ").is_some()))
            .unwrap();
        assert!(found);
    }
}
