//! The engine handle that every operation hangs off.
//!
//! Operations are grouped by concern in [`crate::workflow`],
//! [`crate::payroll`], and [`crate::management`]; each runs as a single
//! store transaction and takes the acting user explicitly.

use std::sync::{Arc, OnceLock};

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigLoader, WorkflowPolicy};
use crate::credentials::{Argon2Hasher, CredentialHasher};
use crate::error::WorkflowResult;
use crate::store::{MemoryStore, Store};

/// The HR workflow engine.
///
/// Cheap to clone; clones share the same store.
pub struct Engine<S = MemoryStore> {
    pub(crate) store: Arc<S>,
    pub(crate) hasher: Arc<dyn CredentialHasher>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) policy: WorkflowPolicy,
    decoy_hash: Arc<OnceLock<String>>,
}

impl<S> Clone for Engine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            hasher: Arc::clone(&self.hasher),
            clock: Arc::clone(&self.clock),
            policy: self.policy.clone(),
            decoy_hash: Arc::clone(&self.decoy_hash),
        }
    }
}

impl Engine<MemoryStore> {
    /// An engine over a fresh in-memory store with the system clock and
    /// Argon2 hashing.
    pub fn in_memory(config: &ConfigLoader) -> Self {
        Engine::new(
            MemoryStore::new(),
            Arc::new(Argon2Hasher),
            Arc::new(SystemClock),
            config,
        )
    }
}

impl<S: Store> Engine<S> {
    /// Assembles an engine from its collaborators.
    pub fn new(
        store: S,
        hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
        config: &ConfigLoader,
    ) -> Self {
        Self {
            store: Arc::new(store),
            hasher,
            clock,
            policy: config.policy().clone(),
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Returns a copy of this engine reading time from `clock`.
    pub fn with_clock(&self, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ..self.clone()
        }
    }

    /// The active policy.
    pub fn policy(&self) -> &WorkflowPolicy {
        &self.policy
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// A hash no password was ever stored under, verified against when a
    /// login names an unknown user so that it costs as much as a real one.
    pub(crate) fn decoy_hash(&self) -> WorkflowResult<&str> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash);
        }
        let hash = self.hasher.hash("decoy-password-never-stored")?;
        Ok(self.decoy_hash.get_or_init(|| hash))
    }
}
