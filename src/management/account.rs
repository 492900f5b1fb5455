//! Credential checks and fine-grained role links.

use tracing::{info, warn};

use crate::engine::Engine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::guard::{Action, authorize, resolve_actor};
use crate::models::{AccountId, CurrentUser, Role, RoleAssignment};
use crate::store::{Store, Tables};

fn denied_login() -> WorkflowError {
    WorkflowError::Denied {
        role: "anonymous".to_string(),
        action: "log in with these credentials".to_string(),
    }
}

fn existing_account(tables: &Tables, account_id: AccountId) -> WorkflowResult<()> {
    match tables.accounts.get(account_id) {
        Some(_) => Ok(()),
        None => Err(WorkflowError::NotFound {
            entity: "account",
            id: account_id,
        }),
    }
}

impl<S: Store> Engine<S> {
    /// Checks a username and password and returns the identity to pass to
    /// later calls. Stamps the account's last-login time on success.
    ///
    /// Unknown usernames, wrong passwords, and inactive accounts all fail
    /// with the same [`WorkflowError::Denied`], and an unknown username
    /// still pays for one hash verification.
    pub fn authenticate(&self, username: &str, password: &str) -> WorkflowResult<CurrentUser> {
        let stored = self.store.read(|tables| {
            Ok(tables
                .account_by_username(username)
                .map(|a| (a.id, a.password_hash.clone(), a.is_active)))
        })?;

        let Some((account_id, hash, is_active)) = stored else {
            self.hasher.verify(password, self.decoy_hash()?)?;
            warn!(username, "login for unknown username");
            return Err(denied_login());
        };
        if !self.hasher.verify(password, &hash)? {
            warn!(account_id, "login with wrong password");
            return Err(denied_login());
        }
        if !is_active {
            warn!(account_id, "login to inactive account");
            return Err(denied_login());
        }

        let now = self.clock.now();
        self.store.transaction(|tables| {
            let account = tables.accounts.get_mut(account_id).ok_or_else(denied_login)?;
            account.last_login = Some(now);
            info!(account_id, "login succeeded");
            Ok(CurrentUser::from(&*account))
        })
    }

    /// The identity of an active account, as [`Engine::authenticate`] would
    /// return it.
    pub fn current_user(&self, account_id: AccountId) -> WorkflowResult<CurrentUser> {
        self.store.read(|tables| match tables.accounts.get(account_id) {
            Some(account) if account.is_active => Ok(CurrentUser::from(account)),
            _ => Err(denied_login()),
        })
    }

    /// Grants an extra role link to an account.
    pub fn assign_role(
        &self,
        user: &CurrentUser,
        account_id: AccountId,
        role: Role,
    ) -> WorkflowResult<RoleAssignment> {
        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageRoles)?;
            existing_account(tables, account_id)?;
            if !tables.role_assignments.insert((account_id, role)) {
                return Err(WorkflowError::Duplicate {
                    field: "role assignment",
                    value: format!("{} for account {}", role, account_id),
                });
            }
            info!(account_id, role = %role, granted_by = actor.account_id, "role assigned");
            Ok(RoleAssignment { account_id, role })
        })
    }

    /// Removes a role link. The link matching the account's coarse role
    /// cannot be removed.
    pub fn revoke_role(
        &self,
        user: &CurrentUser,
        account_id: AccountId,
        role: Role,
    ) -> WorkflowResult<()> {
        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageRoles)?;
            let account = tables.accounts.get(account_id).ok_or(WorkflowError::NotFound {
                entity: "account",
                id: account_id,
            })?;
            if account.role == role {
                return Err(WorkflowError::validation(
                    "role",
                    format!("{} is the account's primary role", role),
                ));
            }
            if !tables.role_assignments.remove(&(account_id, role)) {
                return Err(WorkflowError::NotFound {
                    entity: "role assignment",
                    id: account_id,
                });
            }
            info!(account_id, role = %role, revoked_by = actor.account_id, "role revoked");
            Ok(())
        })
    }

    /// Role links held by an account.
    pub fn account_roles(
        &self,
        user: &CurrentUser,
        account_id: AccountId,
    ) -> WorkflowResult<Vec<RoleAssignment>> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            if actor.account_id != account_id {
                authorize(&actor, Action::ManageRoles)?;
            }
            existing_account(tables, account_id)?;
            Ok(tables.roles_of(account_id))
        })
    }
}
