//! Capability table: role tag → identities holding it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::Identity;

/// Role grants and the guard every mutating operation starts with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationRegistry {
    grants: BTreeMap<Role, BTreeSet<Identity>>,
}

impl AuthorizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_role(&self, role: Role, identity: Identity) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|holders| holders.contains(&identity))
    }

    /// Fail with [`CoreError::Unauthorized`] unless `caller` holds `role`.
    pub fn require_role(&self, role: Role, caller: Identity) -> Result<(), CoreError> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(CoreError::Unauthorized { role, caller })
        }
    }

    /// Record a grant. Returns `false` when the identity already held it.
    pub fn grant(&mut self, role: Role, identity: Identity) -> bool {
        self.grants.entry(role).or_default().insert(identity)
    }

    /// Every `(role, identity)` pair, ordered by role then identity.
    pub fn grants(&self) -> impl Iterator<Item = (Role, Identity)> + '_ {
        self.grants
            .iter()
            .flat_map(|(role, holders)| holders.iter().map(move |id| (*role, *id)))
    }
}

impl FromIterator<(Role, Identity)> for AuthorizationRegistry {
    fn from_iter<I: IntoIterator<Item = (Role, Identity)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (role, identity) in iter {
            registry.grant(role, identity);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn guard_rejects_identities_without_the_role() {
        let mut registry = AuthorizationRegistry::new();
        registry.grant(Role::Admin, 1);

        assert!(registry.require_role(Role::Admin, 1).is_ok());
        assert_matches!(
            registry.require_role(Role::Admin, 2),
            Err(CoreError::Unauthorized { role: Role::Admin, caller: 2 })
        );
        assert_matches!(
            registry.require_role(Role::Pauser, 1),
            Err(CoreError::Unauthorized { role: Role::Pauser, .. })
        );
    }

    #[test]
    fn repeated_grant_reports_no_change() {
        let mut registry = AuthorizationRegistry::new();
        assert!(registry.grant(Role::Pauser, 3));
        assert!(!registry.grant(Role::Pauser, 3));
        assert_eq!(registry.grants().collect::<Vec<_>>(), vec![(Role::Pauser, 3)]);
    }

    #[test]
    fn collects_from_grant_pairs() {
        let registry: AuthorizationRegistry =
            [(Role::Admin, 1), (Role::SuperAdmin, 1), (Role::Admin, 2)]
                .into_iter()
                .collect();
        assert!(registry.has_role(Role::SuperAdmin, 1));
        assert!(registry.has_role(Role::Admin, 2));
        assert!(!registry.has_role(Role::SuperAdmin, 2));
    }
}
