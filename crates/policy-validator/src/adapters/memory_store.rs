//! In-memory policy store.
//!
//! Holds domain records in a `BTreeMap`, so every domain is due on every
//! cycle and the due set is returned in name order. Also serves as the
//! update hook target for MTA-STS reconciliation.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::{Domain, StoreError, UpdateError};
use crate::ports::{DomainPolicyStore, PolicyUpdater};

/// Policy store backed by process memory.
#[derive(Default)]
pub struct InMemoryPolicyStore {
    domains: RwLock<BTreeMap<String, Domain>>,
}

impl InMemoryPolicyStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `domains`.
    pub fn with_domains(domains: impl IntoIterator<Item = Domain>) -> Self {
        let store = Self::new();
        for domain in domains {
            store.insert(domain);
        }
        store
    }

    /// Insert or replace a record.
    pub fn insert(&self, domain: Domain) {
        self.domains.write().insert(domain.name.clone(), domain);
    }

    /// Remove a record.
    pub fn remove(&self, name: &str) -> Option<Domain> {
        self.domains.write().remove(name)
    }

    /// Current record for `name`.
    pub fn get(&self, name: &str) -> Option<Domain> {
        self.domains.read().get(name).cloned()
    }

    /// Number of stored domains.
    pub fn len(&self) -> usize {
        self.domains.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.domains.read().is_empty()
    }
}

#[async_trait]
impl DomainPolicyStore for InMemoryPolicyStore {
    async fn domains_to_validate(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.domains.read().keys().cloned().collect())
    }

    async fn get_domain(&self, name: &str) -> Result<Domain, StoreError> {
        self.get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}

#[async_trait]
impl PolicyUpdater for InMemoryPolicyStore {
    async fn update_policy(&self, domain: &Domain) -> Result<(), UpdateError> {
        let mut domains = self.domains.write();
        match domains.get_mut(&domain.name) {
            Some(stored) => {
                *stored = domain.clone();
                debug!(domain = %domain.name, "Stored policy replaced");
                Ok(())
            }
            None => Err(StoreError::NotFound(domain.name.clone()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MtaStsPolicy, PolicyMode};

    #[tokio::test]
    async fn test_due_set_is_name_ordered() {
        let store = InMemoryPolicyStore::with_domains([
            Domain::new("b.example", vec![]),
            Domain::new("a.example", vec![]),
        ]);

        assert_eq!(
            store.domains_to_validate().await.unwrap(),
            vec!["a.example".to_string(), "b.example".to_string()]
        );
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_domain() {
        let store = InMemoryPolicyStore::new();
        assert!(store.is_empty());
        assert_eq!(
            store.get_domain("nope.example").await,
            Err(StoreError::NotFound("nope.example".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_replaces_existing_record() {
        let old = MtaStsPolicy::new(PolicyMode::Testing, vec!["mx.example.com".to_string()], 86400);
        let new = MtaStsPolicy::new(PolicyMode::Enforce, vec!["mx.example.com".to_string()], 86400);
        let store = InMemoryPolicyStore::with_domains([Domain::with_mta_sts("example.com", old)]);

        let updated = store.get("example.com").unwrap().with_observed_policy(Some(&new));
        store.update_policy(&updated).await.unwrap();
        // Duplicate invocation is harmless.
        store.update_policy(&updated).await.unwrap();

        assert_eq!(store.get("example.com").unwrap().policy, Some(new));
    }

    #[tokio::test]
    async fn test_update_of_removed_domain_fails() {
        let store = InMemoryPolicyStore::with_domains([Domain::new("example.com", vec![])]);
        let domain = store.remove("example.com").unwrap();

        let err = store.update_policy(&domain).await.unwrap_err();
        assert!(matches!(err, UpdateError::Store(StoreError::NotFound(_))));
    }
}
