// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory secret store used by driver tests.

use crate::error::{CourierError, Result};
use crate::store::SecretStore;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    namespaces: Vec<String>,
    /// Keyed by (namespace, name)
    secrets: BTreeMap<(String, String), Secret>,
    /// Namespaces where create/update/delete fail with a store error
    failing_namespaces: HashSet<String>,
    mutations: usize,
}

/// A cluster stand-in: namespaces, secrets, a mutation counter for
/// idempotence assertions, and per-namespace write-failure injection.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(namespaces: &[&str]) -> Self {
        Self {
            inner: Mutex::new(Inner {
                namespaces: namespaces.iter().map(|ns| ns.to_string()).collect(),
                ..Default::default()
            }),
        }
    }

    pub fn insert(&self, secret: Secret) {
        let mut inner = self.inner.lock().unwrap();
        let key = (secret.namespace().unwrap_or_default(), secret.name_any());
        inner.secrets.insert(key, secret);
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<Secret> {
        let inner = self.inner.lock().unwrap();
        inner
            .secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub fn remove(&self, namespace: &str, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .secrets
            .remove(&(namespace.to_string(), name.to_string()));
    }

    /// Namespaces currently holding a secret with the given name
    pub fn namespaces_holding(&self, name: &str) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .secrets
            .keys()
            .filter(|(_, n)| n == name)
            .map(|(ns, _)| ns.clone())
            .collect()
    }

    /// Number of create/update/delete calls performed so far
    pub fn mutation_count(&self) -> usize {
        self.inner.lock().unwrap().mutations
    }

    /// Make every write in the given namespace fail
    pub fn fail_writes_in(&self, namespace: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.failing_namespaces.insert(namespace.to_string());
    }

    fn write_guard(inner: &mut Inner, namespace: &str) -> Result<()> {
        if inner.failing_namespaces.contains(namespace) {
            return Err(CourierError::StoreError(format!(
                "injected write failure in {}",
                namespace
            )));
        }
        inner.mutations += 1;
        Ok(())
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        Ok(self.get(namespace, name))
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        Ok(self.inner.lock().unwrap().namespaces.clone())
    }

    async fn list_labeled_secrets(
        &self,
        label_key: &str,
        label_value: &str,
    ) -> Result<Vec<Secret>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .secrets
            .values()
            .filter(|s| {
                s.metadata
                    .labels
                    .as_ref()
                    .and_then(|l| l.get(label_key))
                    .map(String::as_str)
                    == Some(label_value)
            })
            .cloned()
            .collect())
    }

    async fn create_secret(&self, secret: &Secret) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let key = (secret.namespace().unwrap_or_default(), secret.name_any());
        Self::write_guard(&mut inner, &key.0)?;
        inner.secrets.insert(key, secret.clone());
        Ok(())
    }

    async fn update_secret(&self, secret: &Secret) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let key = (secret.namespace().unwrap_or_default(), secret.name_any());
        Self::write_guard(&mut inner, &key.0)?;
        inner.secrets.insert(key, secret.clone());
        Ok(())
    }

    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::write_guard(&mut inner, namespace)?;
        // Deleting an absent secret succeeds, mirroring the 404 absorb
        inner
            .secrets
            .remove(&(namespace.to_string(), name.to_string()));
        Ok(())
    }
}
