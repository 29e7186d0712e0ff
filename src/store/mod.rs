// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Capability interface over the object store holding secrets and namespaces.

use crate::error::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;

pub mod kubernetes;
#[cfg(test)]
pub mod memory;

pub use kubernetes::KubeStore;

/// Everything the convergence pass needs from the cluster.
///
/// Not-found on read maps to `None` and not-found on delete is absorbed as
/// success; both are expected outcomes of racing with external mutation.
/// Any other API failure propagates and fails the pass.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by namespace and name
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>>;

    /// List the names of all namespaces in the cluster
    async fn list_namespaces(&self) -> Result<Vec<String>>;

    /// List secrets cluster-wide carrying `label_key=label_value`
    async fn list_labeled_secrets(&self, label_key: &str, label_value: &str)
        -> Result<Vec<Secret>>;

    /// Create a secret in the namespace recorded in its metadata
    async fn create_secret(&self, secret: &Secret) -> Result<()>;

    /// Replace a secret in place
    async fn update_secret(&self, secret: &Secret) -> Result<()>;

    /// Delete a secret; deleting one that is already gone succeeds
    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<()>;
}
