// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes-backed implementation of the secret store capability.

use crate::error::Result;
use crate::store::SecretStore;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Secret};
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, Client, ResourceExt,
};
use tracing::debug;

#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn secrets_in(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl SecretStore for KubeStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        match self.secrets_in(namespace).get(name).await {
            Ok(secret) => Ok(Some(secret)),
            Err(kube::Error::Api(err)) if err.code == 404 => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces.list(&ListParams::default()).await?;
        Ok(list.items.into_iter().map(|ns| ns.name_any()).collect())
    }

    async fn list_labeled_secrets(
        &self,
        label_key: &str,
        label_value: &str,
    ) -> Result<Vec<Secret>> {
        let secrets: Api<Secret> = Api::all(self.client.clone());
        let lp = ListParams::default().labels(&format!("{}={}", label_key, label_value));
        Ok(secrets.list(&lp).await?.items)
    }

    async fn create_secret(&self, secret: &Secret) -> Result<()> {
        let namespace = secret.namespace().unwrap_or_default();
        self.secrets_in(&namespace)
            .create(&PostParams::default(), secret)
            .await?;
        Ok(())
    }

    async fn update_secret(&self, secret: &Secret) -> Result<()> {
        let namespace = secret.namespace().unwrap_or_default();
        self.secrets_in(&namespace)
            .replace(&secret.name_any(), &PostParams::default(), secret)
            .await?;
        Ok(())
    }

    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<()> {
        match self
            .secrets_in(namespace)
            .delete(name, &DeleteParams::default())
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("Secret {}/{} already gone", namespace, name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
