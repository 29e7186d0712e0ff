// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret reconciler - watches source-namespace Secrets and runs the
//! convergence pass for each delivered event.

use crate::config::Config;
use crate::error::{CourierError, Result};
use crate::store::KubeStore;
use crate::sync::{converge, Outcome};
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub struct SecretReconciler {
    client: Client,
    store: KubeStore,
    config: Config,
}

impl SecretReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        let store = KubeStore::new(client.clone());
        Self {
            client,
            store,
            config,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        // Watch only the source namespace; other namespaces hold copies,
        // never sources.
        let secrets: Api<Secret> =
            Api::namespaced(self.client.clone(), &self.config.source_namespace);
        let context = Arc::new(self);

        Controller::new(secrets, WatcherConfig::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled secret: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(secret: Arc<Secret>, ctx: Arc<SecretReconciler>) -> Result<Action> {
    let name = secret.name_any();
    let namespace = secret.namespace().unwrap_or_default();

    debug!("Reconciling secret: {}/{}", namespace, name);

    match converge(&ctx.store, &ctx.config, &namespace, &name).await? {
        Outcome::Skipped(reason) => {
            debug!("Skipping secret {}/{}: {}", namespace, name, reason);
            Ok(Action::await_change())
        }
        Outcome::Converged { requeue_after } => {
            // Periodic re-reconciliation catches missed events and drift
            Ok(Action::requeue(requeue_after))
        }
    }
}

fn error_policy(
    _secret: Arc<Secret>,
    error: &CourierError,
    _ctx: Arc<SecretReconciler>,
) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(60))
}
