// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The convergence pass: one stateless run that makes the set of copies in
//! the cluster match the source secret's target annotation.

use crate::config::Config;
use crate::constants::{annotations, labels, MAX_CONCURRENT_COPIES};
use crate::error::Result;
use crate::store::SecretStore;
use crate::sync::diff::{
    materialize_copy, origin_annotation_value, origin_label_value, plan_copy, CopyAction,
};
use crate::sync::targets::{resolve_targets, TargetSpec};
use futures::{stream, StreamExt, TryStreamExt};
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Why a pass ended without touching the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The secret is not in the source namespace
    OutOfScope,
    /// The source secret no longer exists; copies are left in place
    SourceDeleted,
    /// The source secret carries no target annotation
    NoMarker,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OutOfScope => write!(f, "out-of-scope"),
            SkipReason::SourceDeleted => write!(f, "source-deleted"),
            SkipReason::NoMarker => write!(f, "no-marker"),
        }
    }
}

/// Result of a successful convergence pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    /// Converged; re-check after the given interval to catch external drift
    Converged { requeue_after: Duration },
}

/// Run one convergence pass for the secret identified by namespace and name.
///
/// Every invocation recomputes desired state from the live cluster, so a
/// pass is idempotent and safe to re-run however often events are
/// redelivered. Any store failure aborts the pass; the next delivery or the
/// periodic requeue repairs whatever was left pending.
pub async fn converge<S: SecretStore>(
    store: &S,
    config: &Config,
    namespace: &str,
    name: &str,
) -> Result<Outcome> {
    if namespace != config.source_namespace {
        return Ok(Outcome::Skipped(SkipReason::OutOfScope));
    }

    let Some(source) = store.get_secret(namespace, name).await? else {
        // Copies are intentionally not cleaned up when the source goes away
        info!("Source secret {}/{} not found (deleted)", namespace, name);
        return Ok(Outcome::Skipped(SkipReason::SourceDeleted));
    };

    let Some(marker) = source
        .metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(annotations::TARGET_NAMESPACES))
        .cloned()
    else {
        debug!("Secret {}/{} has no target annotation, skipping", namespace, name);
        return Ok(Outcome::Skipped(SkipReason::NoMarker));
    };

    let desired: Vec<String> = match resolve_targets(&marker, &config.source_namespace) {
        TargetSpec::AllNamespaces => store
            .list_namespaces()
            .await?
            .into_iter()
            .filter(|ns| ns != &config.source_namespace)
            .collect(),
        TargetSpec::Explicit(targets) => targets,
    };

    let origin_label = origin_label_value(&config.source_namespace, name);
    let origin_annotation = origin_annotation_value(&config.source_namespace, name);

    info!(
        "Reconciling secret {}/{} into {} target namespace(s)",
        namespace,
        name,
        desired.len()
    );

    // Copy writes for distinct namespaces are independent; fan them out with
    // bounded parallelism. The first failure aborts the whole pass.
    let mut copy_futures = Vec::with_capacity(desired.len());
    for target in &desired {
        copy_futures.push(ensure_copy(
            store,
            &source,
            target,
            &origin_label,
            &origin_annotation,
        ));
    }
    stream::iter(copy_futures)
        .buffer_unordered(MAX_CONCURRENT_COPIES)
        .try_collect::<Vec<()>>()
        .await?;

    // Cleanup lists by tracking label only after every copy write has
    // landed, so a copy created in this pass is never mistaken for stale.
    let tracked = store
        .list_labeled_secrets(labels::COPIED_FROM, &origin_label)
        .await?;
    for copy in tracked {
        let copy_namespace = copy.namespace().unwrap_or_default();
        if copy_namespace == config.source_namespace
            || desired.iter().any(|d| d == &copy_namespace)
        {
            continue;
        }
        store.delete_secret(&copy_namespace, &copy.name_any()).await?;
        info!(
            "Deleted copy {}/{} no longer desired",
            copy_namespace,
            copy.name_any()
        );
    }

    Ok(Outcome::Converged {
        requeue_after: config.requeue_after(),
    })
}

/// Bring the copy in one target namespace up to date with the source
async fn ensure_copy<S: SecretStore>(
    store: &S,
    source: &Secret,
    target_namespace: &str,
    origin_label: &str,
    origin_annotation: &str,
) -> Result<()> {
    let name = source.name_any();
    let existing = store.get_secret(target_namespace, &name).await?;

    match plan_copy(existing.as_ref(), source, origin_label, origin_annotation) {
        CopyAction::Create => {
            let copy = materialize_copy(None, source, target_namespace, origin_label, origin_annotation);
            store.create_secret(&copy).await?;
            info!("Created copy {}/{}", target_namespace, name);
        }
        CopyAction::Update => {
            let copy = materialize_copy(
                existing.as_ref(),
                source,
                target_namespace,
                origin_label,
                origin_annotation,
            );
            store.update_secret(&copy).await?;
            info!("Updated copy {}/{}", target_namespace, name);
        }
        CopyAction::Noop => {
            debug!("Copy {}/{} already up-to-date", target_namespace, name);
        }
    }

    Ok(())
}
