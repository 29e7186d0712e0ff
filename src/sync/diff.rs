// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pure decision logic: does a copy need a write, and what body to write.

use crate::constants::{annotations, labels};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// What the driver should do for one target namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAction {
    Create,
    Update,
    Noop,
}

/// Canonical tracking label value for a source secret (`<namespace>-<name>`)
pub fn origin_label_value(source_namespace: &str, name: &str) -> String {
    format!("{}-{}", source_namespace, name)
}

/// Canonical tracking annotation value for a source secret (`<namespace>/<name>`)
pub fn origin_annotation_value(source_namespace: &str, name: &str) -> String {
    format!("{}/{}", source_namespace, name)
}

/// Decide whether the copy at a target namespace needs a write.
///
/// A write is needed when the copy is absent, when its type or data diverge
/// from the source, or when its tracking metadata is missing or stale (the
/// tracking label and annotation self-heal even if the data matches).
pub fn plan_copy(
    existing: Option<&Secret>,
    source: &Secret,
    origin_label: &str,
    origin_annotation: &str,
) -> CopyAction {
    let Some(existing) = existing else {
        return CopyAction::Create;
    };

    if existing.type_ != source.type_ {
        return CopyAction::Update;
    }
    if !data_matches(existing.data.as_ref(), source.data.as_ref()) {
        return CopyAction::Update;
    }

    let label = existing
        .metadata
        .labels
        .as_ref()
        .and_then(|l| l.get(labels::COPIED_FROM));
    if label.map(String::as_str) != Some(origin_label) {
        return CopyAction::Update;
    }

    let annotation = existing
        .metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(annotations::ORIGIN));
    if annotation.map(String::as_str) != Some(origin_annotation) {
        return CopyAction::Update;
    }

    CopyAction::Noop
}

/// Build the exact copy body to write to a target namespace.
///
/// Type and data are taken wholesale from the source (never merged), and the
/// tracking label and annotation are set. For an update the fetched copy is
/// the starting point so its resourceVersion and unrelated metadata survive
/// the replace; for a create the body carries only name, namespace, and
/// tracking metadata.
pub fn materialize_copy(
    existing: Option<&Secret>,
    source: &Secret,
    target_namespace: &str,
    origin_label: &str,
    origin_annotation: &str,
) -> Secret {
    let mut copy = match existing {
        Some(existing) => existing.clone(),
        None => Secret {
            metadata: ObjectMeta {
                name: source.metadata.name.clone(),
                namespace: Some(target_namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        },
    };

    copy.type_ = source.type_.clone();
    copy.data = source.data.clone();
    copy.string_data = None;

    copy.metadata
        .labels
        .get_or_insert_with(BTreeMap::new)
        .insert(labels::COPIED_FROM.to_string(), origin_label.to_string());
    copy.metadata
        .annotations
        .get_or_insert_with(BTreeMap::new)
        .insert(annotations::ORIGIN.to_string(), origin_annotation.to_string());

    copy
}

/// Byte-for-byte data comparison; a missing map counts as empty
fn data_matches(
    a: Option<&BTreeMap<String, ByteString>>,
    b: Option<&BTreeMap<String, ByteString>>,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), None) => a.is_empty(),
        (None, Some(b)) => b.is_empty(),
        (Some(a), Some(b)) => a == b,
    }
}
