// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys used by secret-courier
pub mod annotations {
    /// Comma-separated list of target namespaces, set on the source secret.
    /// An empty value means "copy to every namespace".
    pub const TARGET_NAMESPACES: &str = "secret-copy/namespaces";
    /// Set on every copy, points back at the source as `<namespace>/<name>`
    pub const ORIGIN: &str = "secret-copy/origin";
}

/// Kubernetes label keys used by secret-courier
pub mod labels {
    /// Set on every copy as `<namespace>-<name>` (label values forbid `/`).
    /// Copies are discovered by listing on this label.
    pub const COPIED_FROM: &str = "secret-copy/from";
}

/// Namespace treated as the authoritative source unless overridden
pub const DEFAULT_SOURCE_NAMESPACE: &str = "admin";

/// Seconds between periodic re-reconciliations of a converged secret
pub const DEFAULT_REQUEUE_SECS: u64 = 10;

/// Upper bound on concurrent per-namespace copy operations within one pass
pub const MAX_CONCURRENT_COPIES: usize = 8;
