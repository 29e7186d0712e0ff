// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::constants::{DEFAULT_REQUEUE_SECS, DEFAULT_SOURCE_NAMESPACE};

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace whose secrets are eligible for copying
    pub source_namespace: String,
    /// Interval between periodic re-reconciliations of a converged secret
    pub requeue_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let source_namespace = env::var("SOURCE_NAMESPACE")
            .unwrap_or_else(|_| DEFAULT_SOURCE_NAMESPACE.to_string());
        let requeue_secs = match env::var("REQUEUE_SECONDS") {
            Ok(v) => v
                .parse()
                .context("REQUEUE_SECONDS must be an integer number of seconds")?,
            Err(_) => DEFAULT_REQUEUE_SECS,
        };

        Ok(Config {
            source_namespace,
            requeue_secs,
        })
    }

    pub fn requeue_after(&self) -> Duration {
        Duration::from_secs(self.requeue_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_namespace: DEFAULT_SOURCE_NAMESPACE.to_string(),
            requeue_secs: DEFAULT_REQUEUE_SECS,
        }
    }
}
