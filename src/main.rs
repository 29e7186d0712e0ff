// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::{info, warn};

use secret_courier::config::Config;
use secret_courier::reconcilers::SecretReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting secret-courier operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: source_namespace={} requeue_secs={}",
        config.source_namespace, config.requeue_secs
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let reconciler = SecretReconciler::new(client, config);

    info!("Starting reconciler...");
    reconciler.run().await?;

    // This should never be reached as the reconciler runs forever
    warn!("Reconciler stopped unexpectedly");
    Ok(())
}
