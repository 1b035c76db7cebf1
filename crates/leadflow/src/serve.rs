// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `serve` subcommand: wires storage, the generative backend, the chat
//! engine, optional simulated signal producers, and the HTTP gateway, then
//! runs until interrupted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use leadflow_agent::{ChatEngine, signal};
use leadflow_config::model::LeadflowConfig;
use leadflow_core::{Adapter, GenerativeBackend, LeadflowError, SignalStore};
use leadflow_gateway::{GatewayState, ServerConfig, start_server};
use leadflow_openai::OpenAiBackend;
use leadflow_storage::SqliteSignalStore;

pub async fn run(config: LeadflowConfig) -> Result<(), LeadflowError> {
    let store = Arc::new(SqliteSignalStore::new(config.storage.clone()));
    store.initialize().await?;
    info!(path = %config.storage.database_path, "signal store ready");

    let backend = Arc::new(OpenAiBackend::from_config(&config.provider)?);
    let engine = Arc::new(ChatEngine::new(
        Arc::clone(&store) as Arc<dyn SignalStore>,
        backend as Arc<dyn GenerativeBackend>,
        &config,
    ));

    let cancel = CancellationToken::new();

    if config.engagement.simulate {
        signal::spawn_simulated_producers(
            Arc::clone(&engine),
            Arc::clone(&store) as Arc<dyn SignalStore>,
            Duration::from_secs(config.engagement.sample_interval_secs),
            cancel.child_token(),
        );
    }

    let server_handle = if config.gateway.enabled {
        let server_config = ServerConfig {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
        };
        let state = GatewayState {
            engine: Arc::clone(&engine),
            started: Instant::now(),
        };
        Some(tokio::spawn(async move {
            start_server(&server_config, state).await
        }))
    } else {
        warn!("gateway disabled; serving signal ingestion only");
        None
    };

    // Run until ctrl-c, or until the gateway dies on its own.
    match server_handle {
        Some(handle) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested");
                }
                result = handle => {
                    match result {
                        Ok(Err(e)) => {
                            cancel.cancel();
                            store.shutdown().await.ok();
                            return Err(e);
                        }
                        Ok(Ok(())) => info!("gateway stopped"),
                        Err(e) => {
                            cancel.cancel();
                            store.shutdown().await.ok();
                            return Err(LeadflowError::Internal(format!(
                                "gateway task panicked: {e}"
                            )));
                        }
                    }
                }
            }
        }
        None => {
            tokio::signal::ctrl_c().await.map_err(|e| {
                LeadflowError::Internal(format!("failed to listen for ctrl-c: {e}"))
            })?;
            info!("shutdown requested");
        }
    }

    cancel.cancel();
    store.shutdown().await?;
    info!("leadflow stopped");
    Ok(())
}
