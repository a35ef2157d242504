//! Explicit wiring of the engine's collaborators.

use std::sync::Arc;

use anyhow::{Context, Result};
use docchat_application::{
    AssistantChat, CategorySessionManager, CategoryStore, HistoryService, LoadSource,
};
use docchat_core::config::ClientConfig;
use docchat_core::gateway::RemoteGateway;
use docchat_core::persistence::PersistenceAdapter;
use docchat_infrastructure::{
    ConfigLoader, DocChatPaths, FileKeyValueStore, HttpRemoteGateway, InMemoryKeyValueStore,
};

pub struct Services {
    pub config: ClientConfig,
    gateway: Arc<dyn RemoteGateway>,
    persistence: Arc<dyn PersistenceAdapter>,
}

impl Services {
    pub fn build(ephemeral: bool) -> Result<Self> {
        let config = ConfigLoader::new()
            .and_then(|loader| loader.load())
            .context("Failed to load configuration")?;

        let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpRemoteGateway::from_config(&config)?);

        let persistence: Arc<dyn PersistenceAdapter> = if ephemeral {
            Arc::new(InMemoryKeyValueStore::new())
        } else {
            let dir = match &config.storage_dir {
                Some(dir) => dir.clone(),
                None => DocChatPaths::state_dir()?,
            };
            tracing::debug!("[Bootstrap] Snapshot directory: {}", dir.display());
            Arc::new(FileKeyValueStore::new(dir))
        };

        tracing::debug!("[Bootstrap] Backend: {}", config.normalized_base_url());
        Ok(Self {
            config,
            gateway,
            persistence,
        })
    }

    /// Opens the category store, restoring the snapshot or fetching from the backend.
    pub async fn category_store(&self) -> CategoryStore {
        let (store, source) = CategoryStore::open(
            self.gateway.clone(),
            self.persistence.clone(),
            self.config.storage_key.clone(),
        )
        .await;
        if source == LoadSource::Unavailable {
            tracing::warn!(
                "[Bootstrap] Backend unreachable at {}",
                self.config.normalized_base_url()
            );
        }
        store
    }

    pub fn session_manager(&self) -> CategorySessionManager {
        CategorySessionManager::new(self.gateway.clone())
    }

    pub fn assistant(&self) -> AssistantChat {
        AssistantChat::new(self.gateway.clone())
    }

    pub fn history(&self) -> HistoryService {
        HistoryService::new(self.gateway.clone())
    }
}
