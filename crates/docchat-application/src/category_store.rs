//! CategoryStore - client-side cache of categories and their documents.
//!
//! The backend is the source of truth. Creation and deletion are
//! confirm-then-apply; uploads flip `is_uploading` before the remote call and
//! clear it when the call settles. Every confirmed mutation is mirrored to the
//! persisted snapshot, best effort.

use std::sync::Arc;

use chrono::Utc;
use docchat_core::category::{Category, Document};
use docchat_core::error::{DocChatError, Result};
use docchat_core::gateway::{DocumentUpload, RemoteGateway};
use docchat_core::observable::{Observable, Subscription};
use docchat_core::persistence::PersistenceAdapter;

/// Where the state published by `load()` or `refresh()` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Restored from the local snapshot.
    Snapshot,
    /// Fetched from the backend and written to the snapshot.
    Remote,
    /// The backend could not be reached; an empty list was published.
    Unavailable,
}

/// Owns the authoritative client-side category list.
pub struct CategoryStore {
    categories: Observable<Vec<Category>>,
    gateway: Arc<dyn RemoteGateway>,
    persistence: Arc<dyn PersistenceAdapter>,
    storage_key: String,
}

impl CategoryStore {
    /// Creates an empty store. Call [`CategoryStore::load`] before use, or use
    /// [`CategoryStore::open`].
    ///
    /// # Arguments
    ///
    /// * `gateway` - Backend used to confirm every mutation
    /// * `persistence` - Local snapshot store; this store is its only writer
    /// * `storage_key` - Key the snapshot is kept under
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        persistence: Arc<dyn PersistenceAdapter>,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            categories: Observable::new(Vec::new()),
            gateway,
            persistence,
            storage_key: storage_key.into(),
        }
    }

    /// Creates a store and runs the initial load.
    pub async fn open(
        gateway: Arc<dyn RemoteGateway>,
        persistence: Arc<dyn PersistenceAdapter>,
        storage_key: impl Into<String>,
    ) -> (Self, LoadSource) {
        let store = Self::new(gateway, persistence, storage_key);
        let source = store.load().await;
        (store, source)
    }

    /// Restores the snapshot, falling back to the backend when the snapshot is
    /// missing, unreadable or corrupted.
    pub async fn load(&self) -> LoadSource {
        match self.read_snapshot().await {
            Ok(Some(mut categories)) => {
                // An upload cannot survive a restart.
                for category in &mut categories {
                    category.is_uploading = false;
                }
                tracing::debug!(
                    "[CategoryStore] Restored {} categories from snapshot",
                    categories.len()
                );
                self.categories.publish(categories);
                LoadSource::Snapshot
            }
            Ok(None) => {
                tracing::debug!("[CategoryStore] No snapshot, fetching from backend");
                self.refresh().await
            }
            Err(err) => {
                tracing::warn!(
                    "[CategoryStore] Snapshot unusable, fetching from backend: {}",
                    err
                );
                self.refresh().await
            }
        }
    }

    /// Replaces the published list with the backend's category names.
    ///
    /// Fail-open: when the fetch fails an empty list is published and the
    /// snapshot is left as it was.
    pub async fn refresh(&self) -> LoadSource {
        match self.gateway.list_categories().await {
            Ok(names) => {
                let categories: Vec<Category> = names.into_iter().map(Category::named).collect();
                tracing::info!(
                    "[CategoryStore] Loaded {} categories from backend",
                    categories.len()
                );
                self.categories.publish(categories);
                self.persist().await;
                LoadSource::Remote
            }
            Err(err) => {
                tracing::warn!("[CategoryStore] Failed to fetch categories: {}", err);
                self.categories.publish(Vec::new());
                LoadSource::Unavailable
            }
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.get()
    }

    pub fn category(&self, category_id: &str) -> Option<Category> {
        self.categories
            .with(|list| list.iter().find(|c| c.id == category_id).cloned())
    }

    /// Subscribes to the category list; the current list is replayed first.
    pub fn subscribe(&self) -> Subscription<Vec<Category>> {
        self.categories.subscribe()
    }

    /// Creates a category on the backend, then appends it locally.
    pub async fn add_category(&self, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DocChatError::validation("Category name must not be blank"));
        }
        if self.category(name).is_some() {
            return Err(DocChatError::validation(format!(
                "Category '{name}' already exists"
            )));
        }

        self.gateway.create_category(name).await?;

        let category = Category::named(name);
        self.categories.update_if(|list| {
            if list.iter().any(|c| c.id == category.id) {
                return false;
            }
            list.push(category.clone());
            true
        });
        tracing::info!("[CategoryStore] Created category '{}'", name);
        self.persist().await;
        Ok(category)
    }

    /// Deletes a category on the backend, then removes it locally.
    pub async fn delete_category(&self, category_id: &str) -> Result<()> {
        self.require_category(category_id)?;

        self.gateway.delete_category(category_id).await?;

        self.categories.update_if(|list| {
            let before = list.len();
            list.retain(|c| c.id != category_id);
            list.len() != before
        });
        tracing::info!("[CategoryStore] Deleted category '{}'", category_id);
        self.persist().await;
        Ok(())
    }

    /// Uploads a file into a category.
    ///
    /// `is_uploading` is published as `true` before the request goes out and
    /// is cleared whichever way it settles. The document is only recorded
    /// once the backend accepts it; a re-upload of an existing file name
    /// refreshes that document's upload date.
    ///
    /// # Arguments
    ///
    /// * `category_id` - Target category; must exist locally
    /// * `bytes` - File contents
    /// * `file_name` - Becomes the document's id and name
    pub async fn upload_document(
        &self,
        category_id: &str,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<Document> {
        if file_name.trim().is_empty() {
            return Err(DocChatError::validation("File name must not be blank"));
        }
        self.require_category(category_id)?;

        self.set_uploading(category_id, true);
        tracing::debug!(
            "[CategoryStore] Uploading '{}' into '{}'",
            file_name,
            category_id
        );

        let result = self
            .gateway
            .upload_document(category_id, DocumentUpload::new(file_name, bytes))
            .await;

        match result {
            Ok(receipt) => {
                let document = Document::from_upload(file_name, Utc::now());
                self.categories.update_if(|list| {
                    let Some(category) = list.iter_mut().find(|c| c.id == category_id) else {
                        return false;
                    };
                    match category.pdfs.iter_mut().find(|d| d.id == document.id) {
                        Some(existing) => existing.upload_date = document.upload_date,
                        None => category.pdfs.push(document.clone()),
                    }
                    category.is_uploading = false;
                    true
                });
                tracing::info!(
                    "[CategoryStore] Uploaded '{}' into '{}': {}",
                    file_name,
                    category_id,
                    receipt.message
                );
                self.persist().await;
                Ok(document)
            }
            Err(err) => {
                self.set_uploading(category_id, false);
                tracing::debug!(
                    "[CategoryStore] Upload of '{}' failed: {}",
                    file_name,
                    err
                );
                Err(err)
            }
        }
    }

    /// Deletes a document on the backend, then removes it locally.
    pub async fn delete_document(&self, category_id: &str, document_id: &str) -> Result<()> {
        let category = self.require_category(category_id)?;
        if !category.has_document(document_id) {
            return Err(DocChatError::not_found("Document", document_id));
        }

        self.gateway
            .delete_document(category_id, document_id)
            .await?;

        self.categories.update_if(|list| {
            let Some(category) = list.iter_mut().find(|c| c.id == category_id) else {
                return false;
            };
            let before = category.pdfs.len();
            category.pdfs.retain(|d| d.id != document_id);
            category.pdfs.len() != before
        });
        tracing::info!(
            "[CategoryStore] Deleted document '{}' from '{}'",
            document_id,
            category_id
        );
        self.persist().await;
        Ok(())
    }

    fn require_category(&self, category_id: &str) -> Result<Category> {
        self.category(category_id)
            .ok_or_else(|| DocChatError::not_found("Category", category_id))
    }

    fn set_uploading(&self, category_id: &str, uploading: bool) {
        self.categories.update_if(|list| {
            match list.iter_mut().find(|c| c.id == category_id) {
                Some(category) if category.is_uploading != uploading => {
                    category.is_uploading = uploading;
                    true
                }
                _ => false,
            }
        });
    }

    async fn read_snapshot(&self) -> Result<Option<Vec<Category>>> {
        let Some(raw) = self.persistence.read(&self.storage_key).await? else {
            return Ok(None);
        };
        let categories = serde_json::from_str(&raw)?;
        Ok(Some(categories))
    }

    /// Mirrors the published list to the snapshot. Failures are logged only.
    async fn persist(&self) {
        let encoded = match self.categories.with(|list| serde_json::to_string(list)) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!("[CategoryStore] Failed to encode snapshot: {}", err);
                return;
            }
        };
        if let Err(err) = self.persistence.write(&self.storage_key, &encoded).await {
            tracing::warn!("[CategoryStore] Failed to write snapshot: {}", err);
        }
    }
}

#[cfg(test)]
#[path = "category_store_test.rs"]
mod tests;
