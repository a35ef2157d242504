use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document uploaded into a category.
///
/// `id` is unique within its owning category's `pdfs` list. Documents are
/// identified by their file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub upload_date: DateTime<Utc>,
}

impl Document {
    /// Creates the document record for a confirmed upload of `file_name`.
    pub fn from_upload(file_name: impl Into<String>, upload_date: DateTime<Utc>) -> Self {
        let file_name = file_name.into();
        Self {
            id: file_name.clone(),
            name: file_name,
            upload_date,
        }
    }
}

/// A named folder of documents.
///
/// The category id is its name: there is no rename, only delete and recreate.
/// `is_uploading` is the pending visual state while an upload is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pdfs: Vec<Document>,
    #[serde(default)]
    pub is_uploading: bool,
}

impl Category {
    /// Creates an empty category whose id equals its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            pdfs: Vec::new(),
            is_uploading: false,
        }
    }

    pub fn document(&self, document_id: &str) -> Option<&Document> {
        self.pdfs.iter().find(|doc| doc.id == document_id)
    }

    pub fn has_document(&self, document_id: &str) -> bool {
        self.document(document_id).is_some()
    }
}
