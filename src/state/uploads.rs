//! Tracks which required documents have been attached

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The fixed set of documents an application needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentId {
    BankStatement,
    DealerInvoice,
    GstDoc,
    ItrDoc,
}

impl DocumentId {
    pub const REQUIRED: [DocumentId; 4] = [
        DocumentId::BankStatement,
        DocumentId::DealerInvoice,
        DocumentId::GstDoc,
        DocumentId::ItrDoc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BankStatement => "bankStatement",
            Self::DealerInvoice => "dealerInvoice",
            Self::GstDoc => "gstDoc",
            Self::ItrDoc => "itrDoc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BankStatement => "Bank Statement (6 months)",
            Self::DealerInvoice => "Dealer Invoice",
            Self::GstDoc => "GST Certificate",
            Self::ItrDoc => "ITR (last 2 years)",
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What we know about an attached file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub upload_timestamp: DateTime<Utc>,
}

/// Attached documents keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadTracker {
    documents: BTreeMap<DocumentId, DocumentMeta>,
}

impl UploadTracker {
    /// Insert or replace (re-upload) a document
    pub fn record_upload(&mut self, id: DocumentId, meta: DocumentMeta) {
        self.documents.insert(id, meta);
    }

    pub fn get(&self, id: DocumentId) -> Option<&DocumentMeta> {
        self.documents.get(&id)
    }

    pub fn is_uploaded(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Count of required ids present
    pub fn uploaded_count(&self) -> usize {
        DocumentId::REQUIRED
            .iter()
            .filter(|id| self.documents.contains_key(id))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_count() == 0
    }

    pub fn remaining_count(&self) -> usize {
        DocumentId::REQUIRED.len() - self.uploaded_count()
    }

    /// Proceed-button label for the upload step
    pub fn proceed_label(&self) -> String {
        if self.is_complete() {
            "All Documents Uploaded - Proceed".to_string()
        } else {
            format!("Upload {} more documents", self.remaining_count())
        }
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &DocumentMeta)> {
        self.documents.iter()
    }
}
