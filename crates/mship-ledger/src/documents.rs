//! # Document Registry
//!
//! Opaque storage and retrieval of per-trade documents. The registry
//! hands out sequential [`DocumentId`]s and records who registered
//! what, when; approval status lives in the engine's shipment record,
//! not here.
//!
//! Existence and retrieval are scoped by `(owner, trade)` — a document
//! registered under one trade is invisible to another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mship_core::{DocumentId, PrincipalId, Timestamp, TradeId};

/// Errors arising from document registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No document with this identifier exists under the trade.
    #[error("unknown document {document} for {trade}")]
    UnknownDocument {
        /// The missing document identifier.
        document: DocumentId,
        /// The trade scope that was searched.
        trade: TradeId,
    },
}

/// Metadata the registry holds for a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// The registry-assigned identifier.
    pub id: DocumentId,
    /// Human-readable document name.
    pub name: String,
    /// Free-form category label supplied at registration.
    pub label: String,
    /// Where the document content lives.
    pub url: String,
    /// Who registered the document.
    pub owner: PrincipalId,
    /// When it was first registered.
    pub registered_at: Timestamp,
    /// When it was last updated, if ever.
    pub updated_at: Option<Timestamp>,
}

/// The document storage contract consumed by the shipment engine.
pub trait DocumentRegistry {
    /// Register a new document, returning its opaque identifier.
    fn register(
        &mut self,
        owner: PrincipalId,
        trade: TradeId,
        name: &str,
        label: &str,
        url: &str,
    ) -> Result<DocumentId, RegistryError>;

    /// Replace the name and url of an existing document in place.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::UnknownDocument`] for an id not
    /// registered under the trade.
    fn update(
        &mut self,
        owner: PrincipalId,
        trade: TradeId,
        id: DocumentId,
        name: &str,
        url: &str,
    ) -> Result<(), RegistryError>;

    /// Whether a document exists under the trade.
    fn exists(&self, trade: TradeId, id: DocumentId) -> bool;

    /// Retrieve the metadata for a document.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::UnknownDocument`] for an unknown id.
    fn info(&self, trade: TradeId, id: DocumentId) -> Result<DocumentMeta, RegistryError>;
}

/// In-memory reference document registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryDocumentRegistry {
    documents: BTreeMap<(TradeId, DocumentId), DocumentMeta>,
    next_id: Option<DocumentId>,
}

impl InMemoryDocumentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many documents have been registered across all trades.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the registry holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn take_next_id(&mut self) -> DocumentId {
        let id = self.next_id.unwrap_or(DocumentId::FIRST);
        self.next_id = Some(id.next());
        id
    }
}

impl DocumentRegistry for InMemoryDocumentRegistry {
    fn register(
        &mut self,
        owner: PrincipalId,
        trade: TradeId,
        name: &str,
        label: &str,
        url: &str,
    ) -> Result<DocumentId, RegistryError> {
        let id = self.take_next_id();
        self.documents.insert(
            (trade, id),
            DocumentMeta {
                id,
                name: name.to_string(),
                label: label.to_string(),
                url: url.to_string(),
                owner,
                registered_at: Timestamp::now(),
                updated_at: None,
            },
        );
        Ok(id)
    }

    fn update(
        &mut self,
        _owner: PrincipalId,
        trade: TradeId,
        id: DocumentId,
        name: &str,
        url: &str,
    ) -> Result<(), RegistryError> {
        let meta = self
            .documents
            .get_mut(&(trade, id))
            .ok_or(RegistryError::UnknownDocument {
                document: id,
                trade,
            })?;
        meta.name = name.to_string();
        meta.url = url.to_string();
        meta.updated_at = Some(Timestamp::now());
        Ok(())
    }

    fn exists(&self, trade: TradeId, id: DocumentId) -> bool {
        self.documents.contains_key(&(trade, id))
    }

    fn info(&self, trade: TradeId, id: DocumentId) -> Result<DocumentMeta, RegistryError> {
        self.documents
            .get(&(trade, id))
            .cloned()
            .ok_or(RegistryError::UnknownDocument {
                document: id,
                trade,
            })
    }
}
