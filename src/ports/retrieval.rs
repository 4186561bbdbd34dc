//! Retrieval port for the direct-answer path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::CampusId;

/// Kind of record a retrieval hit points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Event,
    Profile,
    Organization,
    Fact,
}

/// One ranked retrieval hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedRecord {
    /// Identifier of the underlying record, opaque to the engine.
    pub id: String,
    pub kind: RecordKind,
    pub title: String,
    pub snippet: String,
    /// Relevance score assigned by the retrieval system.
    pub score: f64,
    /// Whether the record carries opt-in consent.
    pub consent_verified: bool,
    /// Start time, for event records.
    pub event_start: Option<DateTime<Utc>>,
}

/// Retrieval errors. Call sites degrade to deterministic fallbacks.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("retrieval unavailable: {0}")]
    Unavailable(String),
}

/// Port for free-text retrieval over campus records.
///
/// The engine calls `search` twice per question and treats the overlap
/// of the two passes as an agreement signal; implementations backed by
/// a deterministic index simply return identical results.
#[async_trait]
pub trait Retrieval: Send + Sync {
    /// Ranked records for a query, best first, up to `top_k`.
    async fn search(
        &self,
        campus: &CampusId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedRecord>, RetrievalError>;
}
