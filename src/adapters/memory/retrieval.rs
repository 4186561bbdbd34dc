//! In-memory retrieval adapter with naive keyword scoring.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::CampusId;
use crate::ports::{Retrieval, RetrievalError, RetrievedRecord};

/// Deterministic keyword retrieval over seeded records.
///
/// Both retrieval passes see identical results, so the dual-pass
/// agreement signal is 1.0 unless an outage is simulated.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRetrieval {
    records: Arc<RwLock<Vec<(CampusId, RetrievedRecord)>>>,
    fail: Arc<RwLock<bool>>,
}

impl InMemoryRetrieval {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record for a campus.
    pub async fn add_record(&self, campus: &CampusId, record: RetrievedRecord) {
        self.records.write().await.push((campus.clone(), record));
    }

    /// Simulates an outage (test helper).
    pub async fn fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }
}

#[async_trait]
impl Retrieval for InMemoryRetrieval {
    async fn search(
        &self,
        campus: &CampusId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedRecord>, RetrievalError> {
        if *self.fail.read().await {
            return Err(RetrievalError::Unavailable("index offline".to_string()));
        }

        let words: Vec<String> = query
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .filter(|w| w.len() > 2)
            .collect();

        let records = self.records.read().await;
        let mut hits: Vec<RetrievedRecord> = records
            .iter()
            .filter(|(c, _)| c == campus)
            .filter(|(_, r)| {
                let haystack = format!("{} {}", r.title, r.snippet).to_lowercase();
                words.iter().any(|w| haystack.contains(w))
            })
            .map(|(_, r)| r.clone())
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RecordKind;

    fn record(id: &str, title: &str, score: f64) -> RetrievedRecord {
        RetrievedRecord {
            id: id.to_string(),
            kind: RecordKind::Organization,
            title: title.to_string(),
            snippet: String::new(),
            score,
            consent_verified: true,
            event_start: None,
        }
    }

    #[tokio::test]
    async fn search_matches_keywords_and_ranks_by_score() {
        let retrieval = InMemoryRetrieval::new();
        let campus = CampusId::new("campus-1").unwrap();
        retrieval.add_record(&campus, record("1", "Chess Club", 0.6)).await;
        retrieval.add_record(&campus, record("2", "Chess Society", 0.9)).await;
        retrieval.add_record(&campus, record("3", "Ultimate Frisbee", 0.8)).await;

        let hits = retrieval.search(&campus, "chess partners", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "2");
    }

    #[tokio::test]
    async fn simulated_outage_errors() {
        let retrieval = InMemoryRetrieval::new();
        retrieval.fail(true).await;
        let campus = CampusId::new("campus-1").unwrap();
        let result = retrieval.search(&campus, "chess", 5).await;
        assert!(matches!(result, Err(RetrievalError::Unavailable(_))));
    }
}
