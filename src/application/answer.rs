//! Direct-answer path: cached facts plus dual-pass retrieval.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::fact_cache::FactCache;
use crate::domain::foundation::CampusId;
use crate::domain::outreach::scoring::direct_answer_confidence;
use crate::ports::{Retrieval, RetrievedRecord};

const RETRIEVAL_TOP_K: usize = 5;
const ANSWER_PREVIEW_LIMIT: usize = 3;

/// Outcome of the direct-answer probe.
#[derive(Debug, Clone)]
pub struct DirectAnswer {
    pub answer_text: String,
    pub confidence: f64,
    pub result_count: usize,
    /// Whether cached facts or records satisfy the need without outreach.
    pub db_answerable: bool,
}

/// Answers structured questions from cached facts and retrieval,
/// computing the dual-retrieval confidence of the result.
pub struct DirectAnswerService {
    retrieval: Arc<dyn Retrieval>,
    fact_cache: Arc<FactCache>,
    answer_threshold: f64,
}

impl DirectAnswerService {
    pub fn new(
        retrieval: Arc<dyn Retrieval>,
        fact_cache: Arc<FactCache>,
        answer_threshold: f64,
    ) -> Self {
        Self {
            retrieval,
            fact_cache,
            answer_threshold,
        }
    }

    /// Probes for a direct answer.
    ///
    /// Retrieval outages degrade to an empty result set (the caller then
    /// routes to outreach or a clarifying question); they never error.
    pub async fn answer(&self, campus: &CampusId, query: &str, tags: &[String]) -> DirectAnswer {
        let facts = match self.fact_cache.lookup(campus, tags).await {
            Ok(facts) => facts,
            Err(err) => {
                warn!(error = %err, "fact lookup degraded to empty");
                Vec::new()
            }
        };

        let first_pass = self.search(campus, query).await;
        let second_pass = self.search(campus, query).await;

        let first_ids: HashSet<String> = first_pass.iter().map(|r| r.id.clone()).collect();
        let second_ids: HashSet<String> = second_pass.iter().map(|r| r.id.clone()).collect();

        let result_count = facts.len() + first_pass.len();
        let verified_count =
            facts.len() + first_pass.iter().filter(|r| r.consent_verified).count();

        let mut confidence =
            direct_answer_confidence(result_count, verified_count, &first_ids, &second_ids);

        // A cached fact is a previously validated answer; it keeps the
        // confidence it earned when it was written.
        if let Some(best_fact) = facts
            .iter()
            .map(|f| f.confidence)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        {
            confidence = confidence.max(best_fact);
        }

        let db_answerable =
            !facts.is_empty() || (result_count > 0 && confidence >= self.answer_threshold);

        let answer_text = compose_answer(&facts, &first_pass);

        // Side channel: cache verified hits behind the answer.
        for record in first_pass.iter().filter(|r| r.consent_verified) {
            if let Err(err) = self
                .fact_cache
                .store_record_fact(campus, record, confidence)
                .await
            {
                debug!(error = %err, record = %record.id, "record fact write skipped");
            }
        }

        DirectAnswer {
            answer_text,
            confidence,
            result_count,
            db_answerable,
        }
    }

    async fn search(&self, campus: &CampusId, query: &str) -> Vec<RetrievedRecord> {
        match self.retrieval.search(campus, query, RETRIEVAL_TOP_K).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(error = %err, "retrieval degraded to empty result set");
                Vec::new()
            }
        }
    }
}

fn compose_answer(
    facts: &[crate::domain::facts::VerifiedFact],
    hits: &[RetrievedRecord],
) -> String {
    let mut lines: Vec<String> = Vec::new();
    for fact in facts.iter().take(ANSWER_PREVIEW_LIMIT) {
        lines.push(fact.value.clone());
    }
    for hit in hits.iter().take(ANSWER_PREVIEW_LIMIT.saturating_sub(lines.len())) {
        lines.push(format!("{} - {}", hit.title, hit.snippet));
    }

    if lines.is_empty() {
        "i don't have that yet - want me to ask around?".to_string()
    } else {
        format!("here's what i found: {}", lines.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryFacts, InMemoryRetrieval};
    use crate::config::{FactTtlConfig, OutreachConfig};
    use crate::domain::foundation::RunId;
    use crate::ports::RecordKind;

    fn service(
        retrieval: Arc<InMemoryRetrieval>,
        facts: Arc<InMemoryFacts>,
    ) -> (DirectAnswerService, Arc<FactCache>) {
        let cache = Arc::new(FactCache::new(
            facts,
            &FactTtlConfig::default(),
            &OutreachConfig::default(),
        ));
        (
            DirectAnswerService::new(retrieval, cache.clone(), 0.75),
            cache,
        )
    }

    fn campus() -> CampusId {
        CampusId::new("campus-1").unwrap()
    }

    fn record(id: &str, title: &str, verified: bool) -> RetrievedRecord {
        RetrievedRecord {
            id: id.to_string(),
            kind: RecordKind::Organization,
            title: title.to_string(),
            snippet: "meets thursdays".to_string(),
            score: 0.9,
            consent_verified: verified,
            event_start: None,
        }
    }

    #[tokio::test]
    async fn empty_world_yields_floor_confidence_and_no_answer() {
        let (service, _) = service(
            Arc::new(InMemoryRetrieval::new()),
            Arc::new(InMemoryFacts::new()),
        );
        let answer = service.answer(&campus(), "chess partners", &["chess".into()]).await;
        assert_eq!(answer.confidence, 0.1);
        assert!(!answer.db_answerable);
        assert!(answer.answer_text.contains("ask around"));
    }

    #[tokio::test]
    async fn verified_results_clear_the_threshold() {
        let retrieval = Arc::new(InMemoryRetrieval::new());
        for i in 0..3 {
            retrieval
                .add_record(&campus(), record(&format!("org-{}", i), "Chess Society", true))
                .await;
        }
        let (service, _) = service(retrieval, Arc::new(InMemoryFacts::new()));

        let answer = service.answer(&campus(), "chess clubs", &["chess".into()]).await;
        // 3 results, all verified, identical passes: 0.8 * 1.0 * 1.0
        assert_eq!(answer.confidence, 0.8);
        assert!(answer.db_answerable);
        assert!(answer.answer_text.contains("Chess Society"));
    }

    #[tokio::test]
    async fn cached_fact_makes_the_need_answerable() {
        let facts = Arc::new(InMemoryFacts::new());
        let (service, cache) = service(Arc::new(InMemoryRetrieval::new()), facts);
        cache
            .store_outreach_summary(&campus(), RunId::new(), "chess club thursdays 7pm", 0.9)
            .await
            .unwrap();

        let answer = service.answer(&campus(), "chess partners", &["chess".into()]).await;
        assert!(answer.db_answerable);
        assert!(answer.confidence >= 0.9);
        assert!(answer.answer_text.contains("chess club thursdays"));
    }

    #[tokio::test]
    async fn retrieval_outage_degrades_to_outreach_routing() {
        let retrieval = Arc::new(InMemoryRetrieval::new());
        retrieval.fail(true).await;
        let (service, _) = service(retrieval, Arc::new(InMemoryFacts::new()));

        let answer = service.answer(&campus(), "chess partners", &["chess".into()]).await;
        assert!(!answer.db_answerable);
        assert_eq!(answer.result_count, 0);
    }

    #[tokio::test]
    async fn high_confidence_answers_write_record_facts() {
        let retrieval = Arc::new(InMemoryRetrieval::new());
        for i in 0..3 {
            retrieval
                .add_record(&campus(), record(&format!("org-{}", i), "Chess Society", true))
                .await;
        }
        let facts = Arc::new(InMemoryFacts::new());
        let (service, _) = service(retrieval, facts.clone());

        service.answer(&campus(), "chess clubs", &["chess".into()]).await;
        assert_eq!(facts.len().await, 3);
    }
}
