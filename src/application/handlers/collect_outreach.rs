//! Collect handler: one scheduled poll over an outreach run.

use std::sync::Arc;

use crate::application::campaign::{CampaignManager, CollectOutcome};
use crate::domain::foundation::{DomainError, RunId};

/// Handler for `collect_outreach`.
///
/// Thin by design: each invocation is one poll-driven state transition,
/// owned entirely by the campaign manager.
pub struct CollectOutreach {
    campaign: Arc<CampaignManager>,
}

impl CollectOutreach {
    pub fn new(campaign: Arc<CampaignManager>) -> Self {
        Self { campaign }
    }

    /// Runs one collection pass.
    ///
    /// # Errors
    ///
    /// - `RunNotFound` when the run id is unknown
    pub async fn handle(&self, run_id: RunId) -> Result<CollectOutcome, DomainError> {
        self.campaign.collect(run_id).await
    }
}
