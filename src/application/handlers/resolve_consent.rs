//! Consent resolution handler.

use std::sync::Arc;

use crate::application::consent::{ConsentCoordinator, ConsentOutcome};
use crate::domain::foundation::{DomainError, RunId};

/// Command carrying both consent signals for a run.
#[derive(Debug, Clone, Copy)]
pub struct ResolveConsentCommand {
    pub run_id: RunId,
    pub requester_ok: bool,
    pub target_ok: bool,
}

/// Handler for `resolve_consent`.
pub struct ResolveConsent {
    consent: Arc<ConsentCoordinator>,
}

impl ResolveConsent {
    pub fn new(consent: Arc<ConsentCoordinator>) -> Self {
        Self { consent }
    }

    /// Resolves consent for a suggested introduction.
    ///
    /// Idempotent on terminal runs; see
    /// [`ConsentCoordinator::resolve`].
    ///
    /// # Errors
    ///
    /// - `RunNotFound` when the run id is unknown
    /// - `ValidationFailed` when no candidate is suggested
    pub async fn handle(&self, cmd: ResolveConsentCommand) -> Result<ConsentOutcome, DomainError> {
        self.consent
            .resolve(cmd.run_id, cmd.requester_ok, cmd.target_ok)
            .await
    }
}
