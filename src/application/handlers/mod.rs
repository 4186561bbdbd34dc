//! Application handlers for the three exposed operations.

mod collect_outreach;
mod handle_inbound_message;
mod resolve_consent;

pub use collect_outreach::CollectOutreach;
pub use handle_inbound_message::{HandleInboundMessage, InboundCommand, InboundOutcome};
pub use resolve_consent::{ResolveConsent, ResolveConsentCommand};
