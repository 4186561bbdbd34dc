//! Outreach campaign domain: runs, targets, reply interpretation, and
//! confidence scoring.

mod candidate;
pub mod interpreter;
pub mod messages;
mod run;
pub mod scoring;
mod target;

pub use candidate::{aggregate_candidates, CandidateScore};
pub use interpreter::{ConsentSignal, HeuristicOutcome, Interpretation, ReplyType};
pub use run::{ForumPostRef, OutreachRun, RunStatus, SuggestedCandidate};
pub use target::{OutreachTarget, TargetSource, TargetStatus};
