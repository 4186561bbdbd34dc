//! Fact cache domain types.

mod fact;

pub use fact::{
    compute_expiry, ConsentStatus, FactCategory, FactSource, FactSubject, FactTtls, VerifiedFact,
};
