//! Campus Connector - Consent-Driven Outreach Engine
//!
//! This crate turns an unanswered information need into a bounded,
//! consent-respecting crowdsourcing campaign over real users, then
//! reconciles partial, asynchronous replies into a single validated
//! answer with a numeric confidence.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
