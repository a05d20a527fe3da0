// src/api/mod.rs
// =============================================================================
// This module contains everything that talks to the outside world over HTTP.
//
// Submodules:
// - client: The PhishShield service client (classify, history, stats)
// - report: Builds the third-party phishing-report page link
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers write `api::ClassifierApi` instead of `api::client::ClassifierApi`.
// =============================================================================

mod client;
mod report;

pub use client::{ClassifierApi, HttpApi, ServiceStats, Verdict};
pub use report::report_page_url;
