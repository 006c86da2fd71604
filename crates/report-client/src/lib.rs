//! HTTP delivery of finished scan reports.
//!
//! The scanner works fully offline; this crate only comes into play when an
//! endpoint URL is configured. One envelope per scan, POSTed as JSON, with
//! bounded exponential-backoff retries on transport failure.

pub mod client;
pub mod retry;
pub mod types;

pub use client::ReportClient;
pub use retry::RetryPolicy;
pub use types::ScanEnvelope;
