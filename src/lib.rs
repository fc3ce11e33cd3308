//! Profile extraction and hybrid scholarship matching.
//!
//! The [`extraction`] module turns tagger output into a confidence-scored
//! [`extraction::StructuredProfile`]; the [`matching`] module scores that
//! profile against a catalog of offers with a binary eligibility gate and a
//! content compatibility score, then ranks and explains the results.

pub mod config;
pub mod error;
pub mod extraction;
pub mod matching;
pub mod telemetry;
