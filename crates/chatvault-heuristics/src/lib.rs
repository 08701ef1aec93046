//! Content-based role classification and post-hoc integrity checks.
//!
//! Used when a site exposes no reliable structural role markers: seven
//! independent signal rules vote on a turn's speaker, an aggregator turns
//! the votes into one role + confidence, and an advisory integrity pass
//! reviews the finished turn sequence.

pub mod classifier;
pub mod integrity;
pub mod rules;

pub use classifier::{classify_role, Classification};
pub use integrity::{check_integrity, IntegrityReport};
pub use rules::HeuristicSignal;
