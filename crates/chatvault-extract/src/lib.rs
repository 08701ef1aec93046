//! Turn extraction — platform detection, per-site extractors, shared engine.

pub mod engine;
pub mod extractor;
pub mod platform;
pub mod sites;

pub use engine::ExtractionEngine;
pub use extractor::{extractor_for, PlatformExtractor, RoleDecision};
pub use platform::{detect_platform, Platform};
