//! Integrity checker — advisory sanity pass over an extracted turn sequence.
//!
//! Never mutates and never blocks an export; every finding is a warning
//! string that ends up in the serialized output.

use std::collections::HashSet;

use chatvault_core::{Role, Turn};

#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// True only when zero warnings fired. Advisory, not fatal.
    pub valid: bool,
    pub warnings: Vec<String>,
}

pub fn check_integrity(turns: &[Turn]) -> IntegrityReport {
    let mut warnings = Vec::new();

    if turns.is_empty() {
        return IntegrityReport {
            valid: false,
            warnings: vec!["No turns extracted".to_string()],
        };
    }

    let empty_turns = turns.iter().filter(|t| t.content.trim().is_empty()).count();
    if empty_turns > 0 {
        warnings.push(format!("{} turn(s) have empty content", empty_turns));
    }

    for i in 1..turns.len() {
        let prev = &turns[i - 1];
        let curr = &turns[i];
        if prev.role == curr.role && prev.role != Role::System {
            warnings.push(format!(
                "Consecutive {} turns at positions {} and {}",
                curr.role,
                i,
                i + 1
            ));
        }
    }

    if turns[0].role != Role::User {
        warnings.push("Conversation does not start with a user turn".to_string());
    }

    let low_confidence = turns.iter().filter(|t| t.confidence < 0.5).count();
    if low_confidence > 0 {
        warnings.push(format!(
            "{} turn(s) have confidence below 0.5",
            low_confidence
        ));
    }

    // Near-duplicate detection compares only the first 200 chars; shorter
    // collisions with divergent tails are accepted as undetected.
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    for turn in turns {
        let prefix: String = turn.content.chars().take(200).collect();
        if !seen.insert(prefix) {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        warnings.push(format!(
            "{} potential duplicate turn(s) detected",
            duplicates
        ));
    }

    IntegrityReport {
        valid: warnings.is_empty(),
        warnings,
    }
}
