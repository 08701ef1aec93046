//! Role classifier — aggregates the seven signal rules into one decision.

use chatvault_core::Role;

use crate::rules::{self, HeuristicSignal};

/// Aggregated role decision with the full signal list for diagnostics.
#[derive(Debug, Clone)]
pub struct Classification {
    pub role: Role,
    /// In [0, 0.95] — heuristics alone never claim near-certainty.
    pub confidence: f64,
    pub signals: Vec<HeuristicSignal>,
}

/// Classify a turn's speaker from its content and position.
///
/// Votes for each side are summed by confidence; abstaining signals widen
/// the denominator without backing either side. Ties resolve to user.
pub fn classify_role(content: &str, index: usize) -> Classification {
    let signals = vec![
        rules::position(index),
        rules::length(content.chars().count()),
        rules::code_density(content),
        rules::question_pattern(content),
        rules::markdown_formatting(content),
        rules::instructional_phrasing(content),
        rules::list_structure(content),
    ];

    let mut user_score = 0.0;
    let mut assistant_score = 0.0;
    let mut total_weight = 0.0;

    for signal in &signals {
        match signal.role {
            Some(Role::User) => user_score += signal.confidence,
            Some(Role::Assistant) => assistant_score += signal.confidence,
            _ => {}
        }
        total_weight += signal.confidence;
    }

    let role = if user_score >= assistant_score {
        Role::User
    } else {
        Role::Assistant
    };
    let winner_score = user_score.max(assistant_score);
    let confidence = if total_weight > 0.0 {
        winner_score / total_weight
    } else {
        0.5
    };

    Classification {
        role,
        confidence: confidence.min(0.95),
        signals,
    }
}
