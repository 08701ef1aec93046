//! Signal rules — independent, stateless votes on a turn's speaker.
//!
//! Each rule is a pure function of `(content, index)` returning one
//! [`HeuristicSignal`]. A `role` of `None` means the rule abstains; its
//! confidence still counts toward the aggregation denominator.

use chatvault_core::Role;
use once_cell::sync::Lazy;
use regex::Regex;

/// One rule's verdict. Produced and consumed within a single
/// classification call.
#[derive(Debug, Clone)]
pub struct HeuristicSignal {
    pub rule: &'static str,
    pub role: Option<Role>,
    pub confidence: f64,
    pub reason: String,
}

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*[^*]+\*\*").unwrap());
static NUMBERED_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+\.\s").unwrap());
static INSTRUCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(please |can you |could you |help me |write |create |explain |fix |show |make |build |implement |add |update |change )",
    )
    .unwrap()
});

/// Position: the first turn is typically the user; later turns alternate.
pub fn position(index: usize) -> HeuristicSignal {
    if index == 0 {
        return HeuristicSignal {
            rule: "H1",
            role: Some(Role::User),
            confidence: 0.7,
            reason: "First turn is typically user".into(),
        };
    }
    HeuristicSignal {
        rule: "H1",
        role: Some(if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        }),
        confidence: 0.4,
        reason: "Alternating pattern assumption".into(),
    }
}

/// Length: short messages lean user, long messages lean assistant.
pub fn length(content_length: usize) -> HeuristicSignal {
    if content_length < 100 {
        return HeuristicSignal {
            rule: "H2",
            role: Some(Role::User),
            confidence: 0.6,
            reason: "Short message suggests user".into(),
        };
    }
    if content_length > 500 {
        return HeuristicSignal {
            rule: "H2",
            role: Some(Role::Assistant),
            confidence: 0.65,
            reason: "Long message suggests assistant".into(),
        };
    }
    HeuristicSignal {
        rule: "H2",
        role: None,
        confidence: 0.3,
        reason: "Medium length is ambiguous".into(),
    }
}

/// Code density: complete fenced code blocks lean assistant.
pub fn code_density(content: &str) -> HeuristicSignal {
    let block_count = content.matches("```").count() / 2;
    if block_count >= 1 {
        return HeuristicSignal {
            rule: "H3",
            role: Some(Role::Assistant),
            confidence: 0.75,
            reason: format!("Contains {} code block(s)", block_count),
        };
    }
    HeuristicSignal {
        rule: "H3",
        role: None,
        confidence: 0.2,
        reason: "No code blocks".into(),
    }
}

/// Question pattern: a trailing question mark leans user.
pub fn question_pattern(content: &str) -> HeuristicSignal {
    let last_line = content.trim().lines().last().unwrap_or("");
    if last_line.trim().ends_with('?') {
        return HeuristicSignal {
            rule: "H4",
            role: Some(Role::User),
            confidence: 0.6,
            reason: "Ends with a question mark".into(),
        };
    }
    HeuristicSignal {
        rule: "H4",
        role: None,
        confidence: 0.2,
        reason: "No trailing question".into(),
    }
}

/// Markdown formatting: headings, bullets and bold spans lean assistant.
pub fn markdown_formatting(content: &str) -> HeuristicSignal {
    let total = HEADING_RE.find_iter(content).count()
        + BULLET_RE.find_iter(content).count()
        + BOLD_RE.find_iter(content).count();
    if total >= 3 {
        return HeuristicSignal {
            rule: "H5",
            role: Some(Role::Assistant),
            confidence: 0.7,
            reason: format!("{} markdown formatting elements found", total),
        };
    }
    HeuristicSignal {
        rule: "H5",
        role: None,
        confidence: 0.2,
        reason: "Minimal formatting".into(),
    }
}

/// Instructional phrasing: an imperative opening leans user.
pub fn instructional_phrasing(content: &str) -> HeuristicSignal {
    let first_line = content.trim().lines().next().unwrap_or("");
    if INSTRUCTION_RE.is_match(first_line) {
        return HeuristicSignal {
            rule: "H6",
            role: Some(Role::User),
            confidence: 0.7,
            reason: "Starts with instructional phrasing".into(),
        };
    }
    HeuristicSignal {
        rule: "H6",
        role: None,
        confidence: 0.2,
        reason: "No instructional phrasing".into(),
    }
}

/// List structure: three or more numbered items lean assistant.
pub fn list_structure(content: &str) -> HeuristicSignal {
    let numbered_items = NUMBERED_ITEM_RE.find_iter(content).count();
    if numbered_items >= 3 {
        return HeuristicSignal {
            rule: "H7",
            role: Some(Role::Assistant),
            confidence: 0.65,
            reason: format!("{} numbered list items found", numbered_items),
        };
    }
    HeuristicSignal {
        rule: "H7",
        role: None,
        confidence: 0.2,
        reason: "No significant list structure".into(),
    }
}
