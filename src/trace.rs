//! Human-readable explanations of visibility decisions.

use crate::model::{AnswerValue, CombineBehavior};
use itertools::Itertools;

/// A record of how one item's visibility was decided.
#[derive(Debug, Clone)]
pub enum VisibilityTrace {
    /// The item declares no conditions and is always shown.
    Unconditional,
    /// Every declared condition references a question missing from the
    /// definition; the outcome fell back to policy.
    Unresolvable {
        enabled: bool,
        rules: Vec<RuleTrace>,
    },
    /// The declared conditions were evaluated and combined.
    Combined {
        combine: CombineBehavior,
        rules: Vec<RuleTrace>,
        enabled: bool,
    },
}

/// The outcome of one rule within a trace.
#[derive(Debug, Clone)]
pub struct RuleTrace {
    /// The rule as an author would have written it, e.g. `age >= 18`.
    pub description: String,
    /// The answer the rule was checked against, where one was observed.
    pub actual: Option<AnswerValue>,
    /// False when the rule references a question missing from the definition.
    pub resolved: bool,
    pub satisfied: bool,
}

impl VisibilityTrace {
    pub fn enabled(&self) -> bool {
        match self {
            VisibilityTrace::Unconditional => true,
            VisibilityTrace::Unresolvable { enabled, .. } => *enabled,
            VisibilityTrace::Combined { enabled, .. } => *enabled,
        }
    }
}

/// Formats visibility traces into human-readable reason strings.
pub struct TraceFormatter;

impl TraceFormatter {
    /// Renders a trace as a single reason line, naming each rule, the answer
    /// it saw, and whether it was satisfied.
    pub fn format_trace(trace: &VisibilityTrace) -> String {
        match trace {
            VisibilityTrace::Unconditional => "always shown (no conditions)".to_string(),
            VisibilityTrace::Unresolvable { enabled, .. } => format!(
                "{} by policy (conditions reference questions missing from the definition)",
                if *enabled { "shown" } else { "hidden" }
            ),
            VisibilityTrace::Combined {
                combine,
                rules,
                enabled,
            } => {
                let separator = match combine {
                    CombineBehavior::Any => " OR ",
                    CombineBehavior::All => " AND ",
                };
                let conditions = rules
                    .iter()
                    .map(Self::format_rule)
                    .join(separator);
                format!(
                    "{}: {}",
                    if *enabled { "shown" } else { "hidden" },
                    conditions
                )
            }
        }
    }

    fn format_rule(rule: &RuleTrace) -> String {
        if !rule.resolved {
            return format!("{} [unknown question]", rule.description);
        }
        let verdict = if rule.satisfied {
            "satisfied"
        } else {
            "not satisfied"
        };
        match &rule.actual {
            Some(actual) => format!("{} (was {}) [{}]", rule.description, actual, verdict),
            None => format!("{} [{}]", rule.description, verdict),
        }
    }
}
