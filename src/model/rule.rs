use super::AnswerValue;
use crate::expression::RuleExpression;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How multiple visibility rules on one item are resolved into a single
/// enabled/disabled decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombineBehavior {
    /// At least one rule must be satisfied.
    Any,
    /// Every rule must be satisfied.
    #[default]
    All,
}

/// The operator of a declarative enable-when rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl ComparisonOp {
    /// Whether `actual` satisfies this operator against `expected`.
    ///
    /// `Exists` is not decided here; it depends on answer presence rather
    /// than on any single answer and is handled in [`EnableWhenRule`].
    pub fn holds(self, actual: &AnswerValue, expected: &AnswerValue) -> bool {
        use std::cmp::Ordering;
        match self {
            ComparisonOp::Exists => false,
            ComparisonOp::Equal => actual.matches(expected),
            // Values of foreign kinds are incomparable rather than unequal,
            // so a type mismatch never satisfies `!=` either.
            ComparisonOp::NotEqual => actual.same_kind(expected) && !actual.matches(expected),
            ComparisonOp::GreaterThan => {
                matches!(actual.compare(expected), Some(Ordering::Greater))
            }
            ComparisonOp::LessThan => matches!(actual.compare(expected), Some(Ordering::Less)),
            ComparisonOp::GreaterOrEqual => matches!(
                actual.compare(expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            ComparisonOp::LessOrEqual => matches!(
                actual.compare(expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOp::Exists => "exists",
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::LessThan => "<",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::LessOrEqual => "<=",
        };
        write!(f, "{}", symbol)
    }
}

/// A declarative condition tying an item's visibility to another item's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableWhenRule {
    /// linkId of the question this rule watches.
    pub source: String,
    pub operator: ComparisonOp,
    pub expected: AnswerValue,
}

impl EnableWhenRule {
    /// Decides the rule against every current answer of its source question.
    ///
    /// A multi-valued source satisfies the rule if any one answer does.
    /// With no answer present the rule is unsatisfied, except for `exists`,
    /// which compares actual presence against the expected boolean. An
    /// `exists` rule whose expected value is not a boolean is malformed and
    /// never satisfied.
    pub fn is_satisfied_by(&self, answers: &[AnswerValue]) -> bool {
        if self.operator == ComparisonOp::Exists {
            let AnswerValue::Boolean(expected) = self.expected else {
                return false;
            };
            let present = answers.iter().any(|a| !a.is_blank());
            return present == expected;
        }
        answers
            .iter()
            .any(|answer| self.operator.holds(answer, &self.expected))
    }
}

impl fmt::Display for EnableWhenRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.operator, self.expected)
    }
}

/// A visibility condition in either of the two supported flavors.
///
/// Simple rules cover the common declarative `{source, operator, value}`
/// triple; expression rules carry a boolean expression tree for forms that
/// need richer logic. The evaluator stays agnostic to which flavor it is
/// given by delegating expressions to an injected interpreter strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisibilityRule {
    Simple(EnableWhenRule),
    Expression(RuleExpression),
}

impl VisibilityRule {
    /// Collects every source linkId this rule references.
    pub fn collect_sources(&self, out: &mut AHashSet<String>) {
        match self {
            VisibilityRule::Simple(rule) => {
                out.insert(rule.source.clone());
            }
            VisibilityRule::Expression(expr) => expr.collect_sources(out),
        }
    }
}

impl fmt::Display for VisibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisibilityRule::Simple(rule) => write!(f, "{}", rule),
            VisibilityRule::Expression(expr) => write!(f, "{}", expr),
        }
    }
}
