//! Expression-flavored visibility rules and their interpreter.
//!
//! Most forms get by with simple `{source, operator, value}` triples, but
//! some authoring tools emit richer boolean expressions. Those are modelled
//! here as a small expression tree evaluated by an interpreter that is
//! injected into the visibility evaluator as a strategy, so the evaluator
//! never needs to know which rule flavor it is looking at.

use crate::error::ExpressionError;
use crate::model::{AnswerValue, ComparisonOp};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current answers keyed by linkId, with every repeat instance unioned into
/// one flat list per question.
pub type AnswerMap = AHashMap<String, Vec<AnswerValue>>;

/// The expression tree of an expression-flavored visibility rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleExpression {
    /// A constant value.
    Literal(AnswerValue),
    /// Every current answer of the referenced question. Comparisons against
    /// a multi-valued source quantify existentially.
    Source(String),
    /// Whether the referenced question has any answer at all.
    Exists(String),

    Not(Box<RuleExpression>),
    And(Box<RuleExpression>, Box<RuleExpression>),
    Or(Box<RuleExpression>, Box<RuleExpression>),

    Equal(Box<RuleExpression>, Box<RuleExpression>),
    NotEqual(Box<RuleExpression>, Box<RuleExpression>),
    GreaterThan(Box<RuleExpression>, Box<RuleExpression>),
    GreaterOrEqual(Box<RuleExpression>, Box<RuleExpression>),
    LessThan(Box<RuleExpression>, Box<RuleExpression>),
    LessOrEqual(Box<RuleExpression>, Box<RuleExpression>),
}

impl RuleExpression {
    /// Collects every source linkId referenced anywhere in the expression.
    pub fn collect_sources(&self, out: &mut AHashSet<String>) {
        match self {
            RuleExpression::Source(link_id) | RuleExpression::Exists(link_id) => {
                out.insert(link_id.clone());
            }
            RuleExpression::Not(inner) => inner.collect_sources(out),
            RuleExpression::And(l, r)
            | RuleExpression::Or(l, r)
            | RuleExpression::Equal(l, r)
            | RuleExpression::NotEqual(l, r)
            | RuleExpression::GreaterThan(l, r)
            | RuleExpression::GreaterOrEqual(l, r)
            | RuleExpression::LessThan(l, r)
            | RuleExpression::LessOrEqual(l, r) => {
                l.collect_sources(out);
                r.collect_sources(out);
            }
            RuleExpression::Literal(_) => {}
        }
    }
}

// Display is handwritten so traces read like the rule an author would have
// typed, e.g. `($age >= 18 AND exists($consent))`.
impl fmt::Display for RuleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn binary(
            f: &mut fmt::Formatter<'_>,
            l: &RuleExpression,
            symbol: &str,
            r: &RuleExpression,
        ) -> fmt::Result {
            write!(f, "({} {} {})", l, symbol, r)
        }

        match self {
            RuleExpression::Literal(value) => write!(f, "{}", value),
            RuleExpression::Source(link_id) => write!(f, "${}", link_id),
            RuleExpression::Exists(link_id) => write!(f, "exists(${})", link_id),
            RuleExpression::Not(inner) => write!(f, "NOT {}", inner),
            RuleExpression::And(l, r) => binary(f, l, "AND", r),
            RuleExpression::Or(l, r) => binary(f, l, "OR", r),
            RuleExpression::Equal(l, r) => binary(f, l, "=", r),
            RuleExpression::NotEqual(l, r) => binary(f, l, "!=", r),
            RuleExpression::GreaterThan(l, r) => binary(f, l, ">", r),
            RuleExpression::GreaterOrEqual(l, r) => binary(f, l, ">=", r),
            RuleExpression::LessThan(l, r) => binary(f, l, "<", r),
            RuleExpression::LessOrEqual(l, r) => binary(f, l, "<=", r),
        }
    }
}

/// Strategy for evaluating expression-flavored visibility rules.
///
/// The default implementation is [`RuleInterpreter`]. Callers whose forms use
/// a different expression language can inject their own evaluator into the
/// visibility context.
pub trait ExpressionEvaluator {
    /// Evaluates the expression against the current answers, resolving to the
    /// enabled/disabled contribution of this rule.
    fn evaluate(&self, expr: &RuleExpression, answers: &AnswerMap)
    -> Result<bool, ExpressionError>;
}

/// The built-in tree-walking interpreter for [`RuleExpression`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleInterpreter;

/// Intermediate result of evaluating a subexpression.
enum Operand<'a> {
    Bool(bool),
    Literal(&'a AnswerValue),
    Answers(&'a [AnswerValue]),
}

impl ExpressionEvaluator for RuleInterpreter {
    fn evaluate(
        &self,
        expr: &RuleExpression,
        answers: &AnswerMap,
    ) -> Result<bool, ExpressionError> {
        let operand = eval(expr, answers)?;
        truthy(&operand, "expression")
    }
}

fn eval<'a>(expr: &'a RuleExpression, answers: &'a AnswerMap) -> Result<Operand<'a>, ExpressionError> {
    match expr {
        RuleExpression::Literal(value) => Ok(Operand::Literal(value)),
        RuleExpression::Source(link_id) => Ok(Operand::Answers(
            answers.get(link_id).map(Vec::as_slice).unwrap_or(&[]),
        )),
        RuleExpression::Exists(link_id) => {
            let present = answers
                .get(link_id)
                .is_some_and(|list| list.iter().any(|a| !a.is_blank()));
            Ok(Operand::Bool(present))
        }
        RuleExpression::Not(inner) => {
            let value = truthy(&eval(inner, answers)?, "NOT")?;
            Ok(Operand::Bool(!value))
        }
        RuleExpression::And(l, r) => {
            // Short-circuits like the boolean operator it is.
            if !truthy(&eval(l, answers)?, "AND")? {
                return Ok(Operand::Bool(false));
            }
            Ok(Operand::Bool(truthy(&eval(r, answers)?, "AND")?))
        }
        RuleExpression::Or(l, r) => {
            if truthy(&eval(l, answers)?, "OR")? {
                return Ok(Operand::Bool(true));
            }
            Ok(Operand::Bool(truthy(&eval(r, answers)?, "OR")?))
        }
        RuleExpression::Equal(l, r) => compare(ComparisonOp::Equal, l, r, answers),
        RuleExpression::NotEqual(l, r) => compare(ComparisonOp::NotEqual, l, r, answers),
        RuleExpression::GreaterThan(l, r) => compare(ComparisonOp::GreaterThan, l, r, answers),
        RuleExpression::GreaterOrEqual(l, r) => compare(ComparisonOp::GreaterOrEqual, l, r, answers),
        RuleExpression::LessThan(l, r) => compare(ComparisonOp::LessThan, l, r, answers),
        RuleExpression::LessOrEqual(l, r) => compare(ComparisonOp::LessOrEqual, l, r, answers),
    }
}

/// Comparisons quantify existentially over multi-valued sides: the operator
/// holds if any left/right value pair satisfies it.
fn compare<'a>(
    op: ComparisonOp,
    l: &'a RuleExpression,
    r: &'a RuleExpression,
    answers: &'a AnswerMap,
) -> Result<Operand<'a>, ExpressionError> {
    let left = values_of(&eval(l, answers)?);
    let right = values_of(&eval(r, answers)?);
    let outcome = left
        .iter()
        .any(|lv| right.iter().any(|rv| op.holds(lv, rv)));
    Ok(Operand::Bool(outcome))
}

fn values_of<'a>(operand: &'a Operand<'a>) -> Vec<AnswerValue> {
    match operand {
        Operand::Bool(b) => vec![AnswerValue::Boolean(*b)],
        Operand::Literal(value) => vec![(*value).clone()],
        Operand::Answers(list) => list.to_vec(),
    }
}

fn truthy(operand: &Operand<'_>, operation: &str) -> Result<bool, ExpressionError> {
    match operand {
        Operand::Bool(b) => Ok(*b),
        Operand::Literal(AnswerValue::Boolean(b)) => Ok(*b),
        Operand::Literal(other) => Err(ExpressionError::TypeMismatch {
            operation: operation.to_string(),
            expected: "Boolean".to_string(),
            found: (*other).clone(),
        }),
        Operand::Answers(list) => {
            // An unanswered source contributes false; a boolean source is
            // true when any instance answered true.
            if list.iter().any(|v| matches!(v, AnswerValue::Boolean(true))) {
                return Ok(true);
            }
            match list.iter().find(|v| !matches!(v, AnswerValue::Boolean(_))) {
                Some(non_boolean) => Err(ExpressionError::TypeMismatch {
                    operation: operation.to_string(),
                    expected: "Boolean".to_string(),
                    found: non_boolean.clone(),
                }),
                None => Ok(false),
            }
        }
    }
}
