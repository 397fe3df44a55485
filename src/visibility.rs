//! The visibility evaluator: decides per-item enabled/disabled state from
//! current answers and the dependency index.

use crate::expression::{AnswerMap, ExpressionEvaluator, RuleInterpreter};
use crate::index::DependencyIndex;
use crate::model::{AnswerValue, CombineBehavior, ResponseDocument, ResponseNode, VisibilityRule};
use crate::trace::{RuleTrace, VisibilityTrace};
use ahash::AHashSet;

static DEFAULT_INTERPRETER: RuleInterpreter = RuleInterpreter;

/// Policy for an item whose declared conditions cannot be checked because
/// every source they reference is missing from the definition.
///
/// Hiding such an item is the safety-biased default: a node that declares
/// conditions but whose conditions can never be evaluated stays hidden
/// rather than silently showing up. Flip to `ShowByDefault` only for form
/// populations known to rely on the opposite reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    #[default]
    HideByDefault,
    ShowByDefault,
}

/// Per-evaluation view over one response: the dependency index plus the
/// current answers, flattened into a linkId-addressable map.
///
/// Pure and cheap to rebuild; construct one per answer change or save cycle.
pub struct VisibilityContext<'a> {
    index: &'a DependencyIndex,
    answers: AnswerMap,
    policy: UnresolvedPolicy,
    expressions: &'a dyn ExpressionEvaluator,
}

impl<'a> VisibilityContext<'a> {
    /// Builds a context from the current response, collecting every answer
    /// in the tree. Repeat instances of the same question are unioned into
    /// one flat list, so rules quantify existentially over them.
    pub fn new(index: &'a DependencyIndex, response: &ResponseDocument) -> Self {
        let mut answers = AnswerMap::new();
        for item in &response.items {
            collect_answers(item, &mut answers);
        }
        Self {
            index,
            answers,
            policy: UnresolvedPolicy::default(),
            expressions: &DEFAULT_INTERPRETER,
        }
    }

    pub fn with_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Swaps in a custom evaluator for expression-flavored rules.
    pub fn with_expression_evaluator(mut self, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        self.expressions = evaluator;
        self
    }

    /// Every current answer of a question, across all repeat instances.
    pub fn answers_for(&self, link_id: &str) -> &[AnswerValue] {
        self.answers
            .get(link_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether an item is currently visible.
    ///
    /// Items without visibility rules are always enabled. Otherwise the
    /// item's full declared rule set is evaluated and combined per its
    /// combine behavior; rules referencing linkIds that exist nowhere in the
    /// definition can never fire and are excluded, and an item left with no
    /// checkable rules at all falls back to [`UnresolvedPolicy`].
    pub fn is_enabled(&self, link_id: &str) -> bool {
        let Some(entry) = self.index.dependent(link_id) else {
            return true;
        };

        let mut outcomes = Vec::with_capacity(entry.rules.len());
        for rule in &entry.rules {
            if let Some(satisfied) = self.rule_satisfied(rule) {
                outcomes.push(satisfied);
            }
        }

        if outcomes.is_empty() {
            let enabled = self.policy == UnresolvedPolicy::ShowByDefault;
            log::debug!(
                "item '{}' has no checkable visibility rules; {} by policy",
                link_id,
                if enabled { "shown" } else { "hidden" }
            );
            return enabled;
        }

        match entry.combine {
            CombineBehavior::Any => outcomes.iter().any(|&satisfied| satisfied),
            CombineBehavior::All => outcomes.iter().all(|&satisfied| satisfied),
        }
    }

    /// Records how the visibility of an item was decided, rule by rule, for
    /// human-readable explanations. Agrees with [`Self::is_enabled`].
    pub fn explain(&self, link_id: &str) -> VisibilityTrace {
        let Some(entry) = self.index.dependent(link_id) else {
            return VisibilityTrace::Unconditional;
        };

        let mut rules = Vec::with_capacity(entry.rules.len());
        let mut outcomes = Vec::new();
        for rule in &entry.rules {
            let resolved = self.rule_satisfied(rule);
            if let Some(satisfied) = resolved {
                outcomes.push(satisfied);
            }
            rules.push(RuleTrace {
                description: rule.to_string(),
                actual: self.observed_answer(rule),
                resolved: resolved.is_some(),
                satisfied: resolved.unwrap_or(false),
            });
        }

        if outcomes.is_empty() {
            return VisibilityTrace::Unresolvable {
                enabled: self.policy == UnresolvedPolicy::ShowByDefault,
                rules,
            };
        }

        let enabled = match entry.combine {
            CombineBehavior::Any => outcomes.iter().any(|&satisfied| satisfied),
            CombineBehavior::All => outcomes.iter().all(|&satisfied| satisfied),
        };
        VisibilityTrace::Combined {
            combine: entry.combine,
            rules,
            enabled,
        }
    }

    /// Decides one rule. `None` means the rule is unresolvable: it references
    /// at least one source that exists nowhere in the definition.
    fn rule_satisfied(&self, rule: &VisibilityRule) -> Option<bool> {
        match rule {
            VisibilityRule::Simple(simple) => {
                if !self.index.knows_link_id(&simple.source) {
                    log::debug!(
                        "visibility rule references unknown question '{}'; rule can never fire",
                        simple.source
                    );
                    return None;
                }
                Some(simple.is_satisfied_by(self.answers_for(&simple.source)))
            }
            VisibilityRule::Expression(expr) => {
                let mut sources = AHashSet::new();
                expr.collect_sources(&mut sources);
                if sources
                    .iter()
                    .any(|source| !self.index.knows_link_id(source))
                {
                    log::debug!(
                        "expression rule '{}' references unknown questions; rule can never fire",
                        expr
                    );
                    return None;
                }
                match self.expressions.evaluate(expr, &self.answers) {
                    Ok(satisfied) => Some(satisfied),
                    Err(error) => {
                        log::warn!(
                            "expression rule '{}' failed to evaluate ({}); treating as unsatisfied",
                            expr,
                            error
                        );
                        Some(false)
                    }
                }
            }
        }
    }

    /// The answer a simple rule was checked against, for trace output.
    fn observed_answer(&self, rule: &VisibilityRule) -> Option<AnswerValue> {
        match rule {
            VisibilityRule::Simple(simple) => self.answers_for(&simple.source).first().cloned(),
            VisibilityRule::Expression(_) => None,
        }
    }
}

fn collect_answers(node: &ResponseNode, into: &mut AnswerMap) {
    if !node.answers.is_empty() {
        into.entry(node.link_id.clone())
            .or_default()
            .extend(node.answers.iter().cloned());
    }
    for child in &node.children {
        collect_answers(child, into);
    }
}
