//! Common test utilities for building form definitions and responses.
use renkei::prelude::*;

/// The survey fixture: an `age` question and a `details` group that is only
/// visible once the respondent is an adult.
///
/// Logic: `details` enabled when `age >= 18`.
#[allow(dead_code)]
pub fn survey_definition() -> FormDefinition {
    FormDefinition {
        id: Some("survey-1".to_string()),
        title: Some("Intake survey".to_string()),
        items: vec![
            FormNode::new("survey", ItemType::Group)
                .with_text("Survey")
                .with_children(vec![
                    FormNode::new("age", ItemType::Integer).with_text("Age"),
                    FormNode::new("details", ItemType::Group)
                        .with_text("Details")
                        .with_children(vec![
                            FormNode::new("employer", ItemType::String).with_text("Employer"),
                        ])
                        .with_rules(
                            vec![VisibilityRule::Simple(EnableWhenRule {
                                source: "age".to_string(),
                                operator: ComparisonOp::GreaterOrEqual,
                                expected: AnswerValue::Integer(18),
                            })],
                            CombineBehavior::All,
                        ),
                ]),
        ],
        ..FormDefinition::default()
    }
}

/// A survey response with the given age and an employer answer that may or
/// may not survive reconciliation.
#[allow(dead_code)]
pub fn survey_response(age: i64, employer: &str) -> ResponseDocument {
    ResponseDocument::with_items(vec![
        ResponseNode::new("survey").with_children(vec![
            ResponseNode::new("age").with_answers(vec![AnswerValue::Integer(age)]),
            ResponseNode::new("details").with_children(vec![
                ResponseNode::new("employer")
                    .with_answers(vec![AnswerValue::String(employer.to_string())]),
            ]),
        ]),
    ])
}

/// The repeat fixture: a `meds` group holding a repeating `med` question.
#[allow(dead_code)]
pub fn repeat_definition() -> FormDefinition {
    FormDefinition {
        id: Some("meds-1".to_string()),
        title: Some("Medications".to_string()),
        items: vec![
            FormNode::new("meds", ItemType::Group)
                .with_text("Medications")
                .with_children(vec![
                    FormNode::new("med", ItemType::String)
                        .with_text("Medication name")
                        .repeating(),
                ]),
        ],
        ..FormDefinition::default()
    }
}

/// A definition with no visibility rules anywhere, for round-trip tests.
#[allow(dead_code)]
pub fn fully_visible_definition() -> FormDefinition {
    FormDefinition {
        id: Some("plain-1".to_string()),
        name: Some("PlainForm".to_string()),
        items: vec![
            FormNode::new("name", ItemType::String),
            FormNode::new("vitals", ItemType::Group).with_children(vec![
                FormNode::new("height", ItemType::Decimal),
                FormNode::new("weight", ItemType::Decimal),
            ]),
        ],
        ..FormDefinition::default()
    }
}

/// Builds a visibility context over `response` and hands it to `check`.
///
/// The index borrows the definition and the context borrows the index, so
/// tests go through this helper instead of juggling the lifetimes inline.
#[allow(dead_code)]
pub fn with_visibility<T>(
    definition: &FormDefinition,
    response: &ResponseDocument,
    check: impl FnOnce(&VisibilityContext<'_>) -> T,
) -> T {
    let index = DependencyIndex::build(definition);
    let visibility = VisibilityContext::new(&index, response);
    check(&visibility)
}

/// A tiny deterministic linear congruential generator for fuzz-style tests.
/// Enough randomness to shake the dual-pointer walk without pulling a
/// dependency into the test suite.
#[allow(dead_code)]
pub struct Lcg(pub u64);

#[allow(dead_code)]
impl Lcg {
    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    /// Uniform-ish value in `0..bound`.
    pub fn below(&mut self, bound: u64) -> u64 {
        (self.next_u64() >> 33) % bound.max(1)
    }
}
