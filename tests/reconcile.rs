//! Tests for the lock-step reconciliation walk.
mod common;
use common::{
    Lcg, fully_visible_definition, repeat_definition, survey_definition, survey_response,
    with_visibility,
};
use renkei::prelude::*;

fn med(name: &str) -> ResponseNode {
    ResponseNode::new("med").with_answers(vec![AnswerValue::String(name.to_string())])
}

fn reconciled(definition: &FormDefinition, response: &ResponseDocument) -> Vec<ResponseNode> {
    with_visibility(definition, response, |visibility| {
        reconcile_children(&definition.items, &response.items, visibility)
    })
}

#[test]
fn test_adult_keeps_conditional_details() {
    let definition = survey_definition();
    let response = survey_response(21, "Acme");
    let survivors = reconciled(&definition, &response);

    assert_eq!(survivors.len(), 1);
    let survey = &survivors[0];
    assert_eq!(survey.children.len(), 2);
    assert_eq!(survey.children[1].link_id, "details");
    assert_eq!(
        survey.children[1].children[0].answers,
        vec![AnswerValue::String("Acme".to_string())]
    );
}

#[test]
fn test_minor_loses_hidden_subtree() {
    let definition = survey_definition();
    let response = survey_response(16, "Acme");
    let survivors = reconciled(&definition, &response);

    // The details group and everything under it is gone; the age answer
    // stays.
    assert_eq!(survivors.len(), 1);
    let survey = &survivors[0];
    assert_eq!(survey.children.len(), 1);
    assert_eq!(survey.children[0].link_id, "age");
}

#[test]
fn test_repeat_run_drops_only_empty_instances() {
    let definition = repeat_definition();
    let response = ResponseDocument::with_items(vec![
        ResponseNode::new("meds").with_children(vec![
            med("aspirin"),
            med("warfarin"),
            ResponseNode::new("med"),
        ]),
    ]);

    let survivors = reconciled(&definition, &response);
    assert_eq!(survivors.len(), 1);
    let meds = &survivors[0];
    assert_eq!(meds.children.len(), 2);
    assert_eq!(
        meds.children[0].answers,
        vec![AnswerValue::String("aspirin".to_string())]
    );
    assert_eq!(
        meds.children[1].answers,
        vec![AnswerValue::String("warfarin".to_string())]
    );
}

#[test]
fn test_empty_string_answer_counts_as_unanswered() {
    let definition = repeat_definition();
    let response = ResponseDocument::with_items(vec![
        ResponseNode::new("meds").with_children(vec![med("aspirin"), med("")]),
    ]);

    let survivors = reconciled(&definition, &response);
    assert_eq!(survivors[0].children.len(), 1);
    assert_eq!(
        survivors[0].children[0].answers,
        vec![AnswerValue::String("aspirin".to_string())]
    );
}

#[test]
fn test_blank_first_answer_counts_as_unanswered() {
    // The first value decides: a run starting with an empty string is
    // treated as unanswered even when later values carry content.
    let definition = repeat_definition();
    let blank_first = ResponseNode::new("med").with_answers(vec![
        AnswerValue::String(String::new()),
        AnswerValue::String("aspirin".to_string()),
    ]);
    let response = ResponseDocument::with_items(vec![
        ResponseNode::new("meds").with_children(vec![blank_first, med("warfarin")]),
    ]);

    let survivors = reconciled(&definition, &response);
    assert_eq!(survivors[0].children.len(), 1);
    assert_eq!(
        survivors[0].children[0].answers,
        vec![AnswerValue::String("warfarin".to_string())]
    );
}

#[test]
fn test_enabled_group_survives_when_emptied() {
    // All medication instances are unanswered, but the enclosing group is
    // enabled and keeps its node so the output stays addressable.
    let definition = repeat_definition();
    let response = ResponseDocument::with_items(vec![
        ResponseNode::new("meds")
            .with_children(vec![ResponseNode::new("med"), ResponseNode::new("med")]),
    ]);

    let survivors = reconciled(&definition, &response);
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].link_id, "meds");
    assert!(survivors[0].children.is_empty());
}

#[test]
fn test_missing_response_sibling_contributes_nothing() {
    let definition = fully_visible_definition();
    // Only `vitals.weight` was answered; `name` and `vitals.height` have no
    // response nodes at all.
    let response = ResponseDocument::with_items(vec![
        ResponseNode::new("vitals").with_children(vec![
            ResponseNode::new("weight").with_answers(vec![AnswerValue::Decimal(70.5)]),
        ]),
    ]);

    let survivors = reconciled(&definition, &response);
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].link_id, "vitals");
    assert_eq!(survivors[0].children.len(), 1);
    assert_eq!(survivors[0].children[0].link_id, "weight");
}

#[test]
fn test_trailing_unknown_siblings_are_dropped() {
    let definition = repeat_definition();
    // Stale siblings after the med run, left over from an older definition
    // revision. The walk must terminate and drop them.
    let response = ResponseDocument::with_items(vec![
        ResponseNode::new("meds").with_children(vec![
            med("aspirin"),
            ResponseNode::new("dosage").with_answers(vec![AnswerValue::Integer(2)]),
            ResponseNode::new("frequency")
                .with_answers(vec![AnswerValue::String("daily".to_string())]),
        ]),
    ]);

    let survivors = reconciled(&definition, &response);
    assert_eq!(survivors[0].children.len(), 1);
    assert_eq!(survivors[0].children[0].link_id, "med");
}

#[test]
fn test_fully_visible_round_trip_keeps_answered_items() {
    let definition = fully_visible_definition();
    let response = ResponseDocument::with_items(vec![
        ResponseNode::new("name").with_answers(vec![AnswerValue::String("Ada".to_string())]),
        ResponseNode::new("vitals").with_children(vec![
            ResponseNode::new("height").with_answers(vec![AnswerValue::Decimal(170.0)]),
            ResponseNode::new("weight").with_answers(vec![AnswerValue::Decimal(70.5)]),
        ]),
    ]);

    let survivors = reconciled(&definition, &response);
    assert_eq!(survivors, response.items);
}

#[test]
fn test_reconciliation_is_idempotent() {
    let definition = survey_definition();
    let response = survey_response(21, "Acme");

    let once = reconciled(&definition, &response);
    let twice = reconciled(&definition, &ResponseDocument::with_items(once.clone()));
    assert_eq!(once, twice);
}

#[test]
fn test_random_repeat_runs_never_panic_and_stay_stable() {
    // Generated medication lists with random repeat counts, including
    // zero-instance runs, empty instances, and stale trailing siblings.
    let definition = repeat_definition();
    let mut rng = Lcg(0x5eed);

    for _ in 0..200 {
        let mut children = Vec::new();
        for instance in 0..rng.below(6) {
            let node = match rng.below(3) {
                0 => ResponseNode::new("med"),
                1 => med(""),
                _ => med(&format!("drug-{}", instance)),
            };
            children.push(node);
        }
        if rng.below(4) == 0 {
            children
                .push(ResponseNode::new("stale").with_answers(vec![AnswerValue::Boolean(true)]));
        }

        let response = ResponseDocument::with_items(vec![
            ResponseNode::new("meds").with_children(children.clone()),
        ]);
        let survivors = reconciled(&definition, &response);

        if children.is_empty() {
            // A childless, answerless group pairing is judged like a leaf.
            assert!(survivors.is_empty());
            continue;
        }

        // Every survivor is a meaningfully answered med instance, in order.
        let expected: Vec<_> = children
            .iter()
            .filter(|node| node.link_id == "med" && node.has_meaningful_answer())
            .cloned()
            .collect();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].children, expected);

        // With surviving instances the result is a fixed point.
        if !expected.is_empty() {
            let again =
                reconciled(&definition, &ResponseDocument::with_items(survivors.clone()));
            assert_eq!(survivors, again);
        }
    }
}
