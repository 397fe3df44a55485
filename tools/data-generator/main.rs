use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use renkei::prelude::*;
use std::fs;

/// A CLI tool to generate matched definition/response pairs for exercising
/// the reconciler, with random repeat runs (including zero-instance runs)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Seed for deterministic output
    #[arg(long)]
    seed: Option<u64>,

    /// Number of top-level sections to generate
    #[arg(long, default_value_t = 4)]
    sections: usize,

    /// Number of questions per section
    #[arg(long, default_value_t = 6)]
    questions: usize,

    /// Maximum number of instances for a repeating question
    #[arg(long, default_value_t = 3)]
    max_instances: usize,

    /// The path to write the generated definition JSON to
    #[arg(long, default_value = "generated_definition.json")]
    definition_output: String,

    /// The path to write the generated response JSON to
    #[arg(long, default_value = "generated_response.json")]
    response_output: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Generating {} section(s) with {} question(s) each...",
        cli.sections, cli.questions
    );

    let definition = generate_definition(&mut rng, cli.sections, cli.questions);
    let response = generate_response(&mut rng, &definition, cli.max_instances);

    fs::write(
        &cli.definition_output,
        serde_json::to_string_pretty(&definition)?,
    )?;
    fs::write(
        &cli.response_output,
        serde_json::to_string_pretty(&response)?,
    )?;

    println!(
        "Wrote definition to '{}' and response to '{}'",
        cli.definition_output, cli.response_output
    );
    Ok(())
}

fn generate_definition(rng: &mut StdRng, sections: usize, questions: usize) -> FormDefinition {
    let mut items = Vec::with_capacity(sections);
    let mut leaf_pool: Vec<(String, ItemType)> = Vec::new();

    for section_index in 0..sections {
        let mut children = Vec::with_capacity(questions);
        for question_index in 0..questions {
            let link_id = format!("q{}_{}", section_index, question_index);
            let item_type = random_leaf_type(rng);
            let mut node = FormNode::new(link_id.clone(), item_type);

            if rng.random_bool(0.35) {
                node = node.repeating();
            }
            // Roughly a third of questions depend on an earlier one.
            if !leaf_pool.is_empty() && rng.random_bool(0.3) {
                let (source, source_type) = leaf_pool[rng.random_range(0..leaf_pool.len())].clone();
                node = node.with_rules(vec![random_rule(rng, &source, source_type)], CombineBehavior::All);
            }

            leaf_pool.push((link_id, item_type));
            children.push(node);
        }

        items.push(
            FormNode::new(format!("section{}", section_index), ItemType::Group)
                .with_text(format!("Section {}", section_index))
                .with_children(children),
        );
    }

    FormDefinition {
        id: Some("generated".to_string()),
        title: Some("Generated reconciliation fixture".to_string()),
        items,
        ..FormDefinition::default()
    }
}

fn random_leaf_type(rng: &mut StdRng) -> ItemType {
    match rng.random_range(0..5) {
        0 => ItemType::Boolean,
        1 => ItemType::Integer,
        2 => ItemType::Decimal,
        3 => ItemType::Date,
        _ => ItemType::String,
    }
}

fn random_rule(rng: &mut StdRng, source: &str, source_type: ItemType) -> VisibilityRule {
    let rule = match source_type {
        ItemType::Boolean => EnableWhenRule {
            source: source.to_string(),
            operator: ComparisonOp::Equal,
            expected: AnswerValue::Boolean(true),
        },
        ItemType::Integer => EnableWhenRule {
            source: source.to_string(),
            operator: ComparisonOp::GreaterOrEqual,
            expected: AnswerValue::Integer(rng.random_range(0..50)),
        },
        ItemType::Decimal => EnableWhenRule {
            source: source.to_string(),
            operator: ComparisonOp::LessThan,
            expected: AnswerValue::Decimal(rng.random_range(0.0..100.0)),
        },
        _ => EnableWhenRule {
            source: source.to_string(),
            operator: ComparisonOp::Exists,
            expected: AnswerValue::Boolean(true),
        },
    };
    VisibilityRule::Simple(rule)
}

fn generate_response(
    rng: &mut StdRng,
    definition: &FormDefinition,
    max_instances: usize,
) -> ResponseDocument {
    let items = definition
        .items
        .iter()
        .map(|section| {
            let children = section
                .children
                .iter()
                .flat_map(|question| generate_instances(rng, question, max_instances))
                .collect();
            ResponseNode::new(section.link_id.clone()).with_children(children)
        })
        .collect();
    ResponseDocument::with_items(items)
}

/// Emits a run of consecutive same-linkId siblings for repeating questions,
/// possibly empty, so the re-pairing walk gets exercised.
fn generate_instances(
    rng: &mut StdRng,
    question: &FormNode,
    max_instances: usize,
) -> Vec<ResponseNode> {
    let count = if question.repeats {
        rng.random_range(0..=max_instances)
    } else {
        rng.random_range(0..=1)
    };

    (0..count)
        .map(|_| {
            let answers = if rng.random_bool(0.15) {
                // Deliberately unanswered instance; should be pruned.
                vec![]
            } else {
                vec![random_answer(rng, question.item_type)]
            };
            ResponseNode::new(question.link_id.clone()).with_answers(answers)
        })
        .collect()
}

fn random_answer(rng: &mut StdRng, item_type: ItemType) -> AnswerValue {
    match item_type {
        ItemType::Boolean => AnswerValue::Boolean(rng.random_bool(0.5)),
        ItemType::Integer => AnswerValue::Integer(rng.random_range(0..100)),
        ItemType::Decimal => AnswerValue::Decimal(rng.random_range(0.0..100.0)),
        ItemType::Date => AnswerValue::Date(format!(
            "20{:02}-{:02}-{:02}",
            rng.random_range(20..26),
            rng.random_range(1..=12),
            rng.random_range(1..=28)
        )),
        _ => {
            if rng.random_bool(0.1) {
                // Empty strings count as unanswered and should be pruned.
                AnswerValue::String(String::new())
            } else {
                AnswerValue::String(format!("answer-{}", rng.random_range(0..1000)))
            }
        }
    }
}
