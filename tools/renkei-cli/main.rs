use clap::{Parser, ValueEnum};
use renkei::prelude::*;
use std::fs;
use std::time::Instant;

/// A conditional-visibility and response reconciliation engine CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the form definition JSON file
    definition_path: String,
    /// Path to the response JSON file
    response_path: String,
    /// Optional path to a save-context JSON file (subject/author/authored)
    context_path: Option<String>,

    /// Policy for items whose rules only reference unknown questions
    #[arg(short, long, value_enum, default_value_t = PolicyCli::Hide)]
    policy: PolicyCli,

    /// Explain the visibility decision for a linkId (repeatable)
    #[arg(short, long)]
    explain: Vec<String>,

    /// Write the prepared document to this path instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyCli {
    Hide,
    Show,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let definition_json = fs::read_to_string(&cli.definition_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read definition file '{}': {}",
            &cli.definition_path, e
        ))
    });
    let response_json = fs::read_to_string(&cli.response_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read response file '{}': {}",
            &cli.response_path, e
        ))
    });

    let definition: FormDefinition = serde_json::from_str(&definition_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse definition JSON: {}", e)));
    let response: ResponseDocument = serde_json::from_str(&response_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse response JSON: {}", e)));

    let save_context = match &cli.context_path {
        Some(path) => {
            let context_json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read context file '{}': {}", path, e))
            });
            serde_json::from_str(&context_json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse context JSON: {}", e))
            })
        }
        None => SaveContext::default(),
    };

    let policy = match cli.policy {
        PolicyCli::Hide => UnresolvedPolicy::HideByDefault,
        PolicyCli::Show => UnresolvedPolicy::ShowByDefault,
    };

    // --- Indexing ---
    let index_start = Instant::now();
    let index = DependencyIndex::build(&definition);
    let index_duration = index_start.elapsed();
    println!(
        "Indexed {} conditional item(s) in {:?}",
        index.len(),
        index_duration
    );

    // --- Visibility explanations ---
    if !cli.explain.is_empty() {
        let visibility = VisibilityContext::new(&index, &response).with_policy(policy);
        println!("\n--- Visibility ---");
        for link_id in &cli.explain {
            let trace = visibility.explain(link_id);
            println!("{}: {}", link_id, TraceFormatter::format_trace(&trace));
        }
    }

    // --- Reconciliation and assembly ---
    let assemble_start = Instant::now();
    let prepared = ResponseAssembler::new()
        .with_policy(policy)
        .prepare_with_index(&index, &definition, &response, &save_context)
        .unwrap_or_else(|e| exit_with_error(&format!("Assembly failed: {}", e)));
    let assemble_duration = assemble_start.elapsed();

    println!("\n--- Summary ---");
    println!("Form:           {}", definition.display_name());
    println!("Items before:   {}", count_items(&response.items));
    println!("Items after:    {}", count_items(&prepared.document.items));
    println!(
        "Save path:      {}",
        if prepared.is_update { "update" } else { "create" }
    );
    println!("Reconciliation: {:?}", assemble_duration);

    let document_json = serde_json::to_string_pretty(&prepared.document)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize document: {}", e)));
    match &cli.output {
        Some(path) => {
            fs::write(path, document_json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write output file '{}': {}", path, e))
            });
            println!("Wrote prepared document to '{}'", path);
        }
        None => println!("\n{}", document_json),
    }
}

fn count_items(items: &[ResponseNode]) -> usize {
    items
        .iter()
        .map(|item| 1 + count_items(&item.children))
        .sum()
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
