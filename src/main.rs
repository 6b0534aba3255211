use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use runbook::config::Config;
use runbook::document::{Document, StepType, StepValues};
use runbook::fields::{codec, FieldType};
use runbook::logging;
use runbook::outline;
use runbook::store::DocumentStore;

#[derive(Parser)]
#[command(name = "runbook")]
#[command(about = "Inspect and validate runnable step documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List steps with requirement and frozen state
    Steps {
        /// Document file
        file: PathBuf,
    },

    /// Print the heading outline
    Outline {
        /// Document file
        file: PathBuf,

        /// Selection cursor position used to mark the current section
        #[arg(short, long)]
        selected: Option<usize>,
    },

    /// Print a form step's field definitions
    Fields {
        /// Document file
        file: PathBuf,

        /// Form step id
        #[arg(short, long)]
        step: Uuid,
    },

    /// Show a script step's argument bindings
    Args {
        /// Document file
        file: PathBuf,

        /// Script step id
        #[arg(short, long)]
        step: Uuid,
    },

    /// Check field lists and script argument references
    Validate {
        /// Document file
        file: PathBuf,
    },

    /// Print the JSON Schema for the stored formats
    Schema {
        /// Emit the run-state schema instead of the document schema
        #[arg(long)]
        values: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let _logging = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Steps { file } => cmd_steps(&file),
        Commands::Outline { file, selected } => cmd_outline(&file, selected),
        Commands::Fields { file, step } => cmd_fields(&file, step),
        Commands::Args { file, step } => cmd_args(&file, step),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Schema { values } => cmd_schema(values),
    }
}

/// Load a document and the run state from its sibling values file
fn load_with_values(file: &Path) -> Result<(Document, StepValues)> {
    let document = DocumentStore::read_document(file)?;
    let values = DocumentStore::read_values(&DocumentStore::sibling_values_path(file))?;
    Ok((document, values))
}

fn cmd_steps(file: &Path) -> Result<()> {
    let (document, values) = load_with_values(file)?;
    let frozen = document.steps.compute_frozen(&values);

    println!(
        "{} ({} steps){}",
        document.title,
        document.steps.len(),
        if document.locked { " [locked]" } else { "" }
    );
    for (index, step) in document.steps.iter().enumerate() {
        let completed = values.get(&step.id).is_some_and(|v| v.completed);
        let state = if frozen.get(&step.id).copied().unwrap_or(false) {
            "frozen"
        } else if completed {
            "done"
        } else {
            "open"
        };
        let required = if step.required { "*" } else { " " };
        println!(
            "{index:>3} {required} {:<8} {state:<6} {}",
            step_type_name(step.step_type),
            summary_line(&step.content)
        );
    }
    Ok(())
}

fn cmd_outline(file: &Path, selected: Option<usize>) -> Result<()> {
    let document = DocumentStore::read_document(file)?;
    let headings = outline::extract_headings(document.steps.as_slice());
    if headings.is_empty() {
        println!("No headings.");
        return Ok(());
    }

    let tiers = outline::display_tiers(&headings);
    let current = outline::current_heading(&headings, selected).map(|h| h.step_id);

    for (heading, tier) in headings.iter().zip(tiers) {
        let marker = if current == Some(heading.step_id) {
            "  <-"
        } else {
            ""
        };
        println!(
            "{}- {}{marker}",
            "  ".repeat(usize::from(tier)),
            heading.label
        );
    }
    Ok(())
}

fn cmd_fields(file: &Path, step_id: Uuid) -> Result<()> {
    let document = DocumentStore::read_document(file)?;
    let step = document
        .steps
        .step(step_id)
        .with_context(|| format!("step {step_id} not found"))?;
    if step.step_type != StepType::Form {
        bail!("step {step_id} is not a form step");
    }

    let fields = codec::decode(&step.content)?;
    if fields.is_empty() {
        println!("No fields.");
        return Ok(());
    }
    for field in &fields {
        let name = if field.name.is_empty() {
            "(unnamed)"
        } else {
            &field.name
        };
        let extra = match &field.options {
            Some(options) => format!(" [{} option(s)]", options.len()),
            None => String::new(),
        };
        println!(
            "{:<8} {name:<20} {}{extra}",
            field_type_name(field.field_type),
            field.display_label()
        );
    }
    Ok(())
}

fn cmd_args(file: &Path, step_id: Uuid) -> Result<()> {
    let document = DocumentStore::read_document(file)?;
    let bindings = document.steps.resolved_args(step_id)?;
    if bindings.is_empty() {
        println!("No argument bindings.");
        return Ok(());
    }
    for binding in &bindings {
        match &binding.field {
            Some(field) => println!(
                "{:<20} -> {} ({})",
                binding.name,
                field.display_label(),
                field_type_name(field.field_type)
            ),
            None => println!("{:<20} -> (unresolved)", binding.name),
        }
    }
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<()> {
    let document = DocumentStore::read_document(file)?;
    let mut problems = Vec::new();

    for (index, step) in document.steps.iter().enumerate() {
        match step.step_type {
            StepType::Form => match codec::decode(&step.content) {
                Ok(fields) => {
                    for field in &fields {
                        if field.options.is_some() && !field.is_select() {
                            problems.push(format!(
                                "step {index}: field '{}' is not a select but carries options",
                                field.display_label()
                            ));
                        }
                        if field.is_select() && field.options.is_none() {
                            problems.push(format!(
                                "step {index}: select field '{}' has no options container",
                                field.display_label()
                            ));
                        }
                    }
                }
                Err(err) => problems.push(format!("step {index}: {err}")),
            },
            StepType::Script => match document.steps.resolved_args(step.id) {
                Ok(bindings) => {
                    for binding in bindings.iter().filter(|b| b.field.is_none()) {
                        problems.push(format!(
                            "step {index}: script arg '{}' does not match any upstream field",
                            binding.name
                        ));
                    }
                }
                Err(err) => problems.push(format!("step {index}: {err}")),
            },
            StepType::Markdown => {}
        }
    }

    if problems.is_empty() {
        println!("{}: ok", file.display());
        return Ok(());
    }
    for problem in &problems {
        eprintln!("{problem}");
    }
    bail!("{} problem(s) found", problems.len())
}

fn cmd_schema(values: bool) -> Result<()> {
    let schema = if values {
        schemars::schema_for!(StepValues)
    } else {
        schemars::schema_for!(Document)
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn step_type_name(step_type: StepType) -> &'static str {
    match step_type {
        StepType::Form => "form",
        StepType::Markdown => "markdown",
        StepType::Script => "script",
    }
}

fn field_type_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "text",
        FieldType::Number => "number",
        FieldType::File => "file",
        FieldType::Check => "check",
        FieldType::Select => "select",
    }
}

/// First line of a step's content, shortened for list display
fn summary_line(content: &str) -> String {
    let line = content.lines().next().unwrap_or("");
    if line.chars().count() > 60 {
        let short: String = line.chars().take(60).collect();
        format!("{short}...")
    } else {
        line.to_string()
    }
}
