//! `calcflow` CLI entry-point.
//!
//! Available sub-commands:
//! - `parse`    tokenize and parse an expression, print the AST.
//! - `compile`  compile an expression into a workflow graph (JSON).
//! - `eval`     evaluate an expression directly.
//! - `run`      execute a workflow graph JSON file.
//! - `validate` validate a workflow graph JSON file.
//! - `match`    rank a workflow library against a query.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use engine::{CompiledWorkflow, ExecutorConfig, QuickEvaluator, Workflow, WorkflowExecutor};
use expr::ParserConfig;
use matcher::{MatcherConfig, WorkflowMatcher};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "calcflow",
    about = "Compile arithmetic expressions into executable workflow graphs",
    version
)]
struct Cli {
    /// Reject unrecognised characters instead of skipping them.
    #[arg(long, global = true, env = "CALCFLOW_STRICT")]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse an expression and print its tokens, AST and summary.
    Parse { expression: String },
    /// Compile an expression into a workflow graph.
    Compile { expression: String },
    /// Evaluate an expression.
    Eval {
        expression: String,
        /// Variable binding, `name=value`. Repeatable.
        #[arg(long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
    },
    /// Execute a workflow graph JSON file.
    Run {
        path: PathBuf,
        #[arg(long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
        /// Fail instead of falling back when the graph has no result node.
        #[arg(long)]
        no_degraded: bool,
    },
    /// Validate a workflow graph JSON file.
    Validate {
        /// Path to the workflow graph JSON file.
        path: PathBuf,
    },
    /// Rank the workflows in a library file against a query.
    Match {
        query: String,
        /// JSON array of library entries.
        #[arg(long)]
        library: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = 0.1)]
        min_confidence: f64,
    },
}

/// Hand-written library record; compiled into a [`Workflow`] on load.
#[derive(Debug, Deserialize)]
struct LibraryEntry {
    name: String,
    expression: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    examples: Vec<String>,
}

#[derive(Serialize)]
struct RankedMatch<'a> {
    name: &'a str,
    expression: &'a str,
    #[serde(flatten)]
    candidate: &'a matcher::MatchCandidate,
}

fn parse_binding(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {e}", name.trim()))?;
    Ok((name.trim().to_string(), value))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn load_library(path: &Path) -> anyhow::Result<Vec<Workflow>> {
    let entries: Vec<LibraryEntry> = read_json(path)?;
    entries
        .into_iter()
        .map(|entry| {
            let graph = engine::compile(&entry.expression)
                .with_context(|| format!("library entry '{}'", entry.name))?;
            Ok(Workflow::new(entry.name, graph)
                .with_description(entry.description)
                .with_tags(entry.tags)
                .with_examples(entry.examples))
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let parser = if cli.strict {
        ParserConfig::strict()
    } else {
        ParserConfig::default()
    };

    match cli.command {
        Command::Parse { expression } => {
            let parsed = expr::parse_with(&expression, parser)?;
            print_json(&parsed)?;
        }
        Command::Compile { expression } => {
            let graph = engine::compile_with(&expression, parser)?;
            print_json(&graph)?;
        }
        Command::Eval { expression, vars } => {
            let inputs: HashMap<String, f64> = vars.into_iter().collect();
            let evaluator = QuickEvaluator::new(parser);
            let value = evaluator.evaluate(&expression, &inputs)?;
            println!("{value}");
        }
        Command::Run {
            path,
            vars,
            no_degraded,
        } => {
            let graph: CompiledWorkflow = read_json(&path)?;
            let inputs: HashMap<String, f64> = vars.into_iter().collect();
            let executor = WorkflowExecutor::new(ExecutorConfig {
                allow_degraded: !no_degraded,
            });
            let outcome = executor.execute(&graph, &inputs)?;
            info!(execution_id = %outcome.execution_id, "workflow executed");
            print_json(&outcome)?;
        }
        Command::Validate { path } => {
            let graph: CompiledWorkflow = read_json(&path)?;

            match engine::validate_dag(&graph) {
                Ok(order) => {
                    println!("Workflow is valid. Execution order: {order:?}");
                }
                Err(e) => {
                    eprintln!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Match {
            query,
            library,
            limit,
            min_confidence,
        } => {
            let library = load_library(&library)?;
            let matcher = WorkflowMatcher::new(MatcherConfig {
                max_results: limit,
                min_confidence,
                ..MatcherConfig::default()
            });
            let matches = matcher.find_matches(&query, &library);
            let ranked = matches
                .iter()
                .map(|candidate| {
                    let workflow = library
                        .iter()
                        .find(|wf| wf.id == candidate.workflow_id)
                        .ok_or_else(|| anyhow!("unknown workflow {}", candidate.workflow_id))?;
                    Ok(RankedMatch {
                        name: &workflow.name,
                        expression: &workflow.graph.source_pattern,
                        candidate,
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&ranked)?;
        }
    }

    Ok(())
}
