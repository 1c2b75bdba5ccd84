// src/main.rs
//! cypher-mutant: print every mutant of a Cypher query

use clap::Parser;
use cypher_mutant::cypher::statement_from_json;
use cypher_mutant::harness::load_cases;
use cypher_mutant::report::{render_outcome, Report};
use cypher_mutant::{parse_statement, Category, Error, MutationConfig, Result, Statement};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Generate mutants of a Cypher query for mutation testing
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Query text to mutate
    query: Option<String>,

    /// Enable only this mutation category (repeatable)
    #[arg(short, long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// JSON map of category name to enabled flag
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read the statement tree as JSON instead of parsing QUERY
    #[arg(long, value_name = "FILE")]
    tree: Option<PathBuf>,

    /// Print the parsed tree as JSON and exit
    #[arg(long)]
    dump_ast: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Run a JSON case file through the comparison harness
    #[arg(long, value_name = "FILE")]
    cases: Option<PathBuf>,

    /// Set the log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }

    // Failures are reported, never turned into a non-zero exit status
    if let Err(e) = run(&cli) {
        println!("{}", e);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.cases {
        return run_cases(path);
    }

    let statement = read_statement(cli)?;
    if cli.dump_ast {
        println!("{}", serde_json::to_string_pretty(&statement)?);
        return Ok(());
    }

    let config = resolve_config(cli)?;
    tracing::info!(
        categories = config.enabled().count(),
        "mutating statement"
    );

    let report = Report::generate(&statement, &config)?;
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

fn read_statement(cli: &Cli) -> Result<Statement> {
    match (&cli.tree, &cli.query) {
        (Some(path), _) => statement_from_json(&std::fs::read_to_string(path)?),
        (None, Some(query)) => parse_statement(query),
        (None, None) => Err(Error::InputShape(
            "no query given (pass QUERY or --tree FILE)".to_string(),
        )),
    }
}

/// `--category` wins over `--config`; with neither, every category is enabled
fn resolve_config(cli: &Cli) -> Result<MutationConfig> {
    if !cli.categories.is_empty() {
        let mut config = MutationConfig::none();
        for name in &cli.categories {
            config.enable(name.parse::<Category>()?);
        }
        return Ok(config);
    }
    match &cli.config {
        Some(path) => MutationConfig::load(path),
        None => Ok(MutationConfig::all()),
    }
}

fn run_cases(path: &Path) -> Result<()> {
    let cases = load_cases(path)?;
    let mut passed = 0;
    for case in &cases {
        match case.run() {
            Ok(outcome) => {
                if outcome.passed() {
                    passed += 1;
                }
                print!("{}", render_outcome(&outcome));
            }
            Err(e) => println!("ERR {}: {}", case.query, e),
        }
    }
    println!("{}/{} cases passed", passed, cases.len());
    Ok(())
}
