// src/harness.rs
// Comparison harness: one query + one category against an expected mutant set

use crate::config::{Category, MutationConfig};
use crate::cypher::{build, parse_statement};
use crate::error::Result;
use crate::mutator::mutate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single acceptance scenario as stored in case files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationCase {
    pub query: String,
    pub category: Category,
    pub expected: Vec<String>,
}

impl MutationCase {
    pub fn run(&self) -> Result<CaseOutcome> {
        run_case(&self.query, self.category, &self.expected)
    }
}

/// Sorted expected and produced mutant texts for one scenario
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub query: String,
    pub category: Category,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

impl CaseOutcome {
    /// Order-insensitive equality, duplicates included
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Mutate `query` with only `category` enabled and compare the built mutants
pub fn run_case(query: &str, category: Category, expected: &[String]) -> Result<CaseOutcome> {
    let statement = parse_statement(query)?;
    let mutants = mutate(&statement, &MutationConfig::only(category));

    let mut actual = mutants
        .get(category)
        .iter()
        .map(build)
        .collect::<Result<Vec<_>>>()?;
    actual.sort();

    let mut expected = expected.to_vec();
    expected.sort();

    let outcome = CaseOutcome {
        query: query.to_string(),
        category,
        expected,
        actual,
    };
    if !outcome.passed() {
        tracing::debug!(query, category = %category, "mutant set mismatch");
    }
    Ok(outcome)
}

/// Read a JSON list of cases
pub fn load_cases(path: &Path) -> Result<Vec<MutationCase>> {
    let text = std::fs::read_to_string(path)?;
    parse_cases(&text)
}

pub fn parse_cases(text: &str) -> Result<Vec<MutationCase>> {
    Ok(serde_json::from_str(text)?)
}

// ============================================================================
// Tests
// ============================================================================
