// src/report.rs
// Mutation report for the command-line tool (plain text and JSON)

use crate::config::{Category, MutationConfig};
use crate::cypher::ast::Statement;
use crate::cypher::build;
use crate::error::Result;
use crate::harness::CaseOutcome;
use crate::mutator::mutate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Built input and mutant texts, grouped by category in vocabulary order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub input: String,
    pub mutants: BTreeMap<Category, Vec<String>>,
    pub count: usize,
}

impl Report {
    /// Mutate and build every mutant; the first build failure aborts the report
    pub fn generate(statement: &Statement, config: &MutationConfig) -> Result<Self> {
        let input = build(statement)?;

        let mut mutants = BTreeMap::new();
        let mut count = 0;
        for (category, trees) in mutate(statement, config).iter() {
            let texts = trees
                .iter()
                .map(|tree| {
                    build(tree).inspect_err(|e| {
                        tracing::debug!(category = %category, error = %e, "mutant build failed")
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            count += texts.len();
            mutants.insert(category, texts);
        }

        Ok(Report {
            input,
            mutants,
            count,
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n[INPUT]\n  {}\n\n[OUTPUT]\n", self.input));
        for (category, texts) in &self.mutants {
            out.push_str(&format!("  KEY : {}\n", category));
            for text in texts {
                out.push_str(&format!("    {}\n", text));
            }
            out.push('\n');
        }
        out.push_str(&format!("{} mutants were generated.\n\n", self.count));
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `OK <query>`, or `NG <query>` followed by the expected and actual lists
pub fn render_outcome(outcome: &CaseOutcome) -> String {
    if outcome.passed() {
        return format!("OK {}\n", outcome.query);
    }

    let mut out = format!("NG {} [{}]\n  expected:\n", outcome.query, outcome.category);
    for text in &outcome.expected {
        out.push_str(&format!("    {}\n", text));
    }
    out.push_str("  actual:\n");
    for text in &outcome.actual {
        out.push_str(&format!("    {}\n", text));
    }
    out
}
