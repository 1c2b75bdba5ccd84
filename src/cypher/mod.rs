// src/cypher/mod.rs
// Cypher front end (tokenizer -> parser -> tree) and the unparser

pub mod ast;
pub mod builder;
pub mod parser;
pub mod tokenizer;

pub use ast::Statement;
pub use builder::build;

use crate::error::{Error, Result};

/// Parse query text into its `;`-separated statements
pub fn parse_statements(input: &str) -> Result<Vec<Statement>> {
    let statements = parser::parse_cypher(input).map_err(Error::Parse)?;
    tracing::debug!(count = statements.len(), "parsed statements");
    Ok(statements)
}

/// Parse query text that must hold exactly one statement
pub fn parse_statement(input: &str) -> Result<Statement> {
    let mut statements = parse_statements(input)?;
    if statements.len() != 1 {
        return Err(Error::InputShape(format!(
            "expected exactly one statement, found {}",
            statements.len()
        )));
    }
    Ok(statements.remove(0))
}

/// Read a statement tree from its JSON form
pub fn statement_from_json(json: &str) -> Result<Statement> {
    serde_json::from_str(json).map_err(|e| Error::InputShape(format!("not a statement tree: {}", e)))
}
