// src/lib.rs
//! Mutation operators for Cypher queries.
//!
//! A query is parsed into a statement tree, `mutate` derives mutated copies of
//! that tree grouped by mutation category, and `build` prints any tree back as
//! deterministic, fully parenthesized query text.

pub mod config;
pub mod cypher;
pub mod error;
pub mod harness;
pub mod mutator;
pub mod report;

pub use config::{Category, MutationConfig};
pub use cypher::{build, parse_statement, parse_statements, Statement};
pub use error::{Error, Result};
pub use mutator::{mutate, MutantSet};
