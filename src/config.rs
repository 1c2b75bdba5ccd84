// src/config.rs
// Mutation category vocabulary and the per-call enablement configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// Category
// ============================================================================

/// One of the 22 mutation families. Declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Arrow direction")]
    ArrowDirection,
    #[serde(rename = "Label on nodes")]
    LabelOnNodes,
    #[serde(rename = "Label on relationships")]
    LabelOnRelationships,
    #[serde(rename = "Variable-length relationship")]
    VariableLengthRelationship,
    #[serde(rename = "MATCH clause")]
    MatchClause,
    #[serde(rename = "RETURN clause")]
    ReturnClause,
    #[serde(rename = "Trimming section")]
    TrimmingSection,
    #[serde(rename = "ORDER BY clause")]
    OrderByClause,
    #[serde(rename = "CASE clause")]
    CaseClause,
    #[serde(rename = "Predicate functions")]
    PredicateFunctions,
    #[serde(rename = "Aggregate functions")]
    AggregateFunctions,
    #[serde(rename = "Query concatenation")]
    QueryConcatenation,
    #[serde(rename = "Relational operator")]
    RelationalOperator,
    #[serde(rename = "Logical operator")]
    LogicalOperator,
    /// Numeric literal negation and +1/-1
    #[serde(rename = "Unary operator")]
    UnaryOperator,
    #[serde(rename = "Mathematical functions")]
    MathematicalFunctions,
    #[serde(rename = "Mathematical operator")]
    MathematicalOperator,
    #[serde(rename = "String-specific comparison operator")]
    StringComparisonOperator,
    #[serde(rename = "List index")]
    ListIndex,
    #[serde(rename = "NULL check predicates")]
    NullCheckPredicates,
    #[serde(rename = "NULL in results")]
    NullInResults,
    #[serde(rename = "Include NULLs")]
    IncludeNulls,
}

impl Category {
    pub const ALL: [Category; 22] = [
        Category::ArrowDirection,
        Category::LabelOnNodes,
        Category::LabelOnRelationships,
        Category::VariableLengthRelationship,
        Category::MatchClause,
        Category::ReturnClause,
        Category::TrimmingSection,
        Category::OrderByClause,
        Category::CaseClause,
        Category::PredicateFunctions,
        Category::AggregateFunctions,
        Category::QueryConcatenation,
        Category::RelationalOperator,
        Category::LogicalOperator,
        Category::UnaryOperator,
        Category::MathematicalFunctions,
        Category::MathematicalOperator,
        Category::StringComparisonOperator,
        Category::ListIndex,
        Category::NullCheckPredicates,
        Category::NullInResults,
        Category::IncludeNulls,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::ArrowDirection => "Arrow direction",
            Category::LabelOnNodes => "Label on nodes",
            Category::LabelOnRelationships => "Label on relationships",
            Category::VariableLengthRelationship => "Variable-length relationship",
            Category::MatchClause => "MATCH clause",
            Category::ReturnClause => "RETURN clause",
            Category::TrimmingSection => "Trimming section",
            Category::OrderByClause => "ORDER BY clause",
            Category::CaseClause => "CASE clause",
            Category::PredicateFunctions => "Predicate functions",
            Category::AggregateFunctions => "Aggregate functions",
            Category::QueryConcatenation => "Query concatenation",
            Category::RelationalOperator => "Relational operator",
            Category::LogicalOperator => "Logical operator",
            Category::UnaryOperator => "Unary operator",
            Category::MathematicalFunctions => "Mathematical functions",
            Category::MathematicalOperator => "Mathematical operator",
            Category::StringComparisonOperator => "String-specific comparison operator",
            Category::ListIndex => "List index",
            Category::NullCheckPredicates => "NULL check predicates",
            Category::NullInResults => "NULL in results",
            Category::IncludeNulls => "Include NULLs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Exact, case-sensitive match against the category vocabulary
    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| Error::Configuration(format!("unknown mutation category '{}'", s)))
    }
}

// ============================================================================
// MutationConfig
// ============================================================================

/// Which categories `mutate` materializes. JSON form: `{"<category>": bool, ...}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, bool>",
    into = "BTreeMap<String, bool>"
)]
pub struct MutationConfig {
    enabled: BTreeSet<Category>,
}

impl MutationConfig {
    pub fn all() -> Self {
        MutationConfig {
            enabled: Category::ALL.into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(category: Category) -> Self {
        let mut config = Self::none();
        config.enable(category);
        config
    }

    pub fn enable(&mut self, category: Category) {
        self.enabled.insert(category);
    }

    pub fn disable(&mut self, category: Category) {
        self.enabled.remove(&category);
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled.contains(&category)
    }

    /// Enabled categories in vocabulary order
    pub fn enabled(&self) -> impl Iterator<Item = Category> + '_ {
        self.enabled.iter().copied()
    }

    /// Read a JSON category map from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let map: BTreeMap<String, bool> = serde_json::from_str(text)
            .map_err(|e| Error::Configuration(format!("malformed category map: {}", e)))?;
        Self::try_from(map)
    }
}

impl TryFrom<BTreeMap<String, bool>> for MutationConfig {
    type Error = Error;

    fn try_from(map: BTreeMap<String, bool>) -> Result<Self> {
        let mut config = MutationConfig::none();
        for (name, enabled) in map {
            let category: Category = name.parse()?;
            if enabled {
                config.enable(category);
            }
        }
        Ok(config)
    }
}

impl From<MutationConfig> for BTreeMap<String, bool> {
    fn from(config: MutationConfig) -> Self {
        Category::ALL
            .into_iter()
            .map(|category| (category.name().to_string(), config.is_enabled(category)))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_round_trip() {
        assert_eq!(Category::ALL.len(), 22);
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.name()));
        }
    }

    #[test]
    fn test_vocabulary_order_matches_ord() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(matches!(
            "arrow direction".parse::<Category>(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            MutationConfig::from_json(r#"{"Bogus": true}"#),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            MutationConfig::from_json("[1, 2]"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_enable_disable() {
        let mut config = MutationConfig::none();
        assert!(!config.is_enabled(Category::ListIndex));
        config.enable(Category::ListIndex);
        assert!(config.is_enabled(Category::ListIndex));
        config.disable(Category::ListIndex);
        assert!(!config.is_enabled(Category::ListIndex));

        let all = MutationConfig::all();
        assert_eq!(all.enabled().count(), 22);
        let only = MutationConfig::only(Category::CaseClause);
        assert_eq!(only.enabled().collect::<Vec<_>>(), vec![Category::CaseClause]);
    }

    #[test]
    fn test_json_map_form() {
        let config = MutationConfig::from_json(
            r#"{"Arrow direction": true, "Label on nodes": false, "Include NULLs": true}"#,
        )
        .unwrap();
        assert!(config.is_enabled(Category::ArrowDirection));
        assert!(!config.is_enabled(Category::LabelOnNodes));
        assert!(config.is_enabled(Category::IncludeNulls));
        assert_eq!(config.enabled().count(), 2);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["Arrow direction"], true);
        assert_eq!(value["MATCH clause"], false);

        let back: MutationConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = MutationConfig::load(Path::new("/nonexistent/categories.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
