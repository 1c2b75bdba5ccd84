// src/cypher/ast.rs
// Cypher parse tree definitions
//
// Every node type carries the kebab-case type tag used in JSON dumps, e.g.
// {"type": "binary-operator", "op": "equal", "arg1": ..., "arg2": ...}

use serde::{Deserialize, Serialize};

// ============================================================================
// Top-Level
// ============================================================================

/// Root of a parsed query text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "statement")]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<StatementOption>,
    pub body: Query,
}

/// EXPLAIN / PROFILE prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StatementOption {
    Explain,
    Profile,
}

/// A pipeline of clauses; UNION tokens are clauses of their own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "query")]
pub struct Query {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QueryOption>,
    pub clauses: Vec<Clause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QueryOption {
    /// USING PERIODIC COMMIT [limit]
    UsingPeriodicCommit { limit: Option<i64> },
}

// ============================================================================
// Clauses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Clause {
    Match(MatchClause),
    Return(ReturnClause),
    With(WithClause),
    Unwind(UnwindClause),
    Union(UnionClause),
    Call(CallClause),
}

/// MATCH / OPTIONAL MATCH with optional WHERE predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchClause {
    pub optional: bool,
    pub pattern: Pattern,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<MatchHint>,
    #[serde(default)]
    pub predicate: Option<Expression>,
}

/// Planner hints following a MATCH pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum MatchHint {
    UsingIndex {
        identifier: Identifier,
        label: Label,
        prop_name: PropName,
    },
    UsingScan {
        identifier: Identifier,
        label: Label,
    },
    UsingJoin {
        identifiers: Vec<Identifier>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnClause {
    pub distinct: bool,
    /// RETURN *
    #[serde(default)]
    pub include_existing: bool,
    pub projections: Vec<Projection>,
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    #[serde(default)]
    pub skip: Option<Expression>,
    #[serde(default)]
    pub limit: Option<Expression>,
}

/// WITH clause: same projection body as RETURN plus a WHERE predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithClause {
    pub distinct: bool,
    #[serde(default)]
    pub include_existing: bool,
    pub projections: Vec<Projection>,
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    #[serde(default)]
    pub skip: Option<Expression>,
    #[serde(default)]
    pub limit: Option<Expression>,
    #[serde(default)]
    pub predicate: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnwindClause {
    pub expression: Expression,
    pub alias: Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionClause {
    pub all: bool,
}

/// CALL proc.name(args) YIELD ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallClause {
    pub proc_name: ProcName,
    pub args: Vec<Expression>,
    #[serde(default)]
    pub projections: Vec<Projection>,
}

// ============================================================================
// Projections and Ordering
// ============================================================================

/// A single projection item: expression [AS alias]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "projection")]
pub struct Projection {
    pub expression: Expression,
    #[serde(default)]
    pub alias: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "order-by")]
pub struct OrderBy {
    pub items: Vec<SortItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "sort-item")]
pub struct SortItem {
    pub expression: Expression,
    pub ascending: bool,
}

// ============================================================================
// Patterns
// ============================================================================

/// Comma-separated paths of a MATCH clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "pattern")]
pub struct Pattern {
    pub paths: Vec<Path>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Path {
    #[serde(rename = "pattern-path")]
    Simple(PatternPath),
    /// p = (a)-->(b)
    #[serde(rename = "named-path")]
    Named {
        identifier: Identifier,
        path: Box<Path>,
    },
    /// shortestPath(...) when single, allShortestPaths(...) otherwise
    #[serde(rename = "shortest-path")]
    Shortest { single: bool, path: PatternPath },
}

/// Alternating node and relationship patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPath {
    pub elements: Vec<PatternElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternElement {
    #[serde(rename = "node-pattern")]
    Node(NodePattern),
    #[serde(rename = "rel-pattern")]
    Rel(RelPattern),
}

/// (var:Label1:Label2 {prop: value})
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePattern {
    #[serde(default)]
    pub identifier: Option<Identifier>,
    pub labels: Vec<Label>,
    /// Map literal or parameter
    #[serde(default)]
    pub properties: Option<Expression>,
}

/// -[var:TYPE1|TYPE2*1..3 {prop: value}]->
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelPattern {
    pub direction: Direction,
    #[serde(default)]
    pub identifier: Option<Identifier>,
    pub reltypes: Vec<RelType>,
    #[serde(default)]
    pub var_length: Option<Range>,
    #[serde(default)]
    pub properties: Option<Expression>,
}

/// Direction of a relationship pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,       // <-[]-
    Outbound,      // -[]->
    Bidirectional, // -[]-
}

impl Direction {
    pub const ALL: [Direction; 3] = [
        Direction::Inbound,
        Direction::Outbound,
        Direction::Bidirectional,
    ];
}

/// Variable-length bounds; `start == end` denotes a fixed length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "range")]
pub struct Range {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Expression {
    Identifier(Identifier),
    Parameter(Parameter),
    String {
        value: String,
    },
    Integer {
        value: i64,
    },
    Float {
        value: f64,
    },
    True,
    False,
    Null,
    #[serde(rename = "unary-operator")]
    Unary {
        op: UnaryOp,
        arg: Box<Expression>,
    },
    #[serde(rename = "binary-operator")]
    Binary {
        op: BinaryOp,
        arg1: Box<Expression>,
        arg2: Box<Expression>,
    },
    /// Chained comparison: args[0] ops[0] args[1] ops[1] args[2] ...
    Comparison {
        args: Vec<Expression>,
        ops: Vec<ComparisonOp>,
    },
    /// Function call: count(n), sum(DISTINCT n.age)
    #[serde(rename = "apply-operator")]
    Apply {
        func_name: FunctionName,
        distinct: bool,
        args: Vec<Expression>,
    },
    /// count(*)
    #[serde(rename = "apply-all-operator")]
    ApplyAll {
        func_name: FunctionName,
        distinct: bool,
    },
    #[serde(rename = "property-operator")]
    Property {
        expression: Box<Expression>,
        prop_name: PropName,
    },
    #[serde(rename = "subscript-operator")]
    Subscript {
        expression: Box<Expression>,
        subscript: Box<Expression>,
    },
    #[serde(rename = "slice-operator")]
    Slice {
        expression: Box<Expression>,
        #[serde(default)]
        start: Option<Box<Expression>>,
        #[serde(default)]
        end: Option<Box<Expression>>,
    },
    /// n {.name, .age, friends: expr}
    MapProjection {
        expression: Box<Expression>,
        selectors: Vec<MapProjectionSelector>,
    },
    /// [x IN list WHERE pred | eval]
    ListComprehension {
        identifier: Identifier,
        expression: Box<Expression>,
        #[serde(default)]
        predicate: Option<Box<Expression>>,
        #[serde(default)]
        eval: Option<Box<Expression>>,
    },
    /// all/any/single/none/filter(x IN list WHERE pred)
    PredicateFunction {
        kind: PredicateKind,
        identifier: Identifier,
        expression: Box<Expression>,
        predicate: Box<Expression>,
    },
    /// [p = (a)-->(b) WHERE pred | eval]
    PatternComprehension {
        #[serde(default)]
        identifier: Option<Identifier>,
        pattern: PatternPath,
        #[serde(default)]
        predicate: Option<Box<Expression>>,
        eval: Box<Expression>,
    },
    /// Generic form when `expression` is None, simple form otherwise
    Case {
        #[serde(default)]
        expression: Option<Box<Expression>>,
        alternatives: Vec<CaseAlternative>,
        #[serde(default)]
        default: Option<Box<Expression>>,
    },
    /// reduce(acc = init, x IN list | eval)
    Reduce {
        accumulator: Identifier,
        init: Box<Expression>,
        identifier: Identifier,
        expression: Box<Expression>,
        eval: Box<Expression>,
    },
    /// List literal [1, 2, 3]
    Collection {
        elements: Vec<Expression>,
    },
    /// Map literal {key: value}, entries kept in source order
    Map {
        entries: Vec<MapEntry>,
    },
    /// n:Label1:Label2
    #[serde(rename = "labels-operator")]
    Labels {
        expression: Box<Expression>,
        labels: Vec<Label>,
    },
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(name))
    }

    pub fn integer(value: i64) -> Self {
        Expression::Integer { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::String {
            value: value.into(),
        }
    }

    pub fn unary(op: UnaryOp, arg: Expression) -> Self {
        Expression::Unary {
            op,
            arg: Box::new(arg),
        }
    }

    pub fn binary(op: BinaryOp, arg1: Expression, arg2: Expression) -> Self {
        Expression::Binary {
            op,
            arg1: Box::new(arg1),
            arg2: Box::new(arg2),
        }
    }

    /// Plain (non-DISTINCT) function call
    pub fn apply(func_name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Apply {
            func_name: FunctionName::new(func_name),
            distinct: false,
            args,
        }
    }

    pub fn property(expression: Expression, prop_name: impl Into<String>) -> Self {
        Expression::Property {
            expression: Box::new(expression),
            prop_name: PropName::new(prop_name),
        }
    }

    /// Integer and float literals
    pub fn is_numeric_literal(&self) -> bool {
        matches!(self, Expression::Integer { .. } | Expression::Float { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnaryOp {
    UnaryPlus,
    UnaryMinus,
    Not,
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryOp {
    // Arithmetic
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    Pow,
    // Equality
    Equal,
    NotEqual,
    // String-specific comparison
    StartsWith,
    EndsWith,
    Contains,
    Regex,
    // Logical
    And,
    Or,
    Xor,
    // List membership
    In,
}

impl BinaryOp {
    pub const EQUALITY: [BinaryOp; 2] = [BinaryOp::Equal, BinaryOp::NotEqual];
    pub const LOGICAL: [BinaryOp; 3] = [BinaryOp::And, BinaryOp::Or, BinaryOp::Xor];
    pub const MATHEMATICAL: [BinaryOp; 6] = [
        BinaryOp::Plus,
        BinaryOp::Minus,
        BinaryOp::Mult,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Pow,
    ];
    pub const STRING: [BinaryOp; 4] = [
        BinaryOp::StartsWith,
        BinaryOp::EndsWith,
        BinaryOp::Contains,
        BinaryOp::Regex,
    ];
}

/// The four relational operators allowed inside a comparison chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonOp {
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 4] = [
        ComparisonOp::LessThan,
        ComparisonOp::GreaterThan,
        ComparisonOp::LessThanEqual,
        ComparisonOp::GreaterThanEqual,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateKind {
    All,
    Any,
    Single,
    None,
    Filter,
}

impl PredicateKind {
    /// Quantifiers that can be swapped for one another; `filter` is not one of them
    pub const QUANTIFIERS: [PredicateKind; 4] = [
        PredicateKind::All,
        PredicateKind::Any,
        PredicateKind::Single,
        PredicateKind::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PredicateKind::All => "all",
            PredicateKind::Any => "any",
            PredicateKind::Single => "single",
            PredicateKind::None => "none",
            PredicateKind::Filter => "filter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum MapProjectionSelector {
    /// key: expression
    #[serde(rename = "map-projection-literal")]
    Literal {
        prop_name: PropName,
        expression: Expression,
    },
    /// .key
    #[serde(rename = "map-projection-property")]
    Property { prop_name: PropName },
    /// variable
    #[serde(rename = "map-projection-identifier")]
    Identifier { identifier: Identifier },
    /// .*
    #[serde(rename = "map-projection-all-properties")]
    AllProperties,
}

/// WHEN predicate THEN value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseAlternative {
    pub predicate: Expression,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: PropName,
    pub value: Expression,
}

// ============================================================================
// Names
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier { name: name.into() }
    }
}

/// Function name, possibly namespaced (`apoc.coll.sum`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionName {
    pub value: String,
}

impl FunctionName {
    pub fn new(value: impl Into<String>) -> Self {
        FunctionName {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropName {
    pub value: String,
}

impl PropName {
    pub fn new(value: impl Into<String>) -> Self {
        PropName {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelType {
    pub name: String,
}

impl RelType {
    pub fn new(name: impl Into<String>) -> Self {
        RelType { name: name.into() }
    }
}

/// $name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
}

/// Procedure name, usually namespaced (`db.labels`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcName {
    pub value: String,
}

// ============================================================================
// Tests
// ============================================================================
