// src/cypher/builder.rs
// Deterministic unparser: statement tree -> query text
//
// Every operator expression is printed inside one pair of parentheses so the
// output re-parses to the same tree regardless of precedence.

use super::ast::*;
use crate::error::{Error, Result};
use unicode_ident::{is_xid_continue, is_xid_start};

// ============================================================================
// Public API
// ============================================================================

/// Serialize a statement back into Cypher text
pub fn build(statement: &Statement) -> Result<String> {
    if !statement.options.is_empty() {
        return Err(Error::UnsupportedFeature(
            "statement options (EXPLAIN/PROFILE)".to_string(),
        ));
    }
    build_query(&statement.body)
}

/// Serialize a single expression
pub fn build_expression(expr: &Expression) -> Result<String> {
    match expr {
        Expression::Identifier(identifier) => Ok(build_identifier(identifier)),
        Expression::Parameter(parameter) => Ok(format!("${}", id_style(&parameter.name))),
        Expression::String { value } => Ok(build_string(value)),
        Expression::Integer { value } => Ok(value.to_string()),
        Expression::Float { value } => build_float(*value),
        Expression::True => Ok("TRUE".to_string()),
        Expression::False => Ok("FALSE".to_string()),
        Expression::Null => Ok("NULL".to_string()),

        Expression::Unary { op, arg } => {
            let arg = build_expression(arg)?;
            Ok(match op {
                UnaryOp::UnaryPlus => format!("(+{})", arg),
                UnaryOp::UnaryMinus => format!("(-{})", arg),
                UnaryOp::Not => format!("(NOT {})", arg),
                UnaryOp::IsNull => format!("({} IS NULL)", arg),
                UnaryOp::IsNotNull => format!("({} IS NOT NULL)", arg),
            })
        }

        Expression::Binary { op, arg1, arg2 } => Ok(format!(
            "({} {} {})",
            build_expression(arg1)?,
            binary_symbol(*op),
            build_expression(arg2)?
        )),

        Expression::Comparison { args, ops } => {
            if args.len() < 2 || ops.len() + 1 != args.len() {
                return Err(Error::UnsupportedConstruct(format!(
                    "comparison with {} args and {} ops",
                    args.len(),
                    ops.len()
                )));
            }
            let mut text = build_expression(&args[0])?;
            for (op, arg) in ops.iter().zip(&args[1..]) {
                text.push(' ');
                text.push_str(comparison_symbol(*op));
                text.push(' ');
                text.push_str(&build_expression(arg)?);
            }
            Ok(format!("({})", text))
        }

        Expression::Apply {
            func_name,
            distinct,
            args,
        } => Ok(format!(
            "{}({}{})",
            build_function_name(func_name)?,
            if *distinct { "DISTINCT " } else { "" },
            build_list(args)?
        )),

        Expression::ApplyAll {
            func_name,
            distinct,
        } => Ok(format!(
            "{}({})",
            build_function_name(func_name)?,
            if *distinct { "DISTINCT *" } else { "*" }
        )),

        Expression::Property {
            expression,
            prop_name,
        } => Ok(format!(
            "{}.{}",
            build_expression(expression)?,
            id_style(&prop_name.value)
        )),

        Expression::Subscript {
            expression,
            subscript,
        } => Ok(format!(
            "{}[{}]",
            build_expression(expression)?,
            build_expression(subscript)?
        )),

        Expression::Slice {
            expression,
            start,
            end,
        } => Ok(format!(
            "{}[{}..{}]",
            build_expression(expression)?,
            build_optional(start.as_deref())?,
            build_optional(end.as_deref())?
        )),

        Expression::MapProjection {
            expression,
            selectors,
        } => {
            let selectors = selectors
                .iter()
                .map(build_selector)
                .collect::<Result<Vec<_>>>()?;
            Ok(format!(
                "{} {{{}}}",
                build_expression(expression)?,
                selectors.join(", ")
            ))
        }

        Expression::ListComprehension {
            identifier,
            expression,
            predicate,
            eval,
        } => {
            let mut text = format!(
                "[{} IN {}",
                build_identifier(identifier),
                build_expression(expression)?
            );
            if let Some(predicate) = predicate {
                text.push_str(" WHERE ");
                text.push_str(&build_expression(predicate)?);
            }
            if let Some(eval) = eval {
                text.push_str(" | ");
                text.push_str(&build_expression(eval)?);
            }
            text.push(']');
            Ok(text)
        }

        Expression::PredicateFunction {
            kind,
            identifier,
            expression,
            predicate,
        } => Ok(format!(
            "{}({} IN {} WHERE {})",
            kind.name(),
            build_identifier(identifier),
            build_expression(expression)?,
            build_expression(predicate)?
        )),

        Expression::PatternComprehension {
            identifier,
            pattern,
            predicate,
            eval,
        } => {
            let mut text = String::from("[");
            if let Some(identifier) = identifier {
                text.push_str(&build_identifier(identifier));
                text.push_str(" = ");
            }
            text.push_str(&build_pattern_path(pattern)?);
            if let Some(predicate) = predicate {
                text.push_str(" WHERE ");
                text.push_str(&build_expression(predicate)?);
            }
            text.push_str(" | ");
            text.push_str(&build_expression(eval)?);
            text.push(']');
            Ok(text)
        }

        Expression::Case {
            expression,
            alternatives,
            default,
        } => {
            if alternatives.is_empty() {
                return Err(Error::UnsupportedConstruct(
                    "case without alternatives".to_string(),
                ));
            }
            let mut text = String::from("CASE");
            if let Some(expression) = expression {
                text.push(' ');
                text.push_str(&build_expression(expression)?);
            }
            for alternative in alternatives {
                text.push_str(" WHEN ");
                text.push_str(&build_expression(&alternative.predicate)?);
                text.push_str(" THEN ");
                text.push_str(&build_expression(&alternative.value)?);
            }
            if let Some(default) = default {
                text.push_str(" ELSE ");
                text.push_str(&build_expression(default)?);
            }
            text.push_str(" END");
            Ok(text)
        }

        Expression::Reduce {
            accumulator,
            init,
            identifier,
            expression,
            eval,
        } => Ok(format!(
            "reduce({} = {}, {} IN {} | {})",
            build_identifier(accumulator),
            build_expression(init)?,
            build_identifier(identifier),
            build_expression(expression)?,
            build_expression(eval)?
        )),

        Expression::Collection { elements } => Ok(format!("[{}]", build_list(elements)?)),

        Expression::Map { entries } => {
            let entries = entries
                .iter()
                .map(|entry| {
                    Ok(format!(
                        "{}: {}",
                        id_style(&entry.key.value),
                        build_expression(&entry.value)?
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{{{}}}", entries.join(", ")))
        }

        Expression::Labels { expression, labels } => {
            if labels.is_empty() {
                return Err(Error::UnsupportedConstruct(
                    "labels-operator without labels".to_string(),
                ));
            }
            Ok(format!(
                "{}{}",
                build_expression(expression)?,
                build_labels(labels)
            ))
        }
    }
}

// ============================================================================
// Clauses
// ============================================================================

fn build_query(query: &Query) -> Result<String> {
    if !query.options.is_empty() {
        return Err(Error::UnsupportedFeature(
            "query options (USING PERIODIC COMMIT)".to_string(),
        ));
    }
    let clauses = query
        .clauses
        .iter()
        .map(build_clause)
        .collect::<Result<Vec<_>>>()?;
    Ok(clauses.join(" "))
}

fn build_clause(clause: &Clause) -> Result<String> {
    match clause {
        Clause::Match(m) => {
            if !m.hints.is_empty() {
                return Err(Error::UnsupportedFeature("match hints (USING ...)".to_string()));
            }
            let mut text = String::from(if m.optional { "OPTIONAL MATCH " } else { "MATCH " });
            text.push_str(&build_pattern(&m.pattern)?);
            if let Some(predicate) = &m.predicate {
                text.push_str(" WHERE ");
                text.push_str(&build_expression(predicate)?);
            }
            Ok(text)
        }

        Clause::Return(r) => build_projection_body(
            "RETURN",
            r.distinct,
            r.include_existing,
            &r.projections,
            r.order_by.as_ref(),
            r.skip.as_ref(),
            r.limit.as_ref(),
        ),

        Clause::With(w) => {
            let mut text = build_projection_body(
                "WITH",
                w.distinct,
                w.include_existing,
                &w.projections,
                w.order_by.as_ref(),
                w.skip.as_ref(),
                w.limit.as_ref(),
            )?;
            if let Some(predicate) = &w.predicate {
                text.push_str(" WHERE ");
                text.push_str(&build_expression(predicate)?);
            }
            Ok(text)
        }

        Clause::Unwind(u) => Ok(format!(
            "UNWIND {} AS {}",
            build_expression(&u.expression)?,
            build_identifier(&u.alias)
        )),

        Clause::Union(u) => Ok(if u.all { "UNION ALL" } else { "UNION" }.to_string()),

        Clause::Call(c) => {
            let mut text = format!(
                "CALL {}({})",
                dotted_name(&c.proc_name.value, "procedure")?,
                build_list(&c.args)?
            );
            if !c.projections.is_empty() {
                text.push_str(" YIELD ");
                text.push_str(&build_projections(&c.projections)?);
            }
            Ok(text)
        }
    }
}

/// Shared body of RETURN and WITH: [DISTINCT] items [ORDER BY] [SKIP] [LIMIT]
fn build_projection_body(
    keyword: &str,
    distinct: bool,
    include_existing: bool,
    projections: &[Projection],
    order_by: Option<&OrderBy>,
    skip: Option<&Expression>,
    limit: Option<&Expression>,
) -> Result<String> {
    let mut text = String::from(keyword);
    if distinct {
        text.push_str(" DISTINCT");
    }
    text.push(' ');

    let items = build_projections(projections)?;
    match (include_existing, items.is_empty()) {
        (true, true) => text.push('*'),
        (true, false) => {
            text.push_str("*, ");
            text.push_str(&items);
        }
        (false, _) => text.push_str(&items),
    }

    if let Some(order_by) = order_by {
        let items = order_by
            .items
            .iter()
            .map(|item| {
                Ok(format!(
                    "{} {}",
                    build_expression(&item.expression)?,
                    if item.ascending { "ASC" } else { "DESC" }
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        text.push_str(" ORDER BY ");
        text.push_str(&items.join(", "));
    }
    if let Some(skip) = skip {
        text.push_str(" SKIP ");
        text.push_str(&build_expression(skip)?);
    }
    if let Some(limit) = limit {
        text.push_str(" LIMIT ");
        text.push_str(&build_expression(limit)?);
    }

    Ok(text)
}

fn build_projections(projections: &[Projection]) -> Result<String> {
    let items = projections
        .iter()
        .map(|projection| {
            let expression = build_expression(&projection.expression)?;
            Ok(match &projection.alias {
                Some(alias) => format!("{} AS {}", expression, build_identifier(alias)),
                None => expression,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(items.join(", "))
}

// ============================================================================
// Patterns
// ============================================================================

fn build_pattern(pattern: &Pattern) -> Result<String> {
    let paths = pattern
        .paths
        .iter()
        .map(build_path)
        .collect::<Result<Vec<_>>>()?;
    Ok(paths.join(", "))
}

fn build_path(path: &Path) -> Result<String> {
    match path {
        Path::Simple(path) => build_pattern_path(path),
        Path::Named { identifier, path } => Ok(format!(
            "{} = {}",
            build_identifier(identifier),
            build_path(path)?
        )),
        Path::Shortest { single, path } => Ok(format!(
            "{}({})",
            if *single {
                "shortestPath"
            } else {
                "allShortestPaths"
            },
            build_pattern_path(path)?
        )),
    }
}

fn build_pattern_path(path: &PatternPath) -> Result<String> {
    let mut text = String::new();
    for element in &path.elements {
        match element {
            PatternElement::Node(node) => text.push_str(&build_node_pattern(node)?),
            PatternElement::Rel(rel) => text.push_str(&build_rel_pattern(rel)?),
        }
    }
    Ok(text)
}

fn build_node_pattern(node: &NodePattern) -> Result<String> {
    let mut inner = String::new();
    if let Some(identifier) = &node.identifier {
        inner.push_str(&build_identifier(identifier));
    }
    inner.push_str(&build_labels(&node.labels));
    if let Some(properties) = &node.properties {
        if !inner.is_empty() {
            inner.push(' ');
        }
        inner.push_str(&build_expression(properties)?);
    }
    Ok(format!("({})", inner))
}

fn build_rel_pattern(rel: &RelPattern) -> Result<String> {
    let mut detail = String::new();
    if let Some(identifier) = &rel.identifier {
        detail.push_str(&build_identifier(identifier));
    }
    if !rel.reltypes.is_empty() {
        let names: Vec<String> = rel.reltypes.iter().map(|t| id_style(&t.name)).collect();
        detail.push(':');
        detail.push_str(&names.join("|"));
    }
    if let Some(range) = &rel.var_length {
        detail.push_str(&build_range(range));
    }
    if let Some(properties) = &rel.properties {
        if !detail.is_empty() {
            detail.push(' ');
        }
        detail.push_str(&build_expression(properties)?);
    }

    let left = if rel.direction == Direction::Inbound {
        "<-"
    } else {
        "-"
    };
    let right = if rel.direction == Direction::Outbound {
        "->"
    } else {
        "-"
    };

    if detail.is_empty() {
        Ok(format!("{}{}", left, right))
    } else {
        Ok(format!("{}[{}]{}", left, detail, right))
    }
}

/// `*`, `*n` for a fixed length, otherwise `*start..end` with either side optional
fn build_range(range: &Range) -> String {
    match (range.start, range.end) {
        (None, None) => "*".to_string(),
        (Some(start), Some(end)) if start == end => format!("*{}", start),
        (start, end) => format!(
            "*{}..{}",
            start.map(|n| n.to_string()).unwrap_or_default(),
            end.map(|n| n.to_string()).unwrap_or_default()
        ),
    }
}

// ============================================================================
// Leaves and Names
// ============================================================================

fn build_list(expressions: &[Expression]) -> Result<String> {
    let items = expressions
        .iter()
        .map(build_expression)
        .collect::<Result<Vec<_>>>()?;
    Ok(items.join(", "))
}

fn build_optional(expr: Option<&Expression>) -> Result<String> {
    match expr {
        Some(expr) => build_expression(expr),
        None => Ok(String::new()),
    }
}

fn build_selector(selector: &MapProjectionSelector) -> Result<String> {
    Ok(match selector {
        MapProjectionSelector::Literal {
            prop_name,
            expression,
        } => format!("{}: {}", id_style(&prop_name.value), build_expression(expression)?),
        MapProjectionSelector::Property { prop_name } => format!(".{}", id_style(&prop_name.value)),
        MapProjectionSelector::Identifier { identifier } => build_identifier(identifier),
        MapProjectionSelector::AllProperties => ".*".to_string(),
    })
}

fn build_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| format!(":{}", id_style(&label.name)))
        .collect()
}

fn build_identifier(identifier: &Identifier) -> String {
    id_style(&identifier.name)
}

fn build_function_name(name: &FunctionName) -> Result<String> {
    dotted_name(&name.value, "function")
}

/// Namespaced names print segment by segment; a segment needing quotes is rejected
fn dotted_name(value: &str, what: &str) -> Result<String> {
    if value.split('.').all(is_bare_identifier) {
        Ok(value.to_string())
    } else {
        Err(Error::UnsupportedConstruct(format!(
            "{} name `{}`",
            what, value
        )))
    }
}

fn build_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\u{8}', "\\b")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\u{c}', "\\f")
        .replace('\'', "\\'")
        .replace('"', "\\\"");
    format!("'{}'", escaped)
}

fn build_float(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::UnsupportedConstruct(format!("float literal {}", value)));
    }
    let text = value.to_string();
    if text.contains('.') {
        Ok(text)
    } else {
        Ok(format!("{}.0", text))
    }
}

fn binary_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Plus => "+",
        BinaryOp::Minus => "-",
        BinaryOp::Mult => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Pow => "^",
        BinaryOp::Equal => "=",
        BinaryOp::NotEqual => "<>",
        BinaryOp::StartsWith => "STARTS WITH",
        BinaryOp::EndsWith => "ENDS WITH",
        BinaryOp::Contains => "CONTAINS",
        BinaryOp::Regex => "=~",
        BinaryOp::And => "AND",
        BinaryOp::Or => "OR",
        BinaryOp::Xor => "XOR",
        BinaryOp::In => "IN",
    }
}

fn comparison_symbol(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::LessThan => "<",
        ComparisonOp::GreaterThan => ">",
        ComparisonOp::LessThanEqual => "<=",
        ComparisonOp::GreaterThanEqual => ">=",
    }
}

// ============================================================================
// Identifier Style
// ============================================================================

/// Connector punctuation allowed at the start of a bare name besides XID_Start
fn is_extra_start(c: char) -> bool {
    matches!(
        c,
        '_' | '\u{203F}' | '\u{2040}' | '\u{2054}' | '\u{FE33}' | '\u{FE34}' | '\u{FE4D}'..='\u{FE4F}' | '\u{FF3F}'
    )
}

/// Currency symbols allowed inside a bare name besides XID_Continue
fn is_extra_continue(c: char) -> bool {
    matches!(
        c,
        '$' | '\u{00A2}'..='\u{00A5}'
            | '\u{058F}'
            | '\u{060B}'
            | '\u{09F2}'
            | '\u{09F3}'
            | '\u{09FB}'
            | '\u{0AF1}'
            | '\u{0BF9}'
            | '\u{0E3F}'
            | '\u{17DB}'
            | '\u{20A0}'..='\u{20BA}'
            | '\u{A838}'
            | '\u{FDFC}'
            | '\u{FE69}'
            | '\u{FF04}'
            | '\u{FFE0}'
            | '\u{FFE1}'
            | '\u{FFE5}'
            | '\u{FFE6}'
    )
}

pub fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_xid_start(first) || is_extra_start(first) => {
            chars.all(|c| is_xid_continue(c) || is_extra_continue(c))
        }
        _ => false,
    }
}

/// Bare when possible, back-tick quoted otherwise. Back-ticks inside the name
/// are not escaped.
pub fn id_style(name: &str) -> String {
    if is_bare_identifier(name) {
        name.to_string()
    } else {
        format!("`{}`", name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::parse_statement;

    fn rebuild(query: &str) -> String {
        build(&parse_statement(query).unwrap()).unwrap()
    }

    #[test]
    fn test_canonical_forms() {
        assert_eq!(rebuild("MATCH (a)-->(b) RETURN a"), "MATCH (a)-->(b) RETURN a");
        assert_eq!(rebuild("WITH 2 = 1 AS x RETURN x"), "WITH (2 = 1) AS x RETURN x");
        assert_eq!(
            rebuild("MATCH (a) WITH a.x AND a.y OR a.z AS x RETURN x"),
            "MATCH (a) WITH ((a.x AND a.y) OR a.z) AS x RETURN x"
        );
        assert_eq!(
            rebuild("WITH 3 >= 2 > 1 AS x RETURN x"),
            "WITH (3 >= 2 > 1) AS x RETURN x"
        );
        assert_eq!(
            rebuild("WITH [1,2,3][1..2] AS x RETURN x"),
            "WITH [1, 2, 3][1..2] AS x RETURN x"
        );
        assert_eq!(
            rebuild("match (a) return a order by a.x skip 3 limit 5"),
            "MATCH (a) RETURN a ORDER BY a.x ASC SKIP 3 LIMIT 5"
        );
    }

    #[test]
    fn test_relationship_forms() {
        assert_eq!(rebuild("MATCH (a)<--(b) RETURN a"), "MATCH (a)<--(b) RETURN a");
        assert_eq!(rebuild("MATCH (a)--(b) RETURN a"), "MATCH (a)--(b) RETURN a");
        assert_eq!(
            rebuild("MATCH (a)-[s:L1|L2 {w: 1}]->(b:X:Y {n: 'v'}) RETURN a"),
            "MATCH (a)-[s:L1|L2 {w: 1}]->(b:X:Y {n: 'v'}) RETURN a"
        );
        assert_eq!(rebuild("MATCH (a)-[*]->(b) RETURN a"), "MATCH (a)-[*]->(b) RETURN a");
        assert_eq!(rebuild("MATCH (a)-[*2]->(b) RETURN a"), "MATCH (a)-[*2]->(b) RETURN a");
        assert_eq!(
            rebuild("MATCH (a)-[*1..]->(b) RETURN a"),
            "MATCH (a)-[*1..]->(b) RETURN a"
        );
        assert_eq!(
            rebuild("MATCH (a)-[*..2]->(b) RETURN a"),
            "MATCH (a)-[*..2]->(b) RETURN a"
        );
        assert_eq!(
            rebuild("MATCH p = allShortestPaths((a)-[*]-(b)) RETURN p"),
            "MATCH p = allShortestPaths((a)-[*]-(b)) RETURN p"
        );
    }

    #[test]
    fn test_projection_clauses() {
        assert_eq!(
            rebuild("MATCH (a) WITH DISTINCT *, a.x AS x ORDER BY x DESC LIMIT 1 WHERE x > 0 RETURN *"),
            "MATCH (a) WITH DISTINCT *, a.x AS x ORDER BY x DESC LIMIT 1 WHERE (x > 0) RETURN *"
        );
        assert_eq!(
            rebuild("UNWIND [1, 2] AS x RETURN x UNION ALL RETURN 3 AS x"),
            "UNWIND [1, 2] AS x RETURN x UNION ALL RETURN 3 AS x"
        );
        assert_eq!(
            rebuild("CALL db.labels() YIELD label RETURN label"),
            "CALL db.labels() YIELD label RETURN label"
        );
        assert_eq!(
            rebuild("MATCH (a) RETURN a, a.x, count( * )"),
            "MATCH (a) RETURN a, a.x AS `a.x`, count(*) AS `count( * )`"
        );
    }

    /// Printed expressions of the final RETURN, without their aliases
    fn rebuild_returned(query: &str) -> String {
        let statement = parse_statement(query).unwrap();
        match statement.body.clauses.last() {
            Some(Clause::Return(r)) => r
                .projections
                .iter()
                .map(|p| build_expression(&p.expression).unwrap())
                .collect::<Vec<_>>()
                .join(", "),
            other => panic!("Expected RETURN clause, got {:?}", other),
        }
    }

    #[test]
    fn test_expression_forms() {
        assert_eq!(
            rebuild_returned("RETURN CASE WHEN x IS NULL THEN 0 ELSE x END"),
            "CASE WHEN (x IS NULL) THEN 0 ELSE x END"
        );
        assert_eq!(
            rebuild_returned("RETURN any(x IN [1] WHERE x >= 0)"),
            "any(x IN [1] WHERE (x >= 0))"
        );
        assert_eq!(
            rebuild_returned("RETURN reduce(s = 0, x IN [1, 2] | s + x)"),
            "reduce(s = 0, x IN [1, 2] | (s + x))"
        );
        assert_eq!(
            rebuild_returned("RETURN [x IN l WHERE x > 1 | x * 2]"),
            "[x IN l WHERE (x > 1) | (x * 2)]"
        );
        assert_eq!(
            rebuild_returned("MATCH (a) RETURN [p = (a)-->(b) | b.name]"),
            "[p = (a)-->(b) | b.name]"
        );
        assert_eq!(
            rebuild_returned("MATCH (n) RETURN n {.name, .*, k: 1, m}"),
            "n {.name, .*, k: 1, m}"
        );
        assert_eq!(
            rebuild_returned("RETURN count(*), count(DISTINCT x), -1, NOT TRUE, $p, n:L"),
            "count(*), count(DISTINCT x), (-1), (NOT TRUE), $p, n:L"
        );
        assert_eq!(
            rebuild_returned("RETURN 'a' STARTS WITH 'b', l[0], l[..1], {a: NULL}"),
            "('a' STARTS WITH 'b'), l[0], l[..1], {a: NULL}"
        );
    }

    #[test]
    fn test_string_escaping() {
        let expr = Expression::string("a\\b\t'\"\n\r\u{8}\u{c}");
        assert_eq!(
            build_expression(&expr).unwrap(),
            r#"'a\\b\t\'\"\n\r\b\f'"#
        );
    }

    #[test]
    fn test_float_printing() {
        assert_eq!(build_expression(&Expression::Float { value: 0.4 }).unwrap(), "0.4");
        assert_eq!(build_expression(&Expression::Float { value: 2.0 }).unwrap(), "2.0");
        assert!(matches!(
            build_expression(&Expression::Float { value: f64::NAN }),
            Err(Error::UnsupportedConstruct(_))
        ));
    }

    #[test]
    fn test_identifier_style() {
        assert_eq!(id_style("abc"), "abc");
        assert_eq!(id_style("_x1"), "_x1");
        assert_eq!(id_style("ñame"), "ñame");
        assert_eq!(id_style("a$b"), "a$b");
        assert_eq!(id_style("x = y"), "`x = y`");
        assert_eq!(id_style("1abc"), "`1abc`");
        assert_eq!(id_style(""), "``");
        assert_eq!(id_style("a`b"), "`a`b`");
    }

    #[test]
    fn test_quoted_names_round_trip() {
        assert_eq!(
            rebuild("MATCH (`my node`:`Some Label`) RETURN `my node`.`first name` AS name"),
            "MATCH (`my node`:`Some Label`) RETURN `my node`.`first name` AS name"
        );
    }

    #[test]
    fn test_options_and_hints_rejected() {
        let statement = parse_statement("EXPLAIN RETURN 1").unwrap();
        assert!(matches!(build(&statement), Err(Error::UnsupportedFeature(_))));

        let statement = parse_statement("USING PERIODIC COMMIT RETURN 1").unwrap();
        assert!(matches!(build(&statement), Err(Error::UnsupportedFeature(_))));

        let statement = parse_statement("MATCH (a:L) USING SCAN a:L RETURN a").unwrap();
        assert!(matches!(build(&statement), Err(Error::UnsupportedFeature(_))));
    }

    #[test]
    fn test_malformed_shapes_rejected() {
        let comparison = Expression::Comparison {
            args: vec![Expression::integer(1)],
            ops: vec![ComparisonOp::LessThan],
        };
        assert!(matches!(
            build_expression(&comparison),
            Err(Error::UnsupportedConstruct(_))
        ));

        let case = Expression::Case {
            expression: None,
            alternatives: vec![],
            default: None,
        };
        assert!(matches!(build_expression(&case), Err(Error::UnsupportedConstruct(_))));

        let call = Expression::apply("my func", vec![]);
        assert!(matches!(build_expression(&call), Err(Error::UnsupportedConstruct(_))));
    }

    #[test]
    fn test_round_trip_is_stable() {
        let queries = [
            "MATCH (a)-[r:KNOWS*1..3]->(b) WHERE a.age > 30 AND b.name STARTS WITH 'A' RETURN DISTINCT a, count(b) AS n ORDER BY n DESC SKIP 1 LIMIT 10",
            "MATCH (a) WITH CASE a.num WHEN 1 THEN 10 ELSE 0 END AS x RETURN x",
            "WITH [x IN range(1, 10) WHERE x % 2 = 0 | x ^ 2] AS l UNWIND l AS y RETURN y",
            "OPTIONAL MATCH p = (a)<-[:R]-(b {k: $v}) RETURN nodes(p)[0..1], a:Person",
        ];
        for query in queries {
            let first = rebuild(query);
            let second = rebuild(&first);
            assert_eq!(first, second);
            assert_eq!(
                parse_statement(query).unwrap(),
                parse_statement(&first).unwrap()
            );
        }
    }
}
