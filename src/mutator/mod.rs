// src/mutator/mod.rs
// Mutant generation over the statement tree
//
// Every rule works by path copying: a node function returns its mutated
// replacements, and each parent rebuilds itself around every replacement of a
// child. The input tree is only borrowed, so it is never altered.

mod expressions;
mod patterns;

use crate::config::{Category, MutationConfig};
use crate::cypher::ast::*;
use std::collections::BTreeMap;

/// Replacement subtrees, each tagged with the category that produced it
pub(crate) type Edits<T> = Vec<(Category, T)>;

// ============================================================================
// Public API
// ============================================================================

/// Mutants grouped by category, in vocabulary order. Only enabled categories
/// that produced at least one mutant have an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutantSet {
    by_category: BTreeMap<Category, Vec<Statement>>,
}

impl MutantSet {
    /// Mutants of one category; empty when the category produced none
    pub fn get(&self, category: Category) -> &[Statement] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Statement])> {
        self.by_category
            .iter()
            .map(|(category, mutants)| (*category, mutants.as_slice()))
    }

    /// Total number of mutants across all categories
    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

/// Generate every mutant of `statement` for the categories enabled in `config`
pub fn mutate(statement: &Statement, config: &MutationConfig) -> MutantSet {
    let mutator = Mutator::new(config);

    let mut set = MutantSet::default();
    for (category, mutant) in mutator.statement(statement) {
        set.by_category.entry(category).or_default().push(mutant);
    }

    for (category, mutants) in &set.by_category {
        tracing::debug!(category = %category, count = mutants.len(), "generated mutants");
    }
    set
}

// ============================================================================
// Traversal Plumbing
// ============================================================================

pub(crate) struct Mutator<'a> {
    config: &'a MutationConfig,
}

impl<'a> Mutator<'a> {
    pub(crate) fn new(config: &'a MutationConfig) -> Self {
        Mutator { config }
    }

    /// Materialize a mutant only when its category is enabled
    pub(crate) fn emit<T>(&self, out: &mut Edits<T>, category: Category, make: impl FnOnce() -> T) {
        if self.config.is_enabled(category) {
            out.push((category, make()));
        }
    }

    /// Mutate each item of a list; every edit yields a copy of the list with
    /// that one position replaced
    pub(crate) fn each<T: Clone>(
        &self,
        items: &[T],
        mutate_item: impl Fn(&Self, &T) -> Edits<T>,
    ) -> Edits<Vec<T>> {
        let mut out = Vec::new();
        for (i, item) in items.iter().enumerate() {
            for (category, replacement) in mutate_item(self, item) {
                let mut list = items.to_vec();
                list[i] = replacement;
                out.push((category, list));
            }
        }
        out
    }

    pub(crate) fn boxed(&self, expr: &Expression) -> Edits<Box<Expression>> {
        self.expression(expr)
            .into_iter()
            .map(|(category, e)| (category, Box::new(e)))
            .collect()
    }

    pub(crate) fn optional(&self, expr: Option<&Expression>) -> Edits<Expression> {
        match expr {
            Some(expr) => self.expression(expr),
            None => Vec::new(),
        }
    }

    // ========================================================================
    // Statement and Query
    // ========================================================================

    fn statement(&self, statement: &Statement) -> Edits<Statement> {
        let mut out = Vec::new();
        lift(&mut out, self.query(&statement.body), |body| Statement {
            options: statement.options.clone(),
            body,
        });
        out
    }

    fn query(&self, query: &Query) -> Edits<Query> {
        let mut out = Vec::new();
        let rebuild = |clauses| Query {
            options: query.options.clone(),
            clauses,
        };

        lift(&mut out, self.each(&query.clauses, Self::clause), rebuild);

        let unions: Vec<usize> = query
            .clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| matches!(clause, Clause::Union(_)))
            .map(|(i, _)| i)
            .collect();

        for (n, &i) in unions.iter().enumerate() {
            let Clause::Union(union) = &query.clauses[i] else {
                continue;
            };

            self.emit(&mut out, Category::QueryConcatenation, || {
                let mut clauses = query.clauses.clone();
                clauses[i] = Clause::Union(UnionClause { all: !union.all });
                rebuild(clauses)
            });

            // Left operand runs from the previous union (exclusive) up to this one
            let left_start = if n == 0 { 0 } else { unions[n - 1] + 1 };
            self.emit(&mut out, Category::QueryConcatenation, || {
                let mut clauses = query.clauses.clone();
                clauses.drain(left_start..=i);
                rebuild(clauses)
            });

            // Right operand runs up to the next union (exclusive) or the end
            let right_end = unions.get(n + 1).copied().unwrap_or(query.clauses.len());
            self.emit(&mut out, Category::QueryConcatenation, || {
                let mut clauses = query.clauses.clone();
                clauses.drain(i..right_end);
                rebuild(clauses)
            });
        }

        out
    }

    // ========================================================================
    // Clauses
    // ========================================================================

    fn clause(&self, clause: &Clause) -> Edits<Clause> {
        let mut out = Vec::new();
        match clause {
            Clause::Match(m) => lift(&mut out, self.match_clause(m), Clause::Match),
            Clause::Return(r) => lift(&mut out, self.return_clause(r), Clause::Return),
            Clause::With(w) => lift(&mut out, self.with_clause(w), Clause::With),
            Clause::Unwind(u) => lift(&mut out, self.expression(&u.expression), |expression| {
                Clause::Unwind(UnwindClause {
                    expression,
                    alias: u.alias.clone(),
                })
            }),
            Clause::Call(c) => lift(&mut out, self.each(&c.args, Self::expression), |args| {
                Clause::Call(CallClause {
                    args,
                    ..c.clone()
                })
            }),
            Clause::Union(_) => {}
        }
        out
    }

    fn match_clause(&self, m: &MatchClause) -> Edits<MatchClause> {
        let mut out = Vec::new();

        lift(&mut out, self.pattern(&m.pattern), |pattern| MatchClause {
            pattern,
            ..m.clone()
        });
        lift(&mut out, self.optional(m.predicate.as_ref()), |predicate| {
            MatchClause {
                predicate: Some(predicate),
                ..m.clone()
            }
        });

        self.emit(&mut out, Category::MatchClause, || MatchClause {
            optional: !m.optional,
            ..m.clone()
        });

        out
    }

    fn return_clause(&self, r: &ReturnClause) -> Edits<ReturnClause> {
        let mut out = Vec::new();

        lift(&mut out, self.projections(&r.projections), |projections| {
            ReturnClause {
                projections,
                ..r.clone()
            }
        });
        if let Some(order_by) = &r.order_by {
            lift(&mut out, self.order_by(order_by), |order_by| ReturnClause {
                order_by,
                ..r.clone()
            });
        }
        lift(&mut out, self.optional(r.skip.as_ref()), |skip| ReturnClause {
            skip: Some(skip),
            ..r.clone()
        });
        lift(&mut out, self.optional(r.limit.as_ref()), |limit| ReturnClause {
            limit: Some(limit),
            ..r.clone()
        });

        // CASE WHEN (e IS NULL) THEN 0 ELSE e END
        for (i, projection) in r.projections.iter().enumerate() {
            self.emit(&mut out, Category::NullInResults, || {
                let mut projections = r.projections.clone();
                projections[i].expression = null_to_zero(&projection.expression);
                ReturnClause {
                    projections,
                    ..r.clone()
                }
            });
        }

        self.emit(&mut out, Category::ReturnClause, || ReturnClause {
            distinct: !r.distinct,
            ..r.clone()
        });

        for (skip, limit) in trim_variants(r.skip.as_ref(), r.limit.as_ref()) {
            self.emit(&mut out, Category::TrimmingSection, || ReturnClause {
                skip,
                limit,
                ..r.clone()
            });
        }

        out
    }

    fn with_clause(&self, w: &WithClause) -> Edits<WithClause> {
        let mut out = Vec::new();

        lift(&mut out, self.projections(&w.projections), |projections| {
            WithClause {
                projections,
                ..w.clone()
            }
        });
        if let Some(order_by) = &w.order_by {
            lift(&mut out, self.order_by(order_by), |order_by| WithClause {
                order_by,
                ..w.clone()
            });
        }
        lift(&mut out, self.optional(w.skip.as_ref()), |skip| WithClause {
            skip: Some(skip),
            ..w.clone()
        });
        lift(&mut out, self.optional(w.limit.as_ref()), |limit| WithClause {
            limit: Some(limit),
            ..w.clone()
        });
        lift(&mut out, self.optional(w.predicate.as_ref()), |predicate| {
            WithClause {
                predicate: Some(predicate),
                ..w.clone()
            }
        });

        // WITH borrows RETURN's DISTINCT toggle; the vocabulary has no WITH category
        // and the acceptance cases only ever toggle DISTINCT on RETURN
        self.emit(&mut out, Category::ReturnClause, || WithClause {
            distinct: !w.distinct,
            ..w.clone()
        });

        out
    }

    fn projections(&self, projections: &[Projection]) -> Edits<Vec<Projection>> {
        self.each(projections, |mutator, projection| {
            let mut out = Vec::new();
            lift(&mut out, mutator.expression(&projection.expression), |expression| {
                Projection {
                    expression,
                    alias: projection.alias.clone(),
                }
            });
            out
        })
    }

    /// Sort-key edits plus the ORDER BY rules; `None` drops the whole ORDER BY
    fn order_by(&self, order_by: &OrderBy) -> Edits<Option<OrderBy>> {
        let mut out = Vec::new();
        let items = &order_by.items;

        let sort_keys = self.each(items, |mutator, item| {
            let mut out = Vec::new();
            lift(&mut out, mutator.expression(&item.expression), |expression| {
                SortItem {
                    expression,
                    ascending: item.ascending,
                }
            });
            out
        });
        lift(&mut out, sort_keys, |items| Some(OrderBy { items }));

        if items.len() == 1 {
            self.emit(&mut out, Category::OrderByClause, || None);
        } else {
            for i in 0..items.len() {
                self.emit(&mut out, Category::OrderByClause, || {
                    let mut items = items.clone();
                    items.remove(i);
                    Some(OrderBy { items })
                });
            }
            for i in 1..items.len() {
                self.emit(&mut out, Category::OrderByClause, || {
                    let mut items = items.clone();
                    items.swap(i - 1, i);
                    Some(OrderBy { items })
                });
            }
        }

        for i in 0..items.len() {
            self.emit(&mut out, Category::OrderByClause, || {
                let mut items = items.clone();
                items[i].ascending = !items[i].ascending;
                Some(OrderBy { items })
            });
        }

        out
    }
}

/// Rebuild the parent around every child edit
pub(crate) fn lift<C, P>(out: &mut Edits<P>, edits: Edits<C>, mut rebuild: impl FnMut(C) -> P) {
    out.extend(
        edits
            .into_iter()
            .map(|(category, child)| (category, rebuild(child))),
    );
}

/// CASE WHEN (e IS NULL) THEN 0 ELSE e END
fn null_to_zero(expr: &Expression) -> Expression {
    Expression::Case {
        expression: None,
        alternatives: vec![CaseAlternative {
            predicate: Expression::unary(UnaryOp::IsNull, expr.clone()),
            value: Expression::integer(0),
        }],
        default: Some(Box::new(expr.clone())),
    }
}

/// (skip, limit) replacements for the SKIP/LIMIT trimming rules
fn trim_variants(
    skip: Option<&Expression>,
    limit: Option<&Expression>,
) -> Vec<(Option<Expression>, Option<Expression>)> {
    match (skip.cloned(), limit.cloned()) {
        (Some(s), Some(l)) => vec![
            (Some(l.clone()), Some(s.clone())),
            (None, None),
            (None, Some(l)),
            (Some(s), None),
        ],
        (Some(s), None) => vec![(None, None), (None, Some(s))],
        (None, Some(l)) => vec![(None, None), (Some(l), None)],
        (None, None) => Vec::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::{build, parse_statement};
    use serde_json::Value;
    use std::collections::BTreeSet;

    fn mutants_of(query: &str, category: Category) -> Vec<String> {
        let statement = parse_statement(query).unwrap();
        let set = mutate(&statement, &MutationConfig::only(category));
        let mut texts: Vec<String> = set.get(category).iter().map(|m| build(m).unwrap()).collect();
        texts.sort();
        texts
    }

    /// JSON paths at which two trees differ; an array whose length changed
    /// counts once, at the array itself
    fn differing_paths(a: &Value, b: &Value, path: &str, out: &mut Vec<String>) {
        match (a, b) {
            (Value::Object(x), Value::Object(y)) => {
                let keys: BTreeSet<&String> = x.keys().chain(y.keys()).collect();
                for key in keys {
                    let child = format!("{}/{}", path, key);
                    match (x.get(key), y.get(key)) {
                        (Some(u), Some(v)) => differing_paths(u, v, &child, out),
                        _ => out.push(child),
                    }
                }
            }
            (Value::Array(x), Value::Array(y)) if x.len() == y.len() => {
                for (i, (u, v)) in x.iter().zip(y).enumerate() {
                    differing_paths(u, v, &format!("{}/{}", path, i), out);
                }
            }
            _ if a != b => out.push(path.to_string()),
            _ => {}
        }
    }

    fn sorted(expected: &[&str]) -> Vec<String> {
        let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        expected.sort();
        expected
    }

    #[test]
    fn test_input_tree_unchanged() {
        let queries = [
            "MATCH (a:L1:L2)-[r:T*1..2]->(b) WHERE a.x = 1 RETURN DISTINCT a ORDER BY a.x, a.y SKIP 1 LIMIT 2",
            "WITH CASE 1 WHEN 1 THEN 2 WHEN 3 THEN 4 ELSE 5 END AS x RETURN x UNION RETURN 1 AS x",
        ];
        for query in queries {
            let statement = parse_statement(query).unwrap();
            let before = statement.clone();
            let set = mutate(&statement, &MutationConfig::all());
            assert!(!set.is_empty());
            assert_eq!(statement, before);
        }
    }

    #[test]
    fn test_disabled_categories_absent() {
        let statement = parse_statement("MATCH (a:L)-->(b) RETURN a SKIP 1").unwrap();
        let set = mutate(&statement, &MutationConfig::only(Category::ArrowDirection));
        assert_eq!(set.iter().count(), 1);
        assert_eq!(set.get(Category::ArrowDirection).len(), 2);
        assert!(set.get(Category::LabelOnNodes).is_empty());
        assert!(set.get(Category::TrimmingSection).is_empty());

        let none = mutate(&statement, &MutationConfig::none());
        assert!(none.is_empty());
        assert_eq!(none.total(), 0);
    }

    #[test]
    fn test_result_in_vocabulary_order() {
        let statement = parse_statement("MATCH (a:L)-->(b) RETURN a SKIP 1").unwrap();
        let set = mutate(&statement, &MutationConfig::all());
        let categories: Vec<Category> = set.iter().map(|(category, _)| category).collect();
        let mut sorted_categories = categories.clone();
        sorted_categories.sort();
        assert_eq!(categories, sorted_categories);
        assert!(categories.iter().all(|c| !set.get(*c).is_empty()));
        assert_eq!(
            set.total(),
            set.iter().map(|(_, mutants)| mutants.len()).sum::<usize>()
        );
    }

    #[test]
    fn test_match_clause_toggle() {
        assert_eq!(
            mutants_of("MATCH (a) RETURN a", Category::MatchClause),
            sorted(&["OPTIONAL MATCH (a) RETURN a"])
        );
        assert_eq!(
            mutants_of("OPTIONAL MATCH (a) RETURN a", Category::MatchClause),
            sorted(&["MATCH (a) RETURN a"])
        );
    }

    #[test]
    fn test_trimming_section() {
        assert_eq!(
            mutants_of("MATCH (a) RETURN a SKIP 3 LIMIT 5", Category::TrimmingSection),
            sorted(&[
                "MATCH (a) RETURN a SKIP 5 LIMIT 3",
                "MATCH (a) RETURN a",
                "MATCH (a) RETURN a SKIP 3",
                "MATCH (a) RETURN a LIMIT 5",
            ])
        );
        assert_eq!(
            mutants_of("MATCH (a) RETURN a LIMIT 5", Category::TrimmingSection),
            sorted(&["MATCH (a) RETURN a SKIP 5", "MATCH (a) RETURN a"])
        );
    }

    #[test]
    fn test_order_by_rules() {
        assert!(mutants_of("MATCH (a) RETURN a", Category::OrderByClause).is_empty());
        assert_eq!(
            mutants_of("MATCH (a) WITH a ORDER BY a.x ASC RETURN a", Category::OrderByClause),
            sorted(&[
                "MATCH (a) WITH a RETURN a",
                "MATCH (a) WITH a ORDER BY a.x DESC RETURN a",
            ])
        );
        assert_eq!(
            mutants_of("MATCH (a) RETURN a ORDER BY a.x ASC, a.y DESC", Category::OrderByClause),
            sorted(&[
                "MATCH (a) RETURN a ORDER BY a.x ASC",
                "MATCH (a) RETURN a ORDER BY a.y DESC",
                "MATCH (a) RETURN a ORDER BY a.y DESC, a.x ASC",
                "MATCH (a) RETURN a ORDER BY a.x DESC, a.y DESC",
                "MATCH (a) RETURN a ORDER BY a.x ASC, a.y ASC",
            ])
        );
    }

    #[test]
    fn test_with_distinct_filed_under_return_clause() {
        assert_eq!(
            mutants_of("WITH DISTINCT 1 AS x RETURN x", Category::ReturnClause),
            sorted(&["WITH 1 AS x RETURN x", "WITH DISTINCT 1 AS x RETURN DISTINCT x"])
        );
    }

    #[test]
    fn test_with_has_no_trimming_rules() {
        assert!(mutants_of("MATCH (a) WITH a SKIP 1 RETURN a", Category::TrimmingSection).is_empty());
    }

    #[test]
    fn test_null_in_results() {
        assert_eq!(
            mutants_of("WITH NULL AS x, 1 AS y RETURN x, y AS z", Category::NullInResults),
            sorted(&[
                "WITH NULL AS x, 1 AS y RETURN CASE WHEN (x IS NULL) THEN 0 ELSE x END, y AS z",
                "WITH NULL AS x, 1 AS y RETURN x, CASE WHEN (y IS NULL) THEN 0 ELSE y END AS z",
            ])
        );
    }

    #[test]
    fn test_union_drops_whole_operand() {
        assert_eq!(
            mutants_of(
                "MATCH (a) RETURN a UNION UNWIND [1] AS a RETURN a",
                Category::QueryConcatenation
            ),
            sorted(&[
                "MATCH (a) RETURN a UNION ALL UNWIND [1] AS a RETURN a",
                "UNWIND [1] AS a RETURN a",
                "MATCH (a) RETURN a",
            ])
        );
    }

    #[test]
    fn test_edits_reach_every_clause_kind() {
        assert_eq!(
            mutants_of("UNWIND [1] AS x CALL p.q(2) YIELD y RETURN y", Category::UnaryOperator).len(),
            6
        );
        assert_eq!(
            mutants_of("MATCH (a) WHERE a.x = 1 RETURN a", Category::RelationalOperator).len(),
            7
        );
    }

    #[test]
    fn test_single_substitution_categories_touch_one_position() {
        let statement =
            parse_statement("MATCH (a:A:B)-->(b) WHERE a.x IS NULL RETURN a ORDER BY a.y").unwrap();
        let original = serde_json::to_value(&statement).unwrap();
        let categories = [
            Category::ArrowDirection,
            Category::NullCheckPredicates,
            Category::MatchClause,
            Category::LabelOnNodes,
        ];
        for category in categories {
            let set = mutate(&statement, &MutationConfig::only(category));
            assert!(!set.get(category).is_empty(), "{} produced nothing", category);
            for mutant in set.get(category) {
                let mutated = serde_json::to_value(mutant).unwrap();
                let mut paths = Vec::new();
                differing_paths(&original, &mutated, "", &mut paths);
                assert_eq!(paths.len(), 1, "{}: {:?}", category, paths);
            }
        }
    }
}
