// src/mutator/expressions.rs
// Expression rules: literals, operators, function calls, CASE, list slices

use super::{lift, Edits, Mutator};
use crate::config::Category;
use crate::cypher::ast::*;

const MATH_FUNCTIONS: [&str; 5] = ["abs", "ceil", "floor", "round", "sign"];

/// Aggregates that can stand in for one another
const AGGREGATE_SETS: [&[&str]; 4] = [
    &["avg", "sum"],
    &["stDev", "stDevP"],
    &["collect", "max", "min"],
    &["percentileCont", "percentileDisc"],
];

impl<'a> Mutator<'a> {
    /// Children first, then the node's own rules
    pub(crate) fn expression(&self, expr: &Expression) -> Edits<Expression> {
        let mut out = self.sub_expressions(expr);

        if expr.is_numeric_literal() {
            self.numeric_literal(expr, &mut out);
        }

        match expr {
            Expression::Unary { op, arg } => {
                let flipped = match op {
                    UnaryOp::IsNull => Some(UnaryOp::IsNotNull),
                    UnaryOp::IsNotNull => Some(UnaryOp::IsNull),
                    _ => None,
                };
                if let Some(flipped) = flipped {
                    self.emit(&mut out, Category::NullCheckPredicates, || {
                        Expression::Unary {
                            op: flipped,
                            arg: arg.clone(),
                        }
                    });
                }
            }
            Expression::Binary { op, arg1, arg2 } => self.binary(expr, *op, arg1, arg2, &mut out),
            Expression::Comparison { args, ops } => self.comparison(expr, args, ops, &mut out),
            Expression::Apply {
                func_name,
                distinct,
                args,
            } => self.function_call(func_name, *distinct, args, &mut out),
            Expression::Slice {
                expression,
                start: Some(start),
                end: Some(end),
            } => {
                self.emit(&mut out, Category::ListIndex, || Expression::Slice {
                    expression: expression.clone(),
                    start: None,
                    end: Some(end.clone()),
                });
                self.emit(&mut out, Category::ListIndex, || Expression::Slice {
                    expression: expression.clone(),
                    start: Some(start.clone()),
                    end: None,
                });
            }
            Expression::PredicateFunction {
                kind,
                identifier,
                expression,
                predicate,
            } if *kind != PredicateKind::Filter => {
                for other in PredicateKind::QUANTIFIERS {
                    if other == *kind {
                        continue;
                    }
                    self.emit(&mut out, Category::PredicateFunctions, || {
                        Expression::PredicateFunction {
                            kind: other,
                            identifier: identifier.clone(),
                            expression: expression.clone(),
                            predicate: predicate.clone(),
                        }
                    });
                }
            }
            Expression::Case {
                expression,
                alternatives,
                default,
            } => self.case(expression, alternatives, default, &mut out),
            _ => {}
        }

        out
    }

    // ========================================================================
    // Own Rules
    // ========================================================================

    /// -n, n + 1, n - 1, f(n) and -f(n) for each math function f
    fn numeric_literal(&self, n: &Expression, out: &mut Edits<Expression>) {
        self.emit(out, Category::UnaryOperator, || {
            Expression::unary(UnaryOp::UnaryMinus, n.clone())
        });
        self.emit(out, Category::UnaryOperator, || {
            Expression::binary(BinaryOp::Plus, n.clone(), Expression::integer(1))
        });
        self.emit(out, Category::UnaryOperator, || {
            Expression::binary(BinaryOp::Minus, n.clone(), Expression::integer(1))
        });

        for name in MATH_FUNCTIONS {
            self.emit(out, Category::MathematicalFunctions, || {
                Expression::apply(name, vec![n.clone()])
            });
            self.emit(out, Category::MathematicalFunctions, || {
                Expression::unary(UnaryOp::UnaryMinus, Expression::apply(name, vec![n.clone()]))
            });
        }
    }

    fn binary(
        &self,
        expr: &Expression,
        op: BinaryOp,
        arg1: &Expression,
        arg2: &Expression,
        out: &mut Edits<Expression>,
    ) {
        let swap_op = |out: &mut Edits<Expression>, family: &[BinaryOp], category: Category| {
            for other in family {
                if *other != op {
                    self.emit(out, category, || {
                        Expression::binary(*other, arg1.clone(), arg2.clone())
                    });
                }
            }
        };

        if BinaryOp::EQUALITY.contains(&op) {
            for arg in [arg1, arg2] {
                self.emit(out, Category::IncludeNulls, || or_is_null(expr, arg));
            }

            swap_op(out, &BinaryOp::EQUALITY[..], Category::RelationalOperator);
            for relational in ComparisonOp::ALL {
                self.emit(out, Category::RelationalOperator, || Expression::Comparison {
                    args: vec![arg1.clone(), arg2.clone()],
                    ops: vec![relational],
                });
            }
            self.emit(out, Category::RelationalOperator, || Expression::True);
            self.emit(out, Category::RelationalOperator, || Expression::False);
        } else if BinaryOp::LOGICAL.contains(&op) {
            swap_op(out, &BinaryOp::LOGICAL[..], Category::LogicalOperator);
            self.emit(out, Category::LogicalOperator, || Expression::True);
            self.emit(out, Category::LogicalOperator, || Expression::False);
            self.emit(out, Category::LogicalOperator, || arg1.clone());
            self.emit(out, Category::LogicalOperator, || arg2.clone());
        } else if BinaryOp::MATHEMATICAL.contains(&op) {
            swap_op(out, &BinaryOp::MATHEMATICAL[..], Category::MathematicalOperator);
            self.emit(out, Category::MathematicalOperator, || arg1.clone());
            self.emit(out, Category::MathematicalOperator, || arg2.clone());
        } else if BinaryOp::STRING.contains(&op) {
            swap_op(out, &BinaryOp::STRING[..], Category::StringComparisonOperator);
        }
    }

    fn comparison(
        &self,
        expr: &Expression,
        args: &[Expression],
        ops: &[ComparisonOp],
        out: &mut Edits<Expression>,
    ) {
        let pair = args.len() == 2;

        if pair {
            for arg in args {
                self.emit(out, Category::IncludeNulls, || or_is_null(expr, arg));
            }
        }

        for (i, op) in ops.iter().enumerate() {
            for other in ComparisonOp::ALL {
                if other == *op {
                    continue;
                }
                self.emit(out, Category::RelationalOperator, || {
                    let mut ops = ops.to_vec();
                    ops[i] = other;
                    Expression::Comparison {
                        args: args.to_vec(),
                        ops,
                    }
                });
            }
        }

        if pair {
            for equality in BinaryOp::EQUALITY {
                self.emit(out, Category::RelationalOperator, || {
                    Expression::binary(equality, args[0].clone(), args[1].clone())
                });
            }
        }

        self.emit(out, Category::RelationalOperator, || Expression::True);
        self.emit(out, Category::RelationalOperator, || Expression::False);
    }

    fn function_call(
        &self,
        func_name: &FunctionName,
        distinct: bool,
        args: &[Expression],
        out: &mut Edits<Expression>,
    ) {
        let name = func_name.value.as_str();
        let renamed = |other: &str| Expression::Apply {
            func_name: FunctionName::new(other),
            distinct,
            args: args.to_vec(),
        };

        for set in AGGREGATE_SETS {
            if set.contains(&name) {
                for other in set.iter().filter(|other| **other != name) {
                    self.emit(out, Category::AggregateFunctions, || renamed(*other));
                }
            }
        }

        if name == "count" {
            self.emit(out, Category::AggregateFunctions, || Expression::Apply {
                func_name: func_name.clone(),
                distinct: !distinct,
                args: args.to_vec(),
            });
        }

        if MATH_FUNCTIONS.contains(&name) {
            for other in MATH_FUNCTIONS.iter().filter(|other| **other != name) {
                self.emit(out, Category::MathematicalFunctions, || renamed(*other));
            }
        }
    }

    fn case(
        &self,
        expression: &Option<Box<Expression>>,
        alternatives: &[CaseAlternative],
        default: &Option<Box<Expression>>,
        out: &mut Edits<Expression>,
    ) {
        let rebuild = |alternatives: Vec<CaseAlternative>, default: Option<Box<Expression>>| {
            Expression::Case {
                expression: expression.clone(),
                alternatives,
                default,
            }
        };

        if alternatives.len() >= 2 {
            for i in 0..alternatives.len() {
                self.emit(out, Category::CaseClause, || {
                    let mut alternatives = alternatives.to_vec();
                    alternatives.remove(i);
                    rebuild(alternatives, default.clone())
                });
            }
            // Swap results of neighbouring WHEN branches
            for i in 1..alternatives.len() {
                self.emit(out, Category::CaseClause, || {
                    let mut alternatives = alternatives.to_vec();
                    let value = alternatives[i - 1].value.clone();
                    alternatives[i - 1].value = alternatives[i].value.clone();
                    alternatives[i].value = value;
                    rebuild(alternatives, default.clone())
                });
            }
        }

        if default.is_some() {
            self.emit(out, Category::CaseClause, || rebuild(alternatives.to_vec(), None));
        }
    }

    // ========================================================================
    // Sub-expressions
    // ========================================================================

    fn maybe(&self, expr: &Option<Box<Expression>>) -> Edits<Option<Box<Expression>>> {
        match expr {
            Some(expr) => self
                .boxed(expr)
                .into_iter()
                .map(|(category, e)| (category, Some(e)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Edits of every nested expression, each rebuilt into a copy of `expr`
    fn sub_expressions(&self, expr: &Expression) -> Edits<Expression> {
        let mut out = Vec::new();
        match expr {
            Expression::Unary { op, arg } => {
                lift(&mut out, self.boxed(arg), |arg| Expression::Unary { op: *op, arg })
            }
            Expression::Binary { op, arg1, arg2 } => {
                lift(&mut out, self.boxed(arg1), |arg1| Expression::Binary {
                    op: *op,
                    arg1,
                    arg2: arg2.clone(),
                });
                lift(&mut out, self.boxed(arg2), |arg2| Expression::Binary {
                    op: *op,
                    arg1: arg1.clone(),
                    arg2,
                });
            }
            Expression::Comparison { args, ops } => {
                lift(&mut out, self.each(args, Self::expression), |args| {
                    Expression::Comparison {
                        args,
                        ops: ops.clone(),
                    }
                })
            }
            Expression::Apply {
                func_name,
                distinct,
                args,
            } => lift(&mut out, self.each(args, Self::expression), |args| {
                Expression::Apply {
                    func_name: func_name.clone(),
                    distinct: *distinct,
                    args,
                }
            }),
            Expression::Property {
                expression,
                prop_name,
            } => lift(&mut out, self.boxed(expression), |expression| {
                Expression::Property {
                    expression,
                    prop_name: prop_name.clone(),
                }
            }),
            Expression::Subscript {
                expression,
                subscript,
            } => {
                lift(&mut out, self.boxed(expression), |expression| {
                    Expression::Subscript {
                        expression,
                        subscript: subscript.clone(),
                    }
                });
                lift(&mut out, self.boxed(subscript), |subscript| {
                    Expression::Subscript {
                        expression: expression.clone(),
                        subscript,
                    }
                });
            }
            Expression::Slice {
                expression,
                start,
                end,
            } => {
                lift(&mut out, self.boxed(expression), |expression| Expression::Slice {
                    expression,
                    start: start.clone(),
                    end: end.clone(),
                });
                lift(&mut out, self.maybe(start), |start| Expression::Slice {
                    expression: expression.clone(),
                    start,
                    end: end.clone(),
                });
                lift(&mut out, self.maybe(end), |end| Expression::Slice {
                    expression: expression.clone(),
                    start: start.clone(),
                    end,
                });
            }
            Expression::MapProjection {
                expression,
                selectors,
            } => {
                lift(&mut out, self.boxed(expression), |expression| {
                    Expression::MapProjection {
                        expression,
                        selectors: selectors.clone(),
                    }
                });
                let selector_edits = self.each(selectors, |mutator, selector| {
                    let mut out = Vec::new();
                    if let MapProjectionSelector::Literal {
                        prop_name,
                        expression,
                    } = selector
                    {
                        lift(&mut out, mutator.expression(expression), |expression| {
                            MapProjectionSelector::Literal {
                                prop_name: prop_name.clone(),
                                expression,
                            }
                        });
                    }
                    out
                });
                lift(&mut out, selector_edits, |selectors| Expression::MapProjection {
                    expression: expression.clone(),
                    selectors,
                });
            }
            Expression::ListComprehension {
                identifier,
                expression,
                predicate,
                eval,
            } => {
                let rebuild = |expression, predicate, eval| Expression::ListComprehension {
                    identifier: identifier.clone(),
                    expression,
                    predicate,
                    eval,
                };
                lift(&mut out, self.boxed(expression), |e| {
                    rebuild(e, predicate.clone(), eval.clone())
                });
                lift(&mut out, self.maybe(predicate), |p| {
                    rebuild(expression.clone(), p, eval.clone())
                });
                lift(&mut out, self.maybe(eval), |v| {
                    rebuild(expression.clone(), predicate.clone(), v)
                });
            }
            Expression::PredicateFunction {
                kind,
                identifier,
                expression,
                predicate,
            } => {
                let rebuild = |expression, predicate| Expression::PredicateFunction {
                    kind: *kind,
                    identifier: identifier.clone(),
                    expression,
                    predicate,
                };
                lift(&mut out, self.boxed(expression), |e| rebuild(e, predicate.clone()));
                lift(&mut out, self.boxed(predicate), |p| rebuild(expression.clone(), p));
            }
            Expression::PatternComprehension {
                identifier,
                pattern,
                predicate,
                eval,
            } => {
                let rebuild = |pattern, predicate, eval| Expression::PatternComprehension {
                    identifier: identifier.clone(),
                    pattern,
                    predicate,
                    eval,
                };
                lift(&mut out, self.pattern_path(pattern), |p| {
                    rebuild(p, predicate.clone(), eval.clone())
                });
                lift(&mut out, self.maybe(predicate), |p| {
                    rebuild(pattern.clone(), p, eval.clone())
                });
                lift(&mut out, self.boxed(eval), |v| {
                    rebuild(pattern.clone(), predicate.clone(), v)
                });
            }
            Expression::Case {
                expression,
                alternatives,
                default,
            } => {
                let rebuild = |expression, alternatives, default| Expression::Case {
                    expression,
                    alternatives,
                    default,
                };
                lift(&mut out, self.maybe(expression), |e| {
                    rebuild(e, alternatives.clone(), default.clone())
                });
                let branch_edits = self.each(alternatives, |mutator, alternative| {
                    let mut out = Vec::new();
                    lift(&mut out, mutator.expression(&alternative.predicate), |predicate| {
                        CaseAlternative {
                            predicate,
                            value: alternative.value.clone(),
                        }
                    });
                    lift(&mut out, mutator.expression(&alternative.value), |value| {
                        CaseAlternative {
                            predicate: alternative.predicate.clone(),
                            value,
                        }
                    });
                    out
                });
                lift(&mut out, branch_edits, |a| {
                    rebuild(expression.clone(), a, default.clone())
                });
                lift(&mut out, self.maybe(default), |d| {
                    rebuild(expression.clone(), alternatives.clone(), d)
                });
            }
            Expression::Reduce {
                accumulator,
                init,
                identifier,
                expression,
                eval,
            } => {
                let rebuild = |init, expression, eval| Expression::Reduce {
                    accumulator: accumulator.clone(),
                    init,
                    identifier: identifier.clone(),
                    expression,
                    eval,
                };
                lift(&mut out, self.boxed(init), |i| {
                    rebuild(i, expression.clone(), eval.clone())
                });
                lift(&mut out, self.boxed(expression), |e| {
                    rebuild(init.clone(), e, eval.clone())
                });
                lift(&mut out, self.boxed(eval), |v| {
                    rebuild(init.clone(), expression.clone(), v)
                });
            }
            Expression::Collection { elements } => {
                lift(&mut out, self.each(elements, Self::expression), |elements| {
                    Expression::Collection { elements }
                })
            }
            Expression::Map { entries } => {
                let entry_edits = self.each(entries, |mutator, entry| {
                    let mut out = Vec::new();
                    lift(&mut out, mutator.expression(&entry.value), |value| MapEntry {
                        key: entry.key.clone(),
                        value,
                    });
                    out
                });
                lift(&mut out, entry_edits, |entries| Expression::Map { entries });
            }
            Expression::Labels { expression, labels } => {
                lift(&mut out, self.boxed(expression), |expression| {
                    Expression::Labels {
                        expression,
                        labels: labels.clone(),
                    }
                })
            }
            Expression::Identifier(_)
            | Expression::Parameter(_)
            | Expression::String { .. }
            | Expression::Integer { .. }
            | Expression::Float { .. }
            | Expression::True
            | Expression::False
            | Expression::Null
            | Expression::ApplyAll { .. } => {}
        }
        out
    }
}

/// (whole OR (arg IS NULL))
fn or_is_null(whole: &Expression, arg: &Expression) -> Expression {
    Expression::binary(
        BinaryOp::Or,
        whole.clone(),
        Expression::unary(UnaryOp::IsNull, arg.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MutationConfig;
    use crate::cypher::{build, parse_statement};
    use crate::mutator::mutate;

    fn mutants_of(query: &str, category: Category) -> Vec<String> {
        let statement = parse_statement(query).unwrap();
        let set = mutate(&statement, &MutationConfig::only(category));
        let mut texts: Vec<String> = set.get(category).iter().map(|m| build(m).unwrap()).collect();
        texts.sort();
        texts
    }

    fn sorted(expected: &[&str]) -> Vec<String> {
        let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        expected.sort();
        expected
    }

    #[test]
    fn test_numeric_literal_perturbations() {
        assert_eq!(
            mutants_of("RETURN 2.5 AS x", Category::UnaryOperator),
            sorted(&["RETURN (-2.5) AS x", "RETURN (2.5 + 1) AS x", "RETURN (2.5 - 1) AS x"])
        );
        let math = mutants_of("RETURN 7 AS x", Category::MathematicalFunctions);
        assert_eq!(math.len(), 10);
        assert!(math.contains(&"RETURN abs(7) AS x".to_string()));
        assert!(math.contains(&"RETURN (-sign(7)) AS x".to_string()));
    }

    #[test]
    fn test_non_numeric_literals_untouched() {
        assert!(mutants_of("RETURN 'a' AS x", Category::UnaryOperator).is_empty());
        assert!(mutants_of("RETURN NULL AS x", Category::MathematicalFunctions).is_empty());
    }

    #[test]
    fn test_equality_rules() {
        assert_eq!(
            mutants_of("WITH 1 AS x, 2 AS y RETURN x = y", Category::RelationalOperator),
            sorted(&[
                "WITH 1 AS x, 2 AS y RETURN (x <> y) AS `x = y`",
                "WITH 1 AS x, 2 AS y RETURN (x < y) AS `x = y`",
                "WITH 1 AS x, 2 AS y RETURN (x > y) AS `x = y`",
                "WITH 1 AS x, 2 AS y RETURN (x <= y) AS `x = y`",
                "WITH 1 AS x, 2 AS y RETURN (x >= y) AS `x = y`",
                "WITH 1 AS x, 2 AS y RETURN TRUE AS `x = y`",
                "WITH 1 AS x, 2 AS y RETURN FALSE AS `x = y`",
            ])
        );
        assert_eq!(
            mutants_of("WITH 1 AS x, 2 AS y RETURN x = y", Category::IncludeNulls),
            sorted(&[
                "WITH 1 AS x, 2 AS y RETURN ((x = y) OR (x IS NULL)) AS `x = y`",
                "WITH 1 AS x, 2 AS y RETURN ((x = y) OR (y IS NULL)) AS `x = y`",
            ])
        );
    }

    #[test]
    fn test_comparison_rules() {
        assert_eq!(
            mutants_of("WITH 1 AS x RETURN x < 2", Category::RelationalOperator),
            sorted(&[
                "WITH 1 AS x RETURN (x > 2) AS `x < 2`",
                "WITH 1 AS x RETURN (x <= 2) AS `x < 2`",
                "WITH 1 AS x RETURN (x >= 2) AS `x < 2`",
                "WITH 1 AS x RETURN (x = 2) AS `x < 2`",
                "WITH 1 AS x RETURN (x <> 2) AS `x < 2`",
                "WITH 1 AS x RETURN TRUE AS `x < 2`",
                "WITH 1 AS x RETURN FALSE AS `x < 2`",
            ])
        );
        // Chains get per-position swaps but no equality or NULL rewrites
        let chained = mutants_of("WITH 1 AS x RETURN 0 < x < 2", Category::RelationalOperator);
        assert_eq!(chained.len(), 8);
        assert!(chained.contains(&"WITH 1 AS x RETURN (0 < x >= 2) AS `0 < x < 2`".to_string()));
        assert!(mutants_of("WITH 1 AS x RETURN 0 < x < 2", Category::IncludeNulls).is_empty());
    }

    #[test]
    fn test_logical_rules() {
        assert_eq!(
            mutants_of("WITH TRUE AS a, FALSE AS b RETURN a AND b", Category::LogicalOperator),
            sorted(&[
                "WITH TRUE AS a, FALSE AS b RETURN (a OR b) AS `a AND b`",
                "WITH TRUE AS a, FALSE AS b RETURN (a XOR b) AS `a AND b`",
                "WITH TRUE AS a, FALSE AS b RETURN TRUE AS `a AND b`",
                "WITH TRUE AS a, FALSE AS b RETURN FALSE AS `a AND b`",
                "WITH TRUE AS a, FALSE AS b RETURN a AS `a AND b`",
                "WITH TRUE AS a, FALSE AS b RETURN b AS `a AND b`",
            ])
        );
    }

    #[test]
    fn test_mathematical_and_string_rules() {
        let math = mutants_of("WITH 1 AS a RETURN a * a", Category::MathematicalOperator);
        assert_eq!(math.len(), 7);
        assert!(math.contains(&"WITH 1 AS a RETURN (a ^ a) AS `a * a`".to_string()));
        assert!(math.contains(&"WITH 1 AS a RETURN a AS `a * a`".to_string()));

        assert_eq!(
            mutants_of("WITH 'ab' AS s RETURN s CONTAINS 'a'", Category::StringComparisonOperator),
            sorted(&[
                "WITH 'ab' AS s RETURN (s STARTS WITH 'a') AS `s CONTAINS 'a'`",
                "WITH 'ab' AS s RETURN (s ENDS WITH 'a') AS `s CONTAINS 'a'`",
                "WITH 'ab' AS s RETURN (s =~ 'a') AS `s CONTAINS 'a'`",
            ])
        );
    }

    #[test]
    fn test_null_check_flip() {
        assert_eq!(
            mutants_of("WITH 1 AS x RETURN x IS NULL", Category::NullCheckPredicates),
            sorted(&["WITH 1 AS x RETURN (x IS NOT NULL) AS `x IS NULL`"])
        );
        assert!(mutants_of("WITH TRUE AS x RETURN NOT x", Category::NullCheckPredicates).is_empty());
    }

    #[test]
    fn test_aggregate_rules() {
        assert_eq!(
            mutants_of("MATCH (n) RETURN max(n.x)", Category::AggregateFunctions),
            sorted(&[
                "MATCH (n) RETURN collect(n.x) AS `max(n.x)`",
                "MATCH (n) RETURN min(n.x) AS `max(n.x)`",
            ])
        );
        assert_eq!(
            mutants_of("MATCH (n) RETURN count(n)", Category::AggregateFunctions),
            sorted(&["MATCH (n) RETURN count(DISTINCT n) AS `count(n)`"])
        );
        assert!(mutants_of("MATCH (n) RETURN count(*)", Category::AggregateFunctions).is_empty());
        assert!(mutants_of("MATCH (n) RETURN MAX(n.x)", Category::AggregateFunctions).is_empty());
    }

    #[test]
    fn test_math_function_renames() {
        let renamed = mutants_of("MATCH (n) RETURN floor(n.x)", Category::MathematicalFunctions);
        assert_eq!(
            renamed,
            sorted(&[
                "MATCH (n) RETURN abs(n.x) AS `floor(n.x)`",
                "MATCH (n) RETURN ceil(n.x) AS `floor(n.x)`",
                "MATCH (n) RETURN round(n.x) AS `floor(n.x)`",
                "MATCH (n) RETURN sign(n.x) AS `floor(n.x)`",
            ])
        );
    }

    #[test]
    fn test_list_index() {
        assert_eq!(
            mutants_of("WITH [1, 2, 3] AS l RETURN l[0..2]", Category::ListIndex),
            sorted(&["WITH [1, 2, 3] AS l RETURN l[..2] AS `l[0..2]`", "WITH [1, 2, 3] AS l RETURN l[0..] AS `l[0..2]`"])
        );
        assert!(mutants_of("WITH [1, 2, 3] AS l RETURN l[1..]", Category::ListIndex).is_empty());
        assert!(mutants_of("WITH [1, 2, 3] AS l RETURN l[1]", Category::ListIndex).is_empty());
    }

    #[test]
    fn test_predicate_functions() {
        assert_eq!(
            mutants_of(
                "WITH all(x IN [1, 2, 3] WHERE x >= 0) AS x RETURN x",
                Category::PredicateFunctions
            ),
            sorted(&[
                "WITH any(x IN [1, 2, 3] WHERE (x >= 0)) AS x RETURN x",
                "WITH single(x IN [1, 2, 3] WHERE (x >= 0)) AS x RETURN x",
                "WITH none(x IN [1, 2, 3] WHERE (x >= 0)) AS x RETURN x",
            ])
        );
        assert!(mutants_of(
            "WITH filter(x IN [1, 2] WHERE x > 0) AS x RETURN x",
            Category::PredicateFunctions
        )
        .is_empty());
    }

    #[test]
    fn test_case_rules() {
        assert_eq!(
            mutants_of(
                "RETURN CASE 1 WHEN 1 THEN 'a' WHEN 2 THEN 'b' ELSE 'c' END AS x",
                Category::CaseClause
            ),
            sorted(&[
                "RETURN CASE 1 WHEN 2 THEN 'b' ELSE 'c' END AS x",
                "RETURN CASE 1 WHEN 1 THEN 'a' ELSE 'c' END AS x",
                "RETURN CASE 1 WHEN 1 THEN 'b' WHEN 2 THEN 'a' ELSE 'c' END AS x",
                "RETURN CASE 1 WHEN 1 THEN 'a' WHEN 2 THEN 'b' END AS x",
            ])
        );
        assert!(mutants_of("RETURN CASE WHEN TRUE THEN 1 END AS x", Category::CaseClause).is_empty());
    }

    #[test]
    fn test_nested_expressions_reached() {
        let nested = mutants_of(
            "RETURN reduce(acc = 0, x IN [1] | acc + x) AS s, {k: [y IN [2] WHERE y = 3]} AS m",
            Category::UnaryOperator,
        );
        assert_eq!(nested.len(), 12);
        assert!(nested.contains(&"RETURN reduce(acc = (-0), x IN [1] | (acc + x)) AS s, {k: [y IN [2] WHERE (y = 3)]} AS m".to_string()));
    }
}
