// src/cypher/parser.rs
// Recursive-descent Cypher parser producing the statement tree in ast.rs
//
// Operator precedence, lowest first:
//   OR < XOR < AND < NOT < comparison chain < string/list/null predicates
//   < additive < multiplicative < power < unary sign < postfix (. [] :) < atom

use super::ast::*;
use super::tokenizer::{lex_cypher, CypherToken, Lexeme};

// ============================================================================
// Parser
// ============================================================================

pub struct CypherParser {
    source: Vec<char>,
    tokens: Vec<Lexeme>,
    pos: usize,
}

/// Operator found between two operands of a comparison chain
enum ChainOp {
    Equality(BinaryOp),
    Relational(ComparisonOp),
}

impl CypherParser {
    pub fn new(source: &str, tokens: Vec<Lexeme>) -> Self {
        CypherParser {
            source: source.chars().collect(),
            tokens,
            pos: 0,
        }
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    fn peek(&self) -> Option<&CypherToken> {
        self.tokens.get(self.pos).map(|lexeme| &lexeme.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&CypherToken> {
        self.tokens.get(self.pos + offset).map(|lexeme| &lexeme.token)
    }

    fn advance(&mut self) -> Option<&CypherToken> {
        let token = self.tokens.get(self.pos).map(|lexeme| &lexeme.token);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &CypherToken) -> Result<(), String> {
        match self.peek() {
            Some(t) if t == expected => {
                self.advance();
                Ok(())
            }
            Some(t) => Err(format!("Expected {:?}, found {:?}", expected, t)),
            None => Err(format!("Expected {:?}, but reached end of query", expected)),
        }
    }

    fn has_tokens(&self) -> bool {
        self.pos < self.tokens.len()
    }

    /// Check if current position matches a token
    fn check(&self, token: &CypherToken) -> bool {
        self.peek() == Some(token)
    }

    /// Consume the token if it is next; report whether it was
    fn consume(&mut self, token: &CypherToken) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Identifier or keyword usable as a name at the given offset
    fn is_name_at(&self, offset: usize) -> bool {
        self.peek_at(offset)
            .is_some_and(|t| matches!(t, CypherToken::Identifier(_)) || t.is_keyword())
    }

    /// Symbolic name in a position where keywords are ordinary names
    /// (property keys, labels, relationship types, map keys, aliases)
    fn parse_symbolic_name(&mut self, what: &str) -> Result<String, String> {
        let name = match self.tokens.get(self.pos) {
            Some(Lexeme {
                token: CypherToken::Identifier(name),
                ..
            }) => name.clone(),
            Some(lexeme) if lexeme.token.is_keyword() => lexeme.text.clone(),
            Some(lexeme) => return Err(format!("Expected {}, found {:?}", what, lexeme.token)),
            None => return Err(format!("Expected {}, but reached end of query", what)),
        };
        self.pos += 1;
        Ok(name)
    }

    /// Variable name: identifiers only, keywords are not accepted here
    fn parse_identifier(&mut self) -> Result<Identifier, String> {
        match self.peek().cloned() {
            Some(CypherToken::Identifier(name)) => {
                self.advance();
                Ok(Identifier::new(name))
            }
            Some(t) => Err(format!("Expected identifier, found {:?}", t)),
            None => Err("Expected identifier, but reached end of query".to_string()),
        }
    }

    fn parse_alias(&mut self) -> Result<Option<Identifier>, String> {
        if self.consume(&CypherToken::As) {
            Ok(Some(Identifier::new(self.parse_symbolic_name("alias")?)))
        } else {
            Ok(None)
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse every `;`-separated statement in the input
    pub fn parse_statements(&mut self) -> Result<Vec<Statement>, String> {
        let mut statements = Vec::new();

        while self.has_tokens() {
            if self.consume(&CypherToken::Semicolon) {
                continue;
            }
            statements.push(self.parse_statement()?);
            if self.has_tokens() {
                self.expect(&CypherToken::Semicolon)?;
            }
        }

        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, String> {
        let mut options = Vec::new();
        loop {
            match self.peek() {
                Some(CypherToken::Explain) => options.push(StatementOption::Explain),
                Some(CypherToken::Profile) => options.push(StatementOption::Profile),
                _ => break,
            }
            self.advance();
        }

        let body = self.parse_query()?;
        Ok(Statement { options, body })
    }

    fn parse_query(&mut self) -> Result<Query, String> {
        let mut options = Vec::new();
        if self.check(&CypherToken::Using) && self.peek_at(1) == Some(&CypherToken::Periodic) {
            self.advance();
            self.advance();
            self.expect(&CypherToken::Commit)?;
            let limit = match self.peek() {
                Some(CypherToken::IntLit(n)) => {
                    let n = *n;
                    self.advance();
                    Some(n)
                }
                _ => None,
            };
            options.push(QueryOption::UsingPeriodicCommit { limit });
        }

        let mut clauses = Vec::new();
        loop {
            let clause = match self.peek() {
                Some(CypherToken::Match) => self.parse_match_clause(false)?,
                Some(CypherToken::Optional) => {
                    self.advance();
                    self.parse_match_clause(true)?
                }
                Some(CypherToken::With) => self.parse_with_clause()?,
                Some(CypherToken::Return) => self.parse_return_clause()?,
                Some(CypherToken::Unwind) => self.parse_unwind_clause()?,
                Some(CypherToken::Union) => self.parse_union_clause()?,
                Some(CypherToken::Call) => self.parse_call_clause()?,
                Some(
                    t @ (CypherToken::Create
                    | CypherToken::Merge
                    | CypherToken::Set
                    | CypherToken::Delete
                    | CypherToken::Detach
                    | CypherToken::Remove
                    | CypherToken::Foreach),
                ) => {
                    return Err(format!("Update clauses are not supported: {:?}", t));
                }
                Some(CypherToken::Semicolon) | None => break,
                Some(t) => return Err(format!("Unexpected token at start of clause: {:?}", t)),
            };
            clauses.push(clause);
        }

        if clauses.is_empty() {
            return Err("Query contains no clauses".to_string());
        }

        Ok(Query { options, clauses })
    }

    // ========================================================================
    // MATCH Clause
    // ========================================================================

    fn parse_match_clause(&mut self, optional: bool) -> Result<Clause, String> {
        self.expect(&CypherToken::Match)?;
        let pattern = self.parse_pattern()?;

        let mut hints = Vec::new();
        while self.consume(&CypherToken::Using) {
            hints.push(self.parse_match_hint()?);
        }

        let predicate = if self.consume(&CypherToken::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Clause::Match(MatchClause {
            optional,
            pattern,
            hints,
            predicate,
        }))
    }

    /// USING INDEX n:Label(prop) | USING SCAN n:Label | USING JOIN ON a, b
    fn parse_match_hint(&mut self) -> Result<MatchHint, String> {
        match self.peek() {
            Some(CypherToken::Index) => {
                self.advance();
                let identifier = self.parse_identifier()?;
                self.expect(&CypherToken::Colon)?;
                let label = Label::new(self.parse_symbolic_name("label")?);
                self.expect(&CypherToken::LParen)?;
                let prop_name = PropName::new(self.parse_symbolic_name("property name")?);
                self.expect(&CypherToken::RParen)?;
                Ok(MatchHint::UsingIndex {
                    identifier,
                    label,
                    prop_name,
                })
            }
            Some(CypherToken::Scan) => {
                self.advance();
                let identifier = self.parse_identifier()?;
                self.expect(&CypherToken::Colon)?;
                let label = Label::new(self.parse_symbolic_name("label")?);
                Ok(MatchHint::UsingScan { identifier, label })
            }
            Some(CypherToken::Join) => {
                self.advance();
                self.expect(&CypherToken::On)?;
                let mut identifiers = vec![self.parse_identifier()?];
                while self.consume(&CypherToken::Comma) {
                    identifiers.push(self.parse_identifier()?);
                }
                Ok(MatchHint::UsingJoin { identifiers })
            }
            Some(t) => Err(format!("Expected INDEX, SCAN or JOIN after USING, found {:?}", t)),
            None => Err("Expected INDEX, SCAN or JOIN after USING".to_string()),
        }
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    fn parse_pattern(&mut self) -> Result<Pattern, String> {
        let mut paths = vec![self.parse_path()?];
        while self.consume(&CypherToken::Comma) {
            paths.push(self.parse_path()?);
        }
        Ok(Pattern { paths })
    }

    fn parse_path(&mut self) -> Result<Path, String> {
        if matches!(self.peek(), Some(CypherToken::Identifier(_)))
            && self.peek_at(1) == Some(&CypherToken::Equals)
        {
            let identifier = self.parse_identifier()?;
            self.advance(); // =
            let path = self.parse_anonymous_path()?;
            return Ok(Path::Named {
                identifier,
                path: Box::new(path),
            });
        }
        self.parse_anonymous_path()
    }

    fn parse_anonymous_path(&mut self) -> Result<Path, String> {
        if let Some(CypherToken::Identifier(name)) = self.peek() {
            let lower = name.to_lowercase();
            if (lower == "shortestpath" || lower == "allshortestpaths")
                && self.peek_at(1) == Some(&CypherToken::LParen)
            {
                let single = lower == "shortestpath";
                self.advance();
                self.advance(); // (
                let path = self.parse_pattern_path()?;
                self.expect(&CypherToken::RParen)?;
                return Ok(Path::Shortest { single, path });
            }
        }
        Ok(Path::Simple(self.parse_pattern_path()?))
    }

    /// (a)-[r]->(b)<-(c) ...
    fn parse_pattern_path(&mut self) -> Result<PatternPath, String> {
        let mut elements = vec![PatternElement::Node(self.parse_node_pattern()?)];

        while self.check(&CypherToken::Dash)
            || (self.check(&CypherToken::LessThan) && self.peek_at(1) == Some(&CypherToken::Dash))
        {
            elements.push(PatternElement::Rel(self.parse_rel_pattern()?));
            elements.push(PatternElement::Node(self.parse_node_pattern()?));
        }

        Ok(PatternPath { elements })
    }

    fn parse_node_pattern(&mut self) -> Result<NodePattern, String> {
        self.expect(&CypherToken::LParen)?;

        let identifier = match self.peek() {
            Some(CypherToken::Identifier(_)) => Some(self.parse_identifier()?),
            _ => None,
        };

        let mut labels = Vec::new();
        while self.consume(&CypherToken::Colon) {
            labels.push(Label::new(self.parse_symbolic_name("label")?));
        }

        let properties = self.parse_pattern_properties()?;
        self.expect(&CypherToken::RParen)?;

        Ok(NodePattern {
            identifier,
            labels,
            properties,
        })
    }

    /// Arrow forms: -->, <--, --, -[...]->, <-[...]-, -[...]-, <-->
    fn parse_rel_pattern(&mut self) -> Result<RelPattern, String> {
        let left_arrow = self.consume(&CypherToken::LessThan);
        self.expect(&CypherToken::Dash)?;

        let mut identifier = None;
        let mut reltypes = Vec::new();
        let mut var_length = None;
        let mut properties = None;

        if self.consume(&CypherToken::LBracket) {
            if matches!(self.peek(), Some(CypherToken::Identifier(_))) {
                identifier = Some(self.parse_identifier()?);
            }
            if self.consume(&CypherToken::Colon) {
                reltypes.push(RelType::new(self.parse_symbolic_name("relationship type")?));
                while self.consume(&CypherToken::Pipe) {
                    self.consume(&CypherToken::Colon);
                    reltypes.push(RelType::new(self.parse_symbolic_name("relationship type")?));
                }
            }
            if self.consume(&CypherToken::Star) {
                var_length = Some(self.parse_range()?);
            }
            properties = self.parse_pattern_properties()?;
            self.expect(&CypherToken::RBracket)?;
        }

        self.expect(&CypherToken::Dash)?;
        let right_arrow = self.consume(&CypherToken::GreaterThan);

        let direction = match (left_arrow, right_arrow) {
            (true, false) => Direction::Inbound,
            (false, true) => Direction::Outbound,
            _ => Direction::Bidirectional,
        };

        Ok(RelPattern {
            direction,
            identifier,
            reltypes,
            var_length,
            properties,
        })
    }

    /// Range after `*`: empty, `n`, `n..`, `..m` or `n..m`
    fn parse_range(&mut self) -> Result<Range, String> {
        let start = self.parse_range_bound();
        if self.consume(&CypherToken::DotDot) {
            let end = self.parse_range_bound();
            Ok(Range { start, end })
        } else {
            Ok(Range { start, end: start })
        }
    }

    fn parse_range_bound(&mut self) -> Option<i64> {
        match self.peek() {
            Some(CypherToken::IntLit(n)) => {
                let n = *n;
                self.advance();
                Some(n)
            }
            _ => None,
        }
    }

    /// Property map or parameter inside a node or relationship pattern
    fn parse_pattern_properties(&mut self) -> Result<Option<Expression>, String> {
        match self.peek().cloned() {
            Some(CypherToken::LBrace) => Ok(Some(self.parse_map_literal()?)),
            Some(CypherToken::Parameter(name)) => {
                self.advance();
                Ok(Some(Expression::Parameter(Parameter { name })))
            }
            _ => Ok(None),
        }
    }

    /// Lookahead at `(`: is this a relationship pattern used as a predicate?
    fn looks_like_pattern_predicate(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;
        while let Some(token) = self.peek_at(offset) {
            match token {
                CypherToken::LParen => depth += 1,
                CypherToken::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            offset += 1;
        }

        match (self.peek_at(offset + 1), self.peek_at(offset + 2)) {
            (Some(CypherToken::LessThan), Some(CypherToken::Dash)) => true,
            (Some(CypherToken::Dash), Some(CypherToken::LBracket)) => true,
            (Some(CypherToken::Dash), Some(CypherToken::Dash)) => matches!(
                self.peek_at(offset + 3),
                Some(CypherToken::LParen) | Some(CypherToken::GreaterThan)
            ),
            _ => false,
        }
    }

    // ========================================================================
    // RETURN / WITH
    // ========================================================================

    fn parse_return_clause(&mut self) -> Result<Clause, String> {
        self.expect(&CypherToken::Return)?;
        let distinct = self.consume(&CypherToken::Distinct);
        let (include_existing, projections) = self.parse_projections()?;
        let order_by = self.parse_order_by()?;
        let skip = self.parse_trim(&CypherToken::Skip)?;
        let limit = self.parse_trim(&CypherToken::Limit)?;

        Ok(Clause::Return(ReturnClause {
            distinct,
            include_existing,
            projections,
            order_by,
            skip,
            limit,
        }))
    }

    fn parse_with_clause(&mut self) -> Result<Clause, String> {
        self.expect(&CypherToken::With)?;
        let distinct = self.consume(&CypherToken::Distinct);
        let (include_existing, projections) = self.parse_projections()?;
        let order_by = self.parse_order_by()?;
        let skip = self.parse_trim(&CypherToken::Skip)?;
        let limit = self.parse_trim(&CypherToken::Limit)?;
        let predicate = if self.consume(&CypherToken::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Clause::With(WithClause {
            distinct,
            include_existing,
            projections,
            order_by,
            skip,
            limit,
            predicate,
        }))
    }

    /// `*`, `*, items...` or `items...`
    fn parse_projections(&mut self) -> Result<(bool, Vec<Projection>), String> {
        let mut projections = Vec::new();
        let include_existing = self.consume(&CypherToken::Star);
        if include_existing && !self.consume(&CypherToken::Comma) {
            return Ok((true, projections));
        }

        projections.push(self.parse_projection()?);
        while self.consume(&CypherToken::Comma) {
            projections.push(self.parse_projection()?);
        }

        Ok((include_existing, projections))
    }

    /// A projection without `AS` is named after its source text,
    /// unless it is a bare variable
    fn parse_projection(&mut self) -> Result<Projection, String> {
        let first = self.pos;
        let expression = self.parse_expression()?;
        let text = self.source_text(first, self.pos);
        let alias = match self.parse_alias()? {
            Some(alias) => Some(alias),
            None if matches!(expression, Expression::Identifier(_)) => None,
            None => text.map(Identifier::new),
        };
        Ok(Projection { expression, alias })
    }

    /// Query text covered by the tokens `first..last`
    fn source_text(&self, first: usize, last: usize) -> Option<String> {
        if first >= last {
            return None;
        }
        let start = self.tokens.get(first)?.start;
        let end = self.tokens.get(last - 1)?.end;
        Some(self.source.get(start..end)?.iter().collect())
    }

    fn parse_order_by(&mut self) -> Result<Option<OrderBy>, String> {
        if !self.consume(&CypherToken::Order) {
            return Ok(None);
        }
        self.expect(&CypherToken::By)?;

        let mut items = vec![self.parse_sort_item()?];
        while self.consume(&CypherToken::Comma) {
            items.push(self.parse_sort_item()?);
        }

        Ok(Some(OrderBy { items }))
    }

    fn parse_sort_item(&mut self) -> Result<SortItem, String> {
        let expression = self.parse_expression()?;

        let ascending = match self.peek() {
            Some(CypherToken::Asc) => {
                self.advance();
                true
            }
            Some(CypherToken::Desc) => {
                self.advance();
                false
            }
            _ => true, // default ascending
        };

        Ok(SortItem {
            expression,
            ascending,
        })
    }

    /// SKIP / LIMIT expression
    fn parse_trim(&mut self, keyword: &CypherToken) -> Result<Option<Expression>, String> {
        if self.consume(keyword) {
            Ok(Some(self.parse_expression()?))
        } else {
            Ok(None)
        }
    }

    // ========================================================================
    // UNWIND / UNION / CALL
    // ========================================================================

    fn parse_unwind_clause(&mut self) -> Result<Clause, String> {
        self.expect(&CypherToken::Unwind)?;
        let expression = self.parse_expression()?;
        self.expect(&CypherToken::As)?;
        let alias = Identifier::new(self.parse_symbolic_name("alias after UNWIND ... AS")?);
        Ok(Clause::Unwind(UnwindClause { expression, alias }))
    }

    fn parse_union_clause(&mut self) -> Result<Clause, String> {
        self.expect(&CypherToken::Union)?;
        let all = self.consume(&CypherToken::All);
        Ok(Clause::Union(UnionClause { all }))
    }

    fn parse_call_clause(&mut self) -> Result<Clause, String> {
        self.expect(&CypherToken::Call)?;
        if self.check(&CypherToken::LBrace) {
            return Err("CALL subqueries are not supported".to_string());
        }

        let mut segments = vec![self.parse_symbolic_name("procedure name")?];
        while self.consume(&CypherToken::Dot) {
            segments.push(self.parse_symbolic_name("procedure name")?);
        }
        let proc_name = ProcName {
            value: segments.join("."),
        };

        self.expect(&CypherToken::LParen)?;
        let args = self.parse_argument_list()?;

        let mut projections = Vec::new();
        if self.consume(&CypherToken::Yield) {
            loop {
                let name = self.parse_symbolic_name("YIELD field")?;
                let alias = self.parse_alias()?;
                projections.push(Projection {
                    expression: Expression::identifier(name),
                    alias,
                });
                if !self.consume(&CypherToken::Comma) {
                    break;
                }
            }
        }

        Ok(Clause::Call(CallClause {
            proc_name,
            args,
            projections,
        }))
    }

    /// Comma-separated arguments up to and including the closing `)`
    fn parse_argument_list(&mut self) -> Result<Vec<Expression>, String> {
        let mut args = Vec::new();
        if !self.check(&CypherToken::RParen) {
            args.push(self.parse_expression()?);
            while self.consume(&CypherToken::Comma) {
                args.push(self.parse_expression()?);
            }
        }
        self.expect(&CypherToken::RParen)?;
        Ok(args)
    }

    // ========================================================================
    // Expression Parser
    // ========================================================================

    fn parse_expression(&mut self) -> Result<Expression, String> {
        self.parse_or_expression()
    }

    fn parse_or_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.parse_xor_expression()?;
        while self.consume(&CypherToken::Or) {
            let right = self.parse_xor_expression()?;
            left = Expression::binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_xor_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.parse_and_expression()?;
        while self.consume(&CypherToken::Xor) {
            let right = self.parse_and_expression()?;
            left = Expression::binary(BinaryOp::Xor, left, right);
        }
        Ok(left)
    }

    fn parse_and_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.parse_not_expression()?;
        while self.consume(&CypherToken::And) {
            let right = self.parse_not_expression()?;
            left = Expression::binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not_expression(&mut self) -> Result<Expression, String> {
        if self.consume(&CypherToken::Not) {
            let inner = self.parse_not_expression()?;
            return Ok(Expression::unary(UnaryOp::Not, inner));
        }
        self.parse_comparison_expression()
    }

    /// A single `=`/`<>` yields a binary operator; `<`, `>`, `<=`, `>=` chains
    /// yield one comparison node
    fn parse_comparison_expression(&mut self) -> Result<Expression, String> {
        let first = self.parse_predicate_expression()?;

        let mut args = vec![first];
        let mut ops = Vec::new();
        loop {
            let op = match self.peek() {
                Some(CypherToken::Equals) => ChainOp::Equality(BinaryOp::Equal),
                Some(CypherToken::NotEquals) => ChainOp::Equality(BinaryOp::NotEqual),
                Some(CypherToken::LessThan) => ChainOp::Relational(ComparisonOp::LessThan),
                Some(CypherToken::GreaterThan) => ChainOp::Relational(ComparisonOp::GreaterThan),
                Some(CypherToken::LessThanEquals) => {
                    ChainOp::Relational(ComparisonOp::LessThanEqual)
                }
                Some(CypherToken::GreaterThanEquals) => {
                    ChainOp::Relational(ComparisonOp::GreaterThanEqual)
                }
                _ => break,
            };
            self.advance();
            args.push(self.parse_predicate_expression()?);
            ops.push(op);
        }

        if ops.is_empty() {
            return Ok(args.remove(0));
        }

        if ops.len() == 1 {
            if let ChainOp::Equality(op) = ops[0] {
                let arg2 = args.remove(1);
                let arg1 = args.remove(0);
                return Ok(Expression::binary(op, arg1, arg2));
            }
        }

        let mut relational = Vec::with_capacity(ops.len());
        for op in ops {
            match op {
                ChainOp::Relational(op) => relational.push(op),
                ChainOp::Equality(_) => {
                    return Err(
                        "Comparison chains mixing = or <> with other operators are not supported"
                            .to_string(),
                    );
                }
            }
        }

        Ok(Expression::Comparison {
            args,
            ops: relational,
        })
    }

    /// STARTS WITH, ENDS WITH, CONTAINS, =~, IN, IS [NOT] NULL
    fn parse_predicate_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.parse_additive_expression()?;

        loop {
            let op = match self.peek() {
                Some(CypherToken::StartsWith) => {
                    self.advance();
                    self.expect(&CypherToken::With)?;
                    BinaryOp::StartsWith
                }
                Some(CypherToken::EndsWith) => {
                    self.advance();
                    self.expect(&CypherToken::With)?;
                    BinaryOp::EndsWith
                }
                Some(CypherToken::Contains) => {
                    self.advance();
                    BinaryOp::Contains
                }
                Some(CypherToken::RegexMatch) => {
                    self.advance();
                    BinaryOp::Regex
                }
                Some(CypherToken::In) => {
                    self.advance();
                    BinaryOp::In
                }
                Some(CypherToken::Is) => {
                    self.advance();
                    let negated = self.consume(&CypherToken::Not);
                    self.expect(&CypherToken::Null)?;
                    let op = if negated {
                        UnaryOp::IsNotNull
                    } else {
                        UnaryOp::IsNull
                    };
                    left = Expression::unary(op, left);
                    continue;
                }
                _ => break,
            };
            let right = self.parse_additive_expression()?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let op = match self.peek() {
                Some(CypherToken::Plus) => BinaryOp::Plus,
                Some(CypherToken::Dash) => BinaryOp::Minus,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.parse_power_expression()?;

        loop {
            let op = match self.peek() {
                Some(CypherToken::Star) => BinaryOp::Mult,
                Some(CypherToken::Slash) => BinaryOp::Div,
                Some(CypherToken::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_power_expression()?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_power_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.parse_unary_expression()?;
        while self.consume(&CypherToken::Caret) {
            let right = self.parse_unary_expression()?;
            left = Expression::binary(BinaryOp::Pow, left, right);
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expression, String> {
        if self.consume(&CypherToken::Dash) {
            let inner = self.parse_unary_expression()?;
            return Ok(Expression::unary(UnaryOp::UnaryMinus, inner));
        }
        if self.consume(&CypherToken::Plus) {
            let inner = self.parse_unary_expression()?;
            return Ok(Expression::unary(UnaryOp::UnaryPlus, inner));
        }
        self.parse_postfix_expression()
    }

    /// Property lookup, subscript/slice and label checks
    fn parse_postfix_expression(&mut self) -> Result<Expression, String> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            match self.peek() {
                Some(CypherToken::Dot) => {
                    self.advance();
                    let prop = self.parse_symbolic_name("property name after '.'")?;
                    expr = Expression::property(expr, prop);
                }
                Some(CypherToken::LBracket) => {
                    self.advance();
                    expr = self.parse_subscript_or_slice(expr)?;
                }
                Some(CypherToken::Colon) => {
                    let mut labels = Vec::new();
                    while self.consume(&CypherToken::Colon) {
                        labels.push(Label::new(self.parse_symbolic_name("label")?));
                    }
                    expr = Expression::Labels {
                        expression: Box::new(expr),
                        labels,
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// After `expr[`: `sub]`, `start..end]`, `start..]`, `..end]`
    fn parse_subscript_or_slice(&mut self, expression: Expression) -> Result<Expression, String> {
        let expression = Box::new(expression);

        if self.consume(&CypherToken::DotDot) {
            let end = self.parse_slice_bound()?;
            self.expect(&CypherToken::RBracket)?;
            return Ok(Expression::Slice {
                expression,
                start: None,
                end,
            });
        }

        let first = self.parse_expression()?;
        if self.consume(&CypherToken::DotDot) {
            let end = self.parse_slice_bound()?;
            self.expect(&CypherToken::RBracket)?;
            return Ok(Expression::Slice {
                expression,
                start: Some(Box::new(first)),
                end,
            });
        }

        self.expect(&CypherToken::RBracket)?;
        Ok(Expression::Subscript {
            expression,
            subscript: Box::new(first),
        })
    }

    fn parse_slice_bound(&mut self) -> Result<Option<Box<Expression>>, String> {
        if self.check(&CypherToken::RBracket) {
            Ok(None)
        } else {
            Ok(Some(Box::new(self.parse_expression()?)))
        }
    }

    fn parse_primary_expression(&mut self) -> Result<Expression, String> {
        match self.peek().cloned() {
            // Numeric literals
            Some(CypherToken::IntLit(value)) => {
                self.advance();
                Ok(Expression::Integer { value })
            }
            Some(CypherToken::FloatLit(value)) => {
                self.advance();
                Ok(Expression::Float { value })
            }

            // String literal
            Some(CypherToken::StringLit(value)) => {
                self.advance();
                Ok(Expression::String { value })
            }

            // Boolean literals
            Some(CypherToken::True) => {
                self.advance();
                Ok(Expression::True)
            }
            Some(CypherToken::False) => {
                self.advance();
                Ok(Expression::False)
            }

            // NULL literal
            Some(CypherToken::Null) => {
                self.advance();
                Ok(Expression::Null)
            }

            // Parameter: $name
            Some(CypherToken::Parameter(name)) => {
                self.advance();
                Ok(Expression::Parameter(Parameter { name }))
            }

            // Parenthesized expression
            Some(CypherToken::LParen) => {
                if self.looks_like_pattern_predicate() {
                    return Err("Pattern predicates are not supported".to_string());
                }
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&CypherToken::RParen)?;
                Ok(expr)
            }

            // List literal or comprehension
            Some(CypherToken::LBracket) => {
                self.advance();
                self.parse_bracket_expression()
            }

            // Map literal
            Some(CypherToken::LBrace) => self.parse_map_literal(),

            // CASE expression
            Some(CypherToken::Case) => {
                self.advance();
                self.parse_case_expression()
            }

            // all(x IN list WHERE pred)
            Some(CypherToken::All) if self.peek_at(1) == Some(&CypherToken::LParen) => {
                self.advance();
                self.parse_predicate_function(PredicateKind::All)
            }

            // Identifier: variable, function call, special form or map projection
            Some(CypherToken::Identifier(name)) => self.parse_identifier_expression(name),

            Some(t) => Err(format!("Unexpected token in expression: {:?}", t)),
            None => Err("Unexpected end of query in expression".to_string()),
        }
    }

    fn parse_identifier_expression(&mut self, name: String) -> Result<Expression, String> {
        let lower = name.to_lowercase();

        match self.peek_at(1) {
            Some(CypherToken::LParen) => match lower.as_str() {
                "any" | "none" | "single" | "filter" => {
                    self.advance();
                    let kind = match lower.as_str() {
                        "any" => PredicateKind::Any,
                        "none" => PredicateKind::None,
                        "single" => PredicateKind::Single,
                        _ => PredicateKind::Filter,
                    };
                    self.parse_predicate_function(kind)
                }
                "reduce" => {
                    self.advance();
                    self.parse_reduce()
                }
                "shortestpath" | "allshortestpaths" => {
                    Err("Shortest-path expressions are not supported".to_string())
                }
                _ => {
                    self.advance();
                    self.parse_function_call(name)
                }
            },
            Some(CypherToken::LBrace) if lower == "exists" => {
                Err("EXISTS subqueries are not supported".to_string())
            }
            Some(CypherToken::LBrace) => {
                self.advance();
                self.parse_map_projection(Identifier::new(name))
            }
            Some(CypherToken::Dot) => {
                if let Some(segments) = self.namespaced_call_segments() {
                    let mut parts = Vec::with_capacity(segments);
                    parts.push(name);
                    self.advance();
                    for _ in 1..segments {
                        self.advance(); // .
                        parts.push(self.parse_symbolic_name("function name")?);
                    }
                    return self.parse_function_call(parts.join("."));
                }
                self.advance();
                Ok(Expression::Identifier(Identifier::new(name)))
            }
            _ => {
                self.advance();
                Ok(Expression::Identifier(Identifier::new(name)))
            }
        }
    }

    /// Number of name segments when the tokens ahead read `ns.ns.name(`
    fn namespaced_call_segments(&self) -> Option<usize> {
        let mut offset = 1;
        let mut segments = 1;
        while self.peek_at(offset) == Some(&CypherToken::Dot) && self.is_name_at(offset + 1) {
            offset += 2;
            segments += 1;
        }
        if segments > 1 && self.peek_at(offset) == Some(&CypherToken::LParen) {
            Some(segments)
        } else {
            None
        }
    }

    /// Parse function call: name(args...), name(DISTINCT args...), name(*)
    fn parse_function_call(&mut self, name: String) -> Result<Expression, String> {
        self.expect(&CypherToken::LParen)?;
        let distinct = self.consume(&CypherToken::Distinct);

        if self.consume(&CypherToken::Star) {
            self.expect(&CypherToken::RParen)?;
            return Ok(Expression::ApplyAll {
                func_name: FunctionName::new(name),
                distinct,
            });
        }

        let args = self.parse_argument_list()?;
        Ok(Expression::Apply {
            func_name: FunctionName::new(name),
            distinct,
            args,
        })
    }

    /// kind(x IN list WHERE pred); the function name has been consumed
    fn parse_predicate_function(&mut self, kind: PredicateKind) -> Result<Expression, String> {
        self.expect(&CypherToken::LParen)?;
        let identifier = self.parse_identifier()?;
        self.expect(&CypherToken::In)?;
        let expression = self.parse_expression()?;
        self.expect(&CypherToken::Where)?;
        let predicate = self.parse_expression()?;
        self.expect(&CypherToken::RParen)?;

        Ok(Expression::PredicateFunction {
            kind,
            identifier,
            expression: Box::new(expression),
            predicate: Box::new(predicate),
        })
    }

    /// reduce(acc = init, x IN list | eval); the name has been consumed
    fn parse_reduce(&mut self) -> Result<Expression, String> {
        self.expect(&CypherToken::LParen)?;
        let accumulator = self.parse_identifier()?;
        self.expect(&CypherToken::Equals)?;
        let init = self.parse_expression()?;
        self.expect(&CypherToken::Comma)?;
        let identifier = self.parse_identifier()?;
        self.expect(&CypherToken::In)?;
        let expression = self.parse_expression()?;
        self.expect(&CypherToken::Pipe)?;
        let eval = self.parse_expression()?;
        self.expect(&CypherToken::RParen)?;

        Ok(Expression::Reduce {
            accumulator,
            init: Box::new(init),
            identifier,
            expression: Box::new(expression),
            eval: Box::new(eval),
        })
    }

    /// After `[`: list comprehension, pattern comprehension or list literal
    fn parse_bracket_expression(&mut self) -> Result<Expression, String> {
        if matches!(self.peek(), Some(CypherToken::Identifier(_)))
            && self.peek_at(1) == Some(&CypherToken::In)
        {
            let identifier = self.parse_identifier()?;
            self.advance(); // IN
            let expression = self.parse_expression()?;
            let predicate = if self.consume(&CypherToken::Where) {
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            let eval = if self.consume(&CypherToken::Pipe) {
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            self.expect(&CypherToken::RBracket)?;
            return Ok(Expression::ListComprehension {
                identifier,
                expression: Box::new(expression),
                predicate,
                eval,
            });
        }

        if let Some(comprehension) = self.try_pattern_comprehension()? {
            return Ok(comprehension);
        }

        let mut elements = Vec::new();
        if !self.check(&CypherToken::RBracket) {
            elements.push(self.parse_expression()?);
            while self.consume(&CypherToken::Comma) {
                elements.push(self.parse_expression()?);
            }
        }
        self.expect(&CypherToken::RBracket)?;
        Ok(Expression::Collection { elements })
    }

    /// [p = (a)-->(b) WHERE pred | eval]; rewinds and yields None when the
    /// bracket does not hold a relationship pattern
    fn try_pattern_comprehension(&mut self) -> Result<Option<Expression>, String> {
        let saved = self.pos;

        let identifier = if matches!(self.peek(), Some(CypherToken::Identifier(_)))
            && self.peek_at(1) == Some(&CypherToken::Equals)
        {
            let identifier = self.parse_identifier()?;
            self.advance(); // =
            Some(identifier)
        } else {
            None
        };

        if !self.check(&CypherToken::LParen) {
            self.pos = saved;
            return Ok(None);
        }

        let pattern = match self.parse_pattern_path() {
            Ok(path)
                if path.elements.len() > 1
                    && (self.check(&CypherToken::Where) || self.check(&CypherToken::Pipe)) =>
            {
                path
            }
            _ => {
                self.pos = saved;
                return Ok(None);
            }
        };

        let predicate = if self.consume(&CypherToken::Where) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.expect(&CypherToken::Pipe)?;
        let eval = self.parse_expression()?;
        self.expect(&CypherToken::RBracket)?;

        Ok(Some(Expression::PatternComprehension {
            identifier,
            pattern,
            predicate,
            eval: Box::new(eval),
        }))
    }

    /// {key: value, ...}
    fn parse_map_literal(&mut self) -> Result<Expression, String> {
        self.expect(&CypherToken::LBrace)?;
        let mut entries = Vec::new();

        if !self.check(&CypherToken::RBrace) {
            loop {
                let key = PropName::new(self.parse_symbolic_name("map key")?);
                self.expect(&CypherToken::Colon)?;
                let value = self.parse_expression()?;
                entries.push(MapEntry { key, value });
                if !self.consume(&CypherToken::Comma) {
                    break;
                }
            }
        }

        self.expect(&CypherToken::RBrace)?;
        Ok(Expression::Map { entries })
    }

    /// n {.name, .*, key: expr, other}; the identifier has been consumed
    fn parse_map_projection(&mut self, identifier: Identifier) -> Result<Expression, String> {
        self.expect(&CypherToken::LBrace)?;
        let mut selectors = Vec::new();

        if !self.check(&CypherToken::RBrace) {
            loop {
                let selector = if self.consume(&CypherToken::Dot) {
                    if self.consume(&CypherToken::Star) {
                        MapProjectionSelector::AllProperties
                    } else {
                        MapProjectionSelector::Property {
                            prop_name: PropName::new(self.parse_symbolic_name("property name")?),
                        }
                    }
                } else if self.is_name_at(0) && self.peek_at(1) == Some(&CypherToken::Colon) {
                    let prop_name = PropName::new(self.parse_symbolic_name("map key")?);
                    self.advance(); // :
                    MapProjectionSelector::Literal {
                        prop_name,
                        expression: self.parse_expression()?,
                    }
                } else {
                    MapProjectionSelector::Identifier {
                        identifier: self.parse_identifier()?,
                    }
                };
                selectors.push(selector);
                if !self.consume(&CypherToken::Comma) {
                    break;
                }
            }
        }

        self.expect(&CypherToken::RBrace)?;
        Ok(Expression::MapProjection {
            expression: Box::new(Expression::Identifier(identifier)),
            selectors,
        })
    }

    // ========================================================================
    // CASE Expression
    // ========================================================================

    /// Parse CASE expression (CASE token already consumed)
    /// Generic form: CASE WHEN predicate THEN result [WHEN ...] [ELSE default] END
    /// Simple form:  CASE operand WHEN value THEN result [WHEN ...] [ELSE default] END
    fn parse_case_expression(&mut self) -> Result<Expression, String> {
        let expression = if self.check(&CypherToken::When) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        let mut alternatives = Vec::new();
        while self.consume(&CypherToken::When) {
            let predicate = self.parse_expression()?;
            self.expect(&CypherToken::Then)?;
            let value = self.parse_expression()?;
            alternatives.push(CaseAlternative { predicate, value });
        }

        if alternatives.is_empty() {
            return Err("CASE expression requires at least one WHEN clause".to_string());
        }

        let default = if self.consume(&CypherToken::Else) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        self.expect(&CypherToken::End)?;

        Ok(Expression::Case {
            expression,
            alternatives,
            default,
        })
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Parse Cypher text into its statements
pub fn parse_cypher(input: &str) -> Result<Vec<Statement>, String> {
    let tokens = lex_cypher(input)?;
    let mut parser = CypherParser::new(input, tokens);
    parser.parse_statements()
}

// ============================================================================
// Tests
// ============================================================================
