// src/cypher/tokenizer.rs
// Cypher tokenizer handling keywords, operators, literals and quoted names

use unicode_ident::{is_xid_continue, is_xid_start};

// ============================================================================
// Token Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CypherToken {
    // Keywords (case-insensitive)
    Match,
    Optional,
    Where,
    Return,
    With,
    Order,
    By,
    As,
    And,
    Or,
    Xor,
    Not,
    In,
    Is,
    Null,
    Limit,
    Skip,
    Unwind,
    Union,
    All,
    Distinct,
    Call,
    Yield,
    Using,
    Periodic,
    Commit,
    Index,
    Scan,
    Join,
    On,
    Explain,
    Profile,
    Create,
    Set,
    Delete,
    Detach,
    Merge,
    Remove,
    Foreach,
    Asc,
    Desc,
    StartsWith,
    EndsWith,
    Contains,
    Case,
    When,
    Then,
    Else,
    End,
    True,
    False,

    // Parameters
    Parameter(String), // $param_name

    // Symbols
    LParen,      // (
    RParen,      // )
    LBracket,    // [
    RBracket,    // ]
    LBrace,      // {
    RBrace,      // }
    Colon,       // :
    Comma,       // ,
    Dot,         // .
    Semicolon,   // ;
    Dash,        // -
    GreaterThan, // >
    LessThan,    // <
    Star,        // *
    DotDot,      // ..

    // Comparison operators
    Equals,            // =
    NotEquals,         // <>
    LessThanEquals,    // <=
    GreaterThanEquals, // >=
    RegexMatch,        // =~

    // Arithmetic
    Plus,    // +
    Slash,   // /
    Percent, // %
    Caret,   // ^
    Pipe,    // |

    // Literals and identifiers
    Identifier(String),
    StringLit(String),
    IntLit(i64),
    FloatLit(f64),
}

impl CypherToken {
    /// Keywords double as symbolic names in name positions (labels, keys, aliases)
    pub fn is_keyword(&self) -> bool {
        !matches!(
            self,
            CypherToken::Parameter(_)
                | CypherToken::LParen
                | CypherToken::RParen
                | CypherToken::LBracket
                | CypherToken::RBracket
                | CypherToken::LBrace
                | CypherToken::RBrace
                | CypherToken::Colon
                | CypherToken::Comma
                | CypherToken::Dot
                | CypherToken::Semicolon
                | CypherToken::Dash
                | CypherToken::GreaterThan
                | CypherToken::LessThan
                | CypherToken::Star
                | CypherToken::DotDot
                | CypherToken::Equals
                | CypherToken::NotEquals
                | CypherToken::LessThanEquals
                | CypherToken::GreaterThanEquals
                | CypherToken::RegexMatch
                | CypherToken::Plus
                | CypherToken::Slash
                | CypherToken::Percent
                | CypherToken::Caret
                | CypherToken::Pipe
                | CypherToken::Identifier(_)
                | CypherToken::StringLit(_)
                | CypherToken::IntLit(_)
                | CypherToken::FloatLit(_)
        )
    }
}

/// A token together with the source text it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: CypherToken,
    pub text: String,
    /// Character offsets of `text` in the query, end exclusive
    pub start: usize,
    pub end: usize,
}

// ============================================================================
// Tokenizer
// ============================================================================

pub fn lex_cypher(input: &str) -> Result<Vec<Lexeme>, String> {
    let mut lexemes = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        let ch = chars[i];

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        // Single-line comments: // to end of line
        if ch == '/' && i + 1 < len && chars[i + 1] == '/' {
            while i < len && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        // Block comments: /* ... */
        if ch == '/' && i + 1 < len && chars[i + 1] == '*' {
            let start = i;
            i += 2;
            while i + 1 < len && !(chars[i] == '*' && chars[i + 1] == '/') {
                i += 1;
            }
            if i + 1 >= len {
                return Err(format!("Unterminated comment at position {}", start));
            }
            i += 2;
            continue;
        }

        let start = i;
        let token = match ch {
            '(' => {
                i += 1;
                CypherToken::LParen
            }
            ')' => {
                i += 1;
                CypherToken::RParen
            }
            '[' => {
                i += 1;
                CypherToken::LBracket
            }
            ']' => {
                i += 1;
                CypherToken::RBracket
            }
            '{' => {
                i += 1;
                CypherToken::LBrace
            }
            '}' => {
                i += 1;
                CypherToken::RBrace
            }
            ':' => {
                i += 1;
                CypherToken::Colon
            }
            ',' => {
                i += 1;
                CypherToken::Comma
            }
            ';' => {
                i += 1;
                CypherToken::Semicolon
            }
            '*' => {
                i += 1;
                CypherToken::Star
            }
            '+' => {
                i += 1;
                CypherToken::Plus
            }
            '/' => {
                i += 1;
                CypherToken::Slash
            }
            '%' => {
                i += 1;
                CypherToken::Percent
            }
            '^' => {
                i += 1;
                CypherToken::Caret
            }
            '|' => {
                i += 1;
                CypherToken::Pipe
            }
            // Unary minus, subtraction and arrow bodies are all Dash; the parser decides
            '-' => {
                i += 1;
                CypherToken::Dash
            }

            '=' => {
                if i + 1 < len && chars[i + 1] == '~' {
                    i += 2;
                    CypherToken::RegexMatch
                } else {
                    i += 1;
                    CypherToken::Equals
                }
            }

            '<' => {
                if i + 1 < len && chars[i + 1] == '>' {
                    i += 2;
                    CypherToken::NotEquals
                } else if i + 1 < len && chars[i + 1] == '=' {
                    i += 2;
                    CypherToken::LessThanEquals
                } else {
                    i += 1;
                    CypherToken::LessThan
                }
            }

            '>' => {
                if i + 1 < len && chars[i + 1] == '=' {
                    i += 2;
                    CypherToken::GreaterThanEquals
                } else {
                    i += 1;
                    CypherToken::GreaterThan
                }
            }

            '.' => {
                if i + 1 < len && chars[i + 1] == '.' {
                    i += 2;
                    CypherToken::DotDot
                } else if i + 1 < len && chars[i + 1].is_ascii_digit() {
                    // Float starting with dot: .5
                    let (token, next) = lex_number(&chars, i)?;
                    i = next;
                    token
                } else {
                    i += 1;
                    CypherToken::Dot
                }
            }

            '"' | '\'' => {
                let (value, next) = lex_string(&chars, i)?;
                i = next;
                CypherToken::StringLit(value)
            }

            c if c.is_ascii_digit() => {
                let (token, next) = lex_number(&chars, i)?;
                i = next;
                token
            }

            // Parameter: $name or $`quoted name`
            '$' => {
                i += 1;
                let name = if i < len && chars[i] == '`' {
                    let (name, next) = lex_quoted_name(&chars, i)?;
                    i = next;
                    name
                } else {
                    let name_start = i;
                    while i < len && (is_xid_continue(chars[i]) || chars[i] == '$') {
                        i += 1;
                    }
                    chars[name_start..i].iter().collect()
                };
                if name.is_empty() {
                    return Err(format!(
                        "Expected parameter name after '$' at position {}",
                        start
                    ));
                }
                CypherToken::Parameter(name)
            }

            // Backtick-quoted identifiers: `My Identifier`
            '`' => {
                let (name, next) = lex_quoted_name(&chars, i)?;
                i = next;
                CypherToken::Identifier(name)
            }

            // Identifiers and keywords
            c if is_xid_start(c) || c == '_' => {
                while i < len && (is_xid_continue(chars[i]) || chars[i] == '$') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                identifier_to_token(ident)
            }

            _ => {
                return Err(format!("Unexpected character '{}' at position {}", ch, i));
            }
        };

        lexemes.push(Lexeme {
            token,
            text: chars[start..i].iter().collect(),
            start,
            end: i,
        });
    }

    Ok(lexemes)
}

/// Read a quoted string starting at the opening quote; returns the unescaped value
/// and the position after the closing quote
fn lex_string(chars: &[char], start: usize) -> Result<(String, usize), String> {
    let quote = chars[start];
    let len = chars.len();
    let mut i = start + 1;
    let mut s = String::new();

    while i < len {
        let c = chars[i];
        if c == quote {
            return Ok((s, i + 1));
        }
        if c == '\\' && i + 1 < len {
            i += 1;
            match chars[i] {
                'n' => s.push('\n'),
                't' => s.push('\t'),
                'r' => s.push('\r'),
                'b' => s.push('\u{8}'),
                'f' => s.push('\u{c}'),
                '\\' => s.push('\\'),
                '\'' => s.push('\''),
                '"' => s.push('"'),
                'u' | 'U' => {
                    let width = if chars[i] == 'u' { 4 } else { 8 };
                    if i + width >= len {
                        return Err(format!("Truncated unicode escape at position {}", i));
                    }
                    let hex: String = chars[i + 1..=i + width].iter().collect();
                    let decoded = u32::from_str_radix(&hex, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| format!("Invalid unicode escape \\{}{}", chars[i], hex))?;
                    s.push(decoded);
                    i += width;
                }
                other => {
                    return Err(format!(
                        "Invalid escape sequence '\\{}' at position {}",
                        other,
                        i - 1
                    ));
                }
            }
            i += 1;
        } else {
            s.push(c);
            i += 1;
        }
    }

    Err(format!("Unterminated string literal at position {}", start))
}

/// Read a back-tick quoted name starting at the opening back-tick
fn lex_quoted_name(chars: &[char], start: usize) -> Result<(String, usize), String> {
    let len = chars.len();
    let mut i = start + 1;
    let mut name = String::new();

    while i < len {
        if chars[i] == '`' {
            // Doubled back-tick inside a quoted name
            if i + 1 < len && chars[i + 1] == '`' {
                name.push('`');
                i += 2;
                continue;
            }
            return Ok((name, i + 1));
        }
        name.push(chars[i]);
        i += 1;
    }

    Err(format!("Unterminated quoted name at position {}", start))
}

/// Read a decimal integer or float starting at `start`
fn lex_number(chars: &[char], start: usize) -> Result<(CypherToken, usize), String> {
    let len = chars.len();
    let mut i = start;

    // 0x.. / 0o.. literals are rejected rather than misread as 0 followed by a name
    if chars[i] == '0' && i + 1 < len && matches!(chars[i + 1], 'x' | 'X' | 'o' | 'O') {
        return Err(format!(
            "Non-decimal integer literals are not supported (position {})",
            start
        ));
    }

    let mut is_float = false;
    while i < len && chars[i].is_ascii_digit() {
        i += 1;
    }

    // Fraction, but not the '..' range operator and not a property access after a number
    if i + 1 < len && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
        is_float = true;
        i += 1;
        while i < len && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    // Exponent
    if i < len && matches!(chars[i], 'e' | 'E') {
        let mut j = i + 1;
        if j < len && matches!(chars[j], '+' | '-') {
            j += 1;
        }
        if j < len && chars[j].is_ascii_digit() {
            is_float = true;
            i = j;
            while i < len && chars[i].is_ascii_digit() {
                i += 1;
            }
        }
    }

    if i < len && (is_xid_start(chars[i]) || chars[i] == '_') {
        return Err(format!(
            "Invalid number literal at position {}",
            start
        ));
    }

    let num_str: String = chars[start..i].iter().collect();
    let token = if is_float {
        let f: f64 = num_str
            .parse()
            .map_err(|_| format!("Invalid float: {}", num_str))?;
        CypherToken::FloatLit(f)
    } else {
        let n: i64 = num_str
            .parse()
            .map_err(|_| format!("Invalid integer: {}", num_str))?;
        CypherToken::IntLit(n)
    };

    Ok((token, i))
}

/// Convert an identifier string to the appropriate token (keyword or identifier)
fn identifier_to_token(ident: String) -> CypherToken {
    match ident.to_uppercase().as_str() {
        "MATCH" => CypherToken::Match,
        "OPTIONAL" => CypherToken::Optional,
        "WHERE" => CypherToken::Where,
        "RETURN" => CypherToken::Return,
        "WITH" => CypherToken::With,
        "ORDER" => CypherToken::Order,
        "BY" => CypherToken::By,
        "AS" => CypherToken::As,
        "AND" => CypherToken::And,
        "OR" => CypherToken::Or,
        "XOR" => CypherToken::Xor,
        "NOT" => CypherToken::Not,
        "IN" => CypherToken::In,
        "IS" => CypherToken::Is,
        "NULL" => CypherToken::Null,
        "LIMIT" => CypherToken::Limit,
        "SKIP" => CypherToken::Skip,
        "UNWIND" => CypherToken::Unwind,
        "UNION" => CypherToken::Union,
        "ALL" => CypherToken::All,
        "DISTINCT" => CypherToken::Distinct,
        "CALL" => CypherToken::Call,
        "YIELD" => CypherToken::Yield,
        "USING" => CypherToken::Using,
        "PERIODIC" => CypherToken::Periodic,
        "COMMIT" => CypherToken::Commit,
        "INDEX" => CypherToken::Index,
        "SCAN" => CypherToken::Scan,
        "JOIN" => CypherToken::Join,
        "ON" => CypherToken::On,
        "EXPLAIN" => CypherToken::Explain,
        "PROFILE" => CypherToken::Profile,
        "CREATE" => CypherToken::Create,
        "SET" => CypherToken::Set,
        "DELETE" => CypherToken::Delete,
        "DETACH" => CypherToken::Detach,
        "MERGE" => CypherToken::Merge,
        "REMOVE" => CypherToken::Remove,
        "FOREACH" => CypherToken::Foreach,
        "ASC" | "ASCENDING" => CypherToken::Asc,
        "DESC" | "DESCENDING" => CypherToken::Desc,
        "CASE" => CypherToken::Case,
        "WHEN" => CypherToken::When,
        "THEN" => CypherToken::Then,
        "ELSE" => CypherToken::Else,
        "END" => CypherToken::End,
        "TRUE" => CypherToken::True,
        "FALSE" => CypherToken::False,
        "STARTS" => CypherToken::StartsWith,
        "ENDS" => CypherToken::EndsWith,
        "CONTAINS" => CypherToken::Contains,
        _ => CypherToken::Identifier(ident),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize_cypher(input: &str) -> Result<Vec<CypherToken>, String> {
        Ok(lex_cypher(input)?
            .into_iter()
            .map(|lexeme| lexeme.token)
            .collect())
    }

    #[test]
    fn test_optional_match_tokens() {
        let tokens = tokenize_cypher("OPTIONAL MATCH (a:L1:L2) RETURN DISTINCT a").unwrap();
        assert_eq!(
            tokens,
            vec![
                CypherToken::Optional,
                CypherToken::Match,
                CypherToken::LParen,
                CypherToken::Identifier("a".to_string()),
                CypherToken::Colon,
                CypherToken::Identifier("L1".to_string()),
                CypherToken::Colon,
                CypherToken::Identifier("L2".to_string()),
                CypherToken::RParen,
                CypherToken::Return,
                CypherToken::Distinct,
                CypherToken::Identifier("a".to_string()),
            ]
        );
    }

    #[test]
    fn test_trimming_tokens() {
        let tokens = tokenize_cypher("ORDER BY a.x DESC SKIP 3 LIMIT $n").unwrap();
        assert_eq!(
            tokens,
            vec![
                CypherToken::Order,
                CypherToken::By,
                CypherToken::Identifier("a".to_string()),
                CypherToken::Dot,
                CypherToken::Identifier("x".to_string()),
                CypherToken::Desc,
                CypherToken::Skip,
                CypherToken::IntLit(3),
                CypherToken::Limit,
                CypherToken::Parameter("n".to_string()),
            ]
        );
    }

    #[test]
    fn test_relational_operators() {
        let tokens = tokenize_cypher("a <> b <= c >= d =~ e").unwrap();
        assert!(tokens.contains(&CypherToken::NotEquals));
        assert!(tokens.contains(&CypherToken::LessThanEquals));
        assert!(tokens.contains(&CypherToken::GreaterThanEquals));
        assert!(tokens.contains(&CypherToken::RegexMatch));
    }

    #[test]
    fn test_arithmetic_operators() {
        let tokens = tokenize_cypher("1 + 2 - 3 * 4 / 5 % 6 ^ 7").unwrap();
        assert!(tokens.contains(&CypherToken::Plus));
        assert!(tokens.contains(&CypherToken::Dash));
        assert!(tokens.contains(&CypherToken::Star));
        assert!(tokens.contains(&CypherToken::Slash));
        assert!(tokens.contains(&CypherToken::Percent));
        assert!(tokens.contains(&CypherToken::Caret));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize_cypher(r#"'it\'s a \"test\"\n\t\\'"#).unwrap();
        assert_eq!(
            tokens,
            vec![CypherToken::StringLit("it's a \"test\"\n\t\\".to_string())]
        );
    }

    #[test]
    fn test_unicode_escape() {
        let tokens = tokenize_cypher(r"'\u00e9'").unwrap();
        assert_eq!(tokens, vec![CypherToken::StringLit("é".to_string())]);
    }

    #[test]
    fn test_invalid_escape_error() {
        assert!(tokenize_cypher(r"'\q'").is_err());
    }

    #[test]
    fn test_unterminated_string_error() {
        assert!(tokenize_cypher("'abc").is_err());
    }

    #[test]
    fn test_float_literal() {
        assert_eq!(tokenize_cypher("3.14").unwrap(), vec![CypherToken::FloatLit(3.14)]);
        assert_eq!(tokenize_cypher(".5").unwrap(), vec![CypherToken::FloatLit(0.5)]);
        assert_eq!(tokenize_cypher("1e3").unwrap(), vec![CypherToken::FloatLit(1000.0)]);
        assert_eq!(
            tokenize_cypher("2.5E-1").unwrap(),
            vec![CypherToken::FloatLit(0.25)]
        );
    }

    #[test]
    fn test_non_decimal_integers_rejected() {
        assert!(tokenize_cypher("RETURN 0x1F").is_err());
        assert!(tokenize_cypher("RETURN 0o17").is_err());
    }

    #[test]
    fn test_integer_overflow_error() {
        assert!(tokenize_cypher("99999999999999999999").is_err());
    }

    #[test]
    fn test_range_after_integer() {
        let tokens = tokenize_cypher("*1..2").unwrap();
        assert_eq!(
            tokens,
            vec![
                CypherToken::Star,
                CypherToken::IntLit(1),
                CypherToken::DotDot,
                CypherToken::IntLit(2),
            ]
        );
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let tokens = tokenize_cypher("optional match (a) with a skip 1 return a").unwrap();
        assert_eq!(tokens[0], CypherToken::Optional);
        assert_eq!(tokens[1], CypherToken::Match);
        assert_eq!(tokens[5], CypherToken::With);
        assert_eq!(tokens[7], CypherToken::Skip);
        assert_eq!(tokens[9], CypherToken::Return);
    }

    #[test]
    fn test_keyword_source_text_kept() {
        let lexemes = lex_cypher("n.Limit").unwrap();
        assert_eq!(lexemes[2].token, CypherToken::Limit);
        assert_eq!(lexemes[2].text, "Limit");
        assert!(lexemes[2].token.is_keyword());
        assert!(!lexemes[0].token.is_keyword());
    }

    #[test]
    fn test_variable_length_rel_tokens() {
        let tokens = tokenize_cypher("<-[r:X|Y*..2]-").unwrap();
        assert_eq!(
            tokens,
            vec![
                CypherToken::LessThan,
                CypherToken::Dash,
                CypherToken::LBracket,
                CypherToken::Identifier("r".to_string()),
                CypherToken::Colon,
                CypherToken::Identifier("X".to_string()),
                CypherToken::Pipe,
                CypherToken::Identifier("Y".to_string()),
                CypherToken::Star,
                CypherToken::DotDot,
                CypherToken::IntLit(2),
                CypherToken::RBracket,
                CypherToken::Dash,
            ]
        );
    }

    #[test]
    fn test_quoted_names() {
        assert_eq!(
            tokenize_cypher("`x = y`").unwrap(),
            vec![CypherToken::Identifier("x = y".to_string())]
        );
        assert_eq!(
            tokenize_cypher("`a``b`").unwrap(),
            vec![CypherToken::Identifier("a`b".to_string())]
        );
        assert_eq!(
            tokenize_cypher("$`my param`").unwrap(),
            vec![CypherToken::Parameter("my param".to_string())]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        let tokens = tokenize_cypher("RETURN ñame").unwrap();
        assert_eq!(tokens[1], CypherToken::Identifier("ñame".to_string()));
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = tokenize_cypher("RETURN /* block */ 1 // trailing").unwrap();
        assert_eq!(tokens, vec![CypherToken::Return, CypherToken::IntLit(1)]);
    }

    #[test]
    fn test_parameter_empty_name_error() {
        assert!(tokenize_cypher("$").is_err());
    }

    #[test]
    fn test_update_keywords() {
        let tokens = tokenize_cypher("CREATE MERGE SET DELETE DETACH REMOVE FOREACH").unwrap();
        assert_eq!(tokens[0], CypherToken::Create);
        assert_eq!(tokens[1], CypherToken::Merge);
        assert_eq!(tokens[6], CypherToken::Foreach);
    }

    #[test]
    fn test_lexeme_offsets() {
        let lexemes = lex_cypher("RETURN  ñ.x  'é'").unwrap();
        let spans: Vec<(usize, usize)> = lexemes.iter().map(|l| (l.start, l.end)).collect();
        assert_eq!(spans, vec![(0, 6), (8, 9), (9, 10), (10, 11), (13, 16)]);
        assert_eq!(lexemes[4].text, "'é'");
    }
}
