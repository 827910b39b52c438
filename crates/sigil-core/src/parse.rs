//! # Parser
//!
//! Recursive descent over the token stream. Grammar, loosest binding
//! first:
//!
//! ```text
//! expr     := and ( ('|' | '||') and )*
//! and      := primary ( ('&' | '&&') primary )*
//! primary  := '(' expr ')'
//!           | '{' attribute ( ',' value )* '}'
//!           | attribute ( ('=' | '==' | '!=') value )?
//! ```
//!
//! Attribute names are bare words or quoted strings; values are words,
//! quoted strings or numbers. The whole-label constants `*` (allow all)
//! and `!` (deny all) are only legal as a complete label, never inside
//! an expression.
//!
//! Entry points also exist for `name = value` pairs, comma-separated
//! lists of those, value term lists, and hierarchy declarations
//! (`name: v1, v2, ...`).
//!
//! Every error is terminal; there is no partial-AST recovery. Running
//! out of input where a token was expected fails with exactly `END`.

use crate::error::SyntaxError;
use crate::expr::{AttributeExpr, Operator, Relation, SetTest};
use crate::hierarchy::Hierarchy;
use crate::tokens::{Token, TokenKind, Tokenizer};
use crate::values::{Attribute, AttributeValue, ValueTerm};

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Parse a complete label expression.
pub fn parse_expr(text: &str) -> Result<AttributeExpr, SyntaxError> {
    match text.trim() {
        "*" => return Ok(AttributeExpr::Allow),
        "!" => return Ok(AttributeExpr::Deny),
        _ => {}
    }
    let mut parser = Parser::new(text);
    let expr = parser.expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parse one `name = value` pair. A bare name is shorthand for
/// `name = true`.
pub fn parse_attr_value(text: &str) -> Result<AttributeValue, SyntaxError> {
    let mut parser = Parser::new(text);
    let av = parser.attribute_value()?;
    parser.expect_end()?;
    Ok(av)
}

/// Parse a comma-separated list of `name = value` pairs.
/// Empty input is the empty list.
pub fn parse_attr_value_list(text: &str) -> Result<Vec<AttributeValue>, SyntaxError> {
    let mut parser = Parser::new(text);
    parser.list_of(Parser::attribute_value)
}

/// Parse a comma-separated list of label expressions.
/// Empty input is the empty list.
pub fn parse_expr_list(text: &str) -> Result<Vec<AttributeExpr>, SyntaxError> {
    let mut parser = Parser::new(text);
    parser.list_of(Parser::expression)
}

/// Parse a comma-separated list of value terms.
/// Empty input is the empty list.
pub fn parse_value_term_list(text: &str) -> Result<Vec<ValueTerm>, SyntaxError> {
    let mut parser = Parser::new(text);
    parser.list_of(Parser::value_term)
}

/// Parse a hierarchy declaration: `name: v1, v2, ...` ordered least
/// rank first.
pub fn parse_hierarchy(text: &str) -> Result<Hierarchy, SyntaxError> {
    let mut parser = Parser::new(text);
    let hierarchy = parser.hierarchy()?;
    parser.expect_end()?;
    Ok(hierarchy)
}

// =============================================================================
// PARSER
// =============================================================================

struct Parser {
    tokens: Tokenizer,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            tokens: Tokenizer::new(text),
        }
    }

    // ---- Token stream helpers

    fn end() -> SyntaxError {
        SyntaxError::new("END")
    }

    /// Next token, or the uniform end-of-input error.
    fn next_or_end(&mut self) -> Result<Token, SyntaxError> {
        if !self.tokens.has_next()? {
            return Err(Self::end());
        }
        self.tokens.next_token()
    }

    fn peek_kind(&mut self) -> Result<Option<TokenKind>, SyntaxError> {
        Ok(self.tokens.peek()?.map(Token::kind))
    }

    /// Fail if any input remains.
    fn expect_end(&mut self) -> Result<(), SyntaxError> {
        if self.tokens.has_next()? {
            let token = self.tokens.next_token()?;
            return Err(SyntaxError::new(format!("More tokens: {token}")));
        }
        Ok(())
    }

    // ---- Expressions

    fn expression(&mut self) -> Result<AttributeExpr, SyntaxError> {
        let mut left = self.conjunction()?;
        while matches!(
            self.peek_kind()?,
            Some(TokenKind::VBar | TokenKind::LogicalOr)
        ) {
            self.next_or_end()?;
            let right = self.conjunction()?;
            left = AttributeExpr::or(left, right);
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<AttributeExpr, SyntaxError> {
        let mut left = self.primary()?;
        while matches!(
            self.peek_kind()?,
            Some(TokenKind::Ampersand | TokenKind::LogicalAnd)
        ) {
            self.next_or_end()?;
            let right = self.primary()?;
            left = AttributeExpr::and(left, right);
        }
        Ok(left)
    }

    fn primary(&mut self) -> Result<AttributeExpr, SyntaxError> {
        match self.peek_kind()? {
            None => Err(Self::end()),
            Some(TokenKind::LParen) => self.parenthesized(),
            Some(TokenKind::LBrace) => self.brace_set(),
            _ => self.attribute_test(),
        }
    }

    fn parenthesized(&mut self) -> Result<AttributeExpr, SyntaxError> {
        let open = self.next_or_end()?;
        let expr = self.expression()?;
        if !self.tokens.has_next()? {
            return Err(SyntaxError::new(format!("No RPAREN: {open}")));
        }
        let close = self.tokens.next_token()?;
        if !close.has_kind(TokenKind::RParen) {
            return Err(SyntaxError::new(format!("Expected RPAREN: {close}")));
        }
        Ok(expr)
    }

    /// `{ attribute (',' value)* }` — membership test. With no listed
    /// values this is a bare presence test.
    fn brace_set(&mut self) -> Result<AttributeExpr, SyntaxError> {
        let open = self.next_or_end()?;
        let starts_with_name = matches!(
            self.peek_kind()?,
            Some(TokenKind::Word | TokenKind::Str)
        );
        if !starts_with_name {
            return Err(SyntaxError::new(format!("Expected WORD after: {open}")));
        }
        let attribute = self.attribute_name()?;
        let mut members = Vec::new();
        while self.peek_kind()? == Some(TokenKind::Comma) {
            self.next_or_end()?;
            members.push(self.value_term()?);
        }
        if !self.tokens.has_next()? {
            return Err(SyntaxError::new(format!("No RBRACE: {open}")));
        }
        let close = self.tokens.next_token()?;
        if !close.has_kind(TokenKind::RBrace) {
            return Err(SyntaxError::new(format!("Expected RBRACE: {close}")));
        }
        Ok(AttributeExpr::InSet(SetTest { attribute, members }))
    }

    /// A bare attribute, or `attribute op value`.
    fn attribute_test(&mut self) -> Result<AttributeExpr, SyntaxError> {
        let attribute = self.attribute_name()?;
        let op = match self.peek_kind()? {
            Some(TokenKind::Eq | TokenKind::Equivalent) => Operator::Eq,
            Some(TokenKind::Ne) => Operator::Ne,
            Some(TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge) => {
                let token = self.next_or_end()?;
                return Err(SyntaxError::new(format!(
                    "Operator not supported: {}",
                    token.image()
                )));
            }
            _ => return Ok(AttributeExpr::Attribute(attribute)),
        };
        self.next_or_end()?;
        let value = self.value_term()?;
        Ok(AttributeExpr::Relation(Relation {
            attribute,
            op,
            value,
        }))
    }

    // ---- Shared productions

    /// An attribute name: a bare word or quoted string. The keywords
    /// `true` and `false` are values, never names.
    fn attribute_name(&mut self) -> Result<Attribute, SyntaxError> {
        let token = self.next_or_end()?;
        match token.kind() {
            TokenKind::Word => {
                if token.image() == "true" || token.image() == "false" {
                    return Err(SyntaxError::new(format!(
                        "Found keyword '{}', not an attribute",
                        token.image()
                    )));
                }
                Ok(Attribute::new(token.image()))
            }
            TokenKind::Str => Ok(Attribute::new(token.image())),
            _ if token.is_number() => Err(SyntaxError::new(format!(
                "Expected an attribute: Got a number: {token}"
            ))),
            _ => Err(SyntaxError::new(format!("Not recognized: {token}"))),
        }
    }

    /// A value term: word, quoted string or number. The words `true` /
    /// `false` in any letter case are the boolean terms.
    fn value_term(&mut self) -> Result<ValueTerm, SyntaxError> {
        let token = self.next_or_end()?;
        match token.kind() {
            TokenKind::Word | TokenKind::Str => Ok(ValueTerm::value(token.image())),
            _ if token.is_number() => Ok(ValueTerm::String(token.image().to_string())),
            _ => Err(SyntaxError::new(format!(
                "Expected an attribute value: Not recognized: {token}"
            ))),
        }
    }

    /// `name = value`, or a bare `name` meaning `name = true`.
    fn attribute_value(&mut self) -> Result<AttributeValue, SyntaxError> {
        if !self.tokens.has_next()? {
            return Err(Self::end());
        }
        let attribute = self.attribute_name()?;
        match self.peek_kind()? {
            Some(TokenKind::Eq | TokenKind::Equivalent) => {
                self.next_or_end()?;
                let value = self.value_term()?;
                Ok(AttributeValue::new(attribute, value))
            }
            None | Some(TokenKind::Comma) => {
                Ok(AttributeValue::new(attribute, ValueTerm::TRUE))
            }
            Some(_) => {
                let token = self.next_or_end()?;
                Err(SyntaxError::new(format!(
                    "Expected '=' after attribute: {token}"
                )))
            }
        }
    }

    /// `name ':' value (',' value)*`.
    fn hierarchy(&mut self) -> Result<Hierarchy, SyntaxError> {
        if !self.tokens.has_next()? {
            return Err(Self::end());
        }
        let attribute = self.attribute_name()?;
        if !self.tokens.has_next()? {
            return Err(Self::end());
        }
        let colon = self.tokens.next_token()?;
        if !colon.has_kind(TokenKind::Colon) {
            return Err(SyntaxError::new(format!(
                "Expected ':' after attribute name in hierarchy: {colon}"
            )));
        }
        let mut values = Vec::new();
        if self.tokens.has_next()? {
            values.push(self.value_term()?);
            while self.peek_kind()? == Some(TokenKind::Comma) {
                self.next_or_end()?;
                if !self.tokens.has_next()? {
                    return Err(SyntaxError::new(
                        "Unexpected end to attribute value hierarchy",
                    ));
                }
                values.push(self.value_term()?);
            }
        }
        Hierarchy::new(attribute, values)
    }

    /// Comma-separated list of `item`. Empty input is the empty list;
    /// a comma with nothing after it is an error.
    fn list_of<T>(
        &mut self,
        item: fn(&mut Parser) -> Result<T, SyntaxError>,
    ) -> Result<Vec<T>, SyntaxError> {
        let mut out = Vec::new();
        if !self.tokens.has_next()? {
            return Ok(out);
        }
        out.push(item(self)?);
        while self.peek_kind()? == Some(TokenKind::Comma) {
            self.next_or_end()?;
            if !self.tokens.has_next()? {
                return Err(SyntaxError::new("Trailing comma"));
            }
            out.push(item(self)?);
        }
        self.expect_end()?;
        Ok(out)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str) -> String {
        parse_expr(text).expect("parse").to_string()
    }

    fn expr_err(text: &str) -> String {
        parse_expr(text).err().expect("parse error").message
    }

    #[test]
    fn whole_label_constants() {
        assert_eq!(parse_expr("*").expect("parse"), AttributeExpr::Allow);
        assert_eq!(parse_expr(" ! ").expect("parse"), AttributeExpr::Deny);
    }

    #[test]
    fn constants_inside_expressions_are_rejected() {
        assert!(parse_expr("a & *").is_err());
        assert!(parse_expr("! | b").is_err());
    }

    #[test]
    fn relation_and_boolean_structure() {
        assert_eq!(round_trip("role=engineer"), "role = engineer");
        assert_eq!(round_trip("a & b | c"), "a && b || c");
        assert_eq!(round_trip("a && (b || c)"), "a && (b || c)");
        assert_eq!(round_trip("status != retired"), "status != retired");
        assert_eq!(round_trip("level == high"), "level = high");
    }

    #[test]
    fn quoted_names_and_values() {
        assert_eq!(
            parse_expr("\"my attr\" = 'two words'").expect("parse"),
            AttributeExpr::eq(Attribute::new("my attr"), ValueTerm::value("two words"))
        );
    }

    #[test]
    fn true_false_parse_as_boolean_values() {
        assert_eq!(
            parse_expr("active = TRUE").expect("parse"),
            AttributeExpr::eq(Attribute::new("active"), ValueTerm::TRUE)
        );
    }

    #[test]
    fn numbers_are_string_values() {
        assert_eq!(
            parse_expr("version = 2").expect("parse"),
            AttributeExpr::eq(Attribute::new("version"), ValueTerm::value("2"))
        );
    }

    #[test]
    fn brace_set() {
        let expr = parse_expr("{dept, eng, ops}").expect("parse");
        assert_eq!(
            expr,
            AttributeExpr::InSet(SetTest {
                attribute: Attribute::new("dept"),
                members: vec![ValueTerm::value("eng"), ValueTerm::value("ops")],
            })
        );
        assert_eq!(round_trip("{ dept }"), "{dept}");
    }

    #[test]
    fn empty_input_is_end() {
        assert_eq!(expr_err(""), "END");
        assert_eq!(
            parse_attr_value("").err().expect("error").message,
            "END"
        );
        assert_eq!(parse_hierarchy("").err().expect("error").message, "END");
    }

    #[test]
    fn missing_rparen() {
        assert_eq!(expr_err("(a & b | \"*\""), "No RPAREN: [LPAREN:(]");
    }

    #[test]
    fn wrong_closing_token() {
        assert_eq!(expr_err("(a }"), "Expected RPAREN: [RBRACE:}]");
        assert_eq!(expr_err("{a )"), "Expected RBRACE: [RPAREN:)]");
        assert_eq!(expr_err("{a"), "No RBRACE: [LBRACE:{]");
    }

    #[test]
    fn empty_brace_set() {
        assert_eq!(expr_err("a & { }"), "Expected WORD after: [LBRACE:{]");
    }

    #[test]
    fn number_is_not_an_attribute() {
        assert_eq!(
            parse_attr_value("1.0:").err().expect("error").message,
            "Expected an attribute: Got a number: [DECIMAL:1.0]"
        );
    }

    #[test]
    fn hierarchy_missing_colon() {
        let err = parse_hierarchy("status public, confidential, sensitive, private")
            .err()
            .expect("error");
        assert_eq!(
            err.message,
            "Expected ':' after attribute name in hierarchy: [WORD:public]"
        );
    }

    #[test]
    fn hierarchy_parses_in_rank_order() {
        let h = parse_hierarchy("clearance: public, confidential, secret").expect("parse");
        assert_eq!(h.attribute(), &Attribute::new("clearance"));
        assert_eq!(
            h.values(),
            &[
                ValueTerm::value("public"),
                ValueTerm::value("confidential"),
                ValueTerm::value("secret"),
            ]
        );
    }

    #[test]
    fn hierarchy_trailing_comma() {
        let err = parse_hierarchy("clearance: public,").err().expect("error");
        assert_eq!(err.message, "Unexpected end to attribute value hierarchy");
    }

    #[test]
    fn hierarchy_duplicate_value() {
        let err = parse_hierarchy("clearance: public, public")
            .err()
            .expect("error");
        assert_eq!(err.message, "Duplicate in attribute value hierarchy: public");
    }

    #[test]
    fn ordinal_operators_are_rejected() {
        assert_eq!(expr_err("clearance < secret"), "Operator not supported: <");
        assert_eq!(expr_err("clearance >= secret"), "Operator not supported: >=");
    }

    #[test]
    fn keyword_is_not_an_attribute() {
        assert_eq!(expr_err("true = a"), "Found keyword 'true', not an attribute");
    }

    #[test]
    fn trailing_tokens() {
        assert_eq!(expr_err("a b"), "More tokens: [WORD:b]");
        assert_eq!(expr_err("a = 1."), "More tokens: [DOT:.]");
    }

    #[test]
    fn attr_value_forms() {
        assert_eq!(
            parse_attr_value("role = engineer").expect("parse"),
            AttributeValue::new(Attribute::new("role"), ValueTerm::value("engineer"))
        );
        // A bare name asserts the attribute as boolean true.
        assert_eq!(
            parse_attr_value("admin").expect("parse"),
            AttributeValue::new(Attribute::new("admin"), ValueTerm::TRUE)
        );
    }

    #[test]
    fn attr_value_list() {
        let list = parse_attr_value_list("role=engineer, dept = eng, admin").expect("parse");
        assert_eq!(list.len(), 3);
        assert_eq!(list[2].value, ValueTerm::TRUE);
        assert_eq!(parse_attr_value_list("").expect("parse"), vec![]);
        assert_eq!(
            parse_attr_value_list("a=1,").err().expect("error").message,
            "Trailing comma"
        );
    }

    #[test]
    fn expr_list() {
        let list = parse_expr_list("a & b, c=d").expect("parse");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].to_string(), "a && b");
        assert_eq!(parse_expr_list("").expect("parse"), vec![]);
    }

    #[test]
    fn value_term_list() {
        let list = parse_value_term_list("public, confidential, true").expect("parse");
        assert_eq!(
            list,
            vec![
                ValueTerm::value("public"),
                ValueTerm::value("confidential"),
                ValueTerm::TRUE,
            ]
        );
    }

    #[test]
    fn lexical_errors_surface_through_parse() {
        assert_eq!(expr_err("a ^ b"), "Bad character: ^");
        assert_eq!(expr_err("a = 'b"), "Broken token: b");
    }
}
