//! Recursive descent parser for RSQL
//!
//! # Grammar
//!
//! ```text
//! query       := or_expr EOF
//! or_expr     := and_expr ((',' | 'or') and_expr)*
//! and_expr    := constraint ((';' | 'and') constraint)*
//! constraint  := '(' or_expr ')' | comparison
//! comparison  := WORD OPERATOR arguments
//! arguments   := '(' value (',' value)* ')' | value
//! value       := WORD | QUOTED
//! ```

use super::lexer::{Lexer, Token};
use crate::error::{FilterError, Result};
use crate::query::ast::{ComparisonNode, LogicalOperator, SyntaxNode};
use crate::query::operator::ComparisonOperator;

/// Default limit on nested logical expressions
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limit on parenthesized groups, including redundant ones
pub const MAX_GROUP_NESTING: usize = 256;

/// Parser for RSQL filter expressions
pub struct RsqlParser {
    lexer: Lexer,
    current_token: Token,
    /// Offset of `current_token` in the input
    position: usize,
    max_depth: usize,
}

impl RsqlParser {
    /// Create a new parser for the given input
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;
        let position = lexer.token_start();

        Ok(Self {
            lexer,
            current_token,
            position,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Set the maximum nesting of logical expressions
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole input into a syntax tree
    pub fn parse(&mut self) -> Result<SyntaxNode> {
        if self.current_token == Token::Eof {
            return Err(FilterError::Syntax("empty query".to_string()));
        }

        let node = self.parse_or_expr(0)?;

        if self.current_token != Token::Eof {
            return Err(self.unexpected("end of input"));
        }

        Ok(node)
    }

    /// Parse: or_expr := and_expr ((',' | 'or') and_expr)*
    fn parse_or_expr(&mut self, depth: usize) -> Result<SyntaxNode> {
        let mut children = vec![self.parse_and_expr(depth)?];

        while self.current_token == Token::Comma || self.current_token.is_keyword("or") {
            self.advance()?;
            children.push(self.parse_and_expr(depth)?);
        }

        self.combine(LogicalOperator::Or, children)
    }

    /// Parse: and_expr := constraint ((';' | 'and') constraint)*
    fn parse_and_expr(&mut self, depth: usize) -> Result<SyntaxNode> {
        let mut children = vec![self.parse_constraint(depth)?];

        while self.current_token == Token::Semicolon || self.current_token.is_keyword("and") {
            self.advance()?;
            children.push(self.parse_constraint(depth)?);
        }

        self.combine(LogicalOperator::And, children)
    }

    /// A chain of one clause is the clause itself
    ///
    /// Checks the logical depth of the node being built, counted the same
    /// way as the compiler counts it.
    fn combine(&self, operator: LogicalOperator, mut children: Vec<SyntaxNode>) -> Result<SyntaxNode> {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return Ok(only);
            }
        }

        let node = SyntaxNode::Logical { operator, children };
        if node.logical_depth() > self.max_depth {
            return Err(FilterError::Syntax(format!(
                "logical expressions nested deeper than {} before position {}",
                self.max_depth, self.position
            )));
        }
        Ok(node)
    }

    /// Parse: constraint := '(' or_expr ')' | comparison
    fn parse_constraint(&mut self, depth: usize) -> Result<SyntaxNode> {
        if self.current_token != Token::LeftParen {
            return self.parse_comparison();
        }

        if depth >= MAX_GROUP_NESTING {
            return Err(FilterError::Syntax(format!(
                "parentheses nested deeper than {} at position {}",
                MAX_GROUP_NESTING, self.position
            )));
        }
        self.advance()?;
        let node = self.parse_or_expr(depth + 1)?;
        self.expect(Token::RightParen, "')'")?;
        Ok(node)
    }

    /// Parse: comparison := WORD OPERATOR arguments
    fn parse_comparison(&mut self) -> Result<SyntaxNode> {
        let selector = match &self.current_token {
            Token::Word(w) => w.clone(),
            _ => return Err(self.unexpected("selector")),
        };
        self.advance()?;

        let operator = match &self.current_token {
            Token::Operator(symbol) => ComparisonOperator::from_symbol(symbol).ok_or_else(|| {
                FilterError::Syntax(format!(
                    "unknown operator '{}' at position {}",
                    symbol, self.position
                ))
            })?,
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.advance()?;

        let arguments = self.parse_arguments()?;

        Ok(SyntaxNode::Comparison(ComparisonNode {
            selector,
            operator,
            arguments,
        }))
    }

    /// Parse: arguments := '(' value (',' value)* ')' | value
    fn parse_arguments(&mut self) -> Result<Vec<String>> {
        if self.current_token != Token::LeftParen {
            return Ok(vec![self.parse_value()?]);
        }

        self.advance()?;
        let mut values = vec![self.parse_value()?];
        while self.current_token == Token::Comma {
            self.advance()?;
            values.push(self.parse_value()?);
        }
        self.expect(Token::RightParen, "')'")?;
        Ok(values)
    }

    fn parse_value(&mut self) -> Result<String> {
        let value = match &self.current_token {
            Token::Word(w) | Token::Quoted(w) => w.clone(),
            _ => return Err(self.unexpected("value")),
        };
        self.advance()?;
        Ok(value)
    }

    fn advance(&mut self) -> Result<()> {
        self.current_token = self.lexer.next_token()?;
        self.position = self.lexer.token_start();
        Ok(())
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        if self.current_token == expected {
            self.advance()
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, expected: &str) -> FilterError {
        let found = match &self.current_token {
            Token::Eof => "end of input".to_string(),
            Token::Word(w) => format!("'{}'", w),
            Token::Quoted(q) => format!("\"{}\"", q),
            Token::Operator(o) => format!("'{}'", o),
            Token::Semicolon => "';'".to_string(),
            Token::Comma => "','".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
        };
        FilterError::Syntax(format!(
            "expected {} but found {} at position {}",
            expected, found, self.position
        ))
    }
}

/// Parse an RSQL string with the default depth limit
pub fn parse(input: &str) -> Result<SyntaxNode> {
    RsqlParser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(selector: &str, operator: ComparisonOperator, args: &[&str]) -> SyntaxNode {
        SyntaxNode::comparison(selector, operator, args.iter().copied())
    }

    #[test]
    fn test_single_comparison_has_no_wrapper() {
        assert_eq!(
            parse("age>=18").unwrap(),
            cmp("age", ComparisonOperator::GreaterThanOrEqual, &["18"])
        );
    }

    #[test]
    fn test_tree_shape() {
        let tree = parse("age>=18;(city==Prague,city==Brno)").unwrap();
        assert_eq!(
            tree,
            SyntaxNode::and(vec![
                cmp("age", ComparisonOperator::GreaterThanOrEqual, &["18"]),
                SyntaxNode::or(vec![
                    cmp("city", ComparisonOperator::Equal, &["Prague"]),
                    cmp("city", ComparisonOperator::Equal, &["Brno"]),
                ]),
            ])
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let tree = parse("a==1,b==2;c==3").unwrap();
        assert_eq!(
            tree,
            SyntaxNode::or(vec![
                cmp("a", ComparisonOperator::Equal, &["1"]),
                SyntaxNode::and(vec![
                    cmp("b", ComparisonOperator::Equal, &["2"]),
                    cmp("c", ComparisonOperator::Equal, &["3"]),
                ]),
            ])
        );
    }

    #[test]
    fn test_flat_chains() {
        match parse("a==1;b==2;c==3").unwrap() {
            SyntaxNode::Logical { operator, children } => {
                assert_eq!(operator, LogicalOperator::And);
                assert_eq!(children.len(), 3);
            }
            other => panic!("expected logical node, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_operators() {
        assert_eq!(
            parse("a==1 and b==2 OR c==3").unwrap(),
            parse("a==1;b==2,c==3").unwrap()
        );
    }

    #[test]
    fn test_multi_value_arguments() {
        assert_eq!(
            parse("status=in=(active, \"on hold\")").unwrap(),
            cmp("status", ComparisonOperator::In, &["active", "on hold"])
        );
        assert_eq!(
            parse("status=out=(x)").unwrap(),
            cmp("status", ComparisonOperator::NotIn, &["x"])
        );
    }

    #[test]
    fn test_single_operator_with_list_is_kept_for_compiler() {
        // arity is checked by the compiler, not the parser
        assert_eq!(
            parse("age==(1,2)").unwrap(),
            cmp("age", ComparisonOperator::Equal, &["1", "2"])
        );
    }

    #[test]
    fn test_redundant_parentheses() {
        assert_eq!(
            parse("((a==1))").unwrap(),
            cmp("a", ComparisonOperator::Equal, &["1"])
        );
    }

    #[test]
    fn test_display_round_trip() {
        for input in [
            "age>=18;(city==Prague,city==Brno)",
            "name=in=(\"John Doe\",x);n=like=\"^a b\"",
            "a==1,b==2;c==3",
        ] {
            let tree = parse(input).unwrap();
            assert_eq!(parse(&tree.to_string()).unwrap(), tree, "{}", input);
        }
    }

    #[test]
    fn test_syntax_errors() {
        for input in [
            "",
            "   ",
            "age",
            "age==",
            "age=foo=1",
            "==1",
            "a==1;",
            "(a==1",
            "a==1)",
            "a=in=()",
            "a=in=(1,)",
            "a==1 b==2",
        ] {
            match parse(input) {
                Err(FilterError::Syntax(_)) => {}
                other => panic!("expected syntax error for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_error_mentions_position() {
        let err = parse("a==1;b=foo=2").unwrap_err();
        assert!(err.to_string().contains("unknown operator '=foo='"), "{}", err);
        assert!(err.to_string().contains("position 6"), "{}", err);
    }

    fn parse_with_depth(input: &str, max_depth: usize) -> Result<SyntaxNode> {
        RsqlParser::new(input)?.with_max_depth(max_depth).parse()
    }

    #[test]
    fn test_max_depth_counts_logical_nodes() {
        // two levels without any parentheses
        assert!(parse_with_depth("a==1,a==2;a==3", 2).is_ok());
        assert!(matches!(
            parse_with_depth("a==1,a==2;a==3", 1),
            Err(FilterError::Syntax(_))
        ));
        assert!(parse_with_depth("a==1;b==2;c==3", 1).is_ok());
        assert!(parse_with_depth("a==1,a==2;(a==3,a==4)", 3).is_ok());
        assert!(parse_with_depth("a==1,a==2;(a==3,a==4)", 2).is_err());
    }

    #[test]
    fn test_redundant_parentheses_add_no_depth() {
        let deep = format!("{}a==1{}", "(".repeat(65), ")".repeat(65));
        assert_eq!(
            parse_with_depth(&deep, 1).unwrap(),
            cmp("a", ComparisonOperator::Equal, &["1"])
        );

        let grouped = format!("a==1;{}b==2,c==3{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(parse_with_depth(&grouped, 2).unwrap().logical_depth(), 2);
    }

    #[test]
    fn test_group_nesting_limit() {
        let n = MAX_GROUP_NESTING + 1;
        let deep = format!("{}a==1{}", "(".repeat(n), ")".repeat(n));
        match parse(&deep) {
            Err(FilterError::Syntax(message)) => assert!(message.contains("parentheses"), "{}", message),
            other => panic!("unexpected {:?}", other),
        }
    }
}
