//! Syntax tree for parsed filter expressions
//!
//! The tree is produced by the RSQL parser (or built by hand) and consumed
//! by the compiler. It is plain data: selectors and arguments are still
//! untyped strings.

use super::operator::{Arity, ComparisonOperator};
use std::fmt;

/// Logical combinator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "AND"),
            LogicalOperator::Or => write!(f, "OR"),
        }
    }
}

/// A node of the syntax tree
#[derive(Clone, Debug, PartialEq)]
pub enum SyntaxNode {
    Logical {
        operator: LogicalOperator,
        children: Vec<SyntaxNode>,
    },
    Comparison(ComparisonNode),
}

/// A single `selector operator arguments` clause
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonNode {
    pub selector: String,
    pub operator: ComparisonOperator,
    pub arguments: Vec<String>,
}

impl SyntaxNode {
    pub fn and(children: Vec<SyntaxNode>) -> Self {
        SyntaxNode::Logical {
            operator: LogicalOperator::And,
            children,
        }
    }

    pub fn or(children: Vec<SyntaxNode>) -> Self {
        SyntaxNode::Logical {
            operator: LogicalOperator::Or,
            children,
        }
    }

    /// Create a comparison clause
    pub fn comparison<I, S>(selector: impl Into<String>, operator: ComparisonOperator, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SyntaxNode::Comparison(ComparisonNode {
            selector: selector.into(),
            operator,
            arguments: arguments.into_iter().map(Into::into).collect(),
        })
    }

    /// Nesting depth (a comparison has depth 1)
    pub fn depth(&self) -> usize {
        match self {
            SyntaxNode::Comparison(_) => 1,
            SyntaxNode::Logical { children, .. } => {
                1 + children.iter().map(SyntaxNode::depth).max().unwrap_or(0)
            }
        }
    }

    /// Nesting of logical nodes (a comparison has logical depth 0)
    pub fn logical_depth(&self) -> usize {
        self.depth() - 1
    }

    /// Selectors in depth-first, left-to-right order
    pub fn selectors(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_selectors(&mut out);
        out
    }

    fn collect_selectors<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            SyntaxNode::Comparison(c) => out.push(&c.selector),
            SyntaxNode::Logical { children, .. } => {
                for child in children {
                    child.collect_selectors(out);
                }
            }
        }
    }
}

/// Check if a value can be written without quotes
fn is_unreserved(value: &str) -> bool {
    !value.is_empty()
        && !value.chars().any(|c| {
            c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')' | ';' | ',' | '=' | '!' | '~' | '<' | '>')
        })
        && !value.eq_ignore_ascii_case("and")
        && !value.eq_ignore_ascii_case("or")
}

fn write_argument(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if is_unreserved(value) {
        return f.write_str(value);
    }
    f.write_str("\"")?;
    for c in value.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

/// Formats back to RSQL text that parses to an equal tree
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxNode::Comparison(c) => {
                write!(f, "{}{}", c.selector, c.operator)?;
                if c.operator.arity() == Arity::Single && c.arguments.len() == 1 {
                    return write_argument(f, &c.arguments[0]);
                }
                f.write_str("(")?;
                for (i, arg) in c.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_argument(f, arg)?;
                }
                f.write_str(")")
            }
            SyntaxNode::Logical { operator, children } => {
                let separator = match operator {
                    LogicalOperator::And => ";",
                    LogicalOperator::Or => ",",
                };
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    if matches!(child, SyntaxNode::Logical { .. }) {
                        write!(f, "({})", child)?;
                    } else {
                        write!(f, "{}", child)?;
                    }
                }
                Ok(())
            }
        }
    }
}
