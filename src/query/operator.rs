//! Comparison operators
//!
//! Every per-operator fact (RSQL spellings, arity class, backend rendering)
//! lives in the single static `OPERATORS` table below.

use serde_json::{Map, Value};
use std::fmt;

/// How many arguments an operator takes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one argument
    Single,
    /// One or more arguments
    Multi,
}

/// Comparison operator of a query clause
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    All,
    /// Free-text / regular expression match
    Like,
}

/// Renders `{path: value}` into a backend filter document
pub type RenderFn = fn(&str, Value) -> Value;

/// Static description of an operator
pub struct OperatorDef {
    pub operator: ComparisonOperator,
    /// RSQL spellings; the first one is canonical
    pub symbols: &'static [&'static str],
    pub arity: Arity,
    pub render: RenderFn,
}

fn document(path: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(path.to_string(), value);
    Value::Object(map)
}

fn wrap(path: &str, key: &str, value: Value) -> Value {
    document(path, document(key, value))
}

/// The operator table, one entry per operator in declaration order
pub static OPERATORS: [OperatorDef; 10] = [
    OperatorDef {
        operator: ComparisonOperator::Equal,
        symbols: &["=="],
        arity: Arity::Single,
        render: document,
    },
    OperatorDef {
        operator: ComparisonOperator::NotEqual,
        symbols: &["!="],
        arity: Arity::Single,
        render: |path, value| wrap(path, "$ne", value),
    },
    OperatorDef {
        operator: ComparisonOperator::GreaterThan,
        symbols: &[">", "=gt="],
        arity: Arity::Single,
        render: |path, value| wrap(path, "$gt", value),
    },
    OperatorDef {
        operator: ComparisonOperator::GreaterThanOrEqual,
        symbols: &[">=", "=ge="],
        arity: Arity::Single,
        render: |path, value| wrap(path, "$gte", value),
    },
    OperatorDef {
        operator: ComparisonOperator::LessThan,
        symbols: &["<", "=lt="],
        arity: Arity::Single,
        render: |path, value| wrap(path, "$lt", value),
    },
    OperatorDef {
        operator: ComparisonOperator::LessThanOrEqual,
        symbols: &["<=", "=le="],
        arity: Arity::Single,
        render: |path, value| wrap(path, "$lte", value),
    },
    OperatorDef {
        operator: ComparisonOperator::In,
        symbols: &["=in="],
        arity: Arity::Multi,
        render: |path, value| wrap(path, "$in", value),
    },
    OperatorDef {
        operator: ComparisonOperator::NotIn,
        symbols: &["=out="],
        arity: Arity::Multi,
        render: |path, value| wrap(path, "$nin", value),
    },
    OperatorDef {
        operator: ComparisonOperator::All,
        symbols: &["=all="],
        arity: Arity::Multi,
        render: |path, value| wrap(path, "$all", value),
    },
    OperatorDef {
        operator: ComparisonOperator::Like,
        symbols: &["=like=", "=re="],
        arity: Arity::Single,
        render: |path, value| wrap(path, "$regex", value),
    },
];

impl ComparisonOperator {
    /// All operators, in table order
    pub fn all() -> impl Iterator<Item = ComparisonOperator> {
        OPERATORS.iter().map(|def| def.operator)
    }

    /// Look up an operator by any of its RSQL spellings
    pub fn from_symbol(symbol: &str) -> Option<ComparisonOperator> {
        OPERATORS
            .iter()
            .find(|def| def.symbols.iter().any(|s| *s == symbol))
            .map(|def| def.operator)
    }

    /// Table entry for this operator
    pub fn def(self) -> &'static OperatorDef {
        // table order matches declaration order
        &OPERATORS[self as usize]
    }

    pub fn arity(self) -> Arity {
        self.def().arity
    }

    pub fn is_multi_value(self) -> bool {
        self.arity() == Arity::Multi
    }

    /// Canonical RSQL spelling
    pub fn symbol(self) -> &'static str {
        self.def().symbols[0]
    }

    /// Render a filter on `path` with an already rendered value
    pub fn render(self, path: &str, value: Value) -> Value {
        (self.def().render)(path, value)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
