//! Syntax tree to filter compiler
//!
//! Walks a `SyntaxNode` depth-first, left to right. Each comparison is
//! resolved against the schema, checked for arity and then converted, in
//! that order. The first error aborts the whole compilation.

use super::ast::{ComparisonNode, SyntaxNode};
use super::operator::{Arity, ComparisonOperator};
use crate::config::CompilerSettings;
use crate::convert::{TypeRegistry, ValueConverter};
use crate::error::{FilterError, Result};
use crate::models::{FieldFilter, FilterNode, FilterValue, LogicalNode, TypedValue};
use crate::schema::{Schema, SchemaResolver};
use std::sync::Arc;
use tracing::{debug, trace};

/// Compiles syntax trees into typed filters for one schema
///
/// Holds no per-query state; a single instance can be shared by threads.
pub struct FilterCompiler {
    resolver: SchemaResolver,
    converter: ValueConverter,
    max_depth: usize,
}

impl FilterCompiler {
    /// Create a compiler without custom types
    pub fn new(schema: Arc<Schema>, settings: &CompilerSettings) -> Result<Self> {
        Self::with_type_registry(schema, settings, Arc::new(TypeRegistry::new()))
    }

    /// Create a compiler that converts custom types through `types`
    pub fn with_type_registry(
        schema: Arc<Schema>,
        settings: &CompilerSettings,
        types: Arc<TypeRegistry>,
    ) -> Result<Self> {
        let converter = ValueConverter::with_type_registry(settings, types)?;
        Ok(Self {
            resolver: SchemaResolver::new(schema, settings),
            converter,
            max_depth: settings.max_depth,
        })
    }

    pub fn resolver(&self) -> &SchemaResolver {
        &self.resolver
    }

    pub fn converter(&self) -> &ValueConverter {
        &self.converter
    }

    /// Compile `root` against the schema of `entity`
    pub fn compile(&self, root: &SyntaxNode, entity: &str) -> Result<FilterNode> {
        self.resolver.schema().entity(entity)?;

        let filter = self.compile_node(root, entity, 0)?;
        debug!(entity, clauses = filter.field_count(), "filter compiled");
        Ok(filter)
    }

    fn compile_node(&self, node: &SyntaxNode, entity: &str, depth: usize) -> Result<FilterNode> {
        match node {
            SyntaxNode::Logical { operator, children } => {
                if depth >= self.max_depth {
                    return Err(FilterError::Syntax(format!(
                        "logical expressions nested deeper than {}",
                        self.max_depth
                    )));
                }
                if children.is_empty() {
                    return Err(FilterError::Syntax(format!(
                        "{} expression without operands",
                        operator
                    )));
                }

                let children = children
                    .iter()
                    .map(|child| self.compile_node(child, entity, depth + 1))
                    .collect::<Result<Vec<_>>>()?;

                Ok(FilterNode::Logical(LogicalNode {
                    join: *operator,
                    children,
                }))
            }
            SyntaxNode::Comparison(comparison) => self.compile_comparison(comparison, entity),
        }
    }

    fn compile_comparison(&self, node: &ComparisonNode, entity: &str) -> Result<FilterNode> {
        let descriptor = self.resolver.resolve(&node.selector, entity)?;

        let got = node.arguments.len();
        let arity_ok = match node.operator.arity() {
            Arity::Single => got == 1,
            Arity::Multi => got >= 1,
        };
        if !arity_ok {
            return Err(FilterError::Arity {
                selector: node.selector.clone(),
                operator: node.operator,
                got,
                expected: 1,
            });
        }

        let value = match (node.operator, node.arguments.as_slice()) {
            // patterns pass through untouched
            (ComparisonOperator::Like, [pattern]) => {
                Ok(FilterValue::Single(TypedValue::String(pattern.clone())))
            }
            (operator, arguments) if operator.is_multi_value() => self
                .converter
                .convert_all(arguments, &descriptor.value_type)
                .map(FilterValue::Multiple),
            (_, [raw]) => self
                .converter
                .convert(raw, &descriptor.value_type)
                .map(FilterValue::Single),
            (operator, _) => Err(FilterError::Internal(format!(
                "unchecked arity for operator {}",
                operator
            ))),
        }
        .map_err(|e| e.with_selector(&node.selector))?;

        trace!(
            selector = %node.selector,
            path = %descriptor.storage_path,
            operator = %node.operator,
            "clause compiled"
        );

        Ok(FilterNode::Field(FieldFilter {
            path: descriptor.storage_path,
            operator: node.operator,
            value,
        }))
    }
}
