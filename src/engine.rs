//! Query engine facade
//!
//! Bundles parsing, compilation and rendering behind two calls:
//! `create_filter` and `create_query`.

use crate::config::CompilerSettings;
use crate::convert::TypeRegistry;
use crate::error::Result;
use crate::models::FilterNode;
use crate::query::{FilterCompiler, MongoRenderer, RsqlParser, SyntaxNode};
use crate::schema::Schema;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Parses, compiles and renders RSQL filters for one schema
pub struct FilterEngine {
    compiler: FilterCompiler,
    renderer: MongoRenderer,
    settings: CompilerSettings,
}

impl FilterEngine {
    /// Create an engine without custom types
    pub fn new(schema: Arc<Schema>, settings: CompilerSettings) -> Result<Self> {
        Self::with_type_registry(schema, settings, TypeRegistry::new())
    }

    /// Create an engine with custom type parsers
    pub fn with_type_registry(
        schema: Arc<Schema>,
        settings: CompilerSettings,
        types: TypeRegistry,
    ) -> Result<Self> {
        let compiler = FilterCompiler::with_type_registry(schema, &settings, Arc::new(types))?;
        Ok(Self {
            compiler,
            renderer: MongoRenderer::new(),
            settings,
        })
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.compiler.resolver().schema()
    }

    pub fn compiler(&self) -> &FilterCompiler {
        &self.compiler
    }

    /// Parse an RSQL string
    pub fn parse(&self, rsql: &str) -> Result<SyntaxNode> {
        RsqlParser::new(rsql)?
            .with_max_depth(self.settings.max_depth)
            .parse()
    }

    /// Parse and compile an RSQL string for `entity`
    pub fn create_filter(&self, rsql: &str, entity: &str) -> Result<FilterNode> {
        let tree = self.parse(rsql)?;
        debug!(entity, query = rsql, "query parsed");
        self.compiler.compile(&tree, entity)
    }

    /// Parse, compile and render an RSQL string for `entity`
    pub fn create_query(&self, rsql: &str, entity: &str) -> Result<Value> {
        let filter = self.create_filter(rsql, entity)?;
        Ok(self.renderer.render(&filter))
    }
}
