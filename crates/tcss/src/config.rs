//! Engine Configuration

use crate::function::FunctionRegistry;
use crate::property::{ParseContext, PropertyRegistry};
use crate::selector::DEFAULT_MAX_NODE_DEPTH;

/// Stylesheet configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Property classes by name, plus the catch-all class
    pub properties: PropertyRegistry,

    /// CSS function hooks, e.g. `url()`
    pub functions: FunctionRegistry,

    /// Bound on container and base-style walks (cycle defence)
    pub max_node_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            properties: PropertyRegistry::standard(),
            functions: FunctionRegistry::standard(),
            max_node_depth: DEFAULT_MAX_NODE_DEPTH,
        }
    }
}

impl Config {
    pub fn parse_context(&self) -> ParseContext<'_> {
        ParseContext {
            registry: &self.properties,
            functions: &self.functions,
        }
    }
}
