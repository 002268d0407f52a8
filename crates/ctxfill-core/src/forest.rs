//! Suggestion forest - the hierarchical model behind placeholder completion
//!
//! A forest is an ordered list of root [`SuggestionNode`]s. Each node owns its
//! children, so the structure is acyclic by construction; depth is still
//! bounded by [`SuggestionForest::check_depth`] because hosts may hand us
//! arbitrarily deep generated data.
//!
//! The JSON shape accepted by [`SuggestionForest::from_json`] mirrors what
//! hosts typically already have:
//!
//! ```
//! use ctxfill_core::{NodeKind, SuggestionForest};
//!
//! let forest = SuggestionForest::from_json(r#"[
//!     { "value": "customer", "type": "entity", "options": [
//!         { "value": "name", "type": "string" }
//!     ]}
//! ]"#).unwrap();
//!
//! assert_eq!(forest.root_names(), vec!["customer"]);
//! assert_eq!(forest.roots()[0].kind(), &NodeKind::Entity);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CompletionError, Result};

/// Type tag of a suggestion node.
///
/// The tag is open: anything not listed is kept verbatim in `Other`. Only
/// `Function` changes engine behavior (callable leaves get call parentheses).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    #[default]
    Entity,
    Function,
    Query,
    String,
    Number,
    Boolean,
    Object,
    Other(std::string::String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Entity => "entity",
            NodeKind::Function => "function",
            NodeKind::Query => "query",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Object => "object",
            NodeKind::Other(tag) => tag,
        }
    }

    /// Whether nodes of this kind are inserted as zero-argument invocations
    pub fn is_callable(&self) -> bool {
        matches!(self, NodeKind::Function)
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "entity" => NodeKind::Entity,
            "function" => NodeKind::Function,
            "query" => NodeKind::Query,
            "string" => NodeKind::String,
            "number" => NodeKind::Number,
            "boolean" => NodeKind::Boolean,
            "object" => NodeKind::Object,
            _ => NodeKind::Other(tag.to_string()),
        }
    }
}

impl From<std::string::String> for NodeKind {
    fn from(tag: std::string::String) -> Self {
        NodeKind::from(tag.as_str())
    }
}

impl From<NodeKind> for std::string::String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the suggestion forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionNode {
    /// Path segment; unique among siblings only
    #[serde(rename = "value", alias = "name")]
    name: String,
    #[serde(rename = "type", alias = "kind", default)]
    kind: NodeKind,
    /// Children in display order
    #[serde(
        rename = "options",
        alias = "children",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    children: Vec<SuggestionNode>,
}

impl SuggestionNode {
    pub fn new(name: impl Into<String>, kind: impl Into<NodeKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            children: Vec::new(),
        }
    }

    /// Set the children
    pub fn with_children(mut self, children: Vec<SuggestionNode>) -> Self {
        self.children = children;
        self
    }

    /// Append one child
    pub fn with_child(mut self, child: SuggestionNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[SuggestionNode] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_callable(&self) -> bool {
        self.kind.is_callable()
    }

    /// Names of the direct children, in display order
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// First child with the given name. Sibling collisions resolve to the
    /// earliest declaration.
    pub fn child(&self, name: &str) -> Option<&SuggestionNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Ordered collection of root suggestion nodes.
///
/// Supplied wholesale by the host and never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionForest {
    roots: Vec<SuggestionNode>,
}

impl SuggestionForest {
    pub fn new(roots: Vec<SuggestionNode>) -> Self {
        Self { roots }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a forest from the host's JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn roots(&self) -> &[SuggestionNode] {
        &self.roots
    }

    pub fn root_names(&self) -> Vec<&str> {
        self.roots.iter().map(|r| r.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// First root with the given name
    pub fn root(&self, name: &str) -> Option<&SuggestionNode> {
        self.roots.iter().find(|r| r.name() == name)
    }

    /// Depth of the deepest node (roots are depth 1, empty forest is 0)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&SuggestionNode, usize)> =
            self.roots.iter().map(|r| (r, 1)).collect();

        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children().iter().map(|c| (c, depth + 1)));
        }

        deepest
    }

    /// Fail if the forest is deeper than `limit`
    pub fn check_depth(&self, limit: usize) -> Result<()> {
        let depth = self.depth();
        if depth > limit {
            tracing::error!(depth, limit, "Suggestion forest exceeds depth limit");
            return Err(CompletionError::ForestTooDeep { limit });
        }
        Ok(())
    }
}

impl From<Vec<SuggestionNode>> for SuggestionForest {
    fn from(roots: Vec<SuggestionNode>) -> Self {
        Self::new(roots)
    }
}
