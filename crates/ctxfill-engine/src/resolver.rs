//! Resolution of dotted trigger paths against a suggestion forest.
//!
//! A trigger path is `<default trigger><name1>.<name2>.….<nameN>.`. The
//! resolver walks the forest depth-first, extending an accumulated path with
//! `<name>.` at each node: an exact match returns the node, a prefix match
//! descends into its children. Sibling name collisions resolve to the first
//! node in declaration order.

use ctxfill_core::{CompletionError, EngineConfig, NodeKind, Result, SuggestionForest, SuggestionNode};

/// A node addressed by a trigger path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode<'f> {
    node: &'f SuggestionNode,
    path: Vec<&'f str>,
}

impl<'f> ResolvedNode<'f> {
    pub fn node(&self) -> &'f SuggestionNode {
        self.node
    }

    pub fn name(&self) -> &'f str {
        self.node.name()
    }

    pub fn kind(&self) -> &'f NodeKind {
        self.node.kind()
    }

    /// Names from the root down to this node
    pub fn path(&self) -> &[&'f str] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn children(&self) -> &'f [SuggestionNode] {
        self.node.children()
    }

    /// The next candidate list
    pub fn child_names(&self) -> Vec<&'f str> {
        self.node.child_names()
    }

    /// No further drill-down is possible
    pub fn is_terminal(&self) -> bool {
        !self.node.has_children()
    }

    pub fn is_callable(&self) -> bool {
        self.node.is_callable()
    }
}

/// The nodes to offer for a trigger
#[derive(Debug, Clone)]
pub struct CandidateLevel<'f> {
    /// Resolved parent, `None` at root level
    pub parent: Option<ResolvedNode<'f>>,
    /// Nodes at this level, in display order
    pub nodes: &'f [SuggestionNode],
    /// The trigger did not resolve and root level was used instead
    pub fell_back: bool,
}

/// Resolves trigger paths to forest nodes
#[derive(Debug, Clone)]
pub struct ForestResolver {
    default_trigger: String,
    separator: char,
}

impl ForestResolver {
    pub fn new(default_trigger: impl Into<String>, separator: char) -> Self {
        Self {
            default_trigger: default_trigger.into(),
            separator,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.default_trigger(), config.path_separator())
    }

    pub fn default_trigger(&self) -> &str {
        &self.default_trigger
    }

    /// Find the node addressed by `trigger_path`.
    ///
    /// Returns `None` for dangling paths; callers fall back to root level.
    /// Recursion depth is bounded by the path length, since every level
    /// consumes at least one separator.
    pub fn resolve<'f>(
        &self,
        trigger_path: &str,
        forest: &'f SuggestionForest,
    ) -> Option<ResolvedNode<'f>> {
        if !trigger_path.starts_with(&self.default_trigger) {
            return None;
        }

        let mut prefix = self.default_trigger.clone();
        let mut path = Vec::new();
        let found = self.resolve_in(trigger_path, forest.roots(), &mut prefix, &mut path);

        if found.is_none() {
            tracing::trace!(trigger = %trigger_path, "Trigger path did not resolve");
        }
        found
    }

    /// Like [`resolve`](Self::resolve), reporting dangling paths as
    /// `UnresolvableTriggerPath`
    pub fn try_resolve<'f>(
        &self,
        trigger_path: &str,
        forest: &'f SuggestionForest,
    ) -> Result<ResolvedNode<'f>> {
        self.resolve(trigger_path, forest)
            .ok_or_else(|| CompletionError::UnresolvableTriggerPath(trigger_path.to_string()))
    }

    fn resolve_in<'f>(
        &self,
        trigger_path: &str,
        nodes: &'f [SuggestionNode],
        prefix: &mut String,
        path: &mut Vec<&'f str>,
    ) -> Option<ResolvedNode<'f>> {
        for node in nodes {
            let len = prefix.len();
            prefix.push_str(node.name());
            prefix.push(self.separator);
            path.push(node.name());

            if trigger_path == prefix.as_str() {
                return Some(ResolvedNode {
                    node,
                    path: path.clone(),
                });
            }

            if node.has_children() && trigger_path.starts_with(prefix.as_str()) {
                if let Some(found) = self.resolve_in(trigger_path, node.children(), prefix, path) {
                    return Some(found);
                }
            }

            prefix.truncate(len);
            path.pop();
        }

        None
    }

    /// Candidate nodes for a trigger: root level for the default trigger,
    /// the resolved node's children otherwise, root level again when the
    /// trigger does not resolve
    pub fn level<'f>(&self, trigger: &str, forest: &'f SuggestionForest) -> CandidateLevel<'f> {
        if trigger == self.default_trigger {
            return CandidateLevel {
                parent: None,
                nodes: forest.roots(),
                fell_back: false,
            };
        }

        match self.resolve(trigger, forest) {
            Some(parent) => {
                let nodes = parent.children();
                CandidateLevel {
                    parent: Some(parent),
                    nodes,
                    fell_back: false,
                }
            }
            None => {
                tracing::debug!(trigger = %trigger, "Unresolvable trigger path, using root level");
                CandidateLevel {
                    parent: None,
                    nodes: forest.roots(),
                    fell_back: true,
                }
            }
        }
    }

    /// Trigger path of a node given its names from the root
    pub fn path_for<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut trigger = self.default_trigger.clone();
        for name in names {
            trigger.push_str(name.as_ref());
            trigger.push(self.separator);
        }
        trigger
    }
}
