//! Precomputed trigger strings for a forest.
//!
//! Every node with at least one child gets a trigger (its full path with a
//! trailing separator); leaves do not, since nothing can be typed past them.
//! The set seeds the scanner and the placeholder highlighter and is cached
//! for the lifetime of one forest instance.

use ctxfill_core::{CompletionError, EngineConfig, Result, SuggestionForest, SuggestionNode};
use indexmap::IndexSet;
use std::sync::Arc;

/// All valid triggers of one forest, in depth-first order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSet {
    default_trigger: String,
    triggers: IndexSet<String>,
}

impl TriggerSet {
    pub fn default_trigger(&self) -> &str {
        &self.default_trigger
    }

    pub fn contains(&self, trigger: &str) -> bool {
        self.triggers.contains(trigger)
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Generated triggers, without the default trigger
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.triggers.iter().map(|t| t.as_str())
    }

    /// Everything the scanner should look for: the default trigger followed
    /// by the generated ones
    pub fn scan_triggers(&self) -> Vec<&str> {
        std::iter::once(self.default_trigger.as_str())
            .chain(self.iter().filter(|t| *t != self.default_trigger))
            .collect()
    }
}

/// Builds [`TriggerSet`]s
#[derive(Debug, Clone)]
pub struct TriggerSetBuilder {
    default_trigger: String,
    separator: char,
    max_depth: usize,
}

impl TriggerSetBuilder {
    pub fn new(default_trigger: impl Into<String>, separator: char, max_depth: usize) -> Self {
        Self {
            default_trigger: default_trigger.into(),
            separator,
            max_depth,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.default_trigger(),
            config.path_separator(),
            config.max_forest_depth(),
        )
    }

    /// Depth-first traversal emitting a trigger for every node with children.
    ///
    /// Fails with `ForestTooDeep` when the forest nests deeper than the
    /// configured limit; that is a caller invariant violation.
    pub fn build(&self, forest: &SuggestionForest) -> Result<TriggerSet> {
        let mut triggers = IndexSet::new();
        let mut prefix = self.default_trigger.clone();
        self.collect(forest.roots(), &mut prefix, 1, &mut triggers)?;

        tracing::debug!(count = triggers.len(), "Built trigger set");

        Ok(TriggerSet {
            default_trigger: self.default_trigger.clone(),
            triggers,
        })
    }

    fn collect(
        &self,
        nodes: &[SuggestionNode],
        prefix: &mut String,
        depth: usize,
        triggers: &mut IndexSet<String>,
    ) -> Result<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        if depth > self.max_depth {
            tracing::error!(limit = self.max_depth, "Suggestion forest too deep");
            return Err(CompletionError::ForestTooDeep {
                limit: self.max_depth,
            });
        }

        for node in nodes {
            if !node.has_children() {
                continue;
            }
            let len = prefix.len();
            prefix.push_str(node.name());
            prefix.push(self.separator);

            triggers.insert(prefix.clone());
            self.collect(node.children(), prefix, depth + 1, triggers)?;

            prefix.truncate(len);
        }

        Ok(())
    }
}

/// Trigger set cached per forest generation.
///
/// The owner bumps the generation whenever it swaps the forest; a lookup with
/// a different generation rebuilds.
#[derive(Debug, Default)]
pub struct TriggerSetCache {
    entry: Option<(u64, Arc<TriggerSet>)>,
    builds: usize,
    hits: usize,
}

impl TriggerSetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached set for `generation`, building it from `forest` on a miss
    pub fn get_or_build(
        &mut self,
        generation: u64,
        forest: &SuggestionForest,
        builder: &TriggerSetBuilder,
    ) -> Result<Arc<TriggerSet>> {
        if let Some((cached_generation, set)) = &self.entry {
            if *cached_generation == generation {
                self.hits += 1;
                return Ok(Arc::clone(set));
            }
        }

        let set = Arc::new(builder.build(forest)?);
        self.builds += 1;
        self.entry = Some((generation, Arc::clone(&set)));
        Ok(set)
    }

    /// Drop the cached set
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached_generation: self.entry.as_ref().map(|(generation, _)| *generation),
            builds: self.builds,
            hits: self.hits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub cached_generation: Option<u64>,
    pub builds: usize,
    pub hits: usize,
}
