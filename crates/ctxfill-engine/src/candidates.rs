//! Candidate filtering for one level of the forest.

use ctxfill_core::{NodeKind, SuggestionNode};
use std::ops::Range;

use crate::scanner::ScanOptions;

/// A completion offered at the current depth.
///
/// Carries the node's `kind` so the presentation layer can render it without
/// looking anything up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub kind: NodeKind,
    /// Whether committing this candidate keeps the placeholder open
    pub has_children: bool,
    /// Byte range of the typed partial text inside `name`
    pub highlight: Option<Range<usize>>,
}

impl Candidate {
    pub fn from_node(node: &SuggestionNode, highlight: Option<Range<usize>>) -> Self {
        Self {
            name: node.name().to_string(),
            kind: node.kind().clone(),
            has_children: node.has_children(),
            highlight,
        }
    }

    pub fn is_callable(&self) -> bool {
        self.kind.is_callable()
    }
}

/// Keep the nodes whose name matches `partial`, in declaration order.
///
/// Prefix match by default, substring match when `match_any` is set.
pub fn filter_candidates(nodes: &[SuggestionNode], partial: &str, options: ScanOptions) -> Vec<Candidate> {
    nodes
        .iter()
        .filter_map(|node| {
            match_position(node.name(), partial, options)
                .map(|pos| Candidate::from_node(node, highlight_range(node.name(), pos, partial)))
        })
        .collect()
}

/// Whether `partial` matches `name`, with the match position when it maps
/// onto `name`'s bytes
fn match_position(name: &str, partial: &str, options: ScanOptions) -> Option<Option<usize>> {
    if partial.is_empty() {
        return Some(None);
    }

    if options.case_insensitive {
        let name_lower = name.to_lowercase();
        let pos = name_lower.find(&partial.to_lowercase())?;
        if !(options.match_any || pos == 0) {
            return None;
        }
        // Lowercasing can change byte lengths
        Some((name_lower.len() == name.len()).then_some(pos))
    } else {
        let pos = name.find(partial)?;
        (options.match_any || pos == 0).then_some(Some(pos))
    }
}

fn highlight_range(name: &str, pos: Option<usize>, partial: &str) -> Option<Range<usize>> {
    let pos = pos?;
    let end = pos + partial.len();
    (end <= name.len() && name.is_char_boundary(pos) && name.is_char_boundary(end)).then(|| pos..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nodes() -> Vec<SuggestionNode> {
        vec![
            SuggestionNode::new("name", NodeKind::String),
            SuggestionNode::new("age", NodeKind::Number),
            SuggestionNode::new("getAddress", NodeKind::Function)
                .with_child(SuggestionNode::new("zip", NodeKind::String)),
            SuggestionNode::new("getName", NodeKind::Function),
        ]
    }

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_empty_partial_keeps_everything() {
        let result = filter_candidates(&nodes(), "", ScanOptions::new());
        assert_eq!(names(&result), vec!["name", "age", "getAddress", "getName"]);
        assert!(result.iter().all(|c| c.highlight.is_none()));
        assert!(result[2].has_children);
        assert!(result[2].is_callable());
    }

    #[test]
    fn test_prefix_match() {
        let result = filter_candidates(&nodes(), "get", ScanOptions::new());
        assert_eq!(names(&result), vec!["getAddress", "getName"]);
        assert_eq!(result[0].highlight, Some(0..3));
    }

    #[test]
    fn test_match_any() {
        let options = ScanOptions::new().match_any(true);
        let result = filter_candidates(&nodes(), "Name", options);
        assert_eq!(names(&result), vec!["getName"]);
        assert_eq!(result[0].highlight, Some(3..7));

        let prefix_only = filter_candidates(&nodes(), "Name", ScanOptions::new());
        assert!(prefix_only.is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let options = ScanOptions::new().case_insensitive(true).match_any(true);
        let result = filter_candidates(&nodes(), "NAME", options);
        assert_eq!(names(&result), vec!["name", "getName"]);
        assert_eq!(result[1].highlight, Some(3..7));

        let sensitive = filter_candidates(&nodes(), "NAME", ScanOptions::new().match_any(true));
        assert!(sensitive.is_empty());
    }

    #[test]
    fn test_no_match() {
        assert!(filter_candidates(&nodes(), "zzz", ScanOptions::new().match_any(true)).is_empty());
    }
}
