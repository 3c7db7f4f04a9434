use std::collections::BTreeMap;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::{CodeGraph, CodeNode, NodeKind};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Per-kind visibility, the search term and the show-connections flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    kinds: BTreeMap<NodeKind, bool>,
    search: String,
    show_connections: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            kinds: NodeKind::ALL.into_iter().map(|kind| (kind, true)).collect(),
            search: String::new(),
            show_connections: true,
        }
    }
}

impl FilterState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn kind_visible(&self, kind: NodeKind) -> bool {
        self.kinds.get(&kind).copied().unwrap_or(true)
    }

    pub fn set_kind_visible(&mut self, kind: NodeKind, visible: bool) {
        self.kinds.insert(kind, visible);
    }

    /// Applies every entry of `kinds`. Kinds missing from the map keep their
    /// current flag.
    pub fn set_kinds(&mut self, kinds: &BTreeMap<NodeKind, bool>) {
        for (&kind, &visible) in kinds {
            self.kinds.insert(kind, visible);
        }
    }

    pub fn kinds(&self) -> &BTreeMap<NodeKind, bool> {
        &self.kinds
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn show_connections(&self) -> bool {
        self.show_connections
    }

    pub fn set_show_connections(&mut self, show: bool) {
        self.show_connections = show;
    }

    /// Case-insensitive substring match on the node name. An empty term
    /// matches everything.
    pub fn matches_search(&self, name: &str) -> bool {
        self.search.is_empty() || name.to_lowercase().contains(&self.search.to_lowercase())
    }

    pub fn is_node_visible(&self, node: &CodeNode) -> bool {
        self.kind_visible(node.kind) && self.matches_search(&node.name)
    }

    /// Edge visibility only follows the show-connections flag, even when an
    /// endpoint is hidden.
    pub fn edges_visible(&self) -> bool {
        self.show_connections
    }

    /// Visible nodes whose name fuzzily matches the search term, best first.
    /// Empty when there is no term.
    pub fn ranked_matches(&self, graph: &CodeGraph, limit: usize) -> Vec<usize> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| self.is_node_visible(node))
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.name, query).map(|score| (score, index))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(limit);
        scored.into_iter().map(|(_, index)| index).collect()
    }
}
