use std::collections::HashSet;

use crate::graph::CodeGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// Nothing is selected.
    Normal,
    Selected,
    Connected,
    Dimmed,
}

/// The selected node plus every node sharing an edge with it, in either
/// direction and of any kind.
pub fn connected_set(graph: &CodeGraph, selected: usize) -> HashSet<usize> {
    let mut connected = HashSet::from([selected]);
    for edge in graph.incident_edges(selected) {
        if let Some(other) = edge.other_endpoint(selected) {
            connected.insert(other);
        }
    }
    connected
}

/// Emphasis for one selection. Rebuilt from scratch on every selection change.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
    selected: Option<usize>,
    connected: HashSet<usize>,
}

impl HighlightState {
    pub fn for_selection(graph: &CodeGraph, selected: Option<usize>) -> Self {
        match selected {
            Some(index) if index < graph.node_count() => Self {
                selected: Some(index),
                connected: connected_set(graph, index),
            },
            _ => Self::default(),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn connected(&self) -> &HashSet<usize> {
        &self.connected
    }

    pub fn node_emphasis(&self, index: usize) -> Emphasis {
        match self.selected {
            None => Emphasis::Normal,
            Some(selected) if selected == index => Emphasis::Selected,
            Some(_) if self.connected.contains(&index) => Emphasis::Connected,
            Some(_) => Emphasis::Dimmed,
        }
    }

    /// Edges touching the selected node are connected, every other edge is
    /// dimmed.
    pub fn edge_emphasis(&self, source: usize, target: usize) -> Emphasis {
        match self.selected {
            None => Emphasis::Normal,
            Some(selected) if source == selected || target == selected => Emphasis::Connected,
            Some(_) => Emphasis::Dimmed,
        }
    }
}
