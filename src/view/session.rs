use std::collections::BTreeMap;
use std::time::Duration;

use eframe::egui::Vec2;
use tracing::{debug, info};

use super::filter::FilterState;
use super::highlight::{Emphasis, HighlightState};
use super::transform::ViewTransform;
use crate::graph::{CodeGraph, CodeNode, GraphDocument, GraphStats, NodeKind, normalize};
use crate::layout::{LayoutConfig, LayoutEngine, LayoutNode};

pub type SelectListener = Box<dyn FnMut(Option<&CodeNode>)>;

/// Everything one open graph needs: the normalized graph, its layout, the
/// selection and highlight, filters and the view transform. Hosts drive it
/// through the methods below and read back emphasis and visibility per
/// element when drawing.
pub struct Session {
    graph: CodeGraph,
    stats: GraphStats,
    engine: LayoutEngine,
    generation: u64,
    selected: Option<usize>,
    highlight: HighlightState,
    hovered: Option<usize>,
    filters: FilterState,
    transform: ViewTransform,
    select_listeners: Vec<SelectListener>,
}

impl Session {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            graph: CodeGraph::default(),
            stats: GraphStats::default(),
            engine: LayoutEngine::new(config),
            generation: 0,
            selected: None,
            highlight: HighlightState::default(),
            hovered: None,
            filters: FilterState::default(),
            transform: ViewTransform::default(),
            select_listeners: Vec::new(),
        }
    }

    /// Installs `document` in place of the current graph and starts laying it
    /// out. Selection and hover are dropped; filters and the view stay.
    pub fn load(&mut self, document: &GraphDocument) {
        let graph = normalize(document);
        self.stats = GraphStats::collect(&graph);
        self.engine.load(&graph);
        self.graph = graph;
        self.generation += 1;
        self.hovered = None;
        self.clear_selection();
        self.engine.start();

        info!(
            generation = self.generation,
            language = %self.graph.language,
            nodes = self.stats.total_nodes,
            edges = self.stats.total_edges,
            dropped_edges = self.graph.dropped_edges,
            "graph loaded"
        );
    }

    pub fn graph(&self) -> &CodeGraph {
        &self.graph
    }

    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn layout_nodes(&self) -> &[LayoutNode] {
        self.engine.nodes()
    }

    /// Bumped on every load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn on_node_select(&mut self, listener: impl FnMut(Option<&CodeNode>) + 'static) {
        self.select_listeners.push(Box::new(listener));
    }

    pub fn on_tick(&mut self, listener: impl FnMut(&[LayoutNode]) + 'static) {
        self.engine.on_tick(listener);
    }

    fn notify_selection(&mut self) {
        let node = self.selected.and_then(|index| self.graph.nodes.get(index));
        for listener in &mut self.select_listeners {
            listener(node);
        }
    }

    /// Selects the node with `id`. Unknown ids leave the selection alone.
    pub fn select(&mut self, id: &str) -> bool {
        match self.graph.index_of(id) {
            Some(index) => self.select_index(index),
            None => false,
        }
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        if index >= self.graph.node_count() {
            return false;
        }

        self.selected = Some(index);
        self.highlight = HighlightState::for_selection(&self.graph, Some(index));
        debug!(
            id = %self.graph.nodes[index].id,
            connected = self.highlight.connected().len(),
            "node selected"
        );
        self.notify_selection();
        true
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_none() {
            return;
        }
        self.highlight = HighlightState::default();
        self.notify_selection();
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_node(&self) -> Option<&CodeNode> {
        self.selected.and_then(|index| self.graph.nodes.get(index))
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn node_emphasis(&self, index: usize) -> Emphasis {
        self.highlight.node_emphasis(index)
    }

    pub fn edge_emphasis(&self, edge_index: usize) -> Emphasis {
        match self.graph.edges.get(edge_index) {
            Some(edge) => self.highlight.edge_emphasis(edge.source, edge.target),
            None => Emphasis::Normal,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, kinds: &BTreeMap<NodeKind, bool>) {
        self.filters.set_kinds(kinds);
    }

    pub fn set_kind_visible(&mut self, kind: NodeKind, visible: bool) {
        self.filters.set_kind_visible(kind, visible);
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filters.set_search(term);
    }

    pub fn set_show_connections(&mut self, show: bool) {
        self.filters.set_show_connections(show);
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
    }

    pub fn is_node_visible(&self, index: usize) -> bool {
        self.graph
            .nodes
            .get(index)
            .is_some_and(|node| self.filters.is_node_visible(node))
    }

    pub fn is_label_visible(&self, index: usize) -> bool {
        self.is_node_visible(index)
    }

    pub fn is_edge_visible(&self, edge_index: usize) -> bool {
        edge_index < self.graph.edge_count() && self.filters.edges_visible()
    }

    pub fn search_matches(&self, limit: usize) -> Vec<usize> {
        self.filters.ranked_matches(&self.graph, limit)
    }

    /// Visible node under `world`, topmost first.
    pub fn node_at(&self, world: Vec2) -> Option<usize> {
        self.engine.node_at(world, |index| self.is_node_visible(index))
    }

    pub fn hover(&mut self, world: Option<Vec2>) -> Option<usize> {
        self.hovered = world.and_then(|world| self.node_at(world));
        self.hovered
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Selects the visible node under `world`, or clears the selection when
    /// the click lands on empty canvas.
    pub fn click(&mut self, world: Vec2) -> Option<usize> {
        match self.node_at(world) {
            Some(index) => {
                self.select_index(index);
                Some(index)
            }
            None => {
                self.clear_selection();
                None
            }
        }
    }

    pub fn drag_start(&mut self, world: Vec2) -> Option<usize> {
        let index = self.node_at(world)?;
        self.engine.drag_start(index).then_some(index)
    }

    pub fn drag_to(&mut self, world: Vec2) {
        self.engine.drag_to(world);
    }

    pub fn drag_end(&mut self) {
        self.engine.drag_end();
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    pub fn reset_positions(&mut self) {
        self.engine.reset_positions();
    }

    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.engine.tick(elapsed)
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut ViewTransform {
        &mut self.transform
    }

    pub fn zoom_in(&mut self) {
        self.transform.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.transform.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.transform.reset();
    }
}
