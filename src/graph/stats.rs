use std::collections::BTreeMap;

use super::model::{CodeGraph, NodeKind};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub nodes_by_kind: BTreeMap<NodeKind, usize>,
    pub edges_by_kind: BTreeMap<String, usize>,
    pub average_degree: f32,
    pub connected_components: usize,
}

impl GraphStats {
    pub fn collect(graph: &CodeGraph) -> Self {
        let mut nodes_by_kind = BTreeMap::new();
        for node in &graph.nodes {
            *nodes_by_kind.entry(node.kind).or_insert(0) += 1;
        }

        let mut edges_by_kind = BTreeMap::new();
        for edge in &graph.edges {
            *edges_by_kind.entry(edge.kind.clone()).or_insert(0) += 1;
        }

        let average_degree = if graph.nodes.is_empty() {
            0.0
        } else {
            (graph.edges.len() * 2) as f32 / graph.nodes.len() as f32
        };

        Self {
            total_nodes: graph.nodes.len(),
            total_edges: graph.edges.len(),
            nodes_by_kind,
            edges_by_kind,
            average_degree,
            connected_components: weakly_connected_components(graph),
        }
    }
}

fn weakly_connected_components(graph: &CodeGraph) -> usize {
    fn find(parent: &mut [usize], mut index: usize) -> usize {
        while parent[index] != index {
            parent[index] = parent[parent[index]];
            index = parent[index];
        }
        index
    }

    let mut parent = (0..graph.nodes.len()).collect::<Vec<_>>();
    let mut components = graph.nodes.len();

    for (source, target) in graph.edge_pairs() {
        if source >= parent.len() || target >= parent.len() {
            continue;
        }

        let source_root = find(&mut parent, source);
        let target_root = find(&mut parent, target);
        if source_root != target_root {
            parent[source_root] = target_root;
            components -= 1;
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::{normalize, parse_graph_document};

    #[test]
    fn counts_kinds_degree_and_components() {
        let document = parse_graph_document(
            r#"{
                "hierarchical": [
                    {"id": "A", "type": "file", "children": [
                        {"id": "B", "type": "class", "children": [{"id": "C", "type": "method"}]}
                    ]},
                    {"id": "D", "type": "file"},
                    {"id": "E", "type": "file", "children": [{"id": "F", "type": "function"}]}
                ],
                "edges": [{"source": "C", "target": "F", "type": "calls"}]
            }"#,
        )
        .expect("document parses");
        let graph = normalize(&document);

        let stats = GraphStats::collect(&graph);

        assert_eq!(stats.total_nodes, 6);
        assert_eq!(stats.total_edges, 4);
        assert_eq!(stats.nodes_by_kind.get(&NodeKind::File), Some(&3));
        assert_eq!(stats.edges_by_kind.get("contains"), Some(&3));
        assert_eq!(stats.edges_by_kind.get("calls"), Some(&1));
        assert_eq!(stats.connected_components, 2);
        assert!((stats.average_degree - 8.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn empty_graph_has_no_components() {
        let stats = GraphStats::collect(&CodeGraph::default());

        assert_eq!(stats.total_nodes, 0);
        assert_eq!(stats.connected_components, 0);
        assert_eq!(stats.average_degree, 0.0);
    }
}
