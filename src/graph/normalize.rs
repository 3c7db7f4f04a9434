use std::collections::HashMap;

use tracing::{debug, warn};

use super::document::{GraphDocument, GraphNode};
use super::model::{CONTAINS, CodeEdge, CodeGraph, CodeNode};

/// Flattens the document hierarchy into a pre-order node list and merges the
/// supplied edges.
///
/// Every parent/child pair becomes a `contains` edge. Supplied edges of kind
/// `contains` are ignored in favour of the synthesized ones, and supplied edges
/// whose endpoints do not resolve are dropped without failing the load.
pub fn normalize(document: &GraphDocument) -> CodeGraph {
    let mut nodes = Vec::new();
    let mut index_by_id = HashMap::new();
    let mut edges = Vec::new();
    let mut root_count = 0usize;

    for root in document.roots() {
        if flatten_node(root, None, 0, &mut nodes, &mut index_by_id, &mut edges) {
            root_count += 1;
        }
    }

    let mut dropped_edges = 0usize;
    for edge in document
        .edges
        .iter()
        .chain(document.external_dependencies.iter())
    {
        if edge.kind == CONTAINS {
            continue;
        }

        let (Some(&source), Some(&target)) =
            (index_by_id.get(&edge.source), index_by_id.get(&edge.target))
        else {
            dropped_edges += 1;
            continue;
        };

        edges.push(CodeEdge {
            source,
            target,
            kind: edge.kind.clone(),
            metadata: edge.metadata.clone(),
        });
    }

    if dropped_edges > 0 {
        debug!(dropped_edges, "dropped edges with unresolved endpoints");
    }

    CodeGraph {
        language: document.language.clone(),
        root_path: document.root_path.clone(),
        nodes,
        edges,
        index_by_id,
        root_count,
        dropped_edges,
    }
}

fn flatten_node(
    node: &GraphNode,
    parent: Option<usize>,
    level: usize,
    nodes: &mut Vec<CodeNode>,
    index_by_id: &mut HashMap<String, usize>,
    edges: &mut Vec<CodeEdge>,
) -> bool {
    if index_by_id.contains_key(&node.id) {
        warn!(id = %node.id, "skipping node with duplicate id and its subtree");
        return false;
    }

    let index = nodes.len();
    index_by_id.insert(node.id.clone(), index);

    let parent_id = node
        .parent_id
        .clone()
        .or_else(|| parent.map(|parent| nodes[parent].id.clone()));

    nodes.push(CodeNode {
        id: node.id.clone(),
        name: node.name.clone(),
        kind: node.kind,
        file: node.file.clone(),
        line: node.line,
        column: node.column,
        metadata: node.metadata.clone(),
        parent,
        parent_id,
        level,
        child_count: node.children.len(),
    });

    if let Some(parent) = parent {
        edges.push(CodeEdge {
            source: parent,
            target: index,
            kind: CONTAINS.to_owned(),
            metadata: Default::default(),
        });
    }

    for child in &node.children {
        flatten_node(child, Some(index), level + 1, nodes, index_by_id, edges);
    }

    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::{NodeKind, parse_graph_document};

    fn sample_document() -> GraphDocument {
        parse_graph_document(
            r#"{
                "hierarchical": [
                    {"id": "A", "name": "A.java", "type": "file", "children": [
                        {"id": "B", "name": "B", "type": "class", "children": [
                            {"id": "C", "name": "run", "type": "method"}
                        ]}
                    ]}
                ],
                "edges": [{"source": "B", "target": "C", "type": "calls"}]
            }"#,
        )
        .expect("sample parses")
    }

    fn edge_triples(graph: &CodeGraph) -> Vec<(&str, &str, &str)> {
        graph
            .edges
            .iter()
            .map(|edge| {
                (
                    graph.nodes[edge.source].id.as_str(),
                    graph.nodes[edge.target].id.as_str(),
                    edge.kind.as_str(),
                )
            })
            .collect()
    }

    #[test]
    fn flattens_in_pre_order_and_synthesizes_containment() {
        let graph = normalize(&sample_document());

        let ids = graph.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(
            edge_triples(&graph),
            vec![("A", "B", "contains"), ("B", "C", "contains"), ("B", "C", "calls")]
        );
        assert_eq!(graph.nodes[2].level, 2);
        assert_eq!(graph.nodes[1].child_count, 1);
        assert_eq!(graph.nodes[2].parent_id.as_deref(), Some("B"));
        assert_eq!(graph.nodes[2].kind, NodeKind::Method);
    }

    #[test]
    fn containment_edge_count_is_nodes_minus_roots() {
        let document = parse_graph_document(
            r#"{"hierarchical": [
                {"id": "f1", "type": "file", "children": [
                    {"id": "c1", "type": "class", "children": [
                        {"id": "m1", "type": "method"}, {"id": "m2", "type": "method"}
                    ]},
                    {"id": "fn1", "type": "function"}
                ]},
                {"id": "f2", "type": "file", "children": [{"id": "i1", "type": "import"}]},
                {"id": "f3", "type": "file"}
            ]}"#,
        )
        .expect("document parses");

        let graph = normalize(&document);

        let contains = graph.edges.iter().filter(|edge| edge.is_containment()).count();
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.root_count, 3);
        assert_eq!(contains, graph.node_count() - graph.root_count);
    }

    #[test]
    fn drops_edges_with_unknown_endpoints() {
        let mut document = sample_document();
        document.edges.push(crate::graph::GraphEdge {
            source: "B".to_owned(),
            target: "external::Base".to_owned(),
            kind: "inherits".to_owned(),
            metadata: Default::default(),
        });
        document.external_dependencies.push(crate::graph::GraphEdge {
            source: "missing".to_owned(),
            target: "C".to_owned(),
            kind: "calls".to_owned(),
            metadata: Default::default(),
        });

        let graph = normalize(&document);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.dropped_edges, 2);
    }

    #[test]
    fn supplied_contains_edges_are_replaced_by_hierarchy() {
        let mut document = sample_document();
        document.edges.push(crate::graph::GraphEdge {
            source: "A".to_owned(),
            target: "C".to_owned(),
            kind: CONTAINS.to_owned(),
            metadata: Default::default(),
        });

        let graph = normalize(&document);

        let contains = graph.edges.iter().filter(|edge| edge.is_containment()).count();
        assert_eq!(contains, 2);
        assert_eq!(graph.dropped_edges, 0);
    }

    #[test]
    fn duplicate_ids_keep_the_first_copy() {
        let document = parse_graph_document(
            r#"{"hierarchical": [
                {"id": "A", "type": "file", "children": [{"id": "X", "name": "first"}]},
                {"id": "B", "type": "file", "children": [{"id": "X", "name": "second"}]}
            ]}"#,
        )
        .expect("document parses");

        let graph = normalize(&document);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node("X").map(|node| node.name.as_str()), Some("first"));
        assert_eq!(graph.edges.len(), 1);
    }
}
