mod document;
mod error;
mod model;
mod normalize;
mod stats;

pub use document::{GraphDocument, GraphEdge, GraphNode, parse_graph_document, read_graph_document};
pub use error::GraphError;
pub use model::{CONTAINS, CodeEdge, CodeGraph, CodeNode, NodeKind};
pub use normalize::normalize;
pub use stats::GraphStats;
