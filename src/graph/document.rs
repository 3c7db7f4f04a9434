use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::GraphError;
use super::model::NodeKind;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: NodeKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub column: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<GraphNode>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub root_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hierarchical: Vec<GraphNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<GraphNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<GraphEdge>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_dependencies: Vec<GraphEdge>,
}

impl GraphDocument {
    /// Root nodes of the hierarchy. Documents written without a `hierarchical`
    /// section fall back to the flat `nodes` list.
    pub fn roots(&self) -> &[GraphNode] {
        if self.hierarchical.is_empty() {
            &self.nodes
        } else {
            &self.hierarchical
        }
    }
}

pub fn parse_graph_document(raw: &str) -> Result<GraphDocument, GraphError> {
    serde_json::from_str(raw).map_err(|error| {
        if error.to_string().starts_with("recursion limit exceeded") {
            GraphError::TooDeep {
                line: error.line(),
                column: error.column(),
            }
        } else {
            GraphError::Parse(error)
        }
    })
}

pub fn read_graph_document(path: &Path) -> Result<GraphDocument, GraphError> {
    let raw = fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_graph_document(&raw)
}
