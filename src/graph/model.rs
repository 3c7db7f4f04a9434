use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Edge kind synthesized for every parent/child pair of the hierarchy.
pub const CONTAINS: &str = "contains";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub enum NodeKind {
    File,
    Class,
    Interface,
    Method,
    Function,
    Variable,
    Import,
    Module,
    Package,
    #[default]
    Other,
}

impl NodeKind {
    pub const ALL: [NodeKind; 10] = [
        Self::File,
        Self::Class,
        Self::Interface,
        Self::Method,
        Self::Function,
        Self::Variable,
        Self::Import,
        Self::Module,
        Self::Package,
        Self::Other,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "class" => Self::Class,
            "interface" => Self::Interface,
            "method" => Self::Method,
            "function" => Self::Function,
            "variable" => Self::Variable,
            "import" => Self::Import,
            "module" => Self::Module,
            "package" => Self::Package,
            _ => Self::Other,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Method => "method",
            Self::Function => "function",
            Self::Variable => "variable",
            Self::Import => "import",
            Self::Module => "module",
            Self::Package => "package",
            Self::Other => "other",
        }
    }

    pub fn plural_label(self) -> &'static str {
        match self {
            Self::File => "Files",
            Self::Class => "Classes",
            Self::Interface => "Interfaces",
            Self::Method => "Methods",
            Self::Function => "Functions",
            Self::Variable => "Variables",
            Self::Import => "Imports",
            Self::Module => "Modules",
            Self::Package => "Packages",
            Self::Other => "Other",
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

/// A node of the flattened graph. Children are referenced through `parent`
/// back-links only; the hierarchy itself is consumed during normalization.
#[derive(Clone, Debug)]
pub struct CodeNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub metadata: Map<String, Value>,
    pub parent: Option<usize>,
    pub parent_id: Option<String>,
    pub level: usize,
    pub child_count: usize,
}

#[derive(Clone, Debug)]
pub struct CodeEdge {
    pub source: usize,
    pub target: usize,
    pub kind: String,
    pub metadata: Map<String, Value>,
}

impl CodeEdge {
    pub fn is_containment(&self) -> bool {
        self.kind == CONTAINS
    }

    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }

    pub fn other_endpoint(&self, index: usize) -> Option<usize> {
        if self.source == index {
            Some(self.target)
        } else if self.target == index {
            Some(self.source)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CodeGraph {
    pub language: String,
    pub root_path: String,
    pub nodes: Vec<CodeNode>,
    pub edges: Vec<CodeEdge>,
    pub index_by_id: HashMap<String, usize>,
    pub root_count: usize,
    pub dropped_edges: usize,
}

impl CodeGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&CodeNode> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().map(|edge| (edge.source, edge.target))
    }

    /// Edges touching `index`, in edge-list order.
    pub fn incident_edges(&self, index: usize) -> impl Iterator<Item = &CodeEdge> + '_ {
        self.edges.iter().filter(move |edge| edge.touches(index))
    }
}
