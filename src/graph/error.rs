use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read graph file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// serde_json stops at 128 nested JSON values. Every hierarchy level
    /// costs two (the node object and its `children` array), so roughly 63
    /// levels of nesting is the deepest graph that loads.
    #[error(
        "graph hierarchy is nested deeper than the JSON parser allows \
         (about 63 levels) at line {line} column {column}"
    )]
    TooDeep { line: usize, column: usize },

    #[error("invalid graph JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
