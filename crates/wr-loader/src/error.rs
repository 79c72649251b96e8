//! Loader error composition (§7). File and parse errors are fatal —
//! they abort the whole batch. Per-record problems never reach here;
//! they go into a `LoadReport` instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path} as JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} root element must be a JSON array")]
    NotAnArray { path: String },

    #[error(transparent)]
    Graph(#[from] wr_graph::GraphError),
}

pub type LoaderResult<T> = Result<T, LoaderError>;
