//! hf-results: result sinks, run summaries and run storage.

pub mod hash;
pub mod mesh;
pub mod store;
pub mod summary;
pub mod tabular;
pub mod types;

pub use hash::compute_run_id;
pub use mesh::{MeshSinkAdapter, MeshWriter};
pub use store::RunStore;
pub use summary::SummaryLog;
pub use tabular::TabularSink;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
