use thiserror::Error;

/// Errors surfaced by configuration, input loading and pluggable classifiers.
///
/// The stroke geometry pipeline itself never fails: degenerate input is
/// resolved with fallbacks and always yields a renderable polygon.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InkError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("classifier inference failed: {0}")]
    Inference(String),

    #[error("classification worker has shut down")]
    WorkerClosed,
}
