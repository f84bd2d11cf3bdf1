//! Error taxonomy for the load pipeline.

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a CanView log: {0}")]
    LogHeaderMissing(String),

    #[error("malformed trace configuration: {0}")]
    MalformedTraceConfig(#[from] serde_json::Error),

    #[error("trace name '{0}' collides with an existing column")]
    TraceNameCollision(String),

    #[error("file type not recognized: {0}")]
    UnrecognizedFile(String),
}
