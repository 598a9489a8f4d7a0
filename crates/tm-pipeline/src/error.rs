use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match vehicle count {expected}")]
    FrameSizeMismatch {
        expected: usize,
        got: usize,
        what: &'static str,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
