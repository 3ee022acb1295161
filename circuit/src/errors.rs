#[derive(Debug, thiserror::Error)]
pub enum CircuitEvalError {
    #[error("uninitialized value, wire {0}")]
    UninitializedValue(usize),
    #[error("wrong number of input bits, expected {expected}, got {got}")]
    InvalidInputLength { expected: usize, got: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum CircuitLoadError {
    #[error("encountered error while parsing circuit")]
    ParsingError(#[from] anyhow::Error),
    /// An I/O error occurred.
    #[error("encountered io error while loading circuit")]
    IoError(#[from] std::io::Error),
}
