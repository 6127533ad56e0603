use std::fmt;

#[derive(Debug)]
pub enum InferError {
    /// A layout, encoding or policy name that this pipeline does not support.
    UnsupportedConfig(String),
    ShapeMismatch { expected: String, got: String },
    /// The runtime could not provide a usable buffer set for the model.
    RuntimeUnavailable,
    BackendError(String),
    ModelLoad(String),
    InvalidLayer { layer: usize, available: usize },
    Config(String),
    Io(String),
    Tensor(npu_base::TensorError),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::UnsupportedConfig(msg) => write!(f, "unsupported configuration: {msg}"),
            InferError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            InferError::RuntimeUnavailable => write!(f, "runtime has no valid buffer set"),
            InferError::BackendError(msg) => write!(f, "backend error: {msg}"),
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::InvalidLayer { layer, available } => {
                write!(f, "invalid layer {layer} (runtime has {available} layers)")
            }
            InferError::Config(msg) => write!(f, "config error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Tensor(err) => write!(f, "tensor error: {err}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InferError {
    fn from(err: serde_json::Error) -> Self {
        InferError::Config(err.to_string())
    }
}

impl From<npu_base::TensorError> for InferError {
    fn from(err: npu_base::TensorError) -> Self {
        InferError::Tensor(err)
    }
}
