use crate::InferError;

/// An open model with its buffer set.
///
/// Layers are numbered inputs first, then outputs. Dropping the session
/// releases its buffers and closes the model.
///
/// A session holds a single execution context: calls must not overlap, which
/// `&mut self` enforces.
pub trait Session: Send {
    /// `false` when the runtime could not allocate a valid buffer set.
    fn buffers_ready(&self) -> bool;

    /// Number of input layers; the first output layer follows them.
    fn input_layers(&self) -> usize;

    fn write_input(&mut self, layer: usize, bytes: &[u8]) -> Result<(), InferError>;

    fn execute(&mut self) -> Result<(), InferError>;

    fn read_output(&self, layer: usize) -> Result<Vec<u8>, InferError>;
}
