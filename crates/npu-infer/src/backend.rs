use crate::{InferError, ModelConfig, ModelSource, Session};

/// An inference runtime able to open models.
///
/// Each backend value is an independent client; nothing is shared between
/// backends or sessions through global state.
pub trait Backend {
    fn name(&self) -> &str;

    /// Open `model` and allocate its buffers for the tensors declared in `config`.
    ///
    /// A runtime that opens the model but cannot provide buffers (e.g. an
    /// unsupported chipset) still returns a session, whose
    /// [`Session::buffers_ready`] is `false`.
    fn load_model(
        &self,
        model: ModelSource,
        config: &ModelConfig,
    ) -> Result<Box<dyn Session>, InferError>;
}
