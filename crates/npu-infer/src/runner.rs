use crate::config::{INPUT_LAYER, OutputSpec};
use crate::{
    Backend, FeatureMap, InferError, ModelConfig, ModelSource, Session, decode_output, encode,
};
use npu_base::Tensor;

/// Encode `image`, hand it to the session and run the model.
///
/// Returns `RuntimeUnavailable` before touching any buffer when the session
/// has no valid buffer set.
pub(crate) fn run_model(
    session: &mut dyn Session,
    config: &ModelConfig,
    image: &Tensor<u8>,
) -> Result<(), InferError> {
    if !session.buffers_ready() {
        return Err(InferError::RuntimeUnavailable);
    }

    let input = encode(image, &config.input, config.numeric_policy)?;
    session.write_input(INPUT_LAYER, &input)?;
    session.execute()?;
    Ok(())
}

/// Read and decode one declared output after `run_model`.
pub(crate) fn read_feature_map(
    session: &dyn Session,
    output: &OutputSpec,
) -> Result<FeatureMap, InferError> {
    let raw = session.read_output(output.layer)?;
    decode_output(&raw, output)
}

/// Open a model, logging when the runtime could not provide buffers.
pub(crate) fn open_session(
    backend: &dyn Backend,
    model: ModelSource,
    config: &ModelConfig,
) -> Result<Box<dyn Session>, InferError> {
    config.validate()?;
    log::debug!("Opening '{}' ({:?}) on {}", config.name, model, backend.name());
    let session = backend.load_model(model, config)?;
    if session.buffers_ready() {
        log::info!("Model '{}' ready on {}", config.name, backend.name());
    } else {
        log::warn!(
            "Backend {} has no valid buffer set for '{}'; inference is unavailable",
            backend.name(),
            config.name
        );
    }
    Ok(session)
}
