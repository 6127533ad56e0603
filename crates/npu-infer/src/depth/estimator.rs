use crate::config::DEPTH_OUTPUT;
use crate::runner::{open_session, read_feature_map, run_model};
use crate::{Backend, InferError, ModelConfig, ModelSource, Session};
use npu_base::Tensor;

use super::postprocess::{DepthMap, decode_depth};

/// Monocular depth pipeline
///
/// The depth output is the first layer after the session's inputs.
pub struct DepthEstimator {
    session: Box<dyn Session>,
    config: ModelConfig,
}

impl DepthEstimator {
    pub fn new(
        model: ModelSource,
        config: ModelConfig,
        backend: &dyn Backend,
    ) -> Result<Self, InferError> {
        let declared = config.output(DEPTH_OUTPUT)?.layer;
        let session = open_session(backend, model, &config)?;

        if declared != session.input_layers() {
            return Err(InferError::Config(format!(
                "depth output declared on layer {}, but the runtime places outputs after {} \
                 input layer(s)",
                declared,
                session.input_layers()
            )));
        }

        Ok(Self { session, config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn is_available(&self) -> bool {
        self.session.buffers_ready()
    }

    /// Estimate relative depth for an RGB image at the model input size
    pub fn estimate(&mut self, image: &Tensor<u8>) -> Result<DepthMap, InferError> {
        run_model(self.session.as_mut(), &self.config, image)?;

        let output = self.config.output(DEPTH_OUTPUT)?;
        let depth = read_feature_map(self.session.as_ref(), output)?;

        decode_depth(&depth, &output.normalization, self.config.numeric_policy)
    }
}
