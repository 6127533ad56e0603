use crate::config::{HEATMAP_OUTPUT, OFFSET_OUTPUT};
use crate::runner::{open_session, read_feature_map, run_model};
use crate::{Backend, InferError, ModelConfig, ModelSource, Session};
use npu_base::Tensor;

use super::postprocess::{PoseGeometry, decode_pose};
use super::types::PoseResult;

/// Single-person pose estimation pipeline
///
/// Encodes an RGB frame, runs the model through a backend session and turns
/// the heatmap and offset outputs into a `PoseResult`. One estimator owns one
/// session; `estimate` takes `&mut self`, so calls never overlap.
pub struct PoseEstimator {
    session: Box<dyn Session>,
    config: ModelConfig,
    geometry: PoseGeometry,
}

impl PoseEstimator {
    /// Create a pose estimator
    ///
    /// # Arguments
    /// * `model` - Model source (file path or in-memory bytes)
    /// * `config` - Model constants; must declare `heatmaps` and `offsets` outputs
    /// * `backend` - Runtime used to open the model
    ///
    /// Keypoints are mapped to the model input size until `with_geometry` says otherwise.
    pub fn new(
        model: ModelSource,
        config: ModelConfig,
        backend: &dyn Backend,
    ) -> Result<Self, InferError> {
        config.output(HEATMAP_OUTPUT)?;
        config.output(OFFSET_OUTPUT)?;
        let session = open_session(backend, model, &config)?;
        let geometry = PoseGeometry::new(config.input.width, config.input.height);

        Ok(Self {
            session,
            config,
            geometry,
        })
    }

    /// Set the image size keypoints are mapped to (builder pattern)
    pub fn with_geometry(mut self, geometry: PoseGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn geometry(&self) -> &PoseGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Whether the runtime provided a buffer set for this model.
    pub fn is_available(&self) -> bool {
        self.session.buffers_ready()
    }

    /// Run pose estimation on an RGB image
    ///
    /// # Arguments
    /// * `image` - `Tensor<u8>` with shape `[H, W, 3]` at the model input size
    ///
    /// # Errors
    /// `RuntimeUnavailable` when the session has no buffers, `ShapeMismatch`
    /// for a wrongly sized image or output, and any backend failure.
    pub fn estimate(&mut self, image: &Tensor<u8>) -> Result<PoseResult, InferError> {
        run_model(self.session.as_mut(), &self.config, image)?;

        let heatmap = read_feature_map(self.session.as_ref(), self.config.output(HEATMAP_OUTPUT)?)?;
        let offsets = read_feature_map(self.session.as_ref(), self.config.output(OFFSET_OUTPUT)?)?;

        decode_pose(&heatmap, &offsets, &self.geometry)
    }
}
