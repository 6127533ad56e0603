//! Tensor pre/post-processing for on-device pose and depth inference.
//!
//! The pipeline is `encode` -> runtime (`Backend`/`Session`) -> `decode` ->
//! domain post-processing (`pose::decode_pose`, `depth::decode_depth`).
//! Everything except the runtime call is a pure function of its inputs and
//! the model's `ModelConfig`.

pub mod backend;
pub mod backends;
pub mod config;
pub mod decode;
pub mod depth;
pub mod encode;
pub mod error;
pub mod layout;
pub mod modelsource;
pub mod pose;
mod runner;
pub mod session;
pub mod worker;

pub use backend::Backend;
pub use config::{InputSpec, ModelConfig, OutputSpec};
pub use decode::{FeatureMap, decode, decode_output, decode_with_layout};
pub use depth::{DepthEstimator, DepthMap, decode_depth};
pub use encode::encode;
pub use error::InferError;
pub use layout::{Normalization, NumericEncoding, NumericPolicy, TensorLayout};
pub use modelsource::ModelSource;
pub use pose::{
    BodyPart, KEYPOINT_COUNT, Keypoint, PoseEstimator, PoseGeometry, PoseResult, decode_pose,
};
pub use session::Session;
pub use worker::{Estimator, ResultSink, Worker};

#[cfg(feature = "onnx")]
pub use backends::OnnxBackend;
