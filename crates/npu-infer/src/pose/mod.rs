mod estimator;
mod postprocess;
mod types;

pub use estimator::PoseEstimator;
pub use postprocess::{CropCorrection, GridPeak, PoseGeometry, argmax, decode_pose, sigmoid};
pub use types::{BodyPart, KEYPOINT_COUNT, Keypoint, PoseResult};
