use crate::{FeatureMap, InferError};
use npu_base::Vec2;

use super::types::{KEYPOINT_COUNT, Keypoint, PoseResult};

/// Logistic function mapping a raw heatmap score to `(0, 1)`.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Strongest heatmap cell of one keypoint channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPeak {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    pub value: f32,
}

/// Locate the maximum of `channel` over the whole grid.
///
/// Scans row by row, columns within a row; only a strictly greater value
/// replaces the current peak, so the first maximum in scan order wins. An
/// empty grid yields `(0, 0)` with a value of negative infinity.
///
/// Panics when `channel` is not below `heatmap.channels()`.
pub fn argmax(heatmap: &FeatureMap, channel: usize) -> GridPeak {
    if heatmap.is_empty() {
        return GridPeak {
            x: 0,
            y: 0,
            value: f32::NEG_INFINITY,
        };
    }

    let mut peak = GridPeak {
        x: 0,
        y: 0,
        value: heatmap.get(0, 0, channel),
    };
    for y in 0..heatmap.height() {
        for x in 0..heatmap.width() {
            let value = heatmap.get(x, y, channel);
            if value > peak.value {
                peak = GridPeak { x, y, value };
            }
        }
    }
    peak
}

/// Padding added when a non-square image was fitted to the model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropCorrection {
    pub horizontal: f32,
    pub vertical: f32,
}

impl CropCorrection {
    pub fn from_size(width: usize, height: usize) -> Self {
        if width > height {
            Self {
                horizontal: (width - height) as f32,
                vertical: 0.0,
            }
        } else {
            Self {
                horizontal: 0.0,
                vertical: (height - width) as f32,
            }
        }
    }
}

/// Image size keypoint coordinates are mapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseGeometry {
    pub image_width: usize,
    pub image_height: usize,
}

impl PoseGeometry {
    pub fn new(image_width: usize, image_height: usize) -> Self {
        Self {
            image_width,
            image_height,
        }
    }

    pub fn crop(&self) -> CropCorrection {
        CropCorrection::from_size(self.image_width, self.image_height)
    }
}

fn check_pose_outputs(heatmap: &FeatureMap, offsets: &FeatureMap) -> Result<(), InferError> {
    if heatmap.channels() != KEYPOINT_COUNT {
        return Err(InferError::ShapeMismatch {
            expected: format!("{} heatmap channels", KEYPOINT_COUNT),
            got: format!("{} channels", heatmap.channels()),
        });
    }
    if offsets.channels() != 2 * KEYPOINT_COUNT {
        return Err(InferError::ShapeMismatch {
            expected: format!("{} offset channels", 2 * KEYPOINT_COUNT),
            got: format!("{} channels", offsets.channels()),
        });
    }
    if (heatmap.width(), heatmap.height()) != (offsets.width(), offsets.height()) {
        return Err(InferError::ShapeMismatch {
            expected: format!("offset grid {}x{}", heatmap.width(), heatmap.height()),
            got: format!("{}x{}", offsets.width(), offsets.height()),
        });
    }
    // the offset field has no cell to read on an empty grid
    if heatmap.is_empty() {
        return Err(InferError::ShapeMismatch {
            expected: "non-empty heatmap grid".to_string(),
            got: format!("{}x{}", heatmap.width(), heatmap.height()),
        });
    }
    Ok(())
}

/// Turn pose heatmaps and offset field into one keypoint per body part.
///
/// For keypoint `k` the strongest heatmap cell `(col, row)` is refined with
/// the offset field (`k` holds the y offset, `k + 17` the x offset):
///
/// ```text
/// x = (col + 0.5) / grid_width  * image_width  + offset_x + crop.vertical
/// y = (row + 0.5) / grid_height * image_height + offset_y + crop.horizontal
/// ```
///
/// Each axis takes the crop of the other axis. Confidence is the sigmoid of
/// the peak score. NaN and infinite scores are not filtered.
pub fn decode_pose(
    heatmap: &FeatureMap,
    offsets: &FeatureMap,
    geometry: &PoseGeometry,
) -> Result<PoseResult, InferError> {
    check_pose_outputs(heatmap, offsets)?;

    let grid = Vec2::new(heatmap.width() as f32, heatmap.height() as f32);
    let image = Vec2::new(geometry.image_width as f32, geometry.image_height as f32);
    let crop = geometry.crop();
    let crop_shift = Vec2::new(crop.vertical, crop.horizontal);

    let keypoints = std::array::from_fn(|k| {
        let peak = argmax(heatmap, k);
        let cell = Vec2::new(
            (peak.x as f32 + 0.5) / grid.x * image.x,
            (peak.y as f32 + 0.5) / grid.y * image.y,
        );
        let offset = Vec2::new(
            offsets.get(peak.x, peak.y, k + KEYPOINT_COUNT),
            offsets.get(peak.x, peak.y, k),
        );
        Keypoint {
            position: cell + offset + crop_shift,
            confidence: sigmoid(peak.value),
        }
    });

    Ok(PoseResult { keypoints })
}
