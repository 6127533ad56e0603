use crate::{FeatureMap, InferError, Normalization, NumericPolicy};
use npu_base::Tensor;

/// 8-bit relative depth, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl DepthMap {
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Gray image tensor `[height, width, 1]`.
    pub fn to_tensor(&self) -> Tensor<u8> {
        Tensor {
            shape: vec![self.height, self.width, 1],
            data: self.data.clone(),
        }
    }
}

/// Smallest and largest value, ignoring NaN. `(inf, -inf)` when nothing is left.
fn value_range(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
            (if v < min { v } else { min }, if v > max { v } else { max })
        })
}

/// Min-max normalize a single-channel depth output to `[0, 255]`.
///
/// Each cell is first de-scaled with `normalization`, then mapped to
/// `255 * (v - min) / (max - min)` and truncated. With
/// `NumericPolicy::Wrapping` a zero range is divided through as is (every
/// cell becomes NaN, which packs to 0); with `NumericPolicy::Saturating` a
/// zero or non-finite range gives an all-zero map and values are clamped.
pub fn decode_depth(
    depth: &FeatureMap,
    normalization: &Normalization,
    policy: NumericPolicy,
) -> Result<DepthMap, InferError> {
    if depth.channels() != 1 {
        return Err(InferError::ShapeMismatch {
            expected: "1 depth channel".to_string(),
            got: format!("{} channels", depth.channels()),
        });
    }

    let (width, height) = (depth.width(), depth.height());
    let mut adjusted = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            adjusted.push(normalization.apply(depth.get(x, y, 0)));
        }
    }

    let (min, max) = value_range(&adjusted);
    let range = max - min;

    let data = match policy {
        NumericPolicy::Saturating if !(range > 0.0 && range.is_finite()) => {
            log::warn!(
                "Depth range is degenerate (min={}, max={}); emitting a blank map",
                min,
                max
            );
            vec![0u8; adjusted.len()]
        }
        _ => adjusted
            .iter()
            .map(|&v| policy.pack_u8(255.0 * (v - min) / range))
            .collect(),
    };

    Ok(DepthMap {
        width,
        height,
        data,
    })
}
