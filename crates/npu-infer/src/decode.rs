use crate::config::OutputSpec;
use crate::{InferError, NumericEncoding, TensorLayout};
use npu_base::{Tensor, element_count};

/// A decoded output tensor, addressed as `[x][y][channel]`.
///
/// Backed by a `Tensor<f32>` of shape `[width, height, channels]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMap {
    tensor: Tensor<f32>,
}

impl FeatureMap {
    /// Build a map from values already ordered `[x][y][channel]`.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, InferError> {
        Ok(Self {
            tensor: Tensor::new(vec![width, height, channels], data)?,
        })
    }

    /// Build a map by evaluating `f(x, y, channel)` for every cell.
    pub fn from_fn(
        width: usize,
        height: usize,
        channels: usize,
        mut f: impl FnMut(usize, usize, usize) -> f32,
    ) -> Self {
        let mut data = Vec::with_capacity(width * height * channels);
        for x in 0..width {
            for y in 0..height {
                for c in 0..channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self {
            tensor: Tensor {
                shape: vec![width, height, channels],
                data,
            },
        }
    }

    pub fn width(&self) -> usize {
        self.tensor.shape[0]
    }

    pub fn height(&self) -> usize {
        self.tensor.shape[1]
    }

    pub fn channels(&self) -> usize {
        self.tensor.shape[2]
    }

    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Value at column `x`, row `y`, channel `c`. Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.tensor.data[(x * self.height() + y) * self.channels() + c]
    }

    pub fn tensor(&self) -> &Tensor<f32> {
        &self.tensor
    }
}

/// Interpret a raw output buffer as floats, in buffer order.
fn read_values(raw: &[u8], encoding: NumericEncoding) -> Vec<f32> {
    match encoding {
        NumericEncoding::Uint8 => raw.iter().map(|&b| b as f32).collect(),
        NumericEncoding::Float32 => raw
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    }
}

/// Reconstruct a `width x height x channels` map from runtime output bytes.
///
/// Output buffers are always planar: element `(w, h, c)` is read from flat
/// index `c * (height * width) + h * width + w`, whatever layout the input
/// used.
pub fn decode(
    raw: &[u8],
    shape: (usize, usize, usize),
    encoding: NumericEncoding,
) -> Result<FeatureMap, InferError> {
    decode_with_layout(raw, shape, encoding, TensorLayout::ChannelFirst)
}

/// Like [`decode`], reading the buffer in the given `layout`.
///
/// Reading an encoded input back with its own layout reproduces the
/// normalized values the encoder wrote.
pub fn decode_with_layout(
    raw: &[u8],
    (width, height, channels): (usize, usize, usize),
    encoding: NumericEncoding,
    layout: TensorLayout,
) -> Result<FeatureMap, InferError> {
    let expected = element_count(&[width, height, channels, encoding.bytes_per_element()])?;
    if raw.len() != expected {
        return Err(InferError::ShapeMismatch {
            expected: format!(
                "{} bytes for {}x{}x{} {}",
                expected, width, height, channels, encoding
            ),
            got: format!("{} bytes", raw.len()),
        });
    }

    let flat = read_values(raw, encoding);
    Ok(FeatureMap::from_fn(width, height, channels, |x, y, c| {
        flat[layout.index(x, y, c, width, height, channels)]
    }))
}

/// Decode the buffer of a declared model output.
pub fn decode_output(raw: &[u8], output: &OutputSpec) -> Result<FeatureMap, InferError> {
    decode(raw, output.shape(), output.encoding)
}
