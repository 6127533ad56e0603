use crate::config::InputSpec;
use crate::{InferError, NumericEncoding, NumericPolicy};
use npu_base::Tensor;

/// Encode an RGB image into the runtime's input buffer.
///
/// `image` is an HWC `Tensor<u8>` of shape `[input.height, input.width, 3]`.
/// Every channel value becomes `(v - offset) / scale` and is written at the
/// position given by `input.layout`, either as a native-endian `f32` or, for
/// `Uint8`, truncated and packed according to `policy`.
///
/// The result is exactly `width * height * 3 * bytes_per_element` bytes long.
pub fn encode(
    image: &Tensor<u8>,
    input: &InputSpec,
    policy: NumericPolicy,
) -> Result<Vec<u8>, InferError> {
    let (width, height, channels) = (input.width, input.height, input.channels);
    if image.shape != [height, width, channels] {
        return Err(InferError::ShapeMismatch {
            expected: format!("[{}, {}, {}]", height, width, channels),
            got: format!("{:?}", image.shape),
        });
    }
    // shape and data are public, so they can disagree
    if image.data.len() != input.element_count() {
        return Err(InferError::ShapeMismatch {
            expected: format!("{} pixel values", input.element_count()),
            got: format!("{} values", image.data.len()),
        });
    }

    let bytes_per_element = input.encoding.bytes_per_element();
    let mut buffer = vec![0u8; input.byte_len()];

    for y in 0..height {
        for x in 0..width {
            let pixel = (y * width + x) * channels;
            for c in 0..channels {
                let value = input.normalization.apply(image.data[pixel + c] as f32);
                let index = input.layout.index(x, y, c, width, height, channels);
                let at = index * bytes_per_element;
                match input.encoding {
                    NumericEncoding::Uint8 => buffer[at] = policy.pack_u8(value),
                    NumericEncoding::Float32 => {
                        buffer[at..at + 4].copy_from_slice(&value.to_ne_bytes())
                    }
                }
            }
        }
    }

    Ok(buffer)
}
