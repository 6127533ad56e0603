use crate::ImageError;
use npu_base::Tensor;

/// A decoded image in HWC layout, keeping the source precision.
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    U8(Tensor<u8>),
    U16(Tensor<u16>),
    F32(Tensor<f32>),
}

impl Image {
    pub fn shape(&self) -> &[usize] {
        match self {
            Image::U8(t) => &t.shape,
            Image::U16(t) => &t.shape,
            Image::F32(t) => &t.shape,
        }
    }

    pub fn height(&self) -> usize {
        self.shape()[0]
    }

    pub fn width(&self) -> usize {
        self.shape()[1]
    }

    pub fn channels(&self) -> usize {
        self.shape()[2]
    }

    /// Convert to an 8-bit RGB tensor `[H, W, 3]`.
    ///
    /// Gray is replicated to all three channels and alpha is dropped.
    /// 16-bit samples keep their high byte, float samples are read as `[0, 1]`.
    pub fn to_rgb8(&self) -> Result<Tensor<u8>, ImageError> {
        let samples: Vec<u8> = match self {
            Image::U8(t) => t.data.clone(),
            Image::U16(t) => t.data.iter().map(|&v| (v >> 8) as u8).collect(),
            Image::F32(t) => t
                .data
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect(),
        };

        let channels = self.channels();
        let rgb: Vec<u8> = match channels {
            1 => samples.iter().flat_map(|&g| [g, g, g]).collect(),
            2 => samples.chunks_exact(2).flat_map(|c| [c[0], c[0], c[0]]).collect(),
            3 => samples,
            4 => samples.chunks_exact(4).flat_map(|c| [c[0], c[1], c[2]]).collect(),
            _ => {
                return Err(ImageError::Decode(format!(
                    "unsupported channel count: {channels}"
                )));
            }
        };

        Ok(Tensor::new(vec![self.height(), self.width(), 3], rgb)?)
    }
}
