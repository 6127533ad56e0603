use crate::InferError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Memory order of a `(H, W, C)` tensor once flattened to bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum TensorLayout {
    /// Pixel-major, channel-minor (interleaved, HWC).
    ChannelLast,
    /// Channel-major, pixel-minor (planar, CHW).
    ChannelFirst,
}

impl TensorLayout {
    pub fn name(self) -> &'static str {
        match self {
            TensorLayout::ChannelLast => "channel_last",
            TensorLayout::ChannelFirst => "channel_first",
        }
    }

    /// Flat index of channel `c` of pixel `(x, y)` in a `width` x `height` x `channels` tensor.
    pub fn index(
        self,
        x: usize,
        y: usize,
        c: usize,
        width: usize,
        height: usize,
        channels: usize,
    ) -> usize {
        match self {
            TensorLayout::ChannelLast => (y * width + x) * channels + c,
            TensorLayout::ChannelFirst => c * width * height + y * width + x,
        }
    }
}

impl FromStr for TensorLayout {
    type Err = InferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "channel_last" | "nhwc" | "hwc" => Ok(TensorLayout::ChannelLast),
            "channel_first" | "nchw" | "chw" => Ok(TensorLayout::ChannelFirst),
            other => Err(InferError::UnsupportedConfig(format!(
                "unknown tensor layout '{other}'"
            ))),
        }
    }
}

/// Per-element numeric encoding of a runtime buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum NumericEncoding {
    Uint8,
    /// IEEE-754 single precision, native byte order.
    Float32,
}

impl NumericEncoding {
    pub fn name(self) -> &'static str {
        match self {
            NumericEncoding::Uint8 => "uint8",
            NumericEncoding::Float32 => "float32",
        }
    }

    pub fn bytes_per_element(self) -> usize {
        match self {
            NumericEncoding::Uint8 => 1,
            NumericEncoding::Float32 => 4,
        }
    }
}

impl FromStr for NumericEncoding {
    type Err = InferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uint8" | "u8" => Ok(NumericEncoding::Uint8),
            "float32" | "f32" => Ok(NumericEncoding::Float32),
            other => Err(InferError::UnsupportedConfig(format!(
                "unknown numeric encoding '{other}'"
            ))),
        }
    }
}

/// How out-of-range values are turned into bytes.
///
/// `Wrapping` is plain unsigned-byte arithmetic: values are truncated to an integer and wrapped
/// modulo 256, and a zero-range depth map is divided through (NaN, which
/// truncates to 0). `Saturating` clamps to `[0, 255]` and checks the depth
/// range before dividing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum NumericPolicy {
    #[default]
    Wrapping,
    Saturating,
}

impl NumericPolicy {
    pub fn name(self) -> &'static str {
        match self {
            NumericPolicy::Wrapping => "wrapping",
            NumericPolicy::Saturating => "saturating",
        }
    }

    /// Truncate `value` to an integer and pack it into a byte.
    pub fn pack_u8(self, value: f32) -> u8 {
        match self {
            // `as i32` truncates toward zero (NaN -> 0), `as u8` keeps the low byte
            NumericPolicy::Wrapping => value as i32 as u8,
            NumericPolicy::Saturating => value.clamp(0.0, 255.0) as u8,
        }
    }
}

impl FromStr for NumericPolicy {
    type Err = InferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrapping" => Ok(NumericPolicy::Wrapping),
            "saturating" => Ok(NumericPolicy::Saturating),
            other => Err(InferError::UnsupportedConfig(format!(
                "unknown numeric policy '{other}'"
            ))),
        }
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = InferError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.name().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    )*};
}

string_conversions!(TensorLayout, NumericEncoding, NumericPolicy);

/// Affine normalization `value = (raw - offset) / scale`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Normalization {
    pub offset: f32,
    pub scale: f32,
}

impl Normalization {
    pub const IDENTITY: Normalization = Normalization {
        offset: 0.0,
        scale: 1.0,
    };

    pub fn new(offset: f32, scale: f32) -> Self {
        Self { offset, scale }
    }

    pub fn apply(&self, raw: f32) -> f32 {
        (raw - self.offset) / self.scale
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_pack_matches_unsigned_byte_arithmetic() {
        let policy = NumericPolicy::Wrapping;
        assert_eq!(policy.pack_u8(255.0), 255);
        assert_eq!(policy.pack_u8(255.9), 255);
        assert_eq!(policy.pack_u8(256.0), 0);
        assert_eq!(policy.pack_u8(300.0), 44);
        assert_eq!(policy.pack_u8(-1.0), 255);
        assert_eq!(policy.pack_u8(-0.5), 0);
        assert_eq!(policy.pack_u8(f32::NAN), 0);
    }

    #[test]
    fn saturating_pack_clamps() {
        let policy = NumericPolicy::Saturating;
        assert_eq!(policy.pack_u8(300.0), 255);
        assert_eq!(policy.pack_u8(-1.0), 0);
        assert_eq!(policy.pack_u8(127.9), 127);
        assert_eq!(policy.pack_u8(f32::NAN), 0);
    }

    #[test]
    fn layout_index() {
        // 2x2 image, 3 channels: pixel (1, 0) channel 2
        assert_eq!(TensorLayout::ChannelLast.index(1, 0, 2, 2, 2, 3), 5);
        assert_eq!(TensorLayout::ChannelFirst.index(1, 0, 2, 2, 2, 3), 9);
    }
}
