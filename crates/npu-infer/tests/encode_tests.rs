use npu_base::Tensor;
use npu_infer::{
    InferError, InputSpec, Normalization, NumericEncoding, NumericPolicy, TensorLayout,
    decode_with_layout, encode,
};

fn input(
    width: usize,
    height: usize,
    layout: TensorLayout,
    encoding: NumericEncoding,
    offset: f32,
    scale: f32,
) -> InputSpec {
    InputSpec {
        width,
        height,
        channels: 3,
        layout,
        encoding,
        normalization: Normalization::new(offset, scale),
    }
}

/// 2x2 image whose channel values encode their position: 100*y + 10*x + c
fn position_image() -> Tensor<u8> {
    let mut data = Vec::new();
    for y in 0..2 {
        for x in 0..2 {
            for c in 0..3 {
                data.push((100 * y + 10 * x + c) as u8);
            }
        }
    }
    Tensor::new(vec![2, 2, 3], data).unwrap()
}

#[test]
fn test_encode_length_matches_shape() {
    let image = Tensor::filled(vec![5, 7, 3], 12u8).unwrap();
    for layout in [TensorLayout::ChannelLast, TensorLayout::ChannelFirst] {
        for encoding in [NumericEncoding::Uint8, NumericEncoding::Float32] {
            let spec = input(7, 5, layout, encoding, 0.0, 1.0);
            let bytes = encode(&image, &spec, NumericPolicy::Wrapping).unwrap();
            assert_eq!(bytes.len(), 7 * 5 * 3 * encoding.bytes_per_element());
        }
    }
}

#[test]
fn test_encode_channel_last_interleaves() {
    let spec = input(2, 2, TensorLayout::ChannelLast, NumericEncoding::Uint8, 0.0, 1.0);
    let bytes = encode(&position_image(), &spec, NumericPolicy::Wrapping).unwrap();
    assert_eq!(bytes, vec![0, 1, 2, 10, 11, 12, 100, 101, 102, 110, 111, 112]);
}

#[test]
fn test_encode_channel_first_is_planar() {
    let spec = input(2, 2, TensorLayout::ChannelFirst, NumericEncoding::Uint8, 0.0, 1.0);
    let bytes = encode(&position_image(), &spec, NumericPolicy::Wrapping).unwrap();
    assert_eq!(bytes, vec![0, 10, 100, 110, 1, 11, 101, 111, 2, 12, 102, 112]);
}

#[test]
fn test_encode_float32_normalizes() {
    let image = Tensor::new(vec![1, 1, 3], vec![0u8, 128, 255]).unwrap();
    let spec = input(1, 1, TensorLayout::ChannelLast, NumericEncoding::Float32, 128.0, 128.0);
    let bytes = encode(&image, &spec, NumericPolicy::Wrapping).unwrap();

    let values: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    assert_eq!(values, vec![-1.0, 0.0, 127.0 / 128.0]);
}

#[test]
fn test_encode_uint8_truncates() {
    let image = Tensor::new(vec![1, 1, 3], vec![10u8, 11, 12]).unwrap();
    let spec = input(1, 1, TensorLayout::ChannelLast, NumericEncoding::Uint8, 0.0, 4.0);
    let bytes = encode(&image, &spec, NumericPolicy::Wrapping).unwrap();
    // 2.5, 2.75, 3.0
    assert_eq!(bytes, vec![2, 2, 3]);
}

#[test]
fn test_encode_uint8_out_of_range_follows_policy() {
    let image = Tensor::new(vec![1, 1, 3], vec![0u8, 200, 255]).unwrap();
    // (v - 100) / 0.5 -> -200, 200, 310
    let spec = input(1, 1, TensorLayout::ChannelLast, NumericEncoding::Uint8, 100.0, 0.5);

    let wrapped = encode(&image, &spec, NumericPolicy::Wrapping).unwrap();
    assert_eq!(wrapped, vec![56, 200, 54]);

    let saturated = encode(&image, &spec, NumericPolicy::Saturating).unwrap();
    assert_eq!(saturated, vec![0, 200, 255]);
}

#[test]
fn test_encode_rejects_wrong_size() {
    let image = Tensor::filled(vec![4, 4, 3], 0u8).unwrap();
    let spec = input(5, 4, TensorLayout::ChannelLast, NumericEncoding::Float32, 0.0, 1.0);
    let result = encode(&image, &spec, NumericPolicy::Wrapping);
    assert!(matches!(result, Err(InferError::ShapeMismatch { .. })));
}

#[test]
fn test_encode_rejects_data_shorter_than_shape() {
    // built without Tensor::new, so shape and data disagree
    let image = Tensor {
        shape: vec![2, 2, 3],
        data: vec![0u8; 5],
    };
    for encoding in [NumericEncoding::Uint8, NumericEncoding::Float32] {
        let spec = input(2, 2, TensorLayout::ChannelFirst, encoding, 0.0, 1.0);
        let result = encode(&image, &spec, NumericPolicy::Wrapping);
        assert!(matches!(result, Err(InferError::ShapeMismatch { .. })));
    }
}

#[test]
fn test_encode_rejects_non_rgb() {
    let image = Tensor::filled(vec![2, 2, 4], 0u8).unwrap();
    let spec = input(2, 2, TensorLayout::ChannelLast, NumericEncoding::Uint8, 0.0, 1.0);
    assert!(encode(&image, &spec, NumericPolicy::Wrapping).is_err());
}

#[test]
fn test_all_255_uint8_channel_last_round_trips() {
    let image = Tensor::filled(vec![3, 4, 3], 255u8).unwrap();
    let spec = input(4, 3, TensorLayout::ChannelLast, NumericEncoding::Uint8, 0.0, 1.0);

    let bytes = encode(&image, &spec, NumericPolicy::Wrapping).unwrap();
    let decoded =
        decode_with_layout(&bytes, (4, 3, 3), NumericEncoding::Uint8, TensorLayout::ChannelLast)
            .unwrap();

    assert!(decoded.tensor().data.iter().all(|&v| v == 255.0));
}

#[test]
fn test_round_trip_reproduces_normalized_values() {
    // constant per-channel colour
    let mut data = Vec::new();
    for _ in 0..(6 * 5) {
        data.extend_from_slice(&[30u8, 90, 250]);
    }
    let image = Tensor::new(vec![5, 6, 3], data).unwrap();
    let expected = [(30.0 - 127.5) / 127.5, (90.0 - 127.5) / 127.5, (250.0 - 127.5) / 127.5];

    for layout in [TensorLayout::ChannelLast, TensorLayout::ChannelFirst] {
        let spec = input(6, 5, layout, NumericEncoding::Float32, 127.5, 127.5);
        let bytes = encode(&image, &spec, NumericPolicy::Wrapping).unwrap();
        let decoded =
            decode_with_layout(&bytes, (6, 5, 3), NumericEncoding::Float32, layout).unwrap();

        for x in 0..6 {
            for y in 0..5 {
                for c in 0..3 {
                    assert!((decoded.get(x, y, c) - expected[c]).abs() < 1e-6);
                }
            }
        }
    }
}

#[test]
fn test_round_trip_keeps_pixel_positions() {
    let image = position_image();
    for layout in [TensorLayout::ChannelLast, TensorLayout::ChannelFirst] {
        let spec = input(2, 2, layout, NumericEncoding::Float32, 0.0, 1.0);
        let bytes = encode(&image, &spec, NumericPolicy::Wrapping).unwrap();
        let decoded =
            decode_with_layout(&bytes, (2, 2, 3), NumericEncoding::Float32, layout).unwrap();
        assert_eq!(decoded.get(1, 0, 2), 12.0);
        assert_eq!(decoded.get(0, 1, 1), 101.0);
    }
}
