use npu_infer::{FeatureMap, InferError, Normalization, NumericPolicy, decode_depth};

fn row(values: &[f32]) -> FeatureMap {
    FeatureMap::from_fn(values.len(), 1, 1, |x, _, _| values[x])
}

#[test]
fn test_depth_min_max_normalization() {
    let depth = decode_depth(
        &row(&[10.0, 20.0, 30.0]),
        &Normalization::IDENTITY,
        NumericPolicy::Wrapping,
    )
    .unwrap();
    assert_eq!(depth.data, vec![0, 127, 255]);
    assert_eq!((depth.width, depth.height), (3, 1));
}

#[test]
fn test_depth_is_row_major() {
    // 2 wide, 3 tall, value grows down the rows
    let map = FeatureMap::from_fn(2, 3, 1, |x, y, _| (y * 2 + x) as f32);
    let depth = decode_depth(&map, &Normalization::IDENTITY, NumericPolicy::Wrapping).unwrap();

    assert_eq!(depth.get(0, 0), 0);
    assert_eq!(depth.get(1, 2), 255);
    assert_eq!(depth.data[1], depth.get(1, 0));
    assert_eq!(depth.data[2], depth.get(0, 1));
}

#[test]
fn test_depth_output_normalization_is_applied_first() {
    // negative scale flips the ordering
    let flipped = decode_depth(
        &row(&[10.0, 20.0, 30.0]),
        &Normalization::new(0.0, -1.0),
        NumericPolicy::Wrapping,
    )
    .unwrap();
    assert_eq!(flipped.data, vec![255, 127, 0]);
}

#[test]
fn test_depth_values_cover_full_range() {
    let map = FeatureMap::from_fn(16, 16, 1, |x, y, _| ((x * 31 + y * 17) % 97) as f32 - 5.0);
    for policy in [NumericPolicy::Wrapping, NumericPolicy::Saturating] {
        let depth = decode_depth(&map, &Normalization::IDENTITY, policy).unwrap();
        assert_eq!(depth.data.len(), 256);
        assert_eq!(depth.data.iter().copied().min(), Some(0));
        assert_eq!(depth.data.iter().copied().max(), Some(255));
    }
}

#[test]
fn test_constant_depth_wrapping_yields_zeros() {
    let map = FeatureMap::from_fn(4, 4, 1, |_, _, _| 3.5);
    let depth = decode_depth(&map, &Normalization::IDENTITY, NumericPolicy::Wrapping).unwrap();
    assert!(depth.data.iter().all(|&v| v == 0));
}

#[test]
fn test_constant_depth_saturating_yields_zeros() {
    let map = FeatureMap::from_fn(4, 4, 1, |_, _, _| 3.5);
    let depth = decode_depth(&map, &Normalization::IDENTITY, NumericPolicy::Saturating).unwrap();
    assert_eq!(depth.data, vec![0u8; 16]);
}

#[test]
fn test_infinite_range_saturating_yields_zeros() {
    let depth = decode_depth(
        &row(&[0.0, f32::INFINITY]),
        &Normalization::IDENTITY,
        NumericPolicy::Saturating,
    )
    .unwrap();
    assert_eq!(depth.data, vec![0, 0]);
}

#[test]
fn test_nan_cells_are_skipped_for_range() {
    let depth = decode_depth(
        &row(&[0.0, f32::NAN, 10.0]),
        &Normalization::IDENTITY,
        NumericPolicy::Wrapping,
    )
    .unwrap();
    assert_eq!(depth.data, vec![0, 0, 255]);
}

#[test]
fn test_depth_to_tensor_is_gray_image() {
    let map = FeatureMap::from_fn(3, 2, 1, |x, y, _| (x + y) as f32);
    let depth = decode_depth(&map, &Normalization::IDENTITY, NumericPolicy::Wrapping).unwrap();
    let tensor = depth.to_tensor();
    assert_eq!(tensor.shape, vec![2, 3, 1]);
    assert_eq!(tensor.data, depth.data);
}

#[test]
fn test_depth_rejects_multiple_channels() {
    let map = FeatureMap::from_fn(2, 2, 3, |_, _, _| 1.0);
    let result = decode_depth(&map, &Normalization::IDENTITY, NumericPolicy::Wrapping);
    assert!(matches!(result, Err(InferError::ShapeMismatch { .. })));
}
