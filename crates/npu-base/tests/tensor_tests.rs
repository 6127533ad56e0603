use npu_base::{Tensor, TensorError, element_count};

#[test]
fn test_tensor_new_valid() {
    let tensor = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(tensor.shape, vec![2, 3]);
    assert_eq!(tensor.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_tensor_new_shape_mismatch() {
    let result = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0]);
    assert_eq!(
        result.unwrap_err(),
        TensorError::ShapeMismatch {
            expected: 6,
            got: 3
        }
    );
}

#[test]
fn test_tensor_new_overflow() {
    let result = Tensor::<f32>::new(vec![usize::MAX, 2], vec![]);
    assert!(matches!(result, Err(TensorError::ShapeOverflow)));
}

#[test]
fn test_element_count() {
    assert_eq!(element_count(&[257, 257, 3]).unwrap(), 198_147);
    assert_eq!(element_count(&[]).unwrap(), 1);
    assert_eq!(element_count(&[4, 0, 2]).unwrap(), 0);
    assert_eq!(
        element_count(&[usize::MAX, usize::MAX]),
        Err(TensorError::ShapeOverflow)
    );
}

#[test]
fn test_tensor_zeros_and_filled() {
    let zeros = Tensor::<f32>::zeros(vec![2, 3]).unwrap();
    assert_eq!(zeros.data, vec![0.0; 6]);

    let filled = Tensor::filled(vec![2, 2, 3], 255u8).unwrap();
    assert_eq!(filled.len(), 12);
    assert!(filled.data.iter().all(|&v| v == 255));
}

#[test]
fn test_tensor_map_keeps_shape() {
    let tensor = Tensor::new(vec![1, 2, 3], vec![0u8, 1, 2, 3, 4, 255]).unwrap();
    let widened = tensor.map(|&v| v as f32);
    assert_eq!(widened.shape, vec![1, 2, 3]);
    assert_eq!(widened.data, vec![0.0, 1.0, 2.0, 3.0, 4.0, 255.0]);
    assert_eq!(widened.ndim(), 3);
}

#[test]
fn test_tensor_is_empty() {
    let empty = Tensor::<f32>::new(vec![0], vec![]).unwrap();
    assert!(empty.is_empty());

    let not_empty = Tensor::new(vec![2], vec![1.0, 2.0]).unwrap();
    assert!(!not_empty.is_empty());
}

#[test]
fn test_tensor_debug_omits_data() {
    let tensor = Tensor::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let debug_str = format!("{:?}", tensor);
    assert!(debug_str.contains("shape"));
    assert!(debug_str.contains("len: 4"));
}

#[test]
fn test_tensor_error_display() {
    let err = TensorError::ShapeMismatch {
        expected: 6,
        got: 3,
    };
    assert_eq!(err.to_string(), "shape mismatch: expected 6 elements, got 3");
}
