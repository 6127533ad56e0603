use npu_base::Vec2;
use npu_infer::{BodyPart, KEYPOINT_COUNT, Keypoint, PoseResult};

#[test]
fn test_body_part_indices_follow_channel_order() {
    for (index, part) in BodyPart::ALL.iter().enumerate() {
        assert_eq!(usize::from(*part), index);
        assert_eq!(BodyPart::try_from(index).unwrap(), *part);
    }
    assert_eq!(usize::from(BodyPart::Nose), 0);
    assert_eq!(usize::from(BodyPart::LeftShoulder), 5);
    assert_eq!(usize::from(BodyPart::RightAnkle), 16);
}

#[test]
fn test_body_part_out_of_range() {
    let err = BodyPart::try_from(KEYPOINT_COUNT).unwrap_err();
    assert!(err.contains("17"));
}

#[test]
fn test_body_part_names() {
    assert_eq!(BodyPart::Nose.name(), "nose");
    assert_eq!(BodyPart::LeftEar.name(), "left_ear");
    assert_eq!(BodyPart::RightKnee.name(), "right_knee");
}

#[test]
fn test_pose_result_lookup_and_score() {
    let keypoints = std::array::from_fn(|k| Keypoint {
        position: Vec2::new(k as f32, 2.0 * k as f32),
        confidence: if k % 2 == 0 { 1.0 } else { 0.0 },
    });
    let pose = PoseResult { keypoints };

    assert_eq!(pose.keypoint(BodyPart::RightEye).position, Vec2::new(2.0, 4.0));
    assert!((pose.score() - 9.0 / 17.0).abs() < 1e-6);

    let parts: Vec<BodyPart> = pose.iter().map(|(part, _)| part).collect();
    assert_eq!(parts, BodyPart::ALL.to_vec());
}
