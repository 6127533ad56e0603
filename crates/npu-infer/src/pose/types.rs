use npu_base::Vec2;

/// Number of body-part keypoints a pose model predicts.
pub const KEYPOINT_COUNT: usize = 17;

/// A single keypoint with 2D position and confidence score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// Position in image pixels.
    pub position: Vec2<f32>,
    /// Sigmoid of the heatmap score, in `[0, 1]`.
    pub confidence: f32,
}

/// Body parts in model channel order (COCO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl BodyPart {
    pub const ALL: [BodyPart; KEYPOINT_COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose => "nose",
            BodyPart::LeftEye => "left_eye",
            BodyPart::RightEye => "right_eye",
            BodyPart::LeftEar => "left_ear",
            BodyPart::RightEar => "right_ear",
            BodyPart::LeftShoulder => "left_shoulder",
            BodyPart::RightShoulder => "right_shoulder",
            BodyPart::LeftElbow => "left_elbow",
            BodyPart::RightElbow => "right_elbow",
            BodyPart::LeftWrist => "left_wrist",
            BodyPart::RightWrist => "right_wrist",
            BodyPart::LeftHip => "left_hip",
            BodyPart::RightHip => "right_hip",
            BodyPart::LeftKnee => "left_knee",
            BodyPart::RightKnee => "right_knee",
            BodyPart::LeftAnkle => "left_ankle",
            BodyPart::RightAnkle => "right_ankle",
        }
    }
}

impl From<BodyPart> for usize {
    fn from(part: BodyPart) -> usize {
        part as usize
    }
}

impl TryFrom<usize> for BodyPart {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        BodyPart::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid body part index: {}. Must be in range 0-{}.",
                value,
                KEYPOINT_COUNT - 1
            )
        })
    }
}

/// One keypoint per body part, in `BodyPart::ALL` order.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseResult {
    pub keypoints: [Keypoint; KEYPOINT_COUNT],
}

impl PoseResult {
    pub fn keypoint(&self, part: BodyPart) -> &Keypoint {
        &self.keypoints[usize::from(part)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, &Keypoint)> {
        BodyPart::ALL.into_iter().zip(self.keypoints.iter())
    }

    /// Mean keypoint confidence.
    pub fn score(&self) -> f32 {
        self.keypoints.iter().map(|k| k.confidence).sum::<f32>() / KEYPOINT_COUNT as f32
    }
}
