use npu_base::Tensor;
use npu_infer::{BodyPart, PoseResult};

/// Limb connections of the 17-keypoint skeleton with their colors.
const SKELETON: [(BodyPart, BodyPart, [u8; 3]); 16] = {
    use BodyPart::*;
    const FACE: [u8; 3] = [0, 255, 255];
    const TORSO: [u8; 3] = [0, 255, 0];
    const ARMS: [u8; 3] = [255, 255, 0];
    const LEGS: [u8; 3] = [255, 0, 255];
    [
        (Nose, LeftEye, FACE),
        (Nose, RightEye, FACE),
        (LeftEye, LeftEar, FACE),
        (RightEye, RightEar, FACE),
        (LeftShoulder, RightShoulder, TORSO),
        (LeftShoulder, LeftHip, TORSO),
        (RightShoulder, RightHip, TORSO),
        (LeftHip, RightHip, TORSO),
        (LeftShoulder, LeftElbow, ARMS),
        (RightShoulder, RightElbow, ARMS),
        (LeftElbow, LeftWrist, ARMS),
        (RightElbow, RightWrist, ARMS),
        (LeftHip, LeftKnee, LEGS),
        (RightHip, RightKnee, LEGS),
        (LeftKnee, LeftAnkle, LEGS),
        (RightKnee, RightAnkle, LEGS),
    ]
};

const KEYPOINT_COLOR: [u8; 3] = [255, 0, 0];

fn set_pixel(image: &mut Tensor<u8>, x: i32, y: i32, color: [u8; 3]) {
    let (height, width) = (image.shape[0] as i32, image.shape[1] as i32);
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    let at = ((y * width + x) * 3) as usize;
    image.data[at..at + 3].copy_from_slice(&color);
}

/// Bresenham line, clipped per pixel.
fn draw_line(
    image: &mut Tensor<u8>,
    (mut x0, mut y0): (i32, i32),
    (x1, y1): (i32, i32),
    color: [u8; 3],
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        set_pixel(image, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_dot(image: &mut Tensor<u8>, (cx, cy): (i32, i32), radius: i32, color: [u8; 3]) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                set_pixel(image, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Overlay keypoints above `threshold` and the limbs between them on an RGB image.
pub fn draw_pose(image: &mut Tensor<u8>, pose: &PoseResult, threshold: f32) {
    let visible = |part: BodyPart| {
        let keypoint = pose.keypoint(part);
        let position = keypoint.position;
        (keypoint.confidence >= threshold && position.x.is_finite() && position.y.is_finite())
            .then(|| (position.x.round() as i32, position.y.round() as i32))
    };

    for (from, to, color) in SKELETON {
        if let (Some(a), Some(b)) = (visible(from), visible(to)) {
            draw_line(image, a, b, color);
        }
    }
    for part in BodyPart::ALL {
        if let Some(point) = visible(part) {
            draw_dot(image, point, 3, KEYPOINT_COLOR);
        }
    }
}
