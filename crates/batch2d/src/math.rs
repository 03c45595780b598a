use glam::{Mat4, Quat, Vec3};

/// Maps pixel coordinates centered on the screen to clip space: `diag(2/w, 2/h, 1, 1)`.
pub fn pixel_space_projection(width: f32, height: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(2.0 / width, 2.0 / height, 1.0))
}

/// `translation * rotation_z * scale`: scale first, then rotate, then translate.
pub fn translate_rotate_scale(x: f32, y: f32, rotation: f32, scale_x: f32, scale_y: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(scale_x, scale_y, 1.0),
        Quat::from_rotation_z(rotation),
        Vec3::new(x, y, 0.0),
    )
}

/// A line segment expressed as a rotated rectangle centered between its endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentFrame {
    pub center: [f32; 2],
    pub length: f32,
    pub angle: f32,
}

impl SegmentFrame {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let dx = x2 - x1;
        let dy = y2 - y1;
        Self {
            center: [(x1 + x2) * 0.5, (y1 + y2) * 0.5],
            length: dx.hypot(dy),
            angle: dy.atan2(dx),
        }
    }

    pub fn transform(&self, thickness: f32) -> Mat4 {
        translate_rotate_scale(
            self.center[0],
            self.center[1],
            self.angle,
            self.length,
            thickness,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_projection_maps_edges_to_clip_space() {
        let projection = pixel_space_projection(800.0, 600.0);
        let corner = projection * Vec4::new(400.0, -300.0, 0.0, 1.0);
        assert!(approx(corner, Vec4::new(1.0, -1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_scale_applies_before_rotation() {
        let m = translate_rotate_scale(10.0, 20.0, std::f32::consts::FRAC_PI_2, 4.0, 2.0);
        // Unit x is scaled to 4, rotated onto +y, then translated.
        let p = m * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx(p, Vec4::new(10.0, 24.0, 0.0, 1.0)));
    }

    #[test]
    fn test_segment_frame() {
        let segment = SegmentFrame::new(0.0, 0.0, 30.0, 40.0);
        assert_eq!(segment.center, [15.0, 20.0]);
        assert_eq!(segment.length, 50.0);
        assert!((segment.angle - (40.0f32).atan2(30.0)).abs() < 1e-6);

        // The rectangle's local +x half-extent lands on the second endpoint.
        let end = segment.transform(2.0) * Vec4::new(0.5, 0.0, 0.0, 1.0);
        assert!(approx(end, Vec4::new(30.0, 40.0, 0.0, 1.0)));
    }
}
