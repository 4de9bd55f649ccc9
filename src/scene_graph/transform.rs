use glam::{Mat4, Quat, Vec3};

/// Local transform of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: f32,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.translation,
        )
    }

    pub fn set_transform(&mut self, translation: Vec3, rotation: Quat, scale: f32) {
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    #[allow(dead_code)]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    #[allow(dead_code)]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[allow(dead_code)]
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_matrix_applies_scale_then_rotation_then_translation() {
        let mut transform = Transform::default();
        transform.set_transform(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            2.0,
        );

        let point = transform.local_matrix().transform_point3(Vec3::X);

        assert!(point.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn set_translation_keeps_rotation_and_scale() {
        let mut transform = Transform::default();
        transform.set_transform(Vec3::ZERO, Quat::from_rotation_y(1.0), 3.0);
        transform.set_translation(Vec3::new(4.0, 5.0, 6.0));

        assert_eq!(transform.translation(), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(transform.scale(), 3.0);
        assert_eq!(transform.rotation(), Quat::from_rotation_y(1.0));
    }
}
