//! Matrix helpers layered on glam.

use glam::{Mat3, Mat4, Quat, Vec3};

/// `translate(position) * rotate(orientation) * scale(uniform_scale)`.
pub fn model_matrix(position: Vec3, orientation: Quat, uniform_scale: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(Vec3::splat(uniform_scale), orientation, position)
}

/// Matrix that transforms normals the same way `model` transforms positions:
/// `transpose(inverse(mat3(model)))`.
pub fn normal_matrix(model: Mat4) -> Mat3 {
    Mat3::from_mat4(model).inverse().transpose()
}

/// Drops the translation out of a view matrix so geometry drawn with it stays
/// centred on the eye.
pub fn strip_translation(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

/// Unit direction for a yaw/pitch pair given in radians. Yaw is measured from
/// +X towards +Z, pitch towards +Y.
pub fn direction_from_yaw_pitch(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize()
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat, Vec3, Vec4};

    use super::*;

    #[test]
    fn model_matrix_applies_scale_then_rotation_then_translation() {
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let model = model_matrix(Vec3::new(10.0, 0.0, 0.0), rotation, 2.0);
        let expected = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))
            * Mat4::from_quat(rotation)
            * Mat4::from_scale(Vec3::splat(2.0));
        assert!(model.abs_diff_eq(expected, 1e-6));

        let point = model * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(point.truncate().abs_diff_eq(Vec3::new(10.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let normal = normal_matrix(model) * Vec3::new(1.0, 1.0, 0.0);
        assert!(normal.abs_diff_eq(Vec3::new(0.5, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn stripped_view_keeps_rotation_only() {
        let view = Mat4::look_at_rh(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO, Vec3::Y);
        let stripped = strip_translation(view);
        assert_eq!(stripped.w_axis, Vec4::W);
        assert!((stripped * Vec4::W).abs_diff_eq(Vec4::W, 1e-6));
        assert!(stripped.x_axis.truncate().abs_diff_eq(view.x_axis.truncate(), 1e-6));
    }

    #[test]
    fn yaw_minus_ninety_looks_down_negative_z() {
        let dir = direction_from_yaw_pitch(-90f32.to_radians(), 0.0);
        assert!(dir.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
}
