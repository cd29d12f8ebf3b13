//! Light block of the solar system: a dim sky light, the sun as a point
//! light and a torch on the camera.

use glam::Vec3;
use orrery::{
    Attenuation, Camera, DirectionalLightUniform, LightColors, LightUniform, MaterialUniform, PointLightUniform,
    SpotLightUniform,
};

pub const SHININESS: f32 = 32.0;

pub const SKY_DIRECTION: Vec3 = Vec3::new(-0.2, -1.0, -0.3);
pub const SKY_COLORS: LightColors = LightColors::new(Vec3::splat(0.02), Vec3::splat(0.1), Vec3::splat(0.1));

/// Falls off slowly enough to reach the outer belt.
pub const SUN_ATTENUATION: Attenuation = Attenuation::new(1.0, 0.0007, 0.000002);
pub const SUN_COLORS: LightColors = LightColors::new(Vec3::splat(0.1), Vec3::new(1.0, 0.95, 0.8), Vec3::ONE);

pub const TORCH_INNER_DEGREES: f32 = 12.5;
pub const TORCH_OUTER_DEGREES: f32 = 15.0;
pub const TORCH_ATTENUATION: Attenuation = Attenuation::new(1.0, 0.022, 0.0019);
pub const TORCH_COLORS: LightColors = LightColors::new(Vec3::ZERO, Vec3::splat(0.8), Vec3::splat(0.5));

/// Light block with the sun at the origin.
pub fn initial_lights() -> LightUniform {
    let mut lights = LightUniform {
        material: MaterialUniform {
            shininess: SHININESS,
            ..MaterialUniform::default()
        },
        directional: DirectionalLightUniform::new(SKY_DIRECTION, SKY_COLORS),
        spot: SpotLightUniform::new(
            TORCH_INNER_DEGREES.to_radians(),
            TORCH_OUTER_DEGREES.to_radians(),
            TORCH_ATTENUATION,
            TORCH_COLORS,
        ),
        ..LightUniform::default()
    };
    lights.set_point_lights(&[PointLightUniform::new(Vec3::ZERO, SUN_ATTENUATION, SUN_COLORS)]);
    lights
}

/// Moves the sun light onto the sun and the torch onto the camera.
pub fn follow(lights: &mut LightUniform, sun: Option<Vec3>, camera: &Camera) {
    if let (Some(sun), Some(light)) = (sun, lights.point_light_mut(0)) {
        light.position = sun.extend(1.0);
    }
    lights.spot.place(camera.position, camera.front());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sun_light() {
        let lights = initial_lights();
        assert_eq!(lights.point_lights().len(), 1);
        assert_eq!(lights.material.point_light_count, 1);
        assert_eq!(lights.material.shininess, 32.0);
        assert!((lights.spot.cut_off - 12.5f32.to_radians().cos()).abs() < 1e-6);
        assert!(lights.spot.cut_off > lights.spot.outer_cut_off);
    }

    #[test]
    fn lights_follow_the_sun_and_camera() {
        let mut lights = initial_lights();
        let camera = Camera::looking_forward(Vec3::new(0.0, 20.0, 150.0));

        follow(&mut lights, Some(Vec3::new(1.0, 2.0, 3.0)), &camera);
        assert_eq!(lights.point_lights()[0].position, Vec3::new(1.0, 2.0, 3.0).extend(1.0));
        assert_eq!(lights.spot.position, camera.position);
        assert_eq!(lights.spot.direction, camera.front());

        follow(&mut lights, None, &camera);
        assert_eq!(lights.point_lights()[0].position, Vec3::new(1.0, 2.0, 3.0).extend(1.0));
    }

    #[test]
    fn sun_light_reaches_the_belt() {
        assert!(SUN_ATTENUATION.at(180.0) > 0.5);
    }
}
