/// Seed used for the asteroid belt until the user asks for a new one.
pub const DEFAULT_SEED: u64 = 0x5eed_0f_a5_7e_201d;

/// Every tunable of the solar system scene.
///
/// Angles are in radians. Sun mass and radius apply live to the running
/// simulation; everything else takes effect on the next reset.
#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    /// Multiplier on wall-clock frame time.
    pub simulation_speed: f32,
    pub paused: bool,
    /// Scaled gravitational constant, nowhere near the physical value.
    pub gravitational_constant: f32,

    pub sun_mass: f32,
    pub sun_radius_scale: f32,

    pub planet_mass: f32,
    pub planet_radius_scale: f32,
    pub planet_orbit_radius: f32,
    pub planet_initial_angle: f32,

    pub asteroid_count: u32,
    pub asteroid_average_mass: f32,
    pub asteroid_min_scale: f32,
    pub asteroid_max_scale: f32,
    pub belt_inner_radius: f32,
    pub belt_outer_radius: f32,
    pub belt_height: f32,

    /// Seed of the generator that lays out the belt. Equal seeds and
    /// parameters produce bit-identical belts.
    pub seed: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            simulation_speed: 1.0,
            paused: false,
            gravitational_constant: 1000.0,

            sun_mass: 20000.0,
            sun_radius_scale: 15.0,

            planet_mass: 200.0,
            planet_radius_scale: 4.0,
            planet_orbit_radius: 70.0,
            planet_initial_angle: 0.0,

            asteroid_count: 1000,
            asteroid_average_mass: 0.1,
            asteroid_min_scale: 0.05,
            asteroid_max_scale: 0.25,
            belt_inner_radius: 100.0,
            belt_outer_radius: 180.0,
            belt_height: 10.0,

            seed: DEFAULT_SEED,
        }
    }
}

impl SimParams {
    /// Simulated seconds covered by a frame of `frame_time` seconds, zero when
    /// paused.
    pub fn effective_dt(&self, frame_time: f32) -> f32 {
        if self.paused {
            0.0
        } else {
            frame_time * self.simulation_speed
        }
    }
}

/// Speed of a circular orbit of `radius` around `central_mass`:
/// `sqrt(g * central_mass / radius)`. Zero when the mass or radius is not
/// positive.
pub fn circular_orbit_speed(gravitational_constant: f32, central_mass: f32, radius: f32) -> f32 {
    if central_mass <= 0.0 || radius <= 0.0 {
        return 0.0;
    }
    (gravitational_constant * central_mass / radius).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_scenes_do_not_advance() {
        let mut params = SimParams {
            simulation_speed: 2.5,
            ..SimParams::default()
        };
        assert!((params.effective_dt(0.02) - 0.05).abs() < 1e-7);
        params.paused = true;
        assert_eq!(params.effective_dt(0.02), 0.0);
    }

    #[test]
    fn orbit_speed_guards_degenerate_input() {
        assert_eq!(circular_orbit_speed(1.0, 10000.0, 10.0), 1000f32.sqrt());
        assert_eq!(circular_orbit_speed(1.0, 0.0, 10.0), 0.0);
        assert_eq!(circular_orbit_speed(1.0, 100.0, 0.0), 0.0);
        assert_eq!(circular_orbit_speed(1.0, 100.0, -5.0), 0.0);
    }
}
