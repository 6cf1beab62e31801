use std::time::Instant;

use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, Point3, Vector3};

/// Degrees of quad rotation per second of elapsed time.
const SPIN_RATE: f32 = 180.0;
/// Angular frequency of the texture blend oscillation.
const BLEND_RATE: f32 = 4.0;

/// Monotonic clock captured once before the frame loop.
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Rotation of the quad around the Z axis after `elapsed` seconds.
pub fn rotation_angle(elapsed: f32) -> Deg<f32> {
    Deg(elapsed * SPIN_RATE)
}

pub fn model_matrix(elapsed: f32) -> Matrix4<f32> {
    Matrix4::from_angle_z(rotation_angle(elapsed))
}

/// Texture blend weight, oscillating within [0, 1].
pub fn blend_factor(elapsed: f32) -> f32 {
    ((elapsed * BLEND_RATE).sin() + 1.0) / 2.0
}

pub fn view_matrix() -> Matrix4<f32> {
    Matrix4::look_at_rh(
        Point3::new(1.2, 1.2, 1.2),
        Point3::origin(),
        Vector3::unit_z(),
    )
}

pub fn projection_matrix(width: u32, height: u32) -> Matrix4<f32> {
    perspective(Deg(45.0), width as f32 / height as f32, 1.0, 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_starts_at_identity() {
        assert_eq!(rotation_angle(0.0), Deg(0.0));
    }

    #[test]
    fn rotation_increases_with_time() {
        let mut previous = rotation_angle(0.0).0;

        for step in 1..=100 {
            let angle = rotation_angle(step as f32 * 0.05).0;

            assert!(angle > previous);
            previous = angle;
        }
    }

    #[test]
    fn blend_factor_stays_in_unit_range() {
        // samples past one full period of the driving sine
        for step in 0..=1000 {
            let elapsed = step as f32 * 0.002;
            let blend = blend_factor(elapsed);

            assert!((0.0..=1.0).contains(&blend), "blend {blend} at {elapsed}s");
        }
    }
}
