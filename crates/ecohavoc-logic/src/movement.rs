//! Player movement and mouse-look on the ground plane.
//!
//! Yaw 0 faces -Z. Forward input moves along `(-sin yaw, -cos yaw)`,
//! strafing along the perpendicular. Each held direction contributes its
//! full speed, so diagonals are faster than straight lines; the walk is
//! then clamped to the square world boundary. Height never changes.

use serde::{Deserialize, Serialize};

/// Which movement keys are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.back || self.left || self.right)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub x: f32,
    pub z: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl PlayerPose {
    /// Walk for `dt` seconds at `speed` units/s, staying inside `±bound`.
    pub fn walk(&mut self, intent: MoveIntent, speed: f32, dt: f32, bound: f32) {
        if intent.is_idle() {
            return;
        }
        let step = speed * dt;
        let (sin, cos) = self.yaw.sin_cos();
        if intent.forward {
            self.x -= sin * step;
            self.z -= cos * step;
        }
        if intent.back {
            self.x += sin * step;
            self.z += cos * step;
        }
        if intent.left {
            self.x -= cos * step;
            self.z += sin * step;
        }
        if intent.right {
            self.x += cos * step;
            self.z -= sin * step;
        }
        self.x = self.x.clamp(-bound, bound);
        self.z = self.z.clamp(-bound, bound);
    }

    /// Apply a pointer delta in pixels. Yaw is unbounded; pitch is clamped.
    pub fn look(&mut self, dx: f32, dy: f32, sensitivity: f32, pitch_limit: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-pitch_limit, pitch_limit);
    }

    /// Squared ground-plane distance to a point.
    pub fn distance_sq(&self, x: f32, z: f32) -> f32 {
        let dx = self.x - x;
        let dz = self.z - z;
        dx * dx + dz * dz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPS: f32 = 1e-4;

    fn fwd() -> MoveIntent {
        MoveIntent {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn forward_at_zero_yaw_is_minus_z() {
        let mut p = PlayerPose::default();
        p.walk(fwd(), 8.0, 1.0, 90.0);
        assert!(p.x.abs() < EPS);
        assert!((p.z + 8.0).abs() < EPS);
    }

    #[test]
    fn strafe_right_at_zero_yaw_is_plus_x() {
        let mut p = PlayerPose::default();
        let intent = MoveIntent {
            right: true,
            ..Default::default()
        };
        p.walk(intent, 8.0, 0.5, 90.0);
        assert!((p.x - 4.0).abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut p = PlayerPose {
            yaw: FRAC_PI_2,
            ..Default::default()
        };
        p.walk(fwd(), 11.0, 1.0, 90.0);
        assert!((p.x + 11.0).abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut p = PlayerPose::default();
        let intent = MoveIntent {
            forward: true,
            back: true,
            ..Default::default()
        };
        p.walk(intent, 8.0, 1.0, 90.0);
        assert!(p.x.abs() < EPS && p.z.abs() < EPS);
    }

    #[test]
    fn walk_clamps_to_bound() {
        let mut p = PlayerPose {
            z: -89.0,
            ..Default::default()
        };
        p.walk(fwd(), 8.0, 1.0, 90.0);
        assert_eq!(p.z, -90.0);
    }

    #[test]
    fn look_clamps_pitch_not_yaw() {
        let mut p = PlayerPose::default();
        p.look(-10_000.0, -10_000.0, 0.002, FRAC_PI_3);
        assert!((p.yaw - 20.0).abs() < EPS);
        assert!((p.pitch - FRAC_PI_3).abs() < EPS);
        p.look(0.0, 10_000.0, 0.002, FRAC_PI_3);
        assert!((p.pitch + FRAC_PI_3).abs() < EPS);
    }
}
