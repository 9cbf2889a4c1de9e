//! Animation system - cosmetic float and spin of waste objects

use hecs::World;

use crate::components::{Bobbing, BOB_AMPLITUDE, BOB_RATE, SPIN_RATE, WASTE_REST_HEIGHT};

/// Height of a bobbing object at `elapsed` seconds.
pub fn bob_height(elapsed: f32, phase: f32) -> f32 {
    WASTE_REST_HEIGHT + (elapsed * BOB_RATE + phase).sin() * BOB_AMPLITUDE
}

pub fn animation_system(world: &mut World, elapsed: f32, delta_seconds: f32) {
    for (_, bob) in world.query_mut::<&mut Bobbing>() {
        bob.height = bob_height(elapsed, bob.phase);
        bob.spin = (bob.spin + SPIN_RATE * delta_seconds) % std::f32::consts::TAU;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_stays_in_band() {
        for i in 0..200 {
            let h = bob_height(i as f32 * 0.1, (i % 7) as f32);
            assert!(h >= WASTE_REST_HEIGHT - BOB_AMPLITUDE - 1e-5);
            assert!(h <= WASTE_REST_HEIGHT + BOB_AMPLITUDE + 1e-5);
        }
    }

    #[test]
    fn phases_differ() {
        assert_ne!(bob_height(1.0, 0.0), bob_height(1.0, 1.0));
    }

    #[test]
    fn spin_advances() {
        let mut world = World::new();
        let e = world.spawn((Bobbing::new(2.0),));
        animation_system(&mut world, 0.5, 0.5);
        let bob = *world.get::<&Bobbing>(e).unwrap();
        assert!((bob.spin - 0.6).abs() < 1e-5);
        assert!((bob.height - bob_height(0.5, 2.0)).abs() < 1e-6);
    }
}
