//! Components for pickable waste objects in the 3D world.

use ecohavoc_logic::catalog::WasteCategory;
use serde::{Deserialize, Serialize};

/// Resting height of a waste sphere above the ground.
pub const WASTE_REST_HEIGHT: f32 = 0.4;
/// Bobbing amplitude in world units.
pub const BOB_AMPLITUDE: f32 = 0.15;
/// Bobbing angular frequency in rad/s.
pub const BOB_RATE: f32 = 3.0;
/// Spin rate in rad/s.
pub const SPIN_RATE: f32 = 1.2;

/// Position on the ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundPos {
    pub x: f32,
    pub z: f32,
}

impl GroundPos {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn distance_squared(&self, x: f32, z: f32) -> f32 {
        let dx = self.x - x;
        let dz = self.z - z;
        dx * dx + dz * dz
    }
}

/// A piece of collectable waste.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waste {
    pub category: WasteCategory,
    /// Sphere radius, cosmetic.
    pub radius: f32,
}

impl Waste {
    pub fn value(&self) -> u64 {
        self.category.collect_value()
    }

    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

/// Cosmetic float-and-spin animation state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bobbing {
    /// Per-object phase offset (the spawn index).
    pub phase: f32,
    /// Current height above ground.
    pub height: f32,
    /// Current rotation about Y in radians.
    pub spin: f32,
}

impl Bobbing {
    pub fn new(phase: f32) -> Self {
        Self {
            phase,
            height: WASTE_REST_HEIGHT,
            spin: 0.0,
        }
    }
}
