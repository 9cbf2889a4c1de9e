//! Procedural city layout: buildings, road grid, trees, plaza, smog.
//!
//! The layout is plain data generated once per session from the engine's
//! RNG. The renderer turns it into meshes; the minimap draws building
//! footprints from it. Coordinates are world units on the XZ plane with Y up.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Building placement attempts. Attempts landing on the plaza are skipped.
pub const BUILDING_ATTEMPTS: usize = 80;
/// Buildings spread over `±CITY_HALF_EXTENT`.
pub const CITY_HALF_EXTENT: f32 = 90.0;
/// Half-width of the 20x20 square kept free of buildings around the origin.
/// Covers the plaza disc.
pub const PLAZA_CLEARANCE: f32 = 10.0;
pub const PLAZA_RADIUS: f32 = 8.0;
pub const ROAD_SPACING: f32 = 20.0;
/// Roads run at `-ROAD_LINES*spacing ..= ROAD_LINES*spacing`.
pub const ROAD_LINES: i32 = 4;
pub const ROAD_WIDTH: f32 = 3.0;
pub const ROAD_LENGTH: f32 = 200.0;
pub const TREE_COUNT: usize = 20;
pub const TREE_HALF_EXTENT: f32 = 50.0;
pub const NEON_RING_RADIUS: f32 = 20.0;
pub const NEON_HEIGHT: f32 = 6.0;
pub const SMOG_PARTICLES: usize = 800;
pub const SMOG_HALF_EXTENT: f32 = 100.0;
pub const SMOG_CEILING: f32 = 30.0;

/// Dark building body tones (0xRRGGBB).
pub const BUILDING_PALETTE: [u32; 4] = [0x002200, 0x001133, 0x220022, 0x003300];
/// Rooftop strip and plaza light colors.
pub const NEON_PALETTE: [u32; 4] = [0x00ff64, 0x00aaff, 0xff4488, 0xffaa00];
pub const NEON_LIGHT_COLORS: [u32; 4] = [0x00ff64, 0x0066ff, 0xff0066, 0xffaa00];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub color: u32,
    /// Neon strip on the roof, if any.
    pub roof_strip: Option<u32>,
}

impl Building {
    /// True if the footprint centre lies inside the plaza clearance.
    pub fn on_plaza(x: f32, z: f32) -> bool {
        x.abs() < PLAZA_CLEARANCE && z.abs() < PLAZA_CLEARANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub x: f32,
    pub z: f32,
    pub crown_radius: f32,
    pub crown_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeonLight {
    pub position: [f32; 3],
    pub color: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityLayout {
    pub buildings: Vec<Building>,
    /// Offsets of the road centre lines; each runs along both X and Z.
    pub road_offsets: Vec<f32>,
    pub trees: Vec<Tree>,
    pub neon_lights: Vec<NeonLight>,
    pub smog: Vec<[f32; 3]>,
}

impl CityLayout {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut buildings = Vec::with_capacity(BUILDING_ATTEMPTS);
        for _ in 0..BUILDING_ATTEMPTS {
            let x = rng.gen_range(-CITY_HALF_EXTENT..CITY_HALF_EXTENT);
            let z = rng.gen_range(-CITY_HALF_EXTENT..CITY_HALF_EXTENT);
            if Building::on_plaza(x, z) {
                continue;
            }
            let height = rng.gen_range(5.0..40.0);
            let width = rng.gen_range(3.0..11.0);
            let depth = rng.gen_range(3.0..11.0);
            let color = BUILDING_PALETTE[rng.gen_range(0..BUILDING_PALETTE.len())];
            let roof_strip = rng
                .gen_bool(0.5)
                .then(|| NEON_PALETTE[rng.gen_range(0..NEON_PALETTE.len())]);
            buildings.push(Building {
                x,
                z,
                width,
                depth,
                height,
                color,
                roof_strip,
            });
        }

        let road_offsets = (-ROAD_LINES..=ROAD_LINES)
            .map(|i| i as f32 * ROAD_SPACING)
            .collect();

        let trees = (0..TREE_COUNT)
            .map(|_| Tree {
                x: rng.gen_range(-TREE_HALF_EXTENT..TREE_HALF_EXTENT),
                z: rng.gen_range(-TREE_HALF_EXTENT..TREE_HALF_EXTENT),
                crown_radius: rng.gen_range(1.5..2.0),
                crown_height: rng.gen_range(3.0..4.0),
            })
            .collect();

        let n = NEON_LIGHT_COLORS.len() as f32;
        let neon_lights = NEON_LIGHT_COLORS
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let angle = i as f32 / n * std::f32::consts::TAU;
                NeonLight {
                    position: [
                        angle.cos() * NEON_RING_RADIUS,
                        NEON_HEIGHT,
                        angle.sin() * NEON_RING_RADIUS,
                    ],
                    color,
                }
            })
            .collect();

        let smog = (0..SMOG_PARTICLES)
            .map(|_| {
                [
                    rng.gen_range(-SMOG_HALF_EXTENT..SMOG_HALF_EXTENT),
                    rng.gen_range(0.0..SMOG_CEILING),
                    rng.gen_range(-SMOG_HALF_EXTENT..SMOG_HALF_EXTENT),
                ]
            })
            .collect();

        log::debug!(
            "generated city: {} buildings, {} trees, {} smog particles",
            buildings.len(),
            TREE_COUNT,
            SMOG_PARTICLES
        );

        Self {
            buildings,
            road_offsets,
            trees,
            neon_lights,
            smog,
        }
    }
}
