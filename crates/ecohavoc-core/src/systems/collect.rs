//! Collect system - nearest-pickup search and removal

use ecohavoc_logic::catalog::WasteCategory;
use hecs::World;

use crate::components::{GroundPos, Waste};

/// Closest waste object strictly within `radius` of `(x, z)`.
pub fn find_nearest_waste(world: &World, x: f32, z: f32, radius: f32) -> Option<(hecs::Entity, Waste)> {
    let mut best: Option<(hecs::Entity, Waste, f32)> = None;
    let limit = radius * radius;
    for (entity, (pos, waste)) in world.query::<(&GroundPos, &Waste)>().iter() {
        let d2 = pos.distance_squared(x, z);
        if d2 >= limit {
            continue;
        }
        if best.as_ref().map_or(true, |(_, _, bd)| d2 < *bd) {
            best = Some((entity, *waste, d2));
        }
    }
    best.map(|(entity, waste, _)| (entity, waste))
}

/// Remove the nearest waste object in range and return it.
pub fn collect_nearest(world: &mut World, x: f32, z: f32, radius: f32) -> Option<Waste> {
    let (entity, waste) = find_nearest_waste(world, x, z, radius)?;
    world.despawn(entity).ok()?;
    Some(waste)
}

/// Per-category counts of waste within `radius`, in bin order, zeros omitted.
pub fn scan_nearby(world: &World, x: f32, z: f32, radius: f32) -> Vec<(WasteCategory, u32)> {
    let limit = radius * radius;
    let mut counts = [0u32; WasteCategory::ALL.len()];
    for (_, (pos, waste)) in world.query::<(&GroundPos, &Waste)>().iter() {
        if pos.distance_squared(x, z) < limit {
            if let Some(slot) = WasteCategory::ALL.iter().position(|c| *c == waste.category) {
                counts[slot] += 1;
            }
        }
    }
    WasteCategory::ALL
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(c, n)| (*c, n))
        .collect()
}
