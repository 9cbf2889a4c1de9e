//! Spawn system - populates and clears a district's waste objects

use ecohavoc_logic::catalog::{DistrictInfo, WasteCategory};
use hecs::World;
use rand::Rng;

use crate::components::{Bobbing, GroundPos, Waste};

/// Number of waste objects a district spawns: `10 + floor(pollution / 10)`.
pub fn waste_count_for(district: &DistrictInfo) -> usize {
    10 + district.base_pollution as usize / 10
}

/// Spawn `count` waste objects uniformly over `±half_extent` with random
/// categories. A non-positive extent puts everything at the origin.
pub fn spawn_waste(
    world: &mut World,
    count: usize,
    half_extent: f32,
    rng: &mut impl Rng,
) -> Vec<hecs::Entity> {
    let mut spawned = Vec::with_capacity(count);
    for i in 0..count {
        let (x, z) = if half_extent > 0.0 {
            (
                rng.gen_range(-half_extent..half_extent),
                rng.gen_range(-half_extent..half_extent),
            )
        } else {
            (0.0, 0.0)
        };
        let category = WasteCategory::ALL[rng.gen_range(0..WasteCategory::ALL.len())];
        let radius = rng.gen_range(0.4..0.7);
        spawned.push(world.spawn((
            GroundPos::new(x, z),
            Waste { category, radius },
            Bobbing::new(i as f32),
        )));
    }
    spawned
}

/// Remove every waste object. Returns how many were removed.
pub fn clear_waste(world: &mut World) -> usize {
    let doomed: Vec<hecs::Entity> = world
        .query::<&Waste>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in &doomed {
        let _ = world.despawn(*entity);
    }
    doomed.len()
}

pub fn waste_remaining(world: &World) -> usize {
    world.query::<&Waste>().iter().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecohavoc_logic::catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn count_follows_pollution() {
        let counts: Vec<usize> = catalog::districts().iter().map(waste_count_for).collect();
        // Downtown 70, Industrial 90, Beach 55, Suburb 40, Slum 85, Eco 5
        assert_eq!(counts, vec![17, 19, 15, 14, 18, 10]);
    }

    #[test]
    fn spawn_within_extent() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(3);
        let spawned = spawn_waste(&mut world, 25, 50.0, &mut rng);
        assert_eq!(spawned.len(), 25);
        for (_, (pos, waste)) in world.query::<(&GroundPos, &Waste)>().iter() {
            assert!(pos.x.abs() <= 50.0 && pos.z.abs() <= 50.0);
            assert!((0.4..0.7).contains(&waste.radius));
        }
    }

    #[test]
    fn empty_extent_spawns_at_origin() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(spawn_waste(&mut world, 3, 0.0, &mut rng).len(), 3);
        for (_, pos) in world.query::<&GroundPos>().iter() {
            assert_eq!((pos.x, pos.z), (0.0, 0.0));
        }
    }

    #[test]
    fn clear_removes_only_waste() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(4);
        spawn_waste(&mut world, 12, 50.0, &mut rng);
        let other = world.spawn((GroundPos::new(1.0, 1.0),));
        assert_eq!(clear_waste(&mut world), 12);
        assert_eq!(waste_remaining(&world), 0);
        assert!(world.contains(other));
    }
}
