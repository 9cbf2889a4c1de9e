//! 3D world rendering for the Eco Havoc client.
//!
//! Builds the city once from the engine's layout, keeps one mesh per
//! waste object in step with the engine, and recolors sky, fog and smog
//! whenever the presenter receives a new atmosphere.

use std::collections::HashMap;

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use ecohavoc_logic::catalog::WasteCategory;
use ecohavoc_logic::city::{ROAD_LENGTH, ROAD_WIDTH};

use crate::state::{Game, PlayerCamera, SmogParticle, UiFeed, WasteEntity};

/// 0xRRGGBB to an sRGB color.
pub fn hex(color: u32) -> Color {
    Color::srgb_u8((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

/// Shared handles for waste meshes, one material pair per category.
#[derive(Resource)]
pub struct WasteAssets {
    sphere: Handle<Mesh>,
    ring: Handle<Mesh>,
    body: HashMap<WasteCategory, Handle<StandardMaterial>>,
    glow: HashMap<WasteCategory, Handle<StandardMaterial>>,
}

#[derive(Resource)]
pub struct SmogMaterial(pub Handle<StandardMaterial>);

pub fn spawn_city(
    mut commands: Commands,
    game: Res<Game>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let city = game.0.city();

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(300.0, 300.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex(0x0a1a0a),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::default(),
    ));

    // Buildings, with an optional neon strip on the roof
    let unit_box = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let mut palette: HashMap<u32, Handle<StandardMaterial>> = HashMap::new();
    let mut neon: HashMap<u32, Handle<StandardMaterial>> = HashMap::new();
    for b in &city.buildings {
        let mat = palette
            .entry(b.color)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: hex(b.color),
                    emissive: LinearRgba::rgb(0.0, 0.03, 0.0),
                    ..default()
                })
            })
            .clone();
        commands.spawn((
            Mesh3d(unit_box.clone()),
            MeshMaterial3d(mat),
            Transform::from_xyz(b.x, b.height / 2.0, b.z).with_scale(Vec3::new(
                b.width,
                b.height,
                b.depth,
            )),
        ));
        if let Some(strip) = b.roof_strip {
            let mat = neon
                .entry(strip)
                .or_insert_with(|| {
                    materials.add(StandardMaterial {
                        base_color: hex(strip),
                        emissive: hex(strip).to_linear() * 4.0,
                        unlit: true,
                        ..default()
                    })
                })
                .clone();
            commands.spawn((
                Mesh3d(unit_box.clone()),
                MeshMaterial3d(mat),
                Transform::from_xyz(b.x, b.height, b.z).with_scale(Vec3::new(
                    b.width + 0.1,
                    0.3,
                    b.depth + 0.1,
                )),
            ));
        }
    }

    // Road grid
    let road_mat = materials.add(StandardMaterial {
        base_color: hex(0x111111),
        ..default()
    });
    for &offset in &city.road_offsets {
        commands.spawn((
            Mesh3d(unit_box.clone()),
            MeshMaterial3d(road_mat.clone()),
            Transform::from_xyz(0.0, 0.01, offset).with_scale(Vec3::new(ROAD_LENGTH, 0.05, ROAD_WIDTH)),
        ));
        commands.spawn((
            Mesh3d(unit_box.clone()),
            MeshMaterial3d(road_mat.clone()),
            Transform::from_xyz(offset, 0.01, 0.0).with_scale(Vec3::new(ROAD_WIDTH, 0.05, ROAD_LENGTH)),
        ));
    }

    // Trees
    let trunk_mesh = meshes.add(Cylinder::new(0.25, 2.0));
    let trunk_mat = materials.add(StandardMaterial {
        base_color: hex(0x4a2800),
        ..default()
    });
    let crown_mesh = meshes.add(Sphere::new(1.0));
    let crown_mat = materials.add(StandardMaterial {
        base_color: hex(0x00aa33),
        emissive: LinearRgba::rgb(0.0, 0.07, 0.0),
        ..default()
    });
    for t in &city.trees {
        commands.spawn((
            Mesh3d(trunk_mesh.clone()),
            MeshMaterial3d(trunk_mat.clone()),
            Transform::from_xyz(t.x, 1.0, t.z),
        ));
        commands.spawn((
            Mesh3d(crown_mesh.clone()),
            MeshMaterial3d(crown_mat.clone()),
            Transform::from_xyz(t.x, t.crown_height, t.z).with_scale(Vec3::splat(t.crown_radius)),
        ));
    }

    // Plaza with the sorting station
    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(8.0, 0.2))),
        MeshMaterial3d(road_mat.clone()),
        Transform::from_xyz(0.0, 0.1, 0.0),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(3.0, 3.0, 3.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex(0x004400),
            emissive: LinearRgba::rgb(0.0, 0.13, 0.0),
            ..default()
        })),
        Transform::from_xyz(0.0, 1.5, 0.0),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(2.5, 0.5, 2.5))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex(0x00ff64),
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, 3.3, 0.0),
    ));

    // Neon lights
    for light in &city.neon_lights {
        let [x, y, z] = light.position;
        commands.spawn((
            PointLight {
                color: hex(light.color),
                intensity: 150_000.0,
                range: 40.0,
                ..default()
            },
            Transform::from_xyz(x, y, z),
        ));
    }

    // Smog
    let smog_mat = materials.add(StandardMaterial {
        base_color: hex(0x443300).with_alpha(0.4),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let smog_mesh = meshes.add(Sphere::new(0.15));
    for &[x, y, z] in &city.smog {
        commands.spawn((
            Mesh3d(smog_mesh.clone()),
            MeshMaterial3d(smog_mat.clone()),
            Transform::from_xyz(x, y, z),
            SmogParticle,
        ));
    }
    commands.insert_resource(SmogMaterial(smog_mat));

    // Waste handles
    let mut body = HashMap::new();
    let mut glow = HashMap::new();
    for category in WasteCategory::ALL {
        let color = hex(category.world_color());
        body.insert(
            category,
            materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..default()
            }),
        );
        glow.insert(
            category,
            materials.add(StandardMaterial {
                base_color: color.with_alpha(0.6),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            }),
        );
    }
    commands.insert_resource(WasteAssets {
        sphere: meshes.add(Sphere::new(1.0)),
        ring: meshes.add(Torus::new(0.55, 0.65)),
        body,
        glow,
    });

    info!(
        "city built: {} buildings, {} trees, {} smog particles",
        city.buildings.len(),
        city.trees.len(),
        city.smog.len()
    );
}

/// Mirror the engine's waste objects: spawn new ids, despawn collected
/// ones, and follow bobbing and spin.
pub fn sync_waste(
    mut commands: Commands,
    game: Res<Game>,
    assets: Option<Res<WasteAssets>>,
    mut existing: Query<(Entity, &WasteEntity, &mut Transform)>,
) {
    let Some(assets) = assets else {
        return;
    };
    let views: HashMap<u64, _> = game.0.waste_views().into_iter().map(|v| (v.id, v)).collect();

    let mut seen = Vec::with_capacity(views.len());
    for (entity, waste, mut tf) in existing.iter_mut() {
        match views.get(&waste.id) {
            Some(v) => {
                tf.translation = Vec3::new(v.x, v.height, v.z);
                tf.rotation = Quat::from_rotation_y(v.spin);
                seen.push(waste.id);
            }
            None => commands.entity(entity).despawn_recursive(),
        }
    }

    for (id, v) in &views {
        if seen.contains(id) {
            continue;
        }
        let (Some(body), Some(glow)) = (assets.body.get(&v.category), assets.glow.get(&v.category))
        else {
            continue;
        };
        commands
            .spawn((
                Mesh3d(assets.sphere.clone()),
                MeshMaterial3d(body.clone()),
                Transform::from_xyz(v.x, v.height, v.z).with_scale(Vec3::splat(v.radius)),
                WasteEntity { id: *id },
            ))
            .with_children(|parent| {
                // flat glow ring around the sphere at unit scale
                parent.spawn((
                    Mesh3d(assets.ring.clone()),
                    MeshMaterial3d(glow.clone()),
                    Transform::from_scale(Vec3::splat(1.0 / v.radius.max(0.01))),
                ));
            });
    }
}

/// Recolor sky, fog and smog from the latest atmosphere.
pub fn apply_atmosphere(
    mut feed: ResMut<UiFeed>,
    mut clear: ResMut<ClearColor>,
    smog: Option<Res<SmogMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut fog_q: Query<&mut DistanceFog, With<PlayerCamera>>,
) {
    let Some(atmosphere) = feed.atmosphere.take() else {
        return;
    };
    let [r, g, b] = atmosphere.sky_rgb_f32();
    let sky = Color::srgb(r, g, b);
    clear.0 = sky;

    for mut fog in fog_q.iter_mut() {
        fog.color = sky;
        fog.falloff = FogFalloff::Exponential {
            density: atmosphere.fog_density,
        };
    }

    if let Some(smog) = smog {
        if let Some(mat) = materials.get_mut(&smog.0) {
            mat.base_color = hex(atmosphere.smog_tint).with_alpha(atmosphere.smog_opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_splits_channels() {
        let c = hex(0x1e90ff).to_srgba();
        assert!((c.red - 30.0 / 255.0).abs() < 1e-4);
        assert!((c.green - 144.0 / 255.0).abs() < 1e-4);
        assert!((c.blue - 1.0).abs() < 1e-4);
    }
}
