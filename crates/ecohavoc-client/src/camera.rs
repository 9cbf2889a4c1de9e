//! Camera setup and control for the Eco Havoc client.
//!
//! First-person camera at eye height, driven by the engine's player pose.

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use ecohavoc_logic::atmosphere::Atmosphere;

use crate::state::{Game, PlayerCamera};

pub fn setup_camera(mut commands: Commands, game: Res<Game>) {
    let atmosphere = Atmosphere::from_pollution(game.0.state().pollution());
    let [r, g, b] = atmosphere.sky_rgb_f32();
    let eye = game.0.config().eye_height;

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 500.0,
            ..default()
        }),
        Transform::from_xyz(0.0, eye, 0.0),
        DistanceFog {
            color: Color::srgb(r, g, b),
            falloff: FogFalloff::Exponential {
                density: atmosphere.fog_density,
            },
            ..default()
        },
        PlayerCamera,
    ));
    commands.insert_resource(ClearColor(Color::srgb(r, g, b)));

    // Dim green ambient
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.0, 0.55, 0.15),
        brightness: 120.0,
    });

    commands.spawn((
        DirectionalLight {
            color: Color::srgb_u8(0x88, 0xff, 0xcc),
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(50.0, 80.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Place the camera at the player's pose.
pub fn camera_follow_player(game: Res<Game>, mut camera_q: Query<&mut Transform, With<PlayerCamera>>) {
    let Ok(mut cam_tf) = camera_q.get_single_mut() else {
        return;
    };
    let pose = game.0.player();
    cam_tf.translation = Vec3::new(pose.x, game.0.config().eye_height, pose.z);
    cam_tf.rotation = Quat::from_euler(EulerRot::YXZ, pose.yaw, pose.pitch, 0.0);
}
