//! Minimap overlay for the Eco Havoc client.
//!
//! Renders the latest engine minimap frame in the bottom-right corner:
//! building dots, waste dots and the player with a heading marker.
//! Toggled with M key.

use bevy::prelude::*;
use ecohavoc_core::presenter::MinimapFrame;

use crate::state::UiFeed;

/// Marker for the minimap root container.
#[derive(Component)]
pub struct MinimapRoot;

/// Minimap configuration and state.
#[derive(Resource)]
pub struct MinimapState {
    pub visible: bool,
    /// Size of the square map in pixels.
    pub size: f32,
    /// Margin from screen edge.
    pub margin: f32,
    /// Redraw even without a new frame (visibility toggled).
    pub dirty: bool,
    last: Option<MinimapFrame>,
}

impl Default for MinimapState {
    fn default() -> Self {
        Self {
            visible: true,
            size: 150.0,
            margin: 12.0,
            dirty: false,
            last: None,
        }
    }
}

fn dot(parent: &mut ChildBuilder, (x, y): (f32, f32), size: f32, color: Color) {
    parent.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(x - size / 2.0),
            top: Val::Px(y - size / 2.0),
            width: Val::Px(size),
            height: Val::Px(size),
            ..default()
        },
        BackgroundColor(color),
    ));
}

/// Rebuild the overlay when a new frame arrives or visibility changes.
pub fn render_minimap(
    mut commands: Commands,
    mut feed: ResMut<UiFeed>,
    mut minimap: ResMut<MinimapState>,
    existing_roots: Query<Entity, With<MinimapRoot>>,
) {
    if let Some(frame) = feed.minimap.take() {
        minimap.last = Some(frame);
        minimap.dirty = true;
    }
    if !minimap.dirty {
        return;
    }
    minimap.dirty = false;

    for entity in existing_roots.iter() {
        commands.entity(entity).despawn_recursive();
    }
    if !minimap.visible {
        return;
    }
    let Some(frame) = minimap.last.as_ref() else {
        return;
    };
    let size = minimap.size;

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(minimap.margin),
                bottom: Val::Px(minimap.margin),
                width: Val::Px(size),
                height: Val::Px(size),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(Color::srgb_u8(0x05, 0x0f, 0x05)),
            BorderColor(Color::srgba(0.0, 1.0, 0.4, 0.4)),
            ZIndex(10),
            MinimapRoot,
        ))
        .with_children(|map| {
            for b in &frame.buildings {
                if let Some(p) = MinimapFrame::project(*b, size) {
                    dot(map, p, 4.0, Color::srgba(0.0, 0.4, 0.16, 0.4));
                }
            }
            for w in &frame.waste {
                if let Some(p) = MinimapFrame::project(*w, size) {
                    dot(map, p, 4.0, Color::srgb_u8(0xff, 0xaa, 0x00));
                }
            }

            let green = Color::srgb_u8(0x00, 0xff, 0x64);
            if let Some(p) = MinimapFrame::project(frame.player, size) {
                dot(map, p, 8.0, green);
                // heading: a short line of dots in the look direction
                let (dx, dy) = heading(frame.yaw);
                for i in 1..=3 {
                    let t = i as f32 * 3.0;
                    dot(map, (p.0 + dx * t, p.1 + dy * t), 3.5 - i as f32 * 0.5, green);
                }
            }
        });
}

/// Screen-space direction of the player's look on the map (+y is down, i.e. +Z).
fn heading(yaw: f32) -> (f32, f32) {
    (-yaw.sin(), -yaw.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_points_up_at_zero_yaw() {
        let (dx, dy) = heading(0.0);
        assert!(dx.abs() < 1e-6);
        assert!((dy + 1.0).abs() < 1e-6);
    }

    #[test]
    fn heading_turns_left_with_positive_yaw() {
        let (dx, _) = heading(std::f32::consts::FRAC_PI_2);
        assert!((dx + 1.0).abs() < 1e-6);
    }
}
