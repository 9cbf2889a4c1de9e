//! Eco Havoc Client - first-person Bevy front end
//!
//! Walk a polluted neon city, pick up waste, sort it at the station and
//! grow the green economy. All game rules run in `ecohavoc-core`; this
//! binary renders the world, forwards input, and implements the presenter.
//!
//! Usage:
//!   cargo run -p ecohavoc-client -- [--seed N] [--config tuning.json]

mod camera;
mod input;
mod minimap;
mod rendering;
mod state;
mod ui;

use bevy::prelude::*;
use ecohavoc_core::prelude::*;

use minimap::MinimapState;
use state::{ClientConfig, Game, UiFeed, ViewState};

fn main() {
    let config = ClientConfig::from_args();
    let engine = GameEngine::new(config.game, config.seed);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Eco Havoc: Green Reborn".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Game(engine))
        .insert_resource(UiFeed::default())
        .insert_resource(ViewState::default())
        .insert_resource(MinimapState::default())
        .add_systems(
            Startup,
            (
                camera::setup_camera,
                rendering::spawn_city,
                ui::setup_ui,
                start_game,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                input::cursor_capture,
                input::mouse_look,
                input::hotkeys,
                ui::panel_buttons,
                input::advance_game,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                camera::camera_follow_player,
                rendering::sync_waste,
                rendering::apply_atmosphere,
                ui::render_hud,
                ui::render_toasts,
                ui::spawn_banner,
                ui::spawn_popups,
                ui::tick_overlays,
                ui::render_panel,
                minimap::render_minimap,
            )
                .after(input::advance_game),
        )
        .run();
}

/// Opening sequence: welcome toast, chapter 1 banner, first HUD.
fn start_game(mut game: ResMut<Game>, mut feed: ResMut<UiFeed>) {
    game.0.start(&mut *feed);
    info!(
        "game started in {} with {} waste",
        game.0.hud_snapshot().district_name,
        game.0.waste_remaining()
    );
}
