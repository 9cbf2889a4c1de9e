//! Player input handling for the Eco Havoc client.
//!
//! WASD/arrow movement, mouse-look while the cursor is captured, and the
//! action hotkeys. Every action goes through an engine operation; the
//! results come back through the [`UiFeed`] presenter.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use ecohavoc_logic::events::Panel;
use ecohavoc_logic::movement::MoveIntent;

use crate::minimap::MinimapState;
use crate::state::{Game, UiFeed, ViewState};

fn set_cursor_captured(window: &mut Window, captured: bool) {
    if captured {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    } else {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Click on the world to capture the cursor. Panels keep it free for buttons.
pub fn cursor_capture(
    mouse: Res<ButtonInput<MouseButton>>,
    mut view: ResMut<ViewState>,
    mut window_q: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = window_q.get_single_mut() else {
        return;
    };
    let want = if view.panel_open {
        false
    } else if mouse.just_pressed(MouseButton::Left) {
        true
    } else {
        view.look_captured
    };
    if want != view.look_captured {
        set_cursor_captured(&mut window, want);
        view.look_captured = want;
    }
}

pub fn mouse_look(
    view: Res<ViewState>,
    mut motion: EventReader<MouseMotion>,
    mut game: ResMut<Game>,
) {
    if !view.look_captured {
        motion.clear();
        return;
    }
    for ev in motion.read() {
        game.0.look(ev.delta.x, ev.delta.y);
    }
}

/// Action keys: E collect, R sorting, C/K/F/B panels, Esc close, M minimap.
pub fn hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut game: ResMut<Game>,
    mut feed: ResMut<UiFeed>,
    mut view: ResMut<ViewState>,
    mut minimap: ResMut<MinimapState>,
) {
    if keyboard.just_pressed(KeyCode::KeyE) {
        // the rejection has already been shown as a notice
        let _ = game.0.collect_nearby_waste(&mut *feed);
    }

    let panel = if keyboard.just_pressed(KeyCode::KeyR) {
        Some(Panel::Sorting)
    } else if keyboard.just_pressed(KeyCode::KeyC) {
        Some(Panel::City)
    } else if keyboard.just_pressed(KeyCode::KeyK) {
        Some(Panel::Skills)
    } else if keyboard.just_pressed(KeyCode::KeyF) {
        Some(Panel::EcoFacts)
    } else if keyboard.just_pressed(KeyCode::KeyB) {
        Some(Panel::Economy)
    } else {
        None
    };
    if let Some(panel) = panel {
        game.0.open_panel(panel, &mut *feed);
        view.panel_open = true;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        game.0.close_panels(&mut *feed);
        view.panel_open = false;
    }

    if keyboard.just_pressed(KeyCode::KeyM) {
        minimap.visible = !minimap.visible;
        minimap.dirty = true;
    }
}

fn move_intent(keyboard: &ButtonInput<KeyCode>) -> MoveIntent {
    MoveIntent {
        forward: keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]),
        back: keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]),
        left: keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
        right: keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
    }
}

/// One engine frame: movement, animation, timers, respawns.
pub fn advance_game(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut game: ResMut<Game>,
    mut feed: ResMut<UiFeed>,
) {
    let intent = move_intent(&keyboard);
    game.0.update(time.delta_secs(), intent, &mut *feed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_both_move() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowUp);
        keyboard.press(KeyCode::KeyD);
        let intent = move_intent(&keyboard);
        assert!(intent.forward && intent.right);
        assert!(!intent.back && !intent.left);
    }

    #[test]
    fn no_keys_is_idle() {
        let keyboard = ButtonInput::<KeyCode>::default();
        assert!(move_intent(&keyboard).is_idle());
    }
}
