//! State management for the Eco Havoc client.
//!
//! Contains resource types and Bevy components used throughout the client.

use bevy::prelude::*;
use ecohavoc_core::prelude::*;
use ecohavoc_logic::atmosphere::Atmosphere;
use ecohavoc_logic::catalog::{WasteCategory, WasteKey};
use ecohavoc_logic::economy::EconomyAsset;
use ecohavoc_logic::events::Panel;
use ecohavoc_logic::skills::SkillId;

// ============================================================================
// RESOURCES
// ============================================================================

/// Startup options.
pub struct ClientConfig {
    pub seed: u64,
    pub game: GameConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            game: GameConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" if i + 1 < args.len() => {
                    match args[i + 1].parse() {
                        Ok(seed) => config.seed = seed,
                        Err(e) => warn!("ignoring --seed '{}': {}", args[i + 1], e),
                    }
                    i += 2;
                }
                "--config" | "-c" if i + 1 < args.len() => {
                    match GameConfig::from_json_file(&args[i + 1]) {
                        Ok(game) => config.game = game,
                        Err(e) => warn!("ignoring --config '{}': {}", args[i + 1], e),
                    }
                    i += 2;
                }
                _ => i += 1,
            }
        }
        config
    }
}

/// The running game.
#[derive(Resource)]
pub struct Game(pub GameEngine);

/// Presenter output waiting to be drawn. The engine writes into it during
/// input handling and the frame tick; the UI systems drain it.
#[derive(Resource, Default)]
pub struct UiFeed {
    /// Newest notification; replaces whatever is showing.
    pub toast: Option<String>,
    pub banner: Option<(String, String)>,
    /// Normalized screen position and text.
    pub popups: Vec<(f32, f32, String)>,
    pub flash: bool,
    pub hud: Option<HudSnapshot>,
    pub panel: Option<PanelUpdate>,
    pub minimap: Option<MinimapFrame>,
    pub atmosphere: Option<Atmosphere>,
}

pub enum PanelUpdate {
    Show(Panel, PanelData),
    Hide,
}

impl Presenter for UiFeed {
    fn notify(&mut self, message: &str) {
        self.toast = Some(message.to_string());
    }

    fn show_floating_gain(&mut self, screen_x: f32, screen_y: f32, text: &str) {
        self.popups.push((screen_x, screen_y, text.to_string()));
    }

    fn show_chapter_banner(&mut self, title: &str, body: &str) {
        self.banner = Some((title.to_string(), body.to_string()));
    }

    fn refresh_hud(&mut self, hud: &HudSnapshot) {
        self.hud = Some(hud.clone());
    }

    fn rebuild_panel(&mut self, panel: Panel, data: &PanelData) {
        self.panel = Some(PanelUpdate::Show(panel, data.clone()));
    }

    fn close_panels(&mut self) {
        self.panel = Some(PanelUpdate::Hide);
    }

    fn flash_damage(&mut self) {
        self.flash = true;
    }

    fn render_minimap(&mut self, frame: &MinimapFrame) {
        self.minimap = Some(frame.clone());
    }

    fn apply_atmosphere(&mut self, atmosphere: &Atmosphere) {
        self.atmosphere = Some(*atmosphere);
    }
}

#[derive(Resource, Default)]
pub struct ViewState {
    /// Mouse-look is active (cursor grabbed).
    pub look_captured: bool,
    /// A panel is on screen; clicks go to its buttons.
    pub panel_open: bool,
}

// ============================================================================
// BEVY COMPONENTS
// ============================================================================

#[derive(Component)]
pub struct PlayerCamera;

/// Rendered waste object, keyed by the engine's stable id.
#[derive(Component)]
pub struct WasteEntity {
    pub id: u64,
}

#[derive(Component)]
pub struct SmogParticle;

#[derive(Component)]
pub struct HudText;

#[derive(Component)]
pub struct ScannerText;

#[derive(Component)]
pub struct XpBarFill;

#[derive(Component)]
pub struct PollutionBarFill;

#[derive(Component)]
pub struct ToastText {
    pub remaining: f32,
}

#[derive(Component)]
pub struct BannerRoot;

#[derive(Component)]
pub struct FloatingPopup {
    pub remaining: f32,
}

#[derive(Component)]
pub struct DamageFlash {
    pub remaining: f32,
}

/// Despawn the entity (and its children) when this runs out.
#[derive(Component)]
pub struct Lifetime(pub f32);

#[derive(Component)]
pub struct PanelRoot;

/// What a panel button does when pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    SelectWaste(WasteKey),
    Bin(WasteCategory),
    NewRound,
    District(usize),
    UnlockSkill(SkillId),
    Build(EconomyAsset),
    Close,
}
