//! Outbound surface to the presentation layer.
//!
//! The engine never draws anything. After every input or frame it calls
//! the [`Presenter`] methods below with plain snapshot data; the Bevy
//! client and the headless simtest recorder are the two implementations.

use ecohavoc_logic::atmosphere::{Atmosphere, DistrictStatus, PollutionStatus};
use ecohavoc_logic::catalog::{self, EcoFact, WasteCategory, WasteKey};
use ecohavoc_logic::economy::{EconomyAsset, MarketPrices};
use ecohavoc_logic::events::Panel;
use ecohavoc_logic::skills::SkillId;
use serde::Serialize;

/// World span covered by the minimap, centred on the origin.
pub const MINIMAP_WORLD_SPAN: f32 = 200.0;

pub trait Presenter {
    fn notify(&mut self, message: &str);
    /// `screen_x`/`screen_y` are normalized to `[0, 1]`.
    fn show_floating_gain(&mut self, screen_x: f32, screen_y: f32, text: &str);
    fn show_chapter_banner(&mut self, title: &str, body: &str);
    fn refresh_hud(&mut self, hud: &HudSnapshot);
    fn rebuild_panel(&mut self, panel: Panel, data: &PanelData);
    /// All panels closed.
    fn close_panels(&mut self);
    fn flash_damage(&mut self);
    fn render_minimap(&mut self, frame: &MinimapFrame);
    fn apply_atmosphere(&mut self, atmosphere: &Atmosphere);
}

/// A presenter that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn notify(&mut self, _message: &str) {}
    fn show_floating_gain(&mut self, _screen_x: f32, _screen_y: f32, _text: &str) {}
    fn show_chapter_banner(&mut self, _title: &str, _body: &str) {}
    fn refresh_hud(&mut self, _hud: &HudSnapshot) {}
    fn rebuild_panel(&mut self, _panel: Panel, _data: &PanelData) {}
    fn close_panels(&mut self) {}
    fn flash_damage(&mut self) {}
    fn render_minimap(&mut self, _frame: &MinimapFrame) {}
    fn apply_atmosphere(&mut self, _atmosphere: &Atmosphere) {}
}

/// One recorded presenter call.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Notify(String),
    FloatingGain(String),
    ChapterBanner { title: String, body: String },
    Hud(HudSnapshot),
    Panel(Panel, PanelData),
    ClosePanels,
    DamageFlash,
    Minimap(MinimapFrame),
    Atmosphere(Atmosphere),
}

/// Presenter that records every call, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    pub fn notices(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            PresenterCall::Notify(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn last_hud(&self) -> Option<&HudSnapshot> {
        self.calls.iter().rev().find_map(|c| match c {
            PresenterCall::Hud(hud) => Some(hud),
            _ => None,
        })
    }

    pub fn last_panel(&self) -> Option<(Panel, &PanelData)> {
        self.calls.iter().rev().find_map(|c| match c {
            PresenterCall::Panel(panel, data) => Some((*panel, data)),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&PresenterCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn notify(&mut self, message: &str) {
        self.calls.push(PresenterCall::Notify(message.to_string()));
    }
    fn show_floating_gain(&mut self, _screen_x: f32, _screen_y: f32, text: &str) {
        self.calls.push(PresenterCall::FloatingGain(text.to_string()));
    }
    fn show_chapter_banner(&mut self, title: &str, body: &str) {
        self.calls.push(PresenterCall::ChapterBanner {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
    fn refresh_hud(&mut self, hud: &HudSnapshot) {
        self.calls.push(PresenterCall::Hud(hud.clone()));
    }
    fn rebuild_panel(&mut self, panel: Panel, data: &PanelData) {
        self.calls.push(PresenterCall::Panel(panel, data.clone()));
    }
    fn close_panels(&mut self) {
        self.calls.push(PresenterCall::ClosePanels);
    }
    fn flash_damage(&mut self) {
        self.calls.push(PresenterCall::DamageFlash);
    }
    fn render_minimap(&mut self, frame: &MinimapFrame) {
        self.calls.push(PresenterCall::Minimap(frame.clone()));
    }
    fn apply_atmosphere(&mut self, atmosphere: &Atmosphere) {
        self.calls.push(PresenterCall::Atmosphere(*atmosphere));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub credits: u64,
    pub level: u32,
    pub score: u64,
    pub xp: u64,
    pub xp_next: u64,
    pub skill_points: u32,
    pub waste_collected: u64,
    /// Rounded for display.
    pub pollution: u8,
    pub pollution_status: PollutionStatus,
    pub chapter: u32,
    pub chapter_title: &'static str,
    pub district_name: &'static str,
    pub district_icon: &'static str,
    pub district_population: &'static str,
    pub district_tonnage: &'static str,
    pub waste_remaining: usize,
    /// Per-category counts near the player; only with the auto-detect skill.
    pub nearby: Option<Vec<(WasteCategory, u32)>>,
}

impl HudSnapshot {
    pub fn xp_fraction(&self) -> f32 {
        self.xp as f32 / self.xp_next.max(1) as f32
    }

    pub fn pollution_fraction(&self) -> f32 {
        self.pollution as f32 / 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    Sorting(SortingPanel),
    City(Vec<DistrictCard>),
    Skills(SkillsPanel),
    EcoFacts(&'static [EcoFact]),
    Economy(EconomyPanel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortOption {
    pub key: WasteKey,
    pub glyph: &'static str,
    pub name: &'static str,
    pub selected: bool,
    /// Highlighted as the round's target (auto-detect skill).
    pub hinted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortingPanel {
    pub options: Vec<SortOption>,
    pub bins: [WasteCategory; 5],
    pub feedback: Option<String>,
    pub fact: Option<&'static str>,
    pub sort_score: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistrictCard {
    pub index: usize,
    pub name: &'static str,
    pub icon: &'static str,
    pub base_pollution: u8,
    pub clean: u8,
    pub color: u32,
    pub status: DistrictStatus,
    pub current: bool,
}

impl DistrictCard {
    pub fn unlocked(&self) -> bool {
        self.status != DistrictStatus::Locked
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCard {
    pub id: SkillId,
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u32,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillsPanel {
    pub skill_points: u32,
    pub cards: Vec<SkillCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetCard {
    pub asset: EconomyAsset,
    pub owned: u32,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomyPanel {
    pub credits: u64,
    pub assets: Vec<AssetCard>,
    pub market: MarketPrices,
}

/// Point on the minimap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub x: f32,
    pub z: f32,
}

/// Everything the minimap draws, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapFrame {
    pub player: MapPoint,
    pub yaw: f32,
    pub buildings: Vec<MapPoint>,
    pub waste: Vec<MapPoint>,
}

impl MinimapFrame {
    /// Project a world point onto a `size`-pixel square map. Returns `None`
    /// for points outside the map.
    pub fn project(point: MapPoint, size: f32) -> Option<(f32, f32)> {
        let mx = point.x / MINIMAP_WORLD_SPAN * size + size / 2.0;
        let my = point.z / MINIMAP_WORLD_SPAN * size + size / 2.0;
        (mx > 0.0 && mx < size && my > 0.0 && my < size).then_some((mx, my))
    }
}

pub(crate) fn eco_facts_panel() -> PanelData {
    PanelData::EcoFacts(catalog::eco_facts())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimap_projection_centres_origin() {
        let p = MinimapFrame::project(MapPoint { x: 0.0, z: 0.0 }, 150.0);
        assert_eq!(p, Some((75.0, 75.0)));
        let edge = MinimapFrame::project(MapPoint { x: 90.0, z: -90.0 }, 150.0).unwrap();
        assert!((edge.0 - 142.5).abs() < 1e-4);
        assert!((edge.1 - 7.5).abs() < 1e-4);
        assert_eq!(MinimapFrame::project(MapPoint { x: 100.0, z: 0.0 }, 150.0), None);
    }
}
