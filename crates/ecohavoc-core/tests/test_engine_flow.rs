//! Integration tests for the engine driven through the presenter surface.
//!
//! Exercises: start → sorting via panel → collection → depletion/respawn
//! → district switching, observing only what the presenter receives.

use ecohavoc_core::prelude::*;
use ecohavoc_logic::catalog::{self, WasteCategory};
use ecohavoc_logic::economy::EconomyAsset;
use ecohavoc_logic::error::Rejection;
use ecohavoc_logic::events::Panel;
use ecohavoc_logic::skills::SkillId;

// ── Helpers ────────────────────────────────────────────────────────────

fn started(seed: u64) -> (GameEngine, RecordingPresenter) {
    let mut engine = GameEngine::new(GameConfig::default(), seed);
    let mut rec = RecordingPresenter::default();
    engine.start(&mut rec);
    (engine, rec)
}

fn collect_everything(engine: &mut GameEngine, rec: &mut RecordingPresenter) -> usize {
    let mut n = 0;
    while let Some(v) = engine.waste_views().first().copied() {
        engine.set_player_position(v.x, v.z);
        engine.collect_nearby_waste(rec).unwrap();
        n += 1;
    }
    n
}

fn idle(engine: &mut GameEngine, rec: &mut RecordingPresenter, seconds: f32) {
    let steps = (seconds / 0.125).round() as usize;
    for _ in 0..steps {
        engine.update(0.125, MoveIntent::default(), rec);
    }
}

// ── Opening ────────────────────────────────────────────────────────────

#[test]
fn start_shows_welcome_and_chapter_one() {
    let (_, rec) = started(1);
    assert!(rec.notices().any(|n| n.contains("Welcome")));
    let banner = rec.calls.iter().find_map(|c| match c {
        PresenterCall::ChapterBanner { title, .. } => Some(title.clone()),
        _ => None,
    });
    assert!(banner.unwrap().contains(catalog::chapter(1).title));
    assert!(rec.last_hud().is_some());
    assert_eq!(rec.count(|c| matches!(c, PresenterCall::Atmosphere(_))), 1);
    assert_eq!(rec.count(|c| matches!(c, PresenterCall::Minimap(_))), 1);
}

// ── Sorting ────────────────────────────────────────────────────────────

#[test]
fn sorting_through_panel() {
    let (mut engine, mut rec) = started(2);
    engine.open_panel(Panel::Sorting, &mut rec);
    let Some((Panel::Sorting, PanelData::Sorting(panel))) = rec.last_panel() else {
        panic!("sorting panel not rebuilt");
    };
    assert_eq!(panel.options.len(), 4);
    assert!(panel.options.iter().all(|o| !o.hinted));

    let key = panel.options[2].key;
    let category = catalog::waste(key).category;

    // bin before select is refused
    let before = engine.state().clone();
    assert_eq!(
        engine.resolve_bin_choice(category, &mut rec).unwrap_err(),
        Rejection::NothingSelected
    );
    assert_eq!(engine.state(), &before);
    assert_eq!(rec.notices().last(), Some("Pick a waste item first!"));

    engine.select_sorting_candidate(key, &mut rec).unwrap();
    let outcome = engine.resolve_bin_choice(category, &mut rec).unwrap();
    assert!(outcome.correct);

    let Some((_, PanelData::Sorting(panel))) = rec.last_panel() else {
        panic!("sorting panel not rebuilt");
    };
    assert_eq!(panel.fact, Some(catalog::waste(key).fact));
    assert!(panel.feedback.as_deref().unwrap().contains("CORRECT"));
    assert_eq!(panel.sort_score, 10);
}

#[test]
fn wrong_sort_flashes() {
    let (mut engine, mut rec) = started(3);
    engine.open_panel(Panel::Sorting, &mut rec);
    let key = engine.sorting().options()[0];
    let right = catalog::waste(key).category;
    let wrong = WasteCategory::ALL.into_iter().find(|c| *c != right).unwrap();
    engine.select_sorting_candidate(key, &mut rec).unwrap();
    rec.clear();
    let outcome = engine.resolve_bin_choice(wrong, &mut rec).unwrap();
    assert!(!outcome.correct);
    assert_eq!(rec.count(|c| *c == PresenterCall::DamageFlash), 1);
    assert_eq!(rec.count(|c| matches!(c, PresenterCall::Atmosphere(_))), 1);
}

#[test]
fn scientist_hint_marks_target() {
    let (mut engine, mut rec) = started(4);
    engine.unlock_skill(SkillId::Scientist, &mut rec).unwrap();
    engine.open_panel(Panel::Sorting, &mut rec);
    let Some((_, PanelData::Sorting(panel))) = rec.last_panel() else {
        panic!("sorting panel not rebuilt");
    };
    let hinted: Vec<_> = panel.options.iter().filter(|o| o.hinted).collect();
    assert_eq!(hinted.len(), 1);
    assert_eq!(hinted[0].key, engine.sorting().target());
}

// ── World ──────────────────────────────────────────────────────────────

#[test]
fn depletion_then_fresh_batch() {
    let (mut engine, mut rec) = started(5);
    let n = collect_everything(&mut engine, &mut rec);
    assert_eq!(n, 17);
    assert_eq!(engine.state().district_clean()[0], 20);
    assert!(rec.notices().any(|t| t.contains("District clean")));
    assert!(rec.count(|c| matches!(c, PresenterCall::FloatingGain(_))) == 17);

    idle(&mut engine, &mut rec, 2.0);
    assert_eq!(engine.waste_remaining(), 17);
    assert_eq!(rec.last_hud().unwrap().waste_remaining, 17);
}

#[test]
fn zero_respawn_delay_repopulates_next_frame() {
    let config = GameConfig {
        respawn_delay: 0.0,
        ..GameConfig::default()
    };
    let mut engine = GameEngine::new(config, 5);
    let mut rec = RecordingPresenter::default();
    engine.start(&mut rec);
    collect_everything(&mut engine, &mut rec);
    assert_eq!(engine.waste_remaining(), 0);
    assert!(engine.pending_respawn().is_some());

    engine.update(0.1, MoveIntent::default(), &mut rec);
    assert_eq!(engine.waste_remaining(), 17);
    assert!(engine.pending_respawn().is_none());
}

#[test]
fn clean_caps_at_one_hundred() {
    let (mut engine, mut rec) = started(6);
    for _ in 0..6 {
        collect_everything(&mut engine, &mut rec);
        idle(&mut engine, &mut rec, 2.0);
    }
    assert_eq!(engine.state().district_clean()[0], 100);
}

#[test]
fn switch_during_respawn_delay() {
    let (mut engine, mut rec) = started(7);
    collect_everything(&mut engine, &mut rec);
    engine.set_current_district(2, &mut rec).unwrap();
    let beach = engine.waste_remaining();
    assert_eq!(beach, 15);
    idle(&mut engine, &mut rec, 3.0);
    assert_eq!(engine.state().current_district(), 2);
    assert_eq!(engine.waste_remaining(), beach);
    assert!(engine.pending_respawn().is_none());
}

#[test]
fn city_panel_closes_on_switch() {
    let (mut engine, mut rec) = started(8);
    engine.open_panel(Panel::City, &mut rec);
    let Some((_, PanelData::City(cards))) = rec.last_panel() else {
        panic!("city panel not rebuilt");
    };
    assert_eq!(cards.len(), 6);
    assert!(!cards[4].unlocked());
    assert!(cards[0].current);

    assert_eq!(
        engine.set_current_district(4, &mut rec),
        Err(Rejection::DistrictLocked)
    );
    assert_eq!(engine.current_panel(), Some(Panel::City));

    engine.set_current_district(1, &mut rec).unwrap();
    assert_eq!(engine.current_panel(), None);
    assert!(rec.calls.contains(&PresenterCall::ClosePanels));
    assert_eq!(rec.last_hud().unwrap().district_name, catalog::districts()[1].name);
}

#[test]
fn economy_panel_tracks_builds_and_ticker() {
    let (mut engine, mut rec) = started(9);
    engine.open_panel(Panel::Economy, &mut rec);
    engine
        .build_economy_asset(EconomyAsset::Park, &mut rec)
        .unwrap();
    let Some((_, PanelData::Economy(panel))) = rec.last_panel() else {
        panic!("economy panel not rebuilt");
    };
    assert_eq!(panel.credits, 300);
    assert_eq!(panel.assets[2].owned, 1);
    assert!(!panel.assets[1].affordable);

    rec.clear();
    idle(&mut engine, &mut rec, 4.0);
    assert!(rec
        .calls
        .iter()
        .any(|c| matches!(c, PresenterCall::Panel(Panel::Economy, _))));
    assert_ne!(engine.market(), &ecohavoc_logic::economy::MarketPrices::default());
}

#[test]
fn minimap_refreshes_six_times_a_second() {
    let (mut engine, mut rec) = started(10);
    rec.clear();
    for _ in 0..60 {
        engine.update(1.0 / 60.0, MoveIntent::default(), &mut rec);
    }
    let frames = rec.count(|c| matches!(c, PresenterCall::Minimap(_)));
    assert!((5..=7).contains(&frames), "got {frames}");
}
