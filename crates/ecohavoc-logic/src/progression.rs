//! Progression state: credits, XP, levels, chapters, pollution.
//!
//! [`ProgressionState`] is the single mutable record every other component
//! reads. Its fields are private: all mutation goes through the operations
//! below so the invariants hold everywhere.
//!
//! # Invariants
//!
//! * `pollution` and every `district_clean` entry stay in `[0, 100]`.
//! * `score` and `credits` never go negative (unsigned, saturating).
//! * After any XP award, `xp < xp_next`; a single award may resolve
//!   several level-ups.
//! * `chapter == min(6, level / 3 + 1)` and never decreases.
//! * A refused operation returns [`Rejection`] and changes nothing.
//!
//! ```
//! use ecohavoc_logic::config::GameConfig;
//! use ecohavoc_logic::progression::ProgressionState;
//!
//! let mut gs = ProgressionState::new(&GameConfig::default());
//! let mut events = Vec::new();
//! gs.award_xp(400, &mut events);
//! assert_eq!((gs.level(), gs.xp(), gs.xp_next()), (3, 150, 225));
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{self, DISTRICT_COUNT};
use crate::config::GameConfig;
use crate::economy::{self, EconomyAsset, EconomyBuildings};
use crate::error::Rejection;
use crate::events::{GameEvent, Panel};
use crate::skills::{self, SkillId, SkillSet};

pub const MAX_CHAPTER: u32 = 6;
pub const MAX_POLLUTION: f32 = 100.0;

/// Credits and pollution relief a correct sort is worth.
const SORT_SCORE: u64 = 10;
const SORT_POLLUTION_RELIEF: f32 = 2.0;
const WRONG_SORT_PENALTY: u64 = 5;
const WRONG_SORT_POLLUTION: f32 = 1.0;
const COLLECT_SCORE: u64 = 5;
const COLLECT_POLLUTION_RELIEF: f32 = 1.0;

/// Chapter reached at a given level.
pub fn chapter_for_level(level: u32) -> u32 {
    (level / 3 + 1).min(MAX_CHAPTER)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct XpTuning {
    growth: f64,
    correct_sort: u64,
    world_collect: u64,
    asset_built: u64,
}

impl From<&GameConfig> for XpTuning {
    fn from(c: &GameConfig) -> Self {
        Self {
            growth: c.xp_growth,
            correct_sort: c.xp_correct_sort,
            world_collect: c.xp_world_collect,
            asset_built: c.xp_asset_built,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    credits: u64,
    level: u32,
    xp: u64,
    xp_next: u64,
    score: u64,
    waste_collected: u64,
    pollution: f32,
    sort_score: u64,
    skill_points: u32,
    chapter: u32,
    current_district: usize,
    skills: SkillSet,
    district_clean: [u8; DISTRICT_COUNT],
    district_unlocked: [bool; DISTRICT_COUNT],
    economy: EconomyBuildings,
    tuning: XpTuning,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl ProgressionState {
    pub fn new(config: &GameConfig) -> Self {
        let mut district_unlocked = [false; DISTRICT_COUNT];
        for (slot, info) in district_unlocked.iter_mut().zip(catalog::districts()) {
            *slot = !info.initially_locked();
        }
        let level = config.start_level.max(1);
        let start_district = if district_unlocked
            .get(config.start_district)
            .copied()
            .unwrap_or(false)
        {
            config.start_district
        } else {
            0
        };
        Self {
            credits: config.start_credits,
            level,
            xp: 0,
            xp_next: config.start_xp_next.max(1),
            score: 0,
            waste_collected: 0,
            pollution: config.start_pollution.clamp(0.0, MAX_POLLUTION),
            sort_score: 0,
            skill_points: config.start_skill_points,
            chapter: chapter_for_level(level),
            current_district: start_district,
            skills: SkillSet::default(),
            district_clean: [0; DISTRICT_COUNT],
            district_unlocked,
            economy: EconomyBuildings::default(),
            tuning: XpTuning::from(config),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn credits(&self) -> u64 {
        self.credits
    }
    pub fn level(&self) -> u32 {
        self.level
    }
    pub fn xp(&self) -> u64 {
        self.xp
    }
    pub fn xp_next(&self) -> u64 {
        self.xp_next
    }
    pub fn score(&self) -> u64 {
        self.score
    }
    pub fn waste_collected(&self) -> u64 {
        self.waste_collected
    }
    pub fn pollution(&self) -> f32 {
        self.pollution
    }
    pub fn sort_score(&self) -> u64 {
        self.sort_score
    }
    pub fn skill_points(&self) -> u32 {
        self.skill_points
    }
    pub fn chapter(&self) -> u32 {
        self.chapter
    }
    pub fn current_district(&self) -> usize {
        self.current_district
    }
    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }
    pub fn district_clean(&self) -> &[u8; DISTRICT_COUNT] {
        &self.district_clean
    }
    pub fn economy(&self) -> &EconomyBuildings {
        &self.economy
    }

    pub fn is_district_unlocked(&self, index: usize) -> bool {
        self.district_unlocked.get(index).copied().unwrap_or(false)
    }

    /// XP bar fill in `[0, 1)`.
    pub fn xp_fraction(&self) -> f32 {
        self.xp as f32 / self.xp_next as f32
    }

    // ── XP & chapters ───────────────────────────────────────────────────

    /// Add XP and resolve every level-up it crosses. Returns levels gained.
    pub fn award_xp(&mut self, amount: u64, events: &mut Vec<GameEvent>) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while self.xp >= self.xp_next {
            self.level = self.level.saturating_add(1);
            self.xp -= self.xp_next;
            self.xp_next = ((self.xp_next as f64 * self.tuning.growth).floor() as u64).max(1);
            self.skill_points = self.skill_points.saturating_add(1);
            gained += 1;
            log::info!(
                "level up: level={} xp={}/{} skill_points={}",
                self.level,
                self.xp,
                self.xp_next,
                self.skill_points
            );
            events.push(GameEvent::LevelUp { level: self.level });
            self.unlock_chapter_if_eligible(events);
        }
        events.push(GameEvent::HudDirty);
        if gained > 0 {
            events.push(GameEvent::PanelDirty(Panel::Skills));
        }
        gained
    }

    /// Advance the chapter to match the level, unlocking gated districts.
    /// Returns true if the chapter changed.
    pub fn unlock_chapter_if_eligible(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let target = chapter_for_level(self.level);
        if target <= self.chapter {
            return false;
        }
        self.chapter = target;
        let ch = catalog::chapter(target);
        log::info!("chapter {} reached: {}", ch.number, ch.title);
        events.push(GameEvent::ChapterReached { chapter: target });
        events.push(GameEvent::StoryBanner {
            title: format!("📖 CHAPTER {}: {}", ch.number, ch.title),
            body: ch.description.to_string(),
        });

        for (index, info) in catalog::districts().iter().enumerate() {
            let Some(required) = info.unlock_chapter else {
                continue;
            };
            if self.chapter >= required && !self.district_unlocked[index] {
                self.district_unlocked[index] = true;
                log::info!("district {} unlocked: {}", index, info.name);
                events.push(GameEvent::DistrictUnlocked { district: index });
            }
        }
        events.push(GameEvent::PanelDirty(Panel::City));
        true
    }

    // ── Scoring actions ─────────────────────────────────────────────────

    /// A waste item went into the right bin. Returns credits earned.
    pub fn record_correct_sort(&mut self, waste_value: u64, events: &mut Vec<GameEvent>) -> u64 {
        let earned = waste_value.saturating_mul(self.skills.sort_credit_percent()) / 100;
        self.credits = self.credits.saturating_add(earned);
        self.waste_collected = self.waste_collected.saturating_add(1);
        self.sort_score = self.sort_score.saturating_add(SORT_SCORE);
        self.score = self.score.saturating_add(SORT_SCORE);
        self.relieve_pollution(self.skills.pollution_relief(SORT_POLLUTION_RELIEF));
        self.award_xp(self.tuning.correct_sort, events);
        earned
    }

    pub fn record_wrong_sort(&mut self, events: &mut Vec<GameEvent>) {
        self.score = self.score.saturating_sub(WRONG_SORT_PENALTY);
        self.pollution = (self.pollution + WRONG_SORT_POLLUTION).min(MAX_POLLUTION);
        events.push(GameEvent::DamageFlash);
        events.push(GameEvent::HudDirty);
    }

    /// A waste object was picked up in the 3D world.
    pub fn record_world_collect(&mut self, waste_value: u64, events: &mut Vec<GameEvent>) {
        self.waste_collected = self.waste_collected.saturating_add(1);
        self.credits = self.credits.saturating_add(waste_value);
        self.score = self.score.saturating_add(COLLECT_SCORE);
        self.relieve_pollution(self.skills.pollution_relief(COLLECT_POLLUTION_RELIEF));
        self.award_xp(self.tuning.world_collect, events);
    }

    fn relieve_pollution(&mut self, amount: f32) {
        self.pollution = (self.pollution - amount).max(0.0);
    }

    // ── Purchases ───────────────────────────────────────────────────────

    pub fn unlock_skill(&mut self, id: SkillId, events: &mut Vec<GameEvent>) -> Result<(), Rejection> {
        let cost = skills::check_unlock(&self.skills, self.skill_points, id)?;
        self.skill_points -= cost;
        self.skills.insert(id);
        let info = catalog::skill(id);
        log::info!("skill unlocked: {} (cost {})", info.name, cost);
        events.push(GameEvent::notice(format!("🎯 Skill \"{}\" activated!", info.name)));
        events.push(GameEvent::PanelDirty(Panel::Skills));
        events.push(GameEvent::HudDirty);
        Ok(())
    }

    pub fn build_economy_asset(
        &mut self,
        asset: EconomyAsset,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), Rejection> {
        let cost = asset.cost();
        if self.credits < cost {
            return Err(Rejection::InsufficientCredits {
                needed: cost,
                available: self.credits,
            });
        }
        self.credits -= cost;
        self.economy.add(asset);
        self.relieve_pollution(asset.pollution_relief());
        log::info!(
            "built {} (now {})",
            asset.name(),
            self.economy.count(asset)
        );
        events.push(GameEvent::notice(format!("🏗️ {}", asset.built_message())));
        events.push(GameEvent::PanelDirty(Panel::Economy));
        self.award_xp(self.tuning.asset_built, events);
        Ok(())
    }

    // ── Periodic effects ────────────────────────────────────────────────

    /// Pay out bank income. Returns the amount paid.
    pub fn apply_passive_income(&mut self, per_bank: u64, events: &mut Vec<GameEvent>) -> u64 {
        let income = economy::passive_income(&self.economy, per_bank);
        if income > 0 {
            self.credits = self.credits.saturating_add(income);
            events.push(GameEvent::HudDirty);
        }
        income
    }

    /// Slow re-pollution. Returns true if pollution changed.
    pub fn apply_pollution_creep(&mut self, amount: f32, events: &mut Vec<GameEvent>) -> bool {
        if self.pollution >= MAX_POLLUTION {
            return false;
        }
        self.pollution = (self.pollution + amount).min(MAX_POLLUTION);
        events.push(GameEvent::HudDirty);
        true
    }

    // ── Districts ───────────────────────────────────────────────────────

    /// Switch the active district. Only unlocked districts are allowed.
    pub fn set_current_district(&mut self, index: usize) -> Result<(), Rejection> {
        if index >= DISTRICT_COUNT {
            return Err(Rejection::UnknownDistrict);
        }
        if !self.district_unlocked[index] {
            return Err(Rejection::DistrictLocked);
        }
        self.current_district = index;
        Ok(())
    }

    /// Credit a full clear of `index`. Returns the new cleanliness.
    pub fn mark_district_cleared(&mut self, index: usize, step: u8, events: &mut Vec<GameEvent>) -> u8 {
        let Some(slot) = self.district_clean.get_mut(index) else {
            return 0;
        };
        *slot = slot.saturating_add(step).min(100);
        events.push(GameEvent::PanelDirty(Panel::City));
        *slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (ProgressionState, Vec<GameEvent>) {
        (ProgressionState::default(), Vec::new())
    }

    #[test]
    fn starting_values() {
        let (gs, _) = fresh();
        assert_eq!(gs.credits(), 500);
        assert_eq!(gs.level(), 1);
        assert_eq!(gs.xp_next(), 100);
        assert!((gs.pollution() - 70.0).abs() < f32::EPSILON);
        assert_eq!(gs.skill_points(), 2);
        assert_eq!(gs.chapter(), 1);
        assert!(gs.is_district_unlocked(3));
        assert!(!gs.is_district_unlocked(4));
        assert!(!gs.is_district_unlocked(5));
    }

    #[test]
    fn credits_and_xp_saturate() {
        let config = GameConfig {
            start_credits: u64::MAX - 10,
            ..GameConfig::default()
        };
        let mut gs = ProgressionState::new(&config);
        let mut ev = Vec::new();
        gs.record_world_collect(400, &mut ev);
        assert_eq!(gs.credits(), u64::MAX);
        gs.record_correct_sort(u64::MAX, &mut ev);
        assert_eq!(gs.credits(), u64::MAX);

        gs.award_xp(u64::MAX, &mut ev);
        gs.award_xp(u64::MAX, &mut ev);
        assert!(gs.xp() < gs.xp_next());
    }

    #[test]
    fn chapter_formula() {
        assert_eq!(chapter_for_level(1), 1);
        assert_eq!(chapter_for_level(2), 1);
        assert_eq!(chapter_for_level(3), 2);
        assert_eq!(chapter_for_level(9), 4);
        assert_eq!(chapter_for_level(15), 6);
        assert_eq!(chapter_for_level(100), 6);
    }

    #[test]
    fn single_level_up() {
        let (mut gs, mut ev) = fresh();
        assert_eq!(gs.award_xp(150, &mut ev), 1);
        assert_eq!(gs.level(), 2);
        assert_eq!(gs.xp(), 50);
        assert_eq!(gs.xp_next(), 150);
        assert_eq!(gs.skill_points(), 3);
    }

    #[test]
    fn exact_threshold_carry_levels_again() {
        let (mut gs, mut ev) = fresh();
        // 250 - 100 leaves exactly the next threshold
        assert_eq!(gs.award_xp(250, &mut ev), 2);
        assert_eq!(gs.level(), 3);
        assert_eq!(gs.xp(), 0);
        assert_eq!(gs.xp_next(), 225);
    }

    #[test]
    fn double_level_up_in_one_award() {
        let (mut gs, mut ev) = fresh();
        let gained = gs.award_xp(400, &mut ev);
        assert_eq!(gained, 2);
        assert_eq!(gs.level(), 3);
        assert_eq!(gs.xp(), 150);
        assert_eq!(gs.xp_next(), 225);
        assert_eq!(gs.skill_points(), 4);
        assert_eq!(gs.chapter(), 2);
        let level_ups = ev
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 2);
    }

    #[test]
    fn small_award_no_level() {
        let (mut gs, mut ev) = fresh();
        assert_eq!(gs.award_xp(99, &mut ev), 0);
        assert_eq!(gs.level(), 1);
        assert_eq!(gs.xp(), 99);
    }

    #[test]
    fn correct_sort_scenario() {
        let (mut gs, mut ev) = fresh();
        let earned = gs.record_correct_sort(120, &mut ev);
        assert_eq!(earned, 120);
        assert_eq!(gs.credits(), 620);
        assert!((gs.pollution() - 68.0).abs() < f32::EPSILON);
        assert_eq!(gs.score(), 10);
        assert_eq!(gs.sort_score(), 10);
        assert_eq!(gs.xp(), 15);
        assert_eq!(gs.waste_collected(), 1);
    }

    #[test]
    fn industrial_multiplier_floors() {
        let (mut gs, mut ev) = fresh();
        gs.unlock_skill(SkillId::Industrial, &mut ev).unwrap();
        assert_eq!(gs.record_correct_sort(80, &mut ev), 104);
        assert_eq!(gs.record_correct_sort(125, &mut ev), 162); // 162.5 floored
    }

    #[test]
    fn speaker_doubles_relief() {
        let (mut gs, mut ev) = fresh();
        gs.skill_points = 3;
        gs.unlock_skill(SkillId::Speaker, &mut ev).unwrap();
        gs.record_correct_sort(80, &mut ev);
        assert!((gs.pollution() - 66.0).abs() < f32::EPSILON);
        gs.record_world_collect(80, &mut ev);
        assert!((gs.pollution() - 64.0).abs() < f32::EPSILON);
    }

    #[test]
    fn wrong_sort_floors_score() {
        let (mut gs, mut ev) = fresh();
        gs.record_wrong_sort(&mut ev);
        assert_eq!(gs.score(), 0);
        assert!((gs.pollution() - 71.0).abs() < f32::EPSILON);
        assert!(ev.contains(&GameEvent::DamageFlash));
    }

    #[test]
    fn wrong_sort_caps_pollution() {
        let (mut gs, mut ev) = fresh();
        gs.pollution = 99.5;
        gs.record_wrong_sort(&mut ev);
        assert!((gs.pollution() - 100.0).abs() < f32::EPSILON);
        gs.record_wrong_sort(&mut ev);
        assert!((gs.pollution() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn world_collect() {
        let (mut gs, mut ev) = fresh();
        gs.record_world_collect(600, &mut ev);
        assert_eq!(gs.credits(), 1100);
        assert_eq!(gs.score(), 5);
        assert!((gs.pollution() - 69.0).abs() < f32::EPSILON);
        assert_eq!(gs.xp(), 10);
    }

    #[test]
    fn pollution_floors_at_zero() {
        let (mut gs, mut ev) = fresh();
        gs.pollution = 0.5;
        gs.record_world_collect(80, &mut ev);
        assert_eq!(gs.pollution(), 0.0);
    }

    #[test]
    fn unlock_skill_twice_rejected_unchanged() {
        let (mut gs, mut ev) = fresh();
        gs.unlock_skill(SkillId::Speed, &mut ev).unwrap();
        assert_eq!(gs.skill_points(), 1);
        let before = gs.clone();
        assert_eq!(
            gs.unlock_skill(SkillId::Speed, &mut ev),
            Err(Rejection::SkillAlreadyUnlocked)
        );
        assert_eq!(gs, before);
    }

    #[test]
    fn unlock_skill_insufficient_points_unchanged() {
        let (mut gs, mut ev) = fresh();
        let before = gs.clone();
        assert!(matches!(
            gs.unlock_skill(SkillId::Speaker, &mut ev),
            Err(Rejection::InsufficientSkillPoints { needed: 3, available: 2 })
        ));
        assert_eq!(gs, before);
        assert!(!gs.skills().is_unlocked(SkillId::Speaker));
    }

    #[test]
    fn build_park_relieves_and_awards() {
        let (mut gs, mut ev) = fresh();
        gs.build_economy_asset(EconomyAsset::Park, &mut ev).unwrap();
        assert_eq!(gs.credits(), 300);
        assert_eq!(gs.economy().park, 1);
        assert!((gs.pollution() - 65.0).abs() < f32::EPSILON);
        assert_eq!(gs.xp(), 20);
    }

    #[test]
    fn build_without_credits_unchanged() {
        let (mut gs, mut ev) = fresh();
        gs.build_economy_asset(EconomyAsset::Factory, &mut ev).unwrap();
        assert_eq!(gs.credits(), 0);
        let before = gs.clone();
        assert_eq!(
            gs.build_economy_asset(EconomyAsset::Bank, &mut ev),
            Err(Rejection::InsufficientCredits {
                needed: 300,
                available: 0
            })
        );
        assert_eq!(gs, before);
    }

    #[test]
    fn bank_income() {
        let (mut gs, mut ev) = fresh();
        assert_eq!(gs.apply_passive_income(50, &mut ev), 0);
        gs.build_economy_asset(EconomyAsset::Bank, &mut ev).unwrap();
        assert_eq!(gs.apply_passive_income(50, &mut ev), 50);
        assert_eq!(gs.credits(), 250);
    }

    #[test]
    fn creep_stops_at_max() {
        let (mut gs, mut ev) = fresh();
        assert!(gs.apply_pollution_creep(0.5, &mut ev));
        assert!((gs.pollution() - 70.5).abs() < f32::EPSILON);
        gs.pollution = 100.0;
        assert!(!gs.apply_pollution_creep(0.5, &mut ev));
        assert_eq!(gs.pollution(), 100.0);
    }

    #[test]
    fn chapter_four_unlocks_slum() {
        let (mut gs, mut ev) = fresh();
        gs.level = 8;
        assert!(gs.unlock_chapter_if_eligible(&mut ev));
        assert_eq!(gs.chapter(), 3);
        assert!(!gs.is_district_unlocked(4));
        gs.level = 9;
        gs.unlock_chapter_if_eligible(&mut ev);
        assert_eq!(gs.chapter(), 4);
        assert!(gs.is_district_unlocked(4));
        assert!(!gs.is_district_unlocked(5));
        assert!(ev.contains(&GameEvent::DistrictUnlocked { district: 4 }));
        gs.level = 15;
        gs.unlock_chapter_if_eligible(&mut ev);
        assert_eq!(gs.chapter(), 6);
        assert!(gs.is_district_unlocked(5));
    }

    #[test]
    fn chapter_jump_skips_intermediate() {
        let (mut gs, mut ev) = fresh();
        gs.level = 15;
        gs.unlock_chapter_if_eligible(&mut ev);
        assert_eq!(gs.chapter(), 6);
        assert!(gs.is_district_unlocked(4));
        assert!(gs.is_district_unlocked(5));
    }

    #[test]
    fn locked_district_rejected() {
        let (mut gs, _) = fresh();
        assert_eq!(gs.set_current_district(4), Err(Rejection::DistrictLocked));
        assert_eq!(gs.set_current_district(9), Err(Rejection::UnknownDistrict));
        assert_eq!(gs.current_district(), 0);
        assert_eq!(gs.set_current_district(2), Ok(()));
        assert_eq!(gs.current_district(), 2);
    }

    #[test]
    fn district_clean_caps() {
        let (mut gs, mut ev) = fresh();
        for _ in 0..4 {
            gs.mark_district_cleared(1, 20, &mut ev);
        }
        assert_eq!(gs.district_clean()[1], 80);
        assert_eq!(gs.mark_district_cleared(1, 20, &mut ev), 100);
        assert_eq!(gs.mark_district_cleared(1, 20, &mut ev), 100);
        assert_eq!(gs.mark_district_cleared(42, 20, &mut ev), 0);
    }
}
