//! Sorting mini-game: a two-phase select-then-bin state machine.
//!
//! Each round offers four catalog entries: one drawn target plus decoys,
//! shuffled, always containing the target. The player first selects one
//! offered entry (`Idle → ItemSelected`), then picks a bin
//! (`ItemSelected → Idle`). Correctness compares the selected entry's
//! [`WasteCategory`] with the bin; which entry was the round's target does
//! not matter.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{self, WasteCategory, WasteKey, WasteType};
use crate::error::Rejection;
use crate::events::{GameEvent, Panel};
use crate::progression::ProgressionState;
use crate::skills::SkillSet;

/// Options shown per round.
pub const OPTIONS_PER_ROUND: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPhase {
    Idle,
    ItemSelected(WasteKey),
}

/// Result of dropping the selected item into a bin.
#[derive(Debug, Clone, PartialEq)]
pub struct SortOutcome {
    pub correct: bool,
    pub entry: &'static WasteType,
    pub bin: WasteCategory,
    /// Credits paid; zero for a wrong sort.
    pub earned: u64,
}

impl SortOutcome {
    /// Educational text surfaced after either outcome.
    pub fn fact(&self) -> &'static str {
        self.entry.fact
    }

    /// Feedback line for the sorting panel.
    pub fn feedback(&self, xp: u64) -> String {
        if self.correct {
            format!("✅ CORRECT! +{} credits • +{} XP", self.earned, xp)
        } else {
            format!(
                "❌ WRONG! {} {} belongs in {}",
                self.entry.glyph,
                self.entry.name,
                self.entry.category.label().to_uppercase()
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortingGame {
    target: WasteKey,
    options: Vec<WasteKey>,
    phase: SortPhase,
    last_outcome: Option<SortOutcome>,
}

impl SortingGame {
    /// Start with a fresh round already dealt.
    pub fn new(rng: &mut impl Rng) -> Self {
        let (target, options) = deal_round(rng);
        Self {
            target,
            options,
            phase: SortPhase::Idle,
            last_outcome: None,
        }
    }

    /// Deal a new round, discarding any selection and feedback.
    pub fn new_round(&mut self, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        let (target, options) = deal_round(rng);
        self.target = target;
        self.options = options;
        self.phase = SortPhase::Idle;
        self.last_outcome = None;
        events.push(GameEvent::PanelDirty(Panel::Sorting));
    }

    pub fn phase(&self) -> SortPhase {
        self.phase
    }

    pub fn options(&self) -> &[WasteKey] {
        &self.options
    }

    pub fn target(&self) -> WasteKey {
        self.target
    }

    pub fn selected(&self) -> Option<&'static WasteType> {
        match self.phase {
            SortPhase::Idle => None,
            SortPhase::ItemSelected(key) => Some(catalog::waste(key)),
        }
    }

    pub fn last_outcome(&self) -> Option<&SortOutcome> {
        self.last_outcome.as_ref()
    }

    /// The round's target, revealed only to players with auto-detect.
    pub fn target_hint(&self, skills: &SkillSet) -> Option<WasteKey> {
        skills.auto_detect().then_some(self.target)
    }

    /// Select one of the offered entries. Re-selecting replaces the choice.
    pub fn select(
        &mut self,
        key: WasteKey,
        events: &mut Vec<GameEvent>,
    ) -> Result<&'static WasteType, Rejection> {
        if !self.options.contains(&key) {
            return Err(Rejection::NotOffered);
        }
        self.phase = SortPhase::ItemSelected(key);
        events.push(GameEvent::PanelDirty(Panel::Sorting));
        Ok(catalog::waste(key))
    }

    /// Drop the selected entry into `bin` and score it.
    pub fn resolve_bin(
        &mut self,
        bin: WasteCategory,
        state: &mut ProgressionState,
        events: &mut Vec<GameEvent>,
    ) -> Result<SortOutcome, Rejection> {
        let SortPhase::ItemSelected(key) = self.phase else {
            return Err(Rejection::NothingSelected);
        };
        let entry = catalog::waste(key);
        let correct = entry.category == bin;

        let earned = if correct {
            let earned = state.record_correct_sort(entry.value, events);
            events.push(GameEvent::notice(format!(
                "+{} CREDITS • {} Correct!",
                earned, entry.glyph
            )));
            earned
        } else {
            state.record_wrong_sort(events);
            events.push(GameEvent::notice(format!(
                "❌ {} goes in {}",
                entry.glyph,
                entry.category.label()
            )));
            0
        };
        log::debug!(
            "sort {:?} into {:?}: correct={} earned={}",
            entry.name,
            bin,
            correct,
            earned
        );

        let outcome = SortOutcome {
            correct,
            entry,
            bin,
            earned,
        };
        self.phase = SortPhase::Idle;
        self.last_outcome = Some(outcome.clone());
        events.push(GameEvent::PanelDirty(Panel::Sorting));
        Ok(outcome)
    }
}

/// Draw a target, then four shuffled entries guaranteed to include it.
fn deal_round(rng: &mut impl Rng) -> (WasteKey, Vec<WasteKey>) {
    let all: Vec<WasteKey> = catalog::waste_types().iter().map(|w| w.key).collect();
    let target = all[rng.gen_range(0..all.len())];

    let mut options = all;
    options.shuffle(rng);
    options.truncate(OPTIONS_PER_ROUND);
    if !options.contains(&target) {
        options[0] = target;
    }
    options.shuffle(rng);
    (target, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(seed: u64) -> (SortingGame, ProgressionState, Vec<GameEvent>, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let game = SortingGame::new(&mut rng);
        (game, ProgressionState::default(), Vec::new(), rng)
    }

    #[test]
    fn rounds_always_offer_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ev = Vec::new();
        let mut game = SortingGame::new(&mut rng);
        for _ in 0..500 {
            game.new_round(&mut rng, &mut ev);
            assert_eq!(game.options().len(), OPTIONS_PER_ROUND);
            assert!(game.options().contains(&game.target()));
            let mut dedup = game.options().to_vec();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), OPTIONS_PER_ROUND);
        }
    }

    #[test]
    fn bin_without_selection_rejected() {
        let (mut game, mut gs, mut ev, _) = setup(2);
        let before = gs.clone();
        assert_eq!(
            game.resolve_bin(WasteCategory::Metal, &mut gs, &mut ev),
            Err(Rejection::NothingSelected)
        );
        assert_eq!(gs, before);
        assert_eq!(game.phase(), SortPhase::Idle);
    }

    #[test]
    fn selecting_unoffered_rejected() {
        let (mut game, _, mut ev, _) = setup(3);
        let missing = catalog::waste_types()
            .iter()
            .map(|w| w.key)
            .find(|k| !game.options().contains(k))
            .unwrap();
        assert_eq!(game.select(missing, &mut ev), Err(Rejection::NotOffered));
        assert_eq!(game.phase(), SortPhase::Idle);
    }

    #[test]
    fn correct_sort_scores_and_returns_to_idle() {
        let (mut game, mut gs, mut ev, _) = setup(4);
        let key = game.options()[0];
        let entry = game.select(key, &mut ev).unwrap();
        assert_eq!(game.phase(), SortPhase::ItemSelected(key));

        let out = game.resolve_bin(entry.category, &mut gs, &mut ev).unwrap();
        assert!(out.correct);
        assert_eq!(out.earned, entry.value);
        assert_eq!(gs.credits(), 500 + entry.value);
        assert_eq!(gs.sort_score(), 10);
        assert_eq!(out.fact(), entry.fact);
        assert_eq!(game.phase(), SortPhase::Idle);
        assert!(game.last_outcome().is_some());
    }

    #[test]
    fn wrong_sort_penalises_and_flashes() {
        let (mut game, mut gs, mut ev, _) = setup(5);
        let key = game.options()[0];
        let entry = game.select(key, &mut ev).unwrap();
        let wrong = WasteCategory::ALL
            .into_iter()
            .find(|c| *c != entry.category)
            .unwrap();

        let out = game.resolve_bin(wrong, &mut gs, &mut ev).unwrap();
        assert!(!out.correct);
        assert_eq!(out.earned, 0);
        assert_eq!(gs.credits(), 500);
        assert!((gs.pollution() - 71.0).abs() < f32::EPSILON);
        assert!(ev.contains(&GameEvent::DamageFlash));
        assert!(out.feedback(15).contains(&entry.category.label().to_uppercase()));
        assert_eq!(game.phase(), SortPhase::Idle);
    }

    #[test]
    fn correctness_is_by_category_not_target() {
        // Any offered entry binned into its own category is correct,
        // whether or not it was the drawn target.
        for seed in 0..20 {
            let (mut game, mut gs, mut ev, _) = setup(seed);
            for key in game.options().to_vec() {
                let entry = game.select(key, &mut ev).unwrap();
                let out = game.resolve_bin(entry.category, &mut gs, &mut ev).unwrap();
                assert!(out.correct);
            }
        }
    }

    #[test]
    fn new_round_clears_selection() {
        let (mut game, _, mut ev, mut rng) = setup(6);
        let key = game.options()[1];
        game.select(key, &mut ev).unwrap();
        game.new_round(&mut rng, &mut ev);
        assert_eq!(game.phase(), SortPhase::Idle);
        assert!(game.last_outcome().is_none());
    }

    #[test]
    fn hint_requires_auto_detect() {
        let (game, _, _, _) = setup(7);
        let mut skills = SkillSet::default();
        assert_eq!(game.target_hint(&skills), None);
        skills.insert(SkillId::Scientist);
        assert_eq!(game.target_hint(&skills), Some(game.target()));
    }
}
