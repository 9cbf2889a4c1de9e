//! Skill unlocking and skill effect hooks.
//!
//! Skills are bought once with skill points (earned on level-up) and stay
//! unlocked for the session. Each skill carries an effect tag; the hook
//! functions below are the only places the rest of the game asks "does the
//! player have X", so each effect has exactly one wiring point.
//!
//! # Effects
//!
//! | Skill | Effect | Hook |
//! |-------|--------|------|
//! | Eco Scientist | auto-detect | [`SkillSet::auto_detect`]: nearby scanner, round target hint |
//! | Speed Operator | faster-sort | [`SkillSet::walk_speed`]: 8 → 11 units/s |
//! | Industrial Master | more-loot | [`SkillSet::sort_credit_percent`]: 130% sort credits |
//! | Public Speaker | faster-clean | [`SkillSet::pollution_relief`]: 2x pollution reduction |
//!
//! ```
//! use ecohavoc_logic::skills::{SkillId, SkillSet};
//!
//! let mut set = SkillSet::default();
//! assert_eq!(set.sort_credit_percent(), 100);
//! set.insert(SkillId::Industrial);
//! assert_eq!(set.sort_credit_percent(), 130);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::config::GameConfig;
use crate::error::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillId {
    Scientist,
    Speed,
    Industrial,
    Speaker,
}

impl SkillId {
    pub const ALL: [SkillId; 4] = [
        SkillId::Scientist,
        SkillId::Speed,
        SkillId::Industrial,
        SkillId::Speaker,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillEffect {
    AutoDetect,
    FasterSort,
    MoreLoot,
    FasterClean,
}

/// The set of unlocked skills. Absence means locked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    unlocked: BTreeSet<SkillId>,
}

impl SkillSet {
    pub fn is_unlocked(&self, id: SkillId) -> bool {
        self.unlocked.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.unlocked.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    /// Mark a skill unlocked without any cost check. Progression goes
    /// through [`check_unlock`] first.
    pub fn insert(&mut self, id: SkillId) {
        self.unlocked.insert(id);
    }

    fn has_effect(&self, effect: SkillEffect) -> bool {
        self.unlocked
            .iter()
            .any(|id| catalog::skill(*id).effect == effect)
    }

    /// Percentage applied to sort credits (floored after applying).
    pub fn sort_credit_percent(&self) -> u64 {
        if self.has_effect(SkillEffect::MoreLoot) {
            130
        } else {
            100
        }
    }

    pub fn walk_speed(&self, config: &GameConfig) -> f32 {
        if self.has_effect(SkillEffect::FasterSort) {
            config.boosted_walk_speed
        } else {
            config.walk_speed
        }
    }

    /// Scale a per-action pollution reduction.
    pub fn pollution_relief(&self, base: f32) -> f32 {
        if self.has_effect(SkillEffect::FasterClean) {
            base * 2.0
        } else {
            base
        }
    }

    pub fn auto_detect(&self) -> bool {
        self.has_effect(SkillEffect::AutoDetect)
    }
}

/// Check whether `id` can be bought with `skill_points`. Returns the cost.
pub fn check_unlock(skills: &SkillSet, skill_points: u32, id: SkillId) -> Result<u32, Rejection> {
    if skills.is_unlocked(id) {
        return Err(Rejection::SkillAlreadyUnlocked);
    }
    let cost = catalog::skill(id).cost;
    if skill_points < cost {
        return Err(Rejection::InsufficientSkillPoints {
            needed: cost,
            available: skill_points,
        });
    }
    Ok(cost)
}
