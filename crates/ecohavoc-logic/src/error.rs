//! Soft rejections for refused player actions.
//!
//! Nothing in the game is fatal. A refused action returns one of these and
//! leaves the progression state untouched; the `Display` text is what the
//! player sees in the notification toast.

use thiserror::Error;

/// Why an action was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Pick a waste item first!")]
    NothingSelected,
    #[error("That item is not on the sorting table")]
    NotOffered,
    #[error("Skill already active!")]
    SkillAlreadyUnlocked,
    #[error("Not enough skill points! (need {needed}, have {available})")]
    InsufficientSkillPoints { needed: u32, available: u32 },
    #[error("Not enough credits! (need {needed}, have {available})")]
    InsufficientCredits { needed: u64, available: u64 },
    #[error("District locked: finish the earlier districts first!")]
    DistrictLocked,
    #[error("No such district")]
    UnknownDistrict,
    #[error("No waste nearby! (E = collect)")]
    NothingNearby,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_amounts() {
        let r = Rejection::InsufficientCredits {
            needed: 300,
            available: 120,
        };
        assert_eq!(r.to_string(), "Not enough credits! (need 300, have 120)");
    }

    #[test]
    fn unit_messages_are_not_empty() {
        for r in [
            Rejection::NothingSelected,
            Rejection::NotOffered,
            Rejection::SkillAlreadyUnlocked,
            Rejection::DistrictLocked,
            Rejection::UnknownDistrict,
            Rejection::NothingNearby,
        ] {
            assert!(!r.to_string().is_empty());
        }
    }
}
