//! Events emitted by rule operations.
//!
//! Rule functions never talk to the screen. They push [`GameEvent`]s into a
//! caller-owned buffer and the presentation layer drains it after the
//! input or frame that produced them.

use crate::catalog;

/// The UI panels the presentation layer can rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Sorting,
    City,
    Skills,
    EcoFacts,
    Economy,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Sorting,
        Panel::City,
        Panel::Skills,
        Panel::EcoFacts,
        Panel::Economy,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Sorting => "♻️ SORTING STATION",
            Panel::City => "🗺 CITY DISTRICTS",
            Panel::Skills => "🎯 SKILL TREE",
            Panel::EcoFacts => "📚 ECO DATABASE",
            Panel::Economy => "💰 CIRCULAR ECONOMY",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Toast text.
    Notice(String),
    /// "+120 💚 Plastic" style popup near the screen centre.
    FloatingGain(String),
    StoryBanner { title: String, body: String },
    LevelUp { level: u32 },
    ChapterReached { chapter: u32 },
    DistrictUnlocked { district: usize },
    /// Red screen flash after a wrong sort.
    DamageFlash,
    /// HUD numbers changed.
    HudDirty,
    PanelDirty(Panel),
}

impl GameEvent {
    pub fn notice(text: impl Into<String>) -> Self {
        GameEvent::Notice(text.into())
    }

    /// Toast text for events that produce one.
    pub fn toast_text(&self) -> Option<String> {
        match self {
            GameEvent::Notice(text) => Some(text.clone()),
            GameEvent::LevelUp { level } => {
                Some(format!("🎉 LEVEL UP! Level {} · Skill Point +1", level))
            }
            GameEvent::ChapterReached { chapter } => {
                let ch = catalog::chapter(*chapter);
                Some(format!("📖 CHAPTER {}: {}", ch.number, ch.title))
            }
            GameEvent::DistrictUnlocked { district } => catalog::district(*district)
                .map(|d| format!("🔓 {} {} unlocked!", d.icon, d.name)),
            _ => None,
        }
    }
}
