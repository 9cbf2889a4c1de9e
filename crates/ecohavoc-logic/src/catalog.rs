//! Static catalog data: waste types, districts, skills, chapters, eco facts.
//!
//! Loaded once (compiled in) and never modified. Mutable facts about these
//! entries, such as whether a district has been unlocked yet, live in
//! [`crate::progression::ProgressionState`], not here.
//!
//! Several waste entries share a [`WasteCategory`]; the category is the
//! sorting key, the entry ([`WasteKey`]) only adds visual variety.

use serde::{Deserialize, Serialize};

use crate::skills::{SkillEffect, SkillId};

/// Sorting category of a piece of waste. Bins are identified by the
/// category they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WasteCategory {
    Organic,
    Plastic,
    Metal,
    EWaste,
    Hazardous,
}

impl WasteCategory {
    /// All categories in bin order.
    pub const ALL: [WasteCategory; 5] = [
        WasteCategory::Organic,
        WasteCategory::Plastic,
        WasteCategory::Metal,
        WasteCategory::EWaste,
        WasteCategory::Hazardous,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WasteCategory::Organic => "Organic",
            WasteCategory::Plastic => "Plastic",
            WasteCategory::Metal => "Metal",
            WasteCategory::EWaste => "E-Waste",
            WasteCategory::Hazardous => "Hazardous",
        }
    }

    /// Credits for picking one up in the 3D world.
    pub fn collect_value(self) -> u64 {
        match self {
            WasteCategory::Organic => 80,
            WasteCategory::Plastic => 120,
            WasteCategory::Metal => 250,
            WasteCategory::EWaste => 400,
            WasteCategory::Hazardous => 600,
        }
    }

    /// Color of the world pickup sphere (0xRRGGBB).
    pub fn world_color(self) -> u32 {
        match self {
            WasteCategory::Organic => 0x8b4513,
            WasteCategory::Plastic => 0x1e90ff,
            WasteCategory::Metal => 0xaaaaaa,
            WasteCategory::EWaste => 0x9400d3,
            WasteCategory::Hazardous => 0xff4500,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            WasteCategory::Organic => "🌿",
            WasteCategory::Plastic => "🧴",
            WasteCategory::Metal => "⚙️",
            WasteCategory::EWaste => "💻",
            WasteCategory::Hazardous => "☠️",
        }
    }
}

/// Stable key of a waste catalog entry. Only the catalog hands these out,
/// so every key indexes a real entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WasteKey(u8);

impl WasteKey {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WasteType {
    pub key: WasteKey,
    pub category: WasteCategory,
    pub glyph: &'static str,
    pub name: &'static str,
    /// 0xRRGGBB
    pub color: u32,
    /// Educational fact shown after the item is binned.
    pub fact: &'static str,
    /// Base credits for a correct sort.
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistrictInfo {
    pub name: &'static str,
    pub icon: &'static str,
    /// Drives how many waste objects spawn (0–100).
    pub base_pollution: u8,
    pub population: &'static str,
    pub tonnage: &'static str,
    /// Chapter at which the district unlocks; `None` = open from the start.
    pub unlock_chapter: Option<u32>,
    pub color: u32,
}

impl DistrictInfo {
    pub fn initially_locked(&self) -> bool {
        self.unlock_chapter.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillInfo {
    pub id: SkillId,
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u32,
    pub effect: SkillEffect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub number: u32,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EcoFact {
    pub title: &'static str,
    pub body: &'static str,
}

static WASTE_TYPES: [WasteType; 8] = [
    WasteType {
        key: WasteKey(0),
        category: WasteCategory::Organic,
        glyph: "🍌",
        name: "Banana Peel",
        color: 0x8b4513,
        fact: "Organic waste like food scraps composts in 2-4 weeks into nutrient-rich fertilizer!",
        value: 80,
    },
    WasteType {
        key: WasteKey(1),
        category: WasteCategory::Organic,
        glyph: "🥦",
        name: "Vegetable Scraps",
        color: 0x228b22,
        fact: "Organic waste fills 60% of Indonesian landfills. Composting it cuts methane emissions!",
        value: 80,
    },
    WasteType {
        key: WasteKey(2),
        category: WasteCategory::Plastic,
        glyph: "🧴",
        name: "Plastic Bottle",
        color: 0x1e90ff,
        fact: "Plastic takes 400-1000 years to break down. Recycling one bottle saves enough energy to run a 60W bulb for 6 hours!",
        value: 120,
    },
    WasteType {
        key: WasteKey(3),
        category: WasteCategory::Plastic,
        glyph: "🛍️",
        name: "Plastic Bag",
        color: 0x87ceeb,
        fact: "10 million tonnes of plastic reach the sea every year. Indonesia is the second largest source of marine plastic!",
        value: 120,
    },
    WasteType {
        key: WasteKey(4),
        category: WasteCategory::Metal,
        glyph: "🥫",
        name: "Sardine Can",
        color: 0xaaaaaa,
        fact: "Metal can be recycled 100% with no loss of quality! Recycled aluminium saves 95% of the energy of new production.",
        value: 250,
    },
    WasteType {
        key: WasteKey(5),
        category: WasteCategory::EWaste,
        glyph: "📱",
        name: "Broken Phone",
        color: 0x9400d3,
        fact: "E-waste contains gold, silver and copper! A tonne of old phones holds 300g of gold, 80x richer than gold ore!",
        value: 400,
    },
    WasteType {
        key: WasteKey(6),
        category: WasteCategory::EWaste,
        glyph: "🔋",
        name: "Used Battery",
        color: 0xff8c00,
        fact: "Batteries contain highly toxic cadmium and mercury. Never throw them away loose: hand them to a waste bank!",
        value: 400,
    },
    WasteType {
        key: WasteKey(7),
        category: WasteCategory::Hazardous,
        glyph: "🧪",
        name: "Chemical Liquid",
        color: 0xff4500,
        fact: "Hazardous and toxic waste needs special handling. Detergents, pesticides and paint all poison the soil!",
        value: 600,
    },
];

/// Number of districts in the city.
pub const DISTRICT_COUNT: usize = 6;

static DISTRICTS: [DistrictInfo; DISTRICT_COUNT] = [
    DistrictInfo {
        name: "DOWNTOWN MEGAPOLIS",
        icon: "🏙️",
        base_pollution: 70,
        population: "12.4K",
        tonnage: "847 t",
        unlock_chapter: None,
        color: 0xff8800,
    },
    DistrictInfo {
        name: "INDUSTRIAL TOXIC ZONE",
        icon: "🏭",
        base_pollution: 90,
        population: "3.2K",
        tonnage: "2100 t",
        unlock_chapter: None,
        color: 0xff4444,
    },
    DistrictInfo {
        name: "COASTAL BEACH",
        icon: "🏖️",
        base_pollution: 55,
        population: "8.7K",
        tonnage: "420 t",
        unlock_chapter: None,
        color: 0xffaa00,
    },
    DistrictInfo {
        name: "SUBURBAN RESIDENTIAL",
        icon: "🏘️",
        base_pollution: 40,
        population: "25K",
        tonnage: "650 t",
        unlock_chapter: None,
        color: 0x88dd00,
    },
    DistrictInfo {
        name: "SLUM OVERLOAD",
        icon: "🏚️",
        base_pollution: 85,
        population: "18K",
        tonnage: "1800 t",
        unlock_chapter: Some(4),
        color: 0xff6666,
    },
    DistrictInfo {
        name: "ECO FUTURE SMART CITY",
        icon: "🌿",
        base_pollution: 5,
        population: "—",
        tonnage: "—",
        unlock_chapter: Some(6),
        color: 0x00ff64,
    },
];

static SKILLS: [SkillInfo; 4] = [
    SkillInfo {
        id: SkillId::Scientist,
        icon: "🔬",
        name: "ECO SCIENTIST",
        description: "Automatically detects waste types nearby. Sorting accuracy +25%.",
        cost: 2,
        effect: SkillEffect::AutoDetect,
    },
    SkillInfo {
        id: SkillId::Speed,
        icon: "⚡",
        name: "SPEED OPERATOR",
        description: "Sorting speed +50%. Move faster through the city.",
        cost: 1,
        effect: SkillEffect::FasterSort,
    },
    SkillInfo {
        id: SkillId::Industrial,
        icon: "🏭",
        name: "INDUSTRIAL MASTER",
        description: "Recycling yield +30%. Every sorted item earns more credits.",
        cost: 2,
        effect: SkillEffect::MoreLoot,
    },
    SkillInfo {
        id: SkillId::Speaker,
        icon: "📢",
        name: "PUBLIC SPEAKER",
        description: "Citizens wake up faster. Pollution drops 2x faster while cleaning.",
        cost: 3,
        effect: SkillEffect::FasterClean,
    },
];

static CHAPTERS: [Chapter; 6] = [
    Chapter {
        number: 1,
        title: "THE OVERFLOW",
        description: "The city is drowning in trash. Start cleaning Downtown Megapolis.",
    },
    Chapter {
        number: 2,
        title: "CORPORATE TRASH",
        description: "Companies dump illegal waste. Investigate the Industrial Zone.",
    },
    Chapter {
        number: 3,
        title: "TOXIC RIVER",
        description: "The river runs black with dumping. Save the ecosystem!",
    },
    Chapter {
        number: 4,
        title: "WASTE MAFIA",
        description: "An illegal dumping syndicate is operating. Stop them!",
    },
    Chapter {
        number: 5,
        title: "GREEN REVOLUTION",
        description: "The green movement begins. Build eco-friendly infrastructure.",
    },
    Chapter {
        number: 6,
        title: "SMART ECO FUTURE",
        description: "The final transformation. Turn the city into a Smart Eco Metropolis!",
    },
];

static ECO_FACTS: [EcoFact; 8] = [
    EcoFact {
        title: "♻️ Recycling",
        body: "Indonesia produces 67 million tonnes of waste a year. Only 7% is recycled. Every recycled tonne of paper saves 17 trees!",
    },
    EcoFact {
        title: "🌊 Marine Litter",
        body: "8 million tonnes of plastic enter the ocean each year. Unchecked, by 2050 the sea will hold more plastic than fish by weight!",
    },
    EcoFact {
        title: "🌡️ Methane",
        body: "Organic waste in landfills produces methane, a greenhouse gas 25x stronger than CO₂. Composting cuts this drastically!",
    },
    EcoFact {
        title: "⚡ E-Waste Crisis",
        body: "The world generates 50 million tonnes of e-waste a year, Indonesia 2 million. Old phones hold valuable gold, silver and copper!",
    },
    EcoFact {
        title: "🏭 Hazardous Waste",
        body: "Illegal hazardous dumping contaminates a litre of groundwater per millilitre of chemical. Thousands of children are exposed to lead from burned e-waste!",
    },
    EcoFact {
        title: "💡 Waste Banks",
        body: "Indonesia now has 10,000+ waste banks. Residents deposit sorted waste and get cash back: a working circular economy model!",
    },
    EcoFact {
        title: "🌿 Compost = Green Gold",
        body: "1 kg of organic waste yields 0.3 kg of quality compost, worth hundreds of billions of rupiah a year if all of it were processed!",
    },
    EcoFact {
        title: "🚮 Sort at Home",
        body: "Sorting waste at the source saves 30% of landfill processing costs. It is the key to sustainable waste management!",
    },
];

pub fn waste_types() -> &'static [WasteType] {
    &WASTE_TYPES
}

pub fn waste(key: WasteKey) -> &'static WasteType {
    &WASTE_TYPES[key.index()]
}

/// All catalog entries belonging to one sorting category.
pub fn waste_in_category(category: WasteCategory) -> impl Iterator<Item = &'static WasteType> {
    WASTE_TYPES.iter().filter(move |w| w.category == category)
}

pub fn districts() -> &'static [DistrictInfo] {
    &DISTRICTS
}

pub fn district(index: usize) -> Option<&'static DistrictInfo> {
    DISTRICTS.get(index)
}

pub fn skills() -> &'static [SkillInfo] {
    &SKILLS
}

pub fn skill(id: SkillId) -> &'static SkillInfo {
    match id {
        SkillId::Scientist => &SKILLS[0],
        SkillId::Speed => &SKILLS[1],
        SkillId::Industrial => &SKILLS[2],
        SkillId::Speaker => &SKILLS[3],
    }
}

pub fn chapters() -> &'static [Chapter] {
    &CHAPTERS
}

/// Chapter by number (1-based), clamped to the last chapter.
pub fn chapter(number: u32) -> &'static Chapter {
    let idx = (number.max(1) as usize - 1).min(CHAPTERS.len() - 1);
    &CHAPTERS[idx]
}

pub fn eco_facts() -> &'static [EcoFact] {
    &ECO_FACTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_index_their_own_entry() {
        for (i, w) in waste_types().iter().enumerate() {
            assert_eq!(w.key.index(), i);
            assert_eq!(waste(w.key), w);
        }
    }

    #[test]
    fn every_category_has_an_entry() {
        for cat in WasteCategory::ALL {
            assert!(waste_in_category(cat).count() >= 1, "{:?} has no entries", cat);
        }
    }

    #[test]
    fn shared_categories_exist() {
        assert_eq!(waste_in_category(WasteCategory::Organic).count(), 2);
        assert_eq!(waste_in_category(WasteCategory::Plastic).count(), 2);
        assert_eq!(waste_in_category(WasteCategory::EWaste).count(), 2);
    }

    #[test]
    fn entry_value_matches_collect_value() {
        for w in waste_types() {
            assert_eq!(w.value, w.category.collect_value());
        }
    }

    #[test]
    fn first_four_districts_open() {
        let ds = districts();
        assert_eq!(ds.len(), 6);
        assert!(ds[..4].iter().all(|d| !d.initially_locked()));
        assert_eq!(ds[4].unlock_chapter, Some(4));
        assert_eq!(ds[5].unlock_chapter, Some(6));
        assert!(district(6).is_none());
    }

    #[test]
    fn skill_lookup_by_id() {
        for info in skills() {
            assert_eq!(skill(info.id).id, info.id);
        }
        assert_eq!(skill(SkillId::Speaker).cost, 3);
    }

    #[test]
    fn chapter_lookup_clamps() {
        assert_eq!(chapter(1).title, "THE OVERFLOW");
        assert_eq!(chapter(6).number, 6);
        assert_eq!(chapter(0).number, 1);
        assert_eq!(chapter(99).number, 6);
    }

    #[test]
    fn eco_facts_loaded() {
        assert_eq!(eco_facts().len(), 8);
        assert!(eco_facts().iter().all(|f| !f.body.is_empty()));
    }
}
