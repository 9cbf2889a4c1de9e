//! Pure economy logic: buildable assets, passive income, market ticker.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::WasteCategory;

/// Buildings the player can buy with credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EconomyAsset {
    /// Waste bank: passive credit income.
    Bank,
    /// Recycling factory.
    Factory,
    /// City park: one-off pollution relief.
    Park,
}

impl EconomyAsset {
    pub const ALL: [EconomyAsset; 3] = [EconomyAsset::Bank, EconomyAsset::Factory, EconomyAsset::Park];

    pub fn cost(self) -> u64 {
        match self {
            EconomyAsset::Bank => 300,
            EconomyAsset::Factory => 500,
            EconomyAsset::Park => 200,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EconomyAsset::Bank => "WASTE BANK",
            EconomyAsset::Factory => "RECYCLING FACTORY",
            EconomyAsset::Park => "CITY PARK",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            EconomyAsset::Bank => "🏦",
            EconomyAsset::Factory => "🏭",
            EconomyAsset::Park => "🌳",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EconomyAsset::Bank => "Residents deposit waste for credits. +50 credits passive income.",
            EconomyAsset::Factory => "Turns waste into new material. +30% resale value.",
            EconomyAsset::Park => "Pollution -5%. Citizen happiness +20%.",
        }
    }

    /// Toast shown after a successful build.
    pub fn built_message(self) -> &'static str {
        match self {
            EconomyAsset::Bank => "Waste Bank built! +50 credits passive income",
            EconomyAsset::Factory => "Factory online! Recycling value +30%",
            EconomyAsset::Park => "City park built! Pollution -5%",
        }
    }

    /// Immediate pollution reduction when built.
    pub fn pollution_relief(self) -> f32 {
        match self {
            EconomyAsset::Park => 5.0,
            _ => 0.0,
        }
    }
}

/// Owned building counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyBuildings {
    pub bank: u32,
    pub factory: u32,
    pub park: u32,
}

impl EconomyBuildings {
    pub fn count(&self, asset: EconomyAsset) -> u32 {
        match asset {
            EconomyAsset::Bank => self.bank,
            EconomyAsset::Factory => self.factory,
            EconomyAsset::Park => self.park,
        }
    }

    pub fn add(&mut self, asset: EconomyAsset) {
        match asset {
            EconomyAsset::Bank => self.bank += 1,
            EconomyAsset::Factory => self.factory += 1,
            EconomyAsset::Park => self.park += 1,
        }
    }
}

/// Credits paid out per income tick.
pub fn passive_income(buildings: &EconomyBuildings, per_bank: u64) -> u64 {
    buildings.bank as u64 * per_bank
}

/// Display-only fluctuating market prices (credits per tonne).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketPrices {
    pub quotes: Vec<(WasteCategory, u64)>,
}

impl Default for MarketPrices {
    /// Reference prices, the same as world collection values.
    fn default() -> Self {
        Self {
            quotes: WasteCategory::ALL
                .iter()
                .map(|c| (*c, c.collect_value()))
                .collect(),
        }
    }
}

impl MarketPrices {
    pub fn quote(&self, category: WasteCategory) -> Option<u64> {
        self.quotes
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, p)| *p)
    }
}

/// Re-roll the ticker. Hazardous waste is not traded and keeps its fixed price.
pub fn roll_market(rng: &mut impl Rng) -> MarketPrices {
    let band = |c: WasteCategory| -> (u64, u64) {
        match c {
            WasteCategory::Plastic => (100, 80),
            WasteCategory::Organic => (60, 60),
            WasteCategory::Metal => (200, 100),
            WasteCategory::EWaste => (350, 100),
            WasteCategory::Hazardous => (c.collect_value(), 0),
        }
    };
    let quotes = WasteCategory::ALL
        .iter()
        .map(|c| {
            let (base, spread) = band(*c);
            let jitter = if spread > 0 { rng.gen_range(0..spread) } else { 0 };
            (*c, base + jitter)
        })
        .collect();
    MarketPrices { quotes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn cost_table() {
        assert_eq!(EconomyAsset::Bank.cost(), 300);
        assert_eq!(EconomyAsset::Factory.cost(), 500);
        assert_eq!(EconomyAsset::Park.cost(), 200);
    }

    #[test]
    fn only_park_relieves_pollution() {
        assert!((EconomyAsset::Park.pollution_relief() - 5.0).abs() < f32::EPSILON);
        assert_eq!(EconomyAsset::Bank.pollution_relief(), 0.0);
        assert_eq!(EconomyAsset::Factory.pollution_relief(), 0.0);
    }

    #[test]
    fn counts_track_builds() {
        let mut b = EconomyBuildings::default();
        b.add(EconomyAsset::Bank);
        b.add(EconomyAsset::Bank);
        b.add(EconomyAsset::Park);
        assert_eq!(b.count(EconomyAsset::Bank), 2);
        assert_eq!(b.count(EconomyAsset::Factory), 0);
        assert_eq!(b.count(EconomyAsset::Park), 1);
    }

    #[test]
    fn income_scales_with_banks() {
        let mut b = EconomyBuildings::default();
        assert_eq!(passive_income(&b, 50), 0);
        b.bank = 3;
        assert_eq!(passive_income(&b, 50), 150);
    }

    #[test]
    fn market_stays_in_bands() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let m = roll_market(&mut rng);
            let plastic = m.quote(WasteCategory::Plastic).unwrap();
            let organic = m.quote(WasteCategory::Organic).unwrap();
            let metal = m.quote(WasteCategory::Metal).unwrap();
            let ewaste = m.quote(WasteCategory::EWaste).unwrap();
            assert!((100..180).contains(&plastic));
            assert!((60..120).contains(&organic));
            assert!((200..300).contains(&metal));
            assert!((350..450).contains(&ewaste));
            assert_eq!(m.quote(WasteCategory::Hazardous), Some(600));
        }
    }
}
