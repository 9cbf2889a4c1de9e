//! Game engine - main entry point for running the world simulation

use ecohavoc_logic::atmosphere::{Atmosphere, DistrictStatus, PollutionStatus};
use ecohavoc_logic::catalog::{self, DistrictInfo, WasteCategory, WasteKey};
use ecohavoc_logic::city::CityLayout;
use ecohavoc_logic::config::GameConfig;
use ecohavoc_logic::economy::{roll_market, EconomyAsset, MarketPrices};
use ecohavoc_logic::error::Rejection;
use ecohavoc_logic::events::{GameEvent, Panel};
use ecohavoc_logic::movement::{MoveIntent, PlayerPose};
use ecohavoc_logic::progression::ProgressionState;
use ecohavoc_logic::skills::SkillId;
use ecohavoc_logic::sorting::{SortOutcome, SortingGame};
use ecohavoc_logic::timers::{Countdown, RepeatingTimer};
use hecs::World;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::{Bobbing, GroundPos, Waste};
use crate::presenter::*;
use crate::systems::*;

const WELCOME: &str = "🌍 Welcome to ECO HAVOC! Press E to collect waste, R to sort.";

/// A district repopulation waiting for its delay to elapse. It only
/// applies if the player is still in `district` and nothing repopulated
/// the world since it was scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRespawn {
    pub district: usize,
    pub generation: u64,
    countdown: Countdown,
}

impl PendingRespawn {
    pub fn remaining(&self) -> f32 {
        self.countdown.remaining()
    }
}

/// Render-side view of one waste object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WasteView {
    /// Stable for the object's lifetime.
    pub id: u64,
    pub x: f32,
    pub z: f32,
    pub height: f32,
    pub spin: f32,
    pub category: WasteCategory,
    pub radius: f32,
}

/// Main game engine
pub struct GameEngine {
    /// ECS world containing the current district's waste objects
    pub world: World,
    config: GameConfig,
    rng: StdRng,
    state: ProgressionState,
    sorting: SortingGame,
    city: CityLayout,
    player: PlayerPose,
    market: MarketPrices,
    open_panel: Option<Panel>,
    /// Seconds since the engine was created
    elapsed: f32,
    /// Bumped on every populate; respawns scheduled under an older value are stale
    generation: u64,
    pending_respawn: Option<PendingRespawn>,
    events: Vec<GameEvent>,
    /// Pollution the presenter last received an atmosphere for
    shown_pollution: Option<f32>,

    // Periodic effects
    income_timer: RepeatingTimer,
    creep_timer: RepeatingTimer,
    minimap_timer: RepeatingTimer,
    ticker_timer: RepeatingTimer,
}

impl GameEngine {
    /// Create an engine with a generated city and the starting district populated.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let city = CityLayout::generate(&mut rng);
        let sorting = SortingGame::new(&mut rng);
        let state = ProgressionState::new(&config);

        let mut engine = Self {
            world: World::new(),
            income_timer: RepeatingTimer::new(config.income_interval),
            creep_timer: RepeatingTimer::new(config.creep_interval),
            minimap_timer: RepeatingTimer::new(config.minimap_interval),
            ticker_timer: RepeatingTimer::new(config.ticker_interval),
            config,
            rng,
            state,
            sorting,
            city,
            player: PlayerPose::default(),
            market: MarketPrices::default(),
            open_panel: None,
            elapsed: 0.0,
            generation: 0,
            pending_respawn: None,
            events: Vec::new(),
            shown_pollution: None,
        };
        engine.populate_current_district();
        log::info!(
            "engine ready: seed={} buildings={} waste={}",
            seed,
            engine.city.buildings.len(),
            engine.waste_remaining()
        );
        engine
    }

    /// Opening sequence: welcome notice, chapter 1 banner, full HUD, minimap and atmosphere.
    pub fn start(&mut self, presenter: &mut dyn Presenter) {
        let chapter = catalog::chapter(self.state.chapter());
        self.events.push(GameEvent::notice(WELCOME));
        self.events.push(GameEvent::StoryBanner {
            title: format!("📖 CHAPTER {}: {}", chapter.number, chapter.title),
            body: chapter.description.to_string(),
        });
        self.events.push(GameEvent::HudDirty);
        self.shown_pollution = None;
        self.flush(presenter);
        presenter.render_minimap(&self.minimap_frame());
    }

    // ── Frame loop ──────────────────────────────────────────────────────

    /// Advance the world by `delta_seconds` with the given movement input.
    pub fn update(&mut self, delta_seconds: f32, intent: MoveIntent, presenter: &mut dyn Presenter) {
        let dt = delta_seconds.max(0.0);
        self.elapsed += dt;

        // T0: every frame
        let speed = self.state.skills().walk_speed(&self.config);
        self.player.walk(intent, speed, dt, self.config.world_bound);
        animation_system(&mut self.world, self.elapsed, dt);
        self.tick_respawn(dt);

        // T1: timed effects
        for _ in 0..self.income_timer.tick(dt) {
            let paid = self
                .state
                .apply_passive_income(self.config.income_per_bank, &mut self.events);
            if paid > 0 {
                log::debug!("bank income +{}", paid);
            }
        }
        for _ in 0..self.creep_timer.tick(dt) {
            self.state
                .apply_pollution_creep(self.config.creep_amount, &mut self.events);
        }
        if self.ticker_timer.tick(dt) > 0 {
            self.market = roll_market(&mut self.rng);
            self.events.push(GameEvent::PanelDirty(Panel::Economy));
        }
        let minimap_due = self.minimap_timer.tick(dt) > 0;
        if minimap_due && self.state.skills().auto_detect() {
            // scanner readout follows the player
            self.events.push(GameEvent::HudDirty);
        }

        self.flush(presenter);
        if minimap_due {
            presenter.render_minimap(&self.minimap_frame());
        }
    }

    fn tick_respawn(&mut self, dt: f32) {
        let fired = match self.pending_respawn.as_mut() {
            Some(pending) => pending.countdown.tick(dt),
            None => return,
        };
        if !fired {
            return;
        }
        let Some(pending) = self.pending_respawn.take() else {
            return;
        };
        if pending.district == self.state.current_district() && pending.generation == self.generation
        {
            log::info!("respawning waste in district {}", pending.district);
            self.populate_current_district();
            self.events.push(GameEvent::HudDirty);
        } else {
            log::debug!(
                "discarding stale respawn for district {} (generation {}, now {} in district {})",
                pending.district,
                pending.generation,
                self.generation,
                self.state.current_district()
            );
        }
    }

    /// Replace all waste with a fresh batch for the current district.
    fn populate_current_district(&mut self) {
        clear_waste(&mut self.world);
        self.generation += 1;
        let district = self.current_district_info();
        let count = waste_count_for(district);
        spawn_waste(
            &mut self.world,
            count,
            self.config.spawn_half_extent,
            &mut self.rng,
        );
        log::debug!(
            "populated {} with {} waste (generation {})",
            district.name,
            count,
            self.generation
        );
    }

    // ── Inbound operations ──────────────────────────────────────────────

    pub fn select_sorting_candidate(
        &mut self,
        key: WasteKey,
        presenter: &mut dyn Presenter,
    ) -> Result<(), Rejection> {
        let result = self.sorting.select(key, &mut self.events).map(|_| ());
        self.finish(result, presenter)
    }

    pub fn resolve_bin_choice(
        &mut self,
        bin: WasteCategory,
        presenter: &mut dyn Presenter,
    ) -> Result<SortOutcome, Rejection> {
        let result = self
            .sorting
            .resolve_bin(bin, &mut self.state, &mut self.events);
        self.finish(result, presenter)
    }

    pub fn request_new_sorting_round(&mut self, presenter: &mut dyn Presenter) {
        self.sorting.new_round(&mut self.rng, &mut self.events);
        self.flush(presenter);
    }

    /// Switch district. Re-selecting the current district repopulates it.
    pub fn set_current_district(
        &mut self,
        index: usize,
        presenter: &mut dyn Presenter,
    ) -> Result<(), Rejection> {
        let result = self.state.set_current_district(index);
        if result.is_ok() {
            self.populate_current_district();
            let d = self.current_district_info();
            log::info!("switched to district {}: {}", index, d.name);
            self.events
                .push(GameEvent::notice(format!("🗺 Moved to {}", d.name)));
            self.events.push(GameEvent::HudDirty);
            if self.open_panel == Some(Panel::City) {
                self.open_panel = None;
                presenter.close_panels();
            }
        }
        self.finish(result, presenter)
    }

    pub fn unlock_skill(&mut self, id: SkillId, presenter: &mut dyn Presenter) -> Result<(), Rejection> {
        let result = self.state.unlock_skill(id, &mut self.events);
        self.finish(result, presenter)
    }

    pub fn build_economy_asset(
        &mut self,
        asset: EconomyAsset,
        presenter: &mut dyn Presenter,
    ) -> Result<(), Rejection> {
        let result = self.state.build_economy_asset(asset, &mut self.events);
        self.finish(result, presenter)
    }

    /// Pointer-look delta in pixels.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.player.look(
            dx,
            dy,
            self.config.look_sensitivity,
            self.config.pitch_limit,
        );
    }

    /// Pick up the nearest waste within the collect radius.
    pub fn collect_nearby_waste(
        &mut self,
        presenter: &mut dyn Presenter,
    ) -> Result<WasteCategory, Rejection> {
        let Some(waste) = collect_nearest(
            &mut self.world,
            self.player.x,
            self.player.z,
            self.config.collect_radius,
        ) else {
            return self.finish(Err(Rejection::NothingNearby), presenter);
        };

        let value = waste.value();
        self.state.record_world_collect(value, &mut self.events);
        self.events.push(GameEvent::FloatingGain(format!(
            "+{} 💚 {}",
            value,
            waste.label()
        )));
        self.events.push(GameEvent::notice(format!(
            "✅ {} collected! +{} credits",
            waste.label(),
            value
        )));

        if waste_remaining(&self.world) == 0 {
            self.on_district_depleted();
        }
        self.finish(Ok(waste.category), presenter)
    }

    fn on_district_depleted(&mut self) {
        let index = self.state.current_district();
        let clean = self.state.mark_district_cleared(
            index,
            self.config.district_clean_step,
            &mut self.events,
        );
        log::info!(
            "district {} cleared (clean {}%), respawn in {}s",
            index,
            clean,
            self.config.respawn_delay
        );
        self.events
            .push(GameEvent::notice("🎉 District clean! Outstanding!"));
        self.pending_respawn = Some(PendingRespawn {
            district: index,
            generation: self.generation,
            countdown: Countdown::new(self.config.respawn_delay),
        });
    }

    /// Open one panel, closing any other. Opening the sorting panel deals a new round.
    pub fn open_panel(&mut self, panel: Panel, presenter: &mut dyn Presenter) {
        self.open_panel = Some(panel);
        if panel == Panel::Sorting {
            self.sorting.new_round(&mut self.rng, &mut self.events);
        }
        self.events.push(GameEvent::PanelDirty(panel));
        self.flush(presenter);
    }

    pub fn close_panels(&mut self, presenter: &mut dyn Presenter) {
        self.open_panel = None;
        presenter.close_panels();
    }

    /// Move the player directly, clamped to the world bound.
    pub fn set_player_position(&mut self, x: f32, z: f32) {
        let bound = self.config.world_bound;
        self.player.x = x.clamp(-bound, bound);
        self.player.z = z.clamp(-bound, bound);
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn finish<T>(&mut self, result: Result<T, Rejection>, presenter: &mut dyn Presenter) -> Result<T, Rejection> {
        if let Err(rejection) = &result {
            log::debug!("rejected: {}", rejection);
            presenter.notify(&rejection.to_string());
        }
        self.flush(presenter);
        result
    }

    /// Drain queued events into the presenter.
    fn flush(&mut self, presenter: &mut dyn Presenter) {
        let mut hud_dirty = false;
        let mut dirty_panels: Vec<Panel> = Vec::new();

        for event in std::mem::take(&mut self.events) {
            if let Some(text) = event.toast_text() {
                presenter.notify(&text);
            }
            match event {
                GameEvent::FloatingGain(text) => presenter.show_floating_gain(0.5, 0.5, &text),
                GameEvent::StoryBanner { title, body } => presenter.show_chapter_banner(&title, &body),
                GameEvent::DamageFlash => presenter.flash_damage(),
                GameEvent::HudDirty | GameEvent::LevelUp { .. } => hud_dirty = true,
                GameEvent::PanelDirty(panel) => {
                    if !dirty_panels.contains(&panel) {
                        dirty_panels.push(panel);
                    }
                }
                GameEvent::Notice(_)
                | GameEvent::ChapterReached { .. }
                | GameEvent::DistrictUnlocked { .. } => {}
            }
        }

        if hud_dirty {
            presenter.refresh_hud(&self.hud_snapshot());
        }
        let pollution = self.state.pollution();
        if self.shown_pollution != Some(pollution) {
            presenter.apply_atmosphere(&Atmosphere::from_pollution(pollution));
            self.shown_pollution = Some(pollution);
        }
        if let Some(open) = self.open_panel {
            if dirty_panels.contains(&open) {
                presenter.rebuild_panel(open, &self.panel_data(open));
            }
        }
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    fn current_district_info(&self) -> &'static DistrictInfo {
        &catalog::districts()[self.state.current_district()]
    }

    pub fn hud_snapshot(&self) -> HudSnapshot {
        let s = &self.state;
        let d = self.current_district_info();
        let pollution = s.pollution();
        HudSnapshot {
            credits: s.credits(),
            level: s.level(),
            score: s.score(),
            xp: s.xp(),
            xp_next: s.xp_next(),
            skill_points: s.skill_points(),
            waste_collected: s.waste_collected(),
            pollution: pollution.round() as u8,
            pollution_status: PollutionStatus::from_pollution(pollution),
            chapter: s.chapter(),
            chapter_title: catalog::chapter(s.chapter()).title,
            district_name: d.name,
            district_icon: d.icon,
            district_population: d.population,
            district_tonnage: d.tonnage,
            waste_remaining: self.waste_remaining(),
            nearby: s.skills().auto_detect().then(|| {
                scan_nearby(
                    &self.world,
                    self.player.x,
                    self.player.z,
                    self.config.scan_radius,
                )
            }),
        }
    }

    pub fn panel_data(&self, panel: Panel) -> PanelData {
        match panel {
            Panel::Sorting => {
                let selected = self.sorting.selected().map(|w| w.key);
                let hint = self.sorting.target_hint(self.state.skills());
                let options = self
                    .sorting
                    .options()
                    .iter()
                    .map(|&key| {
                        let w = catalog::waste(key);
                        SortOption {
                            key,
                            glyph: w.glyph,
                            name: w.name,
                            selected: selected == Some(key),
                            hinted: hint == Some(key),
                        }
                    })
                    .collect();
                let outcome = self.sorting.last_outcome();
                PanelData::Sorting(SortingPanel {
                    options,
                    bins: WasteCategory::ALL,
                    feedback: outcome.map(|o| o.feedback(self.config.xp_correct_sort)),
                    fact: outcome.map(|o| o.fact()),
                    sort_score: self.state.sort_score(),
                })
            }
            Panel::City => PanelData::City(
                catalog::districts()
                    .iter()
                    .enumerate()
                    .map(|(i, d)| {
                        let clean = self.state.district_clean()[i];
                        DistrictCard {
                            index: i,
                            name: d.name,
                            icon: d.icon,
                            base_pollution: d.base_pollution,
                            clean,
                            color: d.color,
                            status: DistrictStatus::classify(
                                self.state.is_district_unlocked(i),
                                clean,
                                d.base_pollution,
                            ),
                            current: i == self.state.current_district(),
                        }
                    })
                    .collect(),
            ),
            Panel::Skills => PanelData::Skills(SkillsPanel {
                skill_points: self.state.skill_points(),
                cards: catalog::skills()
                    .iter()
                    .map(|s| SkillCard {
                        id: s.id,
                        icon: s.icon,
                        name: s.name,
                        description: s.description,
                        cost: s.cost,
                        unlocked: self.state.skills().is_unlocked(s.id),
                    })
                    .collect(),
            }),
            Panel::EcoFacts => eco_facts_panel(),
            Panel::Economy => PanelData::Economy(EconomyPanel {
                credits: self.state.credits(),
                assets: EconomyAsset::ALL
                    .iter()
                    .map(|&asset| AssetCard {
                        asset,
                        owned: self.state.economy().count(asset),
                        affordable: self.state.credits() >= asset.cost(),
                    })
                    .collect(),
                market: self.market.clone(),
            }),
        }
    }

    pub fn minimap_frame(&self) -> MinimapFrame {
        MinimapFrame {
            player: MapPoint {
                x: self.player.x,
                z: self.player.z,
            },
            yaw: self.player.yaw,
            buildings: self
                .city
                .buildings
                .iter()
                .map(|b| MapPoint { x: b.x, z: b.z })
                .collect(),
            waste: self
                .world
                .query::<&GroundPos>()
                .with::<&Waste>()
                .iter()
                .map(|(_, p)| MapPoint { x: p.x, z: p.z })
                .collect(),
        }
    }

    pub fn waste_views(&self) -> Vec<WasteView> {
        self.world
            .query::<(&GroundPos, &Waste, &Bobbing)>()
            .iter()
            .map(|(entity, (pos, waste, bob))| WasteView {
                id: entity.to_bits().get(),
                x: pos.x,
                z: pos.z,
                height: bob.height,
                spin: bob.spin,
                category: waste.category,
                radius: waste.radius,
            })
            .collect()
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerPose {
        &self.player
    }

    pub fn city(&self) -> &CityLayout {
        &self.city
    }

    pub fn sorting(&self) -> &SortingGame {
        &self.sorting
    }

    pub fn market(&self) -> &MarketPrices {
        &self.market
    }

    pub fn current_panel(&self) -> Option<Panel> {
        self.open_panel
    }

    /// Incremented on every repopulation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_respawn(&self) -> Option<&PendingRespawn> {
        self.pending_respawn.as_ref()
    }

    pub fn waste_remaining(&self) -> usize {
        waste_remaining(&self.world)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(GameConfig::default(), 0)
    }
}
