//! Eco Havoc Headless Scenario Harness
//!
//! Drives the rules and the world engine through scripted play with a
//! recording presenter. Runs entirely in-process: no window, no GPU.
//!
//! Usage:
//!   cargo run -p ecohavoc-simtest
//!   cargo run -p ecohavoc-simtest -- --verbose
//!   cargo run -p ecohavoc-simtest -- --seed 7 --config tuning.json --json

use ecohavoc_core::prelude::*;
use ecohavoc_logic::atmosphere::{Atmosphere, DistrictStatus, PollutionStatus};
use ecohavoc_logic::catalog::{self, WasteCategory, DISTRICT_COUNT};
use ecohavoc_logic::economy::EconomyAsset;
use ecohavoc_logic::error::Rejection;
use ecohavoc_logic::events::{GameEvent, Panel};
use ecohavoc_logic::progression::{chapter_for_level, ProgressionState};
use ecohavoc_logic::skills::SkillId;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

// ── Arguments ───────────────────────────────────────────────────────────

struct Args {
    seed: u64,
    config: GameConfig,
    verbose: bool,
    json: bool,
}

impl Args {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut parsed = Args {
            seed: 42,
            config: GameConfig::default(),
            verbose: false,
            json: false,
        };
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" if i + 1 < args.len() => {
                    parsed.seed = args[i + 1]
                        .parse()
                        .map_err(|e| format!("bad --seed '{}': {}", args[i + 1], e))?;
                    i += 1;
                }
                "--config" | "-c" if i + 1 < args.len() => {
                    parsed.config = GameConfig::from_json_file(&args[i + 1])
                        .map_err(|e| format!("bad --config '{}': {}", args[i + 1], e))?;
                    i += 1;
                }
                "--verbose" | "-v" => parsed.verbose = true,
                "--json" => parsed.json = true,
                other => return Err(format!("unknown argument '{}'", other)),
            }
            i += 1;
        }
        Ok(parsed)
    }
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(results: &mut Vec<TestResult>, name: &str, passed: bool, detail: String) {
    results.push(TestResult {
        name: name.into(),
        passed,
        detail,
    });
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    passed: usize,
    failed: usize,
    results: &'a [TestResult],
    final_state: &'a ProgressionState,
    final_hud: &'a HudSnapshot,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = match Args::from_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("usage: ecohavoc-simtest [--seed N] [--config FILE] [--verbose] [--json]");
            std::process::exit(2);
        }
    };
    tracing::info!(seed = args.seed, "starting scenario sweep");
    if !args.json {
        println!("=== Eco Havoc Scenario Harness (seed {}) ===\n", args.seed);
    }

    let mut results = Vec::new();

    // 1. Catalog sanity
    results.extend(validate_catalog(&args));

    // 2. XP and chapter rules
    results.extend(validate_progression(&args));

    // 3. Sorting mini-game through the engine
    results.extend(validate_sorting(&args));

    // 4. World collection, depletion, respawn
    results.extend(validate_world(&args));

    // 5. Respawn cancel-safety
    results.extend(validate_stale_respawn(&args));

    // 6. Skills and economy
    results.extend(validate_skills_and_economy(&args));

    // 7. Atmosphere and passive timers
    let (final_state, final_hud, timed) = validate_timers_and_atmosphere(&args);
    results.extend(timed);

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if args.json {
        let report = Report {
            seed: args.seed,
            passed,
            failed,
            results: &results,
            final_state: &final_state,
            final_hud: &final_hud,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("failed to encode report: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || args.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed, total, failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn section(args: &Args, title: &str) {
    if !args.json {
        println!("--- {} ---", title);
    }
}

/// Walk to each waste object in turn and pick it up. Returns how many were collected.
fn collect_all(engine: &mut GameEngine, presenter: &mut RecordingPresenter) -> usize {
    let mut collected = 0;
    while let Some(v) = engine.waste_views().first().copied() {
        engine.set_player_position(v.x, v.z);
        if engine.collect_nearby_waste(presenter).is_err() {
            break;
        }
        collected += 1;
    }
    collected
}

fn idle(engine: &mut GameEngine, presenter: &mut RecordingPresenter, seconds: f32) {
    let steps = (seconds / 0.125).round() as usize;
    for _ in 0..steps {
        engine.update(0.125, MoveIntent::default(), presenter);
    }
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(args: &Args) -> Vec<TestResult> {
    section(args, "Catalog");
    let mut results = Vec::new();

    let waste = catalog::waste_types();
    check(
        &mut results,
        "waste_entries",
        waste.len() == 8,
        format!("{} entries", waste.len()),
    );

    let missing: Vec<_> = WasteCategory::ALL
        .iter()
        .filter(|c| catalog::waste_in_category(**c).next().is_none())
        .map(|c| c.label())
        .collect();
    check(
        &mut results,
        "every_bin_has_waste",
        missing.is_empty(),
        format!("categories without entries: {:?}", missing),
    );

    let values: Vec<u64> = WasteCategory::ALL.iter().map(|c| c.collect_value()).collect();
    check(
        &mut results,
        "collect_values",
        values == [80, 120, 250, 400, 600],
        format!("{:?}", values),
    );

    let districts = catalog::districts();
    let locked: Vec<usize> = (0..districts.len())
        .filter(|i| districts[*i].initially_locked())
        .collect();
    check(
        &mut results,
        "districts_locked_at_start",
        districts.len() == DISTRICT_COUNT && locked == [4, 5],
        format!("{} districts, locked {:?}", districts.len(), locked),
    );

    let chapters = catalog::chapters();
    let numbered = chapters
        .iter()
        .enumerate()
        .all(|(i, c)| c.number as usize == i + 1);
    check(
        &mut results,
        "chapters_numbered",
        chapters.len() == 6 && numbered,
        format!("{} chapters", chapters.len()),
    );

    let costs: Vec<u32> = SkillId::ALL.iter().map(|id| catalog::skill(*id).cost).collect();
    check(
        &mut results,
        "skill_costs",
        costs.iter().all(|c| *c >= 1),
        format!("{:?}", costs),
    );

    results
}

// ── 2. Progression ──────────────────────────────────────────────────────

fn validate_progression(args: &Args) -> Vec<TestResult> {
    section(args, "Progression");
    let mut results = Vec::new();
    let mut events: Vec<GameEvent> = Vec::new();

    // Single threshold crossing
    let mut s = ProgressionState::default();
    s.award_xp(150, &mut events);
    check(
        &mut results,
        "xp_single_level_up",
        s.level() == 2 && s.xp() == 50 && s.xp_next() == 150 && s.skill_points() == 3,
        format!(
            "level={} xp={} next={} sp={}",
            s.level(),
            s.xp(),
            s.xp_next(),
            s.skill_points()
        ),
    );

    // Two thresholds in one award
    let mut s = ProgressionState::default();
    let gained = s.award_xp(400, &mut events);
    check(
        &mut results,
        "xp_double_level_up",
        gained == 2 && s.level() == 3 && s.xp() == 150 && s.xp_next() == 225 && s.skill_points() == 4,
        format!(
            "gained={} level={} xp={} next={} sp={}",
            gained,
            s.level(),
            s.xp(),
            s.xp_next(),
            s.skill_points()
        ),
    );
    check(
        &mut results,
        "chapter_two_at_level_three",
        s.chapter() == 2,
        format!("chapter={}", s.chapter()),
    );

    // Correct sort at pollution 70
    let mut s = ProgressionState::default();
    let earned = s.record_correct_sort(120, &mut events);
    check(
        &mut results,
        "correct_sort_scenario",
        earned == 120
            && s.credits() == 620
            && (s.pollution() - 68.0).abs() < 1e-4
            && s.score() == 10
            && s.xp() == 15,
        format!(
            "credits={} pollution={} score={} xp={}",
            s.credits(),
            s.pollution(),
            s.score(),
            s.xp()
        ),
    );

    // Wrong sort never drops score below zero
    let mut s = ProgressionState::default();
    s.record_wrong_sort(&mut events);
    check(
        &mut results,
        "wrong_sort_saturates",
        s.score() == 0 && (s.pollution() - 71.0).abs() < 1e-4,
        format!("score={} pollution={}", s.score(), s.pollution()),
    );

    // Chapter formula over a level sweep
    let mut previous = 0;
    let mut monotonic = true;
    for level in 1..=40 {
        let ch = chapter_for_level(level);
        monotonic &= ch >= previous && ch <= 6;
        previous = ch;
    }
    check(
        &mut results,
        "chapter_monotonic",
        monotonic && chapter_for_level(40) == 6,
        format!("chapter(40)={}", chapter_for_level(40)),
    );

    // District gates
    let mut s = ProgressionState::default();
    let mut gate4 = None;
    let mut gate5 = None;
    while s.level() < 20 {
        s.award_xp(100, &mut events);
        if gate4.is_none() && s.is_district_unlocked(4) {
            gate4 = Some(s.chapter());
        }
        if gate5.is_none() && s.is_district_unlocked(5) {
            gate5 = Some(s.chapter());
        }
    }
    check(
        &mut results,
        "district_gates",
        gate4 == Some(4) && gate5 == Some(6),
        format!("slum at chapter {:?}, smart city at chapter {:?}", gate4, gate5),
    );

    results
}

// ── 3. Sorting ──────────────────────────────────────────────────────────

fn validate_sorting(args: &Args) -> Vec<TestResult> {
    section(args, "Sorting Mini-Game");
    let mut results = Vec::new();
    let mut engine = GameEngine::new(args.config.clone(), args.seed);
    let mut rec = RecordingPresenter::default();
    engine.start(&mut rec);
    engine.open_panel(Panel::Sorting, &mut rec);

    let options = engine.sorting().options().to_vec();
    let target_offered = options.contains(&engine.sorting().target());
    check(
        &mut results,
        "round_offers_target",
        options.len() == 4 && target_offered,
        format!("{} options, target offered: {}", options.len(), target_offered),
    );

    // Bin before select
    let before = engine.state().clone();
    let refused = engine.resolve_bin_choice(WasteCategory::Metal, &mut rec);
    check(
        &mut results,
        "bin_without_selection",
        refused == Err(Rejection::NothingSelected) && engine.state() == &before,
        format!("{:?}", refused.err()),
    );

    // Not-offered key
    let stray = catalog::waste_types()
        .iter()
        .map(|w| w.key)
        .find(|k| !options.contains(k));
    if let Some(key) = stray {
        let refused = engine.select_sorting_candidate(key, &mut rec);
        check(
            &mut results,
            "select_not_offered",
            refused == Err(Rejection::NotOffered),
            format!("{:?}", refused.err()),
        );
    }

    // Correct bin
    let key = options[0];
    let entry = catalog::waste(key);
    let credits = engine.state().credits();
    let outcome = engine
        .select_sorting_candidate(key, &mut rec)
        .and_then(|_| engine.resolve_bin_choice(entry.category, &mut rec));
    match outcome {
        Ok(o) => check(
            &mut results,
            "correct_bin",
            o.correct && engine.state().credits() == credits + entry.value,
            format!("+{} credits for {}", o.earned, entry.name),
        ),
        Err(e) => check(&mut results, "correct_bin", false, e.to_string()),
    }

    // Wrong bin, on a fresh round
    engine.request_new_sorting_round(&mut rec);
    let key = engine.sorting().options()[0];
    let right = catalog::waste(key).category;
    let wrong = WasteCategory::ALL
        .into_iter()
        .find(|c| *c != right)
        .unwrap_or(WasteCategory::Hazardous);
    let flashes = rec.count(|c| *c == PresenterCall::DamageFlash);
    let outcome = engine
        .select_sorting_candidate(key, &mut rec)
        .and_then(|_| engine.resolve_bin_choice(wrong, &mut rec));
    let flashed = rec.count(|c| *c == PresenterCall::DamageFlash) == flashes + 1;
    check(
        &mut results,
        "wrong_bin_flashes",
        matches!(outcome, Ok(ref o) if !o.correct) && flashed,
        format!("binned {} as {}", catalog::waste(key).name, wrong.label()),
    );

    let fact_shown = match rec.last_panel() {
        Some((Panel::Sorting, PanelData::Sorting(panel))) => panel.fact.is_some(),
        _ => false,
    };
    check(
        &mut results,
        "fact_after_resolution",
        fact_shown,
        "sorting panel shows the item's fact".into(),
    );

    results
}

// ── 4. World ────────────────────────────────────────────────────────────

fn validate_world(args: &Args) -> Vec<TestResult> {
    section(args, "World Collection");
    let mut results = Vec::new();
    let mut engine = GameEngine::new(args.config.clone(), args.seed);
    let mut rec = RecordingPresenter::default();
    engine.start(&mut rec);

    let district = &catalog::districts()[engine.state().current_district()];
    let expected = 10 + district.base_pollution as usize / 10;
    check(
        &mut results,
        "initial_population",
        engine.waste_remaining() == expected,
        format!("{} waste in {}", engine.waste_remaining(), district.name),
    );

    // Far corner is out of reach of everything spawned
    let bound = args.config.world_bound;
    engine.set_player_position(bound, bound);
    let before = engine.state().clone();
    let refused = engine.collect_nearby_waste(&mut rec);
    check(
        &mut results,
        "nothing_nearby",
        refused == Err(Rejection::NothingNearby) && engine.state() == &before,
        format!("{:?}", refused.err()),
    );

    let collected = collect_all(&mut engine, &mut rec);
    let clean = engine.state().district_clean()[engine.state().current_district()];
    check(
        &mut results,
        "depletion",
        collected == expected && engine.waste_remaining() == 0,
        format!("collected {}, clean {}%", collected, clean),
    );
    check(
        &mut results,
        "clean_step",
        clean == args.config.district_clean_step.min(100),
        format!("clean {}%", clean),
    );

    idle(&mut engine, &mut rec, args.config.respawn_delay + 0.25);
    check(
        &mut results,
        "respawn_after_delay",
        engine.waste_remaining() == expected && engine.pending_respawn().is_none(),
        format!("{} waste after respawn", engine.waste_remaining()),
    );

    // Clean caps at 100 after repeated clears
    for _ in 0..6 {
        collect_all(&mut engine, &mut rec);
        idle(&mut engine, &mut rec, args.config.respawn_delay + 0.25);
    }
    let clean = engine.state().district_clean()[engine.state().current_district()];
    check(
        &mut results,
        "clean_capped",
        clean == 100,
        format!("clean {}%", clean),
    );

    results
}

// ── 5. Stale respawn ────────────────────────────────────────────────────

fn validate_stale_respawn(args: &Args) -> Vec<TestResult> {
    section(args, "Respawn Cancel-Safety");
    let mut results = Vec::new();
    let mut engine = GameEngine::new(args.config.clone(), args.seed);
    let mut rec = RecordingPresenter::default();
    engine.start(&mut rec);

    collect_all(&mut engine, &mut rec);
    let scheduled = engine.pending_respawn().cloned();
    check(
        &mut results,
        "respawn_scheduled",
        scheduled.is_some(),
        format!("{:?}", scheduled.map(|p| p.district)),
    );

    let target = if engine.state().current_district() == 2 { 3 } else { 2 };
    let switched = engine.set_current_district(target, &mut rec);
    let after_switch = engine.waste_remaining();
    idle(&mut engine, &mut rec, args.config.respawn_delay * 2.0);
    check(
        &mut results,
        "old_district_not_repopulated",
        switched.is_ok()
            && engine.state().current_district() == target
            && engine.waste_remaining() == after_switch
            && engine.pending_respawn().is_none(),
        format!(
            "district {} holds {} waste (was {})",
            engine.state().current_district(),
            engine.waste_remaining(),
            after_switch
        ),
    );

    let refused = engine.set_current_district(4, &mut rec);
    check(
        &mut results,
        "locked_district_refused",
        refused == Err(Rejection::DistrictLocked) && engine.state().current_district() == target,
        format!("{:?}", refused.err()),
    );

    results
}

// ── 6. Skills & economy ─────────────────────────────────────────────────

fn validate_skills_and_economy(args: &Args) -> Vec<TestResult> {
    section(args, "Skills & Economy");
    let mut results = Vec::new();
    let mut engine = GameEngine::new(args.config.clone(), args.seed);
    let mut rec = RecordingPresenter::default();
    engine.start(&mut rec);

    let sp = engine.state().skill_points();
    let first = engine.unlock_skill(SkillId::Speed, &mut rec);
    let after_first = engine.state().clone();
    let second = engine.unlock_skill(SkillId::Speed, &mut rec);
    check(
        &mut results,
        "skill_unlock_idempotent",
        first.is_ok()
            && second == Err(Rejection::SkillAlreadyUnlocked)
            && engine.state() == &after_first
            && after_first.skill_points() + catalog::skill(SkillId::Speed).cost == sp,
        format!("skill points {} -> {}", sp, after_first.skill_points()),
    );

    let broke = engine.unlock_skill(SkillId::Speaker, &mut rec);
    check(
        &mut results,
        "skill_needs_points",
        matches!(broke, Err(Rejection::InsufficientSkillPoints { .. }))
            && engine.state() == &after_first,
        format!("{:?}", broke.err()),
    );

    // Faster walking
    let x0 = engine.player().x;
    let z0 = engine.player().z;
    let forward = MoveIntent {
        forward: true,
        ..MoveIntent::default()
    };
    for _ in 0..8 {
        engine.update(0.125, forward, &mut rec);
    }
    let moved = engine.player().distance_sq(x0, z0).sqrt();
    check(
        &mut results,
        "speed_skill_walk",
        (moved - args.config.boosted_walk_speed).abs() < 0.05,
        format!("moved {:.2} in 1s", moved),
    );

    let credits = engine.state().credits();
    let park = engine.build_economy_asset(EconomyAsset::Park, &mut rec);
    check(
        &mut results,
        "build_park",
        park.is_ok()
            && engine.state().credits() + EconomyAsset::Park.cost() == credits
            && engine.state().economy().count(EconomyAsset::Park) == 1,
        format!("credits {} -> {}", credits, engine.state().credits()),
    );

    let before = engine.state().clone();
    let refused = engine.build_economy_asset(EconomyAsset::Factory, &mut rec);
    check(
        &mut results,
        "build_needs_credits",
        matches!(refused, Err(Rejection::InsufficientCredits { .. })) && engine.state() == &before,
        format!("{:?}", refused.err()),
    );

    results
}

// ── 7. Timers & atmosphere ──────────────────────────────────────────────

fn validate_timers_and_atmosphere(args: &Args) -> (ProgressionState, HudSnapshot, Vec<TestResult>) {
    section(args, "Timers & Atmosphere");
    let mut results = Vec::new();
    let cfg = &args.config;
    let mut engine = GameEngine::new(cfg.clone(), args.seed);
    let mut rec = RecordingPresenter::default();
    engine.start(&mut rec);

    let bank = engine.build_economy_asset(EconomyAsset::Bank, &mut rec);
    let credits = engine.state().credits();
    let pollution = engine.state().pollution();

    let soak = cfg.creep_interval.max(cfg.income_interval) * 2.0;
    idle(&mut engine, &mut rec, soak);

    let paydays = (soak / cfg.income_interval).floor() as u64;
    let expected_credits = credits + paydays * cfg.income_per_bank;
    check(
        &mut results,
        "bank_income",
        bank.is_ok() && engine.state().credits() == expected_credits,
        format!(
            "{} paydays, credits {} -> {}",
            paydays,
            credits,
            engine.state().credits()
        ),
    );

    let creeps = (soak / cfg.creep_interval).floor();
    let expected_pollution = (pollution + creeps * cfg.creep_amount).min(100.0);
    check(
        &mut results,
        "pollution_creep",
        (engine.state().pollution() - expected_pollution).abs() < 1e-3,
        format!("pollution {} -> {}", pollution, engine.state().pollution()),
    );

    let applied = rec.calls.iter().rev().find_map(|c| match c {
        PresenterCall::Atmosphere(a) => Some(*a),
        _ => None,
    });
    check(
        &mut results,
        "atmosphere_follows_pollution",
        applied == Some(Atmosphere::from_pollution(engine.state().pollution())),
        format!("{:?}", applied.map(|a| a.sky_rgb)),
    );

    let dirty = Atmosphere::from_pollution(100.0);
    let clean = Atmosphere::from_pollution(0.0);
    check(
        &mut results,
        "atmosphere_range",
        dirty.fog_density > clean.fog_density && dirty.smog_opacity > clean.smog_opacity,
        format!("fog {} .. {}", clean.fog_density, dirty.fog_density),
    );

    let badges = [
        PollutionStatus::from_pollution(10.0),
        PollutionStatus::from_pollution(45.0),
        PollutionStatus::from_pollution(80.0),
    ];
    check(
        &mut results,
        "pollution_badges",
        badges == [PollutionStatus::Clean, PollutionStatus::InProgress, PollutionStatus::Critical],
        badges.iter().map(|b| b.label()).collect::<Vec<_>>().join(", "),
    );

    check(
        &mut results,
        "district_status",
        DistrictStatus::classify(false, 0, 85) == DistrictStatus::Locked
            && DistrictStatus::classify(true, 80, 90) == DistrictStatus::Clean
            && DistrictStatus::classify(true, 0, 90) == DistrictStatus::Critical
            && DistrictStatus::classify(true, 0, 40) == DistrictStatus::InProgress,
        "locked / clean / critical / in progress".into(),
    );

    let minimaps = rec.count(|c| matches!(c, PresenterCall::Minimap(_)));
    let expected_minimaps = (soak / cfg.minimap_interval) as usize;
    check(
        &mut results,
        "minimap_cadence",
        minimaps + 2 >= expected_minimaps && minimaps <= expected_minimaps + 2,
        format!("{} frames over {}s", minimaps, soak),
    );

    let hud = engine.hud_snapshot();
    (engine.state().clone(), hud, results)
}
