//! Pure game rules for Eco Havoc.
//!
//! This crate contains all game logic that is independent of any ECS,
//! renderer, or windowing runtime. Functions take plain data and return
//! results, making them unit-testable and shareable between the engine,
//! the Bevy client, and the headless simtest harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`atmosphere`] | Sky/fog/smog mapping from the pollution metric |
//! | [`catalog`] | Static tables: waste types, districts, skills, chapters, eco facts |
//! | [`city`] | Procedural city layout (buildings, roads, trees, plaza) |
//! | [`config`] | Tuning constants and JSON override loading |
//! | [`economy`] | Economy assets, passive income, market ticker |
//! | [`error`] | Player-facing rejections for refused actions |
//! | [`events`] | Events emitted by rule operations for the presentation layer |
//! | [`movement`] | Yaw-relative walking, boundary clamping, mouse-look |
//! | [`progression`] | Credits, XP, levels, chapters, pollution: the mutable game state |
//! | [`skills`] | Skill set, unlock rules, and skill effect hooks |
//! | [`sorting`] | Two-phase sorting mini-game state machine |
//! | [`timers`] | Repeating and one-shot timers in seconds |

pub mod atmosphere;
pub mod catalog;
pub mod city;
pub mod config;
pub mod economy;
pub mod error;
pub mod events;
pub mod movement;
pub mod progression;
pub mod skills;
pub mod sorting;
pub mod timers;
