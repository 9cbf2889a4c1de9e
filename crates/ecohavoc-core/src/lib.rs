//! Eco Havoc Core - World Simulation Engine
//!
//! Runs the real-time side of the game: the district's pickable waste
//! objects, player movement, passive timers, and the sorting mini-game,
//! all mutating one [`ProgressionState`](ecohavoc_logic::progression::ProgressionState).
//!
//! # Architecture
//!
//! Waste objects live in a `hecs` ECS world:
//! - **Entities**: one per waste object in the current district
//! - **Components**: pure data (`GroundPos`, `Waste`, `Bobbing`)
//! - **Systems**: spawn/clear, nearest-pickup collection, animation
//!
//! Rules come from `ecohavoc-logic`. Output goes through the
//! [`Presenter`](presenter::Presenter) trait; the engine never renders.
//!
//! # Example
//!
//! ```rust,no_run
//! use ecohavoc_core::prelude::*;
//!
//! let mut engine = GameEngine::new(GameConfig::default(), 42);
//! let mut presenter = NullPresenter;
//! engine.start(&mut presenter);
//!
//! loop {
//!     engine.update(1.0 / 60.0, MoveIntent::default(), &mut presenter);
//! }
//! ```

pub mod components;
pub mod engine;
pub mod presenter;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{GameEngine, PendingRespawn, WasteView};
    pub use crate::presenter::*;
    pub use ecohavoc_logic::config::GameConfig;
    pub use ecohavoc_logic::movement::MoveIntent;
}
