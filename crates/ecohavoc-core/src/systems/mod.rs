//! Systems - logic that operates on components

mod animation;
mod collect;
mod spawn;

pub use animation::*;
pub use collect::*;
pub use spawn::*;
