// Pokemon Duel Schema - Shared catalog definitions
// This crate contains the immutable definition types that make up a battle
// catalog (species, moves, items). They carry no battle state and are loaded
// once from RON data by the main crate.

// Re-export the main types
pub use item_types::*;
pub use move_types::*;
pub use species_data::*;

pub mod item_types;
pub mod move_types;
pub mod species_data;
