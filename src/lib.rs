//! Pokemon Duel Battle Engine
//!
//! A two-trainer, turn-based creature battle: a shared read-only catalog of
//! species, moves and items, validated team setup, and a state machine that
//! resolves one action per turn with forced replacements after a faint.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod player;
pub mod pokemon;
pub mod teams;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, ItemData, ItemEffect, MoveCategory, MoveData, MoveEffect, SpeciesData, StatusType,
    Target,
};

// --- From this crate's modules (`src/`) ---

// Battle construction and the state machine.
pub use battle::calculators::{
    CoinFlip, DamagePolicy, FixedCoin, FixedDamage, RandomCoin, StandardDamage,
};
pub use battle::engine::{Battle, BattleBuilder, TeamSpec};
pub use battle::runner::{BattleInfo, BattleRunner, PlayerInfo, PokemonInfo};
pub use battle::state::{BattleEvent, EventBus, GameState, Side, TurnRng};

// Core runtime types for a battle.
pub use catalog::Catalog;
pub use config::BattleRules;
pub use player::{BattlePlayer, ItemSlot, PlayerAction};
pub use pokemon::{MoveInstance, PokemonInst, StatusCondition};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, CatalogError, CatalogResult,
    ConfigError,
};
