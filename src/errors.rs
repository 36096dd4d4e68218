use crate::battle::state::Side;
use thiserror::Error;

/// Main error type for the Pokemon Duel battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// The catalog could not be built
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// A battle could not be configured; no battle exists
    #[error("Battle config error: {0}")]
    Config(#[from] ConfigError),
    /// A per-turn action was rejected; the battle is unchanged
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Internal consistency defect
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
}

/// Errors raised while loading or validating a catalog. These are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("malformed catalog data: {0}")]
    MalformedData(String),
    #[error("catalog has no {0}")]
    Empty(&'static str),
    #[error("duplicate {kind} name in catalog: {name}")]
    DuplicateName { kind: &'static str, name: String },
}

/// Errors raised by battle configuration. No battle is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player name must not be empty")]
    EmptyPlayerName,
    #[error("{player} roster has {size} members, expected 1 to 6")]
    InvalidRosterSize { player: String, size: usize },
    #[error("{player} roster has {roster} members but {assignments} move assignments")]
    ShapeMismatch {
        player: String,
        roster: usize,
        assignments: usize,
    },
    #[error("unknown species: {0}")]
    UnknownSpecies(String),
    #[error("{pokemon} appears more than once in {player}'s roster")]
    DuplicateCombatant { player: String, pokemon: String },
    #[error("{pokemon} was assigned {count} moves, expected exactly 4")]
    WrongMoveCount { pokemon: String, count: usize },
    #[error("unknown move: {0}")]
    UnknownMove(String),
    #[error("{pokemon} was assigned {move_name} more than once")]
    DuplicateMove { pokemon: String, move_name: String },
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("no prefab team with id {0}")]
    UnknownTeam(String),
}

/// Errors raised by a rejected per-turn action. Recoverable; the caller re-prompts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{pokemon} does not know {move_name}")]
    UnknownMove { pokemon: String, move_name: String },
    #[error("{move_name} has no PP left")]
    NoUsesLeft { move_name: String },
    #[error("no team member named {0}")]
    UnknownCombatant(String),
    #[error("cannot switch to {name}: {reason}")]
    IllegalSwitch { name: String, reason: &'static str },
    #[error("no {0} left in the bag")]
    NoSuchItem(String),
    #[error("{item} would have no effect on {pokemon}")]
    ItemNotApplicable { item: String, pokemon: String },
    #[error("{0} has no valid target")]
    NoValidTarget(String),
    #[error("{0} can only be revived while fainted")]
    IllegalState(String),
    #[error("{0} has already acted this turn")]
    TurnAlreadyActed(Side),
    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),
    #[error("waiting for {0} to send out a replacement")]
    AwaitingReplacement(Side),
    #[error("the battle is already over")]
    BattleFinished,
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// The active slot points at a fainted combatant outside a forced switch
    #[error("active Pokemon {0} is fainted")]
    ActiveFainted(String),
    /// Battle state is in an inconsistent or corrupted state
    #[error("inconsistent battle state: {0}")]
    Inconsistent(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
