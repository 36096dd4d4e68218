use crate::battle::calculators::{FixedCoin, FixedDamage};
use crate::battle::engine::{Battle, BattleBuilder, TeamSpec};
use crate::battle::state::{Side, TurnRng};
use crate::catalog::Catalog;
use crate::errors::BattleResult;
use crate::player::BattlePlayer;
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::StatusType;
use std::sync::Arc;

/// Every test shares the built-in catalog.
pub fn test_catalog() -> Arc<Catalog> {
    match Catalog::builtin() {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("Failed to load built-in catalog: {}", err),
    }
}

/// A builder for creating test Pokemon instances with common defaults.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Pikachu")
///     .with_moves(["Thunder Shock", "Quick Attack", "Swift", "Recover"])
///     .with_status(StatusType::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species: String,
    moves: [&'static str; 4],
    status: Option<StatusType>,
    current_hp: Option<u16>,
}

impl TestPokemonBuilder {
    /// Creates a new builder for a given species.
    pub fn new(species: &str) -> Self {
        Self {
            species: species.to_string(),
            moves: ["Tackle", "Quick Attack", "Swift", "Recover"],
            status: None,
            current_hp: None,
        }
    }

    pub fn with_moves(mut self, moves: [&'static str; 4]) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_status(mut self, status: StatusType) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> PokemonInst {
        let catalog = test_catalog();
        let Some(species) = catalog.species(&self.species) else {
            panic!("Unknown test species {}", self.species);
        };
        let moves = self.moves.map(|name| match catalog.move_data(name) {
            Some(data) => data,
            None => panic!("Unknown test move {}", name),
        });

        let mut pokemon = PokemonInst::new(species, moves);
        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }
        pokemon.status = self.status.map(|kind| StatusCondition::new(kind, 2));
        pokemon
    }
}

/// Creates a test player with the given team and an empty bag.
pub fn create_test_player(name: &str, team: Vec<PokemonInst>) -> BattlePlayer {
    BattlePlayer::new(name.to_string(), team, Vec::new())
}

/// Shorthand for a `TeamSpec` from literal names.
pub fn team_spec(name: &str, pokemon: &[(&str, [&str; 4])], items: &[(&str, u8)]) -> TeamSpec {
    TeamSpec {
        player_name: name.to_string(),
        pokemon: pokemon.iter().map(|(species, _)| species.to_string()).collect(),
        moves: pokemon
            .iter()
            .map(|(_, moves)| moves.iter().map(|m| m.to_string()).collect())
            .collect(),
        items: items
            .iter()
            .map(|(item, count)| (item.to_string(), *count))
            .collect(),
    }
}

/// Player 1 starts, every move hits for 30, rolls are pinned to 50.
pub fn test_builder() -> BattleBuilder {
    BattleBuilder::new(test_catalog())
        .coin(Box::new(FixedCoin(Side::Player1)))
        .damage_policy(Box::new(FixedDamage(30)))
        .rng(predictable_rng())
}

pub fn create_test_battle(team1: TeamSpec, team2: TeamSpec) -> Battle {
    assert_config_ok(test_builder().build(team1, team2))
}

/// The usual 1v1: Pikachu against Squirtle, Player 1 first.
pub fn create_1v1_battle() -> Battle {
    create_test_battle(
        team_spec(
            "Red",
            &[("Pikachu", ["Thunder Shock", "Quick Attack", "Thunder Wave", "Recover"])],
            &[("Potion", 1)],
        ),
        team_spec(
            "Blue",
            &[("Squirtle", ["Tackle", "Water Gun", "Bite", "Splash"])],
            &[("Potion", 1)],
        ),
    )
}

/// Creates a `TurnRng` that always rolls 50.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50])
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

pub fn assert_config_ok<T>(result: Result<T, crate::errors::ConfigError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected a valid configuration but got: {}", err),
    }
}
