use crate::battle::engine::TeamSpec;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

const PREFAB_TEAMS: &str = include_str!("../data/teams.ron");

/// A predefined team configuration for demos and scripted battles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pokemon: Vec<PokemonTemplate>,
    #[serde(default)]
    pub items: Vec<(String, u8)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonTemplate {
    pub species: String,
    pub moves: Vec<String>,
}

// Lazy-loaded team data
static TEAM_DATA: LazyLock<HashMap<String, TeamTemplate>> = LazyLock::new(|| {
    match ron::from_str::<Vec<TeamTemplate>>(PREFAB_TEAMS) {
        Ok(teams) => teams.into_iter().map(|t| (t.id.clone(), t)).collect(),
        Err(e) => {
            tracing::error!(error = %e, "prefab team data is malformed");
            HashMap::new()
        }
    }
});

impl TeamTemplate {
    /// Turn the template into a configuration for `player_name`.
    pub fn to_team_spec(&self, player_name: &str) -> TeamSpec {
        TeamSpec {
            player_name: player_name.to_string(),
            pokemon: self.pokemon.iter().map(|p| p.species.clone()).collect(),
            moves: self.pokemon.iter().map(|p| p.moves.clone()).collect(),
            items: self.items.clone(),
        }
    }
}

/// Get all available team IDs, sorted
pub fn get_available_team_ids() -> Vec<String> {
    let mut ids: Vec<String> = TEAM_DATA.keys().cloned().collect();
    ids.sort();
    ids
}

/// Get team information without building anything
pub fn get_team_info(team_id: &str) -> Option<&'static TeamTemplate> {
    TEAM_DATA.get(team_id)
}

/// Look up a prefab team and build its configuration for `player_name`
pub fn create_team_spec(team_id: &str, player_name: &str) -> Result<TeamSpec, ConfigError> {
    get_team_info(team_id)
        .map(|team| team.to_team_spec(player_name))
        .ok_or_else(|| ConfigError::UnknownTeam(team_id.to_string()))
}
