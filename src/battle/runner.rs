use crate::battle::engine::{Battle, BattleBuilder, TeamSpec};
use crate::battle::state::{BattleEvent, GameState, Side};
use crate::errors::{BattleEngineError, BattleResult, ConfigError};
use crate::player::{BattlePlayer, ItemSlot, PlayerAction};
use crate::pokemon::PokemonInst;
use schema::StatusType;
use serde::Serialize;

/// High-level battle interface for callers that think in names and sides
/// rather than engine internals. Rejected actions are logged and returned.
pub struct BattleRunner {
    battle: Battle,
}

/// Snapshot of the whole battle for API queries and JSON output
#[derive(Debug, Clone, Serialize)]
pub struct BattleInfo {
    pub turn_number: u32,
    pub turn_owner: Side,
    pub game_state: GameState,
    pub players: Vec<PlayerInfo>,
}

/// Information about a player in the battle
#[derive(Debug, Clone, Serialize)]
pub struct PlayerInfo {
    pub side: Side,
    pub player_name: String,
    pub active_pokemon: String,
    pub team: Vec<PokemonInfo>,
    pub items: Vec<ItemSlot>,
    pub fainted_count: usize,
}

/// Information about a Pokemon for API queries
#[derive(Debug, Clone, Serialize)]
pub struct PokemonInfo {
    pub name: String,
    pub current_hp: u16,
    pub max_hp: u16,
    pub is_fainted: bool,
    pub status: Option<StatusType>,
    pub moves: Vec<MoveInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveInfo {
    pub name: String,
    pub pp: u8,
    pub max_pp: u8,
}

impl From<&PokemonInst> for PokemonInfo {
    fn from(p: &PokemonInst) -> Self {
        PokemonInfo {
            name: p.name.clone(),
            current_hp: p.current_hp(),
            max_hp: p.max_hp(),
            is_fainted: p.is_fainted(),
            status: p.status.map(|s| s.kind()),
            moves: p
                .moves
                .iter()
                .map(|m| MoveInfo {
                    name: m.name.clone(),
                    pp: m.pp,
                    max_pp: m.max_pp,
                })
                .collect(),
        }
    }
}

impl BattleRunner {
    pub fn new(battle: Battle) -> Self {
        Self { battle }
    }

    /// Set up a battle from two name lists, two bags and two sets of move
    /// assignments. Fails without creating anything if either side is invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn configure(
        builder: BattleBuilder,
        player1_name: &str,
        player2_name: &str,
        roster1: &[&str],
        roster2: &[&str],
        items1: &[(&str, u8)],
        items2: &[(&str, u8)],
        moves1: &[Vec<&str>],
        moves2: &[Vec<&str>],
    ) -> Result<Self, ConfigError> {
        let team = |name: &str, roster: &[&str], items: &[(&str, u8)], moves: &[Vec<&str>]| {
            TeamSpec {
                player_name: name.to_string(),
                pokemon: roster.iter().map(|s| s.to_string()).collect(),
                moves: moves
                    .iter()
                    .map(|set| set.iter().map(|m| m.to_string()).collect())
                    .collect(),
                items: items.iter().map(|(n, c)| (n.to_string(), *c)).collect(),
            }
        };

        Self::from_teams(
            builder,
            team(player1_name, roster1, items1, moves1),
            team(player2_name, roster2, items2, moves2),
        )
    }

    pub fn from_teams(
        builder: BattleBuilder,
        team1: TeamSpec,
        team2: TeamSpec,
    ) -> Result<Self, ConfigError> {
        builder.build(team1, team2).map(Self::new).inspect_err(|e| {
            tracing::warn!(error = %e, "battle configuration rejected");
        })
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn who_starts(&self) -> Side {
        self.battle.who_starts()
    }

    // === Actions ===

    pub fn attack(
        &mut self,
        move_name: &str,
        self_targeted: bool,
        side: Side,
    ) -> BattleResult<u16> {
        let result = self.battle.attack(side, move_name, self_targeted);
        log_rejection(side, "attack", result)
    }

    pub fn use_item(&mut self, item: &str, side: Side) -> BattleResult<()> {
        let result = self.battle.use_item(side, item);
        log_rejection(side, "use item", result)
    }

    pub fn use_item_on(&mut self, item: &str, side: Side, target: &str) -> BattleResult<()> {
        let result = self.battle.use_item_on(side, item, Some(target));
        log_rejection(side, "use item", result)
    }

    pub fn switch_active(&mut self, side: Side, name: &str) -> BattleResult<()> {
        let result = self.battle.switch_active(side, name);
        log_rejection(side, "switch", result)
    }

    pub fn end_turn(&mut self) -> BattleResult<()> {
        let side = self.battle.turn_owner();
        let result = self.battle.end_turn();
        log_rejection(side, "end turn", result)
    }

    /// External timer fired for whoever is expected to act.
    pub fn expire_turn(&mut self) -> BattleResult<()> {
        let side = self.awaiting_side().unwrap_or(self.battle.turn_owner());
        let result = self.battle.expire_turn();
        log_rejection(side, "expire turn", result)
    }

    pub fn flee(&mut self, side: Side) -> BattleResult<()> {
        let result = self.battle.flee(side);
        log_rejection(side, "flee", result)
    }

    pub fn submit(&mut self, side: Side, action: &PlayerAction) -> BattleResult<Option<u16>> {
        tracing::debug!(%side, %action, "action submitted");
        let result = self.battle.submit(side, action);
        log_rejection(side, "submit", result)
    }

    // === Queries ===

    /// The side the battle is currently waiting on, if any.
    pub fn awaiting_side(&self) -> Option<Side> {
        match self.battle.game_state() {
            GameState::AwaitingAction(side) | GameState::ForcedSwitch(side) => Some(side),
            GameState::Finished(_) => None,
        }
    }

    pub fn game_state(&self) -> GameState {
        self.battle.game_state()
    }

    pub fn is_battle_ended(&self) -> bool {
        self.battle.is_finished()
    }

    pub fn get_winner(&self) -> Option<Side> {
        self.battle.winner()
    }

    pub fn get_turn_number(&self) -> u32 {
        self.battle.turn_number()
    }

    pub fn player(&self, side: Side) -> &BattlePlayer {
        self.battle.player(side)
    }

    /// Name of the Pokemon in the active slot, fainted or not.
    pub fn active_name(&self, side: Side) -> BattleResult<&str> {
        Ok(self.player(side).active_slot()?.name.as_str())
    }

    pub fn active_hp(&self, side: Side) -> BattleResult<u16> {
        Ok(self.player(side).active_slot()?.current_hp())
    }

    pub fn active_max_hp(&self, side: Side) -> BattleResult<u16> {
        Ok(self.player(side).active_slot()?.max_hp())
    }

    pub fn active_pp(&self, side: Side, move_name: &str) -> BattleResult<u8> {
        let active = self.player(side).active_slot()?;
        active.current_pp(move_name).ok_or_else(|| {
            BattleEngineError::from(crate::errors::ActionError::UnknownMove {
                pokemon: active.name.clone(),
                move_name: move_name.to_string(),
            })
        })
    }

    pub fn alive_names(&self, side: Side) -> Vec<&str> {
        self.player(side).alive_names()
    }

    pub fn dead_names(&self, side: Side) -> Vec<&str> {
        self.player(side).dead_names()
    }

    pub fn remaining_items(&self, side: Side) -> Vec<&str> {
        self.player(side).remaining_items()
    }

    pub fn get_all_events(&self) -> &[BattleEvent] {
        self.battle.events().events()
    }

    /// Get events since a certain index (for incremental updates)
    pub fn get_events_since(&self, index: usize) -> &[BattleEvent] {
        self.battle.events().events_since(index)
    }

    /// Readable lines for events since `index`.
    pub fn describe_events_since(&self, index: usize) -> Vec<String> {
        self.battle
            .events()
            .formatted_since(index, self.battle.players())
    }

    /// Get current battle information for API queries
    pub fn get_battle_info(&self) -> BattleInfo {
        let players = [Side::Player1, Side::Player2]
            .into_iter()
            .map(|side| {
                let player = self.player(side);
                let active_pokemon = player
                    .active_slot()
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                PlayerInfo {
                    side,
                    player_name: player.player_name.clone(),
                    active_pokemon,
                    team: player.team.iter().map(PokemonInfo::from).collect(),
                    items: player.items.clone(),
                    fainted_count: player.dead_names().len(),
                }
            })
            .collect();

        BattleInfo {
            turn_number: self.battle.turn_number(),
            turn_owner: self.battle.turn_owner(),
            game_state: self.battle.game_state(),
            players,
        }
    }
}

fn log_rejection<T>(side: Side, action: &str, result: BattleResult<T>) -> BattleResult<T> {
    if let Err(error) = &result {
        tracing::warn!(%side, action, %error, "action rejected");
    }
    result
}
