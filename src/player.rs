use crate::errors::{ActionError, BattleStateError};
use crate::pokemon::PokemonInst;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One action a contestant can take on its turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    UseMove {
        move_name: String,
        self_target: bool,
    },
    UseItem {
        item: String,
        target: Option<String>,
    },
    SwitchPokemon { name: String },
    EndTurn,
    Forfeit,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::UseMove {
                move_name,
                self_target: false,
            } => write!(f, "use {}", move_name),
            PlayerAction::UseMove {
                move_name,
                self_target: true,
            } => write!(f, "use {} on itself", move_name),
            PlayerAction::UseItem {
                item,
                target: Some(target),
            } => write!(f, "use {} on {}", item, target),
            PlayerAction::UseItem { item, target: None } => write!(f, "use {}", item),
            PlayerAction::SwitchPokemon { name } => write!(f, "switch to {}", name),
            PlayerAction::EndTurn => write!(f, "end turn"),
            PlayerAction::Forfeit => write!(f, "flee"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemSlot {
    pub name: String,
    pub count: u8,
}

/// A trainer's side of the battle: the team, which member is out, and the bag.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattlePlayer {
    pub player_name: String,

    // 1-6 Pokemon, in the order they were configured.
    pub team: Vec<PokemonInst>,

    // Index into `team` of the Pokemon currently out.
    pub active_pokemon_index: usize,

    // Bag contents in configuration order. Counts may reach zero.
    pub items: Vec<ItemSlot>,
}

impl BattlePlayer {
    /// Create a new BattlePlayer. The first team member starts active.
    pub fn new(player_name: String, team: Vec<PokemonInst>, items: Vec<ItemSlot>) -> Self {
        BattlePlayer {
            player_name,
            team,
            active_pokemon_index: 0,
            items,
        }
    }

    /// Get the currently active Pokemon. Fails if it is fainted, which only
    /// the forced-switch phase tolerates (see `active_slot`).
    pub fn active_pokemon(&self) -> Result<&PokemonInst, BattleStateError> {
        let pokemon = self.active_slot()?;
        if pokemon.is_fainted() {
            return Err(BattleStateError::ActiveFainted(pokemon.name.clone()));
        }
        Ok(pokemon)
    }

    /// Get the currently active Pokemon mutably
    pub fn active_pokemon_mut(&mut self) -> Result<&mut PokemonInst, BattleStateError> {
        let index = self.active_pokemon_index;
        let pokemon = self.team.get_mut(index).ok_or_else(|| {
            BattleStateError::Inconsistent(format!("active index {} out of range", index))
        })?;
        if pokemon.is_fainted() {
            return Err(BattleStateError::ActiveFainted(pokemon.name.clone()));
        }
        Ok(pokemon)
    }

    /// The active slot regardless of whether its occupant has fainted.
    pub fn active_slot(&self) -> Result<&PokemonInst, BattleStateError> {
        self.team.get(self.active_pokemon_index).ok_or_else(|| {
            BattleStateError::Inconsistent(format!(
                "active index {} out of range",
                self.active_pokemon_index
            ))
        })
    }

    pub fn find_pokemon(&self, name: &str) -> Option<usize> {
        self.team.iter().position(|p| p.name == name)
    }

    pub fn alive_names(&self) -> Vec<&str> {
        self.team
            .iter()
            .filter(|p| !p.is_fainted())
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn dead_names(&self) -> Vec<&str> {
        self.team
            .iter()
            .filter(|p| p.is_fainted())
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn has_any_alive(&self) -> bool {
        self.team.iter().any(|p| !p.is_fainted())
    }

    /// Switch the active Pokemon. Touches nothing but the active index.
    pub fn switch_pokemon(&mut self, name: &str) -> Result<usize, ActionError> {
        let index = self
            .find_pokemon(name)
            .ok_or_else(|| ActionError::UnknownCombatant(name.to_string()))?;

        if self.team[index].is_fainted() {
            return Err(ActionError::IllegalSwitch {
                name: name.to_string(),
                reason: "it has fainted",
            });
        }

        self.active_pokemon_index = index;
        Ok(index)
    }

    pub fn item_count(&self, name: &str) -> u8 {
        self.items
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| slot.count)
            .unwrap_or(0)
    }

    /// Remove one of an item from the bag. Returns how many are left.
    pub fn consume_item(&mut self, name: &str) -> Result<u8, ActionError> {
        match self.items.iter_mut().find(|slot| slot.name == name) {
            Some(slot) if slot.count > 0 => {
                slot.count -= 1;
                Ok(slot.count)
            }
            _ => Err(ActionError::NoSuchItem(name.to_string())),
        }
    }

    /// Names of items with at least one left.
    pub fn remaining_items(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|slot| slot.count > 0)
            .map(|slot| slot.name.as_str())
            .collect()
    }

    /// First fainted team member, the default revive target.
    pub fn first_fainted(&self) -> Option<usize> {
        self.team.iter().position(|p| p.is_fainted())
    }

    /// First living team member, used when a replacement choice times out.
    pub fn first_alive(&self) -> Option<usize> {
        self.team.iter().position(|p| !p.is_fainted())
    }
}
