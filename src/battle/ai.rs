//! A module for defining AI behaviors for battle opponents.

use crate::battle::engine::Battle;
use crate::battle::state::{GameState, Side};
use crate::player::PlayerAction;
use ordered_float::OrderedFloat;
use schema::{ItemEffect, MoveEffect, StatusType};

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior {
    /// Inspects the battle and decides on the next action for the given side.
    fn decide_action(&self, side: Side, battle: &Battle) -> PlayerAction;
}

/// Scores every legal action and picks the highest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringAI;

impl ScoringAI {
    pub fn new() -> Self {
        Self
    }

    fn score_action(&self, action: &PlayerAction, side: Side, battle: &Battle) -> f32 {
        match action {
            PlayerAction::UseMove { move_name, .. } => self.score_move(move_name, side, battle),
            PlayerAction::UseItem { item, .. } => self.score_item(item, side, battle),
            // Better than doing nothing, worse than almost any useful move.
            PlayerAction::SwitchPokemon { .. } => 1.0,
            PlayerAction::EndTurn => 0.0,
            PlayerAction::Forfeit => -1000.0,
        }
    }

    fn score_move(&self, move_name: &str, side: Side, battle: &Battle) -> f32 {
        let Some(move_data) = battle.catalog().move_data(move_name) else {
            return -1.0;
        };
        let Ok(attacker) = battle.player(side).active_pokemon() else {
            return -1.0;
        };
        let Ok(defender) = battle.player(side.opponent()).active_pokemon() else {
            return -1.0;
        };
        // Sure-hit moves get a slight edge.
        let accuracy = move_data.accuracy.map_or(1.01, |a| a as f32 / 100.0);

        if move_data.category.is_damaging() {
            return move_data.base_power() as f32 * accuracy;
        }

        match move_data.effect {
            Some(MoveEffect::Heal(percent)) => {
                let missing = 1.0 - hp_ratio(attacker.current_hp(), attacker.max_hp());
                // Only worth it once badly hurt.
                if missing > 0.5 {
                    percent as f32 * missing * 2.0
                } else {
                    -1.0
                }
            }
            Some(MoveEffect::Inflict(status)) => {
                // Not worth a turn once the defender is already statused or nearly down.
                let defender_health = hp_ratio(defender.current_hp(), defender.max_hp());
                if defender.status.is_some() || defender_health <= 0.5 {
                    -1.0
                } else {
                    status_value(status, battle.rules().sleep_turns) * accuracy
                }
            }
            None => -1.0,
        }
    }

    fn score_item(&self, item: &str, side: Side, battle: &Battle) -> f32 {
        let Some(data) = battle.catalog().item(item) else {
            return -1.0;
        };
        let player = battle.player(side);
        let low_hp = player
            .active_pokemon()
            .map(|p| hp_ratio(p.current_hp(), p.max_hp()) < 0.35)
            .unwrap_or(false);

        match data.effect {
            ItemEffect::FullRestore if low_hp => 90.0,
            ItemEffect::Heal(_) if low_hp => 80.0,
            ItemEffect::Revive => 40.0,
            ItemEffect::StatusCure(_) => 25.0,
            _ => -1.0,
        }
    }

    /// Pick the healthiest living teammate, by HP fraction and then raw HP.
    fn choose_replacement(&self, side: Side, battle: &Battle) -> PlayerAction {
        let player = battle.player(side);
        player
            .team
            .iter()
            .filter(|p| !p.is_fainted())
            .max_by_key(|p| {
                (
                    OrderedFloat(hp_ratio(p.current_hp(), p.max_hp())),
                    p.current_hp(),
                )
            })
            .map(|p| PlayerAction::SwitchPokemon {
                name: p.name.clone(),
            })
            .unwrap_or(PlayerAction::Forfeit)
    }
}

/// Rough worth of a status in base-power terms.
fn status_value(status: StatusType, sleep_turns: u8) -> f32 {
    match status {
        StatusType::Sleep => 40.0 * sleep_turns as f32,
        StatusType::Freeze => 80.0,
        StatusType::Paralysis => 35.0,
        StatusType::Poison | StatusType::Burn => 30.0,
    }
}

fn hp_ratio(current: u16, max: u16) -> f32 {
    current as f32 / max.max(1) as f32
}

impl Behavior for ScoringAI {
    fn decide_action(&self, side: Side, battle: &Battle) -> PlayerAction {
        match battle.game_state() {
            GameState::ForcedSwitch(forced) if forced == side => {
                return self.choose_replacement(side, battle);
            }
            GameState::AwaitingAction(owner) if owner == side => {}
            // Nothing to do out of turn.
            _ => return PlayerAction::EndTurn,
        }

        if battle.has_acted() {
            return PlayerAction::EndTurn;
        }

        battle
            .valid_actions(side)
            .into_iter()
            .map(|action| {
                let score = self.score_action(&action, side, battle);
                (action, score)
            })
            .max_by_key(|(_, score)| OrderedFloat(*score))
            .map(|(action, _)| action)
            .unwrap_or(PlayerAction::EndTurn)
    }
}
