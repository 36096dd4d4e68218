//! Pluggable policies: how hard a move hits and who moves first.
//!
//! The engine only relies on two contracts. A miss yields a magnitude of
//! exactly zero and leaves the target untouched. A hit yields a non-negative
//! magnitude. Everything else about the formula belongs to the policy.

use crate::battle::state::{Side, TurnRng};
use crate::config::BattleRules;
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::{MoveCategory, MoveData};
use std::fmt;

pub trait DamagePolicy: fmt::Debug + Send {
    /// Roll whether the move connects.
    fn hits(&self, move_data: &MoveData, rules: &BattleRules, rng: &mut TurnRng) -> bool;

    /// Damage dealt by a damaging move that connected. Status moves deal 0.
    fn damage(
        &self,
        attacker: &PokemonInst,
        defender: &PokemonInst,
        move_data: &MoveData,
        rules: &BattleRules,
        rng: &mut TurnRng,
    ) -> u16;
}

/// Accuracy roll against the move's accuracy, then a level/power/stat formula
/// with an optional 85-100% random factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDamage;

impl DamagePolicy for StandardDamage {
    fn hits(&self, move_data: &MoveData, rules: &BattleRules, rng: &mut TurnRng) -> bool {
        if !rules.accuracy_checks {
            return true;
        }
        // If move has no accuracy value, it never misses (like Swift)
        let Some(accuracy) = move_data.accuracy else {
            return true;
        };
        rng.next_outcome("accuracy") <= accuracy.clamp(1, 100)
    }

    fn damage(
        &self,
        attacker: &PokemonInst,
        defender: &PokemonInst,
        move_data: &MoveData,
        rules: &BattleRules,
        rng: &mut TurnRng,
    ) -> u16 {
        let power = move_data.base_power() as u32;
        if power == 0 {
            return 0;
        }

        let (attack, defense) = match move_data.category {
            MoveCategory::Physical => {
                let mut attack = attacker.stats.attack as u32;
                if attacker.status == Some(StatusCondition::Burn) {
                    attack /= 2;
                }
                (attack, defender.stats.defense as u32)
            }
            MoveCategory::Special => (
                attacker.stats.sp_attack as u32,
                defender.stats.sp_defense as u32,
            ),
            MoveCategory::Status => return 0,
        };

        let level = rules.level as u32;
        let base = ((2 * level / 5 + 2) * power * attack.max(1) / defense.max(1)) / 50 + 2;

        let factor = if rules.damage_variance {
            let roll = rng.next_outcome("damage variance") as u32;
            85 + (roll.saturating_sub(1) * 16) / 100
        } else {
            100
        };

        (base * factor / 100).clamp(1, u16::MAX as u32) as u16
    }
}

/// Every move hits for the same amount. Used to pin outcomes in tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedDamage(pub u16);

impl DamagePolicy for FixedDamage {
    fn hits(&self, _move_data: &MoveData, _rules: &BattleRules, _rng: &mut TurnRng) -> bool {
        true
    }

    fn damage(
        &self,
        _attacker: &PokemonInst,
        _defender: &PokemonInst,
        move_data: &MoveData,
        _rules: &BattleRules,
        _rng: &mut TurnRng,
    ) -> u16 {
        if move_data.category.is_damaging() {
            self.0
        } else {
            0
        }
    }
}

/// Decides which side takes the first turn.
pub trait CoinFlip {
    fn flip(&mut self) -> Side;
}

#[derive(Debug, Clone)]
pub struct RandomCoin {
    rng: TurnRng,
}

impl RandomCoin {
    pub fn new() -> Self {
        Self {
            rng: TurnRng::new_random(),
        }
    }

    pub fn with_rng(rng: TurnRng) -> Self {
        Self { rng }
    }
}

impl Default for RandomCoin {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinFlip for RandomCoin {
    fn flip(&mut self) -> Side {
        if self.rng.next_outcome("coin flip") <= 50 {
            Side::Player1
        } else {
            Side::Player2
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedCoin(pub Side);

impl CoinFlip for FixedCoin {
    fn flip(&mut self) -> Side {
        self.0
    }
}
