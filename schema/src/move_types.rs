use serde::{Deserialize, Serialize};
use strum::Display;

/// Closed set of move categories. Physical and Special moves deal damage to
/// their target, Status moves apply a `MoveEffect` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    pub fn is_damaging(self) -> bool {
        matches!(self, MoveCategory::Physical | MoveCategory::Special)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    User,
    Opponent,
}

/// Non-volatile status conditions a combatant can carry between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusType {
    Sleep,
    Poison,
    Burn,
    Freeze,
    Paralysis,
}

/// What a Status-category move does to whoever it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEffect {
    Heal(u8),              // % of max HP restored
    Inflict(StatusType),   // only lands on a combatant without a status
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub category: MoveCategory,
    #[serde(default = "default_target")]
    pub target: Target,
    #[serde(default)]
    pub power: Option<u8>,
    #[serde(default)]
    pub accuracy: Option<u8>, // None never misses
    pub max_pp: u8,
    #[serde(default)]
    pub effect: Option<MoveEffect>,
}

fn default_target() -> Target {
    Target::Opponent
}

impl MoveData {
    pub fn targets_self(&self) -> bool {
        self.target == Target::User
    }

    pub fn base_power(&self) -> u8 {
        self.power.unwrap_or(0)
    }
}
