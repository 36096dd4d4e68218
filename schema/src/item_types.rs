use crate::StatusType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restores a flat amount of HP to the active combatant.
    Heal(u16),
    /// Restores all HP and clears any status.
    FullRestore,
    /// Brings a fainted team member back.
    Revive,
    /// Cures the given status, or any status when `None`.
    StatusCure(Option<StatusType>),
}

impl ItemEffect {
    pub fn is_revive(&self) -> bool {
        matches!(self, ItemEffect::Revive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub effect: ItemEffect,
}
