use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest roster a trainer can bring into battle.
pub const MAX_TEAM_SIZE: usize = 6;

/// Number of moves every combatant is assigned at configuration.
pub const MOVES_PER_POKEMON: usize = 4;

/// Tunable battle rules. Every field has a default, so a rules file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleRules {
    /// HP restored by a revive, as a percentage of max HP.
    pub revive_hp_percent: u8,
    /// Level plugged into the standard damage formula.
    pub level: u8,
    /// When false every move hits.
    pub accuracy_checks: bool,
    /// Apply the 85-100% random damage roll.
    pub damage_variance: bool,
    /// Moves a freshly slept Pokemon fails before it wakes up.
    pub sleep_turns: u8,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            revive_hp_percent: 100,
            level: 50,
            accuracy_checks: true,
            damage_variance: true,
            sleep_turns: 2,
        }
    }
}

impl BattleRules {
    pub fn from_ron_str(content: &str) -> Result<Self, ron::error::SpannedError> {
        let rules: BattleRules = ron::from_str(content)?;
        Ok(rules.normalized())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_ron_str(&content)?)
    }

    /// Clamp values into their meaningful ranges.
    fn normalized(mut self) -> Self {
        self.revive_hp_percent = self.revive_hp_percent.clamp(1, 100);
        self.level = self.level.clamp(1, 100);
        self.sleep_turns = self.sleep_turns.clamp(1, 7);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_rules_file_uses_defaults() {
        let rules = BattleRules::from_ron_str("()").unwrap();
        assert_eq!(rules, BattleRules::default());
    }

    #[test]
    fn test_partial_rules_override_only_named_fields() {
        let rules = BattleRules::from_ron_str("(revive_hp_percent: 50, accuracy_checks: false)")
            .unwrap();
        assert_eq!(rules.revive_hp_percent, 50);
        assert!(!rules.accuracy_checks);
        assert_eq!(rules.level, 50);
        assert!(rules.damage_variance);
        assert_eq!(rules.sleep_turns, 2);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let rules =
            BattleRules::from_ron_str("(revive_hp_percent: 0, level: 200, sleep_turns: 0)")
                .unwrap();
        assert_eq!(rules.revive_hp_percent, 1);
        assert_eq!(rules.level, 100);
        assert_eq!(rules.sleep_turns, 1);
    }
}
