use crate::errors::ActionError;
use schema::{BaseStats, MoveData, SpeciesData, StatusType};
use serde::{Deserialize, Serialize};

/// A status as carried by a Pokemon. Sleep counts the moves it still sleeps through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Sleep(u8),
    Poison,
    Burn,
    Freeze,
    Paralysis,
}

impl StatusCondition {
    pub fn new(kind: StatusType, sleep_turns: u8) -> Self {
        match kind {
            StatusType::Sleep => StatusCondition::Sleep(sleep_turns),
            StatusType::Poison => StatusCondition::Poison,
            StatusType::Burn => StatusCondition::Burn,
            StatusType::Freeze => StatusCondition::Freeze,
            StatusType::Paralysis => StatusCondition::Paralysis,
        }
    }

    pub fn kind(self) -> StatusType {
        match self {
            StatusCondition::Sleep(_) => StatusType::Sleep,
            StatusCondition::Poison => StatusType::Poison,
            StatusCondition::Burn => StatusType::Burn,
            StatusCondition::Freeze => StatusType::Freeze,
            StatusCondition::Paralysis => StatusType::Paralysis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub name: String,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveInstance {
    /// Create a new move instance with max PP
    pub fn new(data: &MoveData) -> Self {
        MoveInstance {
            name: data.name.clone(),
            pp: data.max_pp,
            max_pp: data.max_pp,
        }
    }

    /// Use the move (decrease PP)
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}

/// One creature on a trainer's team. HP, PP and status are the only state
/// that changes during a battle; fainted means exactly `curr_hp == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub name: String,
    pub stats: BaseStats,
    curr_hp: u16,
    pub moves: [MoveInstance; 4],
    pub status: Option<StatusCondition>,
}

impl PokemonInst {
    /// Create a new Pokemon instance at full HP from species data and its four moves
    pub fn new(species: &SpeciesData, moves: [&MoveData; 4]) -> Self {
        PokemonInst {
            name: species.name.clone(),
            stats: species.base_stats.clone(),
            curr_hp: species.base_stats.hp,
            moves: moves.map(MoveInstance::new),
            status: None,
        }
    }

    pub fn current_hp(&self) -> u16 {
        self.curr_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.curr_hp == 0
    }

    pub fn is_full_hp(&self) -> bool {
        self.curr_hp == self.max_hp()
    }

    /// Apply damage, clamping at zero. Returns true if this blow caused fainting.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        let was_fainted = self.is_fainted();
        self.curr_hp = self.curr_hp.saturating_sub(amount);
        if self.is_fainted() {
            // A fainted Pokemon carries no status.
            self.status = None;
        }
        !was_fainted && self.is_fainted()
    }

    /// Restore HP up to the maximum. Returns the amount actually restored,
    /// which is zero at full HP or while fainted.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.is_fainted() {
            return 0;
        }
        let new_hp = self.curr_hp.saturating_add(amount).min(self.max_hp());
        let healed = new_hp - self.curr_hp;
        self.curr_hp = new_hp;
        healed
    }

    /// Bring a fainted Pokemon back with `percent` of its max HP (at least 1).
    pub fn revive(&mut self, percent: u8) -> Result<u16, ActionError> {
        if !self.is_fainted() {
            return Err(ActionError::IllegalState(self.name.clone()));
        }
        let restored = (self.max_hp() as u32 * percent.min(100) as u32 / 100).max(1) as u16;
        self.curr_hp = restored;
        self.status = None;
        Ok(restored)
    }

    /// Remaining PP for a move, or None if the move is not assigned.
    pub fn current_pp(&self, move_name: &str) -> Option<u8> {
        self.moves.iter().find(|m| m.name == move_name).map(|m| m.pp)
    }

    pub fn spend_pp(&mut self, move_name: &str) -> Result<(), ActionError> {
        let move_instance = self
            .moves
            .iter_mut()
            .find(|m| m.name == move_name)
            .ok_or_else(|| ActionError::UnknownMove {
                pokemon: self.name.clone(),
                move_name: move_name.to_string(),
            })?;

        if move_instance.use_move() {
            Ok(())
        } else {
            Err(ActionError::NoUsesLeft {
                move_name: move_name.to_string(),
            })
        }
    }

    /// Set a status if none is present. Returns whether it was applied.
    pub fn inflict_status(&mut self, status: StatusType, sleep_turns: u8) -> bool {
        if self.is_fainted() || self.status.is_some() {
            return false;
        }
        self.status = Some(StatusCondition::new(status, sleep_turns));
        true
    }

    /// Remove the current status if it matches `filter` (any status when None).
    pub fn cure_status(&mut self, filter: Option<StatusType>) -> Option<StatusType> {
        let current = self.status?.kind();
        if filter.is_some_and(|wanted| wanted != current) {
            return None;
        }
        self.status = None;
        Some(current)
    }

    #[cfg(test)]
    pub fn set_hp(&mut self, hp: u16) {
        self.curr_hp = hp.min(self.max_hp());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn pikachu() -> PokemonInst {
        let catalog = Catalog::builtin().unwrap();
        let moves = ["Thunder Shock", "Quick Attack", "Thunder Wave", "Swift"]
            .map(|m| catalog.move_data(m).unwrap());
        PokemonInst::new(catalog.species("Pikachu").unwrap(), moves)
    }

    #[test]
    fn test_new_pokemon_starts_healthy() {
        let pokemon = pikachu();
        assert_eq!(pokemon.current_hp(), pokemon.max_hp());
        assert!(!pokemon.is_fainted());
        assert_eq!(pokemon.current_pp("Thunder Shock"), Some(30));
        assert_eq!(pokemon.current_pp("Surf"), None);
    }

    #[rstest]
    #[case("graze", 10, 85)]
    #[case("exact", 95, 0)]
    #[case("overkill", 500, 0)]
    fn test_damage_clamps_at_zero(#[case] desc: &str, #[case] damage: u16, #[case] expected: u16) {
        let mut pokemon = pikachu();
        pokemon.take_damage(damage);
        assert_eq!(pokemon.current_hp(), expected, "{}", desc);
        assert_eq!(pokemon.is_fainted(), expected == 0, "{}", desc);
    }

    #[test]
    fn test_take_damage_reports_fainting_once() {
        let mut pokemon = pikachu();
        assert!(pokemon.take_damage(500));
        assert!(!pokemon.take_damage(10));
        assert_eq!(pokemon.current_hp(), 0);
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut pokemon = pikachu();
        pokemon.set_hp(90);
        assert_eq!(pokemon.heal(50), 5);
        assert_eq!(pokemon.current_hp(), 95);
        assert_eq!(pokemon.heal(50), 0);
    }

    #[test]
    fn test_heal_does_not_revive() {
        let mut pokemon = pikachu();
        pokemon.take_damage(500);
        assert_eq!(pokemon.heal(50), 0);
        assert!(pokemon.is_fainted());
    }

    #[test]
    fn test_revive_requires_fainted() {
        let mut pokemon = pikachu();
        pokemon.set_hp(40);
        assert_eq!(
            pokemon.revive(100),
            Err(ActionError::IllegalState("Pikachu".to_string()))
        );
        assert_eq!(pokemon.current_hp(), 40);
    }

    #[rstest]
    #[case(100, 95)]
    #[case(50, 47)]
    #[case(1, 1)]
    fn test_revive_restores_fraction(#[case] percent: u8, #[case] expected: u16) {
        let mut pokemon = pikachu();
        pokemon.take_damage(500);
        assert_eq!(pokemon.revive(percent), Ok(expected));
        assert_eq!(pokemon.current_hp(), expected);
        assert!(!pokemon.is_fainted());
    }

    #[test]
    fn test_spend_pp_never_goes_negative() {
        let mut pokemon = pikachu();
        pokemon.moves[0].pp = 1;
        assert_eq!(pokemon.spend_pp("Thunder Shock"), Ok(()));
        assert_eq!(
            pokemon.spend_pp("Thunder Shock"),
            Err(ActionError::NoUsesLeft {
                move_name: "Thunder Shock".to_string()
            })
        );
        assert_eq!(pokemon.current_pp("Thunder Shock"), Some(0));
    }

    #[test]
    fn test_spend_pp_on_unassigned_move() {
        let mut pokemon = pikachu();
        assert!(matches!(
            pokemon.spend_pp("Surf"),
            Err(ActionError::UnknownMove { .. })
        ));
    }

    #[test]
    fn test_status_inflict_and_cure() {
        let mut pokemon = pikachu();
        assert!(pokemon.inflict_status(StatusType::Burn, 2));
        assert!(!pokemon.inflict_status(StatusType::Sleep, 2));
        assert_eq!(pokemon.cure_status(Some(StatusType::Poison)), None);
        assert_eq!(
            pokemon.cure_status(Some(StatusType::Burn)),
            Some(StatusType::Burn)
        );
        assert_eq!(pokemon.status, None);
    }

    #[test]
    fn test_sleep_carries_its_duration() {
        let mut pokemon = pikachu();
        assert!(pokemon.inflict_status(StatusType::Sleep, 3));
        assert_eq!(pokemon.status, Some(StatusCondition::Sleep(3)));
        assert_eq!(pokemon.status.map(|s| s.kind()), Some(StatusType::Sleep));
        assert_eq!(pokemon.cure_status(None), Some(StatusType::Sleep));
    }

    #[test]
    fn test_fainting_clears_status() {
        let mut pokemon = pikachu();
        pokemon.inflict_status(StatusType::Poison, 2);
        pokemon.take_damage(500);
        assert_eq!(pokemon.status, None);
    }
}
