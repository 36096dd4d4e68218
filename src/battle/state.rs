use crate::player::BattlePlayer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::StatusType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two trainers in a battle - provides type safety over raw indices
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub fn to_index(self) -> usize {
        match self {
            Side::Player1 => 0,
            Side::Player2 => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player1 => write!(f, "Player 1"),
            Side::Player2 => write!(f, "Player 2"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    /// The side may take one action, then must end its turn.
    AwaitingAction(Side),
    /// The side's active Pokemon fainted and it must send out a replacement.
    ForcedSwitch(Side),
    /// Terminal. Holds the winner.
    Finished(Side),
}

impl GameState {
    pub fn is_finished(&self) -> bool {
        matches!(self, GameState::Finished(_))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    BattleStarted {
        first: Side,
    },
    TurnStarted {
        turn_number: u32,
        side: Side,
    },
    TurnEnded {
        side: Side,
    },

    // Pokemon Actions
    PokemonSwitched {
        side: Side,
        old_pokemon: String,
        new_pokemon: String,
    },
    MoveUsed {
        side: Side,
        pokemon: String,
        move_used: String,
    },
    MoveMissed {
        side: Side,
        move_used: String,
    },
    MoveBlocked {
        side: Side,
        pokemon: String,
        status: StatusType,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonHealed {
        target: String,
        amount: u16,
        new_hp: u16,
    },
    PokemonFainted {
        side: Side,
        pokemon: String,
    },
    PokemonRevived {
        side: Side,
        pokemon: String,
        new_hp: u16,
    },
    StatusApplied {
        target: String,
        status: StatusType,
    },
    StatusCured {
        target: String,
        status: StatusType,
    },
    StatusEnded {
        target: String,
        status: StatusType,
    },
    StatusDamage {
        target: String,
        status: StatusType,
        damage: u16,
        remaining_hp: u16,
    },
    ItemUsed {
        side: Side,
        item: String,
        remaining: u8,
    },

    // Battle End
    PlayerFled {
        side: Side,
    },
    PlayerDefeated {
        side: Side,
    },
    BattleEnded {
        winner: Side,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using the players' names.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, players: &[BattlePlayer; 2]) -> Option<String> {
        let name = |side: &Side| players[side.to_index()].player_name.as_str();
        match self {
            BattleEvent::BattleStarted { first } => Some(format!("{} goes first!", name(first))),
            BattleEvent::TurnStarted { turn_number, side } => {
                Some(format!("=== Turn {} ({}) ===", turn_number, name(side)))
            }
            BattleEvent::TurnEnded { .. } => None,
            BattleEvent::PokemonSwitched {
                side,
                old_pokemon,
                new_pokemon,
            } => Some(format!(
                "{} recalled {} and sent out {}!",
                name(side),
                old_pokemon,
                new_pokemon
            )),
            BattleEvent::MoveUsed {
                side,
                pokemon,
                move_used,
            } => Some(format!("{}'s {} used {}!", name(side), pokemon, move_used)),
            BattleEvent::MoveMissed { .. } => Some("But it missed!".to_string()),
            BattleEvent::MoveBlocked {
                pokemon,
                status,
                ..
            } => Some(format!("{} {}", pokemon, Self::format_status_blocked(*status))),
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::PokemonHealed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),
            BattleEvent::PokemonRevived { pokemon, .. } => {
                Some(format!("{} was revived!", pokemon))
            }
            BattleEvent::StatusApplied { target, status } => {
                Some(format!("{} {}", target, Self::format_status_applied(*status)))
            }
            BattleEvent::StatusCured { target, status } => {
                Some(format!("{} was cured of its {}!", target, status))
            }
            BattleEvent::StatusEnded { target, status } => match status {
                StatusType::Sleep => Some(format!("{} woke up!", target)),
                StatusType::Freeze => Some(format!("{} thawed out!", target)),
                _ => Some(format!("{} is no longer affected by {}.", target, status)),
            },
            BattleEvent::StatusDamage { target, status, .. } => {
                Some(format!("{} is hurt by its {}!", target, status))
            }
            BattleEvent::ItemUsed { side, item, .. } => {
                Some(format!("{} used a {}!", name(side), item))
            }
            BattleEvent::PlayerFled { side } => Some(format!("{} fled the battle!", name(side))),
            BattleEvent::PlayerDefeated { side } => {
                Some(format!("{} is out of usable Pokemon!", name(side)))
            }
            BattleEvent::BattleEnded { winner } => {
                Some(format!("{} has won the battle!", name(winner)))
            }
        }
    }

    fn format_status_applied(status: StatusType) -> &'static str {
        match status {
            StatusType::Sleep => "fell asleep!",
            StatusType::Poison => "was poisoned!",
            StatusType::Burn => "was burned!",
            StatusType::Freeze => "was frozen solid!",
            StatusType::Paralysis => "is paralyzed! It may be unable to move!",
        }
    }

    fn format_status_blocked(status: StatusType) -> &'static str {
        match status {
            StatusType::Sleep => "is fast asleep.",
            StatusType::Freeze => "is frozen solid!",
            StatusType::Paralysis => "is paralyzed! It can't move!",
            StatusType::Poison | StatusType::Burn => "can't move!",
        }
    }
}

/// Event bus for collecting battle events in the order they happened.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        tracing::trace!(?event, "battle event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Events recorded at or after `index`, for incremental rendering.
    pub fn events_since(&self, index: usize) -> &[BattleEvent] {
        self.events.get(index..).unwrap_or(&[])
    }

    /// Human-readable lines for every non-silent event from `index` on.
    pub fn formatted_since(&self, index: usize, players: &[BattlePlayer; 2]) -> Vec<String> {
        self.events_since(index)
            .iter()
            .filter_map(|event| event.format(players))
            .collect()
    }

    /// Print every event under a heading. Test output only.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        print!("{}", self);
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    /// Shows debug format of all events.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Random(StdRng),
}

/// Source of 1..=100 rolls for accuracy checks, damage variance and coin flips.
/// Tests script the sequence; once a script runs out its last value repeats.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted {
                outcomes,
                index: 0,
            },
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Random(StdRng::from_os_rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Random(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                let value = outcomes
                    .get(*index)
                    .or_else(|| outcomes.last())
                    .copied()
                    .unwrap_or(50);
                *index += 1;
                value
            }
            RngSource::Random(rng) => rng.random_range(1..=100),
        };
        tracing::trace!(outcome, reason, "rng consumed");
        outcome
    }
}
