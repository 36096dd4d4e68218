//! The turn-based battle state machine.
//!
//! A `Battle` is created fully validated by `BattleBuilder::build` and then
//! driven one call at a time. Every action runs all of its checks before it
//! touches any state, so a rejected action leaves the battle exactly as it was.

use crate::battle::calculators::{CoinFlip, DamagePolicy, RandomCoin, StandardDamage};
use crate::battle::state::{BattleEvent, EventBus, GameState, Side, TurnRng};
use crate::catalog::Catalog;
use crate::config::{BattleRules, MAX_TEAM_SIZE, MOVES_PER_POKEMON};
use crate::errors::{ActionError, BattleResult, BattleStateError, ConfigError};
use crate::player::{BattlePlayer, ItemSlot, PlayerAction};
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::{ItemEffect, MoveCategory, MoveData, MoveEffect, StatusType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Chance in 100 that a frozen Pokemon thaws when it tries to move.
const THAW_CHANCE: u8 = 20;
/// Chance in 100 that paralysis stops a move.
const FULL_PARALYSIS_CHANCE: u8 = 25;
/// Poison and burn take this fraction of max HP at the end of the sufferer's turn.
const STATUS_DAMAGE_DIVISOR: u16 = 16;

/// Everything needed to put one trainer's side on the field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TeamSpec {
    pub player_name: String,
    /// Species names, in roster order.
    pub pokemon: Vec<String>,
    /// One list of exactly four move names per roster entry.
    pub moves: Vec<Vec<String>>,
    /// Item name and starting count.
    pub items: Vec<(String, u8)>,
}

pub struct BattleBuilder {
    catalog: Arc<Catalog>,
    rules: BattleRules,
    policy: Box<dyn DamagePolicy>,
    coin: Box<dyn CoinFlip>,
    rng: TurnRng,
}

impl BattleBuilder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            rules: BattleRules::default(),
            policy: Box::new(StandardDamage),
            coin: Box::new(RandomCoin::new()),
            rng: TurnRng::new_random(),
        }
    }

    pub fn rules(mut self, rules: BattleRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn damage_policy(mut self, policy: Box<dyn DamagePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn coin(mut self, coin: Box<dyn CoinFlip>) -> Self {
        self.coin = coin;
        self
    }

    pub fn rng(mut self, rng: TurnRng) -> Self {
        self.rng = rng;
        self
    }

    /// Validate both teams and create the battle. Nothing is created on error.
    pub fn build(mut self, team1: TeamSpec, team2: TeamSpec) -> Result<Battle, ConfigError> {
        let player1 = build_player(&self.catalog, team1)?;
        let player2 = build_player(&self.catalog, team2)?;

        let first = self.coin.flip();
        let mut bus = EventBus::new();
        bus.push(BattleEvent::BattleStarted { first });
        bus.push(BattleEvent::TurnStarted {
            turn_number: 1,
            side: first,
        });

        tracing::info!(
            player1 = %player1.player_name,
            player2 = %player2.player_name,
            %first,
            "battle configured"
        );

        Ok(Battle {
            catalog: self.catalog,
            rules: self.rules,
            policy: self.policy,
            rng: self.rng,
            players: [player1, player2],
            game_state: GameState::AwaitingAction(first),
            first,
            turn_owner: first,
            turn_number: 1,
            acted: false,
            bus,
        })
    }
}

fn build_player(catalog: &Catalog, spec: TeamSpec) -> Result<BattlePlayer, ConfigError> {
    let TeamSpec {
        player_name,
        pokemon,
        moves,
        items,
    } = spec;

    if player_name.trim().is_empty() {
        return Err(ConfigError::EmptyPlayerName);
    }
    if pokemon.is_empty() || pokemon.len() > MAX_TEAM_SIZE {
        return Err(ConfigError::InvalidRosterSize {
            player: player_name,
            size: pokemon.len(),
        });
    }
    if pokemon.len() != moves.len() {
        return Err(ConfigError::ShapeMismatch {
            player: player_name,
            roster: pokemon.len(),
            assignments: moves.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut team = Vec::with_capacity(pokemon.len());
    for (species_name, move_names) in pokemon.iter().zip(moves.iter()) {
        let species = catalog
            .species(species_name)
            .ok_or_else(|| ConfigError::UnknownSpecies(species_name.clone()))?;
        if !seen.insert(species_name.as_str()) {
            return Err(ConfigError::DuplicateCombatant {
                player: player_name,
                pokemon: species_name.clone(),
            });
        }
        let move_set = resolve_moves(catalog, species_name, move_names)?;
        team.push(PokemonInst::new(species, move_set));
    }

    let mut bag: Vec<ItemSlot> = Vec::new();
    for (item_name, count) in items {
        if catalog.item(&item_name).is_none() {
            return Err(ConfigError::UnknownItem(item_name));
        }
        match bag.iter_mut().find(|slot| slot.name == item_name) {
            Some(slot) => slot.count = slot.count.saturating_add(count),
            None => bag.push(ItemSlot {
                name: item_name,
                count,
            }),
        }
    }

    Ok(BattlePlayer::new(player_name, team, bag))
}

fn resolve_moves<'a>(
    catalog: &'a Catalog,
    pokemon: &str,
    move_names: &[String],
) -> Result<[&'a MoveData; MOVES_PER_POKEMON], ConfigError> {
    if move_names.len() != MOVES_PER_POKEMON {
        return Err(ConfigError::WrongMoveCount {
            pokemon: pokemon.to_string(),
            count: move_names.len(),
        });
    }

    let mut resolved = Vec::with_capacity(MOVES_PER_POKEMON);
    for name in move_names {
        let data = catalog
            .move_data(name)
            .ok_or_else(|| ConfigError::UnknownMove(name.clone()))?;
        if resolved.iter().any(|m: &&MoveData| m.name == data.name) {
            return Err(ConfigError::DuplicateMove {
                pokemon: pokemon.to_string(),
                move_name: name.clone(),
            });
        }
        resolved.push(data);
    }

    resolved.try_into().map_err(|_| ConfigError::WrongMoveCount {
        pokemon: pokemon.to_string(),
        count: move_names.len(),
    })
}

pub struct Battle {
    catalog: Arc<Catalog>,
    rules: BattleRules,
    policy: Box<dyn DamagePolicy>,
    rng: TurnRng,
    players: [BattlePlayer; 2],
    game_state: GameState,
    first: Side,
    // Whose turn it is. Survives a forced switch so control can be handed back.
    turn_owner: Side,
    turn_number: u32,
    // The turn owner already used its one action this turn.
    acted: bool,
    bus: EventBus,
}

impl Battle {
    // === Queries ===

    pub fn who_starts(&self) -> Side {
        self.first
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn turn_owner(&self) -> Side {
        self.turn_owner
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn has_acted(&self) -> bool {
        self.acted
    }

    pub fn winner(&self) -> Option<Side> {
        match self.game_state {
            GameState::Finished(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.game_state.is_finished()
    }

    pub fn player(&self, side: Side) -> &BattlePlayer {
        &self.players[side.to_index()]
    }

    pub fn players(&self) -> &[BattlePlayer; 2] {
        &self.players
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self, side: Side) -> &mut BattlePlayer {
        &mut self.players[side.to_index()]
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    // === Actions ===

    /// Use one of the active Pokemon's moves. Returns the effect magnitude:
    /// damage dealt, HP restored, or 1 when a status landed. 0 means it missed,
    /// had no effect, or the user's status kept it from moving.
    pub fn attack(
        &mut self,
        side: Side,
        move_name: &str,
        self_target: bool,
    ) -> BattleResult<u16> {
        self.check_can_act(side)?;

        let catalog = Arc::clone(&self.catalog);
        let opponent = side.opponent();
        let attacker = self.players[side.to_index()].active_pokemon()?;
        // The defender can never be fainted here; a forced switch resolves that first.
        self.players[opponent.to_index()].active_pokemon()?;

        let pp = attacker
            .current_pp(move_name)
            .ok_or_else(|| ActionError::UnknownMove {
                pokemon: attacker.name.clone(),
                move_name: move_name.to_string(),
            })?;
        if pp == 0 {
            return Err(ActionError::NoUsesLeft {
                move_name: move_name.to_string(),
            }
            .into());
        }
        let move_data = catalog.move_data(move_name).ok_or_else(|| {
            BattleStateError::Inconsistent(format!("{} missing from catalog", move_name))
        })?;
        let attacker_name = attacker.name.clone();

        // --- Validation done; mutate from here on ---
        if self.status_blocks_move(side)? {
            // The turn's action is used up, but no PP is spent.
            self.acted = true;
            return Ok(0);
        }
        self.players[side.to_index()]
            .active_pokemon_mut()?
            .spend_pp(move_name)?;
        self.bus.push(BattleEvent::MoveUsed {
            side,
            pokemon: attacker_name,
            move_used: move_name.to_string(),
        });

        let target_side = if self_target || move_data.targets_self() {
            side
        } else {
            opponent
        };

        let magnitude = if self.policy.hits(move_data, &self.rules, &mut self.rng) {
            self.apply_move(side, target_side, move_data)?
        } else {
            self.bus.push(BattleEvent::MoveMissed {
                side,
                move_used: move_name.to_string(),
            });
            0
        };

        tracing::debug!(%side, move_name, %target_side, magnitude, "move resolved");
        self.acted = true;
        self.resolve_faints(side);
        Ok(magnitude)
    }

    /// Sleep, freeze and paralysis checks before a move. Sleep counts down
    /// and the Pokemon acts again once it wakes; a frozen Pokemon may thaw.
    fn status_blocks_move(&mut self, side: Side) -> BattleResult<bool> {
        let pokemon = self.players[side.to_index()].active_pokemon_mut()?;
        let name = pokemon.name.clone();

        let blocked_by = match pokemon.status {
            Some(StatusCondition::Sleep(0)) => {
                pokemon.status = None;
                self.bus.push(BattleEvent::StatusEnded {
                    target: name.clone(),
                    status: StatusType::Sleep,
                });
                None
            }
            Some(StatusCondition::Sleep(turns)) => {
                pokemon.status = Some(StatusCondition::Sleep(turns - 1));
                Some(StatusType::Sleep)
            }
            Some(StatusCondition::Freeze) => {
                if self.rng.next_outcome("Thaw Check") <= THAW_CHANCE {
                    pokemon.status = None;
                    self.bus.push(BattleEvent::StatusEnded {
                        target: name.clone(),
                        status: StatusType::Freeze,
                    });
                    None
                } else {
                    Some(StatusType::Freeze)
                }
            }
            Some(StatusCondition::Paralysis) => {
                let roll = self.rng.next_outcome("Full Paralysis Check");
                (roll <= FULL_PARALYSIS_CHANCE).then_some(StatusType::Paralysis)
            }
            Some(StatusCondition::Poison) | Some(StatusCondition::Burn) | None => None,
        };

        let Some(status) = blocked_by else {
            return Ok(false);
        };
        tracing::debug!(%side, pokemon = %name, %status, "move blocked by status");
        self.bus.push(BattleEvent::MoveBlocked {
            side,
            pokemon: name,
            status,
        });
        Ok(true)
    }

    fn apply_move(
        &mut self,
        side: Side,
        target_side: Side,
        move_data: &MoveData,
    ) -> BattleResult<u16> {
        match move_data.category {
            MoveCategory::Physical | MoveCategory::Special => {
                let damage = {
                    let attacker = self.players[side.to_index()].active_pokemon()?;
                    let defender = self.players[target_side.to_index()].active_pokemon()?;
                    self.policy
                        .damage(attacker, defender, move_data, &self.rules, &mut self.rng)
                };
                let target = self.players[target_side.to_index()].active_pokemon_mut()?;
                let fainted = target.take_damage(damage);
                let target_name = target.name.clone();
                self.bus.push(BattleEvent::DamageDealt {
                    target: target_name.clone(),
                    damage,
                    remaining_hp: target.current_hp(),
                });
                if fainted {
                    self.bus.push(BattleEvent::PokemonFainted {
                        side: target_side,
                        pokemon: target_name,
                    });
                }
                Ok(damage)
            }
            MoveCategory::Status => {
                let target = self.players[target_side.to_index()].active_pokemon_mut()?;
                let magnitude = match move_data.effect {
                    Some(MoveEffect::Heal(percent)) => {
                        let amount = (target.max_hp() as u32 * percent as u32 / 100) as u16;
                        let healed = target.heal(amount);
                        if healed > 0 {
                            self.bus.push(BattleEvent::PokemonHealed {
                                target: target.name.clone(),
                                amount: healed,
                                new_hp: target.current_hp(),
                            });
                        }
                        healed
                    }
                    Some(MoveEffect::Inflict(status)) => {
                        if target.inflict_status(status, self.rules.sleep_turns) {
                            self.bus.push(BattleEvent::StatusApplied {
                                target: target.name.clone(),
                                status,
                            });
                            1
                        } else {
                            0
                        }
                    }
                    None => 0,
                };
                Ok(magnitude)
            }
        }
    }

    /// Use an item from the bag on the active Pokemon (or, for revives, on the
    /// first fainted team member).
    pub fn use_item(&mut self, side: Side, item: &str) -> BattleResult<()> {
        self.use_item_on(side, item, None)
    }

    /// Use an item on a named team member.
    pub fn use_item_on(
        &mut self,
        side: Side,
        item: &str,
        target: Option<&str>,
    ) -> BattleResult<()> {
        self.check_can_act(side)?;

        let player = &self.players[side.to_index()];
        if player.item_count(item) == 0 {
            return Err(ActionError::NoSuchItem(item.to_string()).into());
        }
        let effect = self
            .catalog
            .item(item)
            .map(|data| data.effect)
            .ok_or_else(|| ActionError::NoSuchItem(item.to_string()))?;

        let target_index = self.item_target(side, item, effect, target)?;

        // --- Validation done; mutate from here on ---
        let revive_percent = self.rules.revive_hp_percent;
        let player = &mut self.players[side.to_index()];
        let remaining = player.consume_item(item)?;
        self.bus.push(BattleEvent::ItemUsed {
            side,
            item: item.to_string(),
            remaining,
        });

        let pokemon = &mut player.team[target_index];
        match effect {
            ItemEffect::Heal(amount) => {
                let healed = pokemon.heal(amount);
                self.bus.push(BattleEvent::PokemonHealed {
                    target: pokemon.name.clone(),
                    amount: healed,
                    new_hp: pokemon.current_hp(),
                });
            }
            ItemEffect::FullRestore => {
                let healed = pokemon.heal(pokemon.max_hp());
                if healed > 0 {
                    self.bus.push(BattleEvent::PokemonHealed {
                        target: pokemon.name.clone(),
                        amount: healed,
                        new_hp: pokemon.current_hp(),
                    });
                }
                if let Some(status) = pokemon.cure_status(None) {
                    self.bus.push(BattleEvent::StatusCured {
                        target: pokemon.name.clone(),
                        status,
                    });
                }
            }
            ItemEffect::Revive => {
                let new_hp = pokemon.revive(revive_percent)?;
                self.bus.push(BattleEvent::PokemonRevived {
                    side,
                    pokemon: pokemon.name.clone(),
                    new_hp,
                });
            }
            ItemEffect::StatusCure(filter) => {
                if let Some(status) = pokemon.cure_status(filter) {
                    self.bus.push(BattleEvent::StatusCured {
                        target: pokemon.name.clone(),
                        status,
                    });
                }
            }
        }

        tracing::debug!(%side, item, remaining, "item used");
        self.acted = true;
        Ok(())
    }

    /// Pick and validate the team member an item would affect.
    fn item_target(
        &self,
        side: Side,
        item: &str,
        effect: ItemEffect,
        target: Option<&str>,
    ) -> BattleResult<usize> {
        let player = &self.players[side.to_index()];
        let first_fainted = player.first_fainted();
        if effect.is_revive() && first_fainted.is_none() {
            return Err(ActionError::NoValidTarget(item.to_string()).into());
        }

        let index = match (target, first_fainted) {
            (Some(name), _) => player
                .find_pokemon(name)
                .ok_or_else(|| ActionError::UnknownCombatant(name.to_string()))?,
            (None, Some(fainted)) if effect.is_revive() => fainted,
            (None, _) => {
                player.active_pokemon()?;
                player.active_pokemon_index
            }
        };
        let pokemon = &player.team[index];

        let not_applicable = || ActionError::ItemNotApplicable {
            item: item.to_string(),
            pokemon: pokemon.name.clone(),
        };

        match effect {
            ItemEffect::Revive => {
                if !pokemon.is_fainted() {
                    return Err(ActionError::IllegalState(pokemon.name.clone()).into());
                }
            }
            ItemEffect::Heal(_) => {
                if pokemon.is_fainted() || pokemon.is_full_hp() {
                    return Err(not_applicable().into());
                }
            }
            ItemEffect::FullRestore => {
                if pokemon.is_fainted() || (pokemon.is_full_hp() && pokemon.status.is_none()) {
                    return Err(not_applicable().into());
                }
            }
            ItemEffect::StatusCure(filter) => {
                let cures = match (pokemon.status, filter) {
                    (Some(_), None) => true,
                    (Some(current), Some(wanted)) => current.kind() == wanted,
                    (None, _) => false,
                };
                if pokemon.is_fainted() || !cures {
                    return Err(not_applicable().into());
                }
            }
        }

        Ok(index)
    }

    /// Send out a different Pokemon. Voluntary during a turn (uses up the
    /// turn's action) or mandatory after a faint.
    pub fn switch_active(&mut self, side: Side, name: &str) -> BattleResult<()> {
        match self.game_state {
            GameState::Finished(_) => Err(ActionError::BattleFinished.into()),
            GameState::ForcedSwitch(forced) => {
                if side != forced {
                    return Err(ActionError::AwaitingReplacement(forced).into());
                }
                self.replace_fainted(side, name)
            }
            GameState::AwaitingAction(_) => {
                self.check_can_act(side)?;
                let player = &self.players[side.to_index()];
                if player.active_slot()?.name == name {
                    return Err(ActionError::IllegalSwitch {
                        name: name.to_string(),
                        reason: "it is already in battle",
                    }
                    .into());
                }
                self.switch_and_announce(side, name)?;
                self.acted = true;
                Ok(())
            }
        }
    }

    fn replace_fainted(&mut self, side: Side, name: &str) -> BattleResult<()> {
        self.switch_and_announce(side, name)?;

        // Control goes to the other side. If that is the side whose turn it
        // already was, its turn continues (having acted); otherwise a fresh turn begins.
        let next = side.opponent();
        tracing::info!(%side, replacement = name, %next, "forced switch resolved");
        if next == self.turn_owner {
            self.game_state = GameState::AwaitingAction(next);
        } else {
            self.bus.push(BattleEvent::TurnEnded {
                side: self.turn_owner,
            });
            self.start_turn(next);
        }
        Ok(())
    }

    fn switch_and_announce(&mut self, side: Side, name: &str) -> BattleResult<()> {
        let player = &mut self.players[side.to_index()];
        let old_pokemon = player.active_slot()?.name.clone();
        player.switch_pokemon(name)?;
        self.bus.push(BattleEvent::PokemonSwitched {
            side,
            old_pokemon,
            new_pokemon: name.to_string(),
        });
        Ok(())
    }

    /// Hand the turn to the other side. Passing without acting is allowed.
    pub fn end_turn(&mut self) -> BattleResult<()> {
        match self.game_state {
            GameState::AwaitingAction(owner) => {
                self.apply_status_damage(owner);
                // A knockout from poison or burn hands over through the forced switch instead.
                if self.game_state == GameState::AwaitingAction(owner) {
                    self.bus.push(BattleEvent::TurnEnded { side: owner });
                    self.start_turn(owner.opponent());
                }
                Ok(())
            }
            GameState::ForcedSwitch(side) => Err(ActionError::AwaitingReplacement(side).into()),
            GameState::Finished(_) => Err(ActionError::BattleFinished.into()),
        }
    }

    /// Poison and burn damage on `side`'s active Pokemon as its turn closes.
    fn apply_status_damage(&mut self, side: Side) {
        let Ok(pokemon) = self.players[side.to_index()].active_pokemon_mut() else {
            return;
        };
        let status = match pokemon.status {
            Some(StatusCondition::Poison) => StatusType::Poison,
            Some(StatusCondition::Burn) => StatusType::Burn,
            _ => return,
        };

        let damage = (pokemon.max_hp() / STATUS_DAMAGE_DIVISOR).max(1);
        let fainted = pokemon.take_damage(damage);
        let target = pokemon.name.clone();
        self.bus.push(BattleEvent::StatusDamage {
            target: target.clone(),
            status,
            damage,
            remaining_hp: pokemon.current_hp(),
        });
        tracing::debug!(%side, pokemon = %target, %status, damage, "status damage");

        if fainted {
            self.bus.push(BattleEvent::PokemonFainted {
                side,
                pokemon: target,
            });
            self.resolve_faints(side);
        }
    }

    /// The external clock ran out. Ends the turn, or, while a replacement is
    /// pending, sends out the first Pokemon still standing.
    pub fn expire_turn(&mut self) -> BattleResult<()> {
        match self.game_state {
            GameState::ForcedSwitch(side) => {
                let player = &self.players[side.to_index()];
                let index = player.first_alive().ok_or_else(|| {
                    BattleStateError::Inconsistent(format!(
                        "{} must replace a Pokemon but has none left",
                        side
                    ))
                })?;
                let name = player.team[index].name.clone();
                tracing::info!(%side, replacement = %name, "replacement timed out");
                self.replace_fainted(side, &name)
            }
            _ => self.end_turn(),
        }
    }

    /// Run away. The other side wins.
    pub fn flee(&mut self, side: Side) -> BattleResult<()> {
        if self.is_finished() {
            return Err(ActionError::BattleFinished.into());
        }
        self.bus.push(BattleEvent::PlayerFled { side });
        self.finish(side.opponent());
        Ok(())
    }

    /// Dispatch a `PlayerAction`. Returns the effect magnitude for moves.
    pub fn submit(&mut self, side: Side, action: &PlayerAction) -> BattleResult<Option<u16>> {
        match action {
            PlayerAction::UseMove {
                move_name,
                self_target,
            } => self.attack(side, move_name, *self_target).map(Some),
            PlayerAction::UseItem { item, target } => self
                .use_item_on(side, item, target.as_deref())
                .map(|_| None),
            PlayerAction::SwitchPokemon { name } => {
                self.switch_active(side, name).map(|_| None)
            }
            PlayerAction::EndTurn => {
                self.check_can_end(side)?;
                self.end_turn().map(|_| None)
            }
            PlayerAction::Forfeit => self.flee(side).map(|_| None),
        }
    }

    /// Every action `side` could legally submit right now.
    pub fn valid_actions(&self, side: Side) -> Vec<PlayerAction> {
        let player = &self.players[side.to_index()];
        let mut actions = Vec::new();

        match self.game_state {
            GameState::Finished(_) => return actions,
            GameState::ForcedSwitch(forced) => {
                if forced == side {
                    actions.extend(player.alive_names().into_iter().map(|name| {
                        PlayerAction::SwitchPokemon {
                            name: name.to_string(),
                        }
                    }));
                }
                return actions;
            }
            GameState::AwaitingAction(owner) => {
                if owner != side {
                    actions.push(PlayerAction::Forfeit);
                    return actions;
                }
            }
        }

        if !self.acted {
            if let Ok(active) = player.active_pokemon() {
                for move_instance in active.moves.iter().filter(|m| m.pp > 0) {
                    actions.push(PlayerAction::UseMove {
                        move_name: move_instance.name.clone(),
                        self_target: false,
                    });
                }
                for name in player.alive_names() {
                    if name != active.name {
                        actions.push(PlayerAction::SwitchPokemon {
                            name: name.to_string(),
                        });
                    }
                }
            }
            for item in player.remaining_items() {
                let Some(data) = self.catalog.item(item) else {
                    continue;
                };
                if self.item_target(side, item, data.effect, None).is_ok() {
                    actions.push(PlayerAction::UseItem {
                        item: item.to_string(),
                        target: None,
                    });
                }
            }
        }
        actions.push(PlayerAction::EndTurn);
        actions.push(PlayerAction::Forfeit);
        actions
    }

    // === Internal transitions ===

    fn check_can_act(&self, side: Side) -> Result<(), ActionError> {
        match self.game_state {
            GameState::Finished(_) => Err(ActionError::BattleFinished),
            GameState::ForcedSwitch(forced) => Err(ActionError::AwaitingReplacement(forced)),
            GameState::AwaitingAction(owner) if owner != side => {
                Err(ActionError::NotYourTurn(side))
            }
            GameState::AwaitingAction(_) if self.acted => Err(ActionError::TurnAlreadyActed(side)),
            GameState::AwaitingAction(_) => Ok(()),
        }
    }

    fn check_can_end(&self, side: Side) -> Result<(), ActionError> {
        match self.game_state {
            GameState::Finished(_) => Err(ActionError::BattleFinished),
            GameState::ForcedSwitch(forced) => Err(ActionError::AwaitingReplacement(forced)),
            GameState::AwaitingAction(owner) if owner != side => {
                Err(ActionError::NotYourTurn(side))
            }
            GameState::AwaitingAction(_) => Ok(()),
        }
    }

    fn start_turn(&mut self, side: Side) {
        self.turn_owner = side;
        self.turn_number += 1;
        self.acted = false;
        self.game_state = GameState::AwaitingAction(side);
        self.bus.push(BattleEvent::TurnStarted {
            turn_number: self.turn_number,
            side,
        });
    }

    /// After a knockout: finish the battle, force a replacement, or carry on.
    fn resolve_faints(&mut self, actor: Side) {
        let opponent = actor.opponent();
        let opponent_alive = self.players[opponent.to_index()].has_any_alive();
        let actor_alive = self.players[actor.to_index()].has_any_alive();

        if !opponent_alive {
            self.bus.push(BattleEvent::PlayerDefeated { side: opponent });
            self.finish(actor);
        } else if !actor_alive {
            self.bus.push(BattleEvent::PlayerDefeated { side: actor });
            self.finish(opponent);
        } else if self.active_fainted(opponent) {
            tracing::info!(side = %opponent, "forced switch");
            self.game_state = GameState::ForcedSwitch(opponent);
        } else if self.active_fainted(actor) {
            tracing::info!(side = %actor, "forced switch");
            self.game_state = GameState::ForcedSwitch(actor);
        }
    }

    fn active_fainted(&self, side: Side) -> bool {
        self.players[side.to_index()]
            .active_slot()
            .map(|p| p.is_fainted())
            .unwrap_or(false)
    }

    fn finish(&mut self, winner: Side) {
        self.game_state = GameState::Finished(winner);
        self.bus.push(BattleEvent::BattleEnded { winner });
        tracing::info!(%winner, turns = self.turn_number, "battle finished");
    }
}
