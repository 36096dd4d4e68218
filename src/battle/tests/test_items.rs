#[cfg(test)]
mod tests {
    use crate::battle::engine::Battle;
    use crate::battle::state::{BattleEvent, Side};
    use crate::battle::tests::common::{assert_ok, create_test_battle, team_spec, test_builder};
    use crate::config::BattleRules;
    use crate::errors::{ActionError, BattleEngineError};
    use crate::pokemon::StatusCondition;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatusType;

    const MOVES: [&str; 4] = ["Tackle", "Quick Attack", "Swift", "Splash"];

    fn bag_battle(items: &[(&str, u8)]) -> Battle {
        create_test_battle(
            team_spec("Red", &[("Pikachu", MOVES), ("Charmander", MOVES)], items),
            team_spec("Blue", &[("Squirtle", MOVES)], &[]),
        )
    }

    fn action_err(err: ActionError) -> Result<(), BattleEngineError> {
        Err(BattleEngineError::Action(err))
    }

    #[test]
    fn test_potion_heals_active_and_is_consumed() {
        let mut battle = bag_battle(&[("Potion", 2)]);
        battle.player_mut(Side::Player1).team[0].set_hp(50);

        assert_ok(battle.use_item(Side::Player1, "Potion"));

        let red = battle.player(Side::Player1);
        assert_eq!(red.active_pokemon().unwrap().current_hp(), 70);
        assert_eq!(red.item_count("Potion"), 1);
        assert!(battle.has_acted());
        assert!(battle.events().events().contains(&BattleEvent::ItemUsed {
            side: Side::Player1,
            item: "Potion".to_string(),
            remaining: 1
        }));
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut battle = bag_battle(&[("Hyper Potion", 1)]);
        battle.player_mut(Side::Player1).team[0].set_hp(90);

        assert_ok(battle.use_item(Side::Player1, "Hyper Potion"));

        let pikachu = battle.player(Side::Player1).active_pokemon().unwrap();
        assert_eq!(pikachu.current_hp(), 95);
    }

    #[test]
    fn test_heal_at_full_hp_fails_without_consuming() {
        let mut battle = bag_battle(&[("Potion", 1)]);

        assert_eq!(
            battle.use_item(Side::Player1, "Potion"),
            action_err(ActionError::ItemNotApplicable {
                item: "Potion".to_string(),
                pokemon: "Pikachu".to_string()
            })
        );
        assert_eq!(battle.player(Side::Player1).item_count("Potion"), 1);
        assert!(!battle.has_acted());
    }

    #[rstest]
    #[case::never_packed("Super Potion")]
    #[case::not_in_catalog("Rare Candy")]
    fn test_missing_item(#[case] item: &str) {
        let mut battle = bag_battle(&[("Potion", 1)]);
        battle.player_mut(Side::Player1).team[0].set_hp(10);

        assert_eq!(
            battle.use_item(Side::Player1, item),
            action_err(ActionError::NoSuchItem(item.to_string()))
        );
    }

    #[test]
    fn test_used_up_item() {
        let mut battle = bag_battle(&[("Potion", 1)]);
        battle.player_mut(Side::Player1).team[0].set_hp(10);

        assert_ok(battle.use_item(Side::Player1, "Potion"));
        assert_ok(battle.end_turn());
        assert_ok(battle.end_turn());

        assert_eq!(
            battle.use_item(Side::Player1, "Potion"),
            action_err(ActionError::NoSuchItem("Potion".to_string()))
        );
        assert!(battle.player(Side::Player1).remaining_items().is_empty());
    }

    #[rstest]
    #[case::no_target(None)]
    #[case::healthy_target(Some("Charmander"))]
    #[case::unknown_target(Some("Mew"))]
    fn test_revive_without_fainted_member(#[case] target: Option<&str>) {
        let mut battle = bag_battle(&[("Revive", 1)]);

        assert_eq!(
            battle.use_item_on(Side::Player1, "Revive", target),
            action_err(ActionError::NoValidTarget("Revive".to_string()))
        );
        assert_eq!(battle.player(Side::Player1).item_count("Revive"), 1);
        assert!(!battle.has_acted());
    }

    #[test]
    fn test_revive_restores_fainted_teammate_to_full() {
        let mut battle = bag_battle(&[("Revive", 1)]);
        battle.player_mut(Side::Player1).team[1].take_damage(500);

        assert_ok(battle.use_item(Side::Player1, "Revive"));

        let red = battle.player(Side::Player1);
        assert_eq!(red.team[1].current_hp(), 99);
        assert!(red.dead_names().is_empty());
        assert_eq!(red.item_count("Revive"), 0);
        // Reviving does not change who is active.
        assert_eq!(red.active_pokemon().unwrap().name, "Pikachu");
    }

    #[test]
    fn test_revive_fraction_follows_rules() {
        let rules = BattleRules {
            revive_hp_percent: 50,
            ..BattleRules::default()
        };
        let mut battle = test_builder()
            .rules(rules)
            .build(
                team_spec(
                    "Red",
                    &[("Pikachu", MOVES), ("Charmander", MOVES)],
                    &[("Revive", 1)],
                ),
                team_spec("Blue", &[("Squirtle", MOVES)], &[]),
            )
            .unwrap();
        battle.player_mut(Side::Player1).team[1].take_damage(500);

        assert_ok(battle.use_item(Side::Player1, "Revive"));

        assert_eq!(battle.player(Side::Player1).team[1].current_hp(), 49);
    }

    #[test]
    fn test_revive_named_target_must_be_fainted() {
        let mut battle = bag_battle(&[("Revive", 1)]);
        battle.player_mut(Side::Player1).team[1].take_damage(500);

        assert_eq!(
            battle.use_item_on(Side::Player1, "Revive", Some("Pikachu")),
            action_err(ActionError::IllegalState("Pikachu".to_string()))
        );
        assert_eq!(
            battle.use_item_on(Side::Player1, "Revive", Some("Mew")),
            action_err(ActionError::UnknownCombatant("Mew".to_string()))
        );
        assert_eq!(battle.player(Side::Player1).item_count("Revive"), 1);

        assert_ok(battle.use_item_on(Side::Player1, "Revive", Some("Charmander")));
        assert!(!battle.player(Side::Player1).team[1].is_fainted());
    }

    #[test]
    fn test_potion_on_benched_teammate() {
        let mut battle = bag_battle(&[("Potion", 1)]);
        battle.player_mut(Side::Player1).team[1].set_hp(30);

        assert_ok(battle.use_item_on(Side::Player1, "Potion", Some("Charmander")));

        let red = battle.player(Side::Player1);
        assert_eq!(red.team[1].current_hp(), 50);
        assert_eq!(red.active_pokemon().unwrap().current_hp(), 95);
    }

    #[test]
    fn test_potion_cannot_heal_fainted_teammate() {
        let mut battle = bag_battle(&[("Potion", 1)]);
        battle.player_mut(Side::Player1).team[1].take_damage(500);

        assert_eq!(
            battle.use_item_on(Side::Player1, "Potion", Some("Charmander")),
            action_err(ActionError::ItemNotApplicable {
                item: "Potion".to_string(),
                pokemon: "Charmander".to_string()
            })
        );
    }

    #[test]
    fn test_full_restore_heals_and_cures() {
        let mut battle = bag_battle(&[("Full Restore", 1)]);
        {
            let pikachu = &mut battle.player_mut(Side::Player1).team[0];
            pikachu.set_hp(10);
            pikachu.inflict_status(StatusType::Burn, 2);
        }

        assert_ok(battle.use_item(Side::Player1, "Full Restore"));

        let pikachu = battle.player(Side::Player1).active_pokemon().unwrap();
        assert_eq!(pikachu.current_hp(), 95);
        assert_eq!(pikachu.status, None);
    }

    #[test]
    fn test_full_restore_on_healthy_pokemon_fails() {
        let mut battle = bag_battle(&[("Full Restore", 1)]);
        assert!(matches!(
            battle.use_item(Side::Player1, "Full Restore"),
            Err(BattleEngineError::Action(ActionError::ItemNotApplicable { .. }))
        ));
    }

    #[test]
    fn test_status_cures_must_match() {
        let mut battle = bag_battle(&[("Antidote", 1), ("Full Heal", 1)]);
        battle.player_mut(Side::Player1).team[0].inflict_status(StatusType::Paralysis, 2);

        assert!(matches!(
            battle.use_item(Side::Player1, "Antidote"),
            Err(BattleEngineError::Action(ActionError::ItemNotApplicable { .. }))
        ));
        assert_ok(battle.use_item(Side::Player1, "Full Heal"));

        let red = battle.player(Side::Player1);
        assert_eq!(red.active_pokemon().unwrap().status, None);
        assert_eq!(red.item_count("Antidote"), 1);
        assert!(battle.events().events().contains(&BattleEvent::StatusCured {
            target: "Pikachu".to_string(),
            status: StatusType::Paralysis
        }));
    }

    #[test]
    fn test_matching_status_cure() {
        let mut battle = bag_battle(&[("Antidote", 1)]);
        battle.player_mut(Side::Player1).team[0].inflict_status(StatusType::Poison, 2);

        assert_ok(battle.use_item(Side::Player1, "Antidote"));

        assert_eq!(
            battle.player(Side::Player1).team[0].status,
            None::<StatusCondition>
        );
    }

    #[test]
    fn test_items_only_on_own_turn() {
        let mut battle = create_test_battle(
            team_spec("Red", &[("Pikachu", MOVES)], &[]),
            team_spec("Blue", &[("Squirtle", MOVES)], &[("Potion", 1)]),
        );
        battle.player_mut(Side::Player2).team[0].set_hp(10);

        assert_eq!(
            battle.use_item(Side::Player2, "Potion"),
            action_err(ActionError::NotYourTurn(Side::Player2))
        );
        assert_eq!(battle.player(Side::Player2).item_count("Potion"), 1);
    }
}
