#[cfg(test)]
mod tests {
    use crate::battle::ai::{Behavior, ScoringAI};
    use crate::battle::calculators::{RandomCoin, StandardDamage};
    use crate::battle::engine::BattleBuilder;
    use crate::battle::runner::BattleRunner;
    use crate::battle::state::{GameState, TurnRng};
    use crate::battle::tests::common::test_catalog;
    use crate::teams::create_team_spec;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(2024)]
    fn test_full_npc_battle_completes(#[case] seed: u64) {
        // Arrange: two prefab teams, real damage formula, seeded rolls.
        let builder = BattleBuilder::new(test_catalog())
            .damage_policy(Box::new(StandardDamage))
            .rng(TurnRng::from_seed(seed))
            .coin(Box::new(RandomCoin::with_rng(TurnRng::from_seed(seed))));
        let mut runner = BattleRunner::from_teams(
            builder,
            create_team_spec("kanto_starters", "AI Trainer Red").unwrap(),
            create_team_spec("mind_games", "AI Trainer Blue").unwrap(),
        )
        .unwrap();
        let ai = ScoringAI::new();
        let mut action_limit = 2000; // Safety break to prevent infinite loops in tests

        // Act
        while let Some(side) = runner.awaiting_side() {
            if action_limit == 0 {
                break;
            }
            let action = ai.decide_action(side, runner.battle());
            runner
                .submit(side, &action)
                .unwrap_or_else(|e| panic!("AI chose an illegal action {}: {}", action, e));
            action_limit -= 1;
        }

        // Assert
        println!("\n--- Battle Finished ---");
        println!("Final Game State: {:?}", runner.game_state());
        println!("Total Turns: {}", runner.get_turn_number());

        assert!(
            matches!(runner.game_state(), GameState::Finished(_)),
            "Battle should have concluded"
        );
        let winner = runner.get_winner().unwrap();
        assert!(runner.battle().player(winner).has_any_alive());
        assert!(!runner.battle().player(winner.opponent()).has_any_alive());
    }
}
