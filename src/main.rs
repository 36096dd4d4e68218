//! Demo entry point: two scripted trainers battle with prefab teams.
//!
//! Usage: `pokemon-duel [RULES_FILE] [--seed N] [--teams ID ID] [--json]`
//! Set `DUEL_CATALOG` to load a catalog file instead of the built-in one.

use anyhow::{bail, Context, Result};
use pokemon_duel::battle::ai::{Behavior, ScoringAI};
use pokemon_duel::battle::calculators::RandomCoin;
use pokemon_duel::battle::engine::BattleBuilder;
use pokemon_duel::battle::runner::BattleRunner;
use pokemon_duel::battle::state::TurnRng;
use pokemon_duel::catalog::Catalog;
use pokemon_duel::config::BattleRules;
use pokemon_duel::teams::{create_team_spec, get_available_team_ids, get_team_info};
use std::path::PathBuf;
use std::sync::Arc;

const ACTION_LIMIT: usize = 5000;

struct Options {
    rules_path: Option<PathBuf>,
    seed: Option<u64>,
    teams: (String, String),
    json: bool,
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        rules_path: None,
        seed: None,
        teams: ("kanto_starters".to_string(), "heavy_hitters".to_string()),
        json: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                options.seed = Some(value.parse().context("--seed must be a number")?);
            }
            "--teams" => {
                let first = args.next().context("--teams needs two team ids")?;
                let second = args.next().context("--teams needs two team ids")?;
                options.teams = (first, second);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            path => options.rules_path = Some(PathBuf::from(path)),
        }
    }
    Ok(options)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args()?;

    let catalog = match std::env::var_os("DUEL_CATALOG") {
        Some(path) => Catalog::load(&PathBuf::from(path))?,
        None => Catalog::builtin()?,
    };
    let rules = match &options.rules_path {
        Some(path) => BattleRules::load(path)?,
        None => BattleRules::default(),
    };
    tracing::info!(
        species = catalog.list_pokemon().len(),
        moves = catalog.list_moves().len(),
        items = catalog.list_items().len(),
        "catalog ready"
    );

    let (rng, coin) = match options.seed {
        Some(seed) => (
            TurnRng::from_seed(seed),
            RandomCoin::with_rng(TurnRng::from_seed(seed.wrapping_add(1))),
        ),
        None => (TurnRng::new_random(), RandomCoin::new()),
    };
    let builder = BattleBuilder::new(Arc::new(catalog))
        .rules(rules)
        .rng(rng)
        .coin(Box::new(coin));

    let (team1, team2) = &options.teams;
    let unknown = |id: &str| {
        format!(
            "unknown team {} (available: {})",
            id,
            get_available_team_ids().join(", ")
        )
    };
    let spec1 = create_team_spec(team1, "Red").with_context(|| unknown(team1))?;
    let spec2 = create_team_spec(team2, "Blue").with_context(|| unknown(team2))?;
    if !options.json {
        for (trainer, id) in [("Red", team1), ("Blue", team2)] {
            if let Some(team) = get_team_info(id) {
                println!("{} brings {}: {}", trainer, team.name, team.description);
            }
        }
    }
    let mut runner = BattleRunner::from_teams(builder, spec1, spec2)?;

    let ai = ScoringAI::new();
    let mut printed = 0;
    let mut actions = 0;
    while let Some(side) = runner.awaiting_side() {
        if actions >= ACTION_LIMIT {
            tracing::warn!(actions, "action limit reached, stopping");
            break;
        }
        let action = ai.decide_action(side, runner.battle());
        if runner.submit(side, &action).is_err() {
            // Scripted trainers should never pick an illegal action; fall back to the timer.
            runner.expire_turn()?;
        }
        actions += 1;

        if !options.json {
            for line in runner.describe_events_since(printed) {
                println!("{}", line);
            }
        }
        printed = runner.get_all_events().len();
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&runner.get_battle_info())?);
    } else if let Some(winner) = runner.get_winner() {
        println!(
            "\n{} wins after {} turns.",
            runner.player(winner).player_name,
            runner.get_turn_number()
        );
    }

    Ok(())
}
