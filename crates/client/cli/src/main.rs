//! Headless runner: plays one scenario with the tactical AI in every seat and
//! prints a JSON summary of the result.
mod config;

use anyhow::{Context, Result};
use config::CliConfig;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use horde_content::{ContentFactory, QuestKind};
use horde_core::{GameOver, GameState, PlayerId, ZoneId};
use horde_runtime::{Runtime, TacticalAi};

/// What the runner prints once the session is over.
#[derive(Debug, Serialize)]
struct Summary {
    scenario: String,
    seed: u64,
    rounds: u32,
    victory: bool,
    reason: String,
    state_root: String,
}

impl Summary {
    fn new(scenario: String, outcome: GameOver, state: &GameState) -> Self {
        Self {
            scenario,
            seed: state.seed(),
            rounds: state.round.number,
            victory: outcome.victory,
            reason: outcome.reason,
            state_root: hex::encode(state.state_root()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env().with_args(std::env::args().skip(1));
    setup_logging(&config)?;

    let summary = play(&config).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn play(config: &CliConfig) -> Result<Summary> {
    let factory = ContentFactory::new(&config.data_dir);
    let mut session = factory
        .build_session(&config.scenario, config.seed)
        .with_context(|| format!("cannot set up scenario `{}`", config.scenario))?;
    if let Some(rounds) = config.max_rounds {
        session.state.config.round_limit = Some(rounds);
    }

    let rally = match session.scenario.quest {
        QuestKind::ObjectiveHunt { exit, .. } => Some(ZoneId(exit)),
        QuestKind::Holdout { .. } => None,
    };
    let seed = session.state.seed();
    let players: Vec<PlayerId> = session.state.players.iter().map(|p| p.id).collect();
    let scenario = session.scenario.name.clone();

    let mut builder = Runtime::builder().session(session);
    for player in players {
        let mut ai = TacticalAi::new(seed ^ u64::from(player.0));
        if let Some(zone) = rally {
            ai = ai.rally_at(zone);
        }
        builder = builder.seat(player, ai);
    }
    let runtime = builder.build().await?;
    let handle = runtime.handle();
    info!(%scenario, seed, "session started");

    let outcome = handle.finished().await?;
    let state = handle.query_state().await?;
    runtime.shutdown().await?;
    info!(
        %scenario,
        rounds = state.round.number,
        victory = outcome.victory,
        "session finished"
    );

    Ok(Summary::new(scenario, outcome, &state))
}

/// Setup logging to both stderr and a per-run file
fn setup_logging(config: &CliConfig) -> Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let run_dir = config
        .log_dir
        .join(format!("{}_{timestamp}", config.scenario));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("cannot create log directory {}", run_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&run_dir, "horde.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(guard);

    info!("Log file: {}/horde.log", run_dir.display());
    Ok(())
}
