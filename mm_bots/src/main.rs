//! Headless memory match bots.
//!
//! Each bot gets its own session and plays a number of rounds back to back.
//! A summary of wins and losses is printed once every bot is done.

use anyhow::{Context, Error};
use ctrlc::set_handler;
use log::info;
use memory_match::{
    CardSet, CardSource, JsonFileSource, StaticSource,
    bot::{BotConfig, BotDifficulty, BotPlayer, BotStats},
    session::{GameSpeed, SessionActor, SessionConfig},
};
use pico_args::Arguments;
use tokio::task::JoinSet;

const HELP: &str = "\
Run memory match bots without a terminal UI

USAGE:
  mm_bots [OPTIONS]

OPTIONS:
  --bots        N          Number of bots, each with its own session  [default: 1]
  --games       N          Rounds each bot plays  [default: 10]
  --difficulty  LEVEL      easy, standard or perfect  [default: standard]
  --speed       SPEED      normal, fast or instant  [default: instant]
  --seed        N          Base seed for decks and bot choices
  --cards       PATH       Card data file  [default: built-in set]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log level (e.g., info, debug)
  MM_SPEED                 Pacing preset when --speed is not given
  MM_SEED                  Base seed when --seed is not given
  MM_SESSION_NAME          Session name prefix
";

struct Args {
    bots: usize,
    games: u32,
    difficulty: BotDifficulty,
    speed: Option<GameSpeed>,
    seed: Option<u64>,
    cards: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bots: pargs.opt_value_from_str("--bots")?.unwrap_or(1),
        games: pargs.opt_value_from_str("--games")?.unwrap_or(10),
        difficulty: pargs.opt_value_from_str("--difficulty")?.unwrap_or_default(),
        speed: pargs.opt_value_from_str("--speed")?,
        seed: pargs.opt_value_from_str("--seed")?,
        cards: pargs.opt_value_from_str("--cards")?,
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();

    let cards = load_cards(args.cards.as_deref()).await?;

    let mut config = SessionConfig::from_env().context("Invalid session configuration")?;
    // Bots default to no pacing unless asked otherwise
    config.speed = match args.speed {
        Some(speed) => speed,
        None if std::env::var("MM_SPEED").is_ok() => config.speed,
        None => GameSpeed::Instant,
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().context("Invalid session configuration")?;

    info!(
        "Starting {} {} bot(s) for {} game(s) each at {} speed",
        args.bots, args.difficulty, args.games, config.speed
    );

    let results = run_bots(cards, config, args.difficulty, args.bots, args.games).await?;

    let mut total = BotStats::default();
    for (name, stats) in &results {
        println!(
            "{name}: {} won, {} lost ({:.0}% win rate, {} selections)",
            stats.games_won,
            stats.games_lost(),
            stats.win_rate() * 100.0,
            stats.selections
        );
        total.games_played += stats.games_played;
        total.games_won += stats.games_won;
        total.selections += stats.selections;
    }
    if results.len() > 1 {
        println!(
            "total: {} won, {} lost ({:.0}% win rate)",
            total.games_won,
            total.games_lost(),
            total.win_rate() * 100.0
        );
    }

    Ok(())
}

async fn load_cards(path: Option<&str>) -> Result<CardSet, Error> {
    match path {
        Some(path) => JsonFileSource::new(path)
            .load()
            .await
            .with_context(|| format!("Failed to load card data from {path}")),
        None => Ok(StaticSource::default().load().await?),
    }
}

/// Play `games` rounds with each of `bots` bots, one session per bot.
///
/// Returns each bot's name and statistics in bot order.
async fn run_bots(
    cards: CardSet,
    config: SessionConfig,
    difficulty: BotDifficulty,
    bots: usize,
    games: u32,
) -> Result<Vec<(String, BotStats)>, Error> {
    let mut tasks = JoinSet::new();

    for i in 0..bots {
        let mut session_config = config.clone();
        session_config.name = format!("{} {}", config.name, i + 1);
        session_config.seed = config.seed.map(|seed| seed.wrapping_add(i as u64));

        let mut bot_config = BotConfig::from_difficulty(difficulty);
        bot_config.name = format!("{} {}", bot_config.name, i + 1);
        if session_config.speed == GameSpeed::Instant {
            bot_config = bot_config.unpaced();
        }

        let mut bot = match session_config.seed {
            Some(seed) => BotPlayer::with_seed(bot_config, seed),
            None => BotPlayer::new(bot_config),
        };

        let (actor, handle) = SessionActor::new(cards.clone(), session_config);
        tokio::spawn(actor.run());

        tasks.spawn(async move {
            let result = bot.play_games(&handle, games).await;
            handle.close().await.ok();
            result.map(|()| (i, bot.config.name, bot.stats))
        });
    }

    let mut results = Vec::with_capacity(bots);
    while let Some(joined) = tasks.join_next().await {
        let (i, name, stats) = joined.context("Bot task panicked")??;
        info!("{name} finished: {}/{} won", stats.games_won, stats.games_played);
        results.push((i, name, stats));
    }
    results.sort_by_key(|(i, _, _)| *i);

    Ok(results
        .into_iter()
        .map(|(_, name, stats)| (name, stats))
        .collect())
}
