//! A terminal memory match game.
//!
//! Loads the card set, starts a local session and hands the terminal to
//! the TUI until the player quits.

use anyhow::{Context, Result};
use memory_match::{
    CardSource, JsonFileSource,
    session::{GameSpeed, SessionActor, SessionConfig},
};
use pico_args::Arguments;

use mm_client::tui_app::TuiApp;

const HELP: &str = concat!(
    "\
Play memory match in the terminal

USAGE:
  mm_client [OPTIONS]

OPTIONS:
  --cards      PATH        Card data file
                           [default: ",
    env!("CARGO_MANIFEST_DIR"),
    "/assets/cards.json]
  --speed      SPEED       normal, fast or instant  [default: env MM_SPEED or normal]
  --seed       N           Shuffle seed for a reproducible deck  [default: env MM_SEED]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  MM_SESSION_NAME          Title shown above the board
  MM_SPEED                 Pacing preset
  MM_SEED                  Shuffle seed
  MM_EVENT_BUFFER          Event buffer per subscriber
"
);

const DEFAULT_CARDS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/cards.json");

struct Args {
    cards: String,
    speed: Option<GameSpeed>,
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        cards: pargs
            .opt_value_from_str("--cards")?
            .unwrap_or_else(|| DEFAULT_CARDS.to_string()),
        speed: pargs.opt_value_from_str("--speed")?,
        seed: pargs.opt_value_from_str("--seed")?,
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    // Card data must be in hand before the terminal is taken over
    let source = JsonFileSource::new(&args.cards);
    let cards = source
        .load()
        .await
        .with_context(|| {
            format!(
                "Failed to load card data from {}",
                source.path().display()
            )
        })?;

    let mut config = SessionConfig::from_env().context("Invalid session configuration")?;
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().context("Invalid session configuration")?;

    let session_name = config.name.clone();
    let (actor, handle) = SessionActor::new(cards, config);
    tokio::spawn(actor.run());
    let (_, events) = handle.subscribe().await?;

    let terminal = ratatui::init();
    let result = TuiApp::new(session_name).run(handle.clone(), events, terminal).await;
    ratatui::restore();

    result?;
    handle.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_names_default_card_file() {
        assert!(HELP.contains(&format!("[default: {DEFAULT_CARDS}]")));
        assert!(std::path::Path::new(DEFAULT_CARDS).is_file());
    }

    #[tokio::test]
    async fn test_default_card_file_loads() {
        let cards = JsonFileSource::new(DEFAULT_CARDS).load().await.unwrap();
        assert_eq!(cards.len(), memory_match::PAIR_COUNT);
    }
}
