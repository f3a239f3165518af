use anyhow::Result;
use clap::{Parser, ValueEnum};
use nrow::{AlphaBeta, GameConfig, Minimax, Player, PlayerController, SearchConfig, WindowHeuristic};
use tracing::info;

mod game;
mod human;

use game::Game;
use human::HumanPlayer;

#[derive(Parser, Debug)]
#[command(name = "nrow-cli")]
#[command(version, about = "Play N-in-a-row against minimax and alpha-beta search")]
struct Cli {
    /// Board width in columns
    #[arg(long, default_value_t = 7)]
    width: usize,

    /// Board height in rows
    #[arg(long, default_value_t = 6)]
    height: usize,

    /// Pieces in a row needed to win
    #[arg(long, default_value_t = 4)]
    n: usize,

    /// Plies searched past each candidate move
    #[arg(long, default_value_t = 4)]
    depth: usize,

    #[arg(long, value_enum, default_value_t = Controller::Human)]
    player1: Controller,

    #[arg(long, value_enum, default_value_t = Controller::Alphabeta)]
    player2: Controller,

    /// Log every search decision
    #[arg(short, long)]
    verbose: bool,

    /// Print a JSON summary when the game ends
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Controller {
    Human,
    Minimax,
    Alphabeta,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = GameConfig {
        width: cli.width,
        height: cli.height,
        n: cli.n,
    };
    config.validate()?;
    let players = [
        controller(cli.player1, Player::One, &config, cli.depth)?,
        controller(cli.player2, Player::Two, &config, cli.depth)?,
    ];
    info!(
        width = config.width,
        height = config.height,
        n = config.n,
        depth = cli.depth,
        "starting game"
    );

    let summary = Game::new(config, players)?.play(&mut std::io::stdout())?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "nrow=debug,nrow_cli=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn controller(
    kind: Controller,
    player: Player,
    config: &GameConfig,
    depth: usize,
) -> Result<Box<dyn PlayerController>> {
    let search = SearchConfig::new(player, config.n, depth)?;
    let heuristic = WindowHeuristic::new(config.n);
    let controller: Box<dyn PlayerController> = match kind {
        Controller::Human => Box::new(HumanPlayer::new(player, std::io::stdin(), std::io::stdout())),
        Controller::Minimax => Box::new(Minimax::new(search, heuristic)?),
        Controller::Alphabeta => Box::new(AlphaBeta::new(search, heuristic)?),
    };
    Ok(controller)
}
