//! Command-line front end.
//!
//! - `play`: a new game at the terminal
//! - `resume`: continue a saved game
//! - `simulate`: automatic players, useful for checking a board
//! - `check-board`: validate a board file and list its squares

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use monopoly_engine::console::{read_player_names, render_board, render_result, render_status};
use monopoly_engine::{
    load_board, load_game, save_game, AutoPlayer, ConsoleDecisions, GameConfig, GameEngine, GameStatus, RandomSource,
    RoundEnd, SquareKind,
};

/// Turn-based property trading game
#[derive(Parser, Debug)]
#[command(name = "monopoly")]
#[command(version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new game at the terminal
    Play {
        #[command(flatten)]
        setup: Setup,

        /// Where to save when a player chooses to stop (.bin for binary)
        #[arg(long, default_value = "saved_game.json")]
        save: PathBuf,
    },

    /// Continue a saved game
    Resume {
        /// Save file to load
        #[arg(default_value = "saved_game.json")]
        save: PathBuf,
    },

    /// Play a game with automatic players and print the result
    Simulate {
        #[command(flatten)]
        setup: Setup,

        /// Number of automatic players when no names are given
        #[arg(long, default_value = "4")]
        count: usize,
    },

    /// Validate a board file and list its squares
    CheckBoard {
        /// Board CSV file
        board: PathBuf,
    },
}

#[derive(Args, Debug)]
struct Setup {
    /// Board CSV file
    #[arg(short, long)]
    board: PathBuf,

    /// Player names, in turn order
    #[arg(short, long, num_args = 1..)]
    players: Vec<String>,

    /// Seed for reproducible dice
    #[arg(long)]
    seed: Option<u64>,

    /// Round limit
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Money each player starts with
    #[arg(long)]
    starting_money: Option<i64>,
}

impl Setup {
    fn config(&self) -> GameConfig {
        let mut config = GameConfig::new();
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(rounds) = self.max_rounds {
            config = config.with_max_rounds(rounds);
        }
        if let Some(money) = self.starting_money {
            config = config.with_starting_money(money);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Play { setup, save } => play(setup, save),
        Command::Resume { save } => resume(save),
        Command::Simulate { setup, count } => simulate(setup, count),
        Command::CheckBoard { board } => check_board(&board),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn play(setup: Setup, save: PathBuf) -> Result<()> {
    let board = load_board(&setup.board)?;
    let names = if setup.players.is_empty() {
        let stdin = io::stdin();
        read_player_names(&mut stdin.lock(), &mut io::stdout()).context("reading player names")?
    } else {
        setup.players.clone()
    };

    println!("Welcome to Monopoly!");
    let engine = GameEngine::new(setup.config(), board, &names)?;
    play_at_terminal(engine, &save)
}

fn resume(save: PathBuf) -> Result<()> {
    let engine = load_game(&save).with_context(|| format!("loading {}", save.display()))?;
    println!("Game loaded successfully.");
    play_at_terminal(engine, &save)
}

fn play_at_terminal<R: RandomSource>(mut engine: GameEngine<R>, save: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut decisions = ConsoleDecisions::new(stdin.lock(), io::stdout(), &engine);

    loop {
        if let Some(result) = engine.result() {
            println!("\n{}", render_result(&engine, &result));
            return Ok(());
        }

        if engine.turn_index() == 0 {
            println!("\n--- Round {} ---", engine.round());
        } else {
            println!("\n--- Round {} (continued) ---", engine.round());
        }
        println!("{}", render_board(&engine));
        println!("{}", render_status(&engine));
        io::stdout().flush()?;

        if engine.play_round(&mut decisions) == RoundEnd::Suspended {
            save_game(&engine, save)?;
            println!("Game saved to {}. Exiting...", save.display());
            return Ok(());
        }
    }
}

fn simulate(setup: Setup, count: usize) -> Result<()> {
    let board = load_board(&setup.board)?;
    let names = if setup.players.is_empty() {
        (1..=count).map(|i| format!("Player {i}")).collect()
    } else {
        setup.players.clone()
    };

    let config = setup.config();
    let mut auto = AutoPlayer::for_config(&config);
    let mut engine = GameEngine::new(config, board, &names)?;
    info!(seed = engine.rng().seed(), "simulating");

    match engine.run(&mut auto) {
        GameStatus::Finished(result) => {
            print!("{}", render_result(&engine, &result));
            println!("Rounds played: {}", engine.round().min(engine.config().max_rounds));
            Ok(())
        }
        GameStatus::Suspended => bail!("automatic players never suspend"),
    }
}

fn check_board(path: &Path) -> Result<()> {
    let board = load_board(path)?;
    println!("{} squares found on the gameboard.", board.len());
    for square in board.squares() {
        let kind = match square.kind {
            SquareKind::Plain => "Plain".to_string(),
            SquareKind::Property(deed) => format!("Property, price ${}, rent ${}", deed.price, deed.rent),
            SquareKind::Chance => "Chance".to_string(),
            SquareKind::Tax => "Income Tax".to_string(),
            SquareKind::GoToJail => "Go To Jail".to_string(),
            SquareKind::InJail => "In Jail".to_string(),
        };
        println!("{}: {} ({kind})", square.position, square.name);
    }
    if board.jail_position().is_none() {
        println!("Warning: no In Jail square; jailed players stay where they are.");
    }
    Ok(())
}
