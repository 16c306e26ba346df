use anyhow::Context;
use chess_rules::GameState;
use clap::Parser;
use std::path::PathBuf;
use terminal_chess::config::Config;
use terminal_chess::pgn::{default_file_name, write_pgn, PgnHeaders};
use terminal_chess::session::{run_session, SessionEnd, SessionOptions};
use tracing::Level;

/// Two-player chess in the terminal.
#[derive(Parser)]
#[command(name = "terminal-chess")]
#[command(about = "Two-player chess in the terminal")]
struct Cli {
    /// Start from this position instead of the initial one
    #[arg(long)]
    fen: Option<String>,

    /// Write the finished game to this PGN file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Name of the White player
    #[arg(long)]
    white: Option<String>,

    /// Name of the Black player
    #[arg(long)]
    black: Option<String>,

    /// Draw the board with ASCII letters
    #[arg(long)]
    ascii: bool,

    /// Configuration file (defaults to terminal-chess.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("could not load configuration")?;
    if let Some(white) = cli.white {
        config.white = white;
    }
    if let Some(black) = cli.black {
        config.black = black;
    }
    config.ascii |= cli.ascii;

    let mut game = match &cli.fen {
        Some(fen) => GameState::from_fen(fen).with_context(|| format!("invalid FEN: {}", fen))?,
        None => GameState::new(),
    };
    tracing::info!(fen = %game.to_fen(), white = %config.white, black = %config.black, "starting game");

    println!("--------------------------------");
    println!("Welcome to chess!");
    println!("--------------------------------");
    println!("Type \"help\" for the list of commands.\n");

    let options = SessionOptions {
        style: config.glyph_style(),
    };
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let end = run_session(stdin.lock(), &mut stdout, &mut game, &options)?;

    let SessionEnd::Finished(_) = end else {
        tracing::info!("input closed before the game ended");
        return Ok(());
    };

    let headers = PgnHeaders::from_config(&config, chrono::Local::now().date_naive());
    let record = cli
        .record
        .or_else(|| config.pgn_dir.as_ref().map(|dir| dir.join(default_file_name(&headers))));
    if let Some(path) = record {
        write_pgn(&path, &headers, &game)
            .with_context(|| format!("could not write {}", path.display()))?;
        println!("Game saved to {}", path.display());
    }
    Ok(())
}
