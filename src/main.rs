use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use connect_four::ai::Difficulty;
use connect_four::config::EngineConfig;
use connect_four::session::{GameMode, SessionRegistry};
use connect_four::ui::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Opponent {
    Computer,
    Human,
}

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against the computer or a friend")]
struct Cli {
    /// Who plays the second side
    #[arg(long, value_enum, default_value = "computer")]
    opponent: Opponent,

    /// Computer strength: very-easy, easy, normal, hard, very-hard, impossible (or 0/1/2/3/5/7)
    #[arg(long, default_value = "normal")]
    difficulty: Difficulty,

    /// Path to TOML configuration file
    #[arg(long, default_value = "connect-four.toml")]
    config: PathBuf,

    /// Seed for the starting side and the computer's mistakes
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal belongs to the board)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", EngineConfig::default_toml());
        return Ok(());
    }

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = EngineConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let registry = match cli.seed {
        Some(seed) => SessionRegistry::with_seed(config, seed),
        None => SessionRegistry::new(config),
    }
    .context("invalid configuration")?;
    let mode = match cli.opponent {
        Opponent::Computer => GameMode::VsComputer(cli.difficulty),
        Opponent::Human => GameMode::VsHuman,
    };

    let mut app = App::new(registry, mode).context("starting game")?;
    run(&mut app).context("running terminal UI")
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing log subscriber")
}

fn run(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
