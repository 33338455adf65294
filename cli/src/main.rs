use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing_subscriber::EnvFilter;

mod config;
mod play;
mod render;

use config::{Overrides, Settings};
use play::{GameRecord, Report, Step};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// TOML file with board, session and simulation settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play seeded games headlessly and print a JSON report
    Simulate {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Play one seeded game, logging the board after every step
    Show {
        #[command(flatten)]
        overrides: Overrides,
    },
}

fn init_logging(verbose: &Verbosity<InfoLevel>) {
    let level = verbose.log_level_filter().to_string().to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn simulate(settings: &Settings) -> Result<()> {
    let simulation = settings.simulation;
    let move_time = Duration::from_millis(simulation.move_time_ms);
    let records = (0..u64::from(simulation.games))
        .map(|index| {
            play::play_game(
                settings.session,
                simulation.seed.wrapping_add(index),
                move_time,
                |_, _| {},
            )
        })
        .collect::<Result<Vec<GameRecord>>>()?;

    let report = Report::from_records(&records);
    log::info!("{} of {} games won", report.wins, report.games);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn show(settings: &Settings) -> Result<()> {
    let simulation = settings.simulation;
    let record = play::play_game(
        settings.session,
        simulation.seed,
        Duration::from_millis(simulation.move_time_ms),
        |session, step| {
            let board = session.board();
            match step {
                Step::Opened(coords) => log::info!("Opened {:?}", coords),
                Step::Solved(count) => log::info!("Applied {} certain moves", count),
                Step::Guessed(coords, likelihood) => {
                    log::info!("Guessed {:?} at {}%", coords, likelihood)
                }
            }
            log::info!(
                "{:?}, {} mines left\n{}",
                board.state(),
                board.remaining_mine_estimate(),
                render::board_text(board)
            );
            if !session.probabilities().is_empty() && !board.is_finished() {
                log::info!(
                    "Mine likelihood, {}% confident\n{}",
                    session.probabilities().confidence(),
                    render::probability_text(board.size(), session.probabilities())
                );
            }
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let mut settings = Settings::load(args.config.as_deref())?;
    match &args.command {
        Command::Simulate { overrides } => {
            settings.apply(overrides)?;
            simulate(&settings)
        }
        Command::Show { overrides } => {
            settings.apply(overrides)?;
            show(&settings)
        }
    }
}
