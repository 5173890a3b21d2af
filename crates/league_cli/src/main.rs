//! Command-line front end for the league manager.
//!
//! # Responsibility
//! - Relay one user command per invocation to `league_core`.
//! - Print read projections (lists, history, leaderboard) as plain text.
//!
//! # Exit codes
//! - `0` success, `1` rejected command, `2` fatal startup or storage error.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use league_core::db::{open_db, DEFAULT_DB_FILE_NAME};
use league_core::{
    default_log_level, init_logging, LeagueId, LeagueService, LeagueServiceError, PairId,
    PlayerId, RemovalReport, SqliteStoreRepository, StoreRepository,
};
use log::error;
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "league", version, about = "Track doubles pairs, matches, and standings")]
struct Cli {
    #[command(flatten)]
    config: GlobalConfig,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalConfig {
    /// SQLite file holding the league store.
    #[arg(long, env = "LEAGUE_DB", default_value = DEFAULT_DB_FILE_NAME, global = true)]
    db: PathBuf,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "LEAGUE_LOG_DIR", global = true)]
    log_dir: Option<String>,
    #[arg(long, env = "LEAGUE_LOG_LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    League(LeagueCommand),
    #[command(subcommand)]
    Player(PlayerCommand),
    #[command(subcommand)]
    Pair(PairCommand),
    #[command(subcommand)]
    Match(MatchCommand),
    /// Show standings of the active league.
    Leaderboard,
}

#[derive(Debug, Subcommand)]
enum LeagueCommand {
    /// Create a league and make it active.
    Create { name: String },
    /// Make another league active.
    Switch { id: String },
    List,
}

#[derive(Debug, Subcommand)]
enum PlayerCommand {
    Add { name: String },
    /// Delete a player, their pair, and that pair's matches.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum PairCommand {
    Create {
        name: String,
        player1: String,
        player2: String,
    },
    /// Delete a pair and its match history.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum MatchCommand {
    Record {
        pair1: String,
        pair2: String,
        score1: String,
        score2: String,
    },
    /// Matches of the active league, newest first.
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    Rejected,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.config.log_dir.as_deref() {
        let level = cli
            .config
            .log_level
            .as_deref()
            .unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {:#}", anyhow::Error::new(err));
        }
    }

    let result = run(cli);
    if let Err(err) = &result {
        error!("event=cli_run module=cli status=error error={err:#}");
        eprintln!("error: {err:#}");
    }
    ExitCode::from(exit_status(&result))
}

/// Maps a command result onto the process exit status.
fn exit_status(result: &anyhow::Result<Outcome>) -> u8 {
    match result {
        Ok(Outcome::Done) => 0,
        Ok(Outcome::Rejected) => 1,
        Err(_) => 2,
    }
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let conn = open_db(&cli.config.db)
        .with_context(|| format!("failed to open league database `{}`", cli.config.db.display()))?;
    execute(&conn, cli.command)
}

/// Loads the store from `conn` and applies one command to it.
fn execute(conn: &Connection, command: Command) -> anyhow::Result<Outcome> {
    let repo = SqliteStoreRepository::new(conn);
    let mut service =
        LeagueService::load(repo).context("failed to load league data; refusing to start")?;

    match dispatch(&mut service, command) {
        Ok(outcome) => Ok(outcome),
        Err(err) if err.is_validation() => {
            eprintln!("{err}");
            Ok(Outcome::Rejected)
        }
        Err(err) => Err(anyhow::Error::new(err).context("failed to save league data")),
    }
}

fn dispatch<R: StoreRepository>(
    service: &mut LeagueService<R>,
    command: Command,
) -> Result<Outcome, LeagueServiceError> {
    match command {
        Command::League(LeagueCommand::Create { name }) => {
            let id = service.create_league(&name)?;
            println!("created league {id} (active)");
        }
        Command::League(LeagueCommand::Switch { id }) => {
            service.switch_active_league(&LeagueId::from(id.as_str()))?;
            println!("active league is now {id}");
        }
        Command::League(LeagueCommand::List) => {
            let active = service.store().active_league_id.as_ref();
            for league in service.store().leagues() {
                let marker = if Some(&league.id) == active { "*" } else { " " };
                println!("{marker} {}  {}", league.id, league.name);
            }
        }
        Command::Player(PlayerCommand::Add { name }) => {
            let id = service.add_player(&name)?;
            println!("added player {id}");
        }
        Command::Player(PlayerCommand::Delete { id, yes }) => {
            if !confirmed(yes, "player, their team, and all related matches") {
                return Ok(Outcome::Rejected);
            }
            let report = service.delete_player(&PlayerId::from(id.as_str()))?;
            print_removal(&report);
        }
        Command::Player(PlayerCommand::List) => {
            let league = service.active_league().ok_or(LeagueServiceError::NoActiveLeague)?;
            for player in &league.players {
                println!("{}  {}", player.id, player.name);
            }
        }
        Command::Pair(PairCommand::Create {
            name,
            player1,
            player2,
        }) => {
            let id = service.create_pair(
                &name,
                &PlayerId::from(player1.as_str()),
                &PlayerId::from(player2.as_str()),
            )?;
            println!("created team {id}");
        }
        Command::Pair(PairCommand::Delete { id, yes }) => {
            if !confirmed(yes, "team and its match history") {
                return Ok(Outcome::Rejected);
            }
            let report = service.delete_pair(&PairId::from(id.as_str()))?;
            print_removal(&report);
        }
        Command::Pair(PairCommand::List) => {
            let league = service.active_league().ok_or(LeagueServiceError::NoActiveLeague)?;
            for pair in &league.pairs {
                println!(
                    "{}  {} ({} & {})",
                    pair.id,
                    pair.name,
                    league.player_name(&pair.player1_id),
                    league.player_name(&pair.player2_id)
                );
            }
        }
        Command::Match(MatchCommand::Record {
            pair1,
            pair2,
            score1,
            score2,
        }) => {
            let id = service.record_match_from_input(
                &PairId::from(pair1.as_str()),
                &PairId::from(pair2.as_str()),
                &score1,
                &score2,
            )?;
            println!("recorded match {id}");
        }
        Command::Match(MatchCommand::History) => {
            let league = service.active_league().ok_or(LeagueServiceError::NoActiveLeague)?;
            for m in league.match_history() {
                println!(
                    "{}  {} - {}  {}",
                    league.pair_name(&m.pair1_id),
                    m.pair1_score,
                    m.pair2_score,
                    league.pair_name(&m.pair2_id)
                );
            }
        }
        Command::Leaderboard => {
            let board = service.leaderboard().ok_or(LeagueServiceError::NoActiveLeague)?;
            println!("{:>4}  {:<24} {:>6}", "rank", "team", "points");
            for row in board {
                println!("{:>4}  {:<24} {:>6}", row.rank, row.pair_name, row.points);
            }
        }
    }
    Ok(Outcome::Done)
}

fn confirmed(yes: bool, what: &str) -> bool {
    if !yes {
        eprintln!("this will delete the {what}; re-run with --yes to confirm");
    }
    yes
}

fn print_removal(report: &RemovalReport) {
    println!(
        "removed {} player(s), {} team(s), {} match(es)",
        usize::from(report.player.is_some()),
        report.pairs.len(),
        report.matches.len()
    );
}
