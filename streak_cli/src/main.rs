use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use streak_core::export::write_week_csv;
use streak_core::normalize::parse_timestamp;
use streak_core::*;

#[derive(Parser)]
#[command(name = "krep-streak")]
#[command(about = "Workout streak and adherence tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read history from this file (JSON array or JSON Lines) instead of the journal
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Evaluate as of this local time instead of the system clock
    #[arg(long, global = true)]
    now: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current streak, longest streak and adherence (default)
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Adherence window in days
        #[arg(long)]
        window: Option<u32>,
    },

    /// Log a session to the journal
    Log {
        /// Session kind (strength, cardio, hiit, yoga, stretch, rest, sick_day)
        #[arg(long)]
        kind: String,

        /// Mark the session as a deload
        #[arg(long)]
        deload: bool,

        /// When the session happened (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Show the per-week breakdown
    Weeks {
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the per-week breakdown to CSV
    Export {
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },

    /// Start a new cycle, clearing any Week Zero
    ResetCycle,

    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

struct Paths {
    journal: PathBuf,
    history: PathBuf,
    schedule: PathBuf,
}

impl Paths {
    fn new(data_dir: &Path, history: Option<PathBuf>) -> Self {
        let journal = data_dir.join("sessions.jsonl");
        Self {
            history: history.unwrap_or_else(|| journal.clone()),
            journal,
            schedule: data_dir.join("schedule.json"),
        }
    }
}

fn main() -> Result<()> {
    streak_core::logging::init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);
    if let Some(Commands::InitConfig { force }) = cli.command {
        return cmd_init_config(&config_path, force);
    }

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let paths = Paths::new(&data_dir, cli.history.clone());

    // Sampled once for the whole command
    let now = match cli.now.as_deref() {
        Some(s) => parse_timestamp(s)?,
        None => SystemClock.now(),
    };
    tracing::debug!("Using data dir {:?}, evaluating at {}", data_dir, now);

    match cli.command {
        Some(Commands::Status { json, window }) => cmd_status(&paths, now, json, window, &config),
        Some(Commands::Log { kind, deload, at }) => cmd_log(&paths, now, &kind, deload, at),
        Some(Commands::Weeks { json }) => cmd_weeks(&paths, now, json, &config),
        Some(Commands::Export { out }) => cmd_export(&paths, now, &out, &config),
        Some(Commands::ResetCycle) => cmd_reset_cycle(&paths, now),
        Some(Commands::InitConfig { force }) => cmd_init_config(&config_path, force),
        None => cmd_status(&paths, now, false, None, &config),
    }
}

fn cmd_status(
    paths: &Paths,
    now: NaiveDateTime,
    json: bool,
    window: Option<u32>,
    config: &Config,
) -> Result<()> {
    let sessions = load_history(&paths.history)?;
    let schedule = ScheduleState::load(&paths.schedule)?;

    let mut config = config.clone();
    if let Some(window) = window {
        config.adherence.window_days = window;
    }

    let report = evaluate_records(&sessions, now, schedule.active_week_zero(), None, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Current streak: {} days", report.current_streak);
    println!("Longest streak: {} days", report.longest_streak);
    println!(
        "Adherence ({}-day window): {}%",
        report.window_days, report.adherence
    );
    if let Some(info) = schedule.active_week_zero() {
        if let Some(cycle_start) = info.cycle_start_date {
            if now.date() < cycle_start {
                println!("Week 0 - Week 1 starts {}", cycle_start);
            }
        }
    }

    Ok(())
}

fn cmd_log(
    paths: &Paths,
    now: NaiveDateTime,
    kind: &str,
    deload: bool,
    at: Option<String>,
) -> Result<()> {
    let kind = SessionKind::parse(kind)
        .ok_or_else(|| Error::InvalidRecord(format!("unknown session kind {:?}", kind)))?;
    let performed_at = match at.as_deref() {
        Some(s) => parse_timestamp(s)?,
        None => now,
    };

    let mut session = SessionRecord::new(performed_at, kind);
    session.is_deload = deload;

    // Append and decide Week Zero under one schedule lock
    let mut week_one = None;
    ScheduleState::update(&paths.schedule, |schedule| {
        let mut sink = JsonlSink::new(&paths.journal);
        sink.append(&session)?;

        // Week Zero is decided once, from the first-ever session
        let history = load_history(&paths.journal)?;
        if let Some(first_day) = history.iter().map(SessionRecord::day).min() {
            if schedule.record_first_session(first_day) {
                week_one = schedule
                    .active_week_zero()
                    .and_then(|info| info.cycle_start_date);
            }
        }
        Ok(())
    })?;

    if let Some(cycle_start) = week_one {
        println!("Week 0 started - Week 1 begins {}", cycle_start);
    }

    println!(
        "✓ Logged {}{} session on {}",
        kind.as_str(),
        if deload { " (deload)" } else { "" },
        performed_at.date()
    );
    Ok(())
}

fn cmd_weeks(paths: &Paths, now: NaiveDateTime, json: bool, config: &Config) -> Result<()> {
    let sessions = load_history(&paths.history)?;
    let schedule = ScheduleState::load(&paths.schedule)?;
    let weeks = week_breakdown(&sessions, now, schedule.active_week_zero(), &config.streak)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&weeks)?);
        return Ok(());
    }

    if weeks.is_empty() {
        println!("No sessions logged yet.");
        return Ok(());
    }

    println!(
        "{:<12} {:<10} {:<10} {:>5} {:>7} {:>8} {:>5}",
        "week", "status", "outcome", "days", "logged", "strength", "sick"
    );
    for week in &weeks {
        println!(
            "{:<12} {:<10} {:<10} {:>5} {:>7} {:>8} {:>5}",
            week.week_start.to_string(),
            week.status.as_str(),
            week.outcome.label(),
            week.outcome
                .days()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
            week.logged_days,
            week.strength_sessions,
            week.sick_days
        );
    }

    Ok(())
}

fn cmd_export(paths: &Paths, now: NaiveDateTime, out: &Path, config: &Config) -> Result<()> {
    let sessions = load_history(&paths.history)?;
    let schedule = ScheduleState::load(&paths.schedule)?;
    let weeks = week_breakdown(&sessions, now, schedule.active_week_zero(), &config.streak)?;

    let count = write_week_csv(&weeks, out)?;
    println!("✓ Exported {} weeks to {}", count, out.display());
    Ok(())
}

fn cmd_reset_cycle(paths: &Paths, now: NaiveDateTime) -> Result<()> {
    ScheduleState::update(&paths.schedule, |state| {
        state.reset_cycle(now.date());
        Ok(())
    })?;
    println!("✓ Cycle reset on {}", now.date());
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}
