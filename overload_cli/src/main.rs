use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use overload_core::config::WeightUnit;
use overload_core::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "overload")]
#[command(about = "Progressive overload training log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Weekly plan file (defaults to plan.toml in the data directory)
    #[arg(long, global = true)]
    plan: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the next target weight from a JSON prescription and history
    Decide {
        /// JSON file with `prescription` and `history` (sets per session, newest first)
        #[arg(long)]
        input: PathBuf,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the projected week without logging anything
    Preview,

    /// Start (or resume) the session for a date
    Start {
        /// Session date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log reps and weight for one set
    Log {
        #[arg(long)]
        session: Uuid,

        #[arg(long)]
        exercise: String,

        #[arg(long)]
        set: u32,

        #[arg(long)]
        reps: Option<String>,

        #[arg(long)]
        weight: Option<String>,
    },

    /// Skip one exercise in a session
    SkipExercise {
        #[arg(long)]
        session: Uuid,

        #[arg(long)]
        exercise: String,
    },

    /// Mark a session completed
    Complete {
        #[arg(long)]
        session: Uuid,

        #[arg(long)]
        note: Option<String>,
    },

    /// Skip a whole session
    SkipDay {
        #[arg(long)]
        session: Uuid,
    },

    /// Export logged sets of completed sessions to CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },

    /// Rewrite the session log with one line per session
    Compact,

    /// Weekly volume and estimated 1RM over completed sessions
    Stats {
        /// First day, YYYY-MM-DD (defaults to 84 days before --to)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default config and weekly plan if they do not exist yet
    Init,
}

/// Input file for `overload decide`
#[derive(Deserialize)]
struct DecideInput {
    prescription: ExercisePrescription,
    #[serde(default)]
    history: Vec<Vec<SetRecord>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        overload_core::logging::init_with_level("debug");
    } else {
        overload_core::logging::init();
    }

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let plan_path = cli.plan.unwrap_or_else(|| data_dir.join("plan.toml"));
    let log = SessionLog::new(data_dir.join("sessions.jsonl"));
    let window = config.progression.history_window;
    let unit = config.display.unit;

    match cli.command {
        Commands::Decide { input, json } => cmd_decide(&input, json, unit),
        Commands::Preview => cmd_preview(&log, &plan_path, window, unit),
        Commands::Start { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            cmd_start(&log, &plan_path, date, window, unit)
        }
        Commands::Log {
            session,
            exercise,
            set,
            reps,
            weight,
        } => {
            let raw = SetRecord::from_raw(set, reps.as_deref(), weight.as_deref());
            if reps.is_some() && raw.actual_reps.is_none() {
                eprintln!("Ignoring unusable reps value: {}", reps.unwrap_or_default());
            }
            if weight.is_some() && raw.actual_weight.is_none() {
                eprintln!("Ignoring unusable weight value: {}", weight.unwrap_or_default());
            }
            log_set(
                &log,
                session,
                &exercise,
                set,
                raw.actual_reps,
                raw.actual_weight,
            )?;
            println!("✓ Logged {} set {}", exercise, set);
            Ok(())
        }
        Commands::SkipExercise { session, exercise } => {
            skip_exercise(&log, session, &exercise)?;
            println!("✓ Skipped {}", exercise);
            Ok(())
        }
        Commands::Complete { session, note } => {
            complete_session(&log, session, note)?;
            println!("✓ Session completed!");
            Ok(())
        }
        Commands::SkipDay { session } => {
            skip_session(&log, session)?;
            println!("✓ Session skipped");
            Ok(())
        }
        Commands::Export { out } => {
            let sessions = log.load()?;
            let count = export_sets_csv(&sessions, &out)?;
            println!("✓ Exported {} sets", count);
            println!("  CSV: {}", out.display());
            Ok(())
        }
        Commands::Compact => {
            if !log.path().exists() {
                println!("No session log found - nothing to compact.");
                return Ok(());
            }
            let kept = log.compact()?;
            println!("✓ Compacted session log to {} sessions", kept);
            Ok(())
        }
        Commands::Stats { from, to, json } => {
            let (default_from, to) =
                stats::default_range(to.unwrap_or_else(|| Local::now().date_naive()));
            cmd_stats(&log, from.unwrap_or(default_from), to, json, unit)
        }
        Commands::Init => cmd_init(&config, &plan_path),
    }
}

fn cmd_decide(input: &Path, json: bool, unit: WeightUnit) -> Result<()> {
    let contents = std::fs::read_to_string(input)?;
    let input: DecideInput = serde_json::from_str(&contents)?;

    let history: Vec<SessionPerformance> = input
        .history
        .into_iter()
        .map(SessionPerformance::completed)
        .collect();
    let decision = decide_detailed(&input.prescription, &history);

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    match decision.target_weight {
        Some(weight) => println!("Next target: {} {}", format_weight(weight), unit),
        None => println!("Next target: none (no basis for a weight)"),
    }
    println!("  Reason: {}", describe_outcome(&decision.outcome));
    Ok(())
}

fn cmd_preview(log: &SessionLog, plan_path: &Path, window: usize, unit: WeightUnit) -> Result<()> {
    let plan = WeeklyPlan::load(plan_path)?;
    let sessions = log.load()?;
    let week = preview_week(&plan, sessions.as_slice(), window)?;

    for day in &week {
        println!("{}  {}", day.weekday, day.title);
        for exercise in &day.exercises {
            println!("    {}", format_exercise(exercise.name.as_str(), &exercise.prescription, unit));
        }
    }
    Ok(())
}

fn cmd_start(
    log: &SessionLog,
    plan_path: &Path,
    date: NaiveDate,
    window: usize,
    unit: WeightUnit,
) -> Result<()> {
    let plan = WeeklyPlan::load(plan_path)?;
    let session = start_session(log, &plan, date, window)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} SESSION ({:?})", session.date, session.status);
    println!("╰─────────────────────────────────────────╯");
    println!("  Session: {}", session.id);
    println!();

    if session.exercises.is_empty() {
        println!("  Rest day - nothing planned.");
    }
    for exercise in &session.exercises {
        println!(
            "  → {} [{}]",
            format_exercise(&exercise.name, &exercise.prescription, unit),
            exercise.exercise_id
        );
    }
    println!();
    Ok(())
}

fn cmd_stats(
    log: &SessionLog,
    from: NaiveDate,
    to: NaiveDate,
    json: bool,
    unit: WeightUnit,
) -> Result<()> {
    if from > to {
        return Err(Error::Other(format!("--from {} is after --to {}", from, to)));
    }

    let sessions = log.load()?;
    let summary = summarize(&sessions, from, to);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Stats {} to {}", from, to);
    if summary.weekly_volume.is_empty() {
        println!("  No completed sets in range.");
        return Ok(());
    }

    println!("\nWeekly volume:");
    for week in &summary.weekly_volume {
        println!(
            "  {}  {} {}",
            week.week_start,
            format_weight(increment::round_to_two_decimals(week.total_volume)),
            unit
        );
    }

    println!("\nBest estimated 1RM:");
    for exercise in &summary.one_rm_by_exercise {
        println!(
            "  {}: {} {}",
            exercise.exercise_name,
            format_weight(exercise.best_one_rm),
            unit
        );
    }

    for series in &summary.one_rm_series {
        println!("\n{} 1RM trend:", series.exercise_name);
        for point in &series.points {
            println!("  {}  {} {}", point.date, format_weight(point.estimated_one_rm), unit);
        }
    }
    Ok(())
}

fn cmd_init(config: &Config, plan_path: &Path) -> Result<()> {
    let config_path = Config::default_config_path();
    if config_path.exists() {
        println!("Config already exists: {}", config_path.display());
    } else {
        config.save_to(&config_path)?;
        println!("✓ Wrote config: {}", config_path.display());
    }

    if plan_path.exists() {
        println!("Plan already exists: {}", plan_path.display());
    } else {
        plan::default_split().save_to(plan_path)?;
        println!("✓ Wrote plan: {}", plan_path.display());
    }
    Ok(())
}

fn format_exercise(name: &str, prescription: &ExercisePrescription, unit: WeightUnit) -> String {
    let reps = if prescription.rep_low == prescription.rep_high {
        prescription.rep_low.to_string()
    } else {
        format!("{}-{}", prescription.rep_low, prescription.rep_high)
    };
    match prescription.target_weight {
        Some(weight) => format!(
            "{}: {} x {} @ {} {}",
            name,
            prescription.set_count,
            reps,
            format_weight(weight),
            unit
        ),
        None => format!("{}: {} x {}", name, prescription.set_count, reps),
    }
}

fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.0}", weight)
    } else {
        format!("{}", weight)
    }
}

fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::NoHistory => "no completed sessions yet".into(),
        Outcome::NoEvaluation => "no logged sets in recent sessions".into(),
        Outcome::NoBasis => "no positive weight to build on".into(),
        Outcome::NoSetTarget => "no set target".into(),
        Outcome::Successful { streak, multiplier } => {
            format!("successful (streak {}, x{})", streak, multiplier)
        }
        Outcome::Close => "close to target".into(),
        Outcome::Plateau => "plateau".into(),
        Outcome::Hold => "hold".into(),
    }
}
