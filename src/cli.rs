//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_storage_adapter::FileStorageAdapter;
use crate::domain::calendar::{DayOutcome, YearMonth};
use crate::domain::config_validation::validate_journal_config;
use crate::domain::error::JournalError;
use crate::domain::journal_config::JournalConfig;
use crate::domain::ledger::{AppendOutcome, LedgerStore};
use crate::domain::metrics::{
    default_tag_set, equity_curve, history, mental_vs_pl, monthly_calendar, per_tag_aggregate,
    recent_win_streak, time_of_day_buckets, todays_snapshot, LedgerSummary,
    DEFAULT_TIME_BUCKET_LABELS,
};
use crate::domain::synthetic::RandomDuration;
use crate::domain::trade::{parse_date, Direction, InstrumentSpec, Tag, TradeInput, TradeRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;

#[derive(Parser, Debug)]
#[command(name = "tradejournal", about = "Discretionary trade journal")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log a trade
    Add {
        #[arg(long)]
        direction: String,
        #[arg(long, allow_hyphen_values = true)]
        entry: String,
        #[arg(long, allow_hyphen_values = true)]
        exit: String,
        /// Setup name, or "Custom" together with --custom-tag
        #[arg(long, default_value = "VWAP Bounce")]
        tag: String,
        #[arg(long)]
        custom_tag: Option<String>,
        /// Mental state from 1 (angry) to 5 (happy)
        #[arg(long, default_value_t = 3)]
        mental: i64,
        #[arg(long, default_value = "")]
        lesson: String,
        #[arg(long)]
        screenshot: Option<String>,
        /// Trading day, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the day's trade, the win streak and the month calendar
    Dashboard {
        #[arg(long)]
        date: Option<String>,
    },
    /// List trades, newest first
    History,
    /// Strategy, time-of-day, equity and mental-state breakdowns
    Analyses,
    /// Write the ledger to a CSV spreadsheet
    Export {
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Month used in the file name, defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let today = Local::now().date_naive();

    let result = match cli.command {
        Command::Add {
            direction,
            entry,
            exit,
            tag,
            custom_tag,
            mental,
            lesson,
            screenshot,
            date,
        } => build_trade_input(
            &direction,
            entry,
            exit,
            &tag,
            custom_tag.as_deref(),
            mental,
            lesson,
            screenshot,
        )
        .and_then(|input| {
            let day = resolve_date(date.as_deref(), today)?;
            Ok(run_add(&config, &input, day))
        }),
        Command::Dashboard { date } => resolve_date(date.as_deref(), today).map(|day| {
            let ledger = open_ledger(&config);
            print!("{}", render_dashboard(ledger.all(), day, &config));
            ExitCode::SUCCESS
        }),
        Command::History => {
            let ledger = open_ledger(&config);
            print!("{}", render_history(ledger.all()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Analyses => {
            let ledger = open_ledger(&config);
            print!("{}", render_analyses(ledger.all(), &config));
            Ok(ExitCode::SUCCESS)
        }
        Command::Export { output_dir, month } => {
            run_export(&config, output_dir, month.as_deref(), today)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<JournalConfig, ExitCode> {
    let adapter = match path {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| {
                let err = JournalError::ConfigParse {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                };
                eprintln!("error: {err}");
                ExitCode::from(&err)
            })?
        }
        None => FileConfigAdapter::empty(),
    };

    build_journal_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_journal_config(adapter: &dyn ConfigPort) -> Result<JournalConfig, JournalError> {
    validate_journal_config(adapter)?;
    let defaults = JournalConfig::default();

    Ok(JournalConfig {
        storage_dir: adapter
            .get_string("journal", "storage_dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir),
        storage_key: adapter
            .get_string("journal", "storage_key")
            .map(|k| k.trim().to_string())
            .unwrap_or(defaults.storage_key),
        instrument: InstrumentSpec {
            point_value: adapter.get_double(
                "journal",
                "point_value",
                defaults.instrument.point_value,
            ),
            stop_distance: adapter.get_double(
                "journal",
                "stop_distance",
                defaults.instrument.stop_distance,
            ),
        },
        streak_window: adapter.get_uint("metrics", "streak_window", defaults.streak_window as u64)
            as usize,
        equity_window: adapter.get_uint("metrics", "equity_window", defaults.equity_window as u64)
            as usize,
        export_dir: adapter
            .get_string("export", "output_dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir),
        file_prefix: adapter
            .get_string("export", "file_prefix")
            .map(|p| p.trim().to_string())
            .unwrap_or(defaults.file_prefix),
    })
}

pub fn open_ledger(config: &JournalConfig) -> LedgerStore<FileStorageAdapter> {
    log::info!("opening ledger in {}", config.storage_dir.display());
    let storage = FileStorageAdapter::new(config.storage_dir.clone());
    LedgerStore::load(storage, &config.storage_key)
}

#[allow(clippy::too_many_arguments)]
pub fn build_trade_input(
    direction: &str,
    entry: String,
    exit: String,
    tag: &str,
    custom_tag: Option<&str>,
    mental: i64,
    lesson: String,
    screenshot: Option<String>,
) -> Result<TradeInput, JournalError> {
    Ok(TradeInput {
        direction: direction.parse::<Direction>()?,
        entry,
        exit,
        tag: Tag::from_selection(tag, custom_tag)?,
        mental,
        lesson,
        screenshot,
    })
}

fn resolve_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, JournalError> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(today),
    }
}

pub fn run_add(config: &JournalConfig, input: &TradeInput, date: NaiveDate) -> ExitCode {
    let mut ledger = open_ledger(config);
    let outcome = match ledger.add_trade(input, date, &config.instrument, &mut RandomDuration::new())
    {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match outcome {
        AppendOutcome::Saved { id } => {
            if let Some(record) = ledger.all().iter().find(|r| r.id == id) {
                println!("Trade saved: {} {}", record.date, format_pl(record.pl));
            }
            ExitCode::SUCCESS
        }
        AppendOutcome::SaveFailed { id, error } => {
            eprintln!("warning: trade {id} was recorded but could not be saved: {error}");
            (&error).into()
        }
    }
}

pub fn run_export(
    config: &JournalConfig,
    output_dir: Option<PathBuf>,
    month: Option<&str>,
    today: NaiveDate,
) -> Result<ExitCode, JournalError> {
    let month = match month {
        Some(raw) => raw.parse::<YearMonth>()?,
        None => YearMonth::of(today),
    };
    let output_dir = output_dir.unwrap_or_else(|| config.export_dir.clone());

    let ledger = open_ledger(config);
    let exporter = CsvExportAdapter::new(config.file_prefix.clone());
    let path = exporter.export(ledger.all(), month, &output_dir)?;

    println!("Exported {} trades to {}", ledger.len(), path.display());
    Ok(ExitCode::SUCCESS)
}

/// `+$25.00` for wins and break-even, `-$20.00` for losses.
pub fn format_pl(pl: f64) -> String {
    if pl >= 0.0 {
        format!("+${:.2}", pl)
    } else {
        format!("-${:.2}", pl.abs())
    }
}

fn outcome_mark(outcome: DayOutcome) -> char {
    match outcome {
        DayOutcome::Win => '+',
        DayOutcome::Loss => '-',
        DayOutcome::NoTrade => '.',
    }
}

pub fn render_dashboard(snapshot: &[TradeRecord], today: NaiveDate, config: &JournalConfig) -> String {
    let mut out = String::new();

    match todays_snapshot(snapshot, today) {
        Some(trade) => {
            let badge = if trade.is_win() { "✅" } else { "❌" };
            let _ = writeln!(out, "=== {} ===", trade.date);
            let _ = writeln!(out, "{badge} {}", format_pl(trade.pl));
            let _ = writeln!(out, "Setup:     {}", trade.tag);
            let _ = writeln!(out, "Direction: {}", trade.direction);
            let _ = writeln!(out, "Entry:     {}", trade.entry);
            let _ = writeln!(out, "Exit:      {}", trade.exit);
            let _ = writeln!(out, "R:R:       {}", trade.rr);
            let _ = writeln!(out, "Duration:  {} min", trade.duration_minutes);
            let _ = writeln!(out, "Mental:    {}", trade.mental_state);
            if let Some(screenshot) = &trade.screenshot {
                let _ = writeln!(out, "Chart:     {screenshot}");
            }
            if !trade.lesson.is_empty() {
                let _ = writeln!(out, "Lesson:    {}", trade.lesson);
            }

            let streak = recent_win_streak(snapshot, config.streak_window);
            if streak > 0 {
                let _ = writeln!(out, "Streak:    {} {streak} Wins in a Row", "🔥".repeat(streak));
            } else {
                let _ = writeln!(out, "Streak:    —");
            }
        }
        None => {
            let _ = writeln!(out, "No trade logged for {today}.");
        }
    }

    let calendar = monthly_calendar(snapshot, YearMonth::of(today));
    let strip: String = calendar.outcomes().into_iter().map(outcome_mark).collect();
    let _ = writeln!(out, "\n=== Calendar {} ===", calendar.month);
    let _ = writeln!(out, "{strip}");
    for (day, slot) in calendar.slots.iter().enumerate() {
        if let Some(pl) = slot {
            let _ = writeln!(out, "  {:>2}  {}", day + 1, format_pl(*pl));
        }
    }
    out
}

pub fn render_history(snapshot: &[TradeRecord]) -> String {
    let mut out = String::new();
    if snapshot.is_empty() {
        let _ = writeln!(out, "No trades logged yet.");
        return out;
    }
    let _ = writeln!(
        out,
        "{:<6} {:>11}  {:<18} {:>4}  {:>7}  Mental",
        "Date", "P/L", "Setup", "R:R", "Time"
    );
    for trade in history(snapshot) {
        let _ = writeln!(
            out,
            "{:<6} {:>11}  {:<18} {:>4}  {:>3} min  {}",
            trade.short_date(),
            format_pl(trade.pl),
            trade.tag.label(),
            trade.rr,
            trade.duration_minutes,
            trade.mental_state,
        );
    }
    out
}

pub fn render_analyses(snapshot: &[TradeRecord], config: &JournalConfig) -> String {
    let mut out = String::new();

    let summary = LedgerSummary::compute(snapshot);
    let _ = writeln!(out, "=== Summary ===");
    let _ = writeln!(out, "Trades:        {}", summary.total_trades);
    let _ = writeln!(out, "Win Rate:      {:.1}%", summary.win_rate);
    let _ = writeln!(out, "Total P/L:     {}", format_pl(summary.total_pl));
    let _ = writeln!(out, "Average P/L:   {}", format_pl(summary.avg_pl));
    let _ = writeln!(out, "Largest Win:   {}", format_pl(summary.largest_win));
    let _ = writeln!(out, "Largest Loss:  {}", format_pl(-summary.largest_loss));

    let tags = default_tag_set();
    let aggregate = per_tag_aggregate(snapshot, &tags);
    let _ = writeln!(out, "\n=== Strategy ===");
    for ((tag, win_rate), avg_pl) in aggregate
        .tags
        .iter()
        .zip(&aggregate.win_rates)
        .zip(&aggregate.avg_pls)
    {
        let _ = writeln!(
            out,
            "  {:<16} win {:>5.1}%  avg {} (|{:.2}|)",
            tag.label(),
            win_rate,
            format_pl(*avg_pl),
            avg_pl.abs()
        );
    }

    let _ = writeln!(out, "\n=== Time of Day ===");
    for bucket in time_of_day_buckets(snapshot, &DEFAULT_TIME_BUCKET_LABELS) {
        let _ = writeln!(out, "  {:>5}  {}", bucket.label, format_pl(bucket.pl));
    }

    let _ = writeln!(out, "\n=== Equity Curve ===");
    for point in equity_curve(snapshot, config.equity_window) {
        let _ = writeln!(out, "  {}  {}", point.label, format_pl(point.cumulative));
    }

    let _ = writeln!(out, "\n=== Mental State vs P/L ===");
    for point in mental_vs_pl(snapshot) {
        let _ = writeln!(out, "  {}  {}", point.ordinal, format_pl(point.pl));
    }
    out
}
