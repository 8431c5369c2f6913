use anyhow::{Context, Result};
use chrono::{Datelike, Local, Weekday};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use stresscast::config::AppConfig;
use stresscast::error::{ErrorSeverity, StressCastError};
use stresscast::export::{self, ExportFormat};
use stresscast::forecast;
use stresscast::history::{HistoryError, HistoryStore, StressHistory};
use stresscast::logging::{init_logging, LogLevel};
use stresscast::models::{LifestyleMetrics, Recommendation, RiskLevel};
use stresscast::scoring::ScoreBreakdown;
use stresscast::tracker::StressTracker;
use stresscast::StressModel;

/// StressCast - Lifestyle Stress Forecasting CLI
///
/// Scores today's stress from sleep, exercise, work, caffeine and social
/// time, forecasts the next seven days and suggests what to change.
#[derive(Parser)]
#[command(name = "stresscast")]
#[command(author = "StressCast Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Lifestyle Stress Forecasting CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Seed the forecast noise for reproducible output
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Today's lifestyle metrics; values are clamped to range and snapped to
/// each metric's input step
#[derive(Args, Debug, Clone)]
struct MetricArgs {
    /// Hours slept last night (0-12)
    #[arg(long, default_value_t = 7.0)]
    sleep: f64,

    /// Exercise sessions per week (0-7)
    #[arg(long, default_value_t = 3.0)]
    exercise: f64,

    /// Hours worked today (0-14)
    #[arg(long, default_value_t = 8.0)]
    work: f64,

    /// Cups of coffee or equivalent (0-5)
    #[arg(long, default_value_t = 2.0)]
    caffeine: f64,

    /// Hours spent socializing (0-10)
    #[arg(long, default_value_t = 3.0)]
    social: f64,
}

impl MetricArgs {
    fn to_metrics(&self) -> Result<LifestyleMetrics> {
        let metrics =
            LifestyleMetrics::new(self.sleep, self.exercise, self.work, self.caffeine, self.social)
                .map_err(StressCastError::from)?;
        Ok(metrics.snapped())
    }
}

#[derive(Args, Debug, Clone)]
struct HistoryArgs {
    /// History file (defaults to the configured location)
    #[arg(long = "history", value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate today's stress score
    Score {
        #[command(flatten)]
        metrics: MetricArgs,

        /// Show how each factor contributes
        #[arg(short, long)]
        explain: bool,
    },

    /// Forecast stress for the next seven days
    Forecast {
        #[command(flatten)]
        metrics: MetricArgs,

        #[command(flatten)]
        history: HistoryArgs,

        /// Weekday to forecast from (defaults to today)
        #[arg(short, long, value_name = "DAY")]
        today: Option<String>,
    },

    /// Suggest changes based on metrics and forecast
    Recommend {
        #[command(flatten)]
        metrics: MetricArgs,

        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Full stress report, printed or exported
    Report {
        #[command(flatten)]
        metrics: MetricArgs,

        #[command(flatten)]
        history: HistoryArgs,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format (json, csv, text)
        #[arg(short = 'f', long, default_value = "json")]
        format: String,
    },

    /// Manage the stored stress history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage application settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show stored days
    List {
        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Record today's metrics, replacing any earlier record for today
    Record {
        #[command(flatten)]
        metrics: MetricArgs,

        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Commit today's record under a day label
    CloseDay {
        #[command(flatten)]
        history: HistoryArgs,

        /// Label for the closed day (defaults to today's weekday)
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Write stored days to a file
    Export {
        #[command(flatten)]
        history: HistoryArgs,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json, text)
        #[arg(short = 'f', long, default_value = "csv")]
        format: String,
    },

    /// Delete the history file
    Clear {
        #[command(flatten)]
        history: HistoryArgs,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Tabled)]
struct FactorRow {
    #[tabled(rename = "Factor")]
    factor: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Normalized")]
    normalized: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Contribution")]
    contribution: String,
}

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Stress")]
    score: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Day")]
    label: String,
    #[tabled(rename = "Stress")]
    score: String,
    #[tabled(rename = "Sleep (h)")]
    sleep: String,
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Work (h)")]
    work: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default()?,
    };

    if let Some(level) = LogLevel::from_verbosity(cli.verbose) {
        config.logging.level = level;
    }
    if cli.seed.is_some() {
        config.forecast.seed = cli.seed;
    }

    init_logging(&config.logging)?;

    if let Err(err) = run(cli.command, cli.config, &config) {
        let app_err = match err.downcast::<StressCastError>() {
            Ok(app_err) => app_err,
            Err(err) => match err.downcast::<HistoryError>() {
                Ok(history_err) => StressCastError::from(history_err),
                Err(err) => return Err(err),
            },
        };

        match app_err.severity() {
            ErrorSeverity::Error => tracing::error!(error = %app_err, "Command failed"),
            ErrorSeverity::Warning => tracing::warn!(error = %app_err, "Command failed"),
        }
        eprintln!("{} {}", "Error:".red().bold(), app_err.user_message());
        std::process::exit(1);
    }

    Ok(())
}

fn run(command: Commands, config_path: Option<PathBuf>, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Score { metrics, explain } => {
            let metrics = metrics.to_metrics()?;
            let model = config.build_model();
            let breakdown = model.score_breakdown(&metrics);

            println!("{}", "Current Stress".cyan().bold());
            println!("  Stress Score: {}", colored_score(breakdown.score));
            if explain {
                print_breakdown(&breakdown);
            }
        }

        Commands::Forecast {
            metrics,
            history,
            today,
        } => {
            let today = match today {
                Some(day) => parse_weekday(&day)?,
                None => Local::now().weekday(),
            };
            let tracker = open_tracker(config, &metrics, &history, today)?;
            let state = tracker.state();

            println!("{}", "7-Day Stress Forecast".cyan().bold());
            println!("  Current: {}", colored_score(state.stress_score()));
            print_forecast(&state.forecast);
            if let Some(average) = forecast::average_predicted(&state.forecast) {
                println!("  Average: {:.1}", average);
            }
            println!(
                "  Risk Level: {} ({})",
                colored_risk(state.risk_level),
                state.risk_level.description()
            );
        }

        Commands::Recommend { metrics, history } => {
            let tracker = open_tracker(config, &metrics, &history, Local::now().weekday())?;
            print_recommendations(&tracker.state().recommendations);
        }

        Commands::Report {
            metrics,
            history,
            output,
            format,
        } => {
            let tracker = open_tracker(config, &metrics, &history, Local::now().weekday())?;
            let report = tracker.report();

            match output {
                Some(path) => {
                    let format: ExportFormat = format.parse().map_err(StressCastError::from)?;
                    export::export_report(&report, format, &path).map_err(StressCastError::from)?;
                    println!(
                        "{}",
                        format!("✓ Report written to {}", path.display()).green()
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    export::text::write_stress_report(&report, &mut stdout)
                        .map_err(StressCastError::from)?;
                }
            }
        }

        Commands::History { action } => run_history(config, action)?,

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let text = toml::to_string_pretty(config)
                    .context("Failed to serialize configuration to TOML")?;
                println!("{}", text);
            }
            ConfigAction::Init { force } => {
                let path = config_path.unwrap_or_else(AppConfig::default_config_path);
                if path.exists() && !force {
                    anyhow::bail!(
                        "Config file {} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                AppConfig::default().save_to_file(&path)?;
                println!(
                    "{}",
                    format!("✓ Configuration written to {}", path.display()).green()
                );
            }
        },
    }

    Ok(())
}

fn run_history(config: &AppConfig, action: HistoryAction) -> Result<()> {
    match action {
        HistoryAction::List { history } => {
            let store = history_store(config, &history);
            let history = store.load_or_empty(config.history.window)?;
            if history.is_empty() {
                println!("{}", "No stress history recorded yet".dimmed());
                return Ok(());
            }
            print_history(&history);
        }

        HistoryAction::Record { metrics, history } => {
            let store = history_store(config, &history);
            let tracker = open_tracker(config, &metrics, &history, Local::now().weekday())?;
            let score = tracker.stress_score();
            store.save(&tracker.into_history())?;
            println!(
                "{} {}",
                "✓ Recorded today's stress:".green(),
                colored_score(score)
            );
        }

        HistoryAction::CloseDay { history, label } => {
            let store = history_store(config, &history);
            let mut history = store.load_or_empty(config.history.window)?;
            let label = label.unwrap_or_else(|| Local::now().weekday().to_string());
            let closed = history.close_day(label)?;
            store.save(&history)?;
            println!(
                "{}",
                format!("✓ Closed {} at {}/10", closed.label, closed.stress_score).green()
            );
        }

        HistoryAction::Export {
            history,
            output,
            format,
        } => {
            let format: ExportFormat = format.parse().map_err(StressCastError::from)?;
            let history = history_store(config, &history).load_or_empty(config.history.window)?;
            export::export_history(&history.records(), format, &output)
                .map_err(StressCastError::from)?;
            println!(
                "{}",
                format!("✓ {} days written to {}", history.len(), output.display()).green()
            );
        }

        HistoryAction::Clear { history } => {
            let store = history_store(config, &history);
            store.clear()?;
            println!("{}", "✓ History cleared".green());
        }
    }

    Ok(())
}

fn history_store(config: &AppConfig, args: &HistoryArgs) -> HistoryStore {
    match &args.file {
        Some(path) => HistoryStore::new(path.clone()),
        None => config.history_store(),
    }
}

fn open_tracker(
    config: &AppConfig,
    metrics: &MetricArgs,
    history: &HistoryArgs,
    today: Weekday,
) -> Result<StressTracker> {
    let metrics = metrics.to_metrics()?;
    let history: StressHistory =
        history_store(config, history).load_or_empty(config.history.window)?;
    let model: StressModel = config.build_model();
    let tracker = StressTracker::starting_on(
        model,
        today,
        metrics,
        history,
        config.forecast.noise_source(),
    )?;
    Ok(tracker)
}

fn parse_weekday(day: &str) -> Result<Weekday> {
    let weekday = day.parse::<Weekday>().map_err(|_| {
        StressCastError::Validation(format!(
            "Invalid weekday: {} (expected e.g. Mon or monday)",
            day
        ))
    })?;
    Ok(weekday)
}

fn colored_score(score: u8) -> ColoredString {
    let text = format!("{}/10", score);
    match score {
        0..=3 => text.green().bold(),
        4..=6 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

fn colored_risk(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::Low => risk.to_string().green(),
        RiskLevel::Medium => risk.to_string().yellow(),
        RiskLevel::High => risk.to_string().red().bold(),
    }
}

fn print_breakdown(breakdown: &ScoreBreakdown) {
    let rows: Vec<FactorRow> = breakdown
        .factors
        .iter()
        .map(|f| FactorRow {
            factor: f.metric.to_string(),
            value: format!("{} {}", f.value, f.metric.unit()),
            normalized: format!("{:.2}", f.normalized),
            weight: format!("{:+.1}", f.weight),
            contribution: format!("{:+.2}", f.contribution),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!("  Raw model output: {:.2}", breakdown.raw_score);
    if let Some(stressor) = breakdown.main_stressor() {
        println!("  Main stressor: {}", stressor.metric.to_string().red());
    }
    if let Some(relief) = breakdown.main_relief() {
        println!("  Main relief: {}", relief.metric.to_string().green());
    }
}

fn print_forecast(forecast: &[stresscast::ForecastEntry]) {
    let rows: Vec<ForecastRow> = forecast
        .iter()
        .map(|e| ForecastRow {
            day: e.day_label.clone(),
            score: format!("{}/10", e.predicted_score),
            confidence: format!("{}%", e.confidence_percent),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_history(history: &StressHistory) {
    let rows: Vec<HistoryRow> = history
        .records()
        .into_iter()
        .map(|r| HistoryRow {
            label: r.label,
            score: format!("{}/10", r.stress_score),
            sleep: format!("{:.1}", r.sleep_hours),
            exercise: format!("{:.0}", r.exercise_sessions),
            work: format!("{:.1}", r.work_hours),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("{}", "✓ No changes needed, keep it up".green());
        return;
    }

    println!("{}", "Recommendations".cyan().bold());
    for recommendation in recommendations {
        println!("  • {}", recommendation.title.bold());
        println!("    {}", recommendation.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_args_clamp_and_snap() {
        let args = MetricArgs {
            sleep: 7.3,
            exercise: 2.6,
            work: 20.0,
            caffeine: 1.2,
            social: -1.0,
        };
        let metrics = args.to_metrics().unwrap();
        assert_eq!(metrics.sleep_hours, 7.5);
        assert_eq!(metrics.exercise_sessions, 3.0);
        assert_eq!(metrics.work_hours, 14.0);
        assert_eq!(metrics.caffeine_cups, 1.0);
        assert_eq!(metrics.social_hours, 0.0);
    }

    #[test]
    fn test_non_finite_metric_is_a_metric_error() {
        let args = MetricArgs {
            sleep: f64::NAN,
            exercise: 3.0,
            work: 8.0,
            caffeine: 2.0,
            social: 3.0,
        };
        let err = args.to_metrics().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StressCastError>(),
            Some(StressCastError::Metric(_))
        ));
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Mon").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("friday").unwrap(), Weekday::Fri);

        let err = parse_weekday("Funday").unwrap_err();
        let app_err = err.downcast_ref::<StressCastError>().unwrap();
        assert!(matches!(app_err, StressCastError::Validation(_)));
        assert_eq!(app_err.severity(), ErrorSeverity::Warning);
    }
}
