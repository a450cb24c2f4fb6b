//! Goalcast CLI - goal progress prediction and analytics.

mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate};
use clap::{Parser, Subcommand};
use goalcast_analytics::{today, AnalyticsService, GoalAnalytics};
use goalcast_core::{CurrentState, GoalCompletion, GoalId, NewGoal};
use goalcast_engine::PredictionEngine;
use goalcast_storage::{generate_history, monday_of, JsonStore, ProgressStore};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use settings::Settings;

#[derive(Parser)]
#[command(name = "goalcast")]
#[command(about = "Goal progress prediction and analytics", long_about = None)]
struct Cli {
    /// Store directory
    #[arg(long, global = true, default_value = ".goalcast")]
    data: PathBuf,

    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the goal target value
    #[arg(long, global = true)]
    target: Option<f64>,

    /// Override the goal deadline (YYYY-MM-DD)
    #[arg(long, global = true)]
    deadline: Option<NaiveDate>,

    /// User whose goals are used
    #[arg(long, global = true, default_value = "default")]
    user: String,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill an empty store with a generated demo history
    Seed {
        /// Last generated day (defaults to today)
        #[arg(long)]
        until: Option<NaiveDate>,
        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Replace an existing history
        #[arg(long)]
        force: bool,
    },
    /// Record the progress value of a day
    Record {
        /// Day (YYYY-MM-DD)
        date: NaiveDate,
        /// Cumulative progress value
        value: f64,
        /// Goals completed that day
        #[arg(long, default_value = "0")]
        goals: u32,
    },
    /// Train the models and print their scores
    Train,
    /// Predict the final progress value
    Predict {
        /// Current progress (defaults to the latest recorded value)
        #[arg(long)]
        progress: Option<f64>,
        /// Days since campaign start (required with --progress)
        #[arg(long, requires = "progress")]
        days_elapsed: Option<f64>,
        /// Momentum score
        #[arg(long, requires = "progress")]
        momentum: Option<f64>,
        /// Consistency score
        #[arg(long, requires = "progress")]
        consistency: Option<f64>,
        /// Evaluation date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Full analytics snapshot
    Analytics {
        /// Evaluation date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Model training state and data quality
    Insights,
    /// Manage weekly goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Add a weekly goal
    Add {
        /// Description
        description: String,
        /// Target value
        target_value: f64,
        /// Any day of the goal's week (defaults to this week)
        #[arg(long)]
        week: Option<NaiveDate>,
        /// Category
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// Mark a goal as completed or failed
    Complete {
        /// Goal ID
        id: String,
        /// Achieved value
        #[arg(long)]
        actual: Option<f64>,
        /// Record the goal as not completed
        #[arg(long)]
        failed: bool,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List goals
    List {
        /// Only goals of the week containing this day
        #[arg(long)]
        week: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(cli.config.as_deref())
        .await?
        .with_overrides(cli.target, cli.deadline);
    let mut store = JsonStore::new(&cli.data).await?;

    match cli.command {
        Commands::Seed { until, seed, force } => {
            let existing = store.get_progress_series().await?;
            if !existing.is_empty() && !force {
                warn!(
                    "Store already holds {} observations; use --force to replace them",
                    existing.len()
                );
                return Ok(());
            }
            let history = generate_history(settings.goal.campaign_start, until.unwrap_or_else(today), seed)?;
            store.save_progress_series(&history).await?;
            info!("Seeded {} observations", history.len());
            print_json(&history.last())?;
        }
        Commands::Record { date, value, goals } => {
            let obs = store.append_progress(date, value, goals).await?;
            print_json(&obs)?;
        }
        Commands::Goal { command } => run_goal_command(&mut store, &cli.user, command).await?,
        Commands::Train => {
            let service = service(store, &settings);
            print_json(&service.train_report().await?)?;
        }
        Commands::Predict {
            progress,
            days_elapsed,
            momentum,
            consistency,
            as_of,
        } => {
            let as_of = as_of.unwrap_or_else(today);
            let service = service(store, &settings);
            service.train_from_store().await?;

            let prediction = match progress {
                Some(current_progress) => {
                    let state = CurrentState {
                        current_progress,
                        days_elapsed: days_elapsed
                            .unwrap_or_else(|| settings.goal.days_elapsed(as_of) as f64),
                        week_number: as_of.iso_week().week(),
                        month_number: as_of.month(),
                        momentum_score: momentum,
                        consistency_score: consistency,
                        ..Default::default()
                    };
                    service.engine().predict(&state, as_of)
                }
                None => service.prediction_as_of(&cli.user, as_of).await?,
            };
            print_json(&prediction)?;
        }
        Commands::Analytics { as_of } => {
            let service = service(store, &settings);
            service.train_from_store().await?;
            let snapshot = match as_of {
                Some(as_of) => service.analytics_as_of(&cli.user, as_of).await?,
                None => service.analytics(&cli.user).await?,
            };
            print_json(&snapshot)?;
        }
        Commands::Insights => {
            let service = service(store, &settings);
            service.train_from_store().await?;
            print_json(&service.insights().await?)?;
        }
    }

    Ok(())
}

async fn run_goal_command(store: &mut JsonStore, user: &str, command: GoalCommands) -> Result<()> {
    match command {
        GoalCommands::Add {
            description,
            target_value,
            week,
            category,
        } => {
            let week_start = monday_of(week.unwrap_or_else(today));
            let goal = NewGoal {
                week_start,
                week_end: week_start + Duration::days(6),
                description,
                target_value,
                category,
            };
            let id = store.create_goal(goal, user).await?;
            print_json(&store.load_goal(id).await?)?;
        }
        GoalCommands::Complete {
            id,
            actual,
            failed,
            notes,
        } => {
            let goal_id: GoalId = id.parse().map_err(|_| anyhow!("Invalid goal ID: {}", id))?;
            let completion = GoalCompletion {
                goal_id,
                completed: !failed,
                actual_value: actual,
                notes,
            };
            if !store.complete_goal(&completion, user).await? {
                return Err(anyhow!("Goal {} not found for {}", goal_id, user));
            }
            print_json(&store.load_goal(goal_id).await?)?;
        }
        GoalCommands::List { week } => {
            let goals = store.list_goals(user, week.map(monday_of)).await?;
            print_json(&goals)?;
        }
    }
    Ok(())
}

fn service(store: JsonStore, settings: &Settings) -> AnalyticsService<JsonStore> {
    let engine = PredictionEngine::new(settings.goal.clone()).with_config(settings.engine.clone());
    AnalyticsService::new(store, Arc::new(engine))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_record() {
        let cli = Cli::parse_from(["goalcast", "--data", "/tmp/gc", "record", "2025-03-01", "812.5", "--goals", "2"]);
        assert_eq!(cli.data, PathBuf::from("/tmp/gc"));
        match cli.command {
            Commands::Record { date, value, goals } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
                assert_eq!(value, 812.5);
                assert_eq!(goals, 2);
            }
            _ => panic!("expected record"),
        }
    }

    #[test]
    fn test_predict_flags_require_progress() {
        assert!(Cli::try_parse_from(["goalcast", "predict", "--days-elapsed", "10"]).is_err());
        assert!(Cli::try_parse_from(["goalcast", "predict", "--progress", "500", "--days-elapsed", "10"]).is_ok());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from(["goalcast", "analytics", "--user", "ana@example.com", "--target", "9000"]);
        assert_eq!(cli.user, "ana@example.com");
        assert_eq!(cli.target, Some(9000.0));
    }
}
