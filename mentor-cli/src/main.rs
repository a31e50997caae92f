use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};

use mentor_core::{DraftKind, StudyEngine};
use mentor_ingest::ScheduleInputs;

mod config;
mod model_client;
mod plan_store;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "mentor",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MENTOR_BUILD_SHA"), ")"),
    about = "Campus study assistant: goals to plans to a week you can actually do"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ~/.mentor/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Analyze a goal without creating a plan
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Create and inspect study plans
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// Work with tasks of the active plan
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Show progress through the active plan
    Progress {
        #[arg(long)]
        user: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Schedule study time for assignment exports
    Assignments {
        #[command(subcommand)]
        command: AssignmentsCommand,
    },

    /// Draft an assignment document
    Draft {
        /// Document title
        title: String,

        /// The assignment prompt or problem statement
        #[arg(long)]
        problem: String,

        /// Requirement line, repeatable
        #[arg(long = "requirement")]
        requirements: Vec<String>,

        /// essay, report, code, or general
        #[arg(long, default_value = "general")]
        kind: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// Turn free text into a structured goal analysis
    Analyze {
        /// The goal, in the student's words
        text: String,

        /// Known context as key=value, repeatable (e.g. --context major=CS)
        #[arg(long)]
        context: Vec<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// Analyze a goal and store a plan for it
    Create {
        /// The goal, in the student's words
        text: String,

        /// Known context as key=value, repeatable
        #[arg(long)]
        context: Vec<String>,

        /// Answer to a clarifying question as question=answer, repeatable
        #[arg(long = "answer")]
        answers: Vec<String>,

        #[arg(long)]
        user: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show the active plan and progress
    Show {
        #[arg(long)]
        user: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Mark a task of the active plan complete
    Done {
        /// Task id, e.g. task-3
        task_id: String,

        #[arg(long)]
        user: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AssignmentsCommand {
    /// Allocate study hours for an assignments CSV
    Schedule {
        /// Assignments CSV: title,due,estimated_hours,priority
        #[arg(long)]
        csv: PathBuf,

        /// Timetable CSV of existing commitments: date,hours
        #[arg(long)]
        timetable: Option<PathBuf>,

        /// Override "today" (YYYY-MM-DD), mainly for reproducible output
        #[arg(long)]
        today: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },

        Command::Goal { command } => match command {
            GoalCommand::Analyze { text, context, json } => {
                let engine = build_engine(&cfg)?;
                let context = parse_pairs(&context, "--context")?;
                let verdict = engine.understand_goals(&text, &context)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&verdict)?);
                } else {
                    render::print_goal_analysis(&verdict);
                }
            }
        },

        Command::Plan { command } => match command {
            PlanCommand::Create { text, context, answers, user, json } => {
                let engine = build_engine(&cfg)?;
                let user = user.unwrap_or_else(|| cfg.user.clone());
                let context = parse_pairs(&context, "--context")?;
                let answers = parse_pairs(&answers, "--answer")?;

                let verdict = engine.understand_goals(&text, &context)?;
                let plan = engine.create_plan(&user, &verdict.analysis, &answers)?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&plan)?);
                } else {
                    render::print_plan(&plan);
                    if answers.is_empty() && verdict.requires_input {
                        println!("\nAnswering these would sharpen a re-run:");
                        for question in &verdict.analysis.clarifying_questions {
                            println!("  ? {question}");
                        }
                    }
                }
            }

            PlanCommand::Show { user, json } => {
                let engine = build_engine(&cfg)?;
                let user = user.unwrap_or_else(|| cfg.user.clone());
                let overview = engine.my_plan(&user)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&overview)?);
                } else {
                    render::print_overview(&overview);
                }
            }
        },

        Command::Task { command } => match command {
            TaskCommand::Done { task_id, user, json } => {
                let engine = build_engine(&cfg)?;
                let user = user.unwrap_or_else(|| cfg.user.clone());
                let outcome = engine.complete_task(&user, &task_id)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                } else {
                    render::print_completion(&outcome);
                }
            }
        },

        Command::Progress { user, json } => {
            let engine = build_engine(&cfg)?;
            let user = user.unwrap_or_else(|| cfg.user.clone());
            let progress = engine.get_progress(&user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                render::print_progress(&progress);
            }
        }

        Command::Assignments { command } => match command {
            AssignmentsCommand::Schedule { csv, timetable, today, json } => {
                let engine = build_engine(&cfg)?;
                let tz: Tz = cfg
                    .timezone
                    .parse()
                    .map_err(|e| anyhow!("invalid timezone {:?}: {e}", cfg.timezone))?;
                let today = resolve_today(today.as_deref())?;

                let inputs = ScheduleInputs::load(&csv, timetable.as_deref(), tz, today)
                    .with_context(|| format!("loading {}", csv.display()))?;
                let digest = engine.manage_assignments(&inputs.items, &inputs.busy, today);

                if json {
                    println!("{}", serde_json::to_string_pretty(&digest)?);
                } else {
                    render::print_digest(&digest);
                }
            }
        },

        Command::Draft { title, problem, requirements, kind } => {
            let engine = build_engine(&cfg)?;
            let kind = parse_draft_kind(&kind)?;
            let doc = engine.draft_document(&title, &problem, &requirements, kind);
            println!("{doc}");
        }
    }

    Ok(())
}

fn build_engine(cfg: &config::Config) -> Result<StudyEngine> {
    let model = model_client::build_model(cfg)?;
    let store = Arc::new(plan_store::JsonPlanStore::new(state::plans_dir()?)?);
    Ok(StudyEngine::new(model, store, cfg.engine.clone()))
}

fn resolve_today(flag: Option<&str>) -> Result<NaiveDate> {
    match flag {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("--today must be YYYY-MM-DD, got {raw:?}")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn parse_pairs(raw: &[String], flag: &str) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => bail!("{flag} expects key=value, got {entry:?}"),
        })
        .collect()
}

fn parse_draft_kind(raw: &str) -> Result<DraftKind> {
    match raw.trim().to_lowercase().as_str() {
        "essay" => Ok(DraftKind::Essay),
        "report" => Ok(DraftKind::Report),
        "code" => Ok(DraftKind::Code),
        "general" => Ok(DraftKind::General),
        other => bail!("unknown draft kind: {other} (expected essay, report, code, or general)"),
    }
}
