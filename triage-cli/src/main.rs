use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use triage_core::{
    AnalysisOptions, EnergyLevel, Strategy, TaskId, TaskRecord, analyze_tasks, local_today,
    parse_due_date, suggest_with_options,
};

mod config;
mod render;
mod request;
mod state;
mod store;

use config::{Config, Overrides};
use request::Request;
use store::TaskStore;

#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TRIAGE_BUILD_SHA"), ")"),
    about = "Rank tasks by urgency, importance, effort and dependencies"
)]
struct Cli {
    /// Log scoring decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Evaluate due dates against this day instead of the local date (YYYY-MM-DD)
    #[arg(long, global = true, env = "TRIAGE_TODAY")]
    today: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank every task, with cycle warnings and a plan for today
    Analyze {
        /// JSON request file (`-` for stdin); defaults to the stored tasks
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        strategy: Option<Strategy>,

        /// Hours available today
        #[arg(long)]
        hours: Option<f64>,

        #[arg(long)]
        energy: Option<EnergyLevel>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the top few tasks to work on next
    Suggest {
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        strategy: Option<Strategy>,

        /// Number of suggestions (default from config, else 3)
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Store a new task
    Add {
        #[arg(long)]
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        #[arg(long)]
        hours: f64,

        /// 1 (trivial) to 10 (critical)
        #[arg(long)]
        importance: i64,

        /// Id of a task this one waits on; repeatable
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
    },

    /// List stored tasks
    List,

    /// Remove a stored task by id
    Remove { id: String },

    /// Manage ~/.triage/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let today = match cli.today.as_deref() {
        Some(s) => parse_due_date(s).context("--today")?,
        None => local_today(),
    };

    match cli.command {
        Command::Analyze {
            file,
            strategy,
            hours,
            energy,
            json,
        } => {
            let overrides = Overrides {
                strategy,
                available_hours: hours,
                energy_level: energy,
            };
            let cfg = config::load_config()?;
            let (request, opts) = resolve_inputs(&cfg, file, overrides)?;
            let mut result = analyze_tasks(&request.tasks, &opts, today);
            result.warnings.extend(request.rejected);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::render_analysis(&result)?);
            }
        }

        Command::Suggest {
            file,
            strategy,
            limit,
            json,
        } => {
            let overrides = Overrides {
                strategy,
                ..Overrides::default()
            };
            let cfg = config::load_config()?;
            let limit = limit.unwrap_or(cfg.defaults.limit);
            let (request, opts) = resolve_inputs(&cfg, file, overrides)?;
            let suggestions = suggest_with_options(&request.tasks, &opts, limit, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                print!("{}", render::render_suggestions(&suggestions)?);
            }
        }

        Command::Add {
            title,
            due,
            hours,
            importance,
            depends_on,
        } => {
            let mut task = TaskRecord::new("", title)
                .with_due_date(due)
                .with_hours(hours)
                .with_importance(importance);
            for dep in depends_on {
                task = task.depends_on(dep);
            }
            let stored = open_store()?.add(task)?;
            println!("Added task {}: {}", stored.id, stored.display_title());
        }

        Command::List => {
            let tasks = open_store()?.load()?;
            print!("{}", render::render_task_list(&tasks, today)?);
        }

        Command::Remove { id } => {
            let removed = open_store()?.remove(&TaskId::from(id))?;
            println!("Removed task {}: {}", removed.id, removed.display_title());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", state::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_store() -> Result<TaskStore> {
    Ok(TaskStore::new(state::tasks_path()?))
}

/// Request plus effective options: flags over the request file over the config file.
fn resolve_inputs(
    cfg: &Config,
    file: Option<PathBuf>,
    overrides: Overrides,
) -> Result<(Request, AnalysisOptions)> {
    let mut opts = cfg.analysis_options(Overrides::default());

    let request = match file {
        Some(path) => request::read_request(&path)?,
        None => Request {
            tasks: open_store()?.load()?,
            ..Request::default()
        },
    };
    request.apply(&mut opts);
    overrides.apply(&mut opts);

    tracing::debug!(
        tasks = request.tasks.len(),
        rejected = request.rejected.len(),
        strategy = %opts.strategy,
        hours = opts.preferences.available_hours,
        "resolved inputs"
    );
    Ok((request, opts))
}

