//! Taskwise CLI - task intelligence for a smart to-do list.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use taskwise::cli::{Cli, Commands, ConfigCommands, ContextCommands, TaskCommands};
use taskwise::commands::{self, CaptureInput, Output, TaskFilter};
use taskwise::config::{ConfigOverrides, ResolvedConfig, resolve_config};
use taskwise::models::parse_timestamp;
use taskwise::storage::{JsonlStore, get_data_dir};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    init_logging(cli.verbose, human);

    let result =
        resolve_data_dir(cli.data_dir).and_then(|dir| run_command(cli.command, &dir, human));

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Install the stderr subscriber.
///
/// `TW_LOG` takes an `EnvFilter` directive; without it the level is `warn`,
/// or `debug` with `--verbose`. JSON output mode logs JSON lines.
fn init_logging(verbose: bool, human: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TW_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if human {
        builder.init();
    } else {
        builder.json().init();
    }
}

/// `--data-dir` (or `TW_DATA_DIR`, via clap) wins over the platform default.
fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, taskwise::Error> {
    match explicit {
        Some(dir) => Ok(dir),
        None => get_data_dir(),
    }
}

fn load_config(
    data_dir: &Path,
    overrides: ConfigOverrides,
) -> Result<ResolvedConfig, taskwise::Error> {
    resolve_config(data_dir, &overrides)
}

fn run_command(command: Commands, data_dir: &Path, human: bool) -> Result<(), taskwise::Error> {
    match command {
        Commands::Init => {
            let result = commands::init(data_dir)?;
            output(&result, human);
        }

        Commands::Capture {
            text,
            title,
            description,
            priority,
            category,
            due,
            duration,
            tag,
            voice,
            estimate,
            now,
        } => {
            let now = commands::reference_time(now.as_deref())?;
            let mut overrides = ConfigOverrides::new();
            if estimate {
                overrides = overrides.with_estimate_duration(true);
            }
            let config = load_config(data_dir, overrides)?;
            let mut store = JsonlStore::open(data_dir)?;
            let input = CaptureInput {
                text: text.join(" "),
                title,
                description,
                priority,
                category,
                due,
                duration,
                tags: tag,
                voice,
            };
            let result = commands::capture(&mut store, &config, input, now)?;
            output(&result, human);
        }

        Commands::Task { command } => match command {
            TaskCommands::List {
                status,
                priority,
                category,
                tag,
            } => {
                let store = JsonlStore::open(data_dir)?;
                let filter = TaskFilter {
                    status,
                    priority,
                    category,
                    tag,
                };
                let result = commands::task_list(&store, &filter)?;
                output(&result, human);
            }
            TaskCommands::Show { id } => {
                let store = JsonlStore::open(data_dir)?;
                let result = commands::task_show(&store, &id, chrono::Utc::now())?;
                output(&result, human);
            }
            TaskCommands::Status { id, status } => {
                let mut store = JsonlStore::open(data_dir)?;
                let result = commands::task_status(&mut store, &id, &status, chrono::Utc::now())?;
                output(&result, human);
            }
            TaskCommands::Delete { id } => {
                let mut store = JsonlStore::open(data_dir)?;
                let result = commands::task_delete(&mut store, &id)?;
                output(&result, human);
            }
        },

        Commands::Rank { all, now } => {
            let now = commands::reference_time(now.as_deref())?;
            let store = JsonlStore::open(data_dir)?;
            let result = commands::rank(&store, all, now)?;
            output(&result, human);
        }

        Commands::Plan { now } => {
            let now = commands::reference_time(now.as_deref())?;
            let store = JsonlStore::open(data_dir)?;
            let result = commands::plan(&store, now)?;
            output(&result, human);
        }

        Commands::Context { command } => match command {
            ContextCommands::Add {
                content,
                source,
                at,
            } => {
                let now = chrono::Utc::now();
                let timestamp = match at {
                    Some(ref value) => parse_timestamp("at", value)?,
                    None => now,
                };
                let config = load_config(data_dir, ConfigOverrides::new())?;
                let mut store = JsonlStore::open(data_dir)?;
                let result = commands::context_add(
                    &mut store,
                    &config,
                    &content.join(" "),
                    &source,
                    timestamp,
                    now,
                )?;
                output(&result, human);
            }
            ContextCommands::List => {
                let store = JsonlStore::open(data_dir)?;
                let result = commands::context_list(&store)?;
                output(&result, human);
            }
            ContextCommands::Show { id } => {
                let config = load_config(data_dir, ConfigOverrides::new())?;
                let store = JsonlStore::open(data_dir)?;
                let result = commands::context_show(&store, &config, &id)?;
                output(&result, human);
            }
            ContextCommands::Suggest { id, create, now } => {
                let reference = now
                    .as_deref()
                    .map(|value| parse_timestamp("now", value))
                    .transpose()?;
                let config = load_config(data_dir, ConfigOverrides::new())?;
                let mut store = JsonlStore::open(data_dir)?;
                let result = commands::context_suggest(
                    &mut store,
                    &config,
                    &id,
                    create,
                    reference,
                    chrono::Utc::now(),
                )?;
                output(&result, human);
            }
        },

        Commands::Analytics {
            days,
            baseline,
            now,
        } => {
            let now = commands::reference_time(now.as_deref())?;
            let mut overrides = ConfigOverrides::new();
            if let Some(baseline) = baseline {
                overrides = overrides.with_throughput_baseline(baseline);
            }
            let config = load_config(data_dir, overrides)?;
            let store = JsonlStore::open(data_dir)?;
            let result = commands::analytics(&store, &config, days, now)?;
            output(&result, human);
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = load_config(data_dir, ConfigOverrides::new())?;
                let result = commands::config_show(data_dir, config);
                output(&result, human);
            }
            ConfigCommands::Set { key, value } => {
                let result = commands::config_set(data_dir, &key, &value)?;
                output(&result, human);
            }
        },
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
