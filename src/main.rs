use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use context_ledger::config::LedgerConfig;
use context_ledger::hooks::{self, HookContext, HookKind};
use context_ledger::markdown::{fields, upsert};
use context_ledger::models::HookEvent;
use context_ledger::store::{transact, DocumentStore, FsStore, Outcome};
use context_ledger::Row;

#[derive(Parser)]
#[command(name = "ctxl")]
#[command(about = "Keep markdown session ledgers in sync with assistant hook events")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one hook against the event JSON on stdin
    Hook {
        #[arg(value_enum)]
        kind: HookKind,
    },
    /// Run every hook interested in the event JSON on stdin
    Dispatch,
    /// Print a section's table rows as JSON
    Rows {
        file: PathBuf,
        section: String,
        /// Include placeholder rows
        #[arg(long)]
        all: bool,
    },
    /// Read or update a key/value field
    Field {
        #[command(subcommand)]
        action: FieldAction,
    },
    /// Merge a row into a section's table
    Upsert {
        file: PathBuf,
        section: String,
        /// Identity column; a row matching on any of them is replaced
        #[arg(long = "id")]
        identity: Vec<String>,
        /// Cells as Column=Value
        #[arg(required = true, value_parser = parse_cell)]
        cells: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum FieldAction {
    /// Print a field's value
    Get {
        file: PathBuf,
        section: String,
        field: String,
    },
    /// Set a field, adding it if missing
    Set {
        file: PathBuf,
        section: String,
        field: String,
        value: String,
    },
    /// Add to a numeric field
    Incr {
        file: PathBuf,
        section: String,
        field: String,
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        by: i64,
    },
}

fn parse_cell(s: &str) -> Result<(String, String), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected Column=Value, got '{}'", s))?;
    if column.trim().is_empty() {
        return Err(format!("empty column name in '{}'", s));
    }
    Ok((column.trim().to_string(), value.trim().to_string()))
}

/// Initialize tracing on stderr; stdout carries the hook response.
fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_event() -> HookEvent {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        tracing::warn!(error = %e, "could not read hook input");
        return HookEvent::default();
    }
    HookEvent::parse(&input).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "hook input is not valid JSON");
        HookEvent::default()
    })
}

fn report(path: &Path, outcome: Outcome) {
    match outcome {
        Outcome::Written => println!("updated {}", path.display()),
        Outcome::Unchanged => println!("no change to {}", path.display()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Hooks run on every tool call; keep them quiet unless asked.
    let is_hook = matches!(cli.command, Commands::Hook { .. } | Commands::Dispatch);
    init_tracing(if is_hook {
        "context_ledger=warn,ledger_core=warn"
    } else {
        "context_ledger=info,ledger_core=info"
    });

    let config = LedgerConfig::load(cli.config.as_deref());
    let store = FsStore;

    match cli.command {
        Commands::Hook { kind } => {
            let event = read_event();
            let ctx = HookContext {
                config: &config,
                store: &store,
                now: Local::now(),
                cwd: std::env::current_dir().unwrap_or_default(),
            };
            if let Err(e) = hooks::run(kind, &event, &ctx) {
                tracing::warn!(hook = kind.as_str(), error = %e, "hook failed");
            }
            println!("{{}}");
        }
        Commands::Dispatch => {
            let event = read_event();
            let ctx = HookContext {
                config: &config,
                store: &store,
                now: Local::now(),
                cwd: std::env::current_dir().unwrap_or_default(),
            };
            hooks::dispatch(&event, &ctx);
            println!("{{}}");
        }
        Commands::Rows { file, section, all } => {
            let table = store.load(&file)?.read_table(&section);
            let rows: Vec<&Row> = if all {
                table.rows.iter().collect()
            } else {
                table.records().collect()
            };
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Field { action } => match action {
            FieldAction::Get {
                file,
                section,
                field,
            } => {
                let doc = store.load(&file)?;
                let value = fields::get(&doc, &section, &field).with_context(|| {
                    format!("field '{}' not found in section '{}'", field, section)
                })?;
                println!("{}", value);
            }
            FieldAction::Set {
                file,
                section,
                field,
                value,
            } => {
                let outcome = transact(&store, &file, |doc| {
                    Ok(fields::set(doc, &section, &field, &value))
                })?;
                report(&file, outcome);
            }
            FieldAction::Incr {
                file,
                section,
                field,
                by,
            } => {
                let outcome = transact(&store, &file, |doc| {
                    fields::increment(doc, &section, &field, by)
                })?;
                report(&file, outcome);
            }
        },
        Commands::Upsert {
            file,
            section,
            identity,
            cells,
        } => {
            let row: Row = cells.into_iter().collect();
            let outcome = transact(&store, &file, |doc| {
                let table = doc.read_table(&section);
                let headers: Vec<String> = if table.is_empty() {
                    row.iter().map(|(column, _)| column.to_string()).collect()
                } else {
                    table.headers
                };
                Ok(upsert::upsert_into(
                    doc,
                    &section,
                    headers.as_slice(),
                    row.clone(),
                    identity.as_slice(),
                ))
            })?;
            report(&file, outcome);
        }
    }

    Ok(())
}
