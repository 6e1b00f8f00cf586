//! Maintenance CLI for a rondas deployment
//!
//! Operates directly on the data directory with admin rights; the API host
//! in front of the core handles everything user-facing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rondas_core::domain::{Principal, Role};
use rondas_core::operations::structure::NewItem;
use rondas_core::Core;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rondas", about = "Checklist backend maintenance", version)]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "RONDAS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the config file and database, and run migrations
    Init,
    /// Load sections and items from a JSON file
    Seed {
        /// Structure definition file
        #[arg(long)]
        file: PathBuf,
    },
    /// Print today's run counts per section
    Summary,
}

#[derive(serde::Deserialize)]
struct SeedFile {
    sections: Vec<SeedSection>,
}

#[derive(serde::Deserialize)]
struct SeedSection {
    name: String,
    #[serde(default)]
    items: Vec<SeedItem>,
}

#[derive(serde::Deserialize)]
struct SeedItem {
    title: String,
    instructions: Option<String>,
    #[serde(default)]
    requires_photo: bool,
    requires_note_on_fail: Option<bool>,
    sort_order: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => rondas_core::config::default_data_dir()?,
    };

    let core = Core::new_with_config(data_dir).await?;
    // Local maintenance acts with admin rights.
    let operator = Principal::new(0, Role::Admin);

    match cli.command {
        Command::Init => {
            println!("initialized data directory at {:?}", core.config().data_dir);
        }
        Command::Seed { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let seed: SeedFile =
                serde_json::from_str(&json).with_context(|| format!("parsing {}", file.display()))?;

            let structure = core.structure();
            let existing = structure.list_structure(&operator).await?;

            let mut sections_created = 0usize;
            let mut items_created = 0usize;
            for section_def in seed.sections {
                let normalized = section_def.name.trim().to_uppercase();
                let section_id = match existing.sections.iter().find(|s| s.name == normalized) {
                    Some(section) => section.id,
                    None => {
                        sections_created += 1;
                        structure.create_section(&operator, &section_def.name).await?.id
                    }
                };
                for item_def in section_def.items {
                    structure
                        .create_item(
                            &operator,
                            NewItem {
                                section_id,
                                title: item_def.title,
                                instructions: item_def.instructions,
                                requires_photo: item_def.requires_photo,
                                requires_note_on_fail: item_def.requires_note_on_fail,
                                sort_order: item_def.sort_order,
                                is_active: None,
                            },
                        )
                        .await?;
                    items_created += 1;
                }
            }
            println!("seeded {sections_created} sections, {items_created} items");
        }
        Command::Summary => {
            let summary = core.dashboard().summary(&operator).await?;
            println!(
                "today: {} in progress, {} submitted, {} reviewed",
                summary.totals.in_progress, summary.totals.submitted, summary.totals.reviewed
            );
            for section in summary.sections {
                let last = match &section.last_run {
                    Some(run) => format!("last: #{} {} by {}", run.id, run.status, run.employee_name),
                    None => "no runs today".to_string(),
                };
                println!(
                    "  {:<24} {:>2}/{:>2}/{:>2}  {}",
                    section.section_name,
                    section.counts.in_progress,
                    section.counts.submitted,
                    section.counts.reviewed,
                    last
                );
            }
        }
    }

    Ok(())
}
