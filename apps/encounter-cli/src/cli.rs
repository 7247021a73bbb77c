use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use encounter_core::{AdversaryPacing, EncounterConfig, load_encounter_config};
use encounter_narration::NarrationManager;
use tracing::info;

use crate::script::{ScriptAction, run_script};
use crate::tui::App;

const DEFAULT_CONFIG: &str = "encounter.yaml";
const DEFAULT_LOG_DIR: &str = ".encounter/logs";

#[derive(Debug, Parser)]
#[command(name = "encounter", about = "Two players against one adversary, turn by turn")]
pub struct Cli {
    /// Directory for session log files
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play an encounter interactively in the terminal
    Play {
        /// Encounter file (defaults apply if it does not exist)
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Directory of narration templates overriding the built-in ones
        #[arg(short, long)]
        narration: Option<PathBuf>,
    },

    /// Run scripted player actions without a terminal UI
    Script {
        /// Encounter file (defaults apply if it does not exist)
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Player actions in turn order, e.g. `a,e,attack`
        #[arg(short, long, value_delimiter = ',', required = true)]
        actions: Vec<ScriptAction>,

        /// Skip the adversary's windup and recovery delays
        #[arg(long)]
        instant: bool,

        /// Print the final state as JSON instead of narration
        #[arg(long)]
        json: bool,

        /// Directory of narration templates overriding the built-in ones
        #[arg(short, long)]
        narration: Option<PathBuf>,
    },

    /// Print the effective encounter configuration as YAML
    Config {
        /// Encounter file (defaults apply if it does not exist)
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

impl Cli {
    /// Log directory and, for the interactive session, the name of the
    /// file log subdirectory. Headless commands log to stderr.
    pub fn log_context(&self) -> (PathBuf, Option<String>) {
        let session = match &self.command {
            Commands::Play { config, .. } => Some(
                config
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "encounter".to_owned()),
            ),
            Commands::Script { .. } | Commands::Config { .. } => None,
        };
        (self.log_dir.clone(), session)
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Play { config, narration } => {
                let config = load_config(&config)?;
                let narration = load_narration(narration.as_deref())?;
                let app = App::new(config, narration)?;

                let mut terminal = ratatui::init();
                let result = app.run(&mut terminal);
                ratatui::restore();
                result
            }
            Commands::Script {
                config,
                actions,
                instant,
                json,
                narration,
            } => {
                let config = load_config(&config)?;
                let narration = load_narration(narration.as_deref())?;
                let pacing = if instant {
                    AdversaryPacing::instant()
                } else {
                    AdversaryPacing::from(config.pacing)
                };

                let report = run_script(config, &actions, pacing, &narration).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report.snapshot)?);
                } else {
                    for line in &report.lines {
                        println!("{line}");
                    }
                    if report.unused_actions > 0 {
                        println!(
                            "({} scripted action(s) left unused)",
                            report.unused_actions
                        );
                    }
                }
                Ok(())
            }
            Commands::Config { config } => {
                let config = load_config(&config)?;
                print!("{}", serde_yaml::to_string(&config)?);
                Ok(())
            }
        }
    }
}

fn load_config(path: &Path) -> Result<EncounterConfig> {
    let config = load_encounter_config(path)
        .with_context(|| format!("failed to load encounter config: {}", path.display()))?;
    info!(path = %path.display(), "encounter config loaded");
    Ok(config)
}

fn load_narration(dir: Option<&Path>) -> Result<NarrationManager> {
    let mut narration = NarrationManager::new();
    if let Some(dir) = dir {
        let loaded = narration
            .load_dir(dir)
            .with_context(|| format!("failed to load narration templates: {}", dir.display()))?;
        info!(dir = %dir.display(), loaded, "narration templates loaded");
    }
    Ok(narration)
}
