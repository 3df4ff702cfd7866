use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use workflow_engine::constants::files;
use workflow_engine::{
    builtin_presets, check_move, find_builtin_preset, move_block, standard_branches,
    standard_registry, toggle, validate, DropOutcome, EngineSettings, ProjectWorkflowConfig,
    WorkflowGenerator, WorkflowPreset, WorkflowRepository, WorkflowStore,
};

/// Configure and check production workflows for photo/video projects
#[derive(Parser)]
#[command(name = "workflow-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the engine settings file
    #[arg(long, global = true, default_value = files::SETTINGS)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in presets
    Presets,

    /// Generate a project workflow from a preset
    Generate {
        /// Built-in preset id, or path to a preset JSON file
        #[arg(long)]
        preset: String,

        /// Project the workflow belongs to
        #[arg(long)]
        project: String,

        /// Also write the config to the configured persistence directory
        #[arg(long)]
        save: bool,
    },

    /// Validate a workflow config
    Validate {
        /// Path to the config JSON file
        config: PathBuf,
    },

    /// Check whether moving one block onto another would be accepted
    CheckMove {
        config: PathBuf,
        active_id: String,
        over_id: String,
    },

    /// Move one block onto another and print the new config
    Move {
        config: PathBuf,
        active_id: String,
        over_id: String,
    },

    /// Flip a block's enabled flag and print the new config
    Toggle {
        config: PathBuf,
        branch_id: String,
        block_id: String,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let settings = EngineSettings::load(&cli.settings)
        .with_context(|| format!("failed to load settings: {}", cli.settings.display()))?;

    match cli.command {
        Commands::Presets => list_presets(),
        Commands::Generate {
            preset,
            project,
            save,
        } => generate(&settings, &preset, &project, save),
        Commands::Validate { config } => validate_file(&config),
        Commands::CheckMove {
            config,
            active_id,
            over_id,
        } => check_move_file(&config, &active_id, &over_id),
        Commands::Move {
            config,
            active_id,
            over_id,
        } => move_in_file(&config, &active_id, &over_id),
        Commands::Toggle {
            config,
            branch_id,
            block_id,
        } => {
            let config = read_config(&config)?;
            print_json(&toggle(&config, &branch_id, &block_id))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn list_presets() -> Result<ExitCode> {
    for preset in builtin_presets() {
        println!("{:<20} {}", preset.id, preset.name);
        if !preset.description.is_empty() {
            println!("{:<20} {}", "", preset.description);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn generate(
    settings: &EngineSettings,
    preset: &str,
    project: &str,
    save: bool,
) -> Result<ExitCode> {
    let preset = resolve_preset(preset)?;
    let branches = standard_branches();
    let config = WorkflowGenerator::new(standard_registry(), &branches)
        .with_id_suffix_length(settings.id_suffix_length)
        .generate(&preset, project)
        .with_context(|| format!("failed to generate workflow from preset '{}'", preset.id))?;

    if save {
        let Some(dir) = &settings.persist_dir else {
            bail!("--save needs persistDir in {}", files::SETTINGS);
        };
        let mut store = WorkflowStore::with_persistence(dir);
        store
            .save(&config)
            .with_context(|| format!("failed to save workflow to {}", dir.display()))?;
        log::info!("Saved workflow for project '{}' to {:?}", project, dir);
    }

    print_json(&config)?;
    Ok(ExitCode::SUCCESS)
}

fn validate_file(path: &Path) -> Result<ExitCode> {
    let config = read_config(path)?;
    let result = validate(&config);
    print_json(&result)?;

    Ok(if result.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn check_move_file(path: &Path, active_id: &str, over_id: &str) -> Result<ExitCode> {
    let config = read_config(path)?;
    let Some(branch) = config.branch_of_block(active_id) else {
        bail!("no block '{}' in {}", active_id, path.display());
    };

    match check_move(active_id, over_id, &branch.blocks) {
        Some(reason) => {
            println!("{}", reason);
            Ok(ExitCode::FAILURE)
        }
        None => {
            println!("ok");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn move_in_file(path: &Path, active_id: &str, over_id: &str) -> Result<ExitCode> {
    let config = read_config(path)?;
    let Some(branch) = config.branch_of_block(active_id) else {
        bail!("no block '{}' in {}", active_id, path.display());
    };

    match move_block(standard_registry(), &config, &branch.id, active_id, over_id) {
        DropOutcome::Committed(next) => {
            print_json(&next)?;
            Ok(ExitCode::SUCCESS)
        }
        DropOutcome::Rejected(reason) => {
            eprintln!("{}", reason);
            Ok(ExitCode::FAILURE)
        }
        DropOutcome::Ignored => {
            log::warn!("Move of '{}' onto '{}' had no effect", active_id, over_id);
            print_json(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// A built-in preset id, or else a path to a preset file
fn resolve_preset(preset: &str) -> Result<WorkflowPreset> {
    if let Some(builtin) = find_builtin_preset(preset) {
        return Ok(builtin);
    }

    let content = std::fs::read_to_string(preset).with_context(|| {
        format!("'{}' is neither a built-in preset nor a readable file", preset)
    })?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse preset file: {}", preset))
}

fn read_config(path: &Path) -> Result<ProjectWorkflowConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
