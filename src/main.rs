//! Markdual - a dual-pane markdown editor driven by line commands.
//!
//! # Usage
//!
//! ```bash
//! markdual README.md
//! markdual --edit --split 40 README.md
//! echo "focus source" | markdual --edit notes.md
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use markdual::app::App;
use markdual::config::{
    ConfigFlags, DEFAULT_SPLIT, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};

/// A dual-pane markdown editor: structured and source views kept in sync
#[derive(Parser, Debug)]
#[command(name = "markdual", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open (starts with a welcome document if omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start in edit mode with both panes mounted
    #[arg(short, long)]
    edit: bool,

    /// Width of the structured pane in percent (20-80)
    #[arg(long, value_name = "PERCENT")]
    split: Option<u8>,

    /// Write log events to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_ref())?;
    tracing::debug!(?effective, "configuration loaded");

    if let Some(file) = &cli.file
        && !file.exists()
    {
        anyhow::bail!("File not found: {}", file.display());
    }

    let mut app = App::new(cli.file)
        .with_edit_mode(effective.edit || cli.edit)
        .with_split(effective.split.or(cli.split).unwrap_or(DEFAULT_SPLIT));

    app.run().context("Application error")
}
