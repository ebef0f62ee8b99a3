//! `sw compose` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use sw_compose::{ComposeOptions, Composer};
use sw_config::{CliSettings, Config};
use sw_markup::XmlMarkup;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::CliError;
use crate::output::Output;
use crate::renderers::build_registry;

/// Arguments for the compose command.
#[derive(Args)]
pub(crate) struct ComposeArgs {
    /// Input markup file (default: stdin, also `-`).
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover slotweave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Insertion-point tag inside rendered fragments (overrides config).
    #[arg(long)]
    slot_tag: Option<String>,

    /// Timeout for each render call in milliseconds (overrides config).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Enable verbose output (log every render call).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ComposeArgs {
    /// Execute the compose command.
    ///
    /// Output is written only after composition succeeded, so a failed run
    /// leaves no partial file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input, composition or output fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            slot_tag: self.slot_tag,
            render_timeout_ms: self.timeout_ms,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let registry = build_registry(&config)?;
        tracing::debug!(
            components = registry.len(),
            slot_tag = %config.compose.slot_tag,
            timeout_ms = ?config.compose.render_timeout_ms,
            "Registry built"
        );
        if registry.is_empty() {
            output.warning("No components configured; markup passes through unchanged");
        }

        let composer = Composer::with_options(
            XmlMarkup::new(),
            ComposeOptions {
                slot_tag: config.compose.slot_tag.clone(),
                ..ComposeOptions::default()
            },
        );

        let markup = read_input(self.input.as_deref()).await?;
        let html = composer.compose_markup(&markup, &registry).await?;
        write_output(self.output.as_deref(), &html).await?;

        if let Some(path) = &self.output {
            output.success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }
}

/// Read input markup from a file, or stdin when absent or `-`.
async fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            }),
        _ => {
            let mut markup = String::new();
            tokio::io::stdin().read_to_string(&mut markup).await?;
            Ok(markup)
        }
    }
}

/// Write composed markup to a file, or stdout when absent.
async fn write_output(path: Option<&Path>, html: &str) -> Result<(), CliError> {
    match path {
        Some(path) => tokio::fs::write(path, html)
            .await
            .map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            }),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}
