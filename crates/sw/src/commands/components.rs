//! `sw components` command implementation.

use std::path::PathBuf;

use clap::Args;
use sw_config::{ComponentSource, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the components command.
#[derive(Args)]
pub(crate) struct ComponentsArgs {
    /// Path to configuration file (default: auto-discover slotweave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ComponentsArgs {
    /// List configured components.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        match &config.config_path {
            Some(path) => output.info(&format!("Config: {}", path.display())),
            None => output.info("Config: none (defaults)"),
        }
        output.info(&format!("Insertion point: <{}>", config.compose.slot_tag));

        if config.components_resolved.is_empty() {
            output.warning("No components configured");
            return Ok(());
        }

        for component in &config.components_resolved {
            output.component(&component.tag, &describe_source(&component.source));
        }
        Ok(())
    }
}

/// Human-readable description of a fragment source.
fn describe_source(source: &ComponentSource) -> String {
    match source {
        ComponentSource::Inline(fragment) => format!("inline fragment ({} bytes)", fragment.len()),
        ComponentSource::File(path) => format!("file {}", path.display()),
    }
}
