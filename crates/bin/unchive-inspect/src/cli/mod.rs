use crate::error::InspectError;
use clap::Parser;
use std::path::{Path, PathBuf};
use unchive_project::prelude::{BUILTIN_NAMESPACE, ResolverConfig};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an extracted `.aia` project
    pub project: PathBuf,

    /// Path to the built-in component descriptors (`simple_components.json`).
    ///
    /// Without it every built-in component is kept with unresolved properties.
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Namespace built-in component types live in
    #[arg(long, default_value = BUILTIN_NAMESPACE)]
    pub namespace: String,

    /// Build component trees on the current thread only
    #[arg(long)]
    pub sequential: bool,

    /// Print the project summary as JSON instead of the component trees
    #[arg(short, long)]
    pub summary: bool,

    /// Increase log verbosity, when `RUST_LOG` is not set
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            builtin_namespace: self.namespace.clone(),
            parallel: !self.sequential,
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Checks if a path exists and is a directory.
pub fn check_path(path: &Path) -> Result<(), InspectError> {
    if !path.exists() {
        return Err(InspectError::InexistentPath(
            path.to_string_lossy().to_string(),
        ));
    }

    if !path.is_dir() {
        return Err(InspectError::NotDirectory(path.to_string_lossy().to_string()));
    }

    Ok(())
}
