use crate::cli::Cli;
use crate::error::InspectError;
use crate::loader::{CatalogFile, ProjectLoader};
use clap::Parser;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use unchive_descriptor::catalog::CatalogCell;
use unchive_descriptor::prelude::CatalogError;
use unchive_project::prelude::Project;

mod cli;
mod error;
mod loader;
mod report;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level()));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);
    tracing_subscriber::registry().with(fmt_layer).init();

    match inspect(&cli) {
        Ok(output) => print!("{output}"),
        Err(error) => match error {
            InspectError::InexistentPath(path) => {
                eprintln!("😢 Inexistent path detected: {path}");
            }
            InspectError::NotDirectory(path) => {
                eprintln!("😢 Path is not a directory: {path}");
            }
            InspectError::NoScreens(path) => {
                eprintln!("🤔 No screens found in: {path}");
            }
            InspectError::GeneralIo(error) => {
                eprintln!("😭 Unexpected IO error: {error}");
            }
            InspectError::Walk(error) => {
                eprintln!("😭 Unexpected error while reading the project: {error}");
            }
            InspectError::Extension { package, error } => {
                eprintln!("😭 Extension {package} is broken: {error}");
            }
            InspectError::Assembly(error) => {
                eprintln!("😭 Project could not be assembled: {error}");
            }
            InspectError::Json(error) => {
                eprintln!("😭 Unexpected serialization error: {error}");
            }
        },
    }

    Ok(())
}

fn inspect(cli: &Cli) -> Result<String, InspectError> {
    let project = load(cli)?;

    if cli.summary {
        report::render_summary(&project)
    } else {
        Ok(report::render_project(&project))
    }
}

fn load(cli: &Cli) -> Result<Project, InspectError> {
    let config = cli.resolver_config();

    match &cli.catalog {
        Some(path) => {
            let cell = CatalogCell::new(CatalogFile(path.clone()));
            ProjectLoader::load(&cli.project, cell.build(), config)
        }
        None => ProjectLoader::load(
            &cli.project,
            Err(CatalogError::Source("no catalog path given".to_owned())),
            config,
        ),
    }
}
