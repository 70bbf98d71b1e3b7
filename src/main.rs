#![deny(unused)]
//! genderize - batch first-name to gender resolver
//!
//! Answers from a bundled dictionary, then a local cache, then the
//! genderize.io service, and prints one JSON line per input name.

mod cli;
mod input;
mod output;
mod tracing_layer;

use std::io::Write;

use clap::Parser;

use genderize_core::{config::AppConfig, types::NameOutcome};
use genderize_resolver::ResolverBuilder;

use crate::cli::Cli;
use crate::input::NameLines;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    cli.apply(&mut config);

    tracing_layer::configure_tracing(&config.logging)?;
    tracing::info!("Starting genderize v{}", env!("CARGO_PKG_VERSION"));

    let resolver = ResolverBuilder::configure(&config).await?.build()?;
    tracing::info!(
        endpoint = %config.service.endpoint,
        cache = resolver.cache().is_some(),
        dictionary = resolver.dictionary().is_some(),
        "Resolver initialized"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut write_error = None;
    let mut sink = |outcome: NameOutcome| {
        if write_error.is_some() {
            return;
        }
        let written = output::render(&outcome)
            .map_err(anyhow::Error::from)
            .and_then(|line| writeln!(out, "{}", line).map_err(anyhow::Error::from));
        if let Err(e) = written {
            write_error = Some(e);
        }
    };

    let mut stdin_names = None;
    let resolved = if cli.names.is_empty() {
        let names = stdin_names.insert(NameLines::new(std::io::stdin().lock()));
        resolver.resolve_each(names.by_ref(), &mut sink).await
    } else {
        resolver.resolve_each(input::from_args(&cli.names), &mut sink).await
    };

    if let Some(e) = write_error {
        return Err(e.context("Failed to write results"));
    }
    out.flush()?;

    let delivered = resolved?;
    if let Some(names) = stdin_names {
        names.finish()?;
    }
    tracing::info!(names = delivered, "Done");
    Ok(())
}
