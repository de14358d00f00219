//! Strata - compile markdown areas into a site.

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, path::Path, process::ExitCode};
use strata::{
    Purpose, Site,
    cli::{Cli, Commands},
    config::SiteConfig,
    log,
    serve::serve_site,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = SiteConfig::load(cli)?;
    let build = &config.build;

    match &cli.command {
        Commands::Gen => {
            let site = Site::parse(&build.source, &build.style)?;
            site.generate(&build.output, &build.theme, Purpose::StaticServe)
        }
        Commands::Serve { .. } => serve_site(&config),
        Commands::Bind { head, foot } => {
            let head = read_fragment(head.as_deref())?;
            let foot = read_fragment(foot.as_deref())?;

            let site = Site::parse(&build.source, &build.style)?;
            let map = site.bindings(&build.output, &build.theme, &head, &foot)?;
            let json = serde_json::to_string_pretty(&map).context("cannot serialize bindings")?;
            println!("{json}");
            Ok(())
        }
        Commands::Hash => {
            let site = Site::parse(&build.source, &build.style)?;
            println!("{}", site.hash());
            Ok(())
        }
    }
}

/// Read an optional head/foot HTML fragment.
fn read_fragment(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("cannot read `{}`", path.display()))
        }
        None => Ok(String::new()),
    }
}
