use anyhow::Result;
use clap::{Args, Subcommand};
use gigstream_core::config::GigstreamConfig;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::output::OutputMode;
use crate::session::Session;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the effective configuration after env and flag overrides
    Show,
}

#[derive(Serialize)]
struct EffectiveView<'a> {
    source: Option<String>,
    rpc_url: Option<String>,
    config: &'a GigstreamConfig,
}

pub fn run_config(args: &ConfigArgs, session: &Session) -> Result<()> {
    match &args.command {
        ConfigCommand::Show => run_show(session),
    }
}

fn run_show(session: &Session) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_effective(
        &session.config,
        session.source.as_deref(),
        session.output,
        &mut out,
    )
}

fn write_effective(
    config: &GigstreamConfig,
    source: Option<&Path>,
    output: OutputMode,
    out: &mut dyn Write,
) -> Result<()> {
    let source = source.map(|p| p.display().to_string());
    if output.is_json() {
        let view = EffectiveView {
            source,
            rpc_url: config.network.resolved_rpc_url().ok(),
            config,
        };
        serde_json::to_writer_pretty(&mut *out, &view)?;
        writeln!(out)?;
        return Ok(());
    }

    match &source {
        Some(path) => writeln!(out, "# source: {path}")?,
        None => writeln!(out, "# source: built-in defaults")?,
    }
    if let Ok(url) = config.network.resolved_rpc_url() {
        writeln!(out, "# rpc_url: {url}")?;
    }
    write!(out, "{}", toml::to_string_pretty(config)?)?;
    Ok(())
}
