//! Per-invocation state: resolved config, output mode, and ledger access.

use std::path::{Path, PathBuf};

use anyhow::Context;
use gigstream_core::config::{GigstreamConfig, LoadedConfig, apply_env_overrides, load_config};
use gigstream_core::error::ErrorCode;
use gigstream_core::ledger::{LedgerQuery, MemoryLedger, RpcLedger};
use gigstream_core::projection::ProjectionBuilder;
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error, resolve_output_mode};

/// Global flags that shape config and ledger resolution.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub format: Option<OutputMode>,
    pub json: bool,
    pub config: Option<PathBuf>,
    pub network: Option<String>,
    pub rpc_url: Option<String>,
    pub fixture: Option<PathBuf>,
}

pub struct Session {
    pub config: GigstreamConfig,
    pub source: Option<PathBuf>,
    pub output: OutputMode,
    fixture: Option<PathBuf>,
}

impl Session {
    /// Load config, apply env and flag overrides, and resolve the output mode.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(opts: &GlobalOpts, project_root: &Path) -> anyhow::Result<Self> {
        let LoadedConfig { mut config, source } =
            load_config(opts.config.as_deref(), project_root)?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        apply_flag_overrides(&mut config, opts);

        let output = resolve_output_mode(opts.format, opts.json, config.output.as_deref());

        Ok(Self {
            config,
            source,
            output,
            fixture: opts.fixture.clone(),
        })
    }

    /// Ledger named by `--fixture`, or the configured fullnode.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be loaded or the network has
    /// no resolvable URL.
    pub fn ledger(&self) -> anyhow::Result<Box<dyn LedgerQuery>> {
        if let Some(path) = &self.fixture {
            debug!(path = %path.display(), "serving reads from fixture");
            return Ok(Box::new(MemoryLedger::load(path)?));
        }
        let rpc = RpcLedger::from_config(&self.config.network)
            .context("Failed to configure ledger RPC client")?;
        debug!(url = rpc.url(), "serving reads from fullnode");
        Ok(Box::new(rpc))
    }

    /// Projection builder over [`Self::ledger`], after checking the contract
    /// identifiers are set.
    ///
    /// # Errors
    ///
    /// Renders and returns an error when the contract is not configured or
    /// the ledger cannot be built.
    pub fn projection(&self) -> anyhow::Result<ProjectionBuilder<Box<dyn LedgerQuery>>> {
        self.require_contract()?;
        Ok(ProjectionBuilder::new(
            self.ledger()?,
            self.config.contract.clone(),
            self.config.projection.clone(),
        ))
    }

    /// Fail with [`ErrorCode::ContractNotConfigured`] unless both the
    /// package and platform object ids are set.
    ///
    /// # Errors
    ///
    /// Returns an error after rendering it in the session's output mode.
    pub fn require_contract(&self) -> anyhow::Result<()> {
        if self.config.contract.is_configured() {
            return Ok(());
        }
        render_error(
            self.output,
            &CliError::from_code(
                ErrorCode::ContractNotConfigured,
                "contract.package_id and contract.platform_object_id must be set",
            ),
        )?;
        anyhow::bail!("contract not configured");
    }
}

fn apply_flag_overrides(config: &mut GigstreamConfig, opts: &GlobalOpts) {
    if let Some(network) = &opts.network {
        config.network.name.clone_from(network);
        // A preset network replaces a URL inherited from config or env.
        config.network.rpc_url = None;
    }
    if let Some(url) = &opts.rpc_url {
        config.network.rpc_url = Some(url.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_flag_clears_inherited_url() {
        let mut config = GigstreamConfig::default();
        config.network.rpc_url = Some("http://custom:9000".into());
        apply_flag_overrides(
            &mut config,
            &GlobalOpts {
                network: Some("mainnet".into()),
                ..GlobalOpts::default()
            },
        );
        assert_eq!(config.network.name, "mainnet");
        assert_eq!(
            config.network.resolved_rpc_url().expect("preset"),
            "https://fullnode.mainnet.sui.io:443"
        );
    }

    #[test]
    fn rpc_url_flag_wins_over_network_flag() {
        let mut config = GigstreamConfig::default();
        apply_flag_overrides(
            &mut config,
            &GlobalOpts {
                network: Some("devnet".into()),
                rpc_url: Some("http://127.0.0.1:9123".into()),
                ..GlobalOpts::default()
            },
        );
        assert_eq!(
            config.network.resolved_rpc_url().expect("explicit"),
            "http://127.0.0.1:9123"
        );
    }

    #[test]
    fn session_reads_project_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("gigstream.toml"),
            "output = \"json\"\n[contract]\npackage_id = \"0xabc\"\nplatform_object_id = \"0x5\"\n",
        )
        .expect("write config");

        let session = Session::load(&GlobalOpts::default(), dir.path()).expect("load");
        assert_eq!(session.config.contract.package_id, "0xabc");
        assert!(session.source.is_some());
        assert!(session.require_contract().is_ok());
    }
}
