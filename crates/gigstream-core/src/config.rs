//! Marketplace configuration.
//!
//! Loaded once at process start and passed by value into the components
//! that need it. Nothing in the crate reads configuration from globals.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-local config file.
pub const PROJECT_CONFIG_FILE: &str = "gigstream.toml";

/// Event page size used for discovery queries.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// 0.01 SUI expressed in MIST.
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GigstreamConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Preferred output mode (`pretty`, `text`, `json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_network_name")]
    pub name: String,
    /// Explicit fullnode URL. Derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: default_network_name(),
            rpc_url: None,
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

impl NetworkConfig {
    /// Resolve the fullnode URL, preferring an explicit `rpc_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when no URL is configured and `name` is not one of
    /// the known networks.
    pub fn resolved_rpc_url(&self) -> Result<String> {
        if let Some(url) = self.rpc_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.trim().to_string());
        }
        match fullnode_url(&self.name) {
            Some(url) => Ok(url.to_string()),
            None => bail!(
                "unknown network '{}': expected one of localnet, devnet, testnet, mainnet, or set network.rpc_url",
                self.name
            ),
        }
    }
}

/// Well-known fullnode endpoints.
#[must_use]
pub fn fullnode_url(network: &str) -> Option<&'static str> {
    match network.trim().to_ascii_lowercase().as_str() {
        "localnet" => Some("http://127.0.0.1:9000"),
        "devnet" => Some("https://fullnode.devnet.sui.io:443"),
        "testnet" => Some("https://fullnode.testnet.sui.io:443"),
        "mainnet" => Some("https://fullnode.mainnet.sui.io:443"),
        _ => None,
    }
}

/// Identifiers of the deployed marketplace contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default)]
    pub package_id: String,
    #[serde(default = "default_module_name")]
    pub module_name: String,
    /// Shared aggregate object holding the platform counters.
    #[serde(default)]
    pub platform_object_id: String,
    #[serde(default = "default_gas_budget")]
    pub gas_budget: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            package_id: String::new(),
            module_name: default_module_name(),
            platform_object_id: String::new(),
            gas_budget: default_gas_budget(),
        }
    }
}

impl ContractConfig {
    /// Fully-qualified event type, e.g. `0xabc::gigstream::JobListingCreated`.
    #[must_use]
    pub fn event_type(&self, event: &str) -> String {
        format!("{}::{}::{event}", self.package_id, self.module_name)
    }

    /// Move call target, e.g. `0xabc::gigstream::create_job_listing`.
    #[must_use]
    pub fn function_target(&self, function: &str) -> String {
        format!("{}::{}::{function}", self.package_id, self.module_name)
    }

    /// Returns `true` when both the package and the platform object are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.package_id.trim().is_empty() && !self.platform_object_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound on concurrent object reads during hydration.
    #[serde(default = "default_hydration_concurrency")]
    pub hydration_concurrency: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            hydration_concurrency: default_hydration_concurrency(),
        }
    }
}

/// A loaded config plus the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GigstreamConfig,
    pub source: Option<PathBuf>,
}

/// Parse a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config_file(path: &Path) -> Result<GigstreamConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<GigstreamConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Locate and load the effective config.
///
/// Lookup order: `explicit` (must exist), `<project_root>/gigstream.toml`,
/// `<config_dir>/gigstream/config.toml`, then built-in defaults.
///
/// # Errors
///
/// Returns an error if an explicit path is missing or any found file fails
/// to parse.
pub fn load_config(explicit: Option<&Path>, project_root: &Path) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        return Ok(LoadedConfig {
            config: load_config_file(path)?,
            source: Some(path.to_path_buf()),
        });
    }

    let candidates = [
        Some(project_root.join(PROJECT_CONFIG_FILE)),
        dirs::config_dir().map(|dir| dir.join("gigstream/config.toml")),
    ];

    for path in candidates.into_iter().flatten() {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            return Ok(LoadedConfig {
                config: load_config_file(&path)?,
                source: Some(path),
            });
        }
    }

    Ok(LoadedConfig {
        config: GigstreamConfig::default(),
        source: None,
    })
}

/// Apply `GIGSTREAM_*` environment overrides through `lookup`.
///
/// Recognized keys: `GIGSTREAM_RPC_URL`, `GIGSTREAM_PACKAGE_ID`,
/// `GIGSTREAM_PLATFORM_OBJECT_ID`. Empty values are ignored.
pub fn apply_env_overrides(config: &mut GigstreamConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get("GIGSTREAM_RPC_URL") {
        config.network.rpc_url = Some(url);
    }
    if let Some(package) = get("GIGSTREAM_PACKAGE_ID") {
        config.contract.package_id = package;
    }
    if let Some(platform) = get("GIGSTREAM_PLATFORM_OBJECT_ID") {
        config.contract.platform_object_id = platform;
    }
}

fn default_network_name() -> String {
    "testnet".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_retries() -> u32 {
    3
}

fn default_module_name() -> String {
    "gigstream".to_string()
}

const fn default_gas_budget() -> u64 {
    DEFAULT_GAS_BUDGET
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

const fn default_hydration_concurrency() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_project_config_uses_defaults() {
        let cfg = GigstreamConfig::default();
        assert_eq!(cfg.network.name, "testnet");
        assert_eq!(cfg.network.retries, 3);
        assert_eq!(cfg.contract.module_name, "gigstream");
        assert_eq!(cfg.contract.gas_budget, 10_000_000);
        assert_eq!(cfg.projection.page_size, 50);
        assert!(!cfg.contract.is_configured());
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
[contract]
package_id = "0xabc"
platform_object_id = "0xplatform"

[projection]
hydration_concurrency = 2
"#,
        )
        .expect("write config");

        let loaded = load_config(None, dir.path()).expect("load should succeed");
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        let cfg = loaded.config;
        assert_eq!(cfg.contract.package_id, "0xabc");
        assert_eq!(cfg.contract.module_name, "gigstream");
        assert_eq!(cfg.projection.page_size, 50);
        assert_eq!(cfg.projection.hydration_concurrency, 2);
        assert!(cfg.contract.is_configured());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing), dir.path()).expect_err("must fail");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[contract\npackage_id = 1").expect("write config");
        let err = load_config(Some(&path), dir.path()).expect_err("must fail");
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn qualified_names_join_package_and_module() {
        let contract = ContractConfig {
            package_id: "0xabc".into(),
            ..ContractConfig::default()
        };
        assert_eq!(
            contract.event_type("JobListingCreated"),
            "0xabc::gigstream::JobListingCreated"
        );
        assert_eq!(
            contract.function_target("create_job_listing"),
            "0xabc::gigstream::create_job_listing"
        );
    }

    #[test]
    fn rpc_url_prefers_explicit_value() {
        let mut network = NetworkConfig::default();
        assert_eq!(
            network.resolved_rpc_url().expect("preset"),
            "https://fullnode.testnet.sui.io:443"
        );

        network.rpc_url = Some(" http://localhost:9124 ".into());
        assert_eq!(
            network.resolved_rpc_url().expect("explicit"),
            "http://localhost:9124"
        );
    }

    #[test]
    fn unknown_network_without_url_fails() {
        let network = NetworkConfig {
            name: "moonnet".into(),
            ..NetworkConfig::default()
        };
        assert!(network.resolved_rpc_url().is_err());
    }

    #[test]
    fn env_overrides_replace_non_empty_values_only() {
        let env: HashMap<&str, &str> = [
            ("GIGSTREAM_RPC_URL", "http://node:9000"),
            ("GIGSTREAM_PACKAGE_ID", "0xfeed"),
            ("GIGSTREAM_PLATFORM_OBJECT_ID", "  "),
        ]
        .into_iter()
        .collect();

        let mut cfg = GigstreamConfig::default();
        cfg.contract.platform_object_id = "0xkeep".into();
        apply_env_overrides(&mut cfg, |key| env.get(key).map(ToString::to_string));

        assert_eq!(cfg.network.rpc_url.as_deref(), Some("http://node:9000"));
        assert_eq!(cfg.contract.package_id, "0xfeed");
        assert_eq!(cfg.contract.platform_object_id, "0xkeep");
    }
}
