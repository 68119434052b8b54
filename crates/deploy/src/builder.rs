//! Builder module for creating a [`Deployer`] configuration.
//!
//! This module provides the [`DeployerBuilder`] struct which simplifies the
//! creation of a [`Deployer`] by handling defaults, RPC URL validation and
//! output directory creation.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::{
    DEFAULT_CONFIRM_DEADLINE_SECS, DEFAULT_CONFIRMATIONS, DEFAULT_DEPLOY_DEADLINE_SECS,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, Deployer,
};

/// The default contract deployed when no name is provided.
pub const DEFAULT_CONTRACT_NAME: &str = "WorkflowMarketplace";

/// Builder for creating a [`Deployer`] configuration.
///
/// This builder handles:
/// - Network name defaults (derived from the chain ID if not provided)
/// - RPC URL validation
/// - Record path defaults and output directory creation
///
/// # Example
///
/// ```no_run
/// use somcast_deploy::DeployerBuilder;
///
/// # fn example() -> anyhow::Result<()> {
/// let deployer = DeployerBuilder::new(50312) // Somnia testnet chain ID
///     .network_name("somniaTestnet")
///     .rpc_url("https://dream-rpc.somnia.network")
///     .explorer_url("https://shannon-explorer.somnia.network/address/{address}")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeployerBuilder {
    /// The expected chain ID (required).
    chain_id: u64,
    /// The network name (optional, derived from the chain ID if not provided).
    network: Option<String>,
    /// The JSON-RPC endpoint URL (required).
    rpc_url: Option<String>,
    /// The contract name (optional).
    contract: Option<String>,
    /// The artifacts directory (optional).
    artifacts_dir: Option<PathBuf>,
    /// The deployment record path (optional).
    record_path: Option<PathBuf>,
    /// The confirmation count (optional).
    confirmations: Option<u64>,
    /// The explorer URL template (required).
    explorer_url: Option<String>,
    /// The faucet URL hint (optional).
    faucet_url: Option<String>,
    /// Per-request RPC timeout in seconds.
    request_timeout_secs: u64,
    /// Interval between chain polls in seconds.
    poll_interval_secs: u64,
    /// Deadline for the deployment transaction to be mined, in seconds.
    deploy_deadline_secs: u64,
    /// Deadline for the confirmation margin, in seconds.
    confirm_deadline_secs: u64,
}

impl DeployerBuilder {
    /// Create a new [`DeployerBuilder`] with the required chain ID.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            network: None,
            rpc_url: None,
            contract: None,
            artifacts_dir: None,
            record_path: None,
            confirmations: None,
            explorer_url: None,
            faucet_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            deploy_deadline_secs: DEFAULT_DEPLOY_DEADLINE_SECS,
            confirm_deadline_secs: DEFAULT_CONFIRM_DEADLINE_SECS,
        }
    }

    /// Set the network name.
    ///
    /// If not set, defaults to `chain-<chain-id>`.
    pub fn network_name(mut self, name: impl Into<String>) -> Self {
        self.network = Some(name.into());
        self
    }

    /// Set the JSON-RPC endpoint URL.
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Set the contract to deploy.
    ///
    /// If not set, defaults to [`DEFAULT_CONTRACT_NAME`].
    pub fn contract(mut self, name: impl Into<String>) -> Self {
        self.contract = Some(name.into());
        self
    }

    /// Set the directory holding compiled contract artifacts.
    ///
    /// If not set, defaults to `./artifacts`.
    pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    /// Set the path the deployment record is written to.
    ///
    /// If not set, defaults to `deployments/<network-name>/deployment.json`.
    pub fn record_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Set the number of extra blocks awaited on top of the deployment
    /// block. Defaults to [`DEFAULT_CONFIRMATIONS`].
    pub fn confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = Some(confirmations);
        self
    }

    /// Set the explorer URL template. `{address}` is replaced with the
    /// deployed contract address.
    pub fn explorer_url(mut self, url: impl Into<String>) -> Self {
        self.explorer_url = Some(url.into());
        self
    }

    /// Set the faucet URL surfaced when the deployer account has no funds.
    pub fn faucet_url(mut self, url: impl Into<String>) -> Self {
        self.faucet_url = Some(url.into());
        self
    }

    /// Set the per-request RPC timeout in seconds.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the interval between chain polls in seconds.
    pub fn poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Set the deadline in seconds for the deployment transaction to be
    /// mined.
    pub fn deploy_deadline_secs(mut self, secs: u64) -> Self {
        self.deploy_deadline_secs = secs;
        self
    }

    /// Set the deadline in seconds for the confirmation margin.
    pub fn confirm_deadline_secs(mut self, secs: u64) -> Self {
        self.confirm_deadline_secs = secs;
        self
    }

    /// Build the [`Deployer`] configuration.
    ///
    /// This method:
    /// 1. Validates the RPC endpoint URL
    /// 2. Derives the network name if not provided
    /// 3. Creates the deployment record directory if it doesn't exist
    pub fn build(self) -> Result<Deployer> {
        let rpc_url = self
            .rpc_url
            .context("An RPC URL is required; pass one explicitly for custom networks")?;

        let parsed = url::Url::parse(&rpc_url)
            .with_context(|| format!("Invalid RPC URL: {}", rpc_url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!(
                "Unsupported RPC URL scheme '{}': only http(s) endpoints are supported",
                parsed.scheme()
            );
        }

        let explorer_url = self.explorer_url.context(
            "An explorer URL template is required; pass one explicitly for custom networks",
        )?;

        let network = self
            .network
            .unwrap_or_else(|| format!("chain-{}", self.chain_id));

        let record_path = self.record_path.unwrap_or_else(|| {
            PathBuf::from("deployments")
                .join(&network)
                .join("deployment.json")
        });

        if let Some(dir) = record_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!(
                        "Failed to create deployment record directory {}",
                        dir.display()
                    )
                })?;
            }
        }

        tracing::info!(
            network,
            chain_id = self.chain_id,
            rpc_url,
            record_path = %record_path.display(),
            "Building deployment configuration..."
        );

        Ok(Deployer {
            network,
            chain_id: self.chain_id,
            rpc_url,
            contract: self
                .contract
                .unwrap_or_else(|| DEFAULT_CONTRACT_NAME.to_string()),
            artifacts_dir: self.artifacts_dir.unwrap_or_else(|| "artifacts".into()),
            record_path,
            confirmations: self.confirmations.unwrap_or(DEFAULT_CONFIRMATIONS),
            explorer_url,
            faucet_url: self.faucet_url,
            request_timeout_secs: self.request_timeout_secs,
            poll_interval_secs: self.poll_interval_secs,
            deploy_deadline_secs: self.deploy_deadline_secs,
            confirm_deadline_secs: self.confirm_deadline_secs,
        })
    }
}
