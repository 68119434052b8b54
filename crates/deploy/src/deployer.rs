use std::path::PathBuf;
use std::time::Duration;

use alloy_core::primitives::U256;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    ChainGateway, DeployError, DeploymentRecord, GatewayError, HttpGateway,
    contract::ContractArtifact,
};

/// The default name for the somcast configuration file.
pub const SOMCONF_FILENAME: &str = "Somcast.toml";

/// Default number of extra blocks awaited on top of the deployment block.
pub const DEFAULT_CONFIRMATIONS: u64 = 5;
/// Default per-request RPC timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Default interval between chain polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
/// Default deadline for the deployment transaction to be mined, in seconds.
pub const DEFAULT_DEPLOY_DEADLINE_SECS: u64 = 300;
/// Default deadline for the confirmation margin, in seconds.
pub const DEFAULT_CONFIRM_DEADLINE_SECS: u64 = 600;

/// Main deployer that orchestrates the contract deployment workflow.
///
/// This struct contains all the configuration needed to deploy the contract
/// and can be serialized to/from TOML format. Nothing is read from the
/// environment once a `Deployer` exists; every knob is an explicit field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployer {
    /// Human-readable network name, recorded verbatim in the deployment
    /// record.
    pub network: String,
    /// Expected chain ID; cross-checked against the node before deploying.
    pub chain_id: u64,
    /// HTTP JSON-RPC endpoint of the target network.
    pub rpc_url: String,
    /// Name of the contract to deploy.
    pub contract: String,
    /// Directory holding compiled contract artifacts.
    pub artifacts_dir: PathBuf,
    /// Path the deployment record is written to.
    pub record_path: PathBuf,
    /// Extra blocks awaited on top of the deployment block.
    pub confirmations: u64,
    /// Explorer URL template; `{address}` is replaced with the contract
    /// address.
    pub explorer_url: String,
    /// Faucet URL surfaced when the deployer account holds no funds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faucet_url: Option<String>,
    /// Per-request RPC timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Interval between chain polls, in seconds.
    pub poll_interval_secs: u64,
    /// Deadline for the deployment transaction to be mined, in seconds.
    pub deploy_deadline_secs: u64,
    /// Deadline for the confirmation margin, in seconds.
    pub confirm_deadline_secs: u64,
}

impl Deployer {
    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize deployer config to TOML")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file or directory not found: {}",
                path.display()
            ));
        }

        let config_path = if path.is_dir() {
            path.join(SOMCONF_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(config_path)
            .context(format!("Failed to read config from {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save the deployer's configuration to the default location
    /// (Somcast.toml next to the deployment record).
    pub fn save_config(&self) -> Result<PathBuf> {
        let dir = self
            .record_path
            .parent()
            .context("Record path has no parent directory")?;
        let config_path = dir.join(SOMCONF_FILENAME);
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }

    /// Build the production HTTP gateway from this configuration.
    pub fn gateway(&self) -> Result<HttpGateway, GatewayError> {
        Ok(HttpGateway::with_request_timeout(
            self.rpc_url.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )?
        .poll_interval(Duration::from_secs(self.poll_interval_secs))
        .deploy_deadline(Duration::from_secs(self.deploy_deadline_secs))
        .confirm_deadline(Duration::from_secs(self.confirm_deadline_secs)))
    }
}

impl Deployer {
    /// Deploy against the configured RPC endpoint.
    ///
    /// Binds the contract artifact, builds the HTTP gateway and runs the
    /// full workflow once. There are no retries.
    pub async fn deploy(&self) -> Result<DeploymentRecord, DeployError> {
        let artifact = ContractArtifact::bind(&self.artifacts_dir, &self.contract)?;
        let gateway = self.gateway().map_err(DeployError::Collaborator)?;
        self.run(&gateway, &artifact).await
    }

    /// Run the deployment workflow against an arbitrary gateway.
    ///
    /// The sequence is linear and fail-fast: resolve the signer, guard
    /// against a zero balance, cross-check the chain ID, deploy and await
    /// mining, smoke-read the contract configuration, persist the record,
    /// then wait for the confirmation margin and mark the record confirmed.
    pub async fn run<G: ChainGateway>(
        &self,
        gateway: &G,
        artifact: &ContractArtifact,
    ) -> Result<DeploymentRecord, DeployError> {
        tracing::info!(
            network = %self.network,
            chain_id = self.chain_id,
            contract = %self.contract,
            "Starting deployment..."
        );

        // Resolve the signing account.
        let deployer = gateway.signer().await.map_err(|e| match e {
            GatewayError::NoSigner => DeployError::NoSigner,
            other => DeployError::Collaborator(other),
        })?;
        tracing::info!(deployer = %deployer, "Deployer account resolved");

        // Zero-balance guard: give an actionable message before spending any
        // round trips on deployment. A non-zero balance proceeds even if it
        // may not cover gas; there is no gas pre-check.
        let balance = gateway.balance(deployer).await?;
        tracing::info!(balance_eth = %format_ether(balance), "Deployer balance");
        if balance.is_zero() {
            if let Some(faucet) = &self.faucet_url {
                tracing::error!(faucet = %faucet, "Deployer has no funds; get tokens from the faucet");
            }
            return Err(DeployError::NoFundedAccount {
                address: deployer.to_string(),
            });
        }

        // The configured chain ID must match the node we are about to spend
        // on.
        let actual = gateway.chain_id().await?;
        if actual != self.chain_id {
            return Err(DeployError::ChainIdMismatch {
                expected: self.chain_id,
                actual,
            });
        }

        tracing::info!(contract = %self.contract, "Deploying contract...");
        let bytecode = artifact.creation_bytecode()?;
        let deployed = gateway.deploy(deployer, bytecode).await?;
        tracing::info!(
            address = %deployed.address,
            tx_hash = %deployed.transaction_hash,
            block = deployed.block_number,
            "Contract deployed"
        );

        // Smoke-read the two public configuration fields to confirm the
        // instance answers.
        let platform_wallet = gateway.read_platform_wallet(deployed.address).await?;
        let platform_fee = gateway.read_platform_fee(deployed.address).await?;
        tracing::info!(
            platform_wallet = %platform_wallet,
            platform_fee = %platform_fee,
            "Contract configuration read back"
        );

        let contract_address = deployed.address.to_string();
        let block_number = gateway.block_number().await?;
        let mut record = DeploymentRecord {
            network: self.network.clone(),
            chain_id: self.chain_id,
            contract_address: contract_address.clone(),
            deployer: deployer.to_string(),
            platform_wallet: platform_wallet.to_string(),
            platform_fee,
            deployed_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            block_number,
            explorer_url: self.explorer_url.replace("{address}", &contract_address),
            confirmed: false,
        };

        record.save(&self.record_path)?;
        tracing::info!(path = %self.record_path.display(), "Deployment record saved");

        tracing::info!(
            confirmations = self.confirmations,
            "Waiting for block confirmations..."
        );
        gateway
            .wait_for_confirmations(deployed.block_number, self.confirmations)
            .await?;

        // The margin has been observed; flip the record in place.
        record.confirmed = true;
        record.save(&self.record_path)?;

        tracing::info!(explorer_url = %record.explorer_url, "Deployment confirmed");
        Ok(record)
    }
}

/// Format a wei amount as a decimal ether string, trimming trailing zeros.
fn format_ether(wei: U256) -> String {
    let base = U256::from(10u64).pow(U256::from(18u64));
    let whole = wei / base;
    let frac = wei % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>18}", frac.to_string());
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deployer(dir: &std::path::Path) -> Deployer {
        Deployer {
            network: "somniaTestnet".to_string(),
            chain_id: 50312,
            rpc_url: "https://dream-rpc.somnia.network".to_string(),
            contract: "WorkflowMarketplace".to_string(),
            artifacts_dir: dir.join("artifacts"),
            record_path: dir.join("deployment.json"),
            confirmations: DEFAULT_CONFIRMATIONS,
            explorer_url: "https://shannon-explorer.somnia.network/address/{address}".to_string(),
            faucet_url: Some("https://testnet.somnia.network/".to_string()),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            deploy_deadline_secs: DEFAULT_DEPLOY_DEADLINE_SECS,
            confirm_deadline_secs: DEFAULT_CONFIRM_DEADLINE_SECS,
        }
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = tempdir::TempDir::new("somcast-test").unwrap();
        let deployer = sample_deployer(dir.path());

        let path = dir.path().join(SOMCONF_FILENAME);
        deployer.save_to_file(&path).unwrap();
        let loaded = Deployer::load_from_file(&path).unwrap();
        assert_eq!(loaded, deployer);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempdir::TempDir::new("somcast-test").unwrap();
        let deployer = sample_deployer(dir.path());
        deployer.save_config().unwrap();

        let loaded = Deployer::load_from_file(&dir.path().to_path_buf()).unwrap();
        assert_eq!(loaded, deployer);
    }

    #[test]
    fn test_load_missing_config() {
        let path = PathBuf::from("/nonexistent/Somcast.toml");
        assert!(Deployer::load_from_file(&path).is_err());
    }

    #[test]
    fn test_format_ether() {
        let eth = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(eth), "1");
        assert_eq!(format_ether(eth * U256::from(42u64)), "42");
        assert_eq!(format_ether(eth / U256::from(10u64)), "0.1");
        assert_eq!(
            format_ether(eth + eth / U256::from(2u64)),
            "1.5"
        );
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
    }
}
