//! The persisted deployment record, the tool's sole durable output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DeployError;

/// Machine-readable description of one completed deployment.
///
/// Serialized as a single JSON object. Persistence is a whole-file
/// overwrite: every run fully replaces the previous record, and no partial
/// state is ever written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Human-readable network name.
    pub network: String,
    /// Chain ID of the target network.
    pub chain_id: u64,
    /// Checksummed address of the deployed contract.
    pub contract_address: String,
    /// Checksummed address of the deployer account.
    pub deployer: String,
    /// Platform wallet address read back from the deployed instance.
    pub platform_wallet: String,
    /// Platform fee read back from the deployed instance, as decimal text.
    pub platform_fee: String,
    /// ISO-8601 UTC timestamp taken when the record was assembled.
    pub deployed_at: String,
    /// Head block number at the time the record was assembled.
    pub block_number: u64,
    /// Block-explorer page for the deployed contract.
    pub explorer_url: String,
    /// Whether the configured confirmation margin has been observed. The
    /// record is first persisted with `false` right after the deployment is
    /// mined, then rewritten with `true` once the margin is reached.
    pub confirmed: bool,
}

impl DeploymentRecord {
    /// Write the record to `path`, fully replacing any prior content.
    pub fn save(&self, path: &Path) -> Result<(), DeployError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|content| std::fs::write(path, &content).map(|_| content))
            .map_err(|source| DeployError::Persistence {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Deployment record written");
        Ok(())
    }
}
