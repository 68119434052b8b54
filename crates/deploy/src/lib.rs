//! somcast-deploy - Deployment library for the WorkflowMarketplace contract.
//!
//! This crate drives a linear, fail-fast deployment workflow against an
//! Ethereum-compatible JSON-RPC endpoint: resolve the signer, guard against
//! an unfunded account, deploy the contract, smoke-read its configuration,
//! persist a deployment record and wait for a confirmation margin.

mod builder;
pub mod contract;
mod deployer;
mod error;
mod gateway;
mod record;
mod rpc;

pub use builder::{DEFAULT_CONTRACT_NAME, DeployerBuilder};
pub use contract::{ArtifactError, ContractArtifact};
pub use deployer::{
    DEFAULT_CONFIRM_DEADLINE_SECS, DEFAULT_CONFIRMATIONS, DEFAULT_DEPLOY_DEADLINE_SECS,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, Deployer, SOMCONF_FILENAME,
};
pub use error::{DeployError, GatewayError};
pub use gateway::{ChainGateway, DeployedContract, HttpGateway};
pub use record::DeploymentRecord;
