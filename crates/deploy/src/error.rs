//! Error taxonomy for the deployment workflow.
//!
//! Two layers: [`GatewayError`] for everything surfaced by the chain
//! collaborator, and [`DeployError`] for the orchestrator itself. No error
//! is retried; every one aborts the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::contract::ArtifactError;

/// Errors surfaced by a [`ChainGateway`](crate::ChainGateway) implementation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The node exposes no managed accounts.
    #[error("no signer configured: the node returned an empty account list")]
    NoSigner,

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The HTTP transport failed (connection refused, DNS, request timeout).
    #[error("transport error during {method}")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// The JSON-RPC endpoint returned an error object.
    #[error("RPC error from {method}: {message}")]
    Rpc { method: String, message: String },

    /// A response could not be decoded into the expected shape.
    #[error("malformed response from {method}: {message}")]
    Decode { method: String, message: String },

    /// A bounded wait elapsed before the chain reached the expected state.
    #[error("timed out after {seconds}s waiting for {operation}")]
    Timeout { operation: String, seconds: u64 },

    /// The deployment transaction was mined but reverted.
    #[error("deployment transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },
}

/// Errors produced by the deployment orchestrator.
#[derive(Debug, Error)]
pub enum DeployError {
    /// No signing account is available on the node.
    #[error("no signer configured: the node returned an empty account list")]
    NoSigner,

    /// The deployer account holds a zero balance. Checked before any
    /// deployment round trip so the operator gets an actionable message
    /// instead of a gas failure.
    #[error("deployer account {address} holds a zero balance")]
    NoFundedAccount { address: String },

    /// The node reports a different chain ID than the one configured.
    #[error("chain ID mismatch: configured {expected}, node reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    /// The contract artifact could not be loaded.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Any failure surfaced by the provider/signer gateway.
    #[error(transparent)]
    Collaborator(#[from] GatewayError),

    /// The deployment record could not be written.
    #[error("failed to write deployment record to {path}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
