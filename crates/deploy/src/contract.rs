//! Contract factory: artifact loading and the minimal ABI plumbing needed
//! to deploy a contract with no constructor arguments and read back its
//! public configuration fields.

use std::path::{Path, PathBuf};

use alloy_core::primitives::{Address, Bytes, U256, keccak256};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while binding or decoding a contract artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// No artifact file was found for the requested contract name.
    #[error("artifact for contract '{name}' not found under {dir}")]
    NotFound { name: String, dir: PathBuf },

    /// The artifact file could not be read.
    #[error("failed to read artifact {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact file is not valid JSON or misses required fields.
    #[error("failed to parse artifact {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact carries no creation bytecode (e.g. an interface).
    #[error("artifact for '{name}' contains no creation bytecode")]
    EmptyBytecode { name: String },

    /// The creation bytecode is not valid hex.
    #[error("invalid bytecode hex for '{name}'")]
    BadBytecode {
        name: String,
        #[source]
        source: hex::FromHexError,
    },
}

/// A compiled contract artifact (Hardhat-style JSON output).
///
/// Only the fields the deployment workflow needs are kept; the ABI itself
/// is not parsed since the two read-back calls are encoded by selector.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    /// The contract name as recorded by the compiler.
    #[serde(rename = "contractName", default)]
    pub contract_name: String,
    /// `0x`-prefixed creation bytecode.
    #[serde(default)]
    bytecode: String,
}

impl ContractArtifact {
    /// Load an artifact from a specific JSON file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Bind an artifact by contract name, resolving it inside an artifacts
    /// directory.
    ///
    /// Both the flat layout (`<dir>/<Name>.json`) and the Hardhat layout
    /// (`<dir>/<Name>.sol/<Name>.json`, possibly nested under `contracts/`)
    /// are tried in order.
    pub fn bind(dir: &Path, name: &str) -> Result<Self, ArtifactError> {
        let candidates = [
            dir.join(format!("{name}.json")),
            dir.join(format!("{name}.sol")).join(format!("{name}.json")),
            dir.join("contracts")
                .join(format!("{name}.sol"))
                .join(format!("{name}.json")),
        ];

        let path = candidates
            .iter()
            .find(|p| p.is_file())
            .ok_or_else(|| ArtifactError::NotFound {
                name: name.to_string(),
                dir: dir.to_path_buf(),
            })?;

        let artifact = Self::load(path)?;
        if !artifact.contract_name.is_empty() && artifact.contract_name != name {
            tracing::warn!(
                requested = %name,
                found = %artifact.contract_name,
                path = %path.display(),
                "Artifact contract name does not match the requested name"
            );
        }

        Ok(artifact)
    }

    /// The creation bytecode, ready to be sent as transaction data.
    pub fn creation_bytecode(&self) -> Result<Bytes, ArtifactError> {
        let stripped = self.bytecode.trim_start_matches("0x");
        if stripped.is_empty() {
            return Err(ArtifactError::EmptyBytecode {
                name: self.contract_name.clone(),
            });
        }
        let raw = hex::decode(stripped).map_err(|source| ArtifactError::BadBytecode {
            name: self.contract_name.clone(),
            source,
        })?;
        Ok(Bytes::from(raw))
    }
}

/// Compute the 4-byte function selector for a Solidity signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Build calldata for a zero-argument function call.
pub fn call_data(signature: &str) -> Bytes {
    Bytes::from(selector(signature).to_vec())
}

/// Decode a single ABI-encoded `address` return word.
pub fn decode_address_word(data: &[u8]) -> Option<Address> {
    if data.len() < 32 {
        return None;
    }
    Some(Address::from_slice(&data[12..32]))
}

/// Decode a single ABI-encoded `uint256` return word.
pub fn decode_u256_word(data: &[u8]) -> Option<U256> {
    if data.len() < 32 {
        return None;
    }
    Some(U256::from_be_slice(&data[..32]))
}
