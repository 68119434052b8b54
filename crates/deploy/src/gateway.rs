//! Provider/signer gateway: the single seam between the orchestrator and a
//! live chain.
//!
//! The orchestrator only talks to the chain through the [`ChainGateway`]
//! trait, so the whole workflow is testable without network access. The
//! production implementation, [`HttpGateway`], speaks plain JSON-RPC over
//! HTTP against a node that manages the signing account (anvil, hardhat, or
//! any endpoint exposing `eth_accounts`).

use std::future::Future;
use std::time::{Duration, Instant};

use alloy_core::primitives::{Address, Bytes, U256};
use serde::Deserialize;

use crate::{GatewayError, contract, rpc};

/// Default per-request timeout for RPC calls.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Default interval between chain polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default deadline for the deployment transaction to be mined.
const DEFAULT_DEPLOY_DEADLINE: Duration = Duration::from_secs(300);
/// Default deadline for the confirmation margin.
const DEFAULT_CONFIRM_DEADLINE: Duration = Duration::from_secs(600);

/// A contract deployment observed mined on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// Address of the deployed contract instance.
    pub address: Address,
    /// Hash of the deployment transaction.
    pub transaction_hash: String,
    /// Block in which the deployment transaction was included.
    pub block_number: u64,
}

/// Interface to the blockchain provider and signer.
///
/// Every method is a bounded, sequential suspension point; implementations
/// must not block indefinitely. Waits that can outlast a single request
/// (mining, confirmations) carry their own deadlines and report
/// [`GatewayError::Timeout`] when exceeded.
pub trait ChainGateway: Send + Sync {
    /// Resolve the active signing account.
    fn signer(&self) -> impl Future<Output = Result<Address, GatewayError>> + Send;

    /// The chain ID the node reports.
    fn chain_id(&self) -> impl Future<Output = Result<u64, GatewayError>> + Send;

    /// Native-token balance of an account, in wei.
    fn balance(&self, address: Address)
    -> impl Future<Output = Result<U256, GatewayError>> + Send;

    /// Current head block number.
    fn block_number(&self) -> impl Future<Output = Result<u64, GatewayError>> + Send;

    /// Deploy a contract from creation bytecode (no constructor arguments)
    /// and wait until the transaction is mined, not merely submitted.
    fn deploy(
        &self,
        from: Address,
        bytecode: Bytes,
    ) -> impl Future<Output = Result<DeployedContract, GatewayError>> + Send;

    /// Read the `platformWallet()` field of the deployed instance.
    fn read_platform_wallet(
        &self,
        contract: Address,
    ) -> impl Future<Output = Result<Address, GatewayError>> + Send;

    /// Read the `platformFeePercent()` field of the deployed instance, as
    /// decimal text.
    fn read_platform_fee(
        &self,
        contract: Address,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// Wait until `confirmations` additional blocks exist on top of
    /// `deployed_block`.
    fn wait_for_confirmations(
        &self,
        deployed_block: u64,
        confirmations: u64,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// A transaction receipt, as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
struct TransactionReceipt {
    status: Option<String>,
    #[serde(rename = "contractAddress")]
    contract_address: Option<Address>,
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
}

/// JSON-RPC implementation of [`ChainGateway`].
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
    poll_interval: Duration,
    deploy_deadline: Duration,
    confirm_deadline: Duration,
}

impl HttpGateway {
    /// Create a gateway for the given JSON-RPC endpoint with default
    /// timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_request_timeout(url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a gateway with an explicit per-request timeout.
    pub fn with_request_timeout(
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            client: rpc::create_client(timeout)?,
            url: url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            deploy_deadline: DEFAULT_DEPLOY_DEADLINE,
            confirm_deadline: DEFAULT_CONFIRM_DEADLINE,
        })
    }

    /// Override the interval between chain polls.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the deadline for the deployment transaction to be mined.
    pub fn deploy_deadline(mut self, deadline: Duration) -> Self {
        self.deploy_deadline = deadline;
        self
    }

    /// Override the deadline for the confirmation margin.
    pub fn confirm_deadline(mut self, deadline: Duration) -> Self {
        self.confirm_deadline = deadline;
        self
    }

    /// Perform an `eth_call` against a deployed contract.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, GatewayError> {
        rpc::json_rpc_call(
            &self.client,
            &self.url,
            "eth_call",
            vec![
                serde_json::json!({ "to": to, "data": data }),
                serde_json::json!("latest"),
            ],
        )
        .await
    }
}

impl ChainGateway for HttpGateway {
    async fn signer(&self) -> Result<Address, GatewayError> {
        let accounts: Vec<Address> =
            rpc::json_rpc_call(&self.client, &self.url, "eth_accounts", vec![]).await?;
        accounts.into_iter().next().ok_or(GatewayError::NoSigner)
    }

    async fn chain_id(&self) -> Result<u64, GatewayError> {
        let raw: String =
            rpc::json_rpc_call(&self.client, &self.url, "eth_chainId", vec![]).await?;
        rpc::parse_u64_quantity("eth_chainId", &raw)
    }

    async fn balance(&self, address: Address) -> Result<U256, GatewayError> {
        let raw: String = rpc::json_rpc_call(
            &self.client,
            &self.url,
            "eth_getBalance",
            vec![serde_json::json!(address), serde_json::json!("latest")],
        )
        .await?;
        rpc::parse_u256_quantity("eth_getBalance", &raw)
    }

    async fn block_number(&self) -> Result<u64, GatewayError> {
        let raw: String =
            rpc::json_rpc_call(&self.client, &self.url, "eth_blockNumber", vec![]).await?;
        rpc::parse_u64_quantity("eth_blockNumber", &raw)
    }

    async fn deploy(
        &self,
        from: Address,
        bytecode: Bytes,
    ) -> Result<DeployedContract, GatewayError> {
        let tx_hash: String = rpc::json_rpc_call(
            &self.client,
            &self.url,
            "eth_sendTransaction",
            vec![serde_json::json!({ "from": from, "data": bytecode })],
        )
        .await?;

        tracing::info!(tx_hash = %tx_hash, "Deployment transaction sent");

        // Poll for the receipt until the transaction is mined or the
        // deadline elapses.
        let start = Instant::now();
        loop {
            if start.elapsed() > self.deploy_deadline {
                return Err(GatewayError::Timeout {
                    operation: format!("transaction {} to be mined", tx_hash),
                    seconds: self.deploy_deadline.as_secs(),
                });
            }

            let receipt: Option<TransactionReceipt> = rpc::json_rpc_call(
                &self.client,
                &self.url,
                "eth_getTransactionReceipt",
                vec![serde_json::json!(tx_hash)],
            )
            .await?;

            if let Some(receipt) = receipt {
                if receipt.status.as_deref() != Some("0x1") {
                    return Err(GatewayError::Reverted { tx_hash });
                }

                let address =
                    receipt
                        .contract_address
                        .ok_or_else(|| GatewayError::Decode {
                            method: "eth_getTransactionReceipt".to_string(),
                            message: "mined receipt carries no contract address".to_string(),
                        })?;
                let block_number = rpc::parse_u64_quantity(
                    "eth_getTransactionReceipt",
                    receipt.block_number.as_deref().unwrap_or(""),
                )?;

                return Ok(DeployedContract {
                    address,
                    transaction_hash: tx_hash,
                    block_number,
                });
            }

            tracing::trace!(tx_hash = %tx_hash, "Transaction not mined yet, retrying...");
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn read_platform_wallet(&self, contract: Address) -> Result<Address, GatewayError> {
        let raw = self.call(contract, contract::call_data("platformWallet()")).await?;
        contract::decode_address_word(&raw).ok_or_else(|| GatewayError::Decode {
            method: "eth_call".to_string(),
            message: "platformWallet() returned less than one word".to_string(),
        })
    }

    async fn read_platform_fee(&self, contract: Address) -> Result<String, GatewayError> {
        let raw = self
            .call(contract, contract::call_data("platformFeePercent()"))
            .await?;
        let fee = contract::decode_u256_word(&raw).ok_or_else(|| GatewayError::Decode {
            method: "eth_call".to_string(),
            message: "platformFeePercent() returned less than one word".to_string(),
        })?;
        Ok(fee.to_string())
    }

    async fn wait_for_confirmations(
        &self,
        deployed_block: u64,
        confirmations: u64,
    ) -> Result<(), GatewayError> {
        let target = deployed_block + confirmations;

        let start = Instant::now();
        loop {
            if start.elapsed() > self.confirm_deadline {
                return Err(GatewayError::Timeout {
                    operation: format!("{} confirmations (block {})", confirmations, target),
                    seconds: self.confirm_deadline.as_secs(),
                });
            }

            let head = self.block_number().await?;
            if head >= target {
                return Ok(());
            }

            tracing::debug!(head, target, "Awaiting confirmation margin...");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
