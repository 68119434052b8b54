//! Workflow tests for the deployment orchestrator against a mocked gateway.
//!
//! These tests exercise the full deployment sequence without any network
//! access: the mock gateway scripts the chain's answers and the tests assert
//! what ends up in the deployment record file.

use std::path::Path;

use alloy_core::primitives::{Address, Bytes, U256};
use tempdir::TempDir;

use somcast_deploy::{
    ChainGateway, ContractArtifact, DeployError, DeployedContract, Deployer, DeploymentRecord,
    GatewayError,
};

const CHAIN_ID: u64 = 50312;

/// A scripted chain gateway.
struct MockGateway {
    signer: Option<Address>,
    balance: U256,
    chain_id: u64,
    contract_address: Address,
    deploy_block: u64,
    head_block: u64,
    platform_wallet: Address,
    platform_fee: String,
    fail_confirmations: bool,
}

impl MockGateway {
    fn funded() -> Self {
        Self {
            signer: Some(Address::repeat_byte(0x11)),
            balance: U256::from(1u64),
            chain_id: CHAIN_ID,
            contract_address: Address::repeat_byte(0xab),
            deploy_block: 95,
            head_block: 100,
            platform_wallet: Address::repeat_byte(0xde),
            platform_fee: "2.5".to_string(),
            fail_confirmations: false,
        }
    }

    fn broke() -> Self {
        Self {
            balance: U256::ZERO,
            ..Self::funded()
        }
    }
}

impl ChainGateway for MockGateway {
    async fn signer(&self) -> Result<Address, GatewayError> {
        self.signer.ok_or(GatewayError::NoSigner)
    }

    async fn chain_id(&self) -> Result<u64, GatewayError> {
        Ok(self.chain_id)
    }

    async fn balance(&self, _address: Address) -> Result<U256, GatewayError> {
        Ok(self.balance)
    }

    async fn block_number(&self) -> Result<u64, GatewayError> {
        Ok(self.head_block)
    }

    async fn deploy(
        &self,
        _from: Address,
        _bytecode: Bytes,
    ) -> Result<DeployedContract, GatewayError> {
        Ok(DeployedContract {
            address: self.contract_address,
            transaction_hash: "0xdeadbeef".to_string(),
            block_number: self.deploy_block,
        })
    }

    async fn read_platform_wallet(&self, _contract: Address) -> Result<Address, GatewayError> {
        Ok(self.platform_wallet)
    }

    async fn read_platform_fee(&self, _contract: Address) -> Result<String, GatewayError> {
        Ok(self.platform_fee.clone())
    }

    async fn wait_for_confirmations(
        &self,
        _deployed_block: u64,
        confirmations: u64,
    ) -> Result<(), GatewayError> {
        if self.fail_confirmations {
            return Err(GatewayError::Timeout {
                operation: format!("{} confirmations", confirmations),
                seconds: 600,
            });
        }
        Ok(())
    }
}

fn test_deployer(dir: &Path) -> Deployer {
    Deployer {
        network: "somniaTestnet".to_string(),
        chain_id: CHAIN_ID,
        rpc_url: "http://localhost:8545".to_string(),
        contract: "WorkflowMarketplace".to_string(),
        artifacts_dir: dir.join("artifacts"),
        record_path: dir.join("deployment.json"),
        confirmations: 5,
        explorer_url: "https://shannon-explorer.somnia.network/address/{address}".to_string(),
        faucet_url: Some("https://testnet.somnia.network/".to_string()),
        request_timeout_secs: 10,
        poll_interval_secs: 2,
        deploy_deadline_secs: 300,
        confirm_deadline_secs: 600,
    }
}

fn test_artifact() -> ContractArtifact {
    serde_json::from_value(serde_json::json!({
        "contractName": "WorkflowMarketplace",
        "abi": [],
        "bytecode": "0x6080604052"
    }))
    .unwrap()
}

fn read_record(path: &Path) -> DeploymentRecord {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn successful_run_persists_confirmed_record() {
    let dir = TempDir::new("somcast-test").unwrap();
    let deployer = test_deployer(dir.path());
    let gateway = MockGateway::funded();

    let record = deployer.run(&gateway, &test_artifact()).await.unwrap();

    let expected_address = gateway.contract_address.to_string();
    assert_eq!(record.contract_address, expected_address);
    assert_eq!(record.network, "somniaTestnet");
    assert_eq!(record.chain_id, CHAIN_ID);
    assert_eq!(record.block_number, 100);
    assert_eq!(record.platform_fee, "2.5");
    assert_eq!(record.platform_wallet, gateway.platform_wallet.to_string());
    assert_eq!(record.deployer, gateway.signer.unwrap().to_string());
    assert!(record.explorer_url.contains(&expected_address));
    assert!(record.confirmed);

    // The timestamp must be valid ISO-8601.
    chrono::DateTime::parse_from_rfc3339(&record.deployed_at).unwrap();

    // The persisted file matches the returned record exactly.
    assert_eq!(read_record(&deployer.record_path), record);
}

#[tokio::test]
async fn zero_balance_aborts_without_writing() {
    let dir = TempDir::new("somcast-test").unwrap();
    let deployer = test_deployer(dir.path());
    let gateway = MockGateway::broke();

    let err = deployer
        .run(&gateway, &test_artifact())
        .await
        .unwrap_err();
    assert!(matches!(err, DeployError::NoFundedAccount { .. }));
    assert!(!deployer.record_path.exists());

    // Failure is idempotent: rerunning yields the same error and still no
    // file.
    let err = deployer
        .run(&gateway, &test_artifact())
        .await
        .unwrap_err();
    assert!(matches!(err, DeployError::NoFundedAccount { .. }));
    assert!(!deployer.record_path.exists());
}

#[tokio::test]
async fn missing_signer_aborts_without_writing() {
    let dir = TempDir::new("somcast-test").unwrap();
    let deployer = test_deployer(dir.path());
    let gateway = MockGateway {
        signer: None,
        ..MockGateway::funded()
    };

    let err = deployer
        .run(&gateway, &test_artifact())
        .await
        .unwrap_err();
    assert!(matches!(err, DeployError::NoSigner));
    assert!(!deployer.record_path.exists());
}

#[tokio::test]
async fn chain_id_mismatch_aborts_without_writing() {
    let dir = TempDir::new("somcast-test").unwrap();
    let deployer = test_deployer(dir.path());
    let gateway = MockGateway {
        chain_id: 31337,
        ..MockGateway::funded()
    };

    let err = deployer
        .run(&gateway, &test_artifact())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::ChainIdMismatch {
            expected: CHAIN_ID,
            actual: 31337
        }
    ));
    assert!(!deployer.record_path.exists());
}

#[tokio::test]
async fn confirmation_failure_leaves_unconfirmed_record() {
    let dir = TempDir::new("somcast-test").unwrap();
    let deployer = test_deployer(dir.path());
    let gateway = MockGateway {
        fail_confirmations: true,
        ..MockGateway::funded()
    };

    let err = deployer
        .run(&gateway, &test_artifact())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::Collaborator(GatewayError::Timeout { .. })
    ));

    // The record was persisted before the confirmation wait, and it says so.
    let record = read_record(&deployer.record_path);
    assert!(!record.confirmed);
    assert_eq!(record.contract_address, gateway.contract_address.to_string());
}

#[tokio::test]
async fn consecutive_runs_fully_replace_the_record() {
    let dir = TempDir::new("somcast-test").unwrap();
    let deployer = test_deployer(dir.path());

    let first_gateway = MockGateway::funded();
    deployer
        .run(&first_gateway, &test_artifact())
        .await
        .unwrap();
    let first_address = first_gateway.contract_address.to_string();

    let second_gateway = MockGateway {
        contract_address: Address::repeat_byte(0xcd),
        head_block: 250,
        ..MockGateway::funded()
    };
    deployer
        .run(&second_gateway, &test_artifact())
        .await
        .unwrap();

    let content = std::fs::read_to_string(&deployer.record_path).unwrap();
    let record: DeploymentRecord = serde_json::from_str(&content).unwrap();
    assert_eq!(
        record.contract_address,
        second_gateway.contract_address.to_string()
    );
    assert_eq!(record.block_number, 250);
    // No trace of the first deployment survives the overwrite.
    assert!(!content.contains(&first_address));
}

#[tokio::test]
async fn missing_artifact_aborts_before_any_chain_call() {
    let dir = TempDir::new("somcast-test").unwrap();
    let deployer = test_deployer(dir.path());

    // `deploy()` binds the artifact first; with an empty artifacts dir the
    // run fails before the gateway is ever built.
    let err = deployer.deploy().await.unwrap_err();
    assert!(matches!(err, DeployError::Artifact(_)));
    assert!(!deployer.record_path.exists());
}
