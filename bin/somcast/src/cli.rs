use std::path::PathBuf;

use clap::Parser;
use somcast_deploy::{
    DEFAULT_CONFIRM_DEADLINE_SECS, DEFAULT_CONFIRMATIONS, DEFAULT_CONTRACT_NAME,
    DEFAULT_DEPLOY_DEADLINE_SECS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use tracing::level_filters::LevelFilter;

/// The default target network.
const DEFAULT_NETWORK: Network = Network::SomniaTestnet;

#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Network {
    SomniaTestnet,
    SomniaMainnet,
    #[strum(default)]
    Custom(String),
}

impl Network {
    /// The network name recorded in the deployment record.
    pub fn name(&self) -> String {
        match self {
            Network::SomniaTestnet => "somniaTestnet".to_string(),
            Network::SomniaMainnet => "somniaMainnet".to_string(),
            Network::Custom(name) => name.clone(),
        }
    }

    /// The chain ID of a preset network.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Network::SomniaTestnet => Some(50312),
            Network::SomniaMainnet => Some(5031),
            Network::Custom(_) => None,
        }
    }

    /// The default public RPC endpoint of a preset network.
    pub fn rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::SomniaTestnet => Some("https://dream-rpc.somnia.network"),
            Network::SomniaMainnet => Some("https://api.infra.mainnet.somnia.network"),
            Network::Custom(_) => None,
        }
    }

    /// The explorer URL template of a preset network.
    pub fn explorer_url(&self) -> Option<&'static str> {
        match self {
            Network::SomniaTestnet => {
                Some("https://shannon-explorer.somnia.network/address/{address}")
            }
            Network::SomniaMainnet => Some("https://explorer.somnia.network/address/{address}"),
            Network::Custom(_) => None,
        }
    }

    /// The faucet URL of a preset network, if it has one.
    pub fn faucet_url(&self) -> Option<&'static str> {
        match self {
            Network::SomniaTestnet => Some("https://testnet.somnia.network/"),
            _ => None,
        }
    }
}

#[derive(Parser)]
#[command(name = "somcast")]
#[command(
    author,
    version,
    about = "Deploy the WorkflowMarketplace contract and record the result"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "SOMCAST_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The target network (preset name or a custom network name).
    ///
    /// Presets supply the chain ID, a public RPC endpoint, the explorer URL
    /// template and (for the testnet) a faucet hint.
    #[arg(short, long, env = "SOMCAST_NETWORK", default_value_t = DEFAULT_NETWORK)]
    pub network: Network,

    /// The URL of the JSON-RPC endpoint.
    ///
    /// If not provided, the preset network's public endpoint is used.
    /// Required for custom networks.
    #[arg(long, alias = "rpc", env = "SOMCAST_RPC_URL")]
    pub rpc_url: Option<String>,

    /// The chain ID, cross-checked against the node before deploying.
    ///
    /// If not provided, the preset network's chain ID is used. Required for
    /// custom networks.
    #[arg(long, env = "SOMCAST_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// The name of the contract artifact to deploy.
    #[arg(long, env = "SOMCAST_CONTRACT", default_value = DEFAULT_CONTRACT_NAME)]
    pub contract: String,

    /// The directory holding compiled contract artifacts.
    #[arg(long, env = "SOMCAST_ARTIFACTS", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// The path the deployment record is written to.
    ///
    /// If not provided, the record is written to:
    /// deployments/<network-name>/deployment.json
    #[arg(long, alias = "out", env = "SOMCAST_RECORD_PATH")]
    pub record_path: Option<PathBuf>,

    /// The number of extra blocks to await on top of the deployment block.
    #[arg(long, env = "SOMCAST_CONFIRMATIONS", default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Explorer URL template; `{address}` is replaced with the deployed
    /// contract address. Required for custom networks.
    #[arg(long, env = "SOMCAST_EXPLORER_URL")]
    pub explorer_url: Option<String>,

    /// Faucet URL shown when the deployer account holds no funds.
    #[arg(long, env = "SOMCAST_FAUCET_URL")]
    pub faucet_url: Option<String>,

    /// Per-request RPC timeout in seconds.
    #[arg(long, env = "SOMCAST_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Interval between chain polls in seconds.
    #[arg(long, env = "SOMCAST_POLL_INTERVAL", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval: u64,

    /// Deadline in seconds for the deployment transaction to be mined.
    #[arg(long, env = "SOMCAST_DEPLOY_DEADLINE", default_value_t = DEFAULT_DEPLOY_DEADLINE_SECS)]
    pub deploy_deadline: u64,

    /// Deadline in seconds for the confirmation margin.
    #[arg(long, env = "SOMCAST_CONFIRM_DEADLINE", default_value_t = DEFAULT_CONFIRM_DEADLINE_SECS)]
    pub confirm_deadline: u64,

    /// Path to an existing Somcast.toml configuration file to load.
    ///
    /// When provided, the deployment will use the configuration from this
    /// file instead of generating a new one from CLI arguments.
    #[arg(long, alias = "conf", env = "SOMCAST_CONFIG")]
    pub config: Option<String>,
}
