//! somcast is a CLI tool to deploy the WorkflowMarketplace contract to a
//! Somnia network (or any Ethereum-compatible endpoint) in one command.

mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::Table;

use cli::Cli;
use somcast_deploy::{Deployer, DeployerBuilder, DeploymentRecord};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    // If a config file is provided, load it and deploy
    if let Some(config_path) = &cli.config {
        let config_path = PathBuf::from(config_path);
        let deployer = Deployer::load_from_file(&config_path)?;

        tracing::info!(
            config_path = %config_path.display(),
            network = %deployer.network,
            chain_id = deployer.chain_id,
            "Loading deployment from config file..."
        );

        let record = deployer.deploy().await?;
        print_summary(&record);

        return Ok(());
    }

    // Otherwise, create a new deployment from CLI arguments
    let chain_id = cli
        .chain_id
        .or_else(|| cli.network.chain_id())
        .context("--chain-id is required for custom networks")?;

    let mut builder = DeployerBuilder::new(chain_id)
        .network_name(cli.network.name())
        .contract(cli.contract.clone())
        .artifacts_dir(cli.artifacts.clone())
        .confirmations(cli.confirmations)
        .request_timeout_secs(cli.request_timeout)
        .poll_interval_secs(cli.poll_interval)
        .deploy_deadline_secs(cli.deploy_deadline)
        .confirm_deadline_secs(cli.confirm_deadline);

    // Set the RPC URL: explicit flag first, preset endpoint otherwise
    if let Some(rpc_url) = cli.rpc_url.or_else(|| cli.network.rpc_url().map(String::from)) {
        builder = builder.rpc_url(rpc_url);
    }

    // Set the explorer URL template: explicit flag first, preset otherwise
    if let Some(explorer_url) = cli
        .explorer_url
        .or_else(|| cli.network.explorer_url().map(String::from))
    {
        builder = builder.explorer_url(explorer_url);
    }

    // Set the faucet hint: explicit flag first, preset otherwise
    if let Some(faucet_url) = cli
        .faucet_url
        .or_else(|| cli.network.faucet_url().map(String::from))
    {
        builder = builder.faucet_url(faucet_url);
    }

    // Set the record path if provided
    if let Some(record_path) = cli.record_path {
        builder = builder.record_path(record_path);
    }

    // Build the deployer configuration
    let deployer = builder.build()?;

    // Save the configuration to Somcast.toml before deploying
    deployer.save_config()?;

    let record = deployer.deploy().await?;
    print_summary(&record);

    Ok(())
}

/// Print the final deployment summary as a table.
fn print_summary(record: &DeploymentRecord) {
    let mut table = Table::new();
    table.set_header(["Field", "Value"]);
    table.add_row(["Network", record.network.as_str()]);
    table.add_row(["Chain ID", record.chain_id.to_string().as_str()]);
    table.add_row(["Contract", record.contract_address.as_str()]);
    table.add_row(["Deployer", record.deployer.as_str()]);
    table.add_row(["Platform wallet", record.platform_wallet.as_str()]);
    table.add_row(["Platform fee (%)", record.platform_fee.as_str()]);
    table.add_row(["Block number", record.block_number.to_string().as_str()]);
    table.add_row(["Deployed at", record.deployed_at.as_str()]);
    table.add_row(["Confirmed", record.confirmed.to_string().as_str()]);
    table.add_row(["Explorer", record.explorer_url.as_str()]);
    println!("{table}");
}
