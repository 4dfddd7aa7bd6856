// This file is part of Massbridge.
//
// Massbridge is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Massbridge is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Massbridge.
// If not, see https://www.gnu.org/licenses/.

//! Massbridge CLI: bridge a fixed ETH amount from many wallets on Ethereum
//! Sepolia to Arbitrum Sepolia or Base Sepolia.

use std::{path::PathBuf, sync::Arc, time::Duration};

use alloy_primitives::utils::parse_ether;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use anyhow::Context;
use clap::Parser;
use massbridge_engine::{
    BatchRunner, BridgeRequest, RawTransactionSender, RetrySubmitter, SubmitterSettings,
    TransactionPipeline,
};
use massbridge_provider::{AlloyEvmProvider, FeeEstimator, FeeEstimatorConfig};
use massbridge_types::{chain, BridgeMode};
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod keys;

#[derive(Debug, Parser)]
#[command(name = "massbridge", version, about)]
struct Cli {
    /// Destination rollup: 'arbitrum' or 'base'.
    #[arg(long, env = "MASSBRIDGE_DESTINATION", default_value = "arbitrum")]
    destination: BridgeMode,

    /// Amount to bridge per wallet, in ETH.
    #[arg(long, env = "MASSBRIDGE_AMOUNT_ETH", default_value = "0.0001")]
    amount_eth: String,

    /// Ethereum Sepolia JSON-RPC HTTP endpoint.
    #[arg(long, env = "MASSBRIDGE_NODE_HTTP")]
    node_http: Url,

    /// Destination chain JSON-RPC HTTP endpoint. Required for 'arbitrum',
    /// where the destination gas price prices the retryable ticket.
    #[arg(long, env = "MASSBRIDGE_DESTINATION_HTTP")]
    destination_http: Option<Url>,

    /// File with one private key per line; '#' comments and blank lines are
    /// skipped.
    #[arg(long, env = "MASSBRIDGE_PRIVATE_KEYS_FILE", default_value = "p_key.txt")]
    private_keys_file: PathBuf,

    /// Seconds to pause between wallets.
    #[arg(long, env = "MASSBRIDGE_DELAY_SECONDS", default_value_t = 15)]
    delay_seconds: u64,

    /// Attempt budget per wallet.
    #[arg(long, env = "MASSBRIDGE_MAX_ATTEMPTS", default_value_t = 3)]
    max_attempts: u32,

    /// Seconds to wait for a receipt before an attempt counts as timed out.
    #[arg(long, env = "MASSBRIDGE_CONFIRMATION_TIMEOUT", default_value_t = 300)]
    confirmation_timeout_seconds: u64,

    /// Percent overhead applied to quoted base and priority fees; 20 means
    /// a 1.2x margin.
    #[arg(long, env = "MASSBRIDGE_FEE_OVERHEAD_PERCENT", default_value_t = 20)]
    fee_overhead_percent: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let amount = parse_ether(&cli.amount_eth).context("invalid --amount-eth")?;
    anyhow::ensure!(!amount.is_zero(), "--amount-eth must be greater than zero");
    anyhow::ensure!(
        !cli.destination.requires_submission_cost() || cli.destination_http.is_some(),
        "--destination-http is required for the '{}' destination",
        cli.destination
    );

    let keys = keys::load_private_keys(&cli.private_keys_file)?;
    anyhow::ensure!(
        !keys.is_empty(),
        "no private keys found in {}",
        cli.private_keys_file.display()
    );
    let requests = keys
        .iter()
        .map(|key| {
            let signer = key
                .expose_secret()
                .parse::<PrivateKeySigner>()
                .context("failed to parse private key")?
                .with_chain_id(Some(chain::SOURCE_CHAIN_ID));
            Ok(BridgeRequest {
                signer,
                amount,
                mode: cli.destination,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let source = Arc::new(AlloyEvmProvider::new(
        ProviderBuilder::new().connect_http(cli.node_http).erased(),
    ));
    let destination = cli.destination_http.map(|url| {
        Arc::new(AlloyEvmProvider::new(
            ProviderBuilder::new().connect_http(url).erased(),
        ))
    });

    let estimator = FeeEstimator::new(
        source.clone(),
        destination,
        FeeEstimatorConfig {
            base_fee_overhead_percent: cli.fee_overhead_percent,
            priority_fee_overhead_percent: cli.fee_overhead_percent,
            ..Default::default()
        },
    );
    let pipeline = TransactionPipeline::new(source.clone(), estimator);
    let sender = RawTransactionSender::new(source.clone());
    let submitter = RetrySubmitter::new(
        pipeline,
        source,
        sender,
        SubmitterSettings {
            max_attempts: cli.max_attempts,
            confirmation_timeout: Duration::from_secs(cli.confirmation_timeout_seconds),
            ..Default::default()
        },
    );
    let runner = BatchRunner::new(submitter, Duration::from_secs(cli.delay_seconds));

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; finishing the current wallet before exiting");
            signal_cancel.cancel();
        }
    });

    info!(
        wallets = requests.len(),
        destination = %cli.destination,
        amount_wei = %amount,
        "starting batch"
    );
    let stats = runner.run(&requests, cancel).await;
    info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        success_rate = %format!("{:.1}%", stats.success_rate() * 100.0),
        "final statistics"
    );
    Ok(())
}
