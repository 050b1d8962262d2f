use alloy::primitives::Address;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_shared::config::{rpc_config::get_rpc_config, Config};
use wallet_shared::services::metrics::{MetricsRegistry, PrepareMetricsCollector};
use wallet_shared::services::rpc::NetworkClients;
use wallet_shared::services::transactions::{TransactionPreparer, TransferRequest};
use wallet_shared::services::token::{to_base_units, TokenBalance};

/// Transfer described in the JSON file passed as first argument
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest {
    from: Address,
    to: Address,
    token: TokenBalance,
    /// Amount in whole token units
    amount: rust_decimal::Decimal,
    fee_currencies: Vec<TokenBalance>,
    comment: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_shared=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let path = std::env::args().nth(1).expect("Usage: wallet-shared <send-request.json>");
    let raw = std::fs::read_to_string(&path).expect("Failed to read send request");
    let request: SendRequest = serde_json::from_str(&raw).expect("Invalid send request");

    if let Err(e) = config.ensure_network(request.token.network_id) {
        tracing::error!("Rejected send request: {}", e);
        std::process::exit(1);
    }

    let endpoint = get_rpc_config(config.network, config.rpc_timeout).expect("No RPC endpoint for network");
    tracing::info!(
        network = %config.network,
        chain_id = endpoint.chain_id,
        url = %endpoint.url,
        "Using RPC endpoint"
    );
    let endpoints = HashMap::from([(config.network, endpoint)]);
    let clients = Arc::new(NetworkClients::from_config(&endpoints, config.base_fee_multiplier));

    let metrics = MetricsRegistry::new().expect("Failed to create metrics registry");
    let preparer = TransactionPreparer::from_clients(clients, &config)
        .with_metrics(PrepareMetricsCollector::new(metrics.clone()));

    let amount = to_base_units(request.amount, request.token.decimals).expect("Invalid amount");
    let transfer = TransferRequest {
        from: request.from,
        to: request.to,
        amount,
        fee_currencies: request.fee_currencies,
    };

    let result = if request.token.is_native {
        preparer.prepare_send_native_asset_transaction(transfer, request.token).await
    } else if let Some(comment) = request.comment.as_deref() {
        preparer
            .prepare_transfer_with_comment_transaction(transfer, request.token, Some(comment))
            .await
    } else {
        preparer.prepare_erc20_transfer_transaction(transfer, request.token).await
    };

    match result {
        Ok(prepared) => {
            let json = serde_json::to_string_pretty(&prepared).expect("Failed to serialize result");
            println!("{}", json);
        }
        Err(e) => {
            tracing::error!("Failed to prepare transactions: {}", e);
            std::process::exit(1);
        }
    }

    if let Ok(exported) = metrics.export() {
        tracing::debug!("{}", exported);
    }
}
