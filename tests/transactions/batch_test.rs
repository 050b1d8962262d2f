use alloy::primitives::U256;

use crate::common::*;
use wallet_shared::services::gas::FeesPerGas;
use wallet_shared::services::transactions::{
    get_estimated_gas_fee, get_max_gas_fee, try_estimate_transactions, PrepareError,
};

fn fees() -> FeesPerGas {
    FeesPerGas {
        max_fee_per_gas: U256::from(456u64),
        max_priority_fee_per_gas: Some(U256::from(2u64)),
        base_fee_per_gas: U256::from(200u64),
    }
}

#[tokio::test]
async fn test_native_fee_currency_omits_fee_currency_field() {
    let estimator = StubEstimator::fixed(123);

    let transactions = try_estimate_transactions(&estimator, &[base_tx()], &fee1(), &fees(), 50_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(transactions.len(), 1);
    let tx = &transactions[0];
    assert_eq!(tx.gas, 123);
    assert_eq!(tx.fee_currency, None);
    assert_eq!(tx.max_fee_per_gas, U256::from(456u64));
    assert_eq!(tx.base_fee_per_gas, U256::from(200u64));

    let json = serde_json::to_value(tx).unwrap();
    assert!(json.get("feeCurrency").is_none());
    assert_eq!(estimator.fee_currencies_seen(), vec![None]);
}

#[tokio::test]
async fn test_non_native_fee_currency_sets_field_and_pads_last() {
    let estimator = StubEstimator::fixed(123);
    let batch = vec![base_tx(), base_tx(), base_tx_with_gas(1_000, Some(700))];

    let transactions = try_estimate_transactions(&estimator, &batch, &fee2(), &fees(), 50_000)
        .await
        .unwrap()
        .unwrap();

    let gas: Vec<u64> = transactions.iter().map(|tx| tx.gas).collect();
    assert_eq!(gas, vec![123, 123, 51_000]);
    assert_eq!(transactions[2].estimated_gas_use, Some(50_700));
    assert!(transactions.iter().all(|tx| tx.fee_currency == Some(fee2_address())));

    // Only transactions without a gas value are estimated, with the fee currency set
    assert_eq!(estimator.fee_currencies_seen(), vec![Some(fee2_address()); 2]);
}

#[tokio::test]
async fn test_padding_amount_is_configurable() {
    let estimator = StubEstimator::fixed(21_000);

    let transactions = try_estimate_transactions(&estimator, &[base_tx()], &fee2(), &fees(), 60_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(transactions[0].gas, 81_000);
}

#[tokio::test]
async fn test_estimation_passes_fees_to_node() {
    let estimator = StubEstimator::fixed(123);

    try_estimate_transactions(&estimator, &[base_tx()], &fee2(), &fees(), 50_000)
        .await
        .unwrap();

    let calls = estimator.calls.lock().unwrap();
    assert_eq!(calls[0].max_fee_per_gas, U256::from(456u64));
    assert_eq!(calls[0].max_priority_fee_per_gas, Some(U256::from(2u64)));
    assert_eq!(calls[0].to, base_tx().to);
    assert_eq!(calls[0].data, base_tx().data);
}

#[tokio::test]
async fn test_any_unviable_transaction_fails_whole_batch() {
    let estimator = StubEstimator::new(|request| match &request.data {
        Some(data) if data.len() > 2 => Err(node_error("insufficient funds for transfer", None)),
        _ => Ok(21_000),
    });
    let mut second = base_tx();
    second.data = Some(vec![0x01, 0x02, 0x03].into());

    let result = try_estimate_transactions(&estimator, &[base_tx(), second], &fee1(), &fees(), 50_000)
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_non_viability_error_propagates() {
    let estimator = StubEstimator::failing("execution reverted: Ownable: caller is not the owner", None);

    let result = try_estimate_transactions(&estimator, &[base_tx()], &fee1(), &fees(), 50_000).await;

    assert!(matches!(result, Err(PrepareError::Rpc(_))));
}

#[tokio::test]
async fn test_fee_currency_without_address_is_rejected() {
    let estimator = StubEstimator::fixed(123);
    let token = spend_token();

    let result = try_estimate_transactions(&estimator, &[base_tx()], &token, &fees(), 50_000).await;

    assert!(matches!(result, Err(PrepareError::FeeCurrency(_))));
    assert_eq!(estimator.call_count(), 0);
}

#[tokio::test]
async fn test_gas_fees_of_estimated_batch() {
    let estimator = StubEstimator::fixed(500);
    let fees = FeesPerGas {
        max_fee_per_gas: U256::from(1u64),
        max_priority_fee_per_gas: Some(U256::from(2u64)),
        base_fee_per_gas: U256::from(1u64),
    };
    let batch = vec![base_tx(), base_tx_with_gas(100, Some(50))];

    let transactions = try_estimate_transactions(&estimator, &batch, &fee2(), &fees, 50_000)
        .await
        .unwrap()
        .unwrap();

    // 500 + 50_100 gas at 1 per gas
    assert_eq!(get_max_gas_fee(&transactions), U256::from(50_600u64));
    // 500 + 50_050 gas used at min(1 + 2, 1) per gas
    assert_eq!(get_estimated_gas_fee(&transactions), U256::from(50_550u64));
}
