//! Integration tests against a live SecurityCouncil.

use crate::setup::{load_test_config, setup_provider};
use alloy_provider::Provider;
use council::CouncilStateProvider;
use kromactl::lookback_range;


#[tokio::test]
#[ignore = "requires a live L1 endpoint and council address"]
async fn test_pending_transactions() {
    let config = load_test_config();
    let provider = setup_provider(&config.l1_rpc_url);
    let state = CouncilStateProvider::new(provider.clone(), config.security_council);

    let latest = provider.get_block_number().await.unwrap();
    let (from, to) = lookback_range(latest, config.lookback_blocks);

    let quorum = state.quorum().await.unwrap();
    let pending = state.pending_transactions(from, to).await.unwrap();
    println!("{} pending council transactions, quorum {}", pending.len(), quorum);

    for tx in pending {
        assert!(!tx.executed);
        assert!(tx.exists());
    }
}

#[tokio::test]
#[ignore = "requires a live L1 endpoint and council address"]
async fn test_requests_are_ordered() {
    let config = load_test_config();
    let provider = setup_provider(&config.l1_rpc_url);
    let state = CouncilStateProvider::new(provider.clone(), config.security_council);

    let latest = provider.get_block_number().await.unwrap();
    let (from, to) = lookback_range(latest, config.lookback_blocks);

    let requests = state.requests(from, to).await.unwrap();
    for pair in requests.windows(2) {
        assert!(pair[0].block_number() <= pair[1].block_number());
    }
}
