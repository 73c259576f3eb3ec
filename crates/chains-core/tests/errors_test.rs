use chains_core::errors::*;

#[test]
fn already_in_chain_carries_both_ids() {
    let err = ChainsError::AlreadyInChain {
        venue_id: "v-1".into(),
        chain_id: "c-9".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("v-1"));
    assert!(msg.contains("c-9"));
}

#[test]
fn ambiguous_match_lists_candidates() {
    let err = ChainsError::AmbiguousChainMatch {
        venue_id: "v".into(),
        candidates: vec!["c1".into(), "c2".into()],
    };
    let msg = err.to_string();
    assert!(msg.contains("2 candidates"));
    assert!(msg.contains("c1, c2"));
}

#[test]
fn store_error_converts_to_chains_error() {
    let err: ChainsError = StoreError::Backend {
        message: "disk full".into(),
    }
    .into();
    assert!(matches!(err, ChainsError::StoreError(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn only_connection_loss_is_fatal() {
    let lost: ChainsError = StoreError::ConnectionLost {
        details: "socket closed".into(),
    }
    .into();
    assert!(!lost.is_recoverable());

    let unavailable: ChainsError = SourceError::Unavailable {
        reason: "timeout".into(),
    }
    .into();
    assert!(unavailable.is_recoverable());

    assert!(ChainsError::ChainNotFound {
        chain_id: "gone".into()
    }
    .is_recoverable());
}
