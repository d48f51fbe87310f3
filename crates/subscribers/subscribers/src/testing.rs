use crate::error::SubscriberError;
use crate::store::SubscriberStore;

/// Run the full subscriber store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
/// The suite subscribes its own fixture addresses and runs in order, so the
/// store must start empty.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_store_conformance_tests(
    store: &dyn SubscriberStore,
) -> Result<(), SubscriberError> {
    test_empty_store(store).await?;
    test_unknown_address_updates(store).await?;
    test_subscribe_starts_unconfirmed(store).await?;
    test_confirm_makes_eligible(store).await?;
    test_unsubscribe_removes_from_eligible(store).await?;
    test_resubscribe_clears_unsubscribed_flag(store).await?;
    test_eligible_preserves_subscription_order(store).await?;
    test_active_count_ignores_confirmation(store).await?;
    Ok(())
}

async fn test_empty_store(store: &dyn SubscriberStore) -> Result<(), SubscriberError> {
    let eligible = store.eligible_addresses().await?;
    assert!(
        eligible.is_empty(),
        "a fresh store should have no eligible addresses"
    );
    assert_eq!(store.active_count().await?, 0);
    Ok(())
}

async fn test_unknown_address_updates(store: &dyn SubscriberStore) -> Result<(), SubscriberError> {
    let confirmed = store.confirm("ghost@example.com").await?;
    assert!(!confirmed, "confirm on an unknown address should return false");
    let removed = store.unsubscribe("ghost@example.com").await?;
    assert!(
        !removed,
        "unsubscribe on an unknown address should return false"
    );
    Ok(())
}

async fn test_subscribe_starts_unconfirmed(
    store: &dyn SubscriberStore,
) -> Result<(), SubscriberError> {
    store.subscribe("pending@example.com").await?;
    let eligible = store.eligible_addresses().await?;
    assert!(
        !eligible.contains(&"pending@example.com".to_string()),
        "an unconfirmed address should not be eligible"
    );
    Ok(())
}

async fn test_confirm_makes_eligible(store: &dyn SubscriberStore) -> Result<(), SubscriberError> {
    store.subscribe("reader@example.com").await?;
    let confirmed = store.confirm("reader@example.com").await?;
    assert!(confirmed, "confirm on a known address should return true");
    let eligible = store.eligible_addresses().await?;
    assert!(
        eligible.contains(&"reader@example.com".to_string()),
        "a confirmed address should be eligible"
    );
    Ok(())
}

async fn test_unsubscribe_removes_from_eligible(
    store: &dyn SubscriberStore,
) -> Result<(), SubscriberError> {
    store.subscribe("leaver@example.com").await?;
    store.confirm("leaver@example.com").await?;
    let removed = store.unsubscribe("leaver@example.com").await?;
    assert!(removed, "unsubscribe on a known address should return true");
    let eligible = store.eligible_addresses().await?;
    assert!(
        !eligible.contains(&"leaver@example.com".to_string()),
        "an unsubscribed address should not be eligible"
    );
    Ok(())
}

async fn test_resubscribe_clears_unsubscribed_flag(
    store: &dyn SubscriberStore,
) -> Result<(), SubscriberError> {
    store.subscribe("returner@example.com").await?;
    store.confirm("returner@example.com").await?;
    store.unsubscribe("returner@example.com").await?;
    store.subscribe("returner@example.com").await?;
    let eligible = store.eligible_addresses().await?;
    assert!(
        eligible.contains(&"returner@example.com".to_string()),
        "re-subscribing should clear the unsubscribed flag and keep confirmation"
    );
    Ok(())
}

async fn test_eligible_preserves_subscription_order(
    store: &dyn SubscriberStore,
) -> Result<(), SubscriberError> {
    for address in ["order-a@example.com", "order-b@example.com", "order-c@example.com"] {
        store.subscribe(address).await?;
        store.confirm(address).await?;
    }
    let eligible = store.eligible_addresses().await?;
    let positions: Vec<usize> = ["order-a@example.com", "order-b@example.com", "order-c@example.com"]
        .iter()
        .map(|address| {
            eligible
                .iter()
                .position(|e| e == address)
                .expect("subscribed address missing from eligible list")
        })
        .collect();
    assert!(
        positions[0] < positions[1] && positions[1] < positions[2],
        "eligible addresses should come back in subscription order"
    );
    Ok(())
}

async fn test_active_count_ignores_confirmation(
    store: &dyn SubscriberStore,
) -> Result<(), SubscriberError> {
    let before = store.active_count().await?;
    store.subscribe("counted-a@example.com").await?;
    store.subscribe("counted-b@example.com").await?;
    store.confirm("counted-a@example.com").await?;
    let after = store.active_count().await?;
    assert_eq!(
        after,
        before + 2,
        "active count should include unconfirmed addresses"
    );
    store.unsubscribe("counted-b@example.com").await?;
    let final_count = store.active_count().await?;
    assert_eq!(
        final_count,
        before + 1,
        "active count should exclude unsubscribed addresses"
    );
    Ok(())
}
