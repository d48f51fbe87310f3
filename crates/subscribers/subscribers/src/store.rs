use async_trait::async_trait;

use crate::error::SubscriberError;

/// Backend-agnostic storage for newsletter subscribers.
///
/// An address moves through a small lifecycle: it is inserted unconfirmed,
/// becomes eligible for delivery once confirmed, and drops out of delivery
/// when unsubscribed. Re-subscribing a previously unsubscribed address
/// clears the unsubscribed flag but never resets confirmation.
///
/// Implementations must be safe to share across tasks.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Add an address to the store.
    ///
    /// New addresses start unconfirmed. If the address already exists, only
    /// its unsubscribed flag is cleared; confirmation state is preserved.
    async fn subscribe(&self, address: &str) -> Result<(), SubscriberError>;

    /// Mark an address as confirmed.
    ///
    /// Returns `false` when the address is not in the store.
    async fn confirm(&self, address: &str) -> Result<bool, SubscriberError>;

    /// Mark an address as unsubscribed.
    ///
    /// Returns `false` when the address is not in the store.
    async fn unsubscribe(&self, address: &str) -> Result<bool, SubscriberError>;

    /// List every address that is confirmed and not unsubscribed, in
    /// subscription order.
    ///
    /// This is the recipient list for a newsletter issue.
    async fn eligible_addresses(&self) -> Result<Vec<String>, SubscriberError>;

    /// Count addresses that have not unsubscribed, confirmed or not.
    async fn active_count(&self) -> Result<u64, SubscriberError>;
}
