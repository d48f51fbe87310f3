use async_trait::async_trait;
use hermod_subscribers::{SubscriberError, SubscriberStore};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    address: String,
    confirmed: bool,
    unsubscribed: bool,
}

/// In-memory subscriber store backed by a `Vec` under an async lock.
///
/// Entries keep their insertion order, which gives `eligible_addresses`
/// its subscription ordering for free. Nothing is persisted; this backend
/// is for development and tests.
#[derive(Debug, Default)]
pub struct MemorySubscriberStore {
    entries: RwLock<Vec<Entry>>,
}

impl MemorySubscriberStore {
    /// Create a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriberStore for MemorySubscriberStore {
    async fn subscribe(&self, address: &str) -> Result<(), SubscriberError> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.address == address) {
            entry.unsubscribed = false;
        } else {
            entries.push(Entry {
                address: address.to_string(),
                confirmed: false,
                unsubscribed: false,
            });
        }
        Ok(())
    }

    async fn confirm(&self, address: &str) -> Result<bool, SubscriberError> {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.address == address) {
            Some(entry) => {
                entry.confirmed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn unsubscribe(&self, address: &str) -> Result<bool, SubscriberError> {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.address == address) {
            Some(entry) => {
                entry.unsubscribed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn eligible_addresses(&self) -> Result<Vec<String>, SubscriberError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.confirmed && !e.unsubscribed)
            .map(|e| e.address.clone())
            .collect())
    }

    async fn active_count(&self) -> Result<u64, SubscriberError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|e| !e.unsubscribed).count() as u64)
    }
}
