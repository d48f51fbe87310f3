use async_trait::async_trait;
use hermod_core::{BulkReport, Email, SendOutcome};

use crate::pacing::Pacing;

/// Strongly-typed delivery provider trait with native `async fn`.
///
/// This trait is **not** object-safe because it uses native `async fn` methods
/// (which desugar to opaque `impl Future` return types). If you need dynamic
/// dispatch, use [`DynProvider`] instead -- every `Provider` automatically
/// implements `DynProvider` via a blanket implementation.
///
/// Delivery failure never crosses this boundary as an error: [`send`](Self::send)
/// returns a [`SendOutcome`] value either way, so one bad message cannot abort
/// a batch or bubble a transport fault into the caller.
pub trait Provider: Send + Sync {
    /// Returns the unique name of this provider.
    fn name(&self) -> &str;

    /// Deliver a single message, reporting the result as data.
    fn send(&self, email: &Email) -> impl std::future::Future<Output = SendOutcome> + Send;

    /// Spacing applied between consecutive sends of a batch.
    ///
    /// Defaults to [`Pacing::default`] (100 ms). Providers without an
    /// external rate limit should override this to [`Pacing::none`].
    fn pacing(&self) -> Pacing {
        Pacing::default()
    }

    /// Deliver a batch sequentially, in input order.
    ///
    /// The default implementation sends one message at a time, sleeping
    /// [`pacing`](Self::pacing) between consecutive sends (never before the
    /// first), and records each outcome independently. A failed message does
    /// not stop the rest of the batch.
    fn send_bulk(&self, emails: &[Email]) -> impl std::future::Future<Output = BulkReport> + Send {
        async move {
            let delay = self.pacing().delay;
            let mut results = Vec::with_capacity(emails.len());
            for (index, email) in emails.iter().enumerate() {
                if index > 0 && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                results.push(self.send(email).await);
            }
            BulkReport::from_results(results)
        }
    }

    /// Best-effort check that the provider is reachable and its credential
    /// accepted. Every failure mode collapses to `false`.
    fn verify(&self) -> impl std::future::Future<Output = bool> + Send;
}

/// Object-safe provider trait for use behind `Box<dyn DynProvider>`.
///
/// Uses [`macro@async_trait`] to enable dynamic dispatch of async methods.
/// You generally should not implement this trait directly -- instead implement
/// [`Provider`] and rely on the blanket implementation.
#[async_trait]
pub trait DynProvider: Send + Sync {
    /// Returns the unique name of this provider.
    fn name(&self) -> &str;

    /// Deliver a single message, reporting the result as data.
    async fn send(&self, email: &Email) -> SendOutcome;

    /// Spacing applied between consecutive sends of a batch.
    fn pacing(&self) -> Pacing {
        Pacing::default()
    }

    /// Deliver a batch sequentially, in input order.
    async fn send_bulk(&self, emails: &[Email]) -> BulkReport;

    /// Best-effort reachability check.
    async fn verify(&self) -> bool;
}

/// Blanket implementation: any type that implements [`Provider`] also
/// implements [`DynProvider`], bridging the static and dynamic dispatch worlds.
#[async_trait]
impl<T: Provider + Sync> DynProvider for T {
    fn name(&self) -> &str {
        Provider::name(self)
    }

    async fn send(&self, email: &Email) -> SendOutcome {
        Provider::send(self, email).await
    }

    fn pacing(&self) -> Pacing {
        Provider::pacing(self)
    }

    async fn send_bulk(&self, emails: &[Email]) -> BulkReport {
        Provider::send_bulk(self, emails).await
    }

    async fn verify(&self) -> bool {
        Provider::verify(self).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    /// A mock provider for testing the trait and blanket impl.
    struct MockProvider {
        provider_name: String,
        reject_address: Option<String>,
        pacing: Pacing,
    }

    impl MockProvider {
        fn new(name: &str) -> Self {
            Self {
                provider_name: name.to_owned(),
                reject_address: None,
                pacing: Pacing::none(),
            }
        }

        fn rejecting(mut self, address: &str) -> Self {
            self.reject_address = Some(address.to_owned());
            self
        }

        fn paced(mut self, pacing: Pacing) -> Self {
            self.pacing = pacing;
            self
        }
    }

    impl Provider for MockProvider {
        fn name(&self) -> &str {
            &self.provider_name
        }

        async fn send(&self, email: &Email) -> SendOutcome {
            let rejected = self
                .reject_address
                .as_ref()
                .is_some_and(|address| email.to.iter().any(|to| to == address));
            if rejected {
                SendOutcome::failed("rejected by mock")
            } else {
                SendOutcome::sent(format!("mock-{}", email.subject))
            }
        }

        fn pacing(&self) -> Pacing {
            self.pacing
        }

        async fn verify(&self) -> bool {
            true
        }
    }

    fn batch_of(recipients: &[&str]) -> Vec<Email> {
        recipients
            .iter()
            .enumerate()
            .map(|(i, to)| Email::new(*to, format!("subject-{i}")))
            .collect()
    }

    #[tokio::test]
    async fn provider_send_reports_success() {
        let provider = MockProvider::new("mock");
        let outcome = Provider::send(&provider, &Email::new("a@example.com", "hi")).await;
        assert!(outcome.is_sent());
        assert_eq!(outcome.message_id(), Some("mock-hi"));
    }

    #[tokio::test]
    async fn blanket_dyn_provider_impl() {
        let provider: Arc<dyn DynProvider> = Arc::new(MockProvider::new("dyn-mock"));
        assert_eq!(provider.name(), "dyn-mock");

        let outcome = provider.send(&Email::new("a@example.com", "hi")).await;
        assert!(outcome.is_sent());
        assert!(provider.verify().await);
    }

    #[tokio::test]
    async fn bulk_dispatch_preserves_order_and_isolates_failures() {
        let provider = MockProvider::new("mock").rejecting("b@example.com");
        let emails = batch_of(&["a@example.com", "b@example.com", "c@example.com"]);

        let report = Provider::send_bulk(&provider, &emails).await;
        assert_eq!(report.total, 3);
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.results[0].message_id(), Some("mock-subject-0"));
        assert_eq!(report.results[1].error(), Some("rejected by mock"));
        assert_eq!(report.results[2].message_id(), Some("mock-subject-2"));
    }

    #[tokio::test]
    async fn bulk_dispatch_of_empty_batch_is_zeroed() {
        let provider = MockProvider::new("mock");
        let report = Provider::send_bulk(&provider, &[]).await;
        assert_eq!(report.total, 0);
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 0);
        assert!(report.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn bulk_dispatch_sleeps_between_sends_only() {
        let provider = MockProvider::new("mock").paced(Pacing::default());
        let emails = batch_of(&["a@example.com", "b@example.com", "c@example.com"]);

        let started = tokio::time::Instant::now();
        let report = Provider::send_bulk(&provider, &emails).await;
        assert_eq!(report.sent, 3);
        // Two gaps for three messages; no sleep before the first or after
        // the last.
        assert_eq!(started.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn single_message_bulk_has_no_delay() {
        let provider = MockProvider::new("mock").paced(Pacing::default());
        let emails = batch_of(&["a@example.com"]);

        let started = tokio::time::Instant::now();
        let report = Provider::send_bulk(&provider, &emails).await;
        assert_eq!(report.sent, 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
