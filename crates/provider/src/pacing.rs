use std::time::Duration;

/// Inter-message delay applied during sequential bulk dispatch.
///
/// Vendor rate limits are respected by spacing consecutive sends out rather
/// than by a retry queue. The default spacing is 100 ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Delay inserted between consecutive sends of a batch.
    pub delay: Duration,
}

impl Pacing {
    /// Fixed delay between consecutive sends.
    #[must_use]
    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay. For local providers and tests.
    #[must_use]
    pub fn none() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Whether bulk dispatch should sleep at all.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.delay.is_zero()
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(100),
        }
    }
}
