//! Process-wide relay counters for `/status` and the heartbeat log.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use relay_core::DeliveryOutcome;

#[derive(Debug, Default)]
pub struct RelayStats {
    received: AtomicU64,
    not_relevant: AtomicU64,
    delivered: AtomicU64,
    fallback: AtomicU64,
    suppressed: AtomicU64,
    monitored_channels: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub received: u64,
    pub not_relevant: u64,
    pub delivered: u64,
    pub fallback: u64,
    pub suppressed: u64,
    pub monitored_channels: usize,
}

impl RelayStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, outcome: DeliveryOutcome) {
        let counter = match outcome {
            DeliveryOutcome::NotRelevant => &self.not_relevant,
            DeliveryOutcome::Delivered => &self.delivered,
            DeliveryOutcome::FallbackText => &self.fallback,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_monitored_channels(&self, count: usize) {
        self.monitored_channels.store(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            not_relevant: self.not_relevant.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            fallback: self.fallback.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            monitored_channels: self.monitored_channels.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channels={} received={} not_relevant={} delivered={} fallback={} suppressed={}",
            self.monitored_channels,
            self.received,
            self.not_relevant,
            self.delivered,
            self.fallback,
            self.suppressed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = RelayStats::new();
        stats.record_received();
        stats.record_received();
        stats.record_outcome(DeliveryOutcome::Delivered);
        stats.record_suppressed();
        stats.set_monitored_channels(5);
        let snap = stats.snapshot();
        assert_eq!(snap.received, 2);
        assert_eq!(snap.delivered, 1);
        assert_eq!(snap.suppressed, 1);
        assert_eq!(
            snap.to_string(),
            "channels=5 received=2 not_relevant=0 delivered=1 fallback=0 suppressed=1"
        );
    }
}
