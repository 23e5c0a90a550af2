//! Caller-owned holder for the most recent sweep report.
//!
//! The sweep engine keeps no state between sweeps. A front end that wants
//! to show the last result without sweeping again owns a `ReportCache` and
//! passes it in explicitly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::sweep::SweepReport;

#[derive(Debug, Default)]
pub struct ReportCache {
    last: Option<(Instant, Arc<SweepReport>)>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached report, returning a shared handle to it.
    pub fn store(&mut self, report: SweepReport) -> Arc<SweepReport> {
        let report = Arc::new(report);
        self.last = Some((Instant::now(), report.clone()));
        report
    }

    /// The most recent report, if any.
    pub fn latest(&self) -> Option<Arc<SweepReport>> {
        self.last.as_ref().map(|(_, report)| report.clone())
    }

    /// The most recent report, if it is younger than `max_age`.
    pub fn fresh(&self, max_age: Duration) -> Option<Arc<SweepReport>> {
        self.last
            .as_ref()
            .filter(|(stored_at, _)| stored_at.elapsed() <= max_age)
            .map(|(_, report)| report.clone())
    }

    /// Time since the report was stored.
    pub fn age(&self) -> Option<Duration> {
        self.last.as_ref().map(|(stored_at, _)| stored_at.elapsed())
    }

    /// Remove and return the cached report.
    pub fn take(&mut self) -> Option<Arc<SweepReport>> {
        self.last.take().map(|(_, report)| report)
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::DeviceTarget;
    use crate::sweep::DeviceSweepResult;

    fn report(name: &str) -> SweepReport {
        SweepReport::new(vec![DeviceSweepResult::connected(
            DeviceTarget::new(name),
            vec![],
        )])
    }

    #[test]
    fn test_empty_cache() {
        let cache = ReportCache::new();
        assert!(cache.latest().is_none());
        assert!(cache.age().is_none());
    }

    #[test]
    fn test_store_replaces() {
        let mut cache = ReportCache::new();
        cache.store(report("first"));
        cache.store(report("second"));
        assert!(cache.latest().unwrap().device("second").is_some());
    }

    #[test]
    fn test_fresh() {
        let mut cache = ReportCache::new();
        cache.store(report("a"));
        assert!(cache.fresh(Duration::from_secs(60)).is_some());
        assert!(cache.age().unwrap() < Duration::from_secs(60));
    }

    #[test]
    fn test_take_and_clear() {
        let mut cache = ReportCache::new();
        cache.store(report("a"));
        assert!(cache.take().is_some());
        assert!(cache.latest().is_none());

        cache.store(report("b"));
        cache.clear();
        assert!(cache.latest().is_none());
    }
}
