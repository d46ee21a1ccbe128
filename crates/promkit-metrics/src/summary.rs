//! Quantile summary collector.
//!
//! The `prometheus` crate ships counters, gauges and histograms but no
//! summary type, so this module provides one as a custom `Collector`.
//! Quantiles are computed over a sliding window of recent observations;
//! `_count` and `_sum` are cumulative for the collector's lifetime.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use prometheus::core::{Collector, Desc};
use prometheus::proto::{Metric, MetricFamily, MetricType, Quantile, Summary as SummaryProto};

/// Published quantiles (median up to 99.9th percentile).
pub const QUANTILES: [f64; 6] = [0.5, 0.75, 0.9, 0.95, 0.99, 0.999];

/// Observations older than this stop contributing to quantiles.
pub const MAX_AGE: Duration = Duration::from_secs(600);

/// Upper bound on retained observations; oldest are evicted first.
pub const MAX_SAMPLES: usize = 4096;

struct SummaryCore {
    count: u64,
    sum: f64,
    window: VecDeque<(Instant, f64)>,
}

impl SummaryCore {
    fn prune(&mut self, now: Instant) {
        while let Some((at, _)) = self.window.front() {
            if now.saturating_duration_since(*at) > MAX_AGE {
                self.window.pop_front();
            } else {
                break;
            }
        }
    }
}

/// A summary metric without labels. Clones share state.
#[derive(Clone)]
pub struct SummaryCollector {
    desc: Desc,
    core: Arc<Mutex<SummaryCore>>,
}

impl SummaryCollector {
    pub fn new(name: &str, help: &str) -> prometheus::Result<Self> {
        let desc = Desc::new(name.to_owned(), help.to_owned(), Vec::new(), HashMap::new())?;
        Ok(Self {
            desc,
            core: Arc::new(Mutex::new(SummaryCore {
                count: 0,
                sum: 0.0,
                window: VecDeque::new(),
            })),
        })
    }

    pub fn observe(&self, v: f64) {
        let now = Instant::now();
        let mut core = self.core.lock();
        core.count += 1;
        core.sum += v;
        core.prune(now);
        if core.window.len() == MAX_SAMPLES {
            core.window.pop_front();
        }
        core.window.push_back((now, v));
    }

    pub fn sample_count(&self) -> u64 {
        self.core.lock().count
    }

    pub fn sample_sum(&self) -> f64 {
        self.core.lock().sum
    }

    /// Current estimate for quantile `q`, or NaN when the window is empty.
    pub fn quantile(&self, q: f64) -> f64 {
        let sorted = self.sorted_window();
        rank(&sorted, q)
    }

    fn sorted_window(&self) -> Vec<f64> {
        let mut core = self.core.lock();
        core.prune(Instant::now());
        let mut values: Vec<f64> = core.window.iter().map(|(_, v)| *v).collect();
        drop(core);
        values.sort_by(f64::total_cmp);
        values
    }
}

// Nearest-rank quantile over sorted values.
fn rank(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = (q * sorted.len() as f64).ceil() as usize;
    sorted[idx.saturating_sub(1).min(sorted.len() - 1)]
}

impl Collector for SummaryCollector {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.desc]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let sorted = self.sorted_window();
        let (count, sum) = {
            let core = self.core.lock();
            (core.count, core.sum)
        };

        let mut summary = SummaryProto::default();
        summary.set_sample_count(count);
        summary.set_sample_sum(sum);
        for q in QUANTILES {
            let mut quantile = Quantile::default();
            quantile.set_quantile(q);
            quantile.set_value(rank(&sorted, q));
            summary.mut_quantile().push(quantile);
        }

        let mut metric = Metric::default();
        metric.set_summary(summary);

        let mut mf = MetricFamily::default();
        mf.set_name(self.desc.fq_name.clone());
        mf.set_help(self.desc.help.clone());
        mf.set_field_type(MetricType::SUMMARY);
        mf.mut_metric().push(metric);
        vec![mf]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_and_sum_are_cumulative() {
        let s = SummaryCollector::new("vals", "vals").unwrap();
        s.observe(1212.213412);
        s.observe(3434.34234);
        s.observe(3.1415926535875);
        assert_eq!(s.sample_count(), 3);
        assert!((s.sample_sum() - 4649.697344653588).abs() < 1e-9);
    }

    #[test]
    fn quantiles_use_nearest_rank() {
        let s = SummaryCollector::new("q", "q").unwrap();
        for v in 1..=100 {
            s.observe(v as f64);
        }
        assert_eq!(s.quantile(0.5), 50.0);
        assert_eq!(s.quantile(0.9), 90.0);
        assert_eq!(s.quantile(0.999), 100.0);
    }

    #[test]
    fn empty_window_reports_nan() {
        let s = SummaryCollector::new("empty", "empty").unwrap();
        assert!(s.quantile(0.5).is_nan());
    }

    #[test]
    fn window_is_bounded() {
        let s = SummaryCollector::new("bounded", "bounded").unwrap();
        for v in 0..(MAX_SAMPLES + 10) {
            s.observe(v as f64);
        }
        assert_eq!(s.sorted_window().len(), MAX_SAMPLES);
        assert_eq!(s.sample_count(), (MAX_SAMPLES + 10) as u64);
    }

    #[test]
    fn collect_emits_one_summary_family() {
        let s = SummaryCollector::new("lat", "Latency").unwrap();
        s.observe(0.25);
        let mfs = s.collect();
        assert_eq!(mfs.len(), 1);
        assert_eq!(mfs[0].get_name(), "lat");
        assert_eq!(mfs[0].get_help(), "Latency");
        assert_eq!(mfs[0].get_field_type(), MetricType::SUMMARY);
        let summary = mfs[0].get_metric()[0].get_summary();
        assert_eq!(summary.get_sample_count(), 1);
        assert_eq!(summary.get_quantile().len(), QUANTILES.len());
    }
}
