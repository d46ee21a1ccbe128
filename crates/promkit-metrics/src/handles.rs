//! Typed metric handles.
//!
//! Each handle is a cheap clone around one backend collector; every clone
//! observes and mutates the same series. Handles are safe to share across
//! threads.

use promkit_core::MetricKind;
use prometheus::core::Collector;
use tracing::warn;

use crate::summary::SummaryCollector;
use crate::timer::{Observe, ScopedTimer};

/// Monotonic counter.
#[derive(Clone)]
pub struct Counter {
    inner: prometheus::Counter,
}

impl Counter {
    /// Increment by 1.
    pub fn increment(&self) {
        self.inner.inc();
    }

    /// Increment by `amount`. Negative amounts are ignored.
    pub fn increment_by(&self, amount: f64) {
        if amount < 0.0 {
            warn!(amount, "counter cannot decrease; increment ignored");
            return;
        }
        self.inner.inc_by(amount);
    }

    pub fn get(&self) -> f64 {
        self.inner.get()
    }
}

/// Gauge that can go up and down.
#[derive(Clone)]
pub struct Gauge {
    inner: prometheus::Gauge,
}

impl Gauge {
    pub fn increment(&self) {
        self.inner.inc();
    }
    pub fn increment_by(&self, amount: f64) {
        self.inner.add(amount);
    }
    pub fn decrement(&self) {
        self.inner.dec();
    }
    pub fn decrement_by(&self, amount: f64) {
        self.inner.sub(amount);
    }
    pub fn get(&self) -> f64 {
        self.inner.get()
    }
}

/// Histogram with the backend's default buckets (5ms .. 10s).
#[derive(Clone)]
pub struct Histogram {
    inner: prometheus::Histogram,
}

impl Histogram {
    pub fn observe(&self, value: f64) -> &Self {
        self.inner.observe(value);
        self
    }

    /// Alias of [`Histogram::observe`].
    pub fn update(&self, value: f64) -> &Self {
        self.observe(value)
    }

    /// Start a timer that observes its elapsed seconds when dropped.
    pub fn time(&self) -> ScopedTimer<Histogram> {
        ScopedTimer::start(self.clone())
    }

    pub fn sample_count(&self) -> u64 {
        self.inner.get_sample_count()
    }

    pub fn sample_sum(&self) -> f64 {
        self.inner.get_sample_sum()
    }
}

impl Observe for Histogram {
    fn observe_secs(&self, secs: f64) {
        self.inner.observe(secs);
    }
}

/// Quantile summary; also what `timer()` hands out.
#[derive(Clone)]
pub struct Summary {
    inner: SummaryCollector,
}

impl Summary {
    pub fn observe(&self, value: f64) -> &Self {
        self.inner.observe(value);
        self
    }

    /// Alias of [`Summary::observe`].
    pub fn update(&self, value: f64) -> &Self {
        self.observe(value)
    }

    /// Start a timer that observes its elapsed seconds when dropped.
    pub fn time(&self) -> ScopedTimer<Summary> {
        ScopedTimer::start(self.clone())
    }

    pub fn sample_count(&self) -> u64 {
        self.inner.sample_count()
    }

    pub fn sample_sum(&self) -> f64 {
        self.inner.sample_sum()
    }

    pub fn quantile(&self, q: f64) -> f64 {
        self.inner.quantile(q)
    }
}

impl Observe for Summary {
    fn observe_secs(&self, secs: f64) {
        self.inner.observe(secs);
    }
}

/// Read-only view over one `error_type` series of the registry error counter.
#[derive(Clone)]
pub struct ErrorCounter {
    series: prometheus::Counter,
}

impl ErrorCounter {
    pub(crate) fn new(series: prometheus::Counter) -> Self {
        Self { series }
    }

    /// Cumulative count for this error type.
    pub fn count(&self) -> f64 {
        self.series.get()
    }
}

/// Label carrying the error type on the registry error counter.
pub const ERROR_TYPE_LABEL: &str = "error_type";

/// One bound entry of the metric store.
#[derive(Clone)]
pub enum MetricHandle {
    Counter(Counter),
    Gauge(Gauge),
    Histogram(Histogram),
    Summary(Summary),
    ErrorCounter(prometheus::CounterVec),
}

impl MetricHandle {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricHandle::Counter(_) => MetricKind::Counter,
            MetricHandle::Gauge(_) => MetricKind::Gauge,
            MetricHandle::Histogram(_) => MetricKind::Histogram,
            MetricHandle::Summary(_) => MetricKind::Summary,
            MetricHandle::ErrorCounter(_) => MetricKind::ErrorCounter,
        }
    }

    /// Build an unregistered collector of `kind`.
    pub(crate) fn build(kind: MetricKind, name: &str, help: &str) -> prometheus::Result<Self> {
        let opts = || prometheus::Opts::new(name, help);
        Ok(match kind {
            MetricKind::Counter => MetricHandle::Counter(Counter {
                inner: prometheus::Counter::with_opts(opts())?,
            }),
            MetricKind::Gauge => MetricHandle::Gauge(Gauge {
                inner: prometheus::Gauge::with_opts(opts())?,
            }),
            MetricKind::Histogram => MetricHandle::Histogram(Histogram {
                inner: prometheus::Histogram::with_opts(prometheus::HistogramOpts::new(name, help))?,
            }),
            MetricKind::Summary => MetricHandle::Summary(Summary {
                inner: SummaryCollector::new(name, help)?,
            }),
            MetricKind::ErrorCounter => {
                MetricHandle::ErrorCounter(prometheus::CounterVec::new(opts(), &[ERROR_TYPE_LABEL])?)
            }
        })
    }

    /// A boxed clone of the backend collector, for (un)registration.
    pub(crate) fn collector(&self) -> Box<dyn Collector> {
        match self {
            MetricHandle::Counter(c) => Box::new(c.inner.clone()),
            MetricHandle::Gauge(g) => Box::new(g.inner.clone()),
            MetricHandle::Histogram(h) => Box::new(h.inner.clone()),
            MetricHandle::Summary(s) => Box::new(s.inner.clone()),
            MetricHandle::ErrorCounter(v) => Box::new(v.clone()),
        }
    }
}
