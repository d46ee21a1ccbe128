//! Deduplicating metric registry over a `prometheus::Registry`.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use promkit_core::naming::{normalize, qualify};
use promkit_core::{MetricKind, PromkitError, Result};
use prometheus::core::Collector;
use prometheus::{Encoder, TextEncoder};
use tracing::debug;

use crate::config::MetricsConfig;
use crate::handles::{Counter, ErrorCounter, Gauge, Histogram, MetricHandle, Summary};
use crate::store::MetricStore;

/// Typed, prefix-aware front end to a metrics backend.
///
/// Every metric name is normalized and prefixed before lookup; one name maps
/// to at most one collector of one kind for the life of the registry (or
/// until [`MetricRegistry::clear`]).
pub struct MetricRegistry {
    backend: prometheus::Registry,
    /// Normalized prefix, empty when none was configured.
    prefix: String,
    descriptions: RwLock<HashMap<String, String>>,
    store: MetricStore,
    // Replaced wholesale by `clear()`; otherwise initialized at most once.
    errors: RwLock<OnceCell<prometheus::CounterVec>>,
    custom: Mutex<Vec<Box<dyn Collector>>>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRegistry {
    /// Registry with no prefix over its own private backend registry.
    pub fn new() -> Self {
        Self::with_registry(prometheus::Registry::new(), "")
    }

    /// Registry over a shared backend registry; `prefix` is normalized.
    pub fn with_registry(backend: prometheus::Registry, prefix: &str) -> Self {
        Self {
            backend,
            prefix: normalize(prefix),
            descriptions: RwLock::new(HashMap::new()),
            store: MetricStore::new(),
            errors: RwLock::new(OnceCell::new()),
            custom: Mutex::new(Vec::new()),
        }
    }

    /// Registry configured from a loaded [`MetricsConfig`].
    pub fn from_config(backend: prometheus::Registry, cfg: &MetricsConfig) -> Self {
        let registry = Self::with_registry(backend, &cfg.prefix);
        registry.set_description_mappings(cfg.descriptions.clone());
        registry
    }

    /// Replace the description lookup table (keyed by raw metric name).
    pub fn set_description_mappings(&self, mappings: HashMap<String, String>) {
        *self.descriptions.write() = mappings;
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The backend registry, for exposition.
    pub fn registry(&self) -> &prometheus::Registry {
        &self.backend
    }

    /// Fully-qualified name for a raw metric name.
    pub fn full_name(&self, name: &str) -> String {
        qualify(&self.prefix, name)
    }

    pub fn counter(&self, name: &str) -> Result<Counter> {
        self.counter_with(name, None)
    }

    pub fn counter_with_desc(&self, name: &str, desc: &str) -> Result<Counter> {
        self.counter_with(name, Some(desc))
    }

    fn counter_with(&self, name: &str, desc: Option<&str>) -> Result<Counter> {
        match self.get_or_create(name, MetricKind::Counter, desc)? {
            MetricHandle::Counter(c) => Ok(c),
            other => Err(kind_conflict(self.full_name(name), other.kind(), MetricKind::Counter)),
        }
    }

    pub fn gauge(&self, name: &str) -> Result<Gauge> {
        self.gauge_with(name, None)
    }

    pub fn gauge_with_desc(&self, name: &str, desc: &str) -> Result<Gauge> {
        self.gauge_with(name, Some(desc))
    }

    fn gauge_with(&self, name: &str, desc: Option<&str>) -> Result<Gauge> {
        match self.get_or_create(name, MetricKind::Gauge, desc)? {
            MetricHandle::Gauge(g) => Ok(g),
            other => Err(kind_conflict(self.full_name(name), other.kind(), MetricKind::Gauge)),
        }
    }

    pub fn histogram(&self, name: &str) -> Result<Histogram> {
        self.histogram_with(name, None)
    }

    pub fn histogram_with_desc(&self, name: &str, desc: &str) -> Result<Histogram> {
        self.histogram_with(name, Some(desc))
    }

    fn histogram_with(&self, name: &str, desc: Option<&str>) -> Result<Histogram> {
        match self.get_or_create(name, MetricKind::Histogram, desc)? {
            MetricHandle::Histogram(h) => Ok(h),
            other => Err(kind_conflict(self.full_name(name), other.kind(), MetricKind::Histogram)),
        }
    }

    pub fn summary(&self, name: &str) -> Result<Summary> {
        self.summary_with(name, None)
    }

    pub fn summary_with_desc(&self, name: &str, desc: &str) -> Result<Summary> {
        self.summary_with(name, Some(desc))
    }

    fn summary_with(&self, name: &str, desc: Option<&str>) -> Result<Summary> {
        match self.get_or_create(name, MetricKind::Summary, desc)? {
            MetricHandle::Summary(s) => Ok(s),
            other => Err(kind_conflict(self.full_name(name), other.kind(), MetricKind::Summary)),
        }
    }

    /// Timers are summaries of elapsed seconds.
    pub fn timer(&self, name: &str) -> Result<Summary> {
        self.summary(name)
    }

    pub fn timer_with_desc(&self, name: &str, desc: &str) -> Result<Summary> {
        self.summary_with_desc(name, desc)
    }

    /// Count one error of `error_type` and return a view of its running total.
    pub fn error(&self, error_type: &str) -> Result<ErrorCounter> {
        self.error_with(error_type, None)
    }

    /// As [`MetricRegistry::error`]; `desc` only applies if this call
    /// creates the shared error counter.
    pub fn error_with_desc(&self, error_type: &str, desc: &str) -> Result<ErrorCounter> {
        self.error_with(error_type, Some(desc))
    }

    fn error_with(&self, error_type: &str, desc: Option<&str>) -> Result<ErrorCounter> {
        let slot = self.errors.read();
        let vec = slot.get_or_try_init(|| self.create_error_counter(desc))?;
        let series = vec
            .get_metric_with_label_values(&[error_type])
            .map_err(backend)?;
        series.inc();
        Ok(ErrorCounter::new(series))
    }

    fn create_error_counter(&self, desc: Option<&str>) -> Result<prometheus::CounterVec> {
        let name = if self.prefix.is_empty() {
            "errors".to_owned()
        } else {
            format!("{}_errors", self.prefix)
        };
        match self.bind(&name, &name, MetricKind::ErrorCounter, desc)? {
            MetricHandle::ErrorCounter(vec) => Ok(vec),
            other => Err(kind_conflict(name, other.kind(), MetricKind::ErrorCounter)),
        }
    }

    /// Forget every metric and unregister everything from the backend.
    ///
    /// A name reused afterwards starts from a fresh collector; the error
    /// counter is created again on the next `error()` call.
    pub fn clear(&self) {
        let mut errors = self.errors.write();
        for (name, handle) in self.store.drain() {
            self.unregister(&name, handle.collector());
        }
        *errors = OnceCell::new();
        drop(errors);

        for collector in self.custom.lock().drain(..) {
            self.unregister("custom", collector);
        }
    }

    /// Register a collector built outside the registry, as-is.
    pub fn register_custom_collector<C>(&self, collector: C) -> Result<()>
    where
        C: Collector + Clone + 'static,
    {
        self.backend
            .register(Box::new(collector.clone()))
            .map_err(backend)?;
        self.custom.lock().push(Box::new(collector));
        Ok(())
    }

    /// Render the backend registry in the Prometheus text format.
    pub fn gather_text(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.backend.gather(), &mut buf)
            .map_err(backend)?;
        String::from_utf8(buf).map_err(|e| PromkitError::Backend(format!("non-utf8 exposition: {e}")))
    }

    fn get_or_create(&self, name: &str, kind: MetricKind, desc: Option<&str>) -> Result<MetricHandle> {
        self.bind(&self.full_name(name), name, kind, desc)
    }

    // Bind `full_name` to a collector of `kind`, creating and registering it
    // on first use. `lookup_key` selects the description table entry.
    fn bind(
        &self,
        full_name: &str,
        lookup_key: &str,
        kind: MetricKind,
        desc: Option<&str>,
    ) -> Result<MetricHandle> {
        self.store.get_or_try_insert_with(full_name, kind, || {
            let help = self.describe(lookup_key, full_name, desc);
            let handle = MetricHandle::build(kind, full_name, &help).map_err(backend)?;
            self.register(full_name, &handle)?;
            debug!(metric = %full_name, kind = %kind, "metric created");
            Ok(handle)
        })
    }

    // Explicit description, else lookup by `key`, else the full name.
    fn describe(&self, key: &str, full_name: &str, desc: Option<&str>) -> String {
        if let Some(d) = desc.filter(|d| !d.is_empty()) {
            return d.to_owned();
        }
        self.descriptions
            .read()
            .get(key)
            .filter(|d| !d.is_empty())
            .cloned()
            .unwrap_or_else(|| full_name.to_owned())
    }

    fn register(&self, name: &str, handle: &MetricHandle) -> Result<()> {
        match self.backend.register(handle.collector()) {
            Ok(()) => Ok(()),
            Err(prometheus::Error::AlreadyReg) => {
                debug!(metric = %name, "collector already registered; reusing registration");
                Ok(())
            }
            Err(e) => Err(backend(e)),
        }
    }

    fn unregister(&self, name: &str, collector: Box<dyn Collector>) {
        if let Err(e) = self.backend.unregister(collector) {
            debug!(metric = %name, error = %e, "unregister skipped");
        }
    }
}

fn kind_conflict(name: String, existing: MetricKind, requested: MetricKind) -> PromkitError {
    PromkitError::MetricKindConflict {
        name,
        existing,
        requested,
    }
}

fn backend(e: prometheus::Error) -> PromkitError {
    PromkitError::Backend(e.to_string())
}
