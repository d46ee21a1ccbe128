use std::time::Instant;

/// Anything that can record an elapsed duration, in seconds.
pub trait Observe {
    fn observe_secs(&self, secs: f64);
}

/// Records the time between its creation and its drop on the target metric.
///
/// The duration is recorded on every exit path: normal scope end, early
/// return, `?` propagation, and panic unwind.
#[must_use = "the timer records when dropped; binding it to `_` stops it immediately"]
pub struct ScopedTimer<O: Observe> {
    target: O,
    start: Instant,
    recorded: bool,
}

impl<O: Observe> ScopedTimer<O> {
    pub(crate) fn start(target: O) -> Self {
        Self {
            target,
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Stop now and return the recorded duration in seconds.
    pub fn stop(mut self) -> f64 {
        self.record()
    }

    fn record(&mut self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if !self.recorded {
            self.recorded = true;
            self.target.observe_secs(secs);
        }
        secs
    }
}

impl<O: Observe> Drop for ScopedTimer<O> {
    fn drop(&mut self) {
        self.record();
    }
}
