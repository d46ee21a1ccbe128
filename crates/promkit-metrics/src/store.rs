//! Name → handle table.
//!
//! Insert-if-absent is atomic per key: the shard lock of the `DashMap` entry
//! is held while the collector is built and registered, so concurrent first
//! use of one name creates exactly one collector. Reads of bound names only
//! take the shard read lock.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use promkit_core::{MetricKind, PromkitError, Result};

use crate::handles::MetricHandle;

#[derive(Default)]
pub struct MetricStore {
    map: DashMap<String, MetricHandle>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle bound to `name`, creating it with `create` if unbound.
    ///
    /// A name bound to another kind fails with `MetricKindConflict`; the
    /// existing binding is left untouched.
    pub fn get_or_try_insert_with<F>(
        &self,
        name: &str,
        kind: MetricKind,
        create: F,
    ) -> Result<MetricHandle>
    where
        F: FnOnce() -> Result<MetricHandle>,
    {
        if let Some(existing) = self.map.get(name) {
            return check_kind(name, existing.value(), kind);
        }

        match self.map.entry(name.to_owned()) {
            Entry::Occupied(e) => check_kind(name, e.get(), kind),
            Entry::Vacant(e) => {
                let handle = create()?;
                e.insert(handle.clone());
                Ok(handle)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<MetricHandle> {
        self.map.get(name).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Unbind every name, returning what was bound.
    pub fn drain(&self) -> Vec<(String, MetricHandle)> {
        let names: Vec<String> = self.map.iter().map(|r| r.key().clone()).collect();
        names
            .into_iter()
            .filter_map(|name| self.map.remove(&name))
            .collect()
    }
}

fn check_kind(name: &str, existing: &MetricHandle, requested: MetricKind) -> Result<MetricHandle> {
    let bound = existing.kind();
    if bound == requested {
        Ok(existing.clone())
    } else {
        Err(PromkitError::MetricKindConflict {
            name: name.to_owned(),
            existing: bound,
            requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter(name: &str) -> Result<MetricHandle> {
        MetricHandle::build(MetricKind::Counter, name, name)
            .map_err(|e| PromkitError::Backend(e.to_string()))
    }

    #[test]
    fn second_lookup_reuses_handle() {
        let store = MetricStore::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            store
                .get_or_try_insert_with("x", MetricKind::Counter, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    counter("x")
                })
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let store = MetricStore::new();
        store
            .get_or_try_insert_with("x", MetricKind::Counter, || counter("x"))
            .unwrap();
        let err = store
            .get_or_try_insert_with("x", MetricKind::Gauge, || panic!("must not build"))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            PromkitError::MetricKindConflict { ref name, existing: MetricKind::Counter, requested: MetricKind::Gauge } if name == "x"
        ));
        assert_eq!(store.get("x").unwrap().kind(), MetricKind::Counter);
    }

    #[test]
    fn failed_create_leaves_name_unbound() {
        let store = MetricStore::new();
        let res = store.get_or_try_insert_with("bad", MetricKind::Counter, || {
            Err(PromkitError::Backend("nope".into()))
        });
        assert!(res.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_first_use_creates_once() {
        let store = MetricStore::new();
        let calls = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    store
                        .get_or_try_insert_with("hot", MetricKind::Counter, || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            counter("hot")
                        })
                        .unwrap();
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drain_empties_store() {
        let store = MetricStore::new();
        for n in ["a", "b"] {
            store
                .get_or_try_insert_with(n, MetricKind::Counter, || counter(n))
                .unwrap();
        }
        let drained = store.drain();
        assert_eq!(drained.len(), 2);
        assert!(store.is_empty());
    }
}
