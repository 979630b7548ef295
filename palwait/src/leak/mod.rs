//! Allocation leak tracing for PAL handles.
//!
//! A diagnostic registry of live handle allocations keyed by the source
//! location that created them. It is an explicit object: the PAL creates
//! one at start-up, shares it through an `Arc`, and passes it to handle
//! constructors (see [`Handle::traced`](crate::Handle::traced)). Nothing on
//! the wait path touches it.
//!
//! Compiled in debug builds, or in release builds with the `leak-trace`
//! feature.

mod slab;

use slab::Slab;

use log::debug;
use parking_lot::Mutex;
use std::panic::Location;
use std::sync::Arc;

/// Source location an allocation is attributed to.
pub type CallSite = &'static Location<'static>;

/// Number of live allocations made from one call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocRecord {
    pub call_site: CallSite,
    pub count: usize,
}

/// Registry of live traced allocations.
pub struct AllocRegistry {
    entries: Mutex<Slab<CallSite>>,
}

impl AllocRegistry {
    /// Creates an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(Slab::new()),
        })
    }

    /// Registers an allocation made by the caller.
    ///
    /// The allocation stays live until the returned token is dropped.
    #[track_caller]
    pub fn track(self: &Arc<Self>) -> AllocToken {
        let call_site = Location::caller();
        let key = self.entries.lock().insert(call_site);

        AllocToken {
            registry: Arc::clone(self),
            key,
            call_site,
        }
    }

    /// Number of live traced allocations.
    pub fn live(&self) -> usize {
        self.entries.lock().len()
    }

    /// Summarizes live allocations by call site.
    ///
    /// At most `max` distinct call sites are reported; the walk stops at the
    /// first entry whose call site no longer fits. Returns `None` if the
    /// output buffer cannot be allocated.
    pub fn collect(&self, max: usize) -> Option<Vec<AllocRecord>> {
        let mut records: Vec<AllocRecord> = Vec::new();
        records.try_reserve_exact(max).ok()?;

        let entries = self.entries.lock();

        for &call_site in entries.iter() {
            if let Some(record) = records.iter_mut().find(|r| r.call_site == call_site) {
                record.count += 1;
                continue;
            }

            if records.len() == max {
                break;
            }

            records.push(AllocRecord {
                call_site,
                count: 1,
            });
        }

        drop(entries);

        debug!("collected {} allocation records", records.len());
        Some(records)
    }
}

/// Live registration of one allocation; unregisters on drop.
pub struct AllocToken {
    registry: Arc<AllocRegistry>,
    key: usize,
    call_site: CallSite,
}

impl AllocToken {
    /// Where the allocation was made.
    pub fn call_site(&self) -> CallSite {
        self.call_site
    }
}

impl Drop for AllocToken {
    fn drop(&mut self) {
        self.registry.entries.lock().remove(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_group_by_call_site() {
        let registry = AllocRegistry::new();

        let mut tokens = Vec::new();
        for _ in 0..3 {
            tokens.push(registry.track());
        }
        let other = registry.track();

        let records = registry.collect(8).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].count, 3);
        assert_eq!(records[1].count, 1);
        assert_eq!(records[1].call_site.line(), other.call_site().line());
    }

    #[test]
    fn test_dropped_tokens_are_released() {
        let registry = AllocRegistry::new();

        let token = registry.track();
        assert_eq!(registry.live(), 1);

        drop(token);
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.collect(4).unwrap(), Vec::new());
    }

    #[test]
    fn test_collect_caps_distinct_call_sites() {
        let registry = AllocRegistry::new();

        let _a = registry.track();
        let _b = registry.track();
        let _c = registry.track();

        let records = registry.collect(2).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.count == 1));
    }

    #[test]
    fn test_collect_with_zero_max() {
        let registry = AllocRegistry::new();
        let _a = registry.track();

        assert_eq!(registry.collect(0).unwrap(), Vec::new());
    }

    #[test]
    fn test_registry_is_shared_across_threads() {
        let registry = AllocRegistry::new();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.track())
            })
            .collect();

        let tokens: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.live(), 4);
        let records = registry.collect(4).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 4);

        drop(tokens);
        assert_eq!(registry.live(), 0);
    }
}
