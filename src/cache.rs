//! Cache module: keeps the last parsed filter so per-row matching does not reparse.
//!
//! The cache is keyed by a 64-bit FNV-1a hash of the raw filter string, not the
//! string itself. Two different strings with the same hash would reuse the wrong
//! tree; the probability is accepted and nothing guards against it.

use crate::filter::CompiledFilter;
use crate::schema::FieldRegistry;
use fnv::FnvHasher;
use parking_lot::RwLock;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct CachedFilter<R> {
    hash: u64,
    filter: Arc<CompiledFilter<R>>,
}

pub struct FilterCache<R> {
    registry: Arc<FieldRegistry<R>>,
    current: RwLock<Option<CachedFilter<R>>>,
}

impl<R> FilterCache<R> {
    pub fn new(registry: Arc<FieldRegistry<R>>) -> Self {
        Self { registry, current: RwLock::new(None) }
    }

    /// The filter for `input`, parsed only when `input` differs from the last call.
    ///
    /// Callers holding a previously returned filter keep using it unchanged; a new
    /// string swaps in a fresh tree rather than touching the old one.
    pub fn get(&self, input: &str) -> Arc<CompiledFilter<R>> {
        let hash = hash_filter(input);
        if let Some(cached) = self.current.read().as_ref() {
            if cached.hash == hash {
                return Arc::clone(&cached.filter);
            }
        }

        let filter = Arc::new(CompiledFilter::new(input, Arc::clone(&self.registry)));
        let mut current = self.current.write();
        // Another writer may have parsed the same string while we were.
        if let Some(cached) = current.as_ref() {
            if cached.hash == hash {
                return Arc::clone(&cached.filter);
            }
        }
        log::debug!("filter changed, replacing cached tree");
        *current = Some(CachedFilter { hash, filter: Arc::clone(&filter) });
        filter
    }

    /// Match one record against `input`, reusing the cached tree when possible.
    pub fn matches(&self, input: &str, record: &R) -> bool {
        self.get(input).matches(record)
    }

    pub fn clear(&self) {
        *self.current.write() = None;
    }

    pub fn is_cached(&self, input: &str) -> bool {
        let hash = hash_filter(input);
        self.current.read().as_ref().is_some_and(|c| c.hash == hash)
    }

    pub fn registry(&self) -> &Arc<FieldRegistry<R>> {
        &self.registry
    }
}

fn hash_filter(input: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    input.hash(&mut hasher);
    hasher.finish()
}
