//! Read-through, compute-once cache for signed image URLs.
//!
//! Concurrent lookups of the same key share one in-flight computation. Entries
//! never expire for the lifetime of the cache; failed computations are evicted
//! so the next lookup retries.

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};

type PendingUrl = Shared<BoxFuture<'static, Option<String>>>;

#[derive(Default)]
pub struct SignedUrlCache {
    entries: DashMap<String, PendingUrl>,
}

impl SignedUrlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached URL for `key`, running `factory` only if no computation
    /// for `key` is resolved or in flight.
    pub async fn get_or_compute<F>(&self, key: &str, factory: F) -> Option<String>
    where
        F: FnOnce() -> BoxFuture<'static, Option<String>>,
    {
        let pending = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| factory().shared())
            .value()
            .clone();

        let resolved = pending.await;
        if resolved.is_none() {
            self.entries
                .remove_if(key, |_, p| matches!(p.peek(), Some(None)));
        }
        resolved
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
