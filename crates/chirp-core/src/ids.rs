use std::sync::atomic::{AtomicU64, Ordering};

/// Generator of tweet and comment identifiers.
///
/// Implementations must never return the same value twice over the lifetime
/// of a store, including values whose record has since been deleted.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random version-4 UUIDs in hyphenated text form.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidV4Ids;

impl IdGenerator for UuidV4Ids {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-000001`, `prefix-000002`, ... for tests.
///
/// Zero padding keeps lexicographic store order equal to generation order
/// for the first million ids.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n:06}", self.prefix)
    }
}
