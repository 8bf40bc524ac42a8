use chirp_types::{Tweet, TweetId};

use crate::error::StoreResult;

/// Ordered key-value store of tweet records.
///
/// All implementations must satisfy these invariants:
/// - `put` replaces the full record stored under `tweet.id`.
/// - `list` returns records in ascending id order.
/// - A reader sees either the record before a `put` or the record after it,
///   never a mix.
/// - All I/O errors are propagated, never silently ignored.
pub trait TweetStore: Send + Sync {
    /// Read a tweet by id.
    ///
    /// Returns `Ok(None)` if no record has that id.
    fn get(&self, id: &TweetId) -> StoreResult<Option<Tweet>>;

    /// Every stored tweet, ascending by id.
    fn list(&self) -> StoreResult<Vec<Tweet>>;

    /// Insert a new record or replace the existing one with the same id.
    fn put(&self, tweet: &Tweet) -> StoreResult<()>;

    /// Delete a record and return it, or `Ok(None)` if it did not exist.
    fn remove(&self, id: &TweetId) -> StoreResult<Option<Tweet>>;

    /// Check whether a record exists.
    fn contains(&self, id: &TweetId) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Number of stored records.
    ///
    /// Default implementation lists every record. Backends override this.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
