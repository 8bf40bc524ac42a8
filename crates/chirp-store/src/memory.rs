use std::collections::BTreeMap;
use std::sync::RwLock;

use chirp_types::{Tweet, TweetId};

use crate::error::StoreResult;
use crate::traits::TweetStore;

/// In-memory, `BTreeMap`-based tweet store.
///
/// Intended for tests and embedding. Records are held behind a `RwLock` and
/// cloned on read and write. Contents are lost when the store is dropped.
pub struct InMemoryTweetStore {
    tweets: RwLock<BTreeMap<TweetId, Tweet>>,
}

impl InMemoryTweetStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            tweets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Remove every record.
    pub fn clear(&self) -> StoreResult<()> {
        self.tweets.write()?.clear();
        Ok(())
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> StoreResult<Vec<TweetId>> {
        Ok(self.tweets.read()?.keys().cloned().collect())
    }
}

impl Default for InMemoryTweetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Tweet> for InMemoryTweetStore {
    fn from_iter<I: IntoIterator<Item = Tweet>>(iter: I) -> Self {
        let map = iter.into_iter().map(|t| (t.id.clone(), t)).collect();
        Self {
            tweets: RwLock::new(map),
        }
    }
}

impl TweetStore for InMemoryTweetStore {
    fn get(&self, id: &TweetId) -> StoreResult<Option<Tweet>> {
        Ok(self.tweets.read()?.get(id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<Tweet>> {
        Ok(self.tweets.read()?.values().cloned().collect())
    }

    fn put(&self, tweet: &Tweet) -> StoreResult<()> {
        self.tweets.write()?.insert(tweet.id.clone(), tweet.clone());
        Ok(())
    }

    fn remove(&self, id: &TweetId) -> StoreResult<Option<Tweet>> {
        Ok(self.tweets.write()?.remove(id))
    }

    fn contains(&self, id: &TweetId) -> StoreResult<bool> {
        Ok(self.tweets.read()?.contains_key(id))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.tweets.read()?.len())
    }
}

impl std::fmt::Debug for InMemoryTweetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.tweets.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("InMemoryTweetStore")
            .field("tweet_count", &count)
            .finish()
    }
}
