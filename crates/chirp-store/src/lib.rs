//! Tweet storage for chirp.
//!
//! The store is an ordered map from [`TweetId`](chirp_types::TweetId) to a
//! whole [`Tweet`](chirp_types::Tweet) record. It knows nothing about likes,
//! comments or ownership: callers load a record, change it, and put the whole
//! record back.
//!
//! # Storage Backends
//!
//! All backends implement the [`TweetStore`] trait:
//!
//! - [`InMemoryTweetStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FileTweetStore`] -- the same map, snapshotted to a file after every write
//!
//! # Design Rules
//!
//! 1. Records are stored and returned whole; there are no partial updates.
//! 2. Iteration order is ascending by id, never creation order.
//! 3. A failed write leaves the previous contents visible.
//! 4. There are no secondary indexes.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileTweetStore;
pub use memory::InMemoryTweetStore;
pub use traits::TweetStore;
