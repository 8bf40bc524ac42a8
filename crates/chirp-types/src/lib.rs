//! Foundation types for chirp.
//!
//! Every other chirp crate depends on `chirp-types`. The records defined here
//! are stored whole by the tweet store and returned whole by every entry
//! point.
//!
//! # Key Types
//!
//! - [`Tweet`] — a user-authored post with its engagement state
//! - [`Comment`] — a reply attached to exactly one tweet
//! - [`TweetId`] / [`CommentId`] — textual identifiers, unique for the lifetime of the system
//! - [`Principal`] — textual identity of the caller of an entry point
//! - [`Timestamp`] — nanoseconds since the UNIX epoch

pub mod error;
pub mod id;
pub mod principal;
pub mod temporal;
pub mod tweet;

pub use error::TypeError;
pub use id::{CommentId, TweetId};
pub use principal::Principal;
pub use temporal::Timestamp;
pub use tweet::{Comment, CommentPayload, Tweet, TweetPayload};
