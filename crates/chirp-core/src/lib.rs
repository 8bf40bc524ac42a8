//! Tweet, comment, like and retweet entry points for chirp.
//!
//! [`Timeline`] wraps a [`TweetStore`](chirp_store::TweetStore) and exposes
//! the ten entry points. Queries (`get_tweet`, `get_all_tweets`) read the
//! store; updates load a whole record, build its replacement and store it
//! under a single writer lock.
//!
//! Caller identity and time arrive in a [`CallContext`] on every update;
//! identifiers come from an injected [`IdGenerator`]. Ownership checks, like
//! tracking and content validation are independent switches in
//! [`TimelineConfig`].
//!
//! # Example
//!
//! ```
//! use chirp_core::{CallContext, Timeline, TimelineConfig};
//! use chirp_store::InMemoryTweetStore;
//! use chirp_types::{Principal, Timestamp, TweetPayload};
//!
//! let timeline = Timeline::new(InMemoryTweetStore::new(), TimelineConfig::default());
//! let ctx = CallContext::new(Principal::new("bob").unwrap(), Timestamp::from_nanos(1));
//! let tweet = timeline.post_tweet(&ctx, TweetPayload::new("hello", "bob")).unwrap();
//! assert_eq!(timeline.get_all_tweets().unwrap(), vec![tweet]);
//! ```

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod request;
pub mod timeline;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ChirpConfig, TimelineConfig, DEFAULT_MAX_CONTENT_CHARS};
pub use context::CallContext;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use ids::{IdGenerator, SequentialIds, UuidV4Ids};
pub use request::{Envelope, Request, RequestKind, Response};
pub use timeline::Timeline;
pub use validation::validate_content;
