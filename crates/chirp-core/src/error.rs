use std::fmt;
use std::sync::PoisonError;

use chirp_store::StoreError;
use chirp_types::{CommentId, TweetId};
use serde::{Deserialize, Serialize};

/// Errors returned by timeline entry points.
///
/// The `Display` text is the human-readable message handed back to callers;
/// [`ServiceError::kind`] is the structured classification.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Tweet with id={0} not found")]
    TweetNotFound(TweetId),

    #[error("Comment with id={0} not found in the tweet.")]
    CommentNotFound(CommentId),

    #[error("You are not the tweet's owner")]
    NotTweetOwner(TweetId),

    #[error("You are not the owner of the comment with id {0}")]
    NotCommentOwner(CommentId),

    #[error("Already liked tweet with id {0}")]
    AlreadyLiked(TweetId),

    #[error("You haven't liked the tweet with id {0}")]
    NotLiked(TweetId),

    #[error("Tweet with id={0} has no likes to remove.")]
    NoLikes(TweetId),

    #[error("Content is {length} characters long; the limit is {max}")]
    InvalidPayload { length: usize, max: usize },

    #[error("generated id {0} is already in use")]
    IdCollision(String),

    /// The record was written without like tracking and cannot be tracked now.
    #[error("Tweet with id={id} has {likes} likes but {tracked} tracked likers")]
    UntrackedLikes { id: TweetId, likes: u64, tracked: usize },

    #[error("timeline lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl<T> From<PoisonError<T>> for ServiceError {
    fn from(e: PoisonError<T>) -> Self {
        Self::LockPoisoned(e.to_string())
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TweetNotFound(_) | Self::CommentNotFound(_) => ErrorKind::NotFound,
            Self::NotTweetOwner(_) | Self::NotCommentOwner(_) => ErrorKind::Forbidden,
            Self::AlreadyLiked(_) => ErrorKind::AlreadyLiked,
            Self::NotLiked(_) => ErrorKind::NotLiked,
            Self::NoLikes(_) => ErrorKind::NoLikes,
            Self::InvalidPayload { .. } => ErrorKind::InvalidPayload,
            Self::IdCollision(_)
            | Self::UntrackedLikes { .. }
            | Self::LockPoisoned(_)
            | Self::Store(_)
            | Self::Config(_) => ErrorKind::Internal,
        }
    }
}

/// Structured classification of a [`ServiceError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The tweet or comment does not exist.
    NotFound,
    /// The caller does not own the record.
    Forbidden,
    AlreadyLiked,
    NotLiked,
    /// The like counter is already zero.
    NoLikes,
    /// The content is over the length limit.
    InvalidPayload,
    /// Storage, locking or configuration failure, or a record that does not
    /// fit the current configuration.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::AlreadyLiked => "already_liked",
            Self::NotLiked => "not_liked",
            Self::NoLikes => "no_likes",
            Self::InvalidPayload => "invalid_payload",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_caller_facing_text() {
        let id = TweetId::new("t-1");
        assert_eq!(
            ServiceError::TweetNotFound(id.clone()).to_string(),
            "Tweet with id=t-1 not found"
        );
        assert_eq!(
            ServiceError::NoLikes(id.clone()).to_string(),
            "Tweet with id=t-1 has no likes to remove."
        );
        assert_eq!(
            ServiceError::AlreadyLiked(id).to_string(),
            "Already liked tweet with id t-1"
        );
        assert_eq!(
            ServiceError::CommentNotFound(CommentId::new("c-1")).to_string(),
            "Comment with id=c-1 not found in the tweet."
        );
    }

    #[test]
    fn kinds() {
        let t = TweetId::new("t");
        let c = CommentId::new("c");
        assert_eq!(ServiceError::TweetNotFound(t.clone()).kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::CommentNotFound(c.clone()).kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::NotTweetOwner(t.clone()).kind(), ErrorKind::Forbidden);
        assert_eq!(ServiceError::NotCommentOwner(c).kind(), ErrorKind::Forbidden);
        assert_eq!(ServiceError::NotLiked(t.clone()).kind(), ErrorKind::NotLiked);
        assert_eq!(
            ServiceError::InvalidPayload { length: 300, max: 280 }.kind(),
            ErrorKind::InvalidPayload
        );
        assert_eq!(ServiceError::IdCollision(t.to_string()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn kind_display_matches_serde() {
        let json = serde_json::to_string(&ErrorKind::AlreadyLiked).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorKind::AlreadyLiked));
    }
}
