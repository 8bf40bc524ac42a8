use serde::{Deserialize, Serialize};

use crate::id::{CommentId, TweetId};
use crate::principal::Principal;
use crate::temporal::Timestamp;

/// A user-authored post and its engagement state.
///
/// Records are replaced whole on every mutation; nothing in this crate
/// mutates a stored tweet in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: TweetId,
    pub owner: Principal,
    pub content: String,
    pub username: String,
    pub likes: u64,
    /// Callers who have liked this tweet, in the order they liked it.
    pub liked: Vec<Principal>,
    pub comments: Vec<Comment>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl Tweet {
    /// A fresh tweet with zeroed engagement.
    pub fn new(
        id: TweetId,
        owner: Principal,
        payload: TweetPayload,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            content: payload.content,
            username: payload.username,
            likes: 0,
            liked: Vec::new(),
            comments: Vec::new(),
            created_at,
            updated_at: None,
        }
    }

    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        &self.owner == principal
    }

    pub fn is_liked_by(&self, principal: &Principal) -> bool {
        self.liked.contains(principal)
    }

    /// Position of a comment in the comment sequence.
    pub fn comment_position(&self, id: &CommentId) -> Option<usize> {
        self.comments.iter().position(|c| &c.id == id)
    }

    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }

    /// Content of a retweet of this tweet.
    pub fn quote(&self) -> String {
        format!("RT @{}: {}", self.username, self.content)
    }
}

/// A reply attached to exactly one tweet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub owner: Principal,
    pub content: String,
    pub username: String,
    pub created_at: Timestamp,
}

impl Comment {
    pub fn new(
        id: CommentId,
        owner: Principal,
        payload: CommentPayload,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            content: payload.content,
            username: payload.username,
            created_at,
        }
    }

    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        &self.owner == principal
    }
}

/// User input for posting a tweet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetPayload {
    pub content: String,
    pub username: String,
}

impl TweetPayload {
    pub fn new(content: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            username: username.into(),
        }
    }
}

/// User input for commenting on a tweet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub content: String,
    pub username: String,
}

impl CommentPayload {
    pub fn new(content: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            username: username.into(),
        }
    }
}
