use chirp_store::TweetStore;
use chirp_types::{CommentId, CommentPayload, Principal, Tweet, TweetId, TweetPayload};
use serde::{Deserialize, Serialize};

use crate::context::CallContext;
use crate::error::{ErrorKind, ServiceError, ServiceResult};
use crate::timeline::Timeline;

/// Whether an entry point may change the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Query,
    Update,
}

/// One call to a timeline entry point.
///
/// Serialized with the entry point name in a `method` field:
/// `{"method":"addLike","tweetId":"…"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    GetTweet { id: TweetId },
    GetAllTweets,
    PostTweet { payload: TweetPayload },
    EditTweet { id: TweetId, content: String },
    DeleteTweet { id: TweetId },
    AddComment { tweet_id: TweetId, payload: CommentPayload },
    DeleteComment { tweet_id: TweetId, comment_id: CommentId },
    AddLike { tweet_id: TweetId },
    RemoveLike { tweet_id: TweetId },
    RetweetTweet { tweet_id: TweetId, username: String },
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::GetTweet { .. } | Self::GetAllTweets => RequestKind::Query,
            _ => RequestKind::Update,
        }
    }

    /// Entry point name as it appears on the wire.
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetTweet { .. } => "getTweet",
            Self::GetAllTweets => "getAllTweets",
            Self::PostTweet { .. } => "postTweet",
            Self::EditTweet { .. } => "editTweet",
            Self::DeleteTweet { .. } => "deleteTweet",
            Self::AddComment { .. } => "addComment",
            Self::DeleteComment { .. } => "deleteComment",
            Self::AddLike { .. } => "addLike",
            Self::RemoveLike { .. } => "removeLike",
            Self::RetweetTweet { .. } => "retweetTweet",
        }
    }
}

/// A request with an optional caller, as read from a request script.
///
/// A missing caller means the host's default caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<Principal>,
    #[serde(flatten)]
    pub request: Request,
}

/// Outcome of a [`Request`]: the affected record(s), or an error carrying
/// both its kind and its human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Ok { tweet: Tweet },
    OkList { tweets: Vec<Tweet> },
    Err { kind: ErrorKind, message: String },
}

impl Response {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Err { .. })
    }

    /// The single tweet, or the error message.
    pub fn into_tweet(self) -> Result<Tweet, String> {
        match self {
            Self::Ok { tweet } => Ok(tweet),
            Self::OkList { .. } => Err("expected a single tweet, got a list".into()),
            Self::Err { message, .. } => Err(message),
        }
    }

    /// The tweet list, or the error message.
    pub fn into_tweets(self) -> Result<Vec<Tweet>, String> {
        match self {
            Self::OkList { tweets } => Ok(tweets),
            Self::Ok { tweet } => Ok(vec![tweet]),
            Self::Err { message, .. } => Err(message),
        }
    }
}

impl From<ServiceError> for Response {
    fn from(e: ServiceError) -> Self {
        Self::Err {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

impl<S: TweetStore> Timeline<S> {
    /// Run one request and fold the result into a [`Response`].
    pub fn handle(&self, ctx: &CallContext, request: Request) -> Response {
        let method = request.method();
        let kind = request.kind();
        let result = self.dispatch(ctx, request);
        match &result {
            Ok(_) if kind == RequestKind::Update => {
                tracing::debug!(method, ?kind, caller = %ctx.caller, "update applied")
            }
            Ok(_) => tracing::trace!(method, ?kind, "query answered"),
            Err(e) => {
                tracing::debug!(method, ?kind, caller = %ctx.caller, error = %e, "request failed")
            }
        }
        result.unwrap_or_else(Response::from)
    }

    fn dispatch(&self, ctx: &CallContext, request: Request) -> ServiceResult<Response> {
        let tweet = match request {
            Request::GetTweet { id } => self.get_tweet(&id)?,
            Request::GetAllTweets => {
                return Ok(Response::OkList {
                    tweets: self.get_all_tweets()?,
                })
            }
            Request::PostTweet { payload } => self.post_tweet(ctx, payload)?,
            Request::EditTweet { id, content } => self.edit_tweet(ctx, &id, content)?,
            Request::DeleteTweet { id } => self.delete_tweet(ctx, &id)?,
            Request::AddComment { tweet_id, payload } => {
                self.add_comment(ctx, &tweet_id, payload)?
            }
            Request::DeleteComment {
                tweet_id,
                comment_id,
            } => self.delete_comment(ctx, &tweet_id, &comment_id)?,
            Request::AddLike { tweet_id } => self.add_like(ctx, &tweet_id)?,
            Request::RemoveLike { tweet_id } => self.remove_like(ctx, &tweet_id)?,
            Request::RetweetTweet { tweet_id, username } => {
                self.retweet_tweet(ctx, &tweet_id, username)?
            }
        };
        Ok(Response::Ok { tweet })
    }
}
