use std::sync::Mutex;

use chirp_store::TweetStore;
use chirp_types::{Comment, CommentId, CommentPayload, Tweet, TweetId, TweetPayload};
use tracing::debug;

use crate::config::TimelineConfig;
use crate::context::CallContext;
use crate::error::{ServiceError, ServiceResult};
use crate::ids::{IdGenerator, UuidV4Ids};
use crate::validation::validate_content;

/// The tweet, comment, like and retweet entry points over one store.
///
/// Updates are serialized by a single writer lock: each one loads the whole
/// record, builds the new record, and puts it back before the next update
/// starts. A failed update never writes. Queries go straight to the store.
pub struct Timeline<S: TweetStore> {
    store: S,
    config: TimelineConfig,
    ids: Box<dyn IdGenerator>,
    writer: Mutex<()>,
}

impl<S: TweetStore> Timeline<S> {
    /// A timeline generating random UUID v4 identifiers.
    pub fn new(store: S, config: TimelineConfig) -> Self {
        Self::with_id_generator(store, config, UuidV4Ids)
    }

    pub fn with_id_generator(
        store: S,
        config: TimelineConfig,
        ids: impl IdGenerator + 'static,
    ) -> Self {
        Self {
            store,
            config,
            ids: Box::new(ids),
            writer: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ---- Queries ----

    pub fn get_tweet(&self, id: &TweetId) -> ServiceResult<Tweet> {
        self.store
            .get(id)?
            .ok_or_else(|| ServiceError::TweetNotFound(id.clone()))
    }

    /// Every tweet, ascending by id.
    pub fn get_all_tweets(&self) -> ServiceResult<Vec<Tweet>> {
        Ok(self.store.list()?)
    }

    // ---- Tweets ----

    pub fn post_tweet(&self, ctx: &CallContext, payload: TweetPayload) -> ServiceResult<Tweet> {
        validate_content(&self.config, &payload.content)?;

        let _guard = self.writer.lock()?;
        let id = self.fresh_tweet_id()?;
        let tweet = Tweet::new(id, ctx.caller.clone(), payload, ctx.time);
        self.store.put(&tweet)?;

        debug!(tweet = %tweet.id, caller = %ctx.caller, "tweet posted");
        Ok(tweet)
    }

    /// Replace the content of a tweet and stamp `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if `ctx.time` is older than
    /// the previous edit.
    pub fn edit_tweet(
        &self,
        ctx: &CallContext,
        id: &TweetId,
        content: String,
    ) -> ServiceResult<Tweet> {
        self.update(id, |mut tweet| {
            self.check_tweet_owner(ctx, &tweet)?;
            validate_content(&self.config, &content)?;

            tweet.content = content;
            tweet.updated_at = Some(match tweet.updated_at {
                Some(prev) => prev.max(ctx.time),
                None => ctx.time,
            });
            debug!(tweet = %tweet.id, caller = %ctx.caller, "tweet edited");
            Ok(tweet)
        })
    }

    pub fn delete_tweet(&self, ctx: &CallContext, id: &TweetId) -> ServiceResult<Tweet> {
        let _guard = self.writer.lock()?;
        let tweet = self.load(id)?;
        self.check_tweet_owner(ctx, &tweet)?;

        let removed = self
            .store
            .remove(id)?
            .ok_or_else(|| ServiceError::TweetNotFound(id.clone()))?;
        debug!(tweet = %id, caller = %ctx.caller, "tweet deleted");
        Ok(removed)
    }

    /// Post a new tweet quoting another one.
    ///
    /// The retweet is independent of its source: fresh id, owned by the
    /// caller, zeroed engagement. The source is not modified. Its content is
    /// synthesized, so it is not subject to the content limit.
    pub fn retweet_tweet(
        &self,
        ctx: &CallContext,
        id: &TweetId,
        username: String,
    ) -> ServiceResult<Tweet> {
        let _guard = self.writer.lock()?;
        let source = self.load(id)?;
        let retweet_id = self.fresh_tweet_id()?;
        let retweet = Tweet::new(
            retweet_id,
            ctx.caller.clone(),
            TweetPayload::new(source.quote(), username),
            ctx.time,
        );
        self.store.put(&retweet)?;

        debug!(tweet = %retweet.id, source = %source.id, caller = %ctx.caller, "tweet retweeted");
        Ok(retweet)
    }

    // ---- Comments ----

    pub fn add_comment(
        &self,
        ctx: &CallContext,
        tweet_id: &TweetId,
        payload: CommentPayload,
    ) -> ServiceResult<Tweet> {
        self.update(tweet_id, |mut tweet| {
            validate_content(&self.config, &payload.content)?;

            let comment_id = CommentId::new(self.ids.next_id());
            if tweet.comment(&comment_id).is_some() {
                return Err(ServiceError::IdCollision(comment_id.to_string()));
            }
            debug!(tweet = %tweet.id, comment = %comment_id, caller = %ctx.caller, "comment added");
            tweet
                .comments
                .push(Comment::new(comment_id, ctx.caller.clone(), payload, ctx.time));
            Ok(tweet)
        })
    }

    /// Remove one comment, keeping the order of the rest.
    pub fn delete_comment(
        &self,
        ctx: &CallContext,
        tweet_id: &TweetId,
        comment_id: &CommentId,
    ) -> ServiceResult<Tweet> {
        self.update(tweet_id, |mut tweet| {
            let index = tweet
                .comment_position(comment_id)
                .ok_or_else(|| ServiceError::CommentNotFound(comment_id.clone()))?;
            if self.config.ownership_checks && !tweet.comments[index].is_owned_by(&ctx.caller) {
                return Err(ServiceError::NotCommentOwner(comment_id.clone()));
            }

            tweet.comments.remove(index);
            debug!(tweet = %tweet.id, comment = %comment_id, caller = %ctx.caller, "comment deleted");
            Ok(tweet)
        })
    }

    // ---- Likes ----

    /// Like a tweet.
    ///
    /// With like tracking the caller is remembered and a second like from
    /// the same caller fails; `likes` and `liked` change together. Without
    /// tracking the counter is bumped unconditionally.
    pub fn add_like(&self, ctx: &CallContext, tweet_id: &TweetId) -> ServiceResult<Tweet> {
        self.update(tweet_id, |mut tweet| {
            if self.config.like_tracking {
                check_tracked_likes(&tweet)?;
                if tweet.is_liked_by(&ctx.caller) {
                    return Err(ServiceError::AlreadyLiked(tweet.id));
                }
                tweet.liked.push(ctx.caller.clone());
            }
            tweet.likes = tweet.likes.saturating_add(1);
            debug!(tweet = %tweet.id, caller = %ctx.caller, likes = tweet.likes, "like added");
            Ok(tweet)
        })
    }

    pub fn remove_like(&self, ctx: &CallContext, tweet_id: &TweetId) -> ServiceResult<Tweet> {
        self.update(tweet_id, |mut tweet| {
            if tweet.likes == 0 {
                return Err(ServiceError::NoLikes(tweet.id));
            }
            if self.config.like_tracking {
                check_tracked_likes(&tweet)?;
                let index = tweet
                    .liked
                    .iter()
                    .position(|p| p == &ctx.caller)
                    .ok_or_else(|| ServiceError::NotLiked(tweet.id.clone()))?;
                tweet.liked.remove(index);
            }
            tweet.likes -= 1;
            debug!(tweet = %tweet.id, caller = %ctx.caller, likes = tweet.likes, "like removed");
            Ok(tweet)
        })
    }

    // ---- Internals ----

    /// Load, transform and store one record under the writer lock.
    fn update<F>(&self, id: &TweetId, apply: F) -> ServiceResult<Tweet>
    where
        F: FnOnce(Tweet) -> ServiceResult<Tweet>,
    {
        let _guard = self.writer.lock()?;
        let tweet = self.load(id)?;
        let updated = match apply(tweet) {
            Ok(updated) => updated,
            Err(e) => {
                debug!(tweet = %id, error = %e, "update rejected");
                return Err(e);
            }
        };
        self.store.put(&updated)?;
        Ok(updated)
    }

    fn load(&self, id: &TweetId) -> ServiceResult<Tweet> {
        self.store
            .get(id)?
            .ok_or_else(|| ServiceError::TweetNotFound(id.clone()))
    }

    fn check_tweet_owner(&self, ctx: &CallContext, tweet: &Tweet) -> ServiceResult<()> {
        if self.config.ownership_checks && !tweet.is_owned_by(&ctx.caller) {
            debug!(tweet = %tweet.id, caller = %ctx.caller, "caller is not the owner");
            return Err(ServiceError::NotTweetOwner(tweet.id.clone()));
        }
        Ok(())
    }

    /// Caller must hold the writer lock.
    fn fresh_tweet_id(&self) -> ServiceResult<TweetId> {
        let id = TweetId::new(self.ids.next_id());
        if self.store.contains(&id)? {
            return Err(ServiceError::IdCollision(id.to_string()));
        }
        Ok(id)
    }
}

/// With like tracking on, `likes` must equal `liked.len()`. A record liked
/// while tracking was off has anonymous likes that can be neither attributed
/// nor taken back, so like changes on it are refused.
fn check_tracked_likes(tweet: &Tweet) -> ServiceResult<()> {
    let tracked = tweet.liked.len();
    if tweet.likes != tracked as u64 {
        return Err(ServiceError::UntrackedLikes {
            id: tweet.id.clone(),
            likes: tweet.likes,
            tracked,
        });
    }
    Ok(())
}

impl<S: TweetStore + std::fmt::Debug> std::fmt::Debug for Timeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::ids::SequentialIds;
    use chirp_store::InMemoryTweetStore;
    use chirp_types::{Principal, Timestamp};

    fn timeline(config: TimelineConfig) -> Timeline<InMemoryTweetStore> {
        Timeline::with_id_generator(InMemoryTweetStore::new(), config, SequentialIds::new("t"))
    }

    fn ctx(name: &str, nanos: u64) -> CallContext {
        CallContext::new(Principal::new(name).unwrap(), Timestamp::from_nanos(nanos))
    }

    fn alice() -> CallContext {
        ctx("alice", 100)
    }

    fn bob() -> CallContext {
        ctx("bob", 200)
    }

    fn post(tl: &Timeline<InMemoryTweetStore>, caller: &CallContext, content: &str) -> Tweet {
        tl.post_tweet(caller, TweetPayload::new(content, caller.caller.as_str()))
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[test]
    fn post_then_get_returns_equal_record() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "hello");
        assert_eq!(tl.get_tweet(&tweet.id).unwrap(), tweet);
    }

    #[test]
    fn get_missing_is_not_found() {
        let tl = timeline(TimelineConfig::default());
        let err = tl.get_tweet(&TweetId::new("nope")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Tweet with id=nope not found");
    }

    #[test]
    fn get_all_is_ordered_by_id() {
        let tl = Timeline::with_id_generator(
            InMemoryTweetStore::new(),
            TimelineConfig::default(),
            SequentialIds::new("z"),
        );
        let a = post(&tl, &alice(), "one");
        let b = post(&tl, &bob(), "two");
        let all = tl.get_all_tweets().unwrap();
        assert_eq!(all, vec![a, b]);
    }

    // -----------------------------------------------------------------------
    // Post / delete scenario
    // -----------------------------------------------------------------------

    #[test]
    fn post_list_delete_list() {
        let tl = timeline(TimelineConfig::default());
        let bob = bob();
        assert!(tl.get_all_tweets().unwrap().is_empty());

        let tweet = tl
            .post_tweet(&bob, TweetPayload::new("hello", "bob"))
            .unwrap();
        assert_eq!(tweet.content, "hello");
        assert_eq!(tweet.username, "bob");
        assert_eq!(tweet.likes, 0);
        assert!(tweet.comments.is_empty());
        assert_eq!(tweet.created_at, bob.time);
        assert_eq!(tweet.updated_at, None);
        assert_eq!(tweet.owner, bob.caller);

        assert_eq!(tl.get_all_tweets().unwrap(), vec![tweet.clone()]);
        assert_eq!(tl.delete_tweet(&bob, &tweet.id).unwrap(), tweet);
        assert!(tl.get_all_tweets().unwrap().is_empty());
        assert_eq!(
            tl.get_tweet(&tweet.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn oversized_post_is_rejected_and_nothing_stored() {
        let tl = timeline(TimelineConfig::default());
        let err = tl
            .post_tweet(&bob(), TweetPayload::new("x".repeat(300), "bob"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
        assert!(tl.get_all_tweets().unwrap().is_empty());
    }

    #[test]
    fn oversized_post_allowed_without_validation() {
        let tl = timeline(TimelineConfig::permissive());
        let tweet = post(&tl, &bob(), &"x".repeat(300));
        assert_eq!(tweet.content.len(), 300);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let tl = timeline(TimelineConfig::default());
        let first = post(&tl, &alice(), "first");
        tl.delete_tweet(&alice(), &first.id).unwrap();
        let second = post(&tl, &alice(), "second");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn id_collision_is_refused() {
        struct Fixed;
        impl IdGenerator for Fixed {
            fn next_id(&self) -> String {
                "same".into()
            }
        }
        let tl = Timeline::with_id_generator(
            InMemoryTweetStore::new(),
            TimelineConfig::default(),
            Fixed,
        );
        let tweet = post(&tl, &alice(), "first");
        let err = tl
            .post_tweet(&bob(), TweetPayload::new("second", "bob"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::IdCollision(ref id) if id == "same"));
        assert_eq!(tl.get_tweet(&tweet.id).unwrap().content, "first");
    }

    #[test]
    fn comment_id_collision_is_refused() {
        struct Fixed;
        impl IdGenerator for Fixed {
            fn next_id(&self) -> String {
                "same".into()
            }
        }
        let tl = Timeline::with_id_generator(
            InMemoryTweetStore::new(),
            TimelineConfig::default(),
            Fixed,
        );
        let tweet = post(&tl, &alice(), "thread");
        let first = tl
            .add_comment(&bob(), &tweet.id, CommentPayload::new("one", "bob"))
            .unwrap();
        assert_eq!(first.comments.len(), 1);

        let err = tl
            .add_comment(&bob(), &tweet.id, CommentPayload::new("two", "bob"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::IdCollision(ref id) if id == "same"));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(tl.get_tweet(&tweet.id).unwrap(), first);
    }

    #[test]
    fn delete_by_non_owner_is_forbidden() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "mine");
        let err = tl.delete_tweet(&bob(), &tweet.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.to_string(), "You are not the tweet's owner");
        assert_eq!(tl.get_tweet(&tweet.id).unwrap(), tweet);
    }

    #[test]
    fn delete_by_anyone_without_ownership_checks() {
        let tl = timeline(TimelineConfig::permissive());
        let tweet = post(&tl, &alice(), "mine");
        assert_eq!(tl.delete_tweet(&bob(), &tweet.id).unwrap(), tweet);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let tl = timeline(TimelineConfig::default());
        let err = tl.delete_tweet(&alice(), &TweetId::new("gone")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // -----------------------------------------------------------------------
    // Edit
    // -----------------------------------------------------------------------

    #[test]
    fn edit_changes_only_content_and_updated_at() {
        let tl = timeline(TimelineConfig::default());
        let original = post(&tl, &alice(), "draft");
        tl.add_like(&bob(), &original.id).unwrap();
        let before = tl
            .add_comment(&bob(), &original.id, CommentPayload::new("hi", "bob"))
            .unwrap();

        let edited = tl
            .edit_tweet(&ctx("alice", 500), &original.id, "final".into())
            .unwrap();
        assert_eq!(edited.content, "final");
        assert_eq!(edited.updated_at, Some(Timestamp::from_nanos(500)));
        assert_eq!(edited.id, before.id);
        assert_eq!(edited.owner, before.owner);
        assert_eq!(edited.username, before.username);
        assert_eq!(edited.created_at, before.created_at);
        assert_eq!(edited.likes, before.likes);
        assert_eq!(edited.liked, before.liked);
        assert_eq!(edited.comments, before.comments);
        assert_eq!(tl.get_tweet(&original.id).unwrap(), edited);
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "v1");
        let first = tl
            .edit_tweet(&ctx("alice", 900), &tweet.id, "v2".into())
            .unwrap();
        let second = tl
            .edit_tweet(&ctx("alice", 300), &tweet.id, "v3".into())
            .unwrap();
        assert_eq!(first.updated_at, Some(Timestamp::from_nanos(900)));
        assert_eq!(second.updated_at, Some(Timestamp::from_nanos(900)));
        assert_eq!(second.content, "v3");
    }

    #[test]
    fn edit_by_non_owner_is_forbidden_and_untouched() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "mine");
        let err = tl.edit_tweet(&bob(), &tweet.id, "hijack".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(tl.get_tweet(&tweet.id).unwrap(), tweet);
    }

    #[test]
    fn edit_oversized_is_rejected_and_untouched() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "short");
        let err = tl
            .edit_tweet(&alice(), &tweet.id, "y".repeat(281))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
        assert_eq!(tl.get_tweet(&tweet.id).unwrap(), tweet);
    }

    #[test]
    fn edit_missing_is_not_found() {
        let tl = timeline(TimelineConfig::default());
        let err = tl
            .edit_tweet(&alice(), &TweetId::new("x"), "c".into())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    #[test]
    fn comments_append_in_order() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "topic");
        tl.add_comment(&bob(), &tweet.id, CommentPayload::new("first", "bob"))
            .unwrap();
        let updated = tl
            .add_comment(&alice(), &tweet.id, CommentPayload::new("second", "alice"))
            .unwrap();

        let contents: Vec<&str> = updated.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(updated.comments[0].owner, bob().caller);
        assert_eq!(updated.comments[0].created_at, bob().time);
        assert_ne!(updated.comments[0].id, updated.comments[1].id);
    }

    #[test]
    fn add_then_delete_comment_restores_sequence() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "topic");
        tl.add_comment(&bob(), &tweet.id, CommentPayload::new("a", "bob"))
            .unwrap();
        let before = tl
            .add_comment(&alice(), &tweet.id, CommentPayload::new("b", "alice"))
            .unwrap();

        let with_extra = tl
            .add_comment(&bob(), &tweet.id, CommentPayload::new("extra", "bob"))
            .unwrap();
        let extra_id = with_extra.comments.last().unwrap().id.clone();

        let after = tl.delete_comment(&bob(), &tweet.id, &extra_id).unwrap();
        assert_eq!(after.comments, before.comments);
    }

    #[test]
    fn delete_middle_comment_preserves_order() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "topic");
        for text in ["a", "b", "c"] {
            tl.add_comment(&alice(), &tweet.id, CommentPayload::new(text, "alice"))
                .unwrap();
        }
        let middle = tl.get_tweet(&tweet.id).unwrap().comments[1].id.clone();
        let after = tl.delete_comment(&alice(), &tweet.id, &middle).unwrap();
        let contents: Vec<&str> = after.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "c"]);
    }

    #[test]
    fn comment_on_missing_tweet() {
        let tl = timeline(TimelineConfig::default());
        let err = tl
            .add_comment(&bob(), &TweetId::new("x"), CommentPayload::new("hi", "bob"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn oversized_comment_is_rejected() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "topic");
        let err = tl
            .add_comment(&bob(), &tweet.id, CommentPayload::new("z".repeat(281), "bob"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
        assert!(tl.get_tweet(&tweet.id).unwrap().comments.is_empty());
    }

    #[test]
    fn delete_comment_errors_are_distinct() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "topic");
        let with_comment = tl
            .add_comment(&bob(), &tweet.id, CommentPayload::new("mine", "bob"))
            .unwrap();
        let comment_id = with_comment.comments[0].id.clone();

        let missing_tweet = tl
            .delete_comment(&bob(), &TweetId::new("x"), &comment_id)
            .unwrap_err();
        assert!(matches!(missing_tweet, ServiceError::TweetNotFound(_)));

        let missing_comment = tl
            .delete_comment(&bob(), &tweet.id, &CommentId::new("c-x"))
            .unwrap_err();
        assert!(matches!(missing_comment, ServiceError::CommentNotFound(_)));
        assert_eq!(missing_comment.kind(), ErrorKind::NotFound);

        // The tweet owner does not own bob's comment.
        let forbidden = tl
            .delete_comment(&alice(), &tweet.id, &comment_id)
            .unwrap_err();
        assert!(matches!(forbidden, ServiceError::NotCommentOwner(_)));
        assert_eq!(tl.get_tweet(&tweet.id).unwrap(), with_comment);
    }

    #[test]
    fn delete_any_comment_without_ownership_checks() {
        let tl = timeline(TimelineConfig::permissive());
        let tweet = post(&tl, &alice(), "topic");
        let with_comment = tl
            .add_comment(&bob(), &tweet.id, CommentPayload::new("bob's", "bob"))
            .unwrap();
        let comment_id = with_comment.comments[0].id.clone();
        let after = tl.delete_comment(&alice(), &tweet.id, &comment_id).unwrap();
        assert!(after.comments.is_empty());
    }

    // -----------------------------------------------------------------------
    // Likes
    // -----------------------------------------------------------------------

    #[test]
    fn tracked_like_twice_is_already_liked() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "like me");

        let liked = tl.add_like(&bob(), &tweet.id).unwrap();
        assert_eq!(liked.likes, 1);
        assert_eq!(liked.liked, vec![bob().caller]);

        let err = tl.add_like(&bob(), &tweet.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyLiked);
        assert_eq!(tl.get_tweet(&tweet.id).unwrap().likes, 1);
    }

    #[test]
    fn untracked_likes_are_unlimited() {
        let tl = timeline(TimelineConfig::permissive());
        let tweet = post(&tl, &alice(), "like me");
        tl.add_like(&bob(), &tweet.id).unwrap();
        let liked = tl.add_like(&bob(), &tweet.id).unwrap();
        assert_eq!(liked.likes, 2);
        assert!(liked.liked.is_empty());
    }

    #[test]
    fn remove_like_at_zero_is_no_likes() {
        for config in [TimelineConfig::default(), TimelineConfig::permissive()] {
            let tl = timeline(config);
            let tweet = post(&tl, &alice(), "lonely");
            for caller in [alice(), bob(), CallContext::anonymous(Timestamp::zero())] {
                let err = tl.remove_like(&caller, &tweet.id).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::NoLikes);
            }
        }
    }

    #[test]
    fn remove_like_by_non_liker_is_not_liked() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "liked");
        tl.add_like(&bob(), &tweet.id).unwrap();
        let err = tl.remove_like(&alice(), &tweet.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotLiked);
        assert_eq!(tl.get_tweet(&tweet.id).unwrap().likes, 1);
    }

    #[test]
    fn like_then_unlike_restores_state() {
        let tl = timeline(TimelineConfig::default());
        let tweet = post(&tl, &alice(), "liked");
        tl.add_like(&alice(), &tweet.id).unwrap();
        tl.add_like(&bob(), &tweet.id).unwrap();
        let after = tl.remove_like(&alice(), &tweet.id).unwrap();
        assert_eq!(after.likes, 1);
        assert_eq!(after.liked, vec![bob().caller]);
    }

    #[test]
    fn untracked_remove_like_decrements() {
        let tl = timeline(TimelineConfig::permissive());
        let tweet = post(&tl, &alice(), "liked");
        tl.add_like(&bob(), &tweet.id).unwrap();
        assert_eq!(tl.remove_like(&alice(), &tweet.id).unwrap().likes, 0);
    }

    #[test]
    fn like_missing_tweet() {
        let tl = timeline(TimelineConfig::default());
        let id = TweetId::new("x");
        assert_eq!(tl.add_like(&bob(), &id).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(tl.remove_like(&bob(), &id).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn untracked_likes_are_refused_once_tracking_is_on() {
        use chirp_store::FileTweetStore;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.snap");

        let tweet = {
            let tl = Timeline::with_id_generator(
                FileTweetStore::open(&path).unwrap(),
                TimelineConfig::permissive(),
                SequentialIds::new("t"),
            );
            let tweet = tl
                .post_tweet(&alice(), TweetPayload::new("popular", "alice"))
                .unwrap();
            tl.add_like(&alice(), &tweet.id).unwrap();
            tl.add_like(&bob(), &tweet.id).unwrap();
            tweet
        };

        let tl = Timeline::with_id_generator(
            FileTweetStore::open(&path).unwrap(),
            TimelineConfig::default(),
            SequentialIds::new("u"),
        );
        let before = tl.get_tweet(&tweet.id).unwrap();
        assert_eq!((before.likes, before.liked.len()), (2, 0));

        for err in [
            tl.add_like(&ctx("carol", 300), &tweet.id).unwrap_err(),
            tl.remove_like(&bob(), &tweet.id).unwrap_err(),
        ] {
            assert!(matches!(
                err,
                ServiceError::UntrackedLikes { likes: 2, tracked: 0, .. }
            ));
            assert_eq!(err.kind(), ErrorKind::Internal);
        }
        assert_eq!(tl.get_tweet(&tweet.id).unwrap(), before);

        // Other updates still work on the record.
        let edited = tl
            .edit_tweet(&ctx("alice", 400), &tweet.id, "still popular".into())
            .unwrap();
        assert_eq!(edited.likes, 2);
    }

    // -----------------------------------------------------------------------
    // Retweet
    // -----------------------------------------------------------------------

    #[test]
    fn retweet_creates_independent_tweet() {
        let tl = timeline(TimelineConfig::default());
        let source = post(&tl, &bob(), "original thought");
        tl.add_like(&alice(), &source.id).unwrap();
        let source = tl
            .add_comment(&alice(), &source.id, CommentPayload::new("wow", "alice"))
            .unwrap();

        let rt = tl
            .retweet_tweet(&ctx("carol", 700), &source.id, "alice".into())
            .unwrap();
        assert_eq!(rt.content, "RT @bob: original thought");
        assert!(rt.content.starts_with("RT @"));
        assert_eq!(rt.username, "alice");
        assert_eq!(rt.owner.as_str(), "carol");
        assert_eq!(rt.likes, 0);
        assert!(rt.liked.is_empty());
        assert!(rt.comments.is_empty());
        assert_eq!(rt.created_at, Timestamp::from_nanos(700));
        assert_eq!(rt.updated_at, None);
        assert_ne!(rt.id, source.id);

        assert_eq!(tl.get_tweet(&source.id).unwrap(), source);
        assert_eq!(tl.get_all_tweets().unwrap().len(), 2);
    }

    #[test]
    fn retweet_of_long_tweet_is_not_validated() {
        let tl = timeline(TimelineConfig::default());
        let source = post(&tl, &bob(), &"w".repeat(280));
        let rt = tl.retweet_tweet(&alice(), &source.id, "alice".into()).unwrap();
        assert!(rt.content.chars().count() > 280);
    }

    #[test]
    fn retweet_missing_is_not_found() {
        let tl = timeline(TimelineConfig::default());
        let err = tl
            .retweet_tweet(&alice(), &TweetId::new("x"), "alice".into())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_likes_are_all_counted() {
        use std::sync::Arc;
        use std::thread;

        let tl = Arc::new(timeline(TimelineConfig::default()));
        let tweet = post(&tl, &alice(), "popular");

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let tl = Arc::clone(&tl);
                let id = tweet.id.clone();
                thread::spawn(move || {
                    tl.add_like(&ctx(&format!("user{i}"), i), &id).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        let after = tl.get_tweet(&tweet.id).unwrap();
        assert_eq!(after.likes, 16);
        assert_eq!(after.liked.len(), 16);
    }
}
