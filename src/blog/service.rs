//! # Blog Service
//!
//! Post, comment and like operations. Reads are public; every write passes
//! through the ownership guard first.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::guard::{authorize, require_identity, require_resource, toggle_like, LikeOutcome};
use crate::auth::validate::{validate_comment, validate_post};
use crate::auth::{AuthError, SessionIdentity};

use super::comment::{Comment, CommentRepository};
use super::errors::{BlogError, BlogResult};
use super::post::{Post, PostRepository};

/// Blog service over post and comment storage
pub struct BlogService<P: PostRepository, C: CommentRepository> {
    posts: Arc<P>,
    comments: Arc<C>,
}

impl<P: PostRepository, C: CommentRepository> BlogService<P, C> {
    pub fn new(posts: P, comments: C) -> Self {
        Self {
            posts: Arc::new(posts),
            comments: Arc::new(comments),
        }
    }

    // ==================
    // Posts
    // ==================

    /// Publish a post authored by the caller
    pub fn create_post(
        &self,
        identity: Option<&SessionIdentity>,
        subject: &str,
        body: &str,
    ) -> BlogResult<Post> {
        let identity = require_identity(identity)?;
        validate_post(subject, body).map_err(AuthError::Validation)?;

        let post = self.posts.create(Post::new(subject, body, &identity.name))?;
        tracing::info!(post_id = post.id, user_id = identity.user_id, "post created");
        Ok(post)
    }

    /// All posts, newest first
    pub fn list_posts(&self) -> BlogResult<Vec<Post>> {
        self.posts.list_recent()
    }

    pub fn get_post(&self, id: u64) -> BlogResult<Post> {
        self.posts
            .find_by_id(id)?
            .ok_or_else(|| BlogError::not_found("Post", id))
    }

    /// A post with its comments, oldest comment first
    pub fn post_with_comments(&self, id: u64) -> BlogResult<(Post, Vec<Comment>)> {
        let post = self.get_post(id)?;
        let comments = self.comments.list_for_post(id)?;
        Ok((post, comments))
    }

    pub fn edit_post(
        &self,
        identity: Option<&SessionIdentity>,
        id: u64,
        subject: &str,
        body: &str,
    ) -> BlogResult<Post> {
        let mut post = authorize(identity, self.posts.find_by_id(id)?)?;
        validate_post(subject, body).map_err(AuthError::Validation)?;

        post.subject = subject.to_string();
        post.body = body.to_string();
        post.last_edited = Utc::now();

        let post = self.posts.update(&post)?;
        tracing::info!(post_id = post.id, "post edited");
        Ok(post)
    }

    /// Delete a post and every comment on it
    pub fn delete_post(&self, identity: Option<&SessionIdentity>, id: u64) -> BlogResult<()> {
        let post = authorize(identity, self.posts.find_by_id(id)?)?;

        // Post first: a comment inserted after this point sees the post gone
        // in `add_comment`, one inserted before is swept below.
        self.posts.delete(post.id)?;
        let removed = self.comments.delete_for_post(post.id)?;
        tracing::info!(post_id = post.id, comments_removed = removed, "post deleted");
        Ok(())
    }

    /// Like or un-like a post; liking your own post changes nothing
    ///
    /// A toggle that races another write to the same post fails with
    /// `Conflict` rather than dropping either change.
    pub fn toggle_like(&self, identity: Option<&SessionIdentity>, id: u64) -> BlogResult<LikeOutcome> {
        let identity = require_identity(identity)?;
        let mut post = require_resource(self.posts.find_by_id(id)?)?;

        let outcome = toggle_like(identity, &mut post);
        if outcome.changed() {
            self.posts.update(&post)?;
        }
        tracing::debug!(post_id = id, user_id = identity.user_id, ?outcome, "like toggled");
        Ok(outcome)
    }

    // ==================
    // Comments
    // ==================

    pub fn add_comment(
        &self,
        identity: Option<&SessionIdentity>,
        post_id: u64,
        body: &str,
    ) -> BlogResult<Comment> {
        let identity = require_identity(identity)?;
        let post = self.get_post(post_id)?;
        validate_comment(body).map_err(AuthError::Validation)?;

        let comment = self
            .comments
            .create(Comment::new(post.id, &identity.name, body))?;

        // The post may have been deleted between the lookup and the insert
        if self.posts.find_by_id(post.id)?.is_none() {
            self.comments.delete(comment.id)?;
            tracing::debug!(post_id, "comment dropped: post deleted concurrently");
            return Err(BlogError::not_found("Post", post.id));
        }

        tracing::info!(comment_id = comment.id, post_id, "comment added");
        Ok(comment)
    }

    pub fn edit_comment(
        &self,
        identity: Option<&SessionIdentity>,
        id: u64,
        body: &str,
    ) -> BlogResult<Comment> {
        let mut comment = authorize(identity, self.comments.find_by_id(id)?)?;
        validate_comment(body).map_err(AuthError::Validation)?;

        comment.body = body.to_string();
        comment.last_edited = Utc::now();

        Ok(self.comments.update(&comment)?)
    }

    /// Delete a comment, returning it so callers know which post it was on
    pub fn delete_comment(&self, identity: Option<&SessionIdentity>, id: u64) -> BlogResult<Comment> {
        let comment = authorize(identity, self.comments.find_by_id(id)?)?;
        self.comments.delete(comment.id)?;
        tracing::info!(comment_id = comment.id, post_id = comment.post_id, "comment deleted");
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::comment::InMemoryCommentRepository;
    use crate::blog::post::InMemoryPostRepository;

    type Service = BlogService<InMemoryPostRepository, InMemoryCommentRepository>;

    fn service() -> Service {
        BlogService::new(InMemoryPostRepository::new(), InMemoryCommentRepository::new())
    }

    fn who(user_id: u64, name: &str) -> SessionIdentity {
        SessionIdentity {
            user_id,
            name: name.to_string(),
        }
    }

    fn is_auth(err: &BlogError, check: fn(&AuthError) -> bool) -> bool {
        matches!(err, BlogError::Auth(e) if check(e))
    }

    #[test]
    fn test_create_requires_identity() {
        let err = service().create_post(None, "s", "b").unwrap_err();
        assert!(is_auth(&err, |e| matches!(e, AuthError::AuthenticationRequired)));
    }

    #[test]
    fn test_create_sets_author() {
        let alice = who(1, "alice");
        let post = service().create_post(Some(&alice), "Hello", "World").unwrap();
        assert_eq!(post.author, "alice");
    }

    #[test]
    fn test_create_validates_content() {
        let alice = who(1, "alice");
        let err = service().create_post(Some(&alice), "", "").unwrap_err();
        match err {
            BlogError::Auth(AuthError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_by_owner_and_non_owner() {
        let service = service();
        let alice = who(1, "alice");
        let bob = who(2, "bob");
        let post = service.create_post(Some(&alice), "Hello", "World").unwrap();

        let err = service.edit_post(Some(&bob), post.id, "Hacked", "!").unwrap_err();
        assert!(is_auth(&err, |e| matches!(e, AuthError::Unauthorized)));

        let edited = service.edit_post(Some(&alice), post.id, "Hello", "Again").unwrap();
        assert_eq!(edited.body, "Again");
        assert_eq!(edited.author, "alice");
        assert!(edited.last_edited >= edited.created);
    }

    #[test]
    fn test_unauthorized_edit_does_not_validate_first() {
        let service = service();
        let alice = who(1, "alice");
        let bob = who(2, "bob");
        let post = service.create_post(Some(&alice), "Hello", "World").unwrap();

        let err = service.edit_post(Some(&bob), post.id, "", "").unwrap_err();
        assert!(is_auth(&err, |e| matches!(e, AuthError::Unauthorized)));
    }

    #[test]
    fn test_missing_post_is_not_found() {
        let alice = who(1, "alice");
        let service = service();

        assert_eq!(service.get_post(42).unwrap_err().status_code(), 404);
        assert_eq!(service.edit_post(Some(&alice), 42, "s", "b").unwrap_err().status_code(), 404);
        assert_eq!(service.delete_post(Some(&alice), 42).unwrap_err().status_code(), 404);
        assert_eq!(service.toggle_like(Some(&alice), 42).unwrap_err().status_code(), 404);
        assert_eq!(service.add_comment(Some(&alice), 42, "hi").unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_delete_cascades_comments() {
        let service = service();
        let alice = who(1, "alice");
        let bob = who(2, "bob");
        let post = service.create_post(Some(&alice), "Hello", "World").unwrap();
        let comment = service.add_comment(Some(&bob), post.id, "nice").unwrap();

        let err = service.delete_post(Some(&bob), post.id).unwrap_err();
        assert!(is_auth(&err, |e| matches!(e, AuthError::Unauthorized)));

        service.delete_post(Some(&alice), post.id).unwrap();
        assert_eq!(service.get_post(post.id).unwrap_err().status_code(), 404);
        assert!(service.comments.find_by_id(comment.id).unwrap().is_none());
    }

    #[test]
    fn test_like_toggle_flow() {
        let service = service();
        let alice = who(1, "alice");
        let carol = who(7, "carol");
        let post = service.create_post(Some(&alice), "Hello", "World").unwrap();

        assert_eq!(service.toggle_like(Some(&carol), post.id).unwrap(), LikeOutcome::Liked);
        let liked: Vec<_> = service.get_post(post.id).unwrap().liked_users.into_iter().collect();
        assert_eq!(liked, vec![7]);

        assert_eq!(service.toggle_like(Some(&carol), post.id).unwrap(), LikeOutcome::Unliked);
        assert!(service.get_post(post.id).unwrap().liked_users.is_empty());

        assert_eq!(service.toggle_like(Some(&alice), post.id).unwrap(), LikeOutcome::SelfLike);
        assert!(service.get_post(post.id).unwrap().liked_users.is_empty());

        let err = service.toggle_like(None, post.id).unwrap_err();
        assert!(is_auth(&err, |e| matches!(e, AuthError::AuthenticationRequired)));
    }

    #[test]
    fn test_self_like_does_not_write() {
        let service = service();
        let alice = who(1, "alice");
        let post = service.create_post(Some(&alice), "Hello", "World").unwrap();

        service.toggle_like(Some(&alice), post.id).unwrap();
        assert_eq!(service.get_post(post.id).unwrap().version, post.version);
    }

    #[test]
    fn test_comment_ownership() {
        let service = service();
        let alice = who(1, "alice");
        let bob = who(2, "bob");
        let post = service.create_post(Some(&alice), "Hello", "World").unwrap();
        let comment = service.add_comment(Some(&bob), post.id, "nice").unwrap();
        assert_eq!(comment.author, "bob");

        // The post's author does not own other people's comments
        let err = service.edit_comment(Some(&alice), comment.id, "edited").unwrap_err();
        assert!(is_auth(&err, |e| matches!(e, AuthError::Unauthorized)));
        let err = service.delete_comment(Some(&alice), comment.id).unwrap_err();
        assert!(is_auth(&err, |e| matches!(e, AuthError::Unauthorized)));

        let edited = service.edit_comment(Some(&bob), comment.id, "very nice").unwrap();
        assert_eq!(edited.body, "very nice");

        let deleted = service.delete_comment(Some(&bob), comment.id).unwrap();
        assert_eq!(deleted.post_id, post.id);
        assert!(service.post_with_comments(post.id).unwrap().1.is_empty());
    }

    #[test]
    fn test_post_with_comments() {
        let service = service();
        let alice = who(1, "alice");
        let post = service.create_post(Some(&alice), "Hello", "World").unwrap();
        service.add_comment(Some(&alice), post.id, "one").unwrap();
        service.add_comment(Some(&alice), post.id, "two").unwrap();

        let (found, comments) = service.post_with_comments(post.id).unwrap();
        assert_eq!(found.id, post.id);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "one");
    }

    /// Serves the first lookup, then behaves as if the post was deleted
    struct DeletedAfterLookup {
        inner: InMemoryPostRepository,
        lookups: std::sync::atomic::AtomicUsize,
    }

    impl PostRepository for DeletedAfterLookup {
        fn find_by_id(&self, id: u64) -> BlogResult<Option<Post>> {
            use std::sync::atomic::Ordering;
            if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                self.inner.find_by_id(id)
            } else {
                Ok(None)
            }
        }
        fn list_recent(&self) -> BlogResult<Vec<Post>> {
            self.inner.list_recent()
        }
        fn create(&self, post: Post) -> BlogResult<Post> {
            self.inner.create(post)
        }
        fn update(&self, post: &Post) -> BlogResult<Post> {
            self.inner.update(post)
        }
        fn delete(&self, id: u64) -> BlogResult<()> {
            self.inner.delete(id)
        }
    }

    #[test]
    fn test_comment_on_concurrently_deleted_post_is_dropped() {
        let posts = InMemoryPostRepository::new();
        let post = posts.create(Post::new("Hello", "World", "alice")).unwrap();
        let service = BlogService::new(
            DeletedAfterLookup {
                inner: posts,
                lookups: Default::default(),
            },
            InMemoryCommentRepository::new(),
        );

        let err = service
            .add_comment(Some(&who(2, "bob")), post.id, "nice")
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(service.comments.list_for_post(post.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_post_removes_post_before_comments() {
        let service = service();
        let alice = who(1, "alice");
        let post = service.create_post(Some(&alice), "Hello", "World").unwrap();
        service.add_comment(Some(&alice), post.id, "one").unwrap();

        service.delete_post(Some(&alice), post.id).unwrap();

        // Adding to a deleted post fails at the first lookup and stores nothing
        assert!(service.add_comment(Some(&alice), post.id, "late").is_err());
        assert!(service.comments.list_for_post(post.id).unwrap().is_empty());
    }
}
