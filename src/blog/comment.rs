//! Comments on posts and their repository.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::Owned;

use super::errors::BlogResult;
use super::store::{Record, VersionedTable};

/// A comment attached to a post
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub author: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
    pub version: u64,
}

impl Comment {
    pub fn new(post_id: u64, author: &str, body: &str) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            post_id,
            author: author.to_string(),
            body: body.to_string(),
            created: now,
            last_edited: now,
            version: 0,
        }
    }
}

impl Owned for Comment {
    const KIND: &'static str = "Comment";

    fn author(&self) -> &str {
        &self.author
    }
}

impl Record for Comment {
    const TABLE: &'static str = "Comment";

    fn id(&self) -> u64 {
        self.id
    }
    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
    fn version(&self) -> u64 {
        self.version
    }
    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

/// Comment repository trait
pub trait CommentRepository: Send + Sync {
    fn find_by_id(&self, id: u64) -> BlogResult<Option<Comment>>;

    /// Comments on one post, oldest first
    fn list_for_post(&self, post_id: u64) -> BlogResult<Vec<Comment>>;

    fn create(&self, comment: Comment) -> BlogResult<Comment>;

    fn update(&self, comment: &Comment) -> BlogResult<Comment>;

    fn delete(&self, id: u64) -> BlogResult<()>;

    /// Drop every comment on a post, returning how many were removed
    fn delete_for_post(&self, post_id: u64) -> BlogResult<usize>;
}

/// In-memory comment repository
#[derive(Debug, Default)]
pub struct InMemoryCommentRepository {
    table: VersionedTable<Comment>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentRepository for InMemoryCommentRepository {
    fn find_by_id(&self, id: u64) -> BlogResult<Option<Comment>> {
        self.table.get(id)
    }

    fn list_for_post(&self, post_id: u64) -> BlogResult<Vec<Comment>> {
        let mut comments = self.table.scan(|c| c.post_id == post_id)?;
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    fn create(&self, comment: Comment) -> BlogResult<Comment> {
        self.table.insert(comment)
    }

    fn update(&self, comment: &Comment) -> BlogResult<Comment> {
        self.table.update(comment)
    }

    fn delete(&self, id: u64) -> BlogResult<()> {
        self.table.remove(id).map(|_| ())
    }

    fn delete_for_post(&self, post_id: u64) -> BlogResult<usize> {
        self.table.remove_where(|c| c.post_id == post_id)
    }
}
