//! Blog posts and their repository.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{Likeable, Owned};

use super::errors::BlogResult;
use super::store::{Record, VersionedTable};

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: u64,
    pub subject: String,
    pub body: String,

    /// Name of the user who created the post; never reassigned
    pub author: String,

    pub created: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,

    /// Ids of users who liked the post
    pub liked_users: BTreeSet<u64>,

    /// Bumped on every stored write
    pub version: u64,
}

impl Post {
    /// An unsaved post; the repository assigns id and version
    pub fn new(subject: &str, body: &str, author: &str) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            subject: subject.to_string(),
            body: body.to_string(),
            author: author.to_string(),
            created: now,
            last_edited: now,
            liked_users: BTreeSet::new(),
            version: 0,
        }
    }

    pub fn like_count(&self) -> usize {
        self.liked_users.len()
    }
}

impl Owned for Post {
    const KIND: &'static str = "Post";

    fn author(&self) -> &str {
        &self.author
    }
}

impl Likeable for Post {
    fn liked_users(&self) -> &BTreeSet<u64> {
        &self.liked_users
    }

    fn liked_users_mut(&mut self) -> &mut BTreeSet<u64> {
        &mut self.liked_users
    }
}

impl Record for Post {
    const TABLE: &'static str = "Post";

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

/// Post repository trait
pub trait PostRepository: Send + Sync {
    fn find_by_id(&self, id: u64) -> BlogResult<Option<Post>>;

    /// All posts, newest first
    fn list_recent(&self) -> BlogResult<Vec<Post>>;

    /// Store a new post and assign its id
    fn create(&self, post: Post) -> BlogResult<Post>;

    /// Write back a post read earlier; fails with `Conflict` if it changed since
    fn update(&self, post: &Post) -> BlogResult<Post>;

    fn delete(&self, id: u64) -> BlogResult<()>;
}

/// In-memory post repository
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    table: VersionedTable<Post>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostRepository for InMemoryPostRepository {
    fn find_by_id(&self, id: u64) -> BlogResult<Option<Post>> {
        self.table.get(id)
    }

    fn list_recent(&self) -> BlogResult<Vec<Post>> {
        let mut posts = self.table.scan(|_| true)?;
        posts.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    fn create(&self, post: Post) -> BlogResult<Post> {
        self.table.insert(post)
    }

    fn update(&self, post: &Post) -> BlogResult<Post> {
        self.table.update(post)
    }

    fn delete(&self, id: u64) -> BlogResult<()> {
        self.table.remove(id).map(|_| ())
    }
}
