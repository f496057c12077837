//! # Blog Module
//!
//! Posts, comments and likes. Storage sits behind repository traits; the
//! in-memory implementations keep a version per record so that concurrent
//! writes to the same record are detected instead of silently lost.

pub mod errors;
mod store;
pub mod post;
pub mod comment;
pub mod service;

pub use comment::{Comment, CommentRepository, InMemoryCommentRepository};
pub use errors::{BlogError, BlogResult};
pub use post::{InMemoryPostRepository, Post, PostRepository};
pub use service::BlogService;
