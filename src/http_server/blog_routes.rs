//! Blog HTTP Routes
//!
//! Reads return JSON. Writes take form bodies and answer with a redirect to
//! the page showing the result.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    response::{Json, Redirect},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::blog::{Comment, Post};

use super::response::HttpError;
use super::state::{AppState, CurrentUser};

/// Blog routes with shared state
pub fn blog_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/posts") }))
        .route("/posts", get(list_posts_handler))
        .route("/newpost", post(new_post_handler))
        .route("/posts/:id", get(permalink_handler))
        .route("/posts/:id/edit", post(edit_post_handler))
        .route("/posts/:id/delete", post(delete_post_handler))
        .route("/posts/:id/like", post(like_post_handler))
        .route("/posts/:id/comments", post(new_comment_handler))
        .route("/comments/:id/edit", post(edit_comment_handler))
        .route("/comments/:id/delete", post(delete_comment_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub likes: usize,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            likes: post.like_count(),
            post,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PermalinkResponse {
    pub post: PostView,
    pub comments: Vec<Comment>,
}

fn permalink(post_id: u64) -> Redirect {
    Redirect::to(&format!("/posts/{}", post_id))
}

// ==================
// Post Handlers
// ==================

async fn list_posts_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostView>>, HttpError> {
    let posts = state.blog.list_posts()?;
    Ok(Json(posts.into_iter().map(PostView::from).collect()))
}

async fn permalink_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<PermalinkResponse>, HttpError> {
    let (post, comments) = state.blog.post_with_comments(id)?;
    Ok(Json(PermalinkResponse {
        post: post.into(),
        comments,
    }))
}

async fn new_post_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Form(form): Form<PostForm>,
) -> Result<Redirect, HttpError> {
    let post = state
        .blog
        .create_post(user.identity(), &form.subject, &form.body)?;
    Ok(permalink(post.id))
}

async fn edit_post_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Form(form): Form<PostForm>,
) -> Result<Redirect, HttpError> {
    let post = state
        .blog
        .edit_post(user.identity(), id, &form.subject, &form.body)?;
    Ok(permalink(post.id))
}

async fn delete_post_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> Result<Redirect, HttpError> {
    state.blog.delete_post(user.identity(), id)?;
    Ok(Redirect::to("/posts"))
}

async fn like_post_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> Result<Redirect, HttpError> {
    state.blog.toggle_like(user.identity(), id)?;
    Ok(permalink(id))
}

// ==================
// Comment Handlers
// ==================

async fn new_comment_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(post_id): Path<u64>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, HttpError> {
    state
        .blog
        .add_comment(user.identity(), post_id, &form.body)?;
    Ok(permalink(post_id))
}

async fn edit_comment_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, HttpError> {
    let comment = state
        .blog
        .edit_comment(user.identity(), id, &form.body)?;
    Ok(permalink(comment.post_id))
}

async fn delete_comment_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> Result<Redirect, HttpError> {
    let comment = state.blog.delete_comment(user.identity(), id)?;
    Ok(permalink(comment.post_id))
}
