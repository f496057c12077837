//! # HTTP Server Module
//!
//! axum front end for the auth and blog services.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/signup`, `/login`, `/logout`, `/welcome` - Session management
//! - `/posts/*`, `/newpost`, `/comments/*` - Blog content
//!
//! Unauthenticated writes are redirected to [`LOGIN_PATH`].

pub mod config;
pub mod server;
pub mod state;
pub mod response;
pub mod auth_routes;
pub mod blog_routes;

pub use config::HttpServerConfig;
pub use response::LOGIN_PATH;
pub use server::HttpServer;
pub use state::{AppState, CurrentUser};
