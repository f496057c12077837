//! blogcore - a small blog with signed-cookie sessions and per-author
//! ownership checks

pub mod auth;
pub mod blog;
pub mod cli;
pub mod config;
pub mod http_server;
