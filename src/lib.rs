//! Pressroom - An admin console for a publication backend
//!
//! This library provides a typed client for the backend's admin REST API
//! along with the caching, configuration, and command handling used by the
//! `pressroom` binary. The pieces compose bottom-up: `models` defines the
//! wire types, `api` speaks to the backend, `services` adds caching and
//! validation on top, and `cli` renders it all for the terminal.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod models;
pub mod services;
