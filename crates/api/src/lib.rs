//! HTTP page layer for papyrus.
//!
//! This crate maps the site's URLs to handlers:
//!
//! - **Pages**: feed, group, profile, post and auth handlers
//! - **Extractors**: authentication with login redirects
//! - **Middleware**: bearer-token resolution
//!
//! Handlers return `RenderedPage` payloads (a template identifier plus
//! a plain JSON context) or redirects; an external presentation layer
//! does the actual rendering. Built on Axum 0.8 with Tower middleware.

pub mod extractors;
pub mod middleware;
pub mod pages;
pub mod response;

pub use pages::router;
