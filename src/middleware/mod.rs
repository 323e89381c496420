//! Request middleware.
//!
//! The pipeline is composed in [`crate::router::init_router`], outermost
//! first:
//!
//! 1. [`crate::logging::logging_middleware`] records every request
//! 2. CORS answers preflight requests
//! 3. [`auth::authorize`] applies the bypass list, token checks and the
//!    permission matrix
//!
//! Handlers only run for requests that were bypassed or allowed.

pub mod auth;
