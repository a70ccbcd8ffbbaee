//! API Module
//!
//! HTTP handlers and routing for the cache admin and monitoring API.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `POST /invalidate` - Pattern invalidation
//! - `POST /invalidate-deps` - Dependency invalidation
//! - `GET /stats` - Get cache statistics
//! - `POST /clear` - Reset the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
