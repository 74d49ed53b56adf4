//! Web API module for Filebin.
//!
//! Provides the REST API for uploading, listing, downloading and deleting
//! files, plus optional static file serving for the browser front end.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router, create_static_router};
pub use server::WebServer;
