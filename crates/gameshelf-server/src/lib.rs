//! Gameshelf backend
//!
//! Exposes catalog search and per-user library management over HTTP:
//!
//! ```text
//! GET    /api/games/search?q=<term>&platform=<optional>
//! GET    /api/games/library
//! POST   /api/games/library
//! DELETE /api/games/library/{entryId}
//! ```
//!
//! Library routes identify the caller through the `user-id` header.

pub mod api;
pub mod error;

pub use api::{USER_ID_HEADER, configure};
pub use error::ApiError;
