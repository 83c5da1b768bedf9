//! Custom extractors for Axum handlers.
//!
//! Each extractor turns its rejection into an [`AppError`](crate::errors::AppError)
//! so malformed input always answers `400` with the standard error body.

pub mod json_body;
pub mod uuid_path;
pub mod validated_json;

pub use json_body::JsonBody;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
