//! Errors raised while reading Tiled JSON documents.

use thiserror::Error;

/// Failure to turn raw Tiled JSON into a [`TiledDocument`](crate::document::TiledDocument).
///
/// These are load-time failures only. Once a document exists, every lookup on
/// it is total and falls back to "no tile" / "no properties".
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A required top-level field is missing or has the wrong shape.
    #[error("Malformed Tiled document: {0}")]
    MalformedDocument(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Layer data uses an encoding this loader does not decode.
    #[error("Layer '{layer}' uses unsupported encoding '{encoding}' (save the map with CSV layer format)")]
    UnsupportedEncoding { layer: String, encoding: String },
}
