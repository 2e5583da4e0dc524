// ── Core error types ──
//
// User-facing errors from aircache-core. Persistence failures carry the
// offending path and chain the underlying io/serde error as `source`.
// Lookup misses are errors, not panics -- callers decide the fallback
// (the documented recovery for a failed load is an empty store).

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the cache engine.
#[derive(Debug, Error)]
pub enum CacheError {
    // ── Malformed input ──────────────────────────────────────────────
    #[error("invalid MAC address {input:?}: expected 12 hex digits")]
    InvalidMac { input: String },

    #[error("unknown device type {0:?} (expected \"ap\", \"switch\", or \"gateway\")")]
    UnknownDeviceType(String),

    // ── Lookup misses ────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound {
        entity: &'static str,
        identifier: String,
    },

    // ── Persistence failures ─────────────────────────────────────────
    #[error("failed to read cache file {path}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file {path} is not valid JSON: {source}")]
    CacheParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write cache file {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cache: {0}")]
    CacheSerialize(#[from] serde_json::Error),
}

impl CacheError {
    /// Shorthand for a by-name/by-id/by-MAC lookup miss.
    pub(crate) fn not_found(entity: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            identifier: identifier.into(),
        }
    }
}
