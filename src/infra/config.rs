//! Centralized configuration (environment variables + defaults).

use std::path::PathBuf;

/// REST contract version; shapes the base path and the default data directory.
pub const API_VERSION: u32 = 1;

/// Versioned base path every generated route lives under.
pub fn base_path() -> String {
    format!("/api/v{API_VERSION}")
}

/// Listen port (default 3000).
pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000)
}

/// Root directory of the blob store (default `./api/v{version}`).
pub fn data_dir() -> PathBuf {
    std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(format!("./api/v{API_VERSION}")))
}

/// Directory of static assets served as the router fallback (default `public`).
pub fn public_dir() -> PathBuf {
    std::env::var("PUBLIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("public"))
}
