//! Fatal startup errors
//!
//! Everything that goes wrong after startup degrades to "do nothing this
//! tick"; only mounting the render surface can fail loudly.

/// Errors that abort initialization.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The host has no window object (not running in a browser).
    #[error("no window available")]
    NoWindow,

    /// The window has no document.
    #[error("no document available")]
    NoDocument,

    /// The mount point element was not found.
    #[error("mount element #{0} not found")]
    MissingMount(String),

    /// A DOM call failed while building the render surface.
    #[error("DOM error: {0}")]
    Dom(String),

    /// No GPU adapter could drive the surface.
    #[error("no compatible GPU adapter")]
    NoAdapter,

    /// The surface could not be created or configured.
    #[error("render surface unavailable: {0}")]
    Surface(String),

    /// The GPU device request failed.
    #[error("GPU device request failed: {0}")]
    Device(String),
}

/// Why an asset request fell back to the built-in manifest.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// No window to fetch through.
    #[error("no window available")]
    NoWindow,

    /// The fetch itself failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The body was not a valid manifest.
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),
}
