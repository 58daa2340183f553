//! Error types for the pagination and rendering engine.
//!
//! Fatal conditions are returned as [`Error`]. Recoverable font fallbacks are
//! not errors: they surface as [`FontWarning`](crate::fonts::FontWarning)
//! values next to the successful result.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while laying out or rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The raster or measurement surface could not be created.
    #[error("Measurement context unavailable: {0}")]
    MeasurementContextUnavailable(String),

    /// The content area cannot hold even a single line.
    #[error(
        "Pagination deadlock: content height {content_height_px}px cannot fit a \
         {line_height_px}px line; increase the page height or reduce the margins"
    )]
    PaginationDeadlock {
        /// Configured content height in pixels
        content_height_px: f32,
        /// Height of the line that could not be placed
        line_height_px: f32,
    },

    /// A rendered page could not be encoded or embedded.
    #[error("Failed to encode page {page}: {reason}")]
    PageEncodingFailure {
        /// 1-based page number
        page: usize,
        /// Reason for the failure
        reason: String,
    },

    /// A block references a font family that was never loaded.
    #[error("Font not loaded: '{0}' (load it through the FontProvider before layout)")]
    FontNotLoaded(String),

    /// Font data supplied by the caller is not a usable font.
    #[error("Font error: {0}")]
    Font(String),

    /// Layout configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
