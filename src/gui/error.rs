//! Compositor errors

use super::LayerHandle;

/// Error type for layer registration, lookup, resize and render
#[derive(Debug, thiserror::Error)]
pub enum GuiError {
    #[error("Font not registered: {0}")]
    FontNotFound(String),

    #[error("Failed to load font {name}: {reason}")]
    FontLoad { name: String, reason: String },

    #[error("Failed to allocate {width}x{height} surface: {reason}")]
    SurfaceAllocation {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("No layer registered under handle {0}")]
    HandleNotFound(LayerHandle),

    #[error("Invalid dimensions {width}x{height}: width and height must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("No automatic render order left above {0}")]
    OrderExhausted(i32),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for compositor operations
pub type GuiResult<T> = Result<T, GuiError>;

/// Reject zero-area sizes before anything is allocated
pub(crate) fn check_dimensions(width: u32, height: u32) -> GuiResult<()> {
    if width == 0 || height == 0 {
        return Err(GuiError::InvalidDimensions { width, height });
    }
    Ok(())
}
