//! Font Rendering
//!
//! Handles font loading, glyph rasterization and the registry consoles look
//! fonts up in. Uses fontdue for simple, fast font rasterization.

use std::collections::HashMap;
use std::path::Path;

use fontdue::{Font, FontSettings, Metrics};

use crate::app::Config;
use crate::gui::{GuiError, GuiResult};

/// A rendered glyph with its metrics and bitmap
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    /// Glyph metrics
    pub metrics: Metrics,
    /// Bitmap data (grayscale coverage, 1 byte per pixel)
    pub bitmap: Vec<u8>,
}

/// Font renderer that handles glyph rasterization and caching
#[derive(Clone)]
pub struct FontRenderer {
    /// The loaded font
    font: Font,
    /// Font size in pixels
    font_size: f32,
    /// Cached glyphs: char -> RasterizedGlyph
    glyph_cache: HashMap<char, RasterizedGlyph>,
    /// Cell width in pixels
    cell_width: u32,
    /// Cell height in pixels
    cell_height: u32,
    /// Baseline offset from top of cell
    baseline: i32,
}

impl FontRenderer {
    /// Create a new font renderer with the given font file and size
    pub fn new(font_path: &Path, font_size: f32) -> Result<Self, FontError> {
        let font_data = std::fs::read(font_path)?;
        Self::from_bytes(&font_data, font_size)
    }

    /// Create a font renderer from font data bytes
    pub fn from_bytes(font_data: &[u8], font_size: f32) -> Result<Self, FontError> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(FontError::InvalidSize(font_size));
        }

        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;

        // Use 'M' as reference for width (em-width)
        let metrics = font.metrics('M', font_size);
        let line_metrics = font
            .horizontal_line_metrics(font_size)
            .ok_or_else(|| FontError::Parse("No line metrics".to_string()))?;

        Ok(Self {
            font,
            font_size,
            glyph_cache: HashMap::new(),
            cell_width: (metrics.advance_width.ceil() as u32).max(1),
            cell_height: (line_metrics.new_line_size.ceil() as u32).max(1),
            baseline: line_metrics.ascent.round() as i32,
        })
    }

    /// Create a font renderer from the first system monospace font found
    pub fn with_default_font(font_size: f32) -> Result<Self, FontError> {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
            "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
            "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
        ];

        for path in &font_paths {
            if let Ok(renderer) = Self::new(Path::new(path), font_size) {
                tracing::info!("Loaded font: {}", path);
                return Ok(renderer);
            }
        }

        Err(FontError::NoFontFound)
    }

    /// Get the cell width in pixels
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Get the cell height in pixels
    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    /// Get the baseline offset from top of cell
    pub fn baseline(&self) -> i32 {
        self.baseline
    }

    /// Get the font size
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Rasterize a character, using cache if available
    pub fn rasterize(&mut self, c: char) -> &RasterizedGlyph {
        self.glyph_cache.entry(c).or_insert_with(|| {
            let (metrics, bitmap) = self.font.rasterize(c, self.font_size);
            RasterizedGlyph { metrics, bitmap }
        })
    }

    /// Number of glyphs currently cached
    pub fn cached_glyphs(&self) -> usize {
        self.glyph_cache.len()
    }

    /// Clear the glyph cache
    pub fn clear_cache(&mut self) {
        self.glyph_cache.clear();
    }

    /// Calculate grid dimensions for a given pixel size
    pub fn calculate_grid_size(&self, pixel_width: u32, pixel_height: u32) -> (usize, usize) {
        let cols = (pixel_width / self.cell_width) as usize;
        let rows = (pixel_height / self.cell_height) as usize;
        (cols.max(1), rows.max(1))
    }

    /// Calculate pixel position for a cell
    pub fn cell_to_pixel(&self, col: usize, row: usize) -> (i32, i32) {
        let x = col as i32 * self.cell_width as i32;
        let y = row as i32 * self.cell_height as i32;
        (x, y)
    }
}

/// Font-related errors
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Font IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font parse error: {0}")]
    Parse(String),

    #[error("Invalid font size: {0}")]
    InvalidSize(f32),

    #[error("No suitable font found")]
    NoFontFound,
}

/// Named fonts available to consoles.
///
/// Each console gets its own copy of the renderer so glyph caches are never
/// shared between layers.
#[derive(Clone, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, FontRenderer>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the fonts listed in the configuration
    pub fn from_config(config: &Config) -> GuiResult<Self> {
        let mut registry = Self::new();
        for font in &config.fonts {
            registry.load(&font.name, &font.path, font.size)?;
        }
        Ok(registry)
    }

    /// Register an already constructed renderer under `name`, replacing any
    /// previous font of that name
    pub fn register(&mut self, name: &str, renderer: FontRenderer) {
        tracing::debug!(name, size = renderer.font_size(), "Registered font");
        self.fonts.insert(name.to_string(), renderer);
    }

    /// Load a font file and register it under `name`
    pub fn load(&mut self, name: &str, path: &Path, size: f32) -> GuiResult<()> {
        let renderer = FontRenderer::new(path, size).map_err(|e| GuiError::FontLoad {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.register(name, renderer);
        Ok(())
    }

    /// Get a fresh renderer for `name`
    pub fn get(&self, name: &str) -> GuiResult<FontRenderer> {
        self.fonts
            .get(name)
            .cloned()
            .ok_or_else(|| GuiError::FontNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Registered font names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fonts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// DejaVu Sans Mono, shipped with the test suite so font-dependent tests
/// never depend on what the host has installed
#[cfg(test)]
pub(crate) fn bundled_font(font_size: f32) -> FontRenderer {
    const BYTES: &[u8] =
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/DejaVuSansMono.ttf"));
    FontRenderer::from_bytes(BYTES, font_size).expect("bundled font parses")
}
