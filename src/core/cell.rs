//! Console Cell
//!
//! A single character position in a console grid: one glyph plus the
//! colours it is drawn with.

use serde::{Deserialize, Serialize};

/// A single cell in a console grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The glyph drawn in this cell
    pub glyph: char,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: Color::Default,
            bg: Color::Default,
        }
    }
}

impl Cell {
    /// Create a new cell with a single character on default colors
    pub fn new(glyph: char) -> Self {
        Self {
            glyph,
            ..Default::default()
        }
    }

    /// Create a new cell with explicit colors
    pub fn with_colors(glyph: char, fg: Color, bg: Color) -> Self {
        Self { glyph, fg, bg }
    }

    /// Check if this cell has nothing visible to draw
    pub fn is_blank(&self) -> bool {
        self.glyph == ' ' || self.glyph == '\0'
    }

    /// Reset the cell to default state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Color representation supporting indexed and RGB colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// Default console color (foreground or background)
    #[default]
    Default,
    /// 256-color palette index
    Indexed(u8),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard ANSI colors (0-7)
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);
}

/// Color palette used to resolve [`Color`] values to RGB
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Default foreground color
    pub foreground: (u8, u8, u8),
    /// Default background color
    pub background: (u8, u8, u8),
    /// The 16 ANSI colors (0-15)
    pub ansi: [(u8, u8, u8); 16],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: (229, 229, 229),
            background: (0, 0, 0),
            ansi: [
                (0, 0, 0),       // 0: Black
                (205, 0, 0),     // 1: Red
                (0, 205, 0),     // 2: Green
                (205, 205, 0),   // 3: Yellow
                (0, 0, 238),     // 4: Blue
                (205, 0, 205),   // 5: Magenta
                (0, 205, 205),   // 6: Cyan
                (229, 229, 229), // 7: White
                (127, 127, 127), // 8: Bright Black
                (255, 0, 0),     // 9: Bright Red
                (0, 255, 0),     // 10: Bright Green
                (255, 255, 0),   // 11: Bright Yellow
                (92, 92, 255),   // 12: Bright Blue
                (255, 0, 255),   // 13: Bright Magenta
                (0, 255, 255),   // 14: Bright Cyan
                (255, 255, 255), // 15: Bright White
            ],
        }
    }
}

impl Palette {
    /// Get the RGB color for an indexed color (0-255)
    pub fn get_indexed(&self, index: u8) -> (u8, u8, u8) {
        match index {
            0..=15 => self.ansi[index as usize],
            // 216 color cube (16-231)
            16..=231 => {
                let n = index - 16;
                let b = n % 6;
                let g = (n / 6) % 6;
                let r = n / 36;
                let to_component = |c: u8| if c == 0 { 0 } else { 55 + c * 40 };
                (to_component(r), to_component(g), to_component(b))
            }
            // Grayscale (232-255)
            232..=255 => {
                let gray = 8 + (index - 232) * 10;
                (gray, gray, gray)
            }
        }
    }

    /// Convert a Color to RGB
    pub fn resolve(&self, color: Color, is_foreground: bool) -> (u8, u8, u8) {
        match color {
            Color::Default => {
                if is_foreground {
                    self.foreground
                } else {
                    self.background
                }
            }
            Color::Indexed(i) => self.get_indexed(i),
            Color::Rgb(r, g, b) => (r, g, b),
        }
    }
}
