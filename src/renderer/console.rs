//! Virtual Terminal
//!
//! A character-grid console bound to a pixel region of the window. Text is
//! written into a [`Grid`] and painted glyph by glyph when the console is
//! drawn.

use std::fmt;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::{Cell, Color, Grid, Palette};

use super::font::FontRenderer;
use super::pixels::PixelBuffer;

/// Single-line box drawing glyphs: corners, then horizontal and vertical
const BOX_GLYPHS: [char; 6] = ['┌', '┐', '└', '┘', '─', '│'];

pub struct VirtualTerminal {
    font_name: String,
    font: FontRenderer,
    palette: Palette,
    grid: Grid,
    offset_x: i32,
    offset_y: i32,
    pixel_width: u32,
    pixel_height: u32,
    render_background: bool,
}

impl VirtualTerminal {
    /// Create a console at (x, y). It covers a single cell until
    /// [`resize_pixels`](Self::resize_pixels) is called.
    pub fn new(
        font_name: &str,
        font: FontRenderer,
        palette: Palette,
        x: i32,
        y: i32,
        render_background: bool,
    ) -> Self {
        let pixel_width = font.cell_width();
        let pixel_height = font.cell_height();
        Self {
            font_name: font_name.to_string(),
            font,
            palette,
            grid: Grid::new(1, 1),
            offset_x: x,
            offset_y: y,
            pixel_width,
            pixel_height,
            render_background,
        }
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Cover `width` x `height` pixels, recomputing how many cells fit.
    /// Existing content in the overlapping area is kept.
    pub fn resize_pixels(&mut self, width: u32, height: u32) {
        self.pixel_width = width;
        self.pixel_height = height;
        let (cols, rows) = self.font.calculate_grid_size(width, height);
        self.grid.resize(cols, rows);
    }

    pub fn set_offset(&mut self, x: i32, y: i32) {
        self.offset_x = x;
        self.offset_y = y;
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }

    /// Pixel area this console covers
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixel_width, self.pixel_height)
    }

    /// Grid size in cells (columns, rows)
    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid.cols(), self.grid.rows())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn render_background(&self) -> bool {
        self.render_background
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Fill every cell with `cell`
    pub fn clear_with(&mut self, cell: Cell) {
        let (cols, rows) = self.grid_size();
        self.grid.fill(0, 0, cols, rows, cell);
    }

    pub fn set_char(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        self.grid.set(x, y, cell)
    }

    /// Print a string starting at (x, y). Wide characters take two cells and
    /// zero-width characters are skipped. Text past the right edge is cut.
    pub fn print(&mut self, x: usize, y: usize, text: &str, fg: Color, bg: Color) {
        let mut col = x;
        for c in text.chars() {
            let width = c.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            if col + width > self.grid.cols() {
                break;
            }
            self.grid.set(col, y, Cell::with_colors(c, fg, bg));
            if width == 2 {
                self.grid.set(col + 1, y, Cell::with_colors('\0', fg, bg));
            }
            col += width;
        }
    }

    /// Print a string horizontally centred on row `y`
    pub fn print_center(&mut self, y: usize, text: &str, fg: Color, bg: Color) {
        let x = self.grid.cols().saturating_sub(text.width()) / 2;
        self.print(x, y, text, fg, bg);
    }

    pub fn fill(&mut self, x: usize, y: usize, width: usize, height: usize, cell: Cell) {
        self.grid.fill(x, y, width, height, cell);
    }

    /// Draw a single-line box outline. Boxes smaller than 2x2 are ignored.
    pub fn draw_box(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        fg: Color,
        bg: Color,
    ) {
        if width < 2 || height < 2 {
            return;
        }
        let [top_left, top_right, bottom_left, bottom_right, horizontal, vertical] = BOX_GLYPHS;
        let right = x + width - 1;
        let bottom = y + height - 1;

        for col in x + 1..right {
            self.grid.set(col, y, Cell::with_colors(horizontal, fg, bg));
            self.grid.set(col, bottom, Cell::with_colors(horizontal, fg, bg));
        }
        for row in y + 1..bottom {
            self.grid.set(x, row, Cell::with_colors(vertical, fg, bg));
            self.grid.set(right, row, Cell::with_colors(vertical, fg, bg));
        }
        self.grid.set(x, y, Cell::with_colors(top_left, fg, bg));
        self.grid.set(right, y, Cell::with_colors(top_right, fg, bg));
        self.grid.set(x, bottom, Cell::with_colors(bottom_left, fg, bg));
        self.grid.set(right, bottom, Cell::with_colors(bottom_right, fg, bg));
    }

    /// Paint the console onto the window at its offset
    pub fn draw(&mut self, window: &mut PixelBuffer) {
        let cell_w = self.font.cell_width();
        let cell_h = self.font.cell_height();
        let baseline = self.font.baseline();

        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let Some(cell) = self.grid.cell(col, row).copied() else {
                    continue;
                };
                let (cx, cy) = self.font.cell_to_pixel(col, row);
                let px = self.offset_x + cx;
                let py = self.offset_y + cy;

                if self.render_background {
                    let (r, g, b) = self.palette.resolve(cell.bg, false);
                    window.fill_rect(px, py, cell_w, cell_h, [r, g, b, 255]);
                }
                if cell.is_blank() {
                    continue;
                }

                let fg = self.palette.resolve(cell.fg, true);
                let glyph = self.font.rasterize(cell.glyph);
                let gx = px + glyph.metrics.xmin;
                let gy = py + baseline - glyph.metrics.height as i32 - glyph.metrics.ymin;
                window.draw_glyph(
                    &glyph.bitmap,
                    glyph.metrics.width as u32,
                    glyph.metrics.height as u32,
                    gx,
                    gy,
                    fg,
                );
            }
        }
    }
}

impl fmt::Debug for VirtualTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualTerminal")
            .field("font", &self.font_name)
            .field("offset", &(self.offset_x, self.offset_y))
            .field("pixel_size", &(self.pixel_width, self.pixel_height))
            .field("grid_size", &self.grid_size())
            .field("render_background", &self.render_background)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::font::bundled_font;

    fn console() -> VirtualTerminal {
        VirtualTerminal::new("mono", bundled_font(16.0), Palette::default(), 0, 0, true)
    }

    #[test]
    fn test_resize_pixels() {
        let mut term = console();
        term.resize_pixels(200, 150);
        assert_eq!(term.pixel_size(), (200, 150));
        let (cols, rows) = term.grid_size();
        assert_eq!(cols, 200 / term.font.cell_width() as usize);
        assert_eq!(rows, 150 / term.font.cell_height() as usize);

        // Never below a single cell
        term.resize_pixels(1, 1);
        assert_eq!(term.grid_size(), (1, 1));
    }

    #[test]
    fn test_print_and_clip() {
        let mut term = console();
        term.resize_pixels(800, 600);
        let (cols, _) = term.grid_size();
        term.print(cols - 2, 0, "abc", Color::RED, Color::BLACK);
        assert_eq!(term.grid().cell(cols - 2, 0).unwrap().glyph, 'a');
        assert_eq!(term.grid().cell(cols - 1, 0).unwrap().glyph, 'b');
        assert_eq!(term.grid().cell(cols - 1, 0).unwrap().fg, Color::RED);
    }

    #[test]
    fn test_print_wide_char() {
        let mut term = console();
        term.resize_pixels(800, 600);
        term.print(0, 0, "日x", Color::Default, Color::Default);
        assert_eq!(term.grid().cell(0, 0).unwrap().glyph, '日');
        assert_eq!(term.grid().cell(1, 0).unwrap().glyph, '\0');
        assert_eq!(term.grid().cell(2, 0).unwrap().glyph, 'x');
    }

    #[test]
    fn test_print_center() {
        let mut term = console();
        term.resize_pixels(800, 600);
        let (cols, _) = term.grid_size();
        term.print_center(1, "hi", Color::Default, Color::Default);
        let x = (cols - 2) / 2;
        assert_eq!(term.grid().cell(x, 1).unwrap().glyph, 'h');
        assert_eq!(term.grid().cell(x + 1, 1).unwrap().glyph, 'i');
    }

    #[test]
    fn test_draw_box() {
        let mut term = console();
        term.resize_pixels(800, 600);
        term.draw_box(1, 1, 4, 3, Color::WHITE, Color::BLACK);
        let glyph = |x, y| term.grid().cell(x, y).unwrap().glyph;
        assert_eq!(glyph(1, 1), '┌');
        assert_eq!(glyph(4, 1), '┐');
        assert_eq!(glyph(1, 3), '└');
        assert_eq!(glyph(4, 3), '┘');
        assert_eq!(glyph(2, 1), '─');
        assert_eq!(glyph(1, 2), '│');
        assert!(term.grid().cell(2, 2).unwrap().is_blank());
    }

    #[test]
    fn test_draw_paints_background() {
        let mut term = console();
        term.resize_pixels(64, 64);
        term.set_offset(4, 4);
        term.clear_with(Cell::with_colors(' ', Color::Default, Color::Rgb(10, 20, 30)));

        let mut window = PixelBuffer::new(100, 100).unwrap();
        term.draw(&mut window);
        assert_eq!(window.pixel(4, 4), Some([10, 20, 30, 255]));
        assert_eq!(window.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_renders_glyph_inside_cell() {
        let mut term = console();
        term.resize_pixels(64, 64);
        term.print(0, 0, "M ", Color::Rgb(255, 0, 0), Color::Rgb(0, 0, 0));

        let mut window = PixelBuffer::new(64, 64).unwrap();
        term.draw(&mut window);

        let (cell_w, cell_h) = (term.font.cell_width(), term.font.cell_height());
        let lit = (0..cell_h)
            .flat_map(|y| (0..cell_w).map(move |x| (x, y)))
            .filter(|&(x, y)| window.pixel(x, y).is_some_and(|p| p[0] > 128))
            .count();
        assert!(lit > 0);
        // The neighbouring cell only has its backdrop
        assert_eq!(window.pixel(cell_w + 1, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_draw_without_background_leaves_window() {
        let mut term =
            VirtualTerminal::new("mono", bundled_font(16.0), Palette::default(), 0, 0, false);
        term.resize_pixels(64, 64);
        let mut window = PixelBuffer::new(64, 64).unwrap();
        term.draw(&mut window);
        assert!(window.buffer().iter().all(|&b| b == 0));
    }
}
