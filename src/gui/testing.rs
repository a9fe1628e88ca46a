//! Recording backend for compositor unit tests

use super::backend::Backend;
use super::error::{GuiError, GuiResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockSurface {
    pub width: u32,
    pub height: u32,
    pub clears: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockConsole {
    pub font: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub render_background: bool,
    pub glyphs: Vec<char>,
}

/// Everything drawn onto the window, in order
#[derive(Debug, Default)]
pub(crate) struct MockWindow {
    pub drawn: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct MockBackend {
    fonts: Vec<String>,
    pub surfaces_created: usize,
    pub consoles_created: usize,
    /// Surfaces or consoles wider or taller than this fail to allocate
    pub max_size: u32,
    pub fail_moves: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            fonts: vec!["8x8".to_string(), "8x16".to_string()],
            surfaces_created: 0,
            consoles_created: 0,
            max_size: u32::MAX,
            fail_moves: false,
        }
    }

    fn check_size(&self, width: u32, height: u32) -> GuiResult<()> {
        if width > self.max_size || height > self.max_size {
            return Err(GuiError::SurfaceAllocation {
                width,
                height,
                reason: "over mock limit".to_string(),
            });
        }
        Ok(())
    }
}

impl Backend for MockBackend {
    type Window = MockWindow;
    type Surface = MockSurface;
    type Console = MockConsole;

    fn create_surface(&mut self, width: u32, height: u32) -> GuiResult<MockSurface> {
        self.check_size(width, height)?;
        self.surfaces_created += 1;
        Ok(MockSurface {
            width,
            height,
            clears: 0,
        })
    }

    fn resize_surface(
        &mut self,
        surface: &mut MockSurface,
        width: u32,
        height: u32,
    ) -> GuiResult<()> {
        self.check_size(width, height)?;
        surface.width = width;
        surface.height = height;
        Ok(())
    }

    fn clear_surface(&mut self, surface: &mut MockSurface) -> GuiResult<()> {
        surface.clears += 1;
        Ok(())
    }

    fn draw_surface(
        &mut self,
        surface: &MockSurface,
        window: &mut MockWindow,
        x: i32,
        y: i32,
    ) -> GuiResult<()> {
        window
            .drawn
            .push(format!("surface {}x{} at {},{}", surface.width, surface.height, x, y));
        Ok(())
    }

    fn create_console(
        &mut self,
        font: &str,
        x: i32,
        y: i32,
        render_background: bool,
    ) -> GuiResult<MockConsole> {
        if !self.fonts.iter().any(|f| f == font) {
            return Err(GuiError::FontNotFound(font.to_string()));
        }
        self.consoles_created += 1;
        Ok(MockConsole {
            font: font.to_string(),
            x,
            y,
            width: 0,
            height: 0,
            render_background,
            glyphs: Vec::new(),
        })
    }

    fn move_console(&mut self, console: &mut MockConsole, x: i32, y: i32) -> GuiResult<()> {
        if self.fail_moves {
            return Err(GuiError::Backend("console refused to move".to_string()));
        }
        console.x = x;
        console.y = y;
        Ok(())
    }

    fn resize_console(
        &mut self,
        console: &mut MockConsole,
        width: u32,
        height: u32,
    ) -> GuiResult<()> {
        self.check_size(width, height)?;
        console.width = width;
        console.height = height;
        Ok(())
    }

    fn draw_console(
        &mut self,
        console: &mut MockConsole,
        window: &mut MockWindow,
    ) -> GuiResult<()> {
        window.drawn.push(format!(
            "console {} {}x{} at {},{}",
            console.font, console.width, console.height, console.x, console.y
        ));
        Ok(())
    }
}
