//! Software backend
//!
//! Plugs the CPU renderer into the compositor: pixel buffers serve as both
//! window and owner-draw surfaces, and consoles are [`VirtualTerminal`]s
//! created from the font registry.

use crate::core::Palette;
use crate::gui::{Backend, GuiResult};

use super::console::VirtualTerminal;
use super::font::FontRegistry;
use super::pixels::{PixelBuffer, TRANSPARENT};

#[derive(Clone, Default)]
pub struct SoftwareBackend {
    fonts: FontRegistry,
    palette: Palette,
}

impl SoftwareBackend {
    pub fn new(fonts: FontRegistry) -> Self {
        Self {
            fonts,
            palette: Palette::default(),
        }
    }

    /// Use `palette` for consoles created from now on
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }
}

impl Backend for SoftwareBackend {
    type Window = PixelBuffer;
    type Surface = PixelBuffer;
    type Console = VirtualTerminal;

    fn create_surface(&mut self, width: u32, height: u32) -> GuiResult<PixelBuffer> {
        tracing::trace!(width, height, "Allocating surface");
        PixelBuffer::new(width, height)
    }

    fn resize_surface(
        &mut self,
        surface: &mut PixelBuffer,
        width: u32,
        height: u32,
    ) -> GuiResult<()> {
        surface.resize(width, height)
    }

    fn clear_surface(&mut self, surface: &mut PixelBuffer) -> GuiResult<()> {
        surface.clear(TRANSPARENT);
        Ok(())
    }

    fn draw_surface(
        &mut self,
        surface: &PixelBuffer,
        window: &mut PixelBuffer,
        x: i32,
        y: i32,
    ) -> GuiResult<()> {
        window.blit(surface, x, y);
        Ok(())
    }

    fn create_console(
        &mut self,
        font: &str,
        x: i32,
        y: i32,
        render_background: bool,
    ) -> GuiResult<VirtualTerminal> {
        let renderer = self.fonts.get(font)?;
        Ok(VirtualTerminal::new(
            font,
            renderer,
            self.palette.clone(),
            x,
            y,
            render_background,
        ))
    }

    fn move_console(&mut self, console: &mut VirtualTerminal, x: i32, y: i32) -> GuiResult<()> {
        console.set_offset(x, y);
        Ok(())
    }

    fn resize_console(
        &mut self,
        console: &mut VirtualTerminal,
        width: u32,
        height: u32,
    ) -> GuiResult<()> {
        console.resize_pixels(width, height);
        Ok(())
    }

    fn draw_console(
        &mut self,
        console: &mut VirtualTerminal,
        window: &mut PixelBuffer,
    ) -> GuiResult<()> {
        console.draw(window);
        Ok(())
    }
}
