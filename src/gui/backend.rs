//! Backend contract
//!
//! The compositor never touches pixels itself. Everything it needs from the
//! graphics side (offscreen surfaces, blitting, character-grid consoles) goes
//! through this trait, so the same registry drives the software renderer
//! and the recording backends used in tests.

use super::error::GuiResult;

/// Surface provider and console factory consumed by [`Gui`](super::Gui).
pub trait Backend {
    /// The presentation target layers are composited onto
    type Window;
    /// Offscreen surface backing an owner-draw layer
    type Surface;
    /// Character-grid renderer backing a console layer
    type Console;

    /// Allocate an offscreen surface of `width` x `height` pixels
    fn create_surface(&mut self, width: u32, height: u32) -> GuiResult<Self::Surface>;

    /// Resize an existing surface in place
    fn resize_surface(&mut self, surface: &mut Self::Surface, width: u32, height: u32)
        -> GuiResult<()>;

    /// Reset a surface to fully transparent before it is redrawn
    fn clear_surface(&mut self, surface: &mut Self::Surface) -> GuiResult<()>;

    /// Copy a surface onto the window with its top-left corner at (x, y)
    fn draw_surface(
        &mut self,
        surface: &Self::Surface,
        window: &mut Self::Window,
        x: i32,
        y: i32,
    ) -> GuiResult<()>;

    /// Create a console bound to `font` and positioned at (x, y)
    fn create_console(
        &mut self,
        font: &str,
        x: i32,
        y: i32,
        render_background: bool,
    ) -> GuiResult<Self::Console>;

    /// Move a console's origin to (x, y)
    fn move_console(&mut self, console: &mut Self::Console, x: i32, y: i32) -> GuiResult<()>;

    /// Resize a console to cover `width` x `height` pixels
    fn resize_console(&mut self, console: &mut Self::Console, width: u32, height: u32)
        -> GuiResult<()>;

    /// Draw a console onto the window
    fn draw_console(&mut self, console: &mut Self::Console, window: &mut Self::Window)
        -> GuiResult<()>;
}

/// Retained-mode control attached to a layer.
///
/// Only exposes a render hook; there is no update or event contract.
pub trait Control<T: ?Sized> {
    fn render(&mut self, target: &mut T);
}

impl<T: ?Sized, F> Control<T> for F
where
    F: FnMut(&mut T),
{
    fn render(&mut self, target: &mut T) {
        self(target)
    }
}
