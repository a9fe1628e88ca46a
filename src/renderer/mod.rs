//! Software Renderer Module
//!
//! A CPU implementation of the compositor backend: RGBA pixel buffers,
//! fontdue glyph rasterization and character-grid consoles.

mod backend;
mod console;
mod font;
mod pixels;

pub use backend::SoftwareBackend;
pub use console::VirtualTerminal;
pub use font::{FontError, FontRegistry, FontRenderer, RasterizedGlyph};
pub use pixels::{PixelBuffer, Rgba, TRANSPARENT};
