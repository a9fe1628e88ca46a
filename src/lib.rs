//! Gridgui: a layered compositor for character-grid GUIs
//!
//! Manages a set of rectangular, independently resizable layers, each drawn
//! either by a text console or by an owner-supplied draw routine, and
//! composites them onto a window in a defined order every frame.
//!
//! - `gui`: the layer registry and compositor, generic over a [`gui::Backend`]
//! - `core`: cells, colors and the console grid
//! - `renderer`: a CPU backend (pixel buffers, fontdue glyphs, virtual terminals)
//! - `app`: configuration

pub mod app;
pub mod core;
pub mod gui;
pub mod renderer;

pub use app::Config;
pub use gui::{Backend, Gui, GuiError, GuiResult, Layer, LayerHandle, LayerRect, RenderOrder};
pub use renderer::{PixelBuffer, SoftwareBackend, VirtualTerminal};
