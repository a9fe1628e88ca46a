//! Layered GUI compositor
//!
//! The compositor keeps a registry of rectangular layers, each backed either
//! by a character-grid console or by an owner-draw callback, and composites
//! them onto a window every frame:
//!
//! - `backend`: the surface/console contract the compositor draws through
//! - `layer`: a single layer and its resize/render behaviour
//! - `compositor`: the [`Gui`] registry, render ordering and resize fan-out
//! - `snapshot`: serializable registry state for tests and debugging
//!
//! Everything is single-threaded and frame-synchronous. The window is only
//! borrowed for the duration of a `render` call.

mod backend;
mod compositor;
mod error;
mod layer;
mod snapshot;

pub use backend::{Backend, Control};
pub use compositor::{Gui, LayerHandle, RenderOrder};
pub use error::{GuiError, GuiResult};
pub use layer::{DrawFn, Layer, LayerContent, LayerRect, ResizeFn};
pub use snapshot::{GuiSnapshot, LayerKindSnapshot, LayerSnapshot};

#[cfg(test)]
pub(crate) mod testing;
