//! Renderable layers
//!
//! A layer is one rectangular region of the screen. It is either backed by a
//! console (a character grid drawn by the backend) or by an owner-draw
//! callback that paints into an offscreen surface which is then blitted.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::backend::{Backend, Control};
use super::error::{check_dimensions, GuiResult};

/// Position and size of a layer, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl LayerRect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Called with the layer's rect and the new window size on every resize.
/// The callback decides how the layer follows the window by mutating the rect.
pub type ResizeFn = Box<dyn FnMut(&mut LayerRect, u32, u32)>;

/// Paints an owner-draw layer into its backing surface
pub type DrawFn<S> = Box<dyn FnMut(&LayerRect, &mut S)>;

/// What a layer draws with. Exactly one of the two, for the layer's lifetime.
pub enum LayerContent<B: Backend> {
    Console {
        console: B::Console,
        font: String,
        has_background: bool,
    },
    OwnerDraw {
        draw: DrawFn<B::Surface>,
        /// Allocated on first render or resize
        backing: Option<B::Surface>,
    },
}

/// A renderable layer. Usually reached through [`Gui::get_layer`](super::Gui::get_layer).
pub struct Layer<B: Backend> {
    rect: LayerRect,
    content: LayerContent<B>,
    resize: ResizeFn,
    controls: Vec<Box<dyn Control<B::Console>>>,
    pub(crate) order: i32,
    pub(crate) sequence: u64,
}

impl<B: Backend> Layer<B> {
    /// Create a console-backed layer. The console is allocated and sized
    /// immediately; an unknown font fails the whole construction.
    pub fn new_console<F>(
        backend: &mut B,
        rect: LayerRect,
        font: &str,
        resize: F,
        has_background: bool,
    ) -> GuiResult<Self>
    where
        F: FnMut(&mut LayerRect, u32, u32) + 'static,
    {
        check_dimensions(rect.w, rect.h)?;

        let mut console = backend.create_console(font, rect.x, rect.y, has_background)?;
        backend.resize_console(&mut console, rect.w, rect.h)?;

        Ok(Self {
            rect,
            content: LayerContent::Console {
                console,
                font: font.to_string(),
                has_background,
            },
            resize: Box::new(resize),
            controls: Vec::new(),
            order: 0,
            sequence: 0,
        })
    }

    /// Create an owner-draw layer. No surface is allocated until the layer
    /// is first rendered or resized.
    pub fn new_owner_draw<F, D>(rect: LayerRect, resize: F, draw: D) -> GuiResult<Self>
    where
        F: FnMut(&mut LayerRect, u32, u32) + 'static,
        D: FnMut(&LayerRect, &mut B::Surface) + 'static,
    {
        check_dimensions(rect.w, rect.h)?;

        Ok(Self {
            rect,
            content: LayerContent::OwnerDraw {
                draw: Box::new(draw),
                backing: None,
            },
            resize: Box::new(resize),
            controls: Vec::new(),
            order: 0,
            sequence: 0,
        })
    }

    pub fn rect(&self) -> LayerRect {
        self.rect
    }

    /// Move or resize the layer directly. The console, or an already
    /// allocated backing, follows immediately. On error nothing changes.
    pub fn set_rect(&mut self, backend: &mut B, rect: LayerRect) -> GuiResult<()> {
        self.apply_rect(backend, rect, false)
    }

    /// Render order assigned at registration
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Insertion sequence, used to break ties between equal orders
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn content(&self) -> &LayerContent<B> {
        &self.content
    }

    pub fn is_console(&self) -> bool {
        matches!(self.content, LayerContent::Console { .. })
    }

    /// Font name, for console layers
    pub fn font(&self) -> Option<&str> {
        match &self.content {
            LayerContent::Console { font, .. } => Some(font),
            LayerContent::OwnerDraw { .. } => None,
        }
    }

    /// Whether a console layer paints its backdrop
    pub fn has_background(&self) -> Option<bool> {
        match &self.content {
            LayerContent::Console { has_background, .. } => Some(*has_background),
            LayerContent::OwnerDraw { .. } => None,
        }
    }

    pub fn console(&self) -> Option<&B::Console> {
        match &self.content {
            LayerContent::Console { console, .. } => Some(console),
            LayerContent::OwnerDraw { .. } => None,
        }
    }

    pub fn console_mut(&mut self) -> Option<&mut B::Console> {
        match &mut self.content {
            LayerContent::Console { console, .. } => Some(console),
            LayerContent::OwnerDraw { .. } => None,
        }
    }

    /// The owner-draw backing surface, if it has been allocated
    pub fn backing(&self) -> Option<&B::Surface> {
        match &self.content {
            LayerContent::OwnerDraw { backing, .. } => backing.as_ref(),
            LayerContent::Console { .. } => None,
        }
    }

    pub fn set_resize_fn<F>(&mut self, resize: F)
    where
        F: FnMut(&mut LayerRect, u32, u32) + 'static,
    {
        self.resize = Box::new(resize);
    }

    /// Replace the draw callback. Returns `false` for console layers, which
    /// have none.
    pub fn set_draw_fn<D>(&mut self, draw_fn: D) -> bool
    where
        D: FnMut(&LayerRect, &mut B::Surface) + 'static,
    {
        match &mut self.content {
            LayerContent::OwnerDraw { draw, .. } => {
                *draw = Box::new(draw_fn);
                true
            }
            LayerContent::Console { .. } => false,
        }
    }

    /// Attach a retained-mode control
    pub fn add_control<C>(&mut self, control: C)
    where
        C: Control<B::Console> + 'static,
    {
        self.controls.push(Box::new(control));
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn clear_controls(&mut self) {
        self.controls.clear();
    }

    /// Run every attached control's render hook against the console.
    /// Owner-draw layers have no console, so this does nothing for them.
    pub fn render_controls(&mut self) {
        if let LayerContent::Console { console, .. } = &mut self.content {
            for control in &mut self.controls {
                control.render(console);
            }
        }
    }

    /// Allocate the owner-draw backing, or resize it if it already exists.
    /// Console layers are left alone.
    pub fn make_owner_draw_backing(&mut self, backend: &mut B) -> GuiResult<()> {
        let LayerRect { w, h, .. } = self.rect;
        if let LayerContent::OwnerDraw { backing, .. } = &mut self.content {
            match backing {
                Some(surface) => backend.resize_surface(surface, w, h)?,
                None => *backing = Some(backend.create_surface(w, h)?),
            }
        }
        Ok(())
    }

    /// Apply a window resize: the resize callback decides the new rect, then
    /// the console or backing surface follows it.
    pub fn on_resize(&mut self, backend: &mut B, width: u32, height: u32) -> GuiResult<()> {
        let mut rect = self.rect;
        (self.resize)(&mut rect, width, height);
        self.apply_rect(backend, rect, true)
    }

    /// Bring the console or backing in line with `rect`, then commit it.
    /// The stored rect only changes once the backend has accepted the new
    /// geometry.
    fn apply_rect(&mut self, backend: &mut B, rect: LayerRect, allocate: bool) -> GuiResult<()> {
        check_dimensions(rect.w, rect.h)?;
        let old = self.rect;

        match &mut self.content {
            LayerContent::Console { console, .. } => {
                backend.resize_console(console, rect.w, rect.h)?;
                if let Err(e) = backend.move_console(console, rect.x, rect.y) {
                    if let Err(restore) = backend.resize_console(console, old.w, old.h) {
                        tracing::warn!(%restore, "Failed to restore console size");
                    }
                    return Err(e);
                }
            }
            LayerContent::OwnerDraw { backing, .. } => match backing {
                Some(surface) => backend.resize_surface(surface, rect.w, rect.h)?,
                None if allocate => *backing = Some(backend.create_surface(rect.w, rect.h)?),
                None => {}
            },
        }

        self.rect = rect;
        Ok(())
    }

    /// Draw the layer onto the window
    pub fn render(&mut self, backend: &mut B, window: &mut B::Window) -> GuiResult<()> {
        let rect = self.rect;
        match &mut self.content {
            LayerContent::Console { console, .. } => backend.draw_console(console, window),
            LayerContent::OwnerDraw { draw, backing } => {
                if backing.is_none() {
                    *backing = Some(backend.create_surface(rect.w, rect.h)?);
                }
                if let Some(surface) = backing.as_mut() {
                    backend.clear_surface(surface)?;
                    draw(&rect, surface);
                    backend.draw_surface(surface, window, rect.x, rect.y)?;
                }
                Ok(())
            }
        }
    }
}

impl<B: Backend> fmt::Debug for Layer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Layer");
        s.field("rect", &self.rect)
            .field("order", &self.order)
            .field("sequence", &self.sequence);
        match &self.content {
            LayerContent::Console {
                font,
                has_background,
                ..
            } => s
                .field("font", font)
                .field("has_background", has_background),
            LayerContent::OwnerDraw { backing, .. } => {
                s.field("backing_allocated", &backing.is_some())
            }
        };
        s.field("controls", &self.controls.len()).finish()
    }
}
