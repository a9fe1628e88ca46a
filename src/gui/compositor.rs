//! The compositor
//!
//! Holds every layer keyed by a caller-chosen handle and drives whole-screen
//! rendering and resize propagation. Layers are drawn in ascending render
//! order; layers sharing an order are drawn in the order they were
//! registered.

use std::collections::HashMap;

use super::backend::Backend;
use super::error::{check_dimensions, GuiError, GuiResult};
use super::layer::{Layer, LayerRect};
use super::snapshot::GuiSnapshot;

/// Opaque, caller-chosen layer identifier
pub type LayerHandle = i32;

/// Where a layer sits in the render order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderOrder {
    /// One past the highest order handed out so far
    #[default]
    Auto,
    /// Use this order verbatim; it may collide with other layers
    Fixed(i32),
}

impl From<i32> for RenderOrder {
    /// `-1` selects automatic ordering
    fn from(order: i32) -> Self {
        if order == -1 {
            RenderOrder::Auto
        } else {
            RenderOrder::Fixed(order)
        }
    }
}

/// The overall GUI: owns the layers and the backend that draws them.
///
/// Registering under a handle that is already in use replaces the old layer
/// and releases its resources. The replacement is built first, so a failed
/// registration leaves the existing layer untouched.
pub struct Gui<B: Backend> {
    backend: B,
    screen_width: u32,
    screen_height: u32,
    /// Next automatically assigned render order. Wider than `i32` so that
    /// "one past `i32::MAX`" is representable and reported as exhausted.
    next_order: i64,
    /// Insertion counter used to break render-order ties
    next_sequence: u64,
    layers: HashMap<LayerHandle, Layer<B>>,
}

impl<B: Backend> Gui<B> {
    /// Create a compositor for a window of `width` x `height` pixels
    pub fn new(backend: B, width: u32, height: u32) -> GuiResult<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            backend,
            screen_width: width,
            screen_height: height,
            next_order: 0,
            next_sequence: 0,
            layers: HashMap::new(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    /// Register a console-backed layer
    pub fn add_layer<F>(
        &mut self,
        handle: LayerHandle,
        rect: LayerRect,
        font: &str,
        resize: F,
        has_background: bool,
        order: RenderOrder,
    ) -> GuiResult<&mut Layer<B>>
    where
        F: FnMut(&mut LayerRect, u32, u32) + 'static,
    {
        let layer = Layer::new_console(&mut self.backend, rect, font, resize, has_background)?;
        tracing::debug!(handle, ?rect, font, "Adding console layer");
        self.insert(handle, layer, order)
    }

    /// Register an owner-draw layer
    pub fn add_owner_layer<F, D>(
        &mut self,
        handle: LayerHandle,
        rect: LayerRect,
        resize: F,
        draw: D,
        order: RenderOrder,
    ) -> GuiResult<&mut Layer<B>>
    where
        F: FnMut(&mut LayerRect, u32, u32) + 'static,
        D: FnMut(&LayerRect, &mut B::Surface) + 'static,
    {
        let layer = Layer::new_owner_draw(rect, resize, draw)?;
        tracing::debug!(handle, ?rect, "Adding owner-draw layer");
        self.insert(handle, layer, order)
    }

    fn insert(
        &mut self,
        handle: LayerHandle,
        mut layer: Layer<B>,
        order: RenderOrder,
    ) -> GuiResult<&mut Layer<B>> {
        layer.order = self.assign_order(order)?;
        layer.sequence = self.next_sequence;
        self.next_sequence += 1;

        if let Some(old) = self.layers.remove(&handle) {
            tracing::debug!(
                handle,
                old_order = old.order,
                new_order = layer.order,
                "Replacing existing layer"
            );
        }
        Ok(self.layers.entry(handle).or_insert(layer))
    }

    fn assign_order(&mut self, order: RenderOrder) -> GuiResult<i32> {
        match order {
            RenderOrder::Auto => {
                let assigned = i32::try_from(self.next_order)
                    .map_err(|_| GuiError::OrderExhausted(i32::MAX))?;
                self.next_order += 1;
                Ok(assigned)
            }
            RenderOrder::Fixed(assigned) => {
                self.next_order = self.next_order.max(i64::from(assigned) + 1);
                Ok(assigned)
            }
        }
    }

    /// Remove a layer, returning it if it existed. Removing an unknown
    /// handle is a no-op.
    pub fn delete_layer(&mut self, handle: LayerHandle) -> Option<Layer<B>> {
        let removed = self.layers.remove(&handle);
        if removed.is_some() {
            tracing::debug!(handle, "Deleted layer");
        }
        removed
    }

    pub fn get_layer(&mut self, handle: LayerHandle) -> Option<&mut Layer<B>> {
        self.layers.get_mut(&handle)
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&Layer<B>> {
        self.layers.get(&handle)
    }

    pub fn contains(&self, handle: LayerHandle) -> bool {
        self.layers.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Handles sorted by render order, ties broken by registration sequence
    pub fn handles_in_render_order(&self) -> Vec<LayerHandle> {
        let mut keyed: Vec<(i32, u64, LayerHandle)> = self
            .layers
            .iter()
            .map(|(&handle, layer)| (layer.order, layer.sequence, handle))
            .collect();
        keyed.sort_unstable();
        keyed.into_iter().map(|(_, _, handle)| handle).collect()
    }

    /// Re-apply the current screen size to a single layer, e.g. after
    /// changing its resize callback or rect.
    pub fn resize_layer(&mut self, handle: LayerHandle) -> GuiResult<()> {
        let (width, height) = (self.screen_width, self.screen_height);
        let layer = self
            .layers
            .get_mut(&handle)
            .ok_or(GuiError::HandleNotFound(handle))?;
        layer.on_resize(&mut self.backend, width, height)
    }

    /// Move or resize a single layer, bringing its console or backing along
    pub fn set_layer_rect(&mut self, handle: LayerHandle, rect: LayerRect) -> GuiResult<()> {
        let layer = self
            .layers
            .get_mut(&handle)
            .ok_or(GuiError::HandleNotFound(handle))?;
        layer.set_rect(&mut self.backend, rect)
    }

    /// Propagate a window resize to every layer
    pub fn on_resize(&mut self, width: u32, height: u32) -> GuiResult<()> {
        check_dimensions(width, height)?;
        self.screen_width = width;
        self.screen_height = height;
        tracing::debug!(width, height, layers = self.layers.len(), "Resizing GUI");

        for handle in self.handles_in_render_order() {
            if let Some(layer) = self.layers.get_mut(&handle) {
                layer.on_resize(&mut self.backend, width, height)?;
            }
        }
        Ok(())
    }

    /// Draw every layer onto the window, lowest order first
    pub fn render(&mut self, window: &mut B::Window) -> GuiResult<()> {
        for handle in self.handles_in_render_order() {
            if let Some(layer) = self.layers.get_mut(&handle) {
                tracing::trace!(handle, order = layer.order, "Rendering layer");
                layer.render(&mut self.backend, window)?;
            }
        }
        Ok(())
    }

    /// Capture the registry state for debugging and tests
    pub fn snapshot(&self) -> GuiSnapshot {
        let layers = self
            .handles_in_render_order()
            .into_iter()
            .filter_map(|handle| self.layers.get(&handle).map(|layer| (handle, layer)));
        GuiSnapshot::new(self.screen_width, self.screen_height, layers)
    }
}
