//! Deterministic compositor snapshots
//!
//! A snapshot captures the registry state (layers in render order, their
//! geometry and what backs them) in a serializable form for testing and
//! debugging. Given the same sequence of registry calls, the compositor must
//! produce identical snapshots.

use serde::{Deserialize, Serialize};

use super::backend::Backend;
use super::compositor::LayerHandle;
use super::layer::{Layer, LayerContent, LayerRect};

/// A snapshot of the whole compositor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuiSnapshot {
    /// Screen dimensions in pixels
    pub screen_width: u32,
    pub screen_height: u32,
    /// Layers in render order
    pub layers: Vec<LayerSnapshot>,
}

/// Snapshot of a single layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub handle: LayerHandle,
    pub order: i32,
    pub sequence: u64,
    pub rect: LayerRect,
    pub kind: LayerKindSnapshot,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub controls: usize,
}

/// What backs a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKindSnapshot {
    Console { font: String, has_background: bool },
    OwnerDraw { backing_allocated: bool },
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl<B: Backend> From<&Layer<B>> for LayerKindSnapshot {
    fn from(layer: &Layer<B>) -> Self {
        match layer.content() {
            LayerContent::Console {
                font,
                has_background,
                ..
            } => LayerKindSnapshot::Console {
                font: font.clone(),
                has_background: *has_background,
            },
            LayerContent::OwnerDraw { backing, .. } => LayerKindSnapshot::OwnerDraw {
                backing_allocated: backing.is_some(),
            },
        }
    }
}

impl GuiSnapshot {
    /// Build a snapshot from layers already sorted into render order
    pub fn new<'a, B, I>(screen_width: u32, screen_height: u32, layers: I) -> Self
    where
        B: Backend + 'a,
        I: IntoIterator<Item = (LayerHandle, &'a Layer<B>)>,
    {
        Self {
            screen_width,
            screen_height,
            layers: layers
                .into_iter()
                .map(|(handle, layer)| LayerSnapshot {
                    handle,
                    order: layer.order(),
                    sequence: layer.sequence(),
                    rect: layer.rect(),
                    kind: LayerKindSnapshot::from(layer),
                    controls: layer.control_count(),
                })
                .collect(),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Handles in render order
    pub fn handles(&self) -> Vec<LayerHandle> {
        self.layers.iter().map(|l| l.handle).collect()
    }

    /// One line per layer, for debugging
    pub fn to_text(&self) -> String {
        let mut out = format!("screen {}x{}\n", self.screen_width, self.screen_height);
        for layer in &self.layers {
            let kind = match &layer.kind {
                LayerKindSnapshot::Console { font, .. } => format!("console({})", font),
                LayerKindSnapshot::OwnerDraw { backing_allocated } => {
                    format!("owner-draw(backing={})", backing_allocated)
                }
            };
            out.push_str(&format!(
                "#{} order={} at ({},{}) {}x{} {}\n",
                layer.handle,
                layer.order,
                layer.rect.x,
                layer.rect.y,
                layer.rect.w,
                layer.rect.h,
                kind
            ));
        }
        out
    }
}
