//! Console Core Module
//!
//! Platform-independent character-grid state. This module contains:
//! - Cell representation with colors
//! - The color palette used to resolve cell colors
//! - The grid a virtual terminal draws from

mod cell;
mod grid;

pub use cell::{Cell, Color, Palette};
pub use grid::Grid;
