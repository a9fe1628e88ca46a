//! Shared helpers for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use gridgui::gui::{Backend, GuiError, GuiResult, LayerRect};

/// A surface or console that only remembers its geometry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recorded {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Backend that records every window draw as a line of text
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub surfaces_created: usize,
    pub consoles_created: usize,
}

impl Backend for RecordingBackend {
    type Window = Vec<String>;
    type Surface = Recorded;
    type Console = Recorded;

    fn create_surface(&mut self, width: u32, height: u32) -> GuiResult<Recorded> {
        self.surfaces_created += 1;
        Ok(Recorded {
            width,
            height,
            ..Recorded::default()
        })
    }

    fn resize_surface(&mut self, surface: &mut Recorded, width: u32, height: u32) -> GuiResult<()> {
        surface.width = width;
        surface.height = height;
        Ok(())
    }

    fn clear_surface(&mut self, _surface: &mut Recorded) -> GuiResult<()> {
        Ok(())
    }

    fn draw_surface(
        &mut self,
        surface: &Recorded,
        window: &mut Vec<String>,
        x: i32,
        y: i32,
    ) -> GuiResult<()> {
        window.push(format!("surface {}x{} at {},{}", surface.width, surface.height, x, y));
        Ok(())
    }

    fn create_console(
        &mut self,
        font: &str,
        x: i32,
        y: i32,
        _render_background: bool,
    ) -> GuiResult<Recorded> {
        if font != "8x8" {
            return Err(GuiError::FontNotFound(font.to_string()));
        }
        self.consoles_created += 1;
        Ok(Recorded {
            x,
            y,
            ..Recorded::default()
        })
    }

    fn move_console(&mut self, console: &mut Recorded, x: i32, y: i32) -> GuiResult<()> {
        console.x = x;
        console.y = y;
        Ok(())
    }

    fn resize_console(&mut self, console: &mut Recorded, width: u32, height: u32) -> GuiResult<()> {
        console.width = width;
        console.height = height;
        Ok(())
    }

    fn draw_console(&mut self, console: &mut Recorded, window: &mut Vec<String>) -> GuiResult<()> {
        window.push(format!(
            "console {}x{} at {},{}",
            console.width, console.height, console.x, console.y
        ));
        Ok(())
    }
}

/// Resize callback that leaves the rectangle alone
pub fn keep(_: &mut LayerRect, _: u32, _: u32) {}

/// Shared log that draw callbacks append their handle to
pub type DrawLog = Rc<RefCell<Vec<i32>>>;

/// A draw callback that records `handle` in `log` each time it runs
pub fn log_draw(log: &DrawLog, handle: i32) -> impl FnMut(&LayerRect, &mut Recorded) + 'static {
    let log = Rc::clone(log);
    move |_: &LayerRect, _: &mut Recorded| log.borrow_mut().push(handle)
}
