//! UI modules for the Meridian Workbench application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title and status
//! - Left panel: Longitude entry, slider and read-outs
//! - Central canvas: World map with longitude markers

mod canvas;
mod colors;
mod longitude_panel;
mod top_bar;

pub use canvas::{render_canvas, MapView};
pub use longitude_panel::render_longitude_panel;
pub use top_bar::render_top_bar;
