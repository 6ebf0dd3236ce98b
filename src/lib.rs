//! Paintr — a small raster paint editor.
//!
//! The crate is split into a headless core (everything except [`app`]) and a
//! thin egui shell. The core is driven entirely by [`input::InputEvent`]s,
//! so integration tests exercise complete drawing sessions without a window.

pub mod app;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod io;
pub mod logger;
pub mod notify;
pub mod ops;
pub mod tools;

pub use canvas::{SelectionRect, Snapshot, Surface};
pub use editor::Editor;
pub use input::{Command, InputEvent};
pub use tools::Tool;
