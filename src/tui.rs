//! Interactive terminal front end: file list, mode and pattern controls,
//! before/after preview, and a progress gauge for the generate phase.

mod app;
mod app_logic;
mod events;
mod models;
mod processing;
mod rendering;
mod utils;

pub use app::App;
pub use events::run_tui;
pub use models::{InputMode, ProcessingStats};
