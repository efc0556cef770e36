//! Dialog components for TUI

mod base;
mod confirm_dialog;
mod loading_dialog;

pub use confirm_dialog::render_confirm_dialog;
pub use loading_dialog::render_loading_dialog;
