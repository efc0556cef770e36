//! Reusable UI components

mod button;
mod dialog;
mod toast;

pub use button::{render_button, render_proceed_button, BUTTON_HEIGHT};
pub use dialog::{render_confirm_dialog, render_loading_dialog};
pub use toast::render_toast;
