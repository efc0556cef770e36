//! Form rendering module
//!
//! - `field_renderer`: field rendering utilities
//! - `details_form`: the basic, personal and income detail steps

mod details_form;
mod field_renderer;

pub use details_form::draw_details_form;
pub use field_renderer::draw_help_text;
