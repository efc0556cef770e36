//! Application state module

mod form_data;
mod schema;
mod step;
mod uploads;
mod validation;
mod wizard;

pub use form_data::*;
pub use schema::*;
pub use step::*;
pub use uploads::*;
pub use wizard::*;
