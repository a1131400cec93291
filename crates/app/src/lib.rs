#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod log;
mod service;
mod settings;
mod state;

pub use service::*;
pub use settings::*;
pub use state::*;
