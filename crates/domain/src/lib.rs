#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod context;
mod daily;
mod error;
mod exercise;
mod fatigue;
mod filter;
mod progression;
mod session;
mod set;
mod smart_sort;
mod suggestion;
mod transition;
mod workout_log;

pub use context::*;
pub use daily::*;
pub use error::*;
pub use exercise::*;
pub use fatigue::*;
pub use filter::*;
pub use progression::*;
pub use session::*;
pub use set::*;
pub use smart_sort::*;
pub use suggestion::*;
pub use transition::*;
pub use workout_log::*;
