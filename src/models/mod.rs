//! Data models for desk reservation entities

mod desk;
mod reservation;
mod user;

pub use desk::*;
pub use reservation::*;
pub use user::*;
