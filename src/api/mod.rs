//! API boundary to the reservation server

mod client;
mod error;

pub use client::{AuthToken, DeskClient};
pub use error::ApiError;
