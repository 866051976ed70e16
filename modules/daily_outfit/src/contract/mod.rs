pub mod client;
pub mod error;
pub mod model;

pub use client::DailyOutfitApi;
pub use error::DailyOutfitError;
pub use model::*;
