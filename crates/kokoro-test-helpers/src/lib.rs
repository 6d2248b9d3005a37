mod fake_api;
pub mod fixtures;
mod mock;

pub use fake_api::*;
pub use mock::*;
