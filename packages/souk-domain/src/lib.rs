pub mod filter;
pub mod listing;
pub mod pattern;
pub mod query;
pub mod similarity;
pub mod sort;
pub mod text;

mod error;

pub use error::{Error, Result};
