pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod utils;

pub use config::*;
pub use error::{Result, ScrapeError};
pub use models::*;
pub use pipeline::*;
pub use scrapers::*;
pub use utils::*;
